//! Registration reconciliation.
//!
//! Every authenticated identity must have an account record in the role
//! store. The reconciler creates the record the first time an identity is
//! seen and leaves existing records alone.

use crate::config::Callbacks;
use roles_auth_core::{Account, Result};
use roles_auth_roles::{RoleStoreError, RolesAdapter};
use tracing::{debug, info, instrument, warn};

const REGISTRATION_ERROR_PREFIX: &str = "Could not ensure user is registered: ";

/// Creates missing account records for authenticated identities.
#[derive(Clone)]
pub struct RegistrationReconciler {
    roles: RolesAdapter,
    callbacks: Callbacks,
}

impl RegistrationReconciler {
    #[must_use]
    pub fn new(roles: RolesAdapter, callbacks: Callbacks) -> Self {
        Self { roles, callbacks }
    }

    /// Ensures an account record exists for the account.
    ///
    /// Failures are reported through the error callback and never returned.
    #[instrument(skip_all, fields(uid = %account.uid()))]
    pub async fn ensure_registered(&self, account: &Account) {
        if let Err(report) = self.reconcile(account).await {
            let reason = report.current_context().to_string();
            warn!(error = %reason, "registration reconciliation failed");
            self.callbacks
                .error(&format!("{REGISTRATION_ERROR_PREFIX}{reason}"));
        }
    }

    async fn reconcile(&self, account: &Account) -> Result<(), RoleStoreError> {
        if self.roles.user_exists(account.uid()).await? {
            debug!("account record already exists");
            return Ok(());
        }

        match self.roles.register_user(account).await {
            Ok(()) => {
                info!("account record created");
                Ok(())
            }
            Err(report) if matches!(report.current_context(), RoleStoreError::AccountExists { .. }) => {
                debug!("account record created concurrently");
                Ok(())
            }
            Err(report) => Err(report),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CallbackLog, recording_store, roles_config, user};
    use roles_auth_roles::{RoleStore, StoreCall};
    use std::sync::Arc;

    fn reconciler(
        store: Arc<dyn RoleStore>,
        log: &CallbackLog,
    ) -> RegistrationReconciler {
        RegistrationReconciler::new(RolesAdapter::new(&roles_config(), store), log.callbacks())
    }

    fn account(uid: &str) -> Account {
        user(uid).to_account().expect("valid user")
    }

    #[tokio::test]
    async fn registers_new_account_once() {
        let store = recording_store();
        let log = CallbackLog::default();
        let reconciler = reconciler(store.clone(), &log);
        let account = account("u1");

        reconciler.ensure_registered(&account).await;
        reconciler.ensure_registered(&account).await;

        assert_eq!(
            store.count(|call| matches!(call, StoreCall::RegisterUser(_))),
            1
        );
        assert_eq!(
            store.calls()[1],
            StoreCall::RegisterUser(account.clone())
        );
        assert!(log.errors().is_empty());
    }

    #[tokio::test]
    async fn registered_account_omits_phone_number() {
        let store = recording_store();
        let log = CallbackLog::default();
        let reconciler = reconciler(store.clone(), &log);

        reconciler.ensure_registered(&account("u1")).await;

        let stored = store
            .backing()
            .get_account_record(account("u1").uid())
            .await
            .expect("record exists");
        assert!(stored.phone_number().is_none());
        assert_eq!(stored.email(), Some("u1@example.com"));
    }

    #[tokio::test]
    async fn existing_account_is_not_registered_again() {
        let store = recording_store();
        let account = account("u1");
        store.backing().register_user(&account).await.unwrap();
        let log = CallbackLog::default();

        reconciler(store.clone(), &log).ensure_registered(&account).await;

        assert_eq!(
            store.calls(),
            vec![StoreCall::UserExists(account.uid().clone())]
        );
    }

    #[tokio::test]
    async fn store_failure_is_reported_not_raised() {
        let store = recording_store();
        store.fail_with("network down");
        let log = CallbackLog::default();

        reconciler(store.clone(), &log)
            .ensure_registered(&account("u1"))
            .await;

        let errors = log.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Could not ensure user is registered: "));
        assert!(errors[0].contains("network down"));
        assert_eq!(
            store.count(|call| matches!(call, StoreCall::RegisterUser(_))),
            0
        );
    }
}
