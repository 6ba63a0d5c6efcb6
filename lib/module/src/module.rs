//! The roles-auth module facade.

use crate::config::Configuration;
use crate::controller::AuthLifecycle;
use crate::error::ModuleError;
use crate::reconciler::RegistrationReconciler;
use crate::role_check::RoleChecker;
use crate::state::{AuthState, RolesAuthState};
use crate::store::StateStore;
use roles_auth_core::{Account, Result};
use roles_auth_identity::IdentityProvider;
use roles_auth_roles::{RoleStore, RolesAdapter};
use std::sync::Arc;
use tokio::sync::watch;

/// Authentication and role state for one host application.
///
/// Created once per application. Call [`initialize`](Self::initialize) to
/// start observing the identity provider.
pub struct RolesAuthModule {
    store: Arc<StateStore>,
    roles: RolesAdapter,
    lifecycle: Arc<AuthLifecycle>,
    checker: RoleChecker,
}

impl RolesAuthModule {
    /// Wires the module to its collaborators.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::InvalidConfiguration` if the configuration
    /// fails validation.
    pub fn new(
        config: Configuration,
        provider: Arc<dyn IdentityProvider>,
        role_store: Arc<dyn RoleStore>,
    ) -> Result<Self, ModuleError> {
        config.validate()?;
        let (roles_config, callbacks) = config.into_parts();

        let roles = RolesAdapter::new(&roles_config, role_store);
        let store = Arc::new(StateStore::new(Arc::new(roles_config)));
        let reconciler = RegistrationReconciler::new(roles.clone(), callbacks.clone());
        let checker = RoleChecker::new(roles.clone(), store.clone(), callbacks.clone());
        let lifecycle = Arc::new(AuthLifecycle::new(
            provider,
            store.clone(),
            callbacks,
            reconciler,
        ));

        Ok(Self {
            store,
            roles,
            lifecycle,
            checker,
        })
    }

    /// Starts observing the identity provider.
    ///
    /// # Errors
    ///
    /// See [`AuthLifecycle::initialize`].
    pub fn initialize(&self) -> Result<(), ModuleError> {
        self.lifecycle.initialize()
    }

    /// Signs the current user out.
    pub async fn logout(&self) {
        self.lifecycle.logout().await;
    }

    /// Checks a role for the signed-in account and records the result.
    pub async fn check_role(&self, role: &str) {
        self.checker.check_role(role).await;
    }

    /// Waits for background registration work to finish.
    pub async fn settle(&self) {
        self.lifecycle.settle().await;
    }

    /// Returns the role store adapter, e.g. for administrative operations.
    #[must_use]
    pub fn roles(&self) -> &RolesAdapter {
        &self.roles
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.state() == AuthState::Authenticated
    }

    #[must_use]
    pub fn is_not_authenticated(&self) -> bool {
        self.store.state() == AuthState::NotAuthenticated
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.store.state()
    }

    #[must_use]
    pub fn account(&self) -> Option<Account> {
        self.store.account()
    }

    /// Returns whether the role is granted, or `None` if never checked.
    #[must_use]
    pub fn has_role(&self, role: &str) -> Option<bool> {
        self.store.snapshot().has_role(role)
    }

    /// Returns whether the role is requested, or `None` if unknown.
    #[must_use]
    pub fn is_role_requested(&self, role: &str) -> Option<bool> {
        self.store.snapshot().is_role_requested(role)
    }

    #[must_use]
    pub fn snapshot(&self) -> RolesAuthState {
        self.store.snapshot()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RolesAuthState> {
        self.store.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Callbacks;
    use crate::testing::{CallbackLog, HostEvent, recording_store, roles_config, user};
    use roles_auth_core::{RoleName, Uid};
    use roles_auth_identity::LocalIdentityProvider;
    use roles_auth_roles::{RecordingRoleStore, RoleDefinition, RolesConfiguration, StoreCall};
    use std::collections::BTreeMap;

    fn module(
        provider: &LocalIdentityProvider,
        store: &Arc<RecordingRoleStore>,
        log: &CallbackLog,
    ) -> RolesAuthModule {
        RolesAuthModule::new(
            Configuration::new(roles_config(), log.callbacks()),
            Arc::new(provider.clone()),
            store.clone(),
        )
        .expect("valid module")
    }

    fn admin() -> RoleName {
        RoleName::new("admin").unwrap()
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let result = RolesAuthModule::new(
            Configuration::new(
                RolesConfiguration::new(BTreeMap::<_, RoleDefinition>::new()),
                Callbacks::logging(),
            ),
            Arc::new(LocalIdentityProvider::new()),
            recording_store(),
        );
        let err = result.err().expect("configuration rejected");
        assert_eq!(*err.current_context(), ModuleError::InvalidConfiguration);
    }

    #[tokio::test]
    async fn starts_loading_until_initialized() {
        let provider = LocalIdentityProvider::signed_in(user("u1"));
        let module = module(&provider, &recording_store(), &CallbackLog::default());

        assert_eq!(module.state(), AuthState::Loading);
        assert!(!module.is_authenticated());
        assert!(!module.is_not_authenticated());

        module.initialize().unwrap();

        assert!(module.is_authenticated());
    }

    #[tokio::test]
    async fn sign_in_register_and_check_role() {
        let provider = LocalIdentityProvider::signed_in(user("u1"));
        let store = recording_store();
        let log = CallbackLog::default();
        let module = module(&provider, &store, &log);
        let uid = Uid::new("u1").unwrap();
        store.backing().request_role(&uid, &admin()).await.unwrap();

        module.initialize().unwrap();
        module.settle().await;
        module.check_role("admin").await;

        assert_eq!(
            store.calls(),
            vec![
                StoreCall::UserExists(uid.clone()),
                StoreCall::RegisterUser(module.account().expect("signed in")),
                StoreCall::HasRole(uid.clone(), admin()),
                StoreCall::IsRoleRequestedByUser(uid, admin()),
            ]
        );
        assert_eq!(module.has_role("admin"), Some(false));
        assert_eq!(module.is_role_requested("admin"), Some(true));
        assert_eq!(module.has_role("editor"), None);
        assert_eq!(log.events(), vec![HostEvent::Authenticated("u1".to_string())]);
    }

    #[tokio::test]
    async fn admin_operations_pass_through() {
        let provider = LocalIdentityProvider::signed_in(user("u1"));
        let store = recording_store();
        let module = module(&provider, &store, &CallbackLog::default());
        module.initialize().unwrap();
        module.settle().await;
        let uid = Uid::new("u1").unwrap();

        module.roles().enable_role(&uid, &admin()).await.unwrap();
        module.check_role("admin").await;

        assert_eq!(module.has_role("admin"), Some(true));
        assert_eq!(
            module.roles().get_uids_in_role(&admin()).await.unwrap(),
            vec![uid]
        );
    }

    #[tokio::test]
    async fn full_session_round_trip() {
        let provider = LocalIdentityProvider::new();
        let store = recording_store();
        let log = CallbackLog::default();
        let module = module(&provider, &store, &log);
        module.initialize().unwrap();
        assert!(module.is_not_authenticated());

        provider.sign_in(user("u1"));
        module.settle().await;
        assert!(module.is_authenticated());

        module.logout().await;
        assert!(module.is_not_authenticated());
        assert!(module.account().is_none());

        provider.sign_in(user("u1"));
        module.settle().await;

        assert_eq!(
            store.count(|call| matches!(call, StoreCall::RegisterUser(_))),
            1
        );
        assert!(log.errors().is_empty());
        assert_eq!(
            log.events(),
            vec![
                HostEvent::NotAuthenticated,
                HostEvent::Authenticated("u1".to_string()),
                HostEvent::NotAuthenticated,
                HostEvent::Authenticated("u1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn subscribers_observe_sign_in() {
        let provider = LocalIdentityProvider::new();
        let module = module(&provider, &recording_store(), &CallbackLog::default());
        let mut receiver = module.subscribe();
        module.initialize().unwrap();

        provider.sign_in(user("u1"));

        receiver.changed().await.expect("store alive");
        let snapshot = receiver.borrow_and_update().clone();
        assert!(snapshot.is_authenticated());
        assert_eq!(snapshot.account().map(|a| a.uid().as_str()), Some("u1"));
    }
}
