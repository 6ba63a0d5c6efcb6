//! Role checks for the signed-in account.

use crate::config::Callbacks;
use crate::error::StateError;
use crate::store::StateStore;
use roles_auth_core::{RoleName, Uid};
use roles_auth_roles::{RoleStoreError, RolesAdapter};
use rootcause::Report;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

const ROLE_CHECK_ERROR_PREFIX: &str = "Could not check role: ";

/// A failed store query or a rejected state commit.
enum CheckFailure {
    Store(Report<RoleStoreError>),
    State(Report<StateError>),
}

impl From<Report<RoleStoreError>> for CheckFailure {
    fn from(report: Report<RoleStoreError>) -> Self {
        Self::Store(report)
    }
}

impl From<Report<StateError>> for CheckFailure {
    fn from(report: Report<StateError>) -> Self {
        Self::State(report)
    }
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(report) => write!(f, "{}", report.current_context()),
            Self::State(report) => write!(f, "{}", report.current_context()),
        }
    }
}

/// Resolves whether the signed-in account holds or has requested a role.
#[derive(Clone)]
pub struct RoleChecker {
    roles: RolesAdapter,
    store: Arc<StateStore>,
    callbacks: Callbacks,
}

impl RoleChecker {
    #[must_use]
    pub fn new(roles: RolesAdapter, store: Arc<StateStore>, callbacks: Callbacks) -> Self {
        Self {
            roles,
            store,
            callbacks,
        }
    }

    /// Checks a role for the signed-in account and records the result.
    ///
    /// The grant flag is always recorded. The request flag is only queried
    /// and recorded when the role is not granted. Unknown roles, a missing
    /// account and store failures are reported through the error callback.
    #[instrument(skip_all, fields(role = role))]
    pub async fn check_role(&self, role: &str) {
        let role = match self.roles.resolve_role(role) {
            Ok(role) => role,
            Err(report) => {
                self.report(&report.current_context().to_string());
                return;
            }
        };

        let Some(account) = self.store.account() else {
            self.report("no authenticated account");
            return;
        };

        if let Err(failure) = self.resolve(account.uid(), role).await {
            self.report(&failure.to_string());
        }
    }

    async fn resolve(&self, uid: &Uid, role: RoleName) -> std::result::Result<(), CheckFailure> {
        let granted = self.roles.has_role(uid, &role).await?;
        self.store.set_role(role.clone(), granted)?;
        debug!(granted, "role grant recorded");
        if granted {
            return Ok(());
        }

        let requested = self.roles.is_role_requested_by_user(uid, &role).await?;
        self.store.set_role_request(role, requested)?;
        debug!(requested, "role request recorded");
        Ok(())
    }

    fn report(&self, reason: &str) {
        warn!(error = reason, "role check failed");
        self.callbacks
            .error(&format!("{ROLE_CHECK_ERROR_PREFIX}{reason}"));
    }
}
