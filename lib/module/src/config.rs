//! Module configuration: the roles configuration and host callbacks.

use crate::error::ModuleError;
use roles_auth_core::{Account, Result};
use roles_auth_roles::RolesConfiguration;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

type AuthenticatedFn = dyn Fn(&Account) + Send + Sync;
type NotAuthenticatedFn = dyn Fn() + Send + Sync;
type ErrorFn = dyn Fn(&str) + Send + Sync;

/// Callbacks into the host application.
///
/// Invoked synchronously from lifecycle events and from failed background
/// work; they must not block.
#[derive(Clone)]
pub struct Callbacks {
    on_authenticated: Arc<AuthenticatedFn>,
    on_not_authenticated: Arc<NotAuthenticatedFn>,
    on_error: Arc<ErrorFn>,
}

impl Callbacks {
    /// Creates callbacks from three closures.
    pub fn new(
        on_authenticated: impl Fn(&Account) + Send + Sync + 'static,
        on_not_authenticated: impl Fn() + Send + Sync + 'static,
        on_error: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_authenticated: Arc::new(on_authenticated),
            on_not_authenticated: Arc::new(on_not_authenticated),
            on_error: Arc::new(on_error),
        }
    }

    /// Creates callbacks that only log.
    #[must_use]
    pub fn logging() -> Self {
        Self::new(
            |account| info!(uid = %account.uid(), "authenticated"),
            || info!("not authenticated"),
            |message| warn!(error = message, "roles-auth error"),
        )
    }

    pub(crate) fn authenticated(&self, account: &Account) {
        (self.on_authenticated)(account);
    }

    pub(crate) fn not_authenticated(&self) {
        (self.on_not_authenticated)();
    }

    pub(crate) fn error(&self, message: &str) {
        (self.on_error)(message);
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

/// Configuration of the roles-auth module.
#[derive(Debug, Clone)]
pub struct Configuration {
    roles: RolesConfiguration,
    callbacks: Callbacks,
}

impl Configuration {
    /// Creates a configuration.
    #[must_use]
    pub fn new(roles: RolesConfiguration, callbacks: Callbacks) -> Self {
        Self { roles, callbacks }
    }

    /// Returns the roles configuration.
    #[must_use]
    pub fn roles(&self) -> &RolesConfiguration {
        &self.roles
    }

    /// Returns the host callbacks.
    #[must_use]
    pub fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::InvalidConfiguration` with the roles
    /// configuration error attached as its cause.
    pub fn validate(&self) -> Result<(), ModuleError> {
        self.roles
            .validate()
            .map_err(|report| report.context(ModuleError::InvalidConfiguration))
    }

    pub(crate) fn into_parts(self) -> (RolesConfiguration, Callbacks) {
        (self.roles, self.callbacks)
    }
}
