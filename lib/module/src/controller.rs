//! The authentication lifecycle controller.
//!
//! The controller subscribes to the identity provider once and translates
//! provider events into state mutations and host callbacks:
//!
//! - authenticated: store the account, enter `AUTHENTICATED`, start
//!   registration reconciliation in the background, notify the host
//! - not authenticated: enter `NOTAUTHENTICATED`, clear the account, notify
//! - provider error: enter `NOTAUTHENTICATED`, clear the account, report
//!
//! Logout passes through `LOADING` until the provider confirms.

use crate::config::Callbacks;
use crate::error::{ModuleError, StateError};
use crate::reconciler::RegistrationReconciler;
use crate::state::AuthState;
use crate::store::StateStore;
use roles_auth_core::{Account, Result};
use roles_auth_identity::{AuthStateListener, IdentityProvider, UserInfo};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

const SIGN_OUT_ERROR_PREFIX: &str = "Could not sign out: ";

/// Drives the authentication state from identity provider events.
pub struct AuthLifecycle {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<StateStore>,
    callbacks: Callbacks,
    reconciler: RegistrationReconciler,
    initialized: AtomicBool,
    runtime: OnceLock<Handle>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl AuthLifecycle {
    #[must_use]
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<StateStore>,
        callbacks: Callbacks,
        reconciler: RegistrationReconciler,
    ) -> Self {
        Self {
            provider,
            store,
            callbacks,
            reconciler,
            initialized: AtomicBool::new(false),
            runtime: OnceLock::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Subscribes to the identity provider.
    ///
    /// Must be called from within a Tokio runtime; reconciliation tasks are
    /// spawned onto it.
    ///
    /// # Errors
    ///
    /// - `ModuleError::NoRuntime` outside a Tokio runtime
    /// - `ModuleError::AlreadyInitialized` on a second call
    /// - `ModuleError::SubscribeFailed` if the provider refuses the listener
    #[instrument(skip_all)]
    pub fn initialize(self: &Arc<Self>) -> Result<(), ModuleError> {
        let handle = Handle::try_current().map_err(|_| ModuleError::NoRuntime)?;

        if self.initialized.swap(true, Ordering::SeqCst) {
            return Err(ModuleError::AlreadyInitialized.into());
        }
        let _ = self.runtime.set(handle);

        let listener = Arc::new(LifecycleListener {
            lifecycle: Arc::downgrade(self),
        });
        if let Err(report) = self.provider.subscribe(listener) {
            self.initialized.store(false, Ordering::SeqCst);
            return Err(report.context(ModuleError::SubscribeFailed));
        }

        info!("subscribed to identity provider");
        Ok(())
    }

    /// Returns true once `initialize` has succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Signs the current user out.
    ///
    /// The state is `LOADING` until the provider answers. On failure the
    /// phase follows the held account and the error is reported to the host.
    #[instrument(skip_all)]
    pub async fn logout(&self) {
        self.apply(|store| store.set_state(AuthState::Loading));

        match self.provider.sign_out().await {
            Ok(()) => {
                self.apply(|store| store.set_state(AuthState::NotAuthenticated));
                self.apply(StateStore::reset_user);
                info!("signed out");
            }
            Err(report) => {
                let restored = if self.store.account().is_some() {
                    AuthState::Authenticated
                } else {
                    AuthState::NotAuthenticated
                };
                self.apply(|store| store.set_state(restored));

                let reason = report.current_context().to_string();
                warn!(error = %reason, "sign out failed");
                self.callbacks
                    .error(&format!("{SIGN_OUT_ERROR_PREFIX}{reason}"));
            }
        }
    }

    /// Waits for every background task started so far.
    pub async fn settle(&self) {
        loop {
            let tasks = std::mem::take(&mut *self.lock_tasks());
            if tasks.is_empty() {
                return;
            }
            for task in tasks {
                if let Err(e) = task.await {
                    warn!(error = %e, "background task failed");
                }
            }
        }
    }

    fn lock_tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, mutation: impl FnOnce(&StateStore) -> Result<(), StateError>) {
        if let Err(report) = mutation(&self.store) {
            let reason = report.current_context().to_string();
            warn!(error = %reason, "state update failed");
            self.callbacks.error(&reason);
        }
    }

    fn handle_authenticated(&self, user: UserInfo) {
        let account = match user.to_account() {
            Ok(account) => account,
            Err(report) => {
                self.handle_error(report.current_context().to_string());
                return;
            }
        };
        debug!(uid = %account.uid(), "provider reported sign in");

        self.apply(|store| store.set_account(account.clone()));
        self.apply(|store| store.set_state(AuthState::Authenticated));
        self.spawn_reconciliation(account.clone());
        self.callbacks.authenticated(&account);
    }

    fn handle_not_authenticated(&self) {
        debug!("provider reported no user");
        self.apply(|store| store.set_state(AuthState::NotAuthenticated));
        self.apply(StateStore::reset_user);
        self.callbacks.not_authenticated();
    }

    fn handle_error(&self, message: String) {
        warn!(error = %message, "provider reported an error");
        self.apply(|store| store.set_state(AuthState::NotAuthenticated));
        self.apply(StateStore::reset_user);
        self.callbacks.error(&message);
    }

    fn spawn_reconciliation(&self, account: Account) {
        let Some(runtime) = self.runtime.get() else {
            warn!("no runtime available for registration reconciliation");
            return;
        };

        let reconciler = self.reconciler.clone();
        let task = runtime.spawn(async move {
            reconciler.ensure_registered(&account).await;
        });

        let mut tasks = self.lock_tasks();
        tasks.retain(|task| !task.is_finished());
        tasks.push(task);
    }
}

/// Forwards provider events to a controller without keeping it alive.
struct LifecycleListener {
    lifecycle: Weak<AuthLifecycle>,
}

impl AuthStateListener for LifecycleListener {
    fn on_authenticated(&self, user: UserInfo) {
        if let Some(lifecycle) = self.lifecycle.upgrade() {
            lifecycle.handle_authenticated(user);
        }
    }

    fn on_not_authenticated(&self) {
        if let Some(lifecycle) = self.lifecycle.upgrade() {
            lifecycle.handle_not_authenticated();
        }
    }

    fn on_error(&self, message: String) {
        if let Some(lifecycle) = self.lifecycle.upgrade() {
            lifecycle.handle_error(message);
        }
    }
}
