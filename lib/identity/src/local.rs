//! In-process identity provider.
//!
//! `LocalIdentityProvider` behaves like a hosted provider's client SDK from
//! the point of view of its listeners: new subscribers immediately learn the
//! current state, and every sign-in, sign-out or failure is broadcast to all
//! of them. Sign-in itself is driven by the caller.

use crate::error::ProviderError;
use crate::provider::{AuthStateListener, IdentityProvider};
use crate::user_info::UserInfo;
use async_trait::async_trait;
use roles_auth_core::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Default)]
struct LocalState {
    current: Option<UserInfo>,
    listeners: Vec<Arc<dyn AuthStateListener>>,
    sign_out_failure: Option<String>,
}

/// Identity provider driven from the same process.
#[derive(Default, Clone)]
pub struct LocalIdentityProvider {
    state: Arc<Mutex<LocalState>>,
}

impl LocalIdentityProvider {
    /// Creates a provider with no signed-in user.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider with a user already signed in.
    #[must_use]
    pub fn signed_in(user: UserInfo) -> Self {
        let provider = Self::new();
        provider.lock().current = Some(user);
        provider
    }

    fn lock(&self) -> MutexGuard<'_, LocalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> Vec<Arc<dyn AuthStateListener>> {
        self.lock().listeners.clone()
    }

    /// Returns the currently signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserInfo> {
        self.lock().current.clone()
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Signs a user in and notifies every listener.
    pub fn sign_in(&self, user: UserInfo) {
        debug!(uid = %user.uid, "local provider sign in");
        self.lock().current = Some(user.clone());
        for listener in self.listeners() {
            listener.on_authenticated(user.clone());
        }
    }

    /// Reports a provider failure to every listener.
    pub fn fail(&self, message: &str) {
        debug!(error = message, "local provider error");
        for listener in self.listeners() {
            listener.on_error(message.to_string());
        }
    }

    /// Makes the next `sign_out` call fail with the given reason.
    pub fn fail_next_sign_out(&self, reason: &str) {
        self.lock().sign_out_failure = Some(reason.to_string());
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn subscribe(&self, listener: Arc<dyn AuthStateListener>) -> Result<(), ProviderError> {
        let current = {
            let mut state = self.lock();
            state.listeners.push(listener.clone());
            state.current.clone()
        };

        match current {
            Some(user) => listener.on_authenticated(user),
            None => listener.on_not_authenticated(),
        }
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let failure = self.lock().sign_out_failure.take();
        if let Some(reason) = failure {
            return Err(ProviderError::SignOutFailed { reason }.into());
        }

        debug!("local provider sign out");
        self.lock().current = None;
        for listener in self.listeners() {
            listener.on_not_authenticated();
        }
        Ok(())
    }
}
