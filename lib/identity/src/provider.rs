//! The identity provider collaborator.

use crate::error::ProviderError;
use crate::user_info::UserInfo;
use async_trait::async_trait;
use roles_auth_core::Result;
use std::sync::Arc;

/// Receives sign-in state changes from an identity provider.
///
/// Exactly one method is called per provider event. Implementations must
/// not block: they run on whatever thread the provider reports from.
pub trait AuthStateListener: Send + Sync {
    /// A user signed in (or was already signed in at subscription time).
    fn on_authenticated(&self, user: UserInfo);

    /// No user is signed in.
    fn on_not_authenticated(&self);

    /// The provider failed to determine the sign-in state.
    fn on_error(&self, message: String);
}

/// An external identity provider.
///
/// The provider owns all identity verification; this crate only observes it.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Registers a listener for sign-in state changes.
    ///
    /// Providers report the current state to a new listener as soon as it
    /// is known.
    fn subscribe(&self, listener: Arc<dyn AuthStateListener>) -> Result<(), ProviderError>;

    /// Signs the current user out.
    async fn sign_out(&self) -> Result<(), ProviderError>;
}
