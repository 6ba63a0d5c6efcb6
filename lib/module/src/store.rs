//! The reactive state store.
//!
//! A single `RolesAuthState` lives in a watch channel. Every mutation is
//! applied to a copy of the current snapshot, the copy is validated, and only
//! a valid copy is published. Subscribers are woken when a commit changes
//! the snapshot.

use crate::error::StateError;
use crate::mutation::Mutation;
use crate::state::{AuthState, RolesAuthState};
use roles_auth_core::{Account, Result, RoleName};
use roles_auth_roles::RolesConfiguration;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Holds the module state and applies validated mutations.
pub struct StateStore {
    config: Arc<RolesConfiguration>,
    sender: watch::Sender<RolesAuthState>,
}

impl StateStore {
    /// Creates a store in the initial `Loading` state.
    #[must_use]
    pub fn new(config: Arc<RolesConfiguration>) -> Self {
        let (sender, _) = watch::channel(RolesAuthState::default());
        Self { config, sender }
    }

    /// Applies a mutation if the resulting state is valid.
    ///
    /// Commits are atomic with respect to each other.
    ///
    /// # Errors
    ///
    /// Returns `StateError::Rejected` if the resulting state fails
    /// validation. The store is left unchanged.
    pub fn commit(&self, mutation: Mutation) -> Result<(), StateError> {
        let name = mutation.name();
        let mut rejection = None;

        let changed = self.sender.send_if_modified(|current| {
            let mut next = current.clone();
            mutation.apply(&mut next);
            if let Err(e) = next.validate(&self.config) {
                rejection = Some(e);
                return false;
            }
            let changed = next != *current;
            *current = next;
            changed
        });

        if let Some(e) = rejection {
            warn!(mutation = name, error = %e, "mutation rejected");
            return Err(StateError::Rejected {
                mutation: name.to_string(),
                reason: e.to_string(),
            }
            .into());
        }

        debug!(mutation = name, changed, "mutation committed");
        Ok(())
    }

    /// Replaces the signed-in account.
    pub fn set_account(&self, account: Account) -> Result<(), StateError> {
        self.commit(Mutation::SetAccount(account))
    }

    /// Clears the signed-in account.
    pub fn reset_user(&self) -> Result<(), StateError> {
        self.commit(Mutation::ResetUser)
    }

    /// Moves to a lifecycle phase.
    pub fn set_state(&self, state: AuthState) -> Result<(), StateError> {
        self.commit(Mutation::SetState { state })
    }

    /// Records whether a role is granted.
    pub fn set_role(&self, role: RoleName, has_role: bool) -> Result<(), StateError> {
        self.commit(Mutation::SetRole { role, has_role })
    }

    /// Records whether a role is requested.
    pub fn set_role_request(
        &self,
        role: RoleName,
        is_requesting_role: bool,
    ) -> Result<(), StateError> {
        self.commit(Mutation::SetRoleRequest {
            role,
            is_requesting_role,
        })
    }

    /// Returns a copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> RolesAuthState {
        self.sender.borrow().clone()
    }

    /// Returns the current lifecycle phase.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.sender.borrow().state()
    }

    /// Returns the signed-in account, if any.
    #[must_use]
    pub fn account(&self) -> Option<Account> {
        self.sender.borrow().account().cloned()
    }

    /// Subscribes to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RolesAuthState> {
        self.sender.subscribe()
    }
}
