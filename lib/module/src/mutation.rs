//! The mutation set of the state store.
//!
//! Mutations are the only way state changes. They can be built directly or
//! decoded from JSON, e.g.
//! `{"type": "set_role", "payload": {"role": "admin", "hasRole": true}}`.
//! Payload fields are camelCase, the same as the account record.

use crate::error::StateError;
use crate::state::{AuthState, RolesAuthState};
use roles_auth_core::{Account, Result, RoleName};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A primitive, synchronous state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Mutation {
    /// Replaces the signed-in account.
    SetAccount(Account),
    /// Clears the signed-in account.
    ResetUser,
    /// Moves to a lifecycle phase.
    SetState { state: AuthState },
    /// Records whether a role is granted.
    #[serde(rename_all = "camelCase")]
    SetRole { role: RoleName, has_role: bool },
    /// Records whether a role is requested.
    #[serde(rename_all = "camelCase")]
    SetRoleRequest {
        role: RoleName,
        is_requesting_role: bool,
    },
}

impl Mutation {
    /// Returns the mutation name used in payloads and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetAccount(_) => "set_account",
            Self::ResetUser => "reset_user",
            Self::SetState { .. } => "set_state",
            Self::SetRole { .. } => "set_role",
            Self::SetRoleRequest { .. } => "set_role_request",
        }
    }

    /// Decodes and validates an untyped mutation.
    ///
    /// # Errors
    ///
    /// Returns `StateError::InvalidPayload` if the value is not a known
    /// mutation or its payload has the wrong shape.
    pub fn from_value(value: JsonValue) -> Result<Self, StateError> {
        let name = value
            .get("type")
            .and_then(JsonValue::as_str)
            .unwrap_or("<missing>")
            .to_string();

        serde_json::from_value(value).map_err(|e| {
            StateError::InvalidPayload {
                mutation: name,
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Applies the mutation without validating the result.
    pub(crate) fn apply(self, state: &mut RolesAuthState) {
        match self {
            Self::SetAccount(account) => state.account = Some(account),
            Self::ResetUser => state.account = None,
            Self::SetState { state: next } => state.state = next,
            Self::SetRole { role, has_role } => {
                state.roles.insert(role, has_role);
            }
            Self::SetRoleRequest {
                role,
                is_requesting_role,
            } => {
                state.role_requests.insert(role, is_requesting_role);
            }
        }
    }
}
