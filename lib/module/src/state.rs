//! Authentication and role state.

use roles_auth_core::{Account, RoleName, ValidationError};
use roles_auth_roles::RolesConfiguration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Phase of the authentication lifecycle.
///
/// `Loading` is the initial phase and the phase while a logout is in
/// progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthState {
    #[default]
    Loading,
    Authenticated,
    NotAuthenticated,
}

impl AuthState {
    /// Returns the wire name of the phase.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "LOADING",
            Self::Authenticated => "AUTHENTICATED",
            Self::NotAuthenticated => "NOTAUTHENTICATED",
        }
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the module state.
///
/// Only changed through [`Mutation`](crate::Mutation)s committed to the
/// [`StateStore`](crate::StateStore).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RolesAuthState {
    pub(crate) state: AuthState,
    pub(crate) account: Option<Account>,
    pub(crate) roles: BTreeMap<RoleName, bool>,
    pub(crate) role_requests: BTreeMap<RoleName, bool>,
}

impl RolesAuthState {
    /// Returns the lifecycle phase.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Returns the signed-in account, if any.
    #[must_use]
    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    /// Returns the checked roles and whether each is granted.
    #[must_use]
    pub fn roles(&self) -> &BTreeMap<RoleName, bool> {
        &self.roles
    }

    /// Returns the checked, non-granted roles and whether each is requested.
    #[must_use]
    pub fn role_requests(&self) -> &BTreeMap<RoleName, bool> {
        &self.role_requests
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    #[must_use]
    pub fn is_not_authenticated(&self) -> bool {
        self.state == AuthState::NotAuthenticated
    }

    /// Returns whether the role is granted, or `None` if it was never checked.
    #[must_use]
    pub fn has_role(&self, role: &str) -> Option<bool> {
        self.roles.get(role).copied()
    }

    /// Returns whether the role is requested, or `None` if unknown.
    #[must_use]
    pub fn is_role_requested(&self, role: &str) -> Option<bool> {
        self.role_requests.get(role).copied()
    }

    /// Validates the snapshot against the configured role set.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the account is malformed or a role
    /// map holds a role outside the configuration.
    pub fn validate(&self, config: &RolesConfiguration) -> Result<(), ValidationError> {
        if let Some(account) = &self.account {
            account.validate()?;
        }

        for (field, map) in [("roles", &self.roles), ("role_requests", &self.role_requests)] {
            if let Some(role) = map.keys().find(|role| !config.contains_role(role.as_str())) {
                return Err(ValidationError::InvalidValue {
                    field: format!("state.{field}"),
                    reason: format!("role '{role}' is not configured"),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roles_auth_core::Uid;

    fn config() -> RolesConfiguration {
        RolesConfiguration::builder()
            .role("admin", &[])
            .build()
            .expect("valid config")
    }

    #[test]
    fn initial_state_is_loading_and_valid() {
        let state = RolesAuthState::default();
        assert_eq!(state.state(), AuthState::Loading);
        assert!(state.account().is_none());
        assert!(!state.is_authenticated());
        assert!(!state.is_not_authenticated());
        assert!(state.validate(&config()).is_ok());
    }

    #[test]
    fn auth_state_wire_names() {
        assert_eq!(
            serde_json::to_string(&AuthState::NotAuthenticated).unwrap(),
            "\"NOTAUTHENTICATED\""
        );
        let parsed: AuthState = serde_json::from_str("\"AUTHENTICATED\"").unwrap();
        assert_eq!(parsed, AuthState::Authenticated);
        assert_eq!(AuthState::Loading.to_string(), "LOADING");
        assert!(serde_json::from_str::<AuthState>("\"BOGUS\"").is_err());
    }

    #[test]
    fn unconfigured_role_fails_validation() {
        let mut state = RolesAuthState::default();
        state.roles.insert(RoleName::new("ghost").unwrap(), true);

        let err = state.validate(&config()).unwrap_err();
        assert_eq!(err.field(), "state.roles");
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn malformed_account_fails_validation() {
        let state = RolesAuthState {
            account: Some(Account::new(Uid::new("u1").unwrap(), "")),
            ..RolesAuthState::default()
        };
        assert!(state.validate(&config()).is_err());
    }

    #[test]
    fn role_queries_distinguish_unchecked() {
        let mut state = RolesAuthState::default();
        state.roles.insert(RoleName::new("admin").unwrap(), false);
        state.role_requests.insert(RoleName::new("admin").unwrap(), true);

        assert_eq!(state.has_role("admin"), Some(false));
        assert_eq!(state.is_role_requested("admin"), Some(true));
        assert_eq!(state.has_role("editor"), None);
    }
}
