//! Roles configuration.
//!
//! Names the collections of the role store and enumerates the valid role
//! set. Every role name queried anywhere in the workspace must appear here.

use crate::error::ConfigError;
use roles_auth_core::{Result, RoleName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Definition of a single role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Roles whose grants and requests holders of this role may manage.
    #[serde(default)]
    pub manages: Vec<RoleName>,
}

/// Configuration of the role store.
///
/// Fields with defaults can be omitted when loading from a file or the
/// environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolesConfiguration {
    /// Collection holding account records.
    /// Default: "accounts"
    #[serde(default = "default_accounts_collection")]
    accounts_collection: String,
    /// Prefix of each role's grant collection.
    /// Default: "role_"
    #[serde(default = "default_role_collection_prefix")]
    role_collection_prefix: String,
    /// Prefix of each role's request collection.
    /// Default: "rolerequest_"
    #[serde(default = "default_role_requests_collection_prefix")]
    role_requests_collection_prefix: String,
    /// The configured role set.
    roles: BTreeMap<RoleName, RoleDefinition>,
}

fn default_accounts_collection() -> String {
    "accounts".to_string()
}

fn default_role_collection_prefix() -> String {
    "role_".to_string()
}

fn default_role_requests_collection_prefix() -> String {
    "rolerequest_".to_string()
}

impl RolesConfiguration {
    /// Creates a configuration with default collection names.
    #[must_use]
    pub fn new(roles: BTreeMap<RoleName, RoleDefinition>) -> Self {
        Self {
            accounts_collection: default_accounts_collection(),
            role_collection_prefix: default_role_collection_prefix(),
            role_requests_collection_prefix: default_role_requests_collection_prefix(),
            roles,
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> RolesConfigurationBuilder {
        RolesConfigurationBuilder::new()
    }

    /// Returns the accounts collection name.
    #[must_use]
    pub fn accounts_collection(&self) -> &str {
        &self.accounts_collection
    }

    /// Returns the grant collection name for a role.
    #[must_use]
    pub fn role_collection(&self, role: &RoleName) -> String {
        format!("{}{}", self.role_collection_prefix, role)
    }

    /// Returns the request collection name for a role.
    #[must_use]
    pub fn role_requests_collection(&self, role: &RoleName) -> String {
        format!("{}{}", self.role_requests_collection_prefix, role)
    }

    /// Returns the configured roles.
    #[must_use]
    pub fn roles(&self) -> &BTreeMap<RoleName, RoleDefinition> {
        &self.roles
    }

    /// Returns the configured role names in sorted order.
    #[must_use]
    pub fn role_names(&self) -> Vec<RoleName> {
        self.roles.keys().cloned().collect()
    }

    /// Returns true if the role is part of the configured role set.
    #[must_use]
    pub fn contains_role(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a collection name is empty, no role is
    /// configured, or a role manages an unconfigured role.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("accounts_collection", &self.accounts_collection),
            ("role_collection_prefix", &self.role_collection_prefix),
            (
                "role_requests_collection_prefix",
                &self.role_requests_collection_prefix,
            ),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField {
                    field: field.to_string(),
                }
                .into());
            }
        }

        if self.roles.is_empty() {
            return Err(ConfigError::NoRoles.into());
        }

        for (role, definition) in &self.roles {
            if let Some(managed) = definition
                .manages
                .iter()
                .find(|managed| !self.roles.contains_key(*managed))
            {
                return Err(ConfigError::UnknownManagedRole {
                    role: role.to_string(),
                    managed: managed.to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Builder for `RolesConfiguration`.
#[derive(Debug, Default)]
pub struct RolesConfigurationBuilder {
    accounts_collection: Option<String>,
    role_collection_prefix: Option<String>,
    role_requests_collection_prefix: Option<String>,
    roles: Vec<(String, Vec<String>)>,
}

impl RolesConfigurationBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the accounts collection name.
    #[must_use]
    pub fn accounts_collection(mut self, name: &str) -> Self {
        self.accounts_collection = Some(name.to_string());
        self
    }

    /// Sets the grant collection prefix.
    #[must_use]
    pub fn role_collection_prefix(mut self, prefix: &str) -> Self {
        self.role_collection_prefix = Some(prefix.to_string());
        self
    }

    /// Sets the request collection prefix.
    #[must_use]
    pub fn role_requests_collection_prefix(mut self, prefix: &str) -> Self {
        self.role_requests_collection_prefix = Some(prefix.to_string());
        self
    }

    /// Adds a role and the roles it manages.
    #[must_use]
    pub fn role(mut self, name: &str, manages: &[&str]) -> Self {
        self.roles.push((
            name.to_string(),
            manages.iter().map(|m| (*m).to_string()).collect(),
        ));
        self
    }

    /// Builds and validates the `RolesConfiguration`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a role name is invalid or the resulting
    /// configuration fails validation.
    pub fn build(self) -> Result<RolesConfiguration, ConfigError> {
        let mut roles = BTreeMap::new();
        for (name, manages) in self.roles {
            let role = parse_role_name(&name)?;
            let manages = manages
                .iter()
                .map(|m| parse_role_name(m))
                .collect::<Result<Vec<_>, _>>()?;
            roles.insert(role, RoleDefinition { manages });
        }

        let mut config = RolesConfiguration::new(roles);
        if let Some(name) = self.accounts_collection {
            config.accounts_collection = name;
        }
        if let Some(prefix) = self.role_collection_prefix {
            config.role_collection_prefix = prefix;
        }
        if let Some(prefix) = self.role_requests_collection_prefix {
            config.role_requests_collection_prefix = prefix;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_role_name(name: &str) -> Result<RoleName, ConfigError> {
    RoleName::new(name).map_err(|e| {
        ConfigError::InvalidRoleName {
            name: name.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str) -> RoleName {
        RoleName::new(name).expect("valid role")
    }

    #[test]
    fn builder_applies_defaults() {
        let config = RolesConfiguration::builder()
            .role("admin", &["editor"])
            .role("editor", &[])
            .build()
            .expect("valid config");

        assert_eq!(config.accounts_collection(), "accounts");
        assert_eq!(config.role_collection(&role("admin")), "role_admin");
        assert_eq!(
            config.role_requests_collection(&role("editor")),
            "rolerequest_editor"
        );
        assert_eq!(config.role_names(), vec![role("admin"), role("editor")]);
        assert!(config.contains_role("editor"));
        assert!(!config.contains_role("viewer"));
    }

    #[test]
    fn builder_allows_custom_collections() {
        let config = RolesConfiguration::builder()
            .accounts_collection("users")
            .role_collection_prefix("grants_")
            .role_requests_collection_prefix("requests_")
            .role("admin", &[])
            .build()
            .expect("valid config");

        assert_eq!(config.accounts_collection(), "users");
        assert_eq!(config.role_collection(&role("admin")), "grants_admin");
        assert_eq!(config.role_requests_collection(&role("admin")), "requests_admin");
    }

    #[test]
    fn empty_role_set_is_rejected() {
        let err = RolesConfiguration::builder().build().unwrap_err();
        assert!(err.to_string().contains("defines no roles"));
    }

    #[test]
    fn unknown_managed_role_is_rejected() {
        let err = RolesConfiguration::builder()
            .role("admin", &["ghost"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("manages unknown role 'ghost'"));
    }

    #[test]
    fn invalid_role_name_is_rejected() {
        let err = RolesConfiguration::builder()
            .role("team/admin", &[])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("invalid role name"));
    }

    #[test]
    fn empty_prefix_is_rejected() {
        let err = RolesConfiguration::builder()
            .role_collection_prefix("")
            .role("admin", &[])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("role_collection_prefix"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "roles": {
                "admin": { "manages": ["editor"] },
                "editor": {}
            }
        }"#;

        let config: RolesConfiguration = serde_json::from_str(json).expect("deserialize");

        assert!(config.validate().is_ok());
        assert_eq!(config.accounts_collection(), "accounts");
        assert_eq!(config.roles()[&role("admin")].manages, vec![role("editor")]);
        assert!(config.roles()[&role("editor")].manages.is_empty());
    }
}
