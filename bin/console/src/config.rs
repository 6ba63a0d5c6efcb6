//! Console configuration.
//!
//! Loaded via the `config` crate from an optional TOML file, overridden by
//! `ROLES_AUTH__*` environment variables (e.g. `ROLES_AUTH__USER__UID`).

use roles_auth_core::RoleName;
use roles_auth_identity::UserInfo;
use roles_auth_roles::{RoleDefinition, RolesConfiguration};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Console configuration.
#[derive(Debug, Deserialize)]
pub struct ConsoleConfig {
    /// Role store configuration.
    #[serde(default = "default_roles")]
    pub roles: RolesConfiguration,

    /// The user signed in by the session.
    #[serde(default)]
    pub user: ScriptedUser,

    /// Roles checked after sign-in.
    #[serde(default = "default_check_roles")]
    pub check_roles: Vec<String>,

    /// Roles granted to the user before the session starts.
    #[serde(default)]
    pub granted_roles: Vec<RoleName>,

    /// Roles requested by the user before the session starts.
    #[serde(default)]
    pub requested_roles: Vec<RoleName>,
}

/// The identity reported by the local provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedUser {
    #[serde(default = "default_uid")]
    pub uid: String,

    #[serde(default = "default_provider_id")]
    pub provider_id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    /// Reported by the provider but never stored.
    #[serde(default)]
    pub phone_number: Option<String>,
}

fn default_roles() -> RolesConfiguration {
    let roles = ["admin", "editor"]
        .into_iter()
        .filter_map(|name| RoleName::new(name).ok())
        .map(|name| (name, RoleDefinition::default()))
        .collect::<BTreeMap<_, _>>();
    RolesConfiguration::new(roles)
}

fn default_check_roles() -> Vec<String> {
    vec!["admin".to_string()]
}

fn default_uid() -> String {
    "demo".to_string()
}

fn default_provider_id() -> String {
    "password".to_string()
}

impl Default for ScriptedUser {
    fn default() -> Self {
        Self {
            uid: default_uid(),
            provider_id: default_provider_id(),
            display_name: None,
            email: None,
            phone_number: None,
        }
    }
}

impl ScriptedUser {
    /// Returns the user as the identity provider reports it.
    #[must_use]
    pub fn to_user_info(&self) -> UserInfo {
        UserInfo::new(self.uid.clone(), self.provider_id.clone())
            .with_display_name(self.display_name.clone())
            .with_email(self.email.clone())
            .with_phone_number(self.phone_number.clone())
    }
}

impl ConsoleConfig {
    /// Loads configuration from an optional TOML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
        }
        builder
            .add_source(
                config::Environment::with_prefix("ROLES_AUTH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
