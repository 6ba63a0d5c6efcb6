//! Role store and configuration error types.

use std::fmt;

/// Role store errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleStoreError {
    /// No account record exists for the uid.
    AccountNotFound {
        /// The uid that was looked up.
        uid: String,
    },
    /// An account record already exists for the uid.
    AccountExists {
        /// The uid that was registered.
        uid: String,
    },
    /// The role is not part of the configured role set.
    UnknownRole {
        /// The role name.
        role: String,
    },
    /// A record does not have the expected shape.
    InvalidInput {
        /// Error details.
        details: String,
    },
    /// The store request failed.
    RequestFailed {
        /// Error details.
        details: String,
    },
}

impl fmt::Display for RoleStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccountNotFound { uid } => write!(f, "account '{}' not found", uid),
            Self::AccountExists { uid } => write!(f, "account '{}' already exists", uid),
            Self::UnknownRole { role } => {
                write!(f, "role '{}' is not one of the configured roles", role)
            }
            Self::InvalidInput { details } => write!(f, "invalid role store input: {}", details),
            Self::RequestFailed { details } => write!(f, "role store request failed: {}", details),
        }
    }
}

impl std::error::Error for RoleStoreError {}

/// Roles configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A collection name or prefix is empty.
    EmptyField {
        /// The configuration field.
        field: String,
    },
    /// The configuration defines no roles.
    NoRoles,
    /// A role name is not usable as a document id.
    InvalidRoleName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A role manages a role that is not configured.
    UnknownManagedRole {
        /// The managing role.
        role: String,
        /// The missing managed role.
        managed: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "roles configuration: {} is empty", field),
            Self::NoRoles => write!(f, "roles configuration defines no roles"),
            Self::InvalidRoleName { name, reason } => {
                write!(f, "roles configuration: invalid role name '{}': {}", name, reason)
            }
            Self::UnknownManagedRole { role, managed } => write!(
                f,
                "roles configuration: role '{}' manages unknown role '{}'",
                role, managed
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
