//! Error types for the state module.
//!
//! Errors are designed for layered context using rootcause:
//! - `StateError`: a mutation or payload was rejected by validation
//! - `ModuleError`: construction and lifecycle failures of the module

use std::fmt;

/// Errors from state store mutations.
///
/// These indicate programmer error: a payload outside the declared shape
/// reached the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The mutation would produce an invalid state.
    Rejected { mutation: String, reason: String },
    /// An untyped mutation payload could not be decoded.
    InvalidPayload { mutation: String, reason: String },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { mutation, reason } => {
                write!(f, "mutation '{mutation}' rejected: {reason}")
            }
            Self::InvalidPayload { mutation, reason } => {
                write!(f, "invalid '{mutation}' payload: {reason}")
            }
        }
    }
}

impl std::error::Error for StateError {}

/// Errors from module construction and lifecycle commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    /// The configuration failed validation.
    InvalidConfiguration,
    /// `initialize` was called more than once.
    AlreadyInitialized,
    /// `initialize` was called outside a Tokio runtime.
    NoRuntime,
    /// The identity provider refused the subscription.
    SubscribeFailed,
}

impl fmt::Display for ModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration => write!(f, "invalid roles-auth configuration"),
            Self::AlreadyInitialized => write!(f, "roles-auth module is already initialized"),
            Self::NoRuntime => write!(f, "roles-auth module must be initialized inside a Tokio runtime"),
            Self::SubscribeFailed => write!(f, "failed to subscribe to the identity provider"),
        }
    }
}

impl std::error::Error for ModuleError {}
