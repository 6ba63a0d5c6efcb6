//! Core domain types and utilities for roles-auth.
//!
//! This crate provides the types shared by the identity provider side, the
//! role store side and the state module: the `Result` alias, validated name
//! types and the account record mirrored from the identity provider.

pub mod account;
pub mod error;
pub mod id;

pub use account::Account;
pub use error::{Result, ValidationError};
pub use id::{RoleName, Uid};
