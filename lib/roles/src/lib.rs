//! Role store boundary for roles-auth.
//!
//! Roles are granted and requested per account in a remote document store.
//! Each role has its own grant collection and request collection whose names
//! derive from the [`RolesConfiguration`]. This crate defines the store
//! operations as the [`RoleStore`] trait, ships an in-memory implementation
//! and wraps a store together with the configured role set in
//! [`RolesAdapter`].

mod adapter;
mod config;
mod error;
mod memory;
mod recording;
mod store;

pub use adapter::RolesAdapter;
pub use config::{RoleDefinition, RolesConfiguration, RolesConfigurationBuilder};
pub use error::{ConfigError, RoleStoreError};
pub use memory::InMemoryRoleStore;
pub use recording::{RecordingRoleStore, StoreCall};
pub use store::RoleStore;
