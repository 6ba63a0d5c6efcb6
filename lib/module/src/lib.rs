//! Authentication and role state for roles-auth host applications.
//!
//! The module observes an [`IdentityProvider`](roles_auth_identity::IdentityProvider)
//! and keeps a validated, observable snapshot of:
//!
//! - the lifecycle phase (`LOADING`, `AUTHENTICATED`, `NOTAUTHENTICATED`)
//! - the signed-in [`Account`](roles_auth_core::Account)
//! - per-role grant and request flags for the roles checked so far
//!
//! Every authenticated identity is registered in the role store in the
//! background the first time it is seen.
//!
//! # Example
//!
//! ```
//! use roles_auth_identity::{LocalIdentityProvider, UserInfo};
//! use roles_auth_module::{Callbacks, Configuration, RolesAuthModule};
//! use roles_auth_roles::{InMemoryRoleStore, RolesConfiguration};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let roles = RolesConfiguration::builder()
//!     .role("admin", &[])
//!     .build()
//!     .expect("valid roles");
//! let store = InMemoryRoleStore::new(roles.clone()).expect("valid roles");
//! let provider = LocalIdentityProvider::new();
//!
//! let module = RolesAuthModule::new(
//!     Configuration::new(roles, Callbacks::logging()),
//!     Arc::new(provider.clone()),
//!     Arc::new(store),
//! )
//! .expect("valid configuration");
//! module.initialize().expect("initialized once");
//! assert!(module.is_not_authenticated());
//!
//! provider.sign_in(UserInfo::new("u1".to_string(), "password".to_string()));
//! module.settle().await;
//! module.check_role("admin").await;
//!
//! assert!(module.is_authenticated());
//! assert_eq!(module.has_role("admin"), Some(false));
//! assert_eq!(module.is_role_requested("admin"), Some(false));
//! # }
//! ```

mod config;
mod controller;
mod error;
mod module;
mod mutation;
mod reconciler;
mod role_check;
mod state;
mod store;

#[cfg(test)]
mod testing;

pub use config::{Callbacks, Configuration};
pub use controller::AuthLifecycle;
pub use error::{ModuleError, StateError};
pub use module::RolesAuthModule;
pub use mutation::Mutation;
pub use reconciler::RegistrationReconciler;
pub use role_check::RoleChecker;
pub use state::{AuthState, RolesAuthState};
pub use store::StateStore;
