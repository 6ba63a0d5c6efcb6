//! Identity provider boundary for roles-auth.
//!
//! This crate provides:
//! - The `IdentityProvider` trait: subscribe to sign-in state, sign out
//! - The `AuthStateListener` trait receiving provider events
//! - `UserInfo`, the provider's view of a signed-in user
//! - `LocalIdentityProvider`, an in-process provider for tests and tools
//!
//! # Example
//!
//! ```
//! use roles_auth_identity::UserInfo;
//!
//! let info = UserInfo::new("u1".to_string(), "google.com".to_string())
//!     .with_email(Some("alice@example.com".to_string()))
//!     .with_phone_number(Some("+15550100".to_string()));
//!
//! let account = info.to_account().expect("valid user info");
//! assert_eq!(account.uid().as_str(), "u1");
//! assert!(account.phone_number().is_none());
//! ```

pub mod error;
pub mod local;
pub mod provider;
pub mod user_info;

pub use error::ProviderError;
pub use local::LocalIdentityProvider;
pub use provider::{AuthStateListener, IdentityProvider};
pub use user_info::UserInfo;
