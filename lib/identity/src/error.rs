//! Error types for the identity crate.

use std::fmt;

/// Errors from identity provider operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Registering the auth state listener failed.
    SubscribeFailed { reason: String },
    /// The provider could not sign the current user out.
    SignOutFailed { reason: String },
    /// The provider reported user info that does not form a valid account.
    InvalidUserInfo { reason: String },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubscribeFailed { reason } => {
                write!(f, "failed to subscribe to auth state: {reason}")
            }
            Self::SignOutFailed { reason } => write!(f, "sign out failed: {reason}"),
            Self::InvalidUserInfo { reason } => write!(f, "invalid user info: {reason}"),
        }
    }
}

impl std::error::Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_out_failed_display() {
        let err = ProviderError::SignOutFailed {
            reason: "network unreachable".to_string(),
        };
        assert!(err.to_string().contains("sign out failed"));
        assert!(err.to_string().contains("network unreachable"));
    }

    #[test]
    fn invalid_user_info_display() {
        let err = ProviderError::InvalidUserInfo {
            reason: "uid must not be empty".to_string(),
        };
        assert_eq!(err.to_string(), "invalid user info: uid must not be empty");
    }
}
