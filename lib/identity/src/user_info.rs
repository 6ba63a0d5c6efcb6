//! The identity provider's view of a signed-in user.

use crate::error::ProviderError;
use roles_auth_core::{Account, Result, Uid};
use serde::{Deserialize, Serialize};

/// User info reported by the identity provider on sign-in.
///
/// Fields are raw provider values and are only checked when converted into
/// an [`Account`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Provider-issued unique identifier.
    pub uid: String,
    /// Sign-in method identifier.
    pub provider_id: String,
    /// Display name (optional).
    pub display_name: Option<String>,
    /// Email address (optional).
    pub email: Option<String>,
    /// Phone number (optional). Never stored.
    pub phone_number: Option<String>,
    /// Profile picture URL (optional).
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

impl UserInfo {
    /// Creates user info with only the required fields.
    #[must_use]
    pub fn new(uid: String, provider_id: String) -> Self {
        Self {
            uid,
            provider_id,
            display_name: None,
            email: None,
            phone_number: None,
            photo_url: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: Option<String>) -> Self {
        self.display_name = name;
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone_number(mut self, phone_number: Option<String>) -> Self {
        self.phone_number = phone_number;
        self
    }

    /// Sets the profile picture URL.
    #[must_use]
    pub fn with_photo_url(mut self, photo_url: Option<String>) -> Self {
        self.photo_url = photo_url;
        self
    }

    /// Converts the provider's user info into an account record.
    ///
    /// The phone number is dropped; it is never persisted.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidUserInfo` if the uid or provider id is
    /// not usable.
    pub fn to_account(&self) -> Result<Account, ProviderError> {
        let uid = Uid::new(self.uid.clone()).map_err(|e| ProviderError::InvalidUserInfo {
            reason: e.to_string(),
        })?;

        let account = Account::new(uid, self.provider_id.clone())
            .with_display_name(self.display_name.clone())
            .with_email(self.email.clone())
            .with_photo_url(self.photo_url.clone())
            .without_phone_number();

        account
            .validate()
            .map_err(|e| ProviderError::InvalidUserInfo {
                reason: e.to_string(),
            })?;

        Ok(account)
    }
}
