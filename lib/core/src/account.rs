//! The account record mirrored from the identity provider.
//!
//! An `Account` is both the identity held by the state module while a user
//! is signed in and the record written to the role store on first sign-in.
//! Field names follow the role store's document layout.

use crate::error::ValidationError;
use crate::id::Uid;
use serde::{Deserialize, Serialize};

/// Profile data of an authenticated user.
///
/// Accounts are immutable once captured from a provider event; a new
/// sign-in produces a new account that replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Provider-issued unique identifier.
    uid: Uid,
    /// Display name, if the provider has one.
    display_name: Option<String>,
    /// Email address, if the provider has one.
    email: Option<String>,
    /// Identifier of the sign-in method (e.g. "google.com", "password").
    provider_id: String,
    /// Phone number. Cleared before the account is stored.
    phone_number: Option<String>,
    /// Profile picture URL.
    #[serde(rename = "photoURL")]
    photo_url: Option<String>,
}

impl Account {
    /// Creates an account with only the required fields.
    #[must_use]
    pub fn new(uid: Uid, provider_id: impl Into<String>) -> Self {
        Self {
            uid,
            display_name: None,
            email: None,
            provider_id: provider_id.into(),
            phone_number: None,
            photo_url: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
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

    /// Returns a copy of this account without the phone number.
    #[must_use]
    pub fn without_phone_number(mut self) -> Self {
        self.phone_number = None;
        self
    }

    /// Returns the uid.
    #[must_use]
    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    /// Returns the display name, if available.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the email address, if available.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the sign-in method identifier.
    #[must_use]
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Returns the phone number, if set.
    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    /// Returns the profile picture URL, if available.
    #[must_use]
    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    /// Validates the account record shape.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the provider id is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider_id.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "account.providerId".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uid(value: &str) -> Uid {
        Uid::new(value).expect("valid uid")
    }

    #[test]
    fn new_account_has_no_optional_fields() {
        let account = Account::new(uid("u1"), "password");

        assert_eq!(account.uid().as_str(), "u1");
        assert_eq!(account.provider_id(), "password");
        assert!(account.display_name().is_none());
        assert!(account.email().is_none());
        assert!(account.phone_number().is_none());
        assert!(account.photo_url().is_none());
        assert!(account.validate().is_ok());
    }

    #[test]
    fn without_phone_number_keeps_other_fields() {
        let account = Account::new(uid("u1"), "google.com")
            .with_email(Some("a@b.com".to_string()))
            .with_phone_number(Some("+15550100".to_string()))
            .without_phone_number();

        assert_eq!(account.email(), Some("a@b.com"));
        assert!(account.phone_number().is_none());
    }

    #[test]
    fn blank_provider_id_fails_validation() {
        let account = Account::new(uid("u1"), "  ");
        let err = account.validate().unwrap_err();
        assert_eq!(err.field(), "account.providerId");
    }

    #[test]
    fn serializes_with_document_field_names() {
        let account = Account::new(uid("u1"), "google.com")
            .with_display_name(Some("Alice".to_string()))
            .with_photo_url(Some("https://img.example.com/a.png".to_string()));

        let value = serde_json::to_value(&account).expect("serialize");
        assert_eq!(
            value,
            json!({
                "uid": "u1",
                "displayName": "Alice",
                "email": null,
                "providerId": "google.com",
                "phoneNumber": null,
                "photoURL": "https://img.example.com/a.png",
            })
        );
    }

    #[test]
    fn deserialization_rejects_blank_uid() {
        let value = json!({
            "uid": "",
            "displayName": null,
            "email": null,
            "providerId": "password",
            "phoneNumber": null,
            "photoURL": null,
        });
        let result: Result<Account, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }
}
