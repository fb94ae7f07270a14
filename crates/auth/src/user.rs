//! User types for authentication

use serde::{Deserialize, Serialize};

/// A stored account
///
/// Serialized with the field names the page has always used
/// (`email`, `password`, `isLoggedIn`) so existing data stays readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Email address, unique and compared case-sensitively
    pub email: String,

    /// Password, stored as entered
    pub password: String,

    /// Whether this is the account with the active session
    #[serde(default)]
    pub is_logged_in: bool,
}

impl UserRecord {
    /// Creates a logged-out record
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            is_logged_in: false,
        }
    }

    /// Sets the session flag
    pub fn logged_in(mut self, is_logged_in: bool) -> Self {
        self.is_logged_in = is_logged_in;
        self
    }

    /// Checks a login attempt against this record
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

/// Account data held between the two registration steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDraft {
    /// Email address being registered
    pub email: String,

    /// Password chosen at the first step
    pub password: String,

    /// Unix timestamp of the first step. Drafts written without it never expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl RegistrationDraft {
    /// Creates a draft stamped with the current time
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            created_at: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// Check if this draft is older than `max_age_secs`
    pub fn is_expired(&self, max_age_secs: i64) -> bool {
        match self.created_at {
            Some(created_at) => chrono::Utc::now().timestamp() - created_at > max_age_secs,
            None => false,
        }
    }

    /// Turns the draft into the committed account, logged in
    pub fn into_user(self) -> UserRecord {
        UserRecord::new(self.email, self.password).logged_in(true)
    }
}
