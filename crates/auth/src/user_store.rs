//! Persisted user list.
//!
//! The list is stored as one JSON array and is loaded and rewritten whole on
//! every access. Nothing is cached between calls.

use storage::{KeyValueStore, StorageError};

use crate::{AuthError, AuthResult, StorageKey, UserRecord};

/// Repository for the user list
#[derive(Debug, Clone)]
pub struct UserStore<S> {
    storage: S,
}

impl<S: KeyValueStore> UserStore<S> {
    /// Creates a user store over a storage backend
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Loads the user list, failing on backend errors or malformed data
    ///
    /// A missing key is an empty list, not an error.
    pub fn try_load_users(&self) -> AuthResult<Vec<UserRecord>> {
        let key = StorageKey::Users.key_name();
        let raw = self
            .storage
            .get(&key)
            .map_err(|e| AuthError::read("users", e))?;

        match raw {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| AuthError::read("users", StorageError::from(e))),
            None => Ok(Vec::new()),
        }
    }

    /// Loads the user list, falling back to an empty list on any failure
    ///
    /// The failure is logged and otherwise swallowed.
    pub fn load_users(&self) -> Vec<UserRecord> {
        self.try_load_users().unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error loading users");
            Vec::new()
        })
    }

    /// Replaces the persisted user list
    ///
    /// On failure the previously persisted list is left as it was. The error
    /// is logged here and also returned.
    pub fn save_users(&self, users: &[UserRecord]) -> AuthResult<()> {
        let result = serde_json::to_string(users)
            .map_err(AuthError::from)
            .and_then(|json| {
                self.storage
                    .set(&StorageKey::Users.key_name(), &json)
                    .map_err(|e| AuthError::persistence("users", e))
            });

        if let Err(e) = &result {
            tracing::error!(error = %e, "Error saving users");
        }
        result
    }

    /// Looks up a user by exact email
    pub fn get_user(&self, email: &str) -> Option<UserRecord> {
        self.load_users().into_iter().find(|u| u.email == email)
    }

    /// Checks if an email is registered
    pub fn contains(&self, email: &str) -> bool {
        self.get_user(email).is_some()
    }
}
