//! Pending registration storage
//!
//! Between the two registration steps the verification code and the draft
//! account are kept under two separate per-email keys. A new first step for
//! the same email overwrites both.

use storage::KeyValueStore;

use crate::{AuthError, AuthResult, RegistrationDraft, StorageKey, VerificationCode};

/// Repository for pending registrations
#[derive(Debug, Clone)]
pub struct PendingRegistrationStore<S> {
    storage: S,
}

impl<S: KeyValueStore> PendingRegistrationStore<S> {
    /// Create a pending registration store over a storage backend
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Store the code and draft for `draft.email`, replacing any earlier attempt
    ///
    /// The old code is dropped first and the new one written last, so a
    /// failed write never leaves a code that confirms the wrong draft.
    pub fn put(&self, draft: &RegistrationDraft, code: &VerificationCode) -> AuthResult<()> {
        let email = draft.email.as_str();
        let json = serde_json::to_string(draft)?;
        let code_key = StorageKey::VerificationCode(email).key_name();

        self.storage
            .remove(&code_key)
            .map_err(|e| AuthError::persistence("verification code", e))?;
        self.storage
            .set(&StorageKey::RegistrationDraft(email).key_name(), &json)
            .map_err(|e| AuthError::persistence("registration draft", e))?;
        self.storage
            .set(&code_key, code.as_str())
            .map_err(|e| AuthError::persistence("verification code", e))?;

        tracing::debug!(email, "Stored pending registration");
        Ok(())
    }

    /// Retrieve the pending code for an email
    pub fn code(&self, email: &str) -> AuthResult<Option<VerificationCode>> {
        let code = self
            .storage
            .get(&StorageKey::VerificationCode(email).key_name())
            .map_err(|e| AuthError::read("verification code", e))?;
        Ok(code.map(VerificationCode::from_stored))
    }

    /// Retrieve the pending draft for an email
    pub fn draft(&self, email: &str) -> AuthResult<Option<RegistrationDraft>> {
        let raw = self
            .storage
            .get(&StorageKey::RegistrationDraft(email).key_name())
            .map_err(|e| AuthError::read("registration draft", e))?;

        raw.map(|json| {
            serde_json::from_str(&json).map_err(|e| AuthError::read("registration draft", e))
        })
        .transpose()
    }

    /// Remove both entries for an email
    pub fn clear(&self, email: &str) -> AuthResult<()> {
        self.storage
            .remove(&StorageKey::VerificationCode(email).key_name())
            .map_err(|e| AuthError::persistence("verification code", e))?;
        self.storage
            .remove(&StorageKey::RegistrationDraft(email).key_name())
            .map_err(|e| AuthError::persistence("registration draft", e))?;
        Ok(())
    }

    /// Remove the pending registration for an email if its draft is older
    /// than `max_age_secs`
    ///
    /// Returns true if something was removed.
    pub fn remove_if_expired(&self, email: &str, max_age_secs: i64) -> AuthResult<bool> {
        match self.draft(email)? {
            Some(draft) if draft.is_expired(max_age_secs) => {
                self.clear(email)?;
                tracing::debug!(email, "Removed expired pending registration");
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::MemoryStore;

    #[test]
    fn test_pending_store_basic_operations() {
        let store = PendingRegistrationStore::new(MemoryStore::new());
        let draft = RegistrationDraft::new("a@x.com", "p1");
        let code = VerificationCode::from_stored("123456");

        store.put(&draft, &code).unwrap();
        assert_eq!(store.code("a@x.com").unwrap(), Some(code));
        assert_eq!(store.draft("a@x.com").unwrap(), Some(draft));

        store.clear("a@x.com").unwrap();
        assert!(store.code("a@x.com").unwrap().is_none());
        assert!(store.draft("a@x.com").unwrap().is_none());
    }

    #[test]
    fn test_put_overwrites_previous_attempt() {
        let store = PendingRegistrationStore::new(MemoryStore::new());
        store
            .put(
                &RegistrationDraft::new("a@x.com", "old"),
                &VerificationCode::from_stored("111111"),
            )
            .unwrap();
        store
            .put(
                &RegistrationDraft::new("a@x.com", "new"),
                &VerificationCode::from_stored("222222"),
            )
            .unwrap();

        assert_eq!(store.code("a@x.com").unwrap().unwrap().as_str(), "222222");
        assert_eq!(store.draft("a@x.com").unwrap().unwrap().password, "new");
    }

    #[test]
    fn test_failed_put_leaves_no_stale_code() {
        // Fits one short attempt but not a second, longer draft next to it
        let store = PendingRegistrationStore::new(MemoryStore::with_quota(120));
        let old = RegistrationDraft {
            email: "a@x.com".to_string(),
            password: "old".to_string(),
            created_at: None,
        };
        store
            .put(&old, &VerificationCode::from_stored("111111"))
            .unwrap();

        let new = RegistrationDraft::new("a@x.com", "n".repeat(100));
        let err = store
            .put(&new, &VerificationCode::from_stored("222222"))
            .unwrap_err();
        assert!(matches!(err, AuthError::StoragePersistence { .. }));

        // Neither code can confirm anything now
        assert!(store.code("a@x.com").unwrap().is_none());
        assert_eq!(store.draft("a@x.com").unwrap(), Some(old));
    }

    #[test]
    fn test_uses_legacy_key_layout() {
        let backend = MemoryStore::new();
        backend
            .set("temp_verification_code_a@x.com", "654321")
            .unwrap();
        backend
            .set(
                "temp_register_data_a@x.com",
                r#"{"email":"a@x.com","password":"p1"}"#,
            )
            .unwrap();

        let store = PendingRegistrationStore::new(backend);
        assert_eq!(store.code("a@x.com").unwrap().unwrap().as_str(), "654321");
        let draft = store.draft("a@x.com").unwrap().unwrap();
        assert_eq!(draft.password, "p1");
        assert_eq!(draft.created_at, None);
    }

    #[test]
    fn test_pending_store_cleanup() {
        let store = PendingRegistrationStore::new(MemoryStore::new());

        let mut old = RegistrationDraft::new("old@x.com", "p");
        old.created_at = Some(chrono::Utc::now().timestamp() - 1000);
        let fresh = RegistrationDraft::new("fresh@x.com", "p");
        let code = VerificationCode::from_stored("123456");

        store.put(&old, &code).unwrap();
        store.put(&fresh, &code).unwrap();

        assert!(store.remove_if_expired("old@x.com", 600).unwrap());
        assert!(!store.remove_if_expired("fresh@x.com", 600).unwrap());
        assert!(!store.remove_if_expired("nobody@x.com", 600).unwrap());

        assert!(store.code("old@x.com").unwrap().is_none());
        assert!(store.code("fresh@x.com").unwrap().is_some());
    }
}
