//! Authentication error types.

use storage::StorageError;
use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email is already registered.
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Submitted verification code does not match the pending one.
    #[error("Invalid verification code")]
    InvalidCode,

    /// Unknown email or wrong password. Deliberately not distinguished.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The code matched but the draft account data is gone.
    #[error("No pending registration for {0}")]
    MissingPendingRegistration(String),

    /// The pending registration outlived the configured TTL and was removed.
    #[error("Pending registration for {0} expired")]
    PendingRegistrationExpired(String),

    /// A write to the storage backend failed. Prior state is unchanged.
    #[error("Failed to persist {what}: {source}")]
    StoragePersistence {
        what: &'static str,
        #[source]
        source: StorageError,
    },

    /// A read from the storage backend failed or returned malformed data.
    #[error("Failed to read {what}: {source}")]
    StorageRead {
        what: &'static str,
        #[source]
        source: StorageError,
    },

    /// A value could not be encoded before writing.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AuthError {
    /// Creates a persistence error.
    pub fn persistence(what: &'static str, source: impl Into<StorageError>) -> Self {
        Self::StoragePersistence {
            what,
            source: source.into(),
        }
    }

    /// Creates a read error.
    pub fn read(what: &'static str, source: impl Into<StorageError>) -> Self {
        Self::StorageRead {
            what,
            source: source.into(),
        }
    }

    /// Returns true for failures of the storage backend rather than of the
    /// user's input.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::StoragePersistence { .. } | Self::StorageRead { .. } | Self::Serialization(_)
        )
    }

    /// Returns the text shown in the page's status area.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::DuplicateEmail(_) => "Email is already registered. Please sign in.",
            Self::InvalidCode => "Incorrect verification code. Try again.",
            Self::InvalidCredentials => "Incorrect email or password.",
            Self::MissingPendingRegistration(_) => {
                "Registration data was not found. Please register again."
            }
            Self::PendingRegistrationExpired(_) => {
                "The verification code has expired. Please register again."
            }
            Self::StoragePersistence { .. } | Self::Serialization(_) => {
                "Your data could not be saved. Please try again."
            }
            Self::StorageRead { .. } => "Stored data could not be read. Please try again.",
        }
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
