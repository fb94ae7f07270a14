//! Storage key namespace.

/// Key holding the serialized user list.
pub const USERS_KEY: &str = "film07_users";

/// Key holding the theme preference.
pub const THEME_KEY: &str = "film07_theme";

/// Prefix of per-email verification code keys.
pub const VERIFICATION_CODE_PREFIX: &str = "temp_verification_code_";

/// Prefix of per-email registration draft keys.
pub const REGISTRATION_DRAFT_PREFIX: &str = "temp_register_data_";

/// Keys written by FILM07.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey<'a> {
    /// The user list.
    Users,
    /// The theme preference.
    Theme,
    /// Pending verification code for an email.
    VerificationCode(&'a str),
    /// Pending registration draft for an email.
    RegistrationDraft(&'a str),
}

impl StorageKey<'_> {
    /// Returns the storage key name.
    pub fn key_name(&self) -> String {
        match self {
            Self::Users => USERS_KEY.to_string(),
            Self::Theme => THEME_KEY.to_string(),
            Self::VerificationCode(email) => format!("{VERIFICATION_CODE_PREFIX}{email}"),
            Self::RegistrationDraft(email) => format!("{REGISTRATION_DRAFT_PREFIX}{email}"),
        }
    }
}

impl std::fmt::Display for StorageKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key_name())
    }
}
