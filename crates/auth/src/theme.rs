//! Light/dark theme preference.

use storage::KeyValueStore;

use crate::{AuthError, AuthResult, StorageKey};

/// Page colour scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemePreference {
    /// Light scheme
    #[default]
    Light,
    /// Dark scheme
    Dark,
}

impl ThemePreference {
    /// Returns the stored string value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parses a stored value. Anything but `dark` is light.
    pub fn from_stored(value: &str) -> Self {
        if value == "dark" {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// Returns the other scheme
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Returns the toggle button label for this scheme
    pub fn label(&self) -> &'static str {
        match self {
            Self::Light => "☀️ Light Mode",
            Self::Dark => "🌙 Dark Mode",
        }
    }
}

impl std::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persists the theme preference under its own key
#[derive(Debug, Clone)]
pub struct ThemeStore<S> {
    storage: S,
}

impl<S: KeyValueStore> ThemeStore<S> {
    /// Creates a theme store over a storage backend
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Loads the preference; missing or unreadable means light
    pub fn load(&self) -> ThemePreference {
        match self.storage.get(&StorageKey::Theme.key_name()) {
            Ok(Some(value)) => ThemePreference::from_stored(&value),
            Ok(None) => ThemePreference::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Error loading theme");
                ThemePreference::default()
            }
        }
    }

    /// Saves a preference
    pub fn save(&self, theme: ThemePreference) -> AuthResult<()> {
        self.storage
            .set(&StorageKey::Theme.key_name(), theme.as_str())
            .map_err(|e| AuthError::persistence("theme", e))
    }

    /// Flips the stored preference and returns the new one
    pub fn toggle(&self) -> AuthResult<ThemePreference> {
        let theme = self.load().toggled();
        self.save(theme)?;
        Ok(theme)
    }
}
