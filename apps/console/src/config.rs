//! Console configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use auth::{DEFAULT_LANDING_PAGE, DEFAULT_REDIRECT_DELAY_MS, FlowConfig};

/// Console configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the JSON file holding the storage namespace.
    pub storage_path: PathBuf,
    /// Delay before the post-success redirect, in milliseconds.
    pub redirect_delay_ms: u64,
    /// Page to land on after success.
    pub landing_page: String,
    /// Maximum age of a pending registration in seconds, if any.
    pub pending_ttl_secs: Option<i64>,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let pending_ttl_secs = match env::var("FILM07_PENDING_TTL_SECS") {
            Ok(v) => {
                let ttl: i64 = v.parse().map_err(|_| {
                    anyhow::anyhow!("FILM07_PENDING_TTL_SECS must be a whole number of seconds")
                })?;
                if ttl < 0 {
                    anyhow::bail!("FILM07_PENDING_TTL_SECS must not be negative");
                }
                Some(ttl)
            }
            Err(_) => None,
        };

        Ok(Self {
            storage_path: env::var("FILM07_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".film07/storage.json")),
            redirect_delay_ms: env::var("FILM07_REDIRECT_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REDIRECT_DELAY_MS),
            landing_page: env::var("FILM07_LANDING_PAGE")
                .unwrap_or_else(|_| DEFAULT_LANDING_PAGE.to_string()),
            pending_ttl_secs,
            log_level: env::var("FILM07_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        })
    }

    /// Returns the flow settings.
    pub fn flow_config(&self) -> FlowConfig {
        let config = FlowConfig::default()
            .with_redirect_delay(Duration::from_millis(self.redirect_delay_ms))
            .with_landing_page(self.landing_page.clone());
        match self.pending_ttl_secs {
            Some(ttl) => config.with_pending_ttl(ttl),
            None => config,
        }
    }
}
