//! Flow configuration.

use std::time::Duration;

use crate::{DEFAULT_LANDING_PAGE, DEFAULT_REDIRECT_DELAY_MS};

/// Settings for the auth flow controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    /// Delay between a successful flow and the redirect
    pub redirect_delay: Duration,

    /// Page to redirect to after success
    pub landing_page: String,

    /// Maximum age of a pending registration, in seconds. `None` disables expiry.
    pub pending_ttl_secs: Option<i64>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
            landing_page: DEFAULT_LANDING_PAGE.to_string(),
            pending_ttl_secs: None,
        }
    }
}

impl FlowConfig {
    /// Set the redirect delay
    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    /// Set the landing page
    pub fn with_landing_page(mut self, landing_page: impl Into<String>) -> Self {
        self.landing_page = landing_page.into();
        self
    }

    /// Expire pending registrations older than `ttl_secs`
    pub fn with_pending_ttl(mut self, ttl_secs: i64) -> Self {
        self.pending_ttl_secs = Some(ttl_secs);
        self
    }
}
