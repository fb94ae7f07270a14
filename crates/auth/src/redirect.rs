//! Delayed navigation after a successful flow.

use std::sync::Arc;
use std::time::Duration;

/// A navigation the page should perform after a delay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Page to navigate to
    pub target: String,
    /// Delay before navigating
    pub delay: Duration,
}

impl Redirect {
    /// Creates a redirect
    pub fn new(target: impl Into<String>, delay: Duration) -> Self {
        Self {
            target: target.into(),
            delay,
        }
    }
}

/// Navigation primitive supplied by the page
pub trait Navigator: Send + Sync {
    /// Navigates to `target`
    fn navigate(&self, target: &str);
}

/// Schedules a redirect on the current tokio runtime
///
/// Fire-and-forget: the task cannot be cancelled and nobody awaits it. If the
/// runtime shuts down first the navigation never happens.
pub fn schedule_redirect(navigator: Arc<dyn Navigator>, redirect: Redirect) {
    tracing::debug!(
        to = %redirect.target,
        delay_ms = redirect.delay.as_millis() as u64,
        "Scheduling redirect"
    );
    tokio::spawn(async move {
        tokio::time::sleep(redirect.delay).await;
        navigator.navigate(&redirect.target);
    });
}
