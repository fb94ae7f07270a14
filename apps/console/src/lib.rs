//! FILM07 auth console
//!
//! A terminal stand-in for the browser auth page. It renders the flow
//! controller's stage, feeds it form submissions typed on stdin, and performs
//! the delayed redirect after a successful login or registration.

pub mod config;
pub mod page;

/// Initializes tracing with the given log level.
///
/// Logs go to stderr so they don't interleave with the rendered page.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
