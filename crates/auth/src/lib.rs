//! Simulated email/password authentication for FILM07.
//!
//! This crate provides:
//! - A persisted user list and pending registration store over a string
//!   key-value backend
//! - The registration (submit, verify code, commit) and login flow
//! - The light/dark theme preference stored beside them

mod config;
mod error;
mod flow;
mod keys;
mod pending_store;
mod redirect;
mod theme;
mod user;
mod user_store;
mod verification;

pub use config::*;
pub use error::*;
pub use flow::*;
pub use keys::*;
pub use pending_store::*;
pub use redirect::*;
pub use theme::*;
pub use user::*;
pub use user_store::*;
pub use verification::*;

/// Default delay before redirecting after success, in milliseconds.
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 2000;

/// Default page to land on after success.
pub const DEFAULT_LANDING_PAGE: &str = "index.html";
