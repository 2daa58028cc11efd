#![forbid(unsafe_code)]

//! Optional log output for hosts without their own subscriber.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "CRAFTY_LOG";

/// Install a global fmt subscriber.
///
/// Filter directives are read from [`LOG_ENV`], falling back to
/// `default_filter` (e.g. `"crafty=info"`) when the variable is unset or
/// malformed. Fails if a global subscriber is already installed.
pub fn init(default_filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).try_init()
}
