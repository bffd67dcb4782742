//! Logging initialization.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber from the configured filter.
pub fn init_logging(rust_log: &str) {
    let filter = EnvFilter::try_new(rust_log).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
