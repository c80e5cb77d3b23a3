//! # Telemetry
//!
//! Tracing subscriber setup for structured logging.

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=till=trace` - Show trace for till crates only
/// - Default: INFO level, till crates at DEBUG, sqlx quieted to WARN
///
/// Safe to call multiple times (subsequent calls are no-ops), so embedding
/// applications and tests can both call it without coordinating.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,till=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
