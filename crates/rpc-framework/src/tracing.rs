//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging for every service in
//! the process.
//!
//! The framework creates one `rpc` span per request (`service`, `request_no`) and logs
//! service start, per-request failures and shutdown. Clients built on
//! [`ServiceClient`](crate::ServiceClient) add an `invoke` span around each call.
//!
//! ```bash
//! RUST_LOG=info cargo run      # Compact logs
//! RUST_LOG=debug cargo run     # Full payloads
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` is used (e.g. `"info"`).
/// Calling this more than once is harmless, so tests may call it freely.
pub fn setup_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // Don't show module paths - spans carry the service name
        .compact()
        .try_init();
}
