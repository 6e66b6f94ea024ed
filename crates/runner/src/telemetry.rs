//! Tracing bootstrap shared by the service binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the global tracing subscriber. `RUST_LOG` wins when set;
/// otherwise the configured default level applies. Call once, before any
/// spans are created.
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}
