//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the weave tracing/logging system.
///
/// Reads the `WEAVE_LOG` environment variable for per-subsystem log levels,
/// e.g. `WEAVE_LOG=weave_analysis::scanner=debug,weave_analysis::graph=info`.
/// Falls back to `weave=info` if `WEAVE_LOG` is not set or is invalid.
///
/// Idempotent; calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("WEAVE_LOG").unwrap_or_else(|_| EnvFilter::new("weave=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
