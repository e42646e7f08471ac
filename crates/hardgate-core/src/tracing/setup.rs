//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "HARDGATE_LOG";

/// Initialize the hardgate tracing/logging system.
///
/// Reads `HARDGATE_LOG` for per-subsystem log levels, e.g.
/// `HARDGATE_LOG=hardgate_analysis::patterns=debug,hardgate_analysis::engine=info`.
///
/// Falls back to `hardgate=info` if `HARDGATE_LOG` is not set or is invalid.
/// Idempotent; also tolerates a global subscriber installed by the host.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("hardgate=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
