//! Diagnostic logging.
//!
//! Logs are written to stderr through `tracing`, leaving stdout for the
//! command summaries printed by [`crate::output`]. The level comes from the
//! `-v` count unless `ARCO_LOG` is set, in which case it is used as an
//! `EnvFilter` directive (`ARCO_LOG=arco::deploy=debug`).

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "ARCO_LOG";

/// Tracing directive for a `-v` count: none → warn, `-v` → info,
/// `-vv` → debug, more → trace.
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}
