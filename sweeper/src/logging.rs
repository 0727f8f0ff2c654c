//! Tracing setup for the sweeper CLI.
//!
//! Per-file decisions are emitted as tracing events: deletions at `info`,
//! skips at `debug`. Output goes to stderr so stdout carries only the summary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the level is `info`, or `debug` when
/// `verbose` is true.
///
/// # Example
/// ```bash
/// RUST_LOG=sweeper=trace sweeper sweep
/// ```
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
