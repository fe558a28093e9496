//! Tracing setup for the enhancer binary.
//!
//! Per-artifact progress ("enhancing", "is up to date") is emitted at `info`
//! and each replacement step at `debug`. Output goes to stderr so that
//! stdout stays reserved for summaries and JSON reports.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "enhancer=info";

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to [`DEFAULT_FILTER`] if unset.
///
/// # Example
/// ```bash
/// RUST_LOG=enhancer=debug enhancer enhance --output-dir target/classes
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
