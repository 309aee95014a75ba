//! # Observability
//!
//! Tracing subscriber setup for binaries. The library itself only emits
//! events; embedding applications install their own subscriber.

use crate::constants::{DEFAULT_LOG_FILTER, VERBOSE_LOG_FILTER};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Install a stderr fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the crate logs at INFO, or at
/// TRACE (every visited entry) when `verbose` is set. If a global subscriber
/// is already installed it is kept and a warning is sent to it.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };

    if let Err(e) = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .try_init()
    {
        warn!("Tracing subscriber init returned error (may already be initialized): {}", e);
    }
}
