//! Logging setup for the `assetdiff` binary.
//!
//! Logs go to stderr so stdout carries nothing but reports and listings.

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` is honored when set; otherwise the level is `info`, or `debug`
/// with `--debug`. Calling this twice is harmless.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
