//! Diagnostic logging to stderr.
//!
//! User-facing output goes to stdout through the commands; everything logged
//! here is for troubleshooting and is filtered by `COSMIC_LOG`.

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Installs the global subscriber. Calling it again is a no-op.
///
/// An unparsable filter falls back to `warn` instead of failing start-up.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(filter),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(data_dir = %config.data_dir.display(), backend = %config.backend, "logging initialized");
    }
}
