//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV;

/// Install the stderr subscriber.
///
/// The filter comes from `SEALPAD_LOG` (default `warn`); `--verbose`
/// forces `debug`.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
