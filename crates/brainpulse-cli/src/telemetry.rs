use std::io;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Environment variable holding the log filter directives.
pub(crate) const LOG_ENV: &str = "BRAINPULSE_LOG";

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber, logging to stderr so stdout stays JSON.
///
/// Only the first call takes effect.
pub(crate) fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .try_init()
        .ok();
}
