//! Tracing initialization.

use tracing_subscriber::EnvFilter;

use shelf_core::config::ObservabilityConfig;

/// Install the global subscriber.
///
/// `SHELF_LOG` takes precedence over `observability.log_level`. Logs go to
/// stderr so `--json` output on stdout stays machine-readable.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_env("SHELF_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}
