//! Subscriber installation for binaries and long-running monitors.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingYamlConfig;

/// Install the global `tracing` subscriber described by `config`.
///
/// `RUST_LOG` wins over `config.level` when set. Returns `false` when a
/// subscriber was already installed, which is harmless in tests.
pub fn init(config: &LoggingYamlConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true);

    match config.format.as_str() {
        "pretty" => builder.pretty().try_init().is_ok(),
        _ => builder.json().try_init().is_ok(),
    }
}
