//! Tracing bootstrap for binaries and tests embedding strata.

use tracing_subscriber::EnvFilter;

use crate::config::LayerConfig;

/// Install a global `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_level`. Returns false if a subscriber was already installed.
pub fn init_tracing(default_level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// [`init_tracing`] with the config's `log_level` as the fallback filter.
pub fn init_tracing_from(config: &LayerConfig) -> bool {
    init_tracing(&config.log_level)
}
