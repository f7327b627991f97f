//! Shared constants.

/// Name of the provenance column added to every layered table.
pub const DEFAULT_ORIGIN_COLUMN: &str = "origin_table";

/// Smallest VARCHAR width emitted for the provenance column.
/// `VARCHAR(0)` is rejected by most engines.
pub const DEFAULT_MIN_ORIGIN_WIDTH: u16 = 1;

/// Longest identifier part accepted under the strict policy (MySQL limit).
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Project config file looked up by `LayerConfig::load`.
pub const CONFIG_FILE_NAME: &str = "strata.toml";

/// Default log filter used by `init_tracing` when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";
