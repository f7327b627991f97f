//! Configuration for strata.
//! TOML-based, 3-layer resolution: env > project > defaults.

pub mod layer_config;

pub use layer_config::{IdentifierPolicy, LayerConfig};
