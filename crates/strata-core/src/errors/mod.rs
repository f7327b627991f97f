//! Error handling for strata.
//! One error enum per concern, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod driver_error;
pub mod error_code;
pub mod layer_error;

pub use config_error::ConfigError;
pub use driver_error::DriverError;
pub use error_code::StrataErrorCode;
pub use layer_error::{LayerError, LayerResult};
