//! Stable string codes for errors, for callers that log or map them.

use super::{ConfigError, LayerError};

pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
pub const CREATION_ERROR: &str = "CREATION_ERROR";
pub const SCHEMA_ERROR: &str = "SCHEMA_ERROR";
pub const IMPORT_ERROR: &str = "IMPORT_ERROR";
pub const CONFIG_NOT_FOUND: &str = "CONFIG_NOT_FOUND";
pub const CONFIG_PARSE_ERROR: &str = "CONFIG_PARSE_ERROR";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

/// Maps an error to a stable code that does not change with message wording.
pub trait StrataErrorCode {
    fn error_code(&self) -> &'static str;
}

impl StrataErrorCode for LayerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => CONFIGURATION_ERROR,
            Self::Creation { .. } => CREATION_ERROR,
            Self::Schema { .. } => SCHEMA_ERROR,
            Self::Import { .. } => IMPORT_ERROR,
        }
    }
}

impl StrataErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => CONFIG_NOT_FOUND,
            Self::ParseError { .. } => CONFIG_PARSE_ERROR,
            Self::ValidationFailed { .. } => CONFIG_INVALID,
        }
    }
}
