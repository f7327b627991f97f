//! Layered-table configuration with 3-layer resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_LOG_LEVEL, DEFAULT_MIN_ORIGIN_WIDTH, DEFAULT_ORIGIN_COLUMN,
};
use crate::errors::ConfigError;
use crate::ident::TableName;

/// How table names are checked before they are spliced into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierPolicy {
    /// MySQL unquoted or backtick-quoted names, optionally schema-qualified.
    #[default]
    Strict,
    /// Names are used verbatim; the caller vouches for them.
    Trusted,
}

impl std::str::FromStr for IdentifierPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "trusted" => Ok(Self::Trusted),
            other => Err(format!("unknown identifier policy {other:?}")),
        }
    }
}

/// Configuration for building layered temporary tables.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`STRATA_*`)
/// 2. Project config (`strata.toml` in the given root)
/// 3. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Name of the provenance column.
    pub origin_column: String,
    /// Floor for the provenance VARCHAR width.
    pub min_origin_width: u16,
    pub identifier_policy: IdentifierPolicy,
    /// Default filter for `init_tracing` when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            origin_column: DEFAULT_ORIGIN_COLUMN.to_string(),
            min_origin_width: DEFAULT_MIN_ORIGIN_WIDTH,
            identifier_policy: IdentifierPolicy::Strict,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl LayerConfig {
    /// Load configuration: defaults, then `strata.toml` in `root` if present,
    /// then `STRATA_*` environment variables.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;

        tracing::debug!(
            origin_column = %config.origin_column,
            min_origin_width = config.min_origin_width,
            policy = ?config.identifier_policy,
            "layer config resolved"
        );
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `STRATA_*` overrides. Unset variables leave the value alone.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(column) = std::env::var("STRATA_ORIGIN_COLUMN") {
            self.origin_column = column;
        }
        if let Ok(width) = std::env::var("STRATA_MIN_ORIGIN_WIDTH") {
            self.min_origin_width = width.trim().parse().map_err(|_| {
                ConfigError::ValidationFailed {
                    field: "STRATA_MIN_ORIGIN_WIDTH".to_string(),
                    message: format!("{width:?} is not a width"),
                }
            })?;
        }
        if let Ok(policy) = std::env::var("STRATA_IDENTIFIER_POLICY") {
            self.identifier_policy = policy.parse().map_err(|message| {
                ConfigError::ValidationFailed {
                    field: "STRATA_IDENTIFIER_POLICY".to_string(),
                    message,
                }
            })?;
        }
        if let Ok(level) = std::env::var("STRATA_LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(())
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_origin_width == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "min_origin_width".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        // The column name is spliced into DDL regardless of the table-name policy.
        if let Err(e) = TableName::parse(&self.origin_column, IdentifierPolicy::Strict) {
            return Err(ConfigError::ValidationFailed {
                field: "origin_column".to_string(),
                message: e.to_string(),
            });
        }
        if self.origin_column.contains('.') {
            return Err(ConfigError::ValidationFailed {
                field: "origin_column".to_string(),
                message: "must not be qualified".to_string(),
            });
        }
        Ok(())
    }
}
