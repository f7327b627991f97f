//! Errors raised while building a layered temporary table.

use super::DriverError;
use crate::models::ImportMode;

/// Failure of a layered-table construction, tagged by the step that failed.
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    /// Rejected before any SQL was issued.
    #[error("cannot build layered table {table}: {reason}")]
    Configuration { table: String, reason: String },

    #[error("failed to create temporary table {table} like {template}: {source}")]
    Creation {
        table: String,
        template: String,
        source: DriverError,
    },

    /// The CREATEd table has already been dropped (best effort) when this is returned.
    #[error("failed to add column {column} to {table}: {source}")]
    Schema {
        table: String,
        column: String,
        source: DriverError,
    },

    /// Layers imported before `source_table` remain applied.
    #[error("failed to import {source_table} into {table} ({mode}): {source}")]
    Import {
        table: String,
        source_table: String,
        mode: ImportMode,
        source: DriverError,
    },
}

pub type LayerResult<T> = Result<T, LayerError>;

impl LayerError {
    /// Name of the layered table this error concerns.
    pub fn table(&self) -> &str {
        match self {
            Self::Configuration { table, .. }
            | Self::Creation { table, .. }
            | Self::Schema { table, .. }
            | Self::Import { table, .. } => table,
        }
    }

    /// The source table whose import failed, for `Import` errors.
    pub fn source_table(&self) -> Option<&str> {
        match self {
            Self::Import { source_table, .. } => Some(source_table),
            _ => None,
        }
    }

    /// The driver detail behind the failure, if a statement was executed.
    pub fn driver_error(&self) -> Option<&DriverError> {
        match self {
            Self::Configuration { .. } => None,
            Self::Creation { source, .. }
            | Self::Schema { source, .. }
            | Self::Import { source, .. } => Some(source),
        }
    }
}
