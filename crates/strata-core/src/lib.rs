//! # strata-core
//!
//! Foundation crate for layered temporary tables.
//! Defines the connection trait, errors, config, identifiers, and constants.
//! `strata-storage` and `test-fixtures` depend on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod ident;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{IdentifierPolicy, LayerConfig};
pub use errors::{ConfigError, DriverError, LayerError, LayerResult, StrataErrorCode};
pub use ident::{IdentifierError, TableName};
pub use models::{DropOutcome, ImportMode};
pub use traits::SqlConnection;
