//! # strata-storage
//!
//! Builds session-scoped temporary tables by layering source tables on top of
//! each other: the first source seeds the table, each later source overwrites
//! rows sharing a primary key, and an added provenance column records which
//! source each row came from.
//!
//! ```ignore
//! let table = LayeredTempTable::create(&conn, "prices_view", &["prices", "prices_patch"])?;
//! // query prices_view through `conn` ...
//! table.close()?;
//! ```

pub mod layered;
pub mod sql;

pub use layered::plan::{origin_width, LayerPlan, PlanStep};
pub use layered::scope::with_layered_table;
pub use layered::LayeredTempTable;
