//! Traits at the seam between strata and the database driver.

pub mod connection;

pub use connection::SqlConnection;
