//! The one capability strata consumes from a database driver.

use crate::errors::DriverError;

/// A synchronous connection able to run raw SQL.
///
/// Temporary tables are session-scoped, so every statement for one layered
/// table must go through the same connection. Implementors are not required
/// to be thread-safe; callers serialise access.
pub trait SqlConnection {
    /// Execute one statement, blocking until the driver answers.
    fn execute(&self, sql: &str) -> Result<(), DriverError>;
}

impl<C: SqlConnection + ?Sized> SqlConnection for &C {
    fn execute(&self, sql: &str) -> Result<(), DriverError> {
        (**self).execute(sql)
    }
}

impl<C: SqlConnection + ?Sized> SqlConnection for Box<C> {
    fn execute(&self, sql: &str) -> Result<(), DriverError> {
        (**self).execute(sql)
    }
}
