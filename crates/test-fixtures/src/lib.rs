//! Test fixtures for strata: an in-memory SQLite session that speaks the
//! statements a layered table issues.
//!
//! SQLite runs INSERT/REPLACE ... SELECT natively. Three statement shapes it
//! lacks are mapped before execution:
//!
//! - `CREATE TEMPORARY TABLE t LIKE s` copies `s`'s DDL from the schema table
//! - `ALTER TABLE t ADD COLUMN c ... NOT NULL` gets a `DEFAULT ''`
//! - `DROP TEMPORARY TABLE t` becomes `DROP TABLE temp.t`
//!
//! Every statement is logged verbatim before mapping, and statements can be
//! made to fail by prefix.

use std::cell::RefCell;

use rusqlite::{Connection, OptionalExtension};
use strata_core::{DriverError, SqlConnection};

/// MySQL's "table doesn't exist" code, reported for a missing LIKE template.
pub const NO_SUCH_TABLE: i32 = 1146;

/// Code reported by injected failures.
pub const INJECTED_FAILURE: i32 = 9999;

/// One row of a fixture table read back from a layered table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayeredRow {
    pub id: i64,
    pub value: String,
    pub origin: String,
}

impl LayeredRow {
    pub fn new(id: i64, value: &str, origin: &str) -> Self {
        Self {
            id,
            value: value.to_string(),
            origin: origin.to_string(),
        }
    }
}

struct FailureRule {
    prefix: String,
    error: DriverError,
}

/// A single SQLite connection standing in for a database session.
pub struct SqliteSession {
    conn: Connection,
    log: RefCell<Vec<String>>,
    failures: RefCell<Vec<FailureRule>>,
}

impl SqliteSession {
    /// Open a fresh in-memory session.
    ///
    /// # Panics
    /// Panics if SQLite cannot open an in-memory database.
    pub fn open() -> Self {
        let conn = Connection::open_in_memory()
            .unwrap_or_else(|e| panic!("Failed to open in-memory SQLite: {e}"));
        Self {
            conn,
            log: RefCell::new(Vec::new()),
            failures: RefCell::new(Vec::new()),
        }
    }

    /// The raw connection, for assertions that bypass the statement log.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create `name (id INTEGER PRIMARY KEY, v TEXT NOT NULL)` holding `rows`.
    /// Not recorded in the statement log.
    pub fn create_source(&self, name: &str, rows: &[(i64, &str)]) {
        self.conn
            .execute_batch(&format!(
                "CREATE TABLE {name} (id INTEGER PRIMARY KEY, v TEXT NOT NULL)"
            ))
            .unwrap_or_else(|e| panic!("Failed to create source table {name}: {e}"));
        for (id, v) in rows {
            self.conn
                .execute(
                    &format!("INSERT INTO {name} (id, v) VALUES (?1, ?2)"),
                    rusqlite::params![id, v],
                )
                .unwrap_or_else(|e| panic!("Failed to insert into {name}: {e}"));
        }
    }

    /// Make every later statement starting with `prefix` fail.
    pub fn fail_on(&self, prefix: &str) {
        self.failures.borrow_mut().push(FailureRule {
            prefix: prefix.to_string(),
            error: DriverError::with_code(
                INJECTED_FAILURE,
                format!("injected failure for {prefix:?}"),
            ),
        });
    }

    pub fn clear_failures(&self) {
        self.failures.borrow_mut().clear();
    }

    /// Statements received through [`SqlConnection::execute`], in order.
    pub fn statements(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn clear_statements(&self) {
        self.log.borrow_mut().clear();
    }

    /// Rows of a layered fixture table, ordered by id.
    pub fn rows(&self, table: &str) -> Vec<LayeredRow> {
        self.rows_with_origin(table, "origin_table")
    }

    pub fn rows_with_origin(&self, table: &str, origin_column: &str) -> Vec<LayeredRow> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT id, v, {origin_column} FROM {table} ORDER BY id"))
            .unwrap_or_else(|e| panic!("Failed to query {table}: {e}"));
        let rows: Vec<LayeredRow> = stmt
            .query_map([], |row| {
                Ok(LayeredRow {
                    id: row.get(0)?,
                    value: row.get(1)?,
                    origin: row.get(2)?,
                })
            })
            .and_then(|rows| rows.collect())
            .unwrap_or_else(|e| panic!("Failed to read rows of {table}: {e}"));
        rows
    }

    pub fn temp_table_exists(&self, name: &str) -> bool {
        self.conn
            .query_row(
                "SELECT 1 FROM sqlite_temp_master WHERE type = 'table' AND name = ?1",
                [name],
                |_| Ok(()),
            )
            .optional()
            .unwrap_or_else(|e| panic!("Failed to inspect temp schema: {e}"))
            .is_some()
    }

    /// Declared type of `column` on temp table `table`, e.g. `VARCHAR(3)`.
    pub fn temp_column_type(&self, table: &str, column: &str) -> Option<String> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA temp.table_info({table})"))
            .unwrap_or_else(|e| panic!("Failed to read table_info of {table}: {e}"));
        let columns: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(1)?, row.get(2)?)))
            .and_then(|rows| rows.collect())
            .unwrap_or_else(|e| panic!("Failed to read table_info of {table}: {e}"));
        columns
            .into_iter()
            .find(|(name, _)| name == column)
            .map(|(_, ty)| ty)
    }

    fn injected_failure(&self, sql: &str) -> Option<DriverError> {
        self.failures
            .borrow()
            .iter()
            .find(|rule| sql.starts_with(&rule.prefix))
            .map(|rule| rule.error.clone())
    }

    fn translate(&self, sql: &str) -> Result<String, DriverError> {
        let tokens: Vec<&str> = sql.split_whitespace().collect();
        match tokens.as_slice() {
            ["CREATE", "TEMPORARY", "TABLE", table, "LIKE", template] => {
                self.create_like(table, template)
            }
            ["DROP", "TEMPORARY", "TABLE", table] => Ok(format!("DROP TABLE temp.{table}")),
            ["ALTER", "TABLE", .., "NOT", "NULL"] => Ok(format!("{sql} DEFAULT ''")),
            _ => Ok(sql.to_string()),
        }
    }

    fn create_like(&self, table: &str, template: &str) -> Result<String, DriverError> {
        let ddl: Option<String> = self
            .conn
            .query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1
                 UNION ALL
                 SELECT sql FROM sqlite_temp_master WHERE type = 'table' AND name = ?1",
                [unquote(template)],
                |row| row.get(0),
            )
            .optional()
            .map_err(to_driver_error)?;
        let ddl = ddl.ok_or_else(|| {
            DriverError::with_code(NO_SUCH_TABLE, format!("Table '{template}' doesn't exist"))
        })?;
        let body = ddl
            .find('(')
            .map(|at| &ddl[at..])
            .ok_or_else(|| DriverError::new(format!("unreadable DDL for {template}: {ddl}")))?;
        Ok(format!("CREATE TEMP TABLE {table} {body}"))
    }
}

impl Default for SqliteSession {
    fn default() -> Self {
        Self::open()
    }
}

impl SqlConnection for SqliteSession {
    fn execute(&self, sql: &str) -> Result<(), DriverError> {
        self.log.borrow_mut().push(sql.to_string());
        if let Some(error) = self.injected_failure(sql) {
            tracing::debug!(sql = %sql, "injected failure");
            return Err(error);
        }
        let mapped = self.translate(sql)?;
        self.conn.execute_batch(&mapped).map_err(to_driver_error)
    }
}

/// Strip backtick quoting from each dot-separated part: `` `a``b` `` -> ``a`b``.
fn unquote(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    let mut quoted = false;
    while let Some(ch) = chars.next() {
        match ch {
            '`' if quoted && chars.peek() == Some(&'`') => {
                chars.next();
                out.push('`');
            }
            '`' => quoted = !quoted,
            _ => out.push(ch),
        }
    }
    out
}

fn to_driver_error(e: rusqlite::Error) -> DriverError {
    match &e {
        rusqlite::Error::SqliteFailure(failure, _) => {
            DriverError::with_code(failure.extended_code, e.to_string())
        }
        _ => DriverError::new(e.to_string()),
    }
}
