//! Small value types shared between crates.

use std::fmt;

/// How a source table's rows enter the layered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportMode {
    /// Plain `INSERT`; used for the seed table, which has nothing to collide with.
    Insert,
    /// `REPLACE`; rows sharing a primary key are superseded wholesale.
    Replace,
}

impl ImportMode {
    /// The SQL verb that starts the import statement.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Replace => "REPLACE",
        }
    }

    pub fn overwrites(self) -> bool {
        matches!(self, Self::Replace)
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => f.write_str("insert"),
            Self::Replace => f.write_str("replace"),
        }
    }
}

/// Result of a successful drop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The DROP statement ran.
    Dropped,
    /// An earlier call already dropped the table; no SQL was issued.
    AlreadyDropped,
}
