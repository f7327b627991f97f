//! SQL text for every statement a layered table issues.
//!
//! Names are interpolated verbatim; they are expected to have passed
//! [`TableName`] validation (or to come from a trusted caller).

use std::borrow::Cow;

use strata_core::{ImportMode, TableName};

/// `CREATE TEMPORARY TABLE <table> LIKE <template>`
pub fn create_like(table: &TableName, template: &TableName) -> String {
    format!("CREATE TEMPORARY TABLE {table} LIKE {template}")
}

/// `ALTER TABLE <table> ADD COLUMN <column> VARCHAR(<width>) NOT NULL`
pub fn add_origin_column(table: &TableName, column: &str, width: usize) -> String {
    format!("ALTER TABLE {table} ADD COLUMN {column} VARCHAR({width}) NOT NULL")
}

/// `INSERT|REPLACE INTO <table> SELECT <source>.*, '<source>' FROM <source>`
pub fn import(table: &TableName, source: &TableName, mode: ImportMode) -> String {
    format!(
        "{verb} INTO {table} SELECT {source}.*, '{origin}' FROM {source}",
        verb = mode.verb(),
        origin = escape_literal(source.as_str()),
    )
}

/// `DROP TEMPORARY TABLE <table>`
pub fn drop_temporary(table: &TableName) -> String {
    format!("DROP TEMPORARY TABLE {table}")
}

/// Double single quotes so a name is safe inside a string literal.
fn escape_literal(value: &str) -> Cow<'_, str> {
    if value.contains('\'') {
        Cow::Owned(value.replace('\'', "''"))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use strata_core::IdentifierPolicy;

    use super::*;

    fn name(raw: &str) -> TableName {
        TableName::parse(raw, IdentifierPolicy::Trusted).unwrap()
    }

    #[test]
    fn seed_and_layer_statements_differ_only_in_verb() {
        let insert = import(&name("view"), &name("base"), ImportMode::Insert);
        let replace = import(&name("view"), &name("base"), ImportMode::Replace);
        assert_eq!(insert, "INSERT INTO view SELECT base.*, 'base' FROM base");
        assert_eq!(replace, "REPLACE INTO view SELECT base.*, 'base' FROM base");
    }

    #[test]
    fn provenance_literal_escapes_quotes() {
        let sql = import(&name("view"), &name("o'brien"), ImportMode::Insert);
        assert_eq!(sql, "INSERT INTO view SELECT o'brien.*, 'o''brien' FROM o'brien");
    }
}
