//! Bracketed use of a layered table: build, hand to a closure, drop.

use strata_core::{LayerConfig, LayerResult, SqlConnection};

use super::LayeredTempTable;

/// Build a layered table, run `f` against it, then drop it.
///
/// Construction errors are returned before `f` runs. A failed drop after `f`
/// is logged and does not replace `f`'s value.
pub fn with_layered_table<C, S, F, T>(
    conn: &C,
    table: &str,
    sources: &[S],
    config: &LayerConfig,
    f: F,
) -> LayerResult<T>
where
    C: SqlConnection + ?Sized,
    S: AsRef<str>,
    F: FnOnce(&LayeredTempTable<'_, C>) -> T,
{
    let layered = LayeredTempTable::create_with_config(conn, table, sources, config)?;
    let value = f(&layered);

    let name = layered.name().clone();
    if let Err(e) = layered.close() {
        tracing::warn!(table = %name, error = %e, "failed to drop layered table at end of scope");
    }
    Ok(value)
}
