//! LayeredTempTable — owns one temporary table built from ordered source
//! tables, drops it once on `close`, `drop_table`, or end of scope.

pub mod plan;
pub mod scope;

use strata_core::{
    DriverError, DropOutcome, LayerConfig, LayerError, LayerResult, SqlConnection, TableName,
};

use self::plan::{LayerPlan, PlanStep};

/// A populated temporary table whose rows are the last-writer-wins merge of
/// its source tables, plus a provenance column naming each row's source.
///
/// The connection is borrowed for the handle's lifetime. The table lives in
/// that connection's session, so query it through the same connection.
pub struct LayeredTempTable<'conn, C: SqlConnection + ?Sized> {
    conn: &'conn C,
    plan: LayerPlan,
    dropped: bool,
}

impl<'conn, C: SqlConnection + ?Sized> LayeredTempTable<'conn, C> {
    /// Build `table` from `sources` with the default config.
    pub fn create<S: AsRef<str>>(
        conn: &'conn C,
        table: &str,
        sources: &[S],
    ) -> LayerResult<Self> {
        Self::create_with_config(conn, table, sources, &LayerConfig::default())
    }

    pub fn create_with_config<S: AsRef<str>>(
        conn: &'conn C,
        table: &str,
        sources: &[S],
        config: &LayerConfig,
    ) -> LayerResult<Self> {
        let plan = LayerPlan::new(table, sources, config)?;
        Self::from_plan(conn, plan)
    }

    /// Execute a prepared plan.
    ///
    /// A failed ALTER drops the fresh table before returning. A failed import
    /// leaves the table and every layer applied so far in the session.
    pub fn from_plan(conn: &'conn C, plan: LayerPlan) -> LayerResult<Self> {
        for step in plan.steps() {
            let sql = step.sql(&plan);
            tracing::debug!(table = %plan.table(), sql = %sql, "executing layer step");
            if let Err(source) = conn.execute(&sql) {
                return Err(step_failed(conn, &plan, step, source));
            }
        }

        tracing::info!(
            table = %plan.table(),
            sources = plan.sources().len(),
            origin_width = plan.origin_width(),
            "layered table ready"
        );
        Ok(Self {
            conn,
            plan,
            dropped: false,
        })
    }

    pub fn name(&self) -> &TableName {
        self.plan.table()
    }

    pub fn sources(&self) -> &[TableName] {
        self.plan.sources()
    }

    pub fn origin_column(&self) -> &str {
        self.plan.origin_column()
    }

    pub fn origin_width(&self) -> usize {
        self.plan.origin_width()
    }

    pub fn plan(&self) -> &LayerPlan {
        &self.plan
    }

    pub fn connection(&self) -> &'conn C {
        self.conn
    }

    pub fn is_dropped(&self) -> bool {
        self.dropped
    }

    /// Drop the temporary table. Repeated calls after a successful drop are
    /// no-ops returning [`DropOutcome::AlreadyDropped`]. A failed drop leaves
    /// the handle armed, so release at end of scope tries once more.
    pub fn drop_table(&mut self) -> Result<DropOutcome, DriverError> {
        if self.dropped {
            tracing::debug!(table = %self.plan.table(), "layered table already dropped");
            return Ok(DropOutcome::AlreadyDropped);
        }
        self.conn.execute(&self.plan.drop_statement())?;
        self.dropped = true;
        tracing::info!(table = %self.plan.table(), "layered table dropped");
        Ok(DropOutcome::Dropped)
    }

    /// Drop the table and consume the handle.
    pub fn close(mut self) -> Result<DropOutcome, DriverError> {
        let outcome = self.drop_table();
        // The caller sees the outcome; release must not retry.
        self.dropped = true;
        outcome
    }
}

impl<C: SqlConnection + ?Sized> Drop for LayeredTempTable<'_, C> {
    fn drop(&mut self) {
        if self.dropped {
            return;
        }
        if let Err(e) = self.drop_table() {
            tracing::warn!(
                table = %self.plan.table(),
                error = %e,
                "failed to drop layered table on release"
            );
        }
    }
}

/// Map a failed step to its error, cleaning up after a failed ALTER.
fn step_failed<C: SqlConnection + ?Sized>(
    conn: &C,
    plan: &LayerPlan,
    step: PlanStep,
    source: DriverError,
) -> LayerError {
    let table = plan.table().to_string();
    tracing::warn!(table = %table, step = ?step, error = %source, "layer step failed");

    match step {
        PlanStep::CreateLike => LayerError::Creation {
            table,
            template: plan.template().to_string(),
            source,
        },
        PlanStep::AddOrigin => {
            if let Err(e) = conn.execute(&plan.drop_statement()) {
                tracing::warn!(
                    table = %table,
                    error = %e,
                    "cleanup drop after failed ALTER failed"
                );
            }
            LayerError::Schema {
                table,
                column: plan.origin_column().to_string(),
                source,
            }
        }
        PlanStep::Import { source: from, mode } => LayerError::Import {
            table,
            source_table: from.to_string(),
            mode,
            source,
        },
    }
}
