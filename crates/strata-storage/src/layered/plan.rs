//! LayerPlan: everything decided about a layered table before the database
//! is touched. Building a plan is the only place inputs are validated.

use strata_core::{ImportMode, LayerConfig, LayerError, LayerResult, TableName};

use crate::sql;

/// One statement of a construction, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    CreateLike,
    AddOrigin,
    Import { source: TableName, mode: ImportMode },
}

impl PlanStep {
    /// Render this step's SQL for `plan`.
    pub fn sql(&self, plan: &LayerPlan) -> String {
        match self {
            Self::CreateLike => sql::create_like(plan.table(), plan.template()),
            Self::AddOrigin => {
                sql::add_origin_column(plan.table(), plan.origin_column(), plan.origin_width())
            }
            Self::Import { source, mode } => sql::import(plan.table(), source, *mode),
        }
    }
}

/// A validated, side-effect-free description of a layered table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPlan {
    table: TableName,
    sources: Vec<TableName>,
    origin_column: String,
    origin_width: usize,
}

impl LayerPlan {
    /// Validate inputs and fix the provenance width.
    ///
    /// Fails with [`LayerError::Configuration`] when `sources` is empty, when
    /// `config` is invalid, or when a name breaks the identifier policy.
    pub fn new<S: AsRef<str>>(
        table: &str,
        sources: &[S],
        config: &LayerConfig,
    ) -> LayerResult<Self> {
        let reject = |reason: String| LayerError::Configuration {
            table: table.to_string(),
            reason,
        };

        if sources.is_empty() {
            return Err(reject("no source tables given".to_string()));
        }
        config
            .validate()
            .map_err(|e| reject(format!("invalid config: {e}")))?;

        let policy = config.identifier_policy;
        let table_name = TableName::parse(table, policy)
            .map_err(|e| reject(format!("invalid table name: {e}")))?;
        let sources = sources
            .iter()
            .map(|s| {
                TableName::parse(s.as_ref(), policy)
                    .map_err(|e| reject(format!("invalid source table name: {e}")))
            })
            .collect::<LayerResult<Vec<_>>>()?;

        let origin_width = origin_width(&sources, config.min_origin_width);

        Ok(Self {
            table: table_name,
            sources,
            origin_column: config.origin_column.clone(),
            origin_width,
        })
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Source tables in precedence order; the last one wins.
    pub fn sources(&self) -> &[TableName] {
        &self.sources
    }

    /// The source whose structure and primary key the table copies.
    pub fn template(&self) -> &TableName {
        &self.sources[0]
    }

    pub fn origin_column(&self) -> &str {
        &self.origin_column
    }

    pub fn origin_width(&self) -> usize {
        self.origin_width
    }

    /// Steps in execution order: create, add provenance, seed, then layers.
    pub fn steps(&self) -> Vec<PlanStep> {
        let mut steps = Vec::with_capacity(self.sources.len() + 2);
        steps.push(PlanStep::CreateLike);
        steps.push(PlanStep::AddOrigin);
        for (i, source) in self.sources.iter().enumerate() {
            let mode = if i == 0 {
                ImportMode::Insert
            } else {
                ImportMode::Replace
            };
            steps.push(PlanStep::Import {
                source: source.clone(),
                mode,
            });
        }
        steps
    }

    /// All construction SQL in execution order (dry run).
    pub fn statements(&self) -> Vec<String> {
        self.steps().iter().map(|step| step.sql(self)).collect()
    }

    pub fn drop_statement(&self) -> String {
        sql::drop_temporary(&self.table)
    }
}

/// Provenance column width: the longest name in characters, never below `floor`.
pub fn origin_width(names: &[TableName], floor: u16) -> usize {
    names
        .iter()
        .map(TableName::char_len)
        .max()
        .unwrap_or(0)
        .max(usize::from(floor))
}

#[cfg(test)]
mod tests {
    use strata_core::IdentifierPolicy;

    use super::*;

    #[test]
    fn width_is_longest_name() {
        let plan = LayerPlan::new("t", &["a", "bbb"], &LayerConfig::default()).unwrap();
        assert_eq!(plan.origin_width(), 3);
    }

    #[test]
    fn empty_names_fall_back_to_floor() {
        let config = LayerConfig {
            identifier_policy: IdentifierPolicy::Trusted,
            ..LayerConfig::default()
        };
        let plan = LayerPlan::new("t", &["", ""], &config).unwrap();
        assert_eq!(plan.origin_width(), 1);
    }

    #[test]
    fn only_first_import_inserts() {
        let plan = LayerPlan::new("t", &["a", "b", "c"], &LayerConfig::default()).unwrap();
        let modes: Vec<ImportMode> = plan
            .steps()
            .into_iter()
            .filter_map(|step| match step {
                PlanStep::Import { mode, .. } => Some(mode),
                _ => None,
            })
            .collect();
        assert_eq!(
            modes,
            vec![ImportMode::Insert, ImportMode::Replace, ImportMode::Replace]
        );
    }
}
