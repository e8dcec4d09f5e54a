//! Engine: validate a dataset once, then evaluate logical plans over it.
//!
//! Evaluation is a post-order walk of the plan tree. Each non-scan node is
//! bound to its physical operator, which first derives the output schema
//! (rejecting unknown or duplicate columns) and then transforms the fully
//! materialised child batches. Scans read the engine's immutable tables.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use marquee_core::config::EngineConfig;
use marquee_core::dag::LogicalPlan;
use marquee_core::hash::{hash_serde, Hash256};
use marquee_core::manifest::RunManifest;
use marquee_core::model::{Dataset, TABLES};
use marquee_core::schema::Schema;
use marquee_core::types::RowBatch;

use marquee_operators::aggregate::Aggregate;
use marquee_operators::alias::Alias;
use marquee_operators::filter::Filter;
use marquee_operators::join::hash::HashJoin;
use marquee_operators::project::Project;
use marquee_operators::sort::Sort;
use marquee_operators::{OpError, Operator};

use crate::error::ExecError;
use crate::queries::Queries;
use crate::result::ResultSet;

/// Read-only query engine over one dataset snapshot.
///
/// Query methods take `&self`; the engine is `Send + Sync` and can be
/// shared between threads without locking.
#[derive(Debug)]
pub struct Engine {
    cfg: EngineConfig,
    tables: HashMap<String, RowBatch>,
    dataset_hash: Hash256,
}

impl Engine {
    /// Build an engine over `dataset` with the default configuration.
    pub fn new(dataset: Dataset) -> Result<Self, ExecError> {
        Self::with_config(dataset, EngineConfig::default())
    }

    /// Build an engine; fails with `ExecError::Dataset` if any integrity
    /// check fails.
    pub fn with_config(dataset: Dataset, cfg: EngineConfig) -> Result<Self, ExecError> {
        cfg.validate()?;

        let problems = dataset.problems();
        if let Some(first) = problems.into_iter().next() {
            warn!(error = %first, "dataset failed integrity checks");
            return Err(ExecError::Dataset(first));
        }

        let dataset_hash = dataset
            .fingerprint()
            .map_err(|e| ExecError::Hash(e.to_string()))?;

        let mut tables = HashMap::with_capacity(TABLES.len());
        for table in TABLES {
            let batch = dataset
                .to_batch(table)
                .ok_or_else(|| ExecError::Invalid(format!("no batch for base table '{}'", table)))?;
            tables.insert(table.to_string(), batch);
        }

        info!(
            movies = dataset.movies.len(),
            actors = dataset.actors.len(),
            castings = dataset.castings.len(),
            dataset = %dataset_hash.short(),
            "engine ready"
        );

        Ok(Self {
            cfg,
            tables,
            dataset_hash,
        })
    }

    /// Load the dataset named by `cfg` (directory + format) and build an
    /// engine over it.
    pub fn from_config(cfg: EngineConfig) -> Result<Self, ExecError> {
        cfg.validate()?;
        let dataset = marquee_io::load_dataset(&cfg.data_dir, cfg.format)?;
        Self::with_config(dataset, cfg)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn dataset_hash(&self) -> Hash256 {
        self.dataset_hash
    }

    pub fn queries(&self) -> Queries<'_> {
        Queries::new(self)
    }

    /// Stable fingerprint of a plan's serde form.
    pub fn plan_hash(plan: &LogicalPlan) -> Result<Hash256, ExecError> {
        hash_serde(plan).map_err(|e| ExecError::Hash(e.to_string()))
    }

    /// Output schema of `plan` without evaluating it.
    pub fn output_schema(&self, plan: &LogicalPlan) -> Result<Schema, ExecError> {
        if let LogicalPlan::Scan { table, schema } = plan {
            self.check_scan(table, schema)?;
            return Ok(schema.clone());
        }
        let op = operator_for(plan)?;
        let schemas = plan
            .children()
            .into_iter()
            .map(|child| self.output_schema(child))
            .collect::<Result<Vec<_>, _>>()?;
        let context = format!("operator '{}' (planning)", op.name());
        op.plan(&schemas).map_err(|e| op_failure(e, &context))
    }

    /// Evaluate `plan` to completion.
    pub fn execute(&self, plan: &LogicalPlan) -> Result<ResultSet, ExecError> {
        let (schema, batch) = self.eval(plan)?;
        Ok(ResultSet::new(schema, batch))
    }

    /// Evaluate `plan` and return a manifest describing the run.
    pub fn run(
        &self,
        plan: &LogicalPlan,
        label: &str,
    ) -> Result<(ResultSet, RunManifest), ExecError> {
        let plan_hash = Self::plan_hash(plan)?;
        let manifest = RunManifest::new(label, plan_hash, self.dataset_hash, now_millis());
        let result = self.execute(plan)?;
        let manifest = manifest.finish(now_millis(), result.len());
        info!(
            query = label,
            plan = %plan_hash.short(),
            rows = manifest.rows,
            ms = manifest.duration_ms(),
            "query finished"
        );
        Ok((result, manifest))
    }

    fn check_scan(&self, table: &str, schema: &Schema) -> Result<(), ExecError> {
        let expected = Dataset::table_schema(table)
            .filter(|_| self.tables.contains_key(table))
            .ok_or_else(|| ExecError::Invalid(format!("unknown table '{}'", table)))?;
        if *schema != expected {
            return Err(ExecError::Invalid(format!(
                "scan of '{}' carries a schema that does not match the table",
                table
            )));
        }
        Ok(())
    }

    fn eval(&self, plan: &LogicalPlan) -> Result<(Schema, RowBatch), ExecError> {
        if let LogicalPlan::Scan { table, schema } = plan {
            self.check_scan(table, schema)?;
            let batch = self
                .tables
                .get(table)
                .cloned()
                .ok_or_else(|| ExecError::Invalid(format!("unknown table '{}'", table)))?;
            debug!(
                operator = "scan",
                table = %table,
                rows = batch.num_rows(),
                "operator evaluated"
            );
            return Ok((schema.clone(), batch));
        }

        let op = operator_for(plan)?;
        let mut schemas = Vec::new();
        let mut inputs = Vec::new();
        for child in plan.children() {
            let (schema, batch) = self.eval(child)?;
            schemas.push(schema);
            inputs.push(batch);
        }

        let input_rows: usize = inputs.iter().map(|b| b.num_rows()).sum();
        let context = format!("operator '{}' (input_rows={})", op.name(), input_rows);

        let schema = op.plan(&schemas).map_err(|e| op_failure(e, &context))?;
        let out = op.eval(&inputs).map_err(|e| op_failure(e, &context))?;

        debug!(
            operator = op.name(),
            input_rows,
            output_rows = out.num_rows(),
            "operator evaluated"
        );
        Ok((schema, out))
    }
}

/// Physical operator for a non-scan plan node.
fn operator_for(plan: &LogicalPlan) -> Result<Box<dyn Operator>, ExecError> {
    let op: Box<dyn Operator> = match plan {
        LogicalPlan::Scan { table, .. } => {
            return Err(ExecError::Invalid(format!(
                "scan of '{}' has no physical operator",
                table
            )))
        }
        LogicalPlan::Alias { name, .. } => Box::new(Alias::new(name.clone())),
        LogicalPlan::Filter { predicate, .. } => Box::new(Filter::new(predicate.clone())),
        LogicalPlan::Project { columns, .. } => Box::new(Project::new(columns.clone())),
        LogicalPlan::Join { on, .. } => Box::new(HashJoin::new(on.0.clone(), on.1.clone())),
        LogicalPlan::Aggregate { group_by, aggs, .. } => {
            Box::new(Aggregate::new(group_by.clone(), aggs.clone()))
        }
        LogicalPlan::Sort { keys, .. } => Box::new(Sort::new(keys.clone())),
    };
    Ok(op)
}

fn op_failure(e: OpError, context: &str) -> ExecError {
    let mut msg = format!("{}: {}", context, e);
    let suggestions = e.suggestions();
    if !suggestions.is_empty() {
        msg.push_str("\nSuggestions:");
        for s in suggestions {
            msg.push_str(&format!("\n  - {}", s));
        }
    }
    match e {
        OpError::Plan(_) | OpError::Schema(_) => ExecError::Invalid(msg),
        OpError::Exec(_) => ExecError::Operator(msg),
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::expr::{col, lit};
    use marquee_core::model::{Actor, Casting, Movie};
    use marquee_planner::PlanBuilder;

    fn star_wars() -> Dataset {
        Dataset::new(
            vec![Movie::new(1, "Star Wars", 1977)],
            vec![Actor::new(1, "Harrison Ford"), Actor::new(2, "Mark Hamill")],
            vec![Casting::new(1, 1, 1), Casting::new(1, 2, 2)],
        )
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn rejects_dangling_casting() {
        let mut ds = star_wars();
        ds.castings.push(Casting::new(99, 1, 1));
        let err = Engine::new(ds).unwrap_err();
        assert!(err.is_data_integrity());
    }

    #[test]
    fn rejects_non_positive_ord() {
        let mut ds = star_wars();
        ds.castings[1].ord = 0;
        let err = Engine::new(ds).unwrap_err();
        assert!(matches!(err, ExecError::Dataset(_)));
        assert!(err.is_data_integrity());
    }

    #[test]
    fn missing_table_suggests_data_flags() {
        let err = ExecError::Load(marquee_io::Error::MissingTable("nowhere/movies.csv".into()));
        let hints = err.suggestions();
        assert!(hints.iter().any(|h| h.contains("--data-dir")));
        assert!(hints.iter().any(|h| h.contains("--data-format")));
    }

    #[test]
    fn unknown_column_is_an_invalid_plan() {
        let engine = Engine::new(star_wars()).unwrap();
        let plan = PlanBuilder::scan("movies")
            .unwrap()
            .filter(col("movies.year").eq(lit(1977)))
            .build();
        let err = engine.execute(&plan).unwrap_err();
        match err {
            ExecError::Invalid(msg) => {
                assert!(msg.contains("operator 'filter'"));
                assert!(msg.contains("Suggestions"));
            }
            other => panic!("expected invalid plan, got {other:?}"),
        }
        assert!(engine.output_schema(&plan).is_err());
    }

    #[test]
    fn run_reports_manifest() {
        let engine = Engine::new(star_wars()).unwrap();
        let plan = PlanBuilder::cast_join().unwrap().build();
        let (rs, manifest) = engine.run(&plan, "cast").unwrap();
        assert_eq!(rs.len(), 2);
        assert_eq!(manifest.rows, 2);
        assert_eq!(manifest.query, "cast");
        assert_eq!(manifest.dataset_hash, engine.dataset_hash());
        assert_eq!(manifest.plan_hash, Engine::plan_hash(&plan).unwrap());
    }

    #[test]
    fn output_schema_matches_execution() {
        let engine = Engine::new(star_wars()).unwrap();
        let plan = PlanBuilder::cast_join()
            .unwrap()
            .project([("movies.title", "title"), ("actors.name", "name")])
            .build();
        let schema = engine.output_schema(&plan).unwrap();
        let rs = engine.execute(&plan).unwrap();
        assert_eq!(&schema, rs.schema());
        assert_eq!(rs.column_names(), vec!["title", "name"]);
    }
}
