//! Minimal YAML → LogicalPlan parser for *linear* query pipelines.
//!
//! Example (equivalent to `ford_films`):
//! ```yaml
//! steps:
//!   - op: scan
//!     table: movies
//!   - op: join
//!     table: castings
//!     on: [movies.id, castings.movie_id]
//!   - op: join
//!     table: actors
//!     on: [castings.actor_id, actors.id]
//!   - op: filter
//!     expr: "actors.name = 'Harrison Ford'"
//!   - op: project
//!     columns: [{ column: movies.title, alias: title }]
//! ```
//!
//! A join may take a nested pipeline instead of a table, which is how
//! sub-queries are written (`steps:` plus an `alias` step at the end).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use marquee_core::dag::{AggFunc, AggregateExpr, LogicalPlan, ProjectItem, SortKey};
use marquee_core::expr::Expr;

use crate::builder::PlanBuilder;

#[derive(Debug, Error)]
pub enum DslError {
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid pipeline: {0}")]
    Invalid(String),

    #[error(transparent)]
    Core(#[from] marquee_core::error::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
    Scan {
        table: String,
    },

    Join {
        #[serde(default)]
        table: Option<String>,
        #[serde(default)]
        steps: Option<Vec<Step>>,
        on: (String, String),
    },

    Filter {
        expr: String,
    },

    Aggregate {
        #[serde(default)]
        group_by: Vec<String>,
        aggs: Vec<AggDef>,
    },

    Project {
        columns: Vec<ColumnDef>,
    },

    Sort {
        by: Vec<SortDef>,
    },

    Alias {
        name: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggDef {
    pub func: String,
    pub column: String,
    pub alias: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnDef {
    Name(String),
    Aliased { column: String, alias: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SortDef {
    Name(String),
    Keyed {
        column: String,
        #[serde(default)]
        desc: bool,
    },
}

impl From<ColumnDef> for ProjectItem {
    fn from(def: ColumnDef) -> Self {
        match def {
            ColumnDef::Name(column) => ProjectItem {
                column,
                alias: None,
            },
            ColumnDef::Aliased { column, alias } => ProjectItem {
                column,
                alias: Some(alias),
            },
        }
    }
}

impl From<SortDef> for SortKey {
    fn from(def: SortDef) -> Self {
        match def {
            SortDef::Name(column) => SortKey::asc(column),
            SortDef::Keyed { column, desc } => SortKey {
                column,
                descending: desc,
            },
        }
    }
}

/// Parse a YAML string into a `LogicalPlan`.
pub fn parse_yaml_query(yaml_src: &str) -> Result<LogicalPlan, DslError> {
    let doc: Pipeline = serde_yaml::from_str(yaml_src)?;
    build_pipeline(doc.steps)
}

fn build_pipeline(steps: Vec<Step>) -> Result<LogicalPlan, DslError> {
    let mut cur: Option<PlanBuilder> = None;

    for step in steps {
        cur = Some(match (step, cur) {
            (Step::Scan { table }, None) => PlanBuilder::scan(&table)?,
            (Step::Scan { .. }, Some(_)) => {
                return Err(DslError::Invalid(
                    "scan must be the first step; use join to add tables".into(),
                ))
            }
            (Step::Join { table, steps, on }, Some(input)) => {
                let right = match (table, steps) {
                    (Some(table), None) => PlanBuilder::scan(&table)?,
                    (None, Some(steps)) => PlanBuilder::from_plan(build_pipeline(steps)?),
                    _ => {
                        return Err(DslError::Invalid(
                            "join needs exactly one of 'table' or 'steps'".into(),
                        ))
                    }
                };
                input.join(right, &on.0, &on.1)
            }
            (Step::Filter { expr }, Some(input)) => {
                let predicate = Expr::parse(&expr)
                    .map_err(|e| DslError::Invalid(format!("filter '{}': {}", expr, e)))?;
                input.filter(predicate)
            }
            (Step::Aggregate { group_by, aggs }, Some(input)) => {
                let aggs = aggs
                    .into_iter()
                    .map(|a| {
                        Ok(AggregateExpr {
                            func: AggFunc::parse(&a.func).map_err(DslError::Invalid)?,
                            column: a.column,
                            alias: a.alias,
                        })
                    })
                    .collect::<Result<Vec<_>, DslError>>()?;
                let keys: Vec<&str> = group_by.iter().map(String::as_str).collect();
                input.aggregate(&keys, aggs)
            }
            (Step::Project { columns }, Some(input)) => input.project(columns),
            (Step::Sort { by }, Some(input)) => {
                input.sort(by.into_iter().map(SortKey::from).collect())
            }
            (Step::Alias { name }, Some(input)) => input.alias(&name),
            (s, None) => {
                return Err(DslError::Invalid(format!(
                    "first step must be 'scan', got {:?}",
                    s
                )))
            }
        });
    }

    cur.map(PlanBuilder::build)
        .ok_or_else(|| DslError::Invalid("empty pipeline".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_step_before_scan() {
        let yaml = "steps:\n  - op: filter\n    expr: \"movies.yr = 1962\"\n";
        assert!(matches!(parse_yaml_query(yaml), Err(DslError::Invalid(_))));
    }

    #[test]
    fn rejects_empty_pipeline() {
        assert!(matches!(
            parse_yaml_query("steps: []"),
            Err(DslError::Invalid(_))
        ));
    }

    #[test]
    fn unknown_table_surfaces_core_error() {
        let yaml = "steps:\n  - op: scan\n    table: directors\n";
        assert!(matches!(parse_yaml_query(yaml), Err(DslError::Core(_))));
    }
}
