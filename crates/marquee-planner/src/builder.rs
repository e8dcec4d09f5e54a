//! Fluent logical-plan builder.
//!
//! ```rust
//! use marquee_core::expr::{col, lit};
//! use marquee_planner::PlanBuilder;
//!
//! let plan = PlanBuilder::scan("movies")?
//!     .join(PlanBuilder::scan("castings")?, "movies.id", "castings.movie_id")
//!     .filter(col("castings.ord").eq(lit(1)))
//!     .project(["movies.title"])
//!     .build();
//! assert_eq!(plan.tables(), vec!["movies", "castings"]);
//! # Ok::<(), marquee_core::error::Error>(())
//! ```

use marquee_core::dag::{AggregateExpr, LogicalPlan, ProjectItem, SortKey};
use marquee_core::error::{Error, Result};
use marquee_core::expr::Expr;
use marquee_core::model::{Dataset, ACTORS, CASTINGS, MOVIES};

#[derive(Debug, Clone)]
pub struct PlanBuilder {
    plan: LogicalPlan,
}

impl PlanBuilder {
    /// Scan of a base table; fails for unknown table names.
    pub fn scan(table: &str) -> Result<Self> {
        let schema = Dataset::table_schema(table)
            .ok_or_else(|| Error::Schema(format!("unknown table '{}'", table)))?;
        Ok(Self {
            plan: LogicalPlan::Scan {
                table: table.to_string(),
                schema,
            },
        })
    }

    /// `movies JOIN castings ON movies.id = castings.movie_id
    ///  JOIN actors ON castings.actor_id = actors.id`
    pub fn cast_join() -> Result<Self> {
        Ok(Self::scan(MOVIES)?
            .join(Self::scan(CASTINGS)?, "movies.id", "castings.movie_id")
            .join(Self::scan(ACTORS)?, "castings.actor_id", "actors.id"))
    }

    pub fn from_plan(plan: LogicalPlan) -> Self {
        Self { plan }
    }

    pub fn join(self, right: PlanBuilder, left_col: &str, right_col: &str) -> Self {
        Self {
            plan: LogicalPlan::Join {
                left: Box::new(self.plan),
                right: Box::new(right.plan),
                on: (left_col.to_string(), right_col.to_string()),
            },
        }
    }

    pub fn filter(self, predicate: Expr) -> Self {
        Self {
            plan: LogicalPlan::Filter {
                input: Box::new(self.plan),
                predicate,
            },
        }
    }

    pub fn project<I, P>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ProjectItem>,
    {
        Self {
            plan: LogicalPlan::Project {
                input: Box::new(self.plan),
                columns: columns.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn aggregate(self, group_by: &[&str], aggs: Vec<AggregateExpr>) -> Self {
        Self {
            plan: LogicalPlan::Aggregate {
                input: Box::new(self.plan),
                group_by: group_by.iter().map(|s| s.to_string()).collect(),
                aggs,
            },
        }
    }

    /// Name the current plan as a sub-query (`(...) AS name`).
    pub fn alias(self, name: &str) -> Self {
        Self {
            plan: LogicalPlan::Alias {
                input: Box::new(self.plan),
                name: name.to_string(),
            },
        }
    }

    pub fn sort(self, keys: Vec<SortKey>) -> Self {
        Self {
            plan: LogicalPlan::Sort {
                input: Box::new(self.plan),
                keys,
            },
        }
    }

    pub fn build(self) -> LogicalPlan {
        self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_table_is_rejected() {
        assert!(matches!(PlanBuilder::scan("directors"), Err(Error::Schema(_))));
    }

    #[test]
    fn cast_join_reads_three_tables() {
        let plan = PlanBuilder::cast_join().unwrap().build();
        assert_eq!(plan.tables(), vec!["movies", "castings", "actors"]);
    }
}
