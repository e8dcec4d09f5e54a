#![forbid(unsafe_code)]
//! marquee-planner: everything that produces a `LogicalPlan`.
//!
//! - `builder`: typed, fluent construction of plans over the base tables.
//! - `queries`: the nine named join queries and their parameters.
//! - `dsl`: YAML pipelines parsed into the same plans.

pub mod builder;
pub mod dsl;
pub mod queries;

pub use builder::PlanBuilder;
pub use dsl::yaml::{parse_yaml_query, DslError};
pub use queries::{NamedQuery, QueryParams};
