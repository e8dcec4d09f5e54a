#![forbid(unsafe_code)]
//! marquee-core: shared kernel for the marquee query engine.
//!
//! This crate contains only *pure* types and small helpers that the other
//! crates build on. There is **no I/O** here.
//!
//! Crates that use this:
//! - marquee-operators: evaluates `RowBatch`es against `Schema` and `Expr`.
//! - marquee-planner: builds `LogicalPlan` trees for the named queries.
//! - marquee-io: loads a `Dataset` from fixture files.
//! - marquee-exec: validates the `Dataset`, runs plans, emits `RunManifest`.

pub mod config;
pub mod dag;
pub mod error;
pub mod expr;
pub mod hash;
pub mod manifest;
pub mod model;
pub mod schema;
pub mod types;
