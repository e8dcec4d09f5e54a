#![forbid(unsafe_code)]
//! marquee-exec: the query engine.
//!
//! An [`Engine`] owns a validated, immutable dataset snapshot and evaluates
//! logical plans bottom-up through the physical operators. [`Queries`]
//! exposes the nine named join queries as typed operations.

pub mod engine;
pub mod error;
pub mod queries;
pub mod result;

pub use engine::Engine;
pub use error::ExecError;
pub use queries::{Queries, TitleCount, TitleStar, YearCount};
pub use result::ResultSet;
