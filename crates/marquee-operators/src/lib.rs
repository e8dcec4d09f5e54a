#![forbid(unsafe_code)]
//! marquee-operators: physical operators over `RowBatch`.
//!
//! Every operator implements [`traits::Operator`]: `plan` derives the output
//! schema from the input schemas (and rejects unknown columns), `eval`
//! transforms whole input batches. Operators are deterministic: the same
//! inputs always produce the same rows in the same order.

pub mod aggregate;
pub mod alias;
pub mod filter;
pub mod join;
pub mod key;
pub mod project;
pub mod sort;
pub mod traits;

pub use traits::{OpError, Operator};
