#![forbid(unsafe_code)]
//! marquee-io: fixture loading and result writing.
//!
//! - `readers`: CSV/NDJSON readers → typed rows (serde).
//! - `writers`: CSV/NDJSON writers for `RowBatch` results and typed rows.
//! - `dataset`: load/save the three base tables from/to a directory.

pub mod dataset;
pub mod error;
pub mod readers;
pub mod writers;

pub use dataset::{load_dataset, save_dataset, table_path};
pub use error::{Error, Result};
