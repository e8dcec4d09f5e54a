//! Per-run manifest: what ran, against which dataset, how many rows came back.

use serde::{Deserialize, Serialize};

use crate::hash::Hash256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub query: String,
    pub plan_hash: Hash256,
    pub dataset_hash: Hash256,
    pub rows: usize,
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl RunManifest {
    pub fn new(
        query: impl Into<String>,
        plan_hash: Hash256,
        dataset_hash: Hash256,
        started_ms: u64,
    ) -> Self {
        Self {
            query: query.into(),
            plan_hash,
            dataset_hash,
            rows: 0,
            started_ms,
            finished_ms: started_ms,
        }
    }

    pub fn finish(mut self, finished_ms: u64, rows: usize) -> Self {
        self.finished_ms = finished_ms;
        self.rows = rows;
        self
    }

    pub fn duration_ms(&self) -> u64 {
        self.finished_ms.saturating_sub(self.started_ms)
    }
}
