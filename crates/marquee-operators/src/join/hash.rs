//! Inner hash equi-join with build/probe phases.
//!
//! The right input is the build side, the left input is probed row by row.
//! Output order: left rows in input order; for each, its matching right
//! rows in input order. NULL keys never match. Duplicate keys multiply
//! rows; nothing is deduplicated.

use std::collections::HashMap;

use marquee_core::schema::Schema;
use marquee_core::types::{Column, RowBatch};

use crate::key::Key;
use crate::traits::{ensure_unique, OpError, Operator};

pub struct HashJoin {
    /// (left_col, right_col)
    pub on: (String, String),
}

impl HashJoin {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            on: (left.into(), right.into()),
        }
    }
}

impl Operator for HashJoin {
    fn name(&self) -> &'static str {
        "join_hash"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<Schema, OpError> {
        let [left, right] = input_schemas else {
            return Err(OpError::Plan("hash join expects two inputs".into()));
        };
        let (left_key, right_key) = &self.on;
        if left.index_of(left_key).is_none() {
            return Err(OpError::Schema(format!(
                "unknown column '{}' on left side of join",
                left_key
            )));
        }
        if right.index_of(right_key).is_none() {
            return Err(OpError::Schema(format!(
                "unknown column '{}' on right side of join",
                right_key
            )));
        }

        // Left fields then right fields
        let mut fields = left.fields.clone();
        fields.extend(right.fields.iter().cloned());
        let schema = Schema::new(fields);
        ensure_unique(&schema)?;
        Ok(schema)
    }

    fn eval(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let [left, right] = inputs else {
            return Err(OpError::Exec("hash join needs two inputs".into()));
        };
        let (left_key_name, right_key_name) = &self.on;

        let left_key_col = left
            .column(left_key_name)
            .ok_or_else(|| OpError::Exec(format!("left join key '{}' not found", left_key_name)))?;
        let right_key_col = right.column(right_key_name).ok_or_else(|| {
            OpError::Exec(format!("right join key '{}' not found", right_key_name))
        })?;

        // Build phase: hash table on right side
        let mut hash_table: HashMap<Key, Vec<usize>> = HashMap::new();
        for (row_idx, val) in right_key_col.values.iter().enumerate() {
            if val.is_null() {
                continue;
            }
            hash_table.entry(Key::from(val)).or_default().push(row_idx);
        }

        // Probe phase: scan left side and emit matches
        let mut left_rows = Vec::new();
        let mut right_rows = Vec::new();
        for (left_idx, left_val) in left_key_col.values.iter().enumerate() {
            if left_val.is_null() {
                continue;
            }
            if let Some(matches) = hash_table.get(&Key::from(left_val)) {
                for &right_idx in matches {
                    left_rows.push(left_idx);
                    right_rows.push(right_idx);
                }
            }
        }

        let left_out = left.take(&left_rows);
        let right_out = right.take(&right_rows);
        let mut columns: Vec<Column> = left_out.columns;
        columns.extend(right_out.columns);
        Ok(RowBatch::new(columns))
    }
}
