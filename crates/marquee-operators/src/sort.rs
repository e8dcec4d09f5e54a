//! Stable multi-key sort with a direction per key. NULLs sort first
//! ascending and last descending.

use marquee_core::dag::SortKey;
use marquee_core::schema::Schema;
use marquee_core::types::RowBatch;

use crate::traits::{unary, OpError, Operator};

pub struct Sort {
    pub keys: Vec<SortKey>,
}

impl Sort {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }
}

impl Operator for Sort {
    fn name(&self) -> &'static str {
        "sort"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<Schema, OpError> {
        let input = unary(input_schemas, "sort").map_err(OpError::Plan)?;
        if self.keys.is_empty() {
            return Err(OpError::Plan("sort needs at least one key".into()));
        }
        for key in &self.keys {
            if input.index_of(&key.column).is_none() {
                return Err(OpError::Schema(format!(
                    "unknown column '{}' in sort key",
                    key.column
                )));
            }
        }
        Ok(input.clone())
    }

    fn eval(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let input = unary(inputs, "sort").map_err(OpError::Exec)?;

        let key_cols = self
            .keys
            .iter()
            .map(|k| {
                input
                    .column(&k.column)
                    .map(|c| (c, k.descending))
                    .ok_or_else(|| OpError::Exec(format!("sort key '{}' not found", k.column)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut order: Vec<usize> = (0..input.num_rows()).collect();
        order.sort_by(|&a, &b| {
            key_cols
                .iter()
                .map(|(col, descending)| {
                    let ord = col.values[a].sql_cmp(&col.values[b]);
                    if *descending {
                        ord.reverse()
                    } else {
                        ord
                    }
                })
                .find(|o| o.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(input.take(&order))
    }
}
