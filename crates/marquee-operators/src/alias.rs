//! Sub-query alias: re-qualify every column with a new name so the
//! materialised result can be joined like a table (`... ) AS name`).

use marquee_core::schema::{qualify, Schema};
use marquee_core::types::{Column, RowBatch};

use crate::traits::{ensure_unique, unary, OpError, Operator};

pub struct Alias {
    pub name: String,
}

impl Alias {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Operator for Alias {
    fn name(&self) -> &'static str {
        "alias"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<Schema, OpError> {
        let input = unary(input_schemas, "alias").map_err(OpError::Plan)?;
        if self.name.is_empty() || self.name.contains('.') {
            return Err(OpError::Plan(format!("invalid alias '{}'", self.name)));
        }
        let schema = input.qualified(&self.name);
        ensure_unique(&schema)?;
        Ok(schema)
    }

    fn eval(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let input = unary(inputs, "alias").map_err(OpError::Exec)?;
        Ok(RowBatch::new(
            input
                .columns
                .iter()
                .map(|c| Column::new(qualify(&self.name, &c.name), c.values.clone()))
                .collect(),
        ))
    }
}
