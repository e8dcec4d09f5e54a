//! Project operator: column selection with optional renames.
//!
//! An empty column list passes the input through unchanged.

use marquee_core::dag::ProjectItem;
use marquee_core::schema::{Field, Schema};
use marquee_core::types::{Column, RowBatch};

use crate::traits::{ensure_unique, unary, OpError, Operator};

#[derive(Default)]
pub struct Project {
    pub columns: Vec<ProjectItem>,
}

impl Project {
    pub fn new(columns: Vec<ProjectItem>) -> Self {
        Self { columns }
    }
}

impl Operator for Project {
    fn name(&self) -> &'static str {
        "project"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<Schema, OpError> {
        let input = unary(input_schemas, "project").map_err(OpError::Plan)?;
        if self.columns.is_empty() {
            return Ok(input.clone());
        }
        let mut fields = Vec::with_capacity(self.columns.len());
        for item in &self.columns {
            let field = input
                .field_named(&item.column)
                .ok_or_else(|| OpError::Schema(format!("unknown column '{}'", item.column)))?;
            fields.push(Field {
                name: item.output_name().to_string(),
                ..field.clone()
            });
        }
        let schema = Schema::new(fields);
        ensure_unique(&schema)?;
        Ok(schema)
    }

    fn eval(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let input = unary(inputs, "project").map_err(OpError::Exec)?;
        if self.columns.is_empty() {
            return Ok(input.clone());
        }
        let mut out_cols: Vec<Column> = Vec::with_capacity(self.columns.len());
        for item in &self.columns {
            let col = input
                .column(&item.column)
                .ok_or_else(|| OpError::Schema(format!("unknown column '{}'", item.column)))?;
            out_cols.push(Column::new(item.output_name(), col.values.clone()));
        }
        Ok(RowBatch::new(out_cols))
    }
}
