//! Filter operator with predicate evaluation.
//!
//! Rows whose predicate evaluates to NULL are dropped, as in SQL `WHERE`
//! and `HAVING`.

use marquee_core::expr::Expr;
use marquee_core::schema::Schema;
use marquee_core::types::RowBatch;

use crate::traits::{unary, OpError, Operator};

pub struct Filter {
    pub predicate: Expr,
}

impl Filter {
    pub fn new(predicate: Expr) -> Self {
        Self { predicate }
    }
}

impl Operator for Filter {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<Schema, OpError> {
        let schema = unary(input_schemas, "filter").map_err(OpError::Plan)?;
        for name in self.predicate.columns() {
            if schema.index_of(name).is_none() {
                return Err(OpError::Schema(format!(
                    "unknown column '{}' in predicate '{}'",
                    name, self.predicate
                )));
            }
        }
        Ok(schema.clone())
    }

    fn eval(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let input = unary(inputs, "filter").map_err(OpError::Exec)?;

        let mut keep = Vec::with_capacity(input.num_rows());
        for row_idx in 0..input.num_rows() {
            let matched = self.predicate.evaluate_bool(input, row_idx).map_err(|e| {
                OpError::Exec(format!(
                    "expression evaluation failed at row {}: {}",
                    row_idx, e
                ))
            })?;
            if matched {
                keep.push(row_idx);
            }
        }

        Ok(input.take(&keep))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::expr::{col, lit};
    use marquee_core::types::{Column, Scalar};

    #[test]
    fn keeps_matching_rows_in_order() {
        let batch = RowBatch::new(vec![Column::new(
            "movies.yr",
            vec![Scalar::I64(1962), Scalar::I64(1977), Scalar::I64(1962)],
        )]);
        let out = Filter::new(col("movies.yr").eq(lit(1962)))
            .eval(&[batch])
            .unwrap();
        assert_eq!(out.num_rows(), 2);
    }

    #[test]
    fn unknown_column_fails_planning() {
        let schema = marquee_core::model::Dataset::table_schema("movies").unwrap();
        let err = Filter::new(col("movies.year").eq(lit(1962)))
            .plan(&[schema])
            .unwrap_err();
        assert!(matches!(err, OpError::Schema(_)));
    }
}
