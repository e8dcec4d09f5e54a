//! Query results.

use marquee_core::schema::Schema;
use marquee_core::types::{RowBatch, Scalar};
use serde::de::DeserializeOwned;

use crate::error::ExecError;

/// Fully materialised result of one plan.
///
/// `rows()` borrows the batch, so the rows can be walked any number of
/// times and always come back in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    schema: Schema,
    batch: RowBatch,
}

impl ResultSet {
    pub fn new(schema: Schema, batch: RowBatch) -> Self {
        Self { schema, batch }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn batch(&self) -> &RowBatch {
        &self.batch
    }

    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.batch.column_names()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Scalar>> + '_ {
        (0..self.batch.num_rows()).map(move |i| self.batch.row(i))
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<&[Scalar]> {
        self.batch.column(name).map(|c| c.values.as_slice())
    }

    /// Each row as a JSON object keyed by column name.
    pub fn to_json_rows(&self) -> Vec<serde_json::Value> {
        (0..self.batch.num_rows())
            .map(|i| {
                let obj: serde_json::Map<String, serde_json::Value> = self
                    .batch
                    .columns
                    .iter()
                    .map(|c| (c.name.clone(), c.values[i].to_json()))
                    .collect();
                serde_json::Value::Object(obj)
            })
            .collect()
    }

    /// Decode every row into `T`, matching struct fields to column names.
    pub fn records<T: DeserializeOwned>(&self) -> Result<Vec<T>, ExecError> {
        self.to_json_rows()
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(ExecError::from))
            .collect()
    }

    /// A single text column as owned strings. NULL is a decode error.
    pub fn strings(&self, name: &str) -> Result<Vec<String>, ExecError> {
        let values = self
            .column(name)
            .ok_or_else(|| ExecError::Invalid(format!("result has no column '{}'", name)))?;
        values
            .iter()
            .map(|v| match v {
                Scalar::Str(s) => Ok(s.clone()),
                other => Err(ExecError::Invalid(format!(
                    "column '{}' holds non-text value '{}'",
                    name, other
                ))),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::schema::{DataType, Field};
    use marquee_core::types::Column;
    use serde::Deserialize;

    fn sample() -> ResultSet {
        let schema = Schema::new(vec![
            Field::new("yr", DataType::Int64, false),
            Field::new("num_movies", DataType::Int64, false),
        ]);
        let batch = RowBatch::new(vec![
            Column::new("yr", vec![Scalar::I64(1978), Scalar::I64(1983)]),
            Column::new("num_movies", vec![Scalar::I64(2), Scalar::I64(3)]),
        ]);
        ResultSet::new(schema, batch)
    }

    #[test]
    fn rows_are_restartable() {
        let rs = sample();
        let first: Vec<_> = rs.rows().collect();
        let second: Vec<_> = rs.rows().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn decodes_records() {
        #[derive(Deserialize)]
        struct Row {
            yr: i64,
            num_movies: i64,
        }
        let rows: Vec<Row> = sample().records().unwrap();
        assert_eq!((rows[1].yr, rows[1].num_movies), (1983, 3));
    }

    #[test]
    fn strings_rejects_numbers() {
        assert!(matches!(sample().strings("yr"), Err(ExecError::Invalid(_))));
        assert!(sample().strings("title").is_err());
    }
}
