//! Row-batch value types.
//!
//! A `RowBatch` is column-major: every `Column` holds one `Scalar` per row,
//! and all columns in a batch have the same length.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::Schema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::I64(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// SQL equality: `None` when either side is NULL.
    pub fn sql_eq(&self, other: &Scalar) -> Option<bool> {
        use Scalar::*;
        match (self, other) {
            (Null, _) | (_, Null) => None,
            (Bool(x), Bool(y)) => Some(x == y),
            (I64(x), I64(y)) => Some(x == y),
            (F64(x), F64(y)) => Some(x == y),
            (I64(x), F64(y)) | (F64(y), I64(x)) => Some((*x as f64) == *y),
            (Str(x), Str(y)) => Some(x == y),
            _ => Some(false),
        }
    }

    /// Total order used for sorting and range comparisons.
    ///
    /// NULL sorts first; mixed non-numeric types fall back to type order.
    pub fn sql_cmp(&self, other: &Scalar) -> Ordering {
        use Scalar::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            (Bool(x), Bool(y)) => x.cmp(y),
            (I64(x), I64(y)) => x.cmp(y),
            (F64(x), F64(y)) => x.total_cmp(y),
            (I64(x), F64(y)) => (*x as f64).total_cmp(y),
            (F64(x), I64(y)) => x.total_cmp(&(*y as f64)),
            (Str(x), Str(y)) => x.cmp(y),
            _ => self.type_order().cmp(&other.type_order()),
        }
    }

    fn type_order(&self) -> u8 {
        match self {
            Scalar::Null => 0,
            Scalar::Bool(_) => 1,
            Scalar::I64(_) | Scalar::F64(_) => 2,
            Scalar::Str(_) => 3,
        }
    }

    /// Truthiness for predicate results. NULL is false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Null => false,
            Scalar::Bool(b) => *b,
            Scalar::I64(i) => *i != 0,
            Scalar::F64(f) => *f != 0.0,
            Scalar::Str(s) => !s.is_empty(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Scalar::Null => serde_json::Value::Null,
            Scalar::Bool(b) => serde_json::Value::Bool(*b),
            Scalar::I64(i) => serde_json::Value::from(*i),
            Scalar::F64(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Scalar::Str(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::I64(i) => write!(f, "{i}"),
            Scalar::F64(x) => write!(f, "{x}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::I64(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::I64(v as i64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowBatch {
    pub columns: Vec<Column>,
}

impl RowBatch {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Zero-row batch carrying the column names of `schema`.
    pub fn empty(schema: &Schema) -> Self {
        Self {
            columns: schema
                .fields
                .iter()
                .map(|f| Column::new(f.name.clone(), Vec::new()))
                .collect(),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Values of one row, in column order.
    pub fn row(&self, idx: usize) -> Vec<&Scalar> {
        self.columns.iter().map(|c| &c.values[idx]).collect()
    }

    /// New batch containing the rows at `indices`, in that order.
    /// Indices may repeat.
    pub fn take(&self, indices: &[usize]) -> RowBatch {
        RowBatch {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: indices.iter().map(|&i| c.values[i].clone()).collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_never_equals() {
        assert_eq!(Scalar::Null.sql_eq(&Scalar::Null), None);
        assert_eq!(Scalar::I64(1).sql_eq(&Scalar::Null), None);
        assert_eq!(Scalar::I64(2).sql_eq(&Scalar::F64(2.0)), Some(true));
    }

    #[test]
    fn ordering_puts_null_first() {
        let mut v = vec![Scalar::I64(3), Scalar::Null, Scalar::I64(1)];
        v.sort_by(|a, b| a.sql_cmp(b));
        assert_eq!(v, vec![Scalar::Null, Scalar::I64(1), Scalar::I64(3)]);
    }

    #[test]
    fn take_repeats_rows() {
        let batch = RowBatch::new(vec![Column::new(
            "t.x",
            vec![Scalar::I64(10), Scalar::I64(20)],
        )]);
        let out = batch.take(&[1, 1, 0]);
        assert_eq!(out.num_rows(), 3);
        assert_eq!(out.columns[0].values[0], Scalar::I64(20));
        assert_eq!(out.columns[0].values[2], Scalar::I64(10));
    }
}
