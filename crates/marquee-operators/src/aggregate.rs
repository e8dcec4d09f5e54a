//! Hash aggregate: group rows by key columns and fold aggregate functions.
//!
//! Groups are emitted in the order their first row appears in the input.
//! With no group keys the whole input is one group, so a single row is
//! produced even for empty input.

use std::collections::HashMap;

use marquee_core::dag::{AggFunc, AggregateExpr};
use marquee_core::schema::{DataType, Field, Schema};
use marquee_core::types::{Column, RowBatch, Scalar};

use crate::key::Key;
use crate::traits::{ensure_unique, unary, OpError, Operator};

/// Aggregate value accumulator.
#[derive(Debug, Clone, Default)]
pub struct AggValue {
    pub count: u64,
    pub int_sum: i64,
    pub float_sum: f64,
    pub saw_float: bool,
    pub min: Option<Scalar>,
    pub max: Option<Scalar>,
}

impl AggValue {
    pub fn update(&mut self, val: &Scalar) {
        if val.is_null() {
            return;
        }
        self.count += 1;
        match val {
            Scalar::I64(i) => {
                self.int_sum = self.int_sum.wrapping_add(*i);
                self.float_sum += *i as f64;
            }
            Scalar::F64(f) => {
                self.saw_float = true;
                self.float_sum += f;
            }
            _ => {}
        }
        if self.min.as_ref().map_or(true, |m| val.sql_cmp(m).is_lt()) {
            self.min = Some(val.clone());
        }
        if self.max.as_ref().map_or(true, |m| val.sql_cmp(m).is_gt()) {
            self.max = Some(val.clone());
        }
    }

    pub fn finish(&self, func: AggFunc) -> Scalar {
        match func {
            AggFunc::Count => Scalar::I64(self.count as i64),
            AggFunc::Sum if self.count == 0 => Scalar::Null,
            AggFunc::Sum if self.saw_float => Scalar::F64(self.float_sum),
            AggFunc::Sum => Scalar::I64(self.int_sum),
            AggFunc::Min => self.min.clone().unwrap_or(Scalar::Null),
            AggFunc::Max => self.max.clone().unwrap_or(Scalar::Null),
            AggFunc::Avg if self.count == 0 => Scalar::Null,
            AggFunc::Avg => Scalar::F64(self.float_sum / self.count as f64),
        }
    }
}

pub struct Aggregate {
    pub group_by: Vec<String>,
    pub aggs: Vec<AggregateExpr>,
}

impl Aggregate {
    pub fn new(group_by: Vec<String>, aggs: Vec<AggregateExpr>) -> Self {
        Self { group_by, aggs }
    }
}

fn output_field(agg: &AggregateExpr, input: &Field) -> Result<Field, OpError> {
    let numeric = matches!(input.data_type, DataType::Int64 | DataType::Float64);
    let field = match agg.func {
        AggFunc::Count => Field::new(agg.alias.clone(), DataType::Int64, false),
        AggFunc::Sum | AggFunc::Avg if !numeric => {
            return Err(OpError::Schema(format!(
                "{}({}) needs a numeric column",
                agg.func.name(),
                agg.column
            )))
        }
        AggFunc::Sum => Field::new(agg.alias.clone(), input.data_type, true),
        AggFunc::Avg => Field::new(agg.alias.clone(), DataType::Float64, true),
        AggFunc::Min | AggFunc::Max => Field::new(agg.alias.clone(), input.data_type, true),
    };
    Ok(field)
}

impl Operator for Aggregate {
    fn name(&self) -> &'static str {
        "aggregate"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<Schema, OpError> {
        let input_schema = unary(input_schemas, "aggregate").map_err(OpError::Plan)?;

        // Output: group_by columns + aggregation result columns
        let mut fields = Vec::new();
        for key in &self.group_by {
            let field = input_schema.field_named(key).ok_or_else(|| {
                OpError::Schema(format!("unknown column '{}' in group_by", key))
            })?;
            fields.push(field.clone());
        }
        for agg in &self.aggs {
            let field = input_schema.field_named(&agg.column).ok_or_else(|| {
                OpError::Schema(format!(
                    "unknown column '{}' in {}()",
                    agg.column,
                    agg.func.name()
                ))
            })?;
            fields.push(output_field(agg, field)?);
        }

        let schema = Schema::new(fields);
        ensure_unique(&schema)?;
        Ok(schema)
    }

    fn eval(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let input = unary(inputs, "aggregate").map_err(OpError::Exec)?;

        let lookup = |name: &str| {
            input
                .column(name)
                .ok_or_else(|| OpError::Exec(format!("column '{}' not found", name)))
        };
        let key_cols = self
            .group_by
            .iter()
            .map(|k| lookup(k.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let agg_cols = self
            .aggs
            .iter()
            .map(|a| lookup(a.column.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        // group key -> slot in `groups`; slots keep first-seen order
        let mut index: HashMap<Vec<Key>, usize> = HashMap::new();
        let mut groups: Vec<(usize, Vec<AggValue>)> = Vec::new();
        if self.group_by.is_empty() {
            groups.push((0, vec![AggValue::default(); self.aggs.len()]));
        }

        for row_idx in 0..input.num_rows() {
            let slot = if self.group_by.is_empty() {
                0
            } else {
                let key: Vec<Key> = key_cols
                    .iter()
                    .map(|c| Key::from(&c.values[row_idx]))
                    .collect();
                *index.entry(key).or_insert_with(|| {
                    groups.push((row_idx, vec![AggValue::default(); self.aggs.len()]));
                    groups.len() - 1
                })
            };

            for (acc, col) in groups[slot].1.iter_mut().zip(&agg_cols) {
                acc.update(&col.values[row_idx]);
            }
        }

        let mut output_cols = Vec::with_capacity(self.group_by.len() + self.aggs.len());
        for (name, col) in self.group_by.iter().zip(&key_cols) {
            output_cols.push(Column::new(
                name.clone(),
                groups
                    .iter()
                    .map(|(first_row, _)| col.values[*first_row].clone())
                    .collect(),
            ));
        }
        for (i, agg) in self.aggs.iter().enumerate() {
            output_cols.push(Column::new(
                agg.alias.clone(),
                groups.iter().map(|(_, accs)| accs[i].finish(agg.func)).collect(),
            ));
        }

        Ok(RowBatch::new(output_cols))
    }
}
