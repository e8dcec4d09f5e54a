//! NDJSON writer: one JSON object per row, keyed by column name.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use marquee_core::types::RowBatch;
use serde::Serialize;

use crate::error::Result;

pub struct JsonlWriter<W: Write> {
    out: BufWriter<W>,
}

impl JsonlWriter<File> {
    pub fn to_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::to_writer(file))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        Self {
            out: BufWriter::new(writer),
        }
    }

    pub fn write_batch(&mut self, batch: &RowBatch) -> Result<()> {
        for row_idx in 0..batch.num_rows() {
            let obj: serde_json::Map<String, serde_json::Value> = batch
                .columns
                .iter()
                .map(|c| (c.name.clone(), c.values[row_idx].to_json()))
                .collect();
            serde_json::to_writer(&mut self.out, &obj)?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn write_records<T: Serialize>(&mut self, rows: &[T]) -> Result<()> {
        for row in rows {
            serde_json::to_writer(&mut self.out, row)?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.out
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::types::{Column, Scalar};

    #[test]
    fn one_object_per_row() {
        let batch = RowBatch::new(vec![
            Column::new("yr", vec![Scalar::I64(1978), Scalar::I64(1983)]),
            Column::new("num_movies", vec![Scalar::I64(2), Scalar::Null]),
        ]);
        let mut w = JsonlWriter::to_writer(Vec::new());
        w.write_batch(&batch).unwrap();
        let out = String::from_utf8(w.into_inner().unwrap()).unwrap();
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["yr"], 1978);
        assert!(lines[1]["num_movies"].is_null());
    }
}
