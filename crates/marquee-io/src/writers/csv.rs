//! CSV writer for `RowBatch` results and typed rows.
//!
//! The header is written with the first batch; NULL is an empty field.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv as csv_crate;
use marquee_core::types::{RowBatch, Scalar};
use serde::Serialize;

use crate::error::Result;

pub struct CsvWriter<W: Write> {
    wtr: csv_crate::Writer<W>,
    wrote_header: bool,
}

impl CsvWriter<File> {
    pub fn to_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::to_writer(file))
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        Self {
            wtr: csv_crate::Writer::from_writer(writer),
            wrote_header: false,
        }
    }

    pub fn write_batch(&mut self, batch: &RowBatch) -> Result<()> {
        if !self.wrote_header {
            self.wtr.write_record(batch.column_names())?;
            self.wrote_header = true;
        }
        for row_idx in 0..batch.num_rows() {
            let row: Vec<String> = batch
                .columns
                .iter()
                .map(|c| value_to_field(&c.values[row_idx]))
                .collect();
            self.wtr.write_record(&row)?;
        }
        self.wtr.flush()?;
        Ok(())
    }

    /// Serialize typed rows; the header comes from the struct's field names.
    pub fn write_records<T: Serialize>(&mut self, rows: &[T]) -> Result<()> {
        for row in rows {
            self.wtr.serialize(row)?;
        }
        self.wrote_header = true;
        self.wtr.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.wtr
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}

fn value_to_field(v: &Scalar) -> String {
    match v {
        Scalar::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::types::Column;

    #[test]
    fn writes_header_once_and_nulls_empty() {
        let batch = RowBatch::new(vec![
            Column::new("movies.title", vec!["Grease".into(), "Dr. No".into()]),
            Column::new("movies.director_id", vec![Scalar::I64(3), Scalar::Null]),
        ]);
        let mut w = CsvWriter::to_writer(Vec::new());
        w.write_batch(&batch).unwrap();
        w.write_batch(&batch.take(&[0])).unwrap();
        let out = String::from_utf8(w.into_inner().unwrap()).unwrap();
        assert_eq!(
            out,
            "movies.title,movies.director_id\nGrease,3\nDr. No,\nGrease,3\n"
        );
    }
}
