//! CSV reader → typed rows.
//!
//! The header row names the fields; each record is deserialized into `T`
//! with serde. Empty fields become `None` for optional columns.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv as csv_crate;
use serde::de::DeserializeOwned;

use crate::error::Result;

pub struct CsvReader<R: Read> {
    rdr: csv_crate::Reader<R>,
}

impl CsvReader<File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read> CsvReader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        let rdr = csv_crate::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv_crate::Trim::Headers)
            .from_reader(reader);
        Ok(Self { rdr })
    }

    /// Deserialize every remaining record. An empty input has no rows.
    pub fn read_all<T: DeserializeOwned>(&mut self) -> Result<Vec<T>> {
        let mut rows = Vec::new();
        for rec in self.rdr.deserialize() {
            rows.push(rec?);
        }
        Ok(rows)
    }
}
