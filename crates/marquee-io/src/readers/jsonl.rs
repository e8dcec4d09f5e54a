//! NDJSON reader → typed rows. Blank lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

pub struct JsonlReader<R: Read> {
    reader: BufReader<R>,
    /// Name used in parse errors.
    source: String,
}

impl JsonlReader<File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(f),
            source: path.display().to_string(),
        })
    }
}

impl<R: Read> JsonlReader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        Ok(Self {
            reader: BufReader::new(reader),
            source: "<input>".to_string(),
        })
    }

    pub fn read_all<T: DeserializeOwned>(&mut self) -> Result<Vec<T>> {
        let mut rows = Vec::new();
        let mut line_no = 0usize;
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let row = serde_json::from_str(&line).map_err(|source| Error::Parse {
                path: self.source.clone(),
                line: line_no,
                source,
            })?;
            rows.push(row);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::model::Casting;

    #[test]
    fn reports_line_numbers() {
        let src = "{\"movie_id\":1,\"actor_id\":2,\"ord\":1}\n\n{\"movie_id\":1}\n";
        let err = JsonlReader::from_reader(src.as_bytes())
            .unwrap()
            .read_all::<Casting>()
            .unwrap_err();
        match err {
            Error::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
