//! Load and save the three base tables as a fixture directory.
//!
//! A directory holds `movies.<ext>`, `actors.<ext>` and `castings.<ext>`
//! where `<ext>` is `csv` or `jsonl`. Loading does not validate integrity;
//! the engine does that before accepting the dataset.

use std::path::{Path, PathBuf};

use marquee_core::config::DataFormat;
use marquee_core::model::{Dataset, ACTORS, CASTINGS, MOVIES};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::readers::csv::CsvReader;
use crate::readers::jsonl::JsonlReader;
use crate::writers::csv::CsvWriter;
use crate::writers::jsonl::JsonlWriter;

pub fn table_path(dir: &Path, table: &str, format: DataFormat) -> PathBuf {
    dir.join(format!("{table}.{}", format.extension()))
}

pub fn load_dataset(dir: impl AsRef<Path>, format: DataFormat) -> Result<Dataset> {
    let dir = dir.as_ref();
    let movies = read_table(dir, MOVIES, format)?;
    let actors = read_table(dir, ACTORS, format)?;
    let castings = read_table(dir, CASTINGS, format)?;
    let ds = Dataset::new(movies, actors, castings);
    info!(
        dir = %dir.display(),
        %format,
        movies = ds.movies.len(),
        actors = ds.actors.len(),
        castings = ds.castings.len(),
        "dataset loaded"
    );
    Ok(ds)
}

pub fn save_dataset(ds: &Dataset, dir: impl AsRef<Path>, format: DataFormat) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    write_table(dir, MOVIES, format, &ds.movies)?;
    write_table(dir, ACTORS, format, &ds.actors)?;
    write_table(dir, CASTINGS, format, &ds.castings)?;
    info!(dir = %dir.display(), %format, "dataset saved");
    Ok(())
}

fn read_table<T: DeserializeOwned>(dir: &Path, table: &str, format: DataFormat) -> Result<Vec<T>> {
    let path = table_path(dir, table, format);
    if !path.is_file() {
        return Err(Error::MissingTable(path));
    }
    match format {
        DataFormat::Csv => CsvReader::from_path(&path)?.read_all(),
        DataFormat::Jsonl => JsonlReader::from_path(&path)?.read_all(),
    }
}

fn write_table<T: Serialize>(
    dir: &Path,
    table: &str,
    format: DataFormat,
    rows: &[T],
) -> Result<()> {
    let path = table_path(dir, table, format);
    match format {
        DataFormat::Csv => CsvWriter::to_path(&path)?.write_records(rows),
        DataFormat::Jsonl => JsonlWriter::to_path(&path)?.write_records(rows),
    }
}
