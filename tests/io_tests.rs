//! Fixture loading (CSV and NDJSON) and result writers.


use std::fs;

use marquee_core::config::{DataFormat, EngineConfig};
use marquee_exec::{Engine, ExecError};
use marquee_io::writers::csv::CsvWriter;
use marquee_io::writers::jsonl::JsonlWriter;
use marquee_io::{load_dataset, save_dataset};
use marquee_planner::{NamedQuery, QueryParams};
use test_data_gen::{create_temp_dir, fixture_dir, movie_dataset};

#[test]
fn test_bundled_csv_matches_fixture() {
    let loaded = load_dataset(fixture_dir(), DataFormat::Csv).unwrap();
    assert_eq!(loaded, movie_dataset());
    assert_eq!(loaded.movies[2].director_id, None);
}

#[test]
fn test_csv_and_jsonl_give_identical_results() {
    let dir = create_temp_dir("jsonl");
    let dataset = load_dataset(fixture_dir(), DataFormat::Csv).unwrap();
    save_dataset(&dataset, &dir, DataFormat::Jsonl).unwrap();

    let from_csv = Engine::from_config(EngineConfig {
        data_dir: fixture_dir().display().to_string(),
        format: DataFormat::Csv,
    })
    .unwrap();
    let from_jsonl = Engine::from_config(EngineConfig {
        data_dir: dir.display().to_string(),
        format: DataFormat::Jsonl,
    })
    .unwrap();

    assert_eq!(from_csv.dataset_hash(), from_jsonl.dataset_hash());
    for query in NamedQuery::ALL {
        let a = from_csv.queries().run(query, &QueryParams::default()).unwrap();
        let b = from_jsonl.queries().run(query, &QueryParams::default()).unwrap();
        assert_eq!(a, b, "{} differs between csv and jsonl", query);
    }

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_data_dir() {
    let err = Engine::from_config(EngineConfig {
        data_dir: create_temp_dir("absent").display().to_string(),
        format: DataFormat::Csv,
    })
    .unwrap_err();
    assert!(matches!(err, ExecError::Load(marquee_io::Error::MissingTable(_))));
    assert!(!err.suggestions().is_empty());
}

#[test]
fn test_invalid_fixture_is_rejected_on_load() {
    let dir = create_temp_dir("dangling");
    let mut dataset = movie_dataset();
    dataset.castings.push(marquee_core::model::Casting::new(1, 500, 9));
    save_dataset(&dataset, &dir, DataFormat::Csv).unwrap();

    let err = Engine::from_config(EngineConfig {
        data_dir: dir.display().to_string(),
        format: DataFormat::Csv,
    })
    .unwrap_err();
    assert!(err.is_data_integrity());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_result_writers() {
    let engine = test_data_gen::engine();
    let rs = engine
        .queries()
        .run(NamedQuery::TravoltasBusiestYears, &QueryParams::default())
        .unwrap();

    let mut csv = CsvWriter::to_writer(Vec::new());
    csv.write_batch(rs.batch()).unwrap();
    let csv = String::from_utf8(csv.into_inner().unwrap()).unwrap();
    assert_eq!(csv, "yr,num_movies\n1978,2\n1983,2\n");

    let mut jsonl = JsonlWriter::to_writer(Vec::new());
    jsonl.write_batch(rs.batch()).unwrap();
    let jsonl = String::from_utf8(jsonl.into_inner().unwrap()).unwrap();
    let rows: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(rows, rs.to_json_rows());
}
