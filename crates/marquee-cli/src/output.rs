//! Result rendering for stdout.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use marquee_exec::ResultSet;
use marquee_io::writers::csv::CsvWriter;
use marquee_io::writers::jsonl::JsonlWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table
    Table,
    Csv,
    Jsonl,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            other => Err(format!("unknown output format '{other}' (table, csv, jsonl)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
            OutputFormat::Jsonl => "jsonl",
        })
    }
}

pub fn write_result(
    result: &ResultSet,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let out = stdout.lock();
    match format {
        OutputFormat::Csv => CsvWriter::to_writer(out).write_batch(result.batch())?,
        OutputFormat::Jsonl => JsonlWriter::to_writer(out).write_batch(result.batch())?,
        OutputFormat::Table => write_table(result, out)?,
    }
    Ok(())
}

fn write_table(result: &ResultSet, mut out: impl Write) -> std::io::Result<()> {
    let headers = result.column_names();
    let cells: Vec<Vec<String>> = result
        .rows()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |out: &mut dyn Write, values: &[&str]| -> std::io::Result<()> {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<w$}", v, w = *w))
            .collect();
        writeln!(out, "{}", padded.join("  ").trim_end())
    };

    line(&mut out, &headers)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
    line(&mut out, &rule)?;
    for row in &cells {
        let row: Vec<&str> = row.iter().map(String::as_str).collect();
        line(&mut out, &row)?;
    }
    writeln!(out, "({} row{})", cells.len(), if cells.len() == 1 { "" } else { "s" })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::schema::{DataType, Field, Schema};
    use marquee_core::types::{Column, RowBatch, Scalar};

    #[test]
    fn parses_formats() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("ndjson".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn table_pads_columns() {
        let schema = Schema::new(vec![
            Field::new("title", DataType::Utf8, false),
            Field::new("num_actors", DataType::Int64, false),
        ]);
        let batch = RowBatch::new(vec![
            Column::new("title", vec!["Superman".into(), "Grease".into()]),
            Column::new("num_actors", vec![Scalar::I64(4), Scalar::I64(3)]),
        ]);
        let mut out = Vec::new();
        write_table(&ResultSet::new(schema, batch), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "title     num_actors\n--------  ----------\nSuperman  4\nGrease    3\n(2 rows)\n"
        );
    }
}
