//! Engine configuration.
//!
//! Defaults can be overridden from the environment:
//! - `MARQUEE_DATA_DIR`: directory holding `movies`, `actors`, `castings` tables
//! - `MARQUEE_FORMAT`: `csv` (default) or `jsonl`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    #[default]
    Csv,
    Jsonl,
}

impl DataFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Jsonl => "jsonl",
        }
    }
}

impl FromStr for DataFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(DataFormat::Csv),
            "jsonl" | "ndjson" => Ok(DataFormat::Jsonl),
            other => Err(Error::Config(format!("unknown dataset format '{other}'"))),
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub data_dir: String,
    pub format: DataFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            format: DataFormat::Csv,
        }
    }
}

impl EngineConfig {
    pub const ENV_DATA_DIR: &'static str = "MARQUEE_DATA_DIR";
    pub const ENV_FORMAT: &'static str = "MARQUEE_FORMAT";

    /// Defaults overlaid with any `MARQUEE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        if let Ok(dir) = std::env::var(Self::ENV_DATA_DIR) {
            cfg.data_dir = dir;
        }
        if let Ok(format) = std::env::var(Self::ENV_FORMAT) {
            cfg.format = format.parse()?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(Error::Config("data_dir must not be empty".into()));
        }
        Ok(())
    }
}
