use marquee_core::error::Error as CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    /// The dataset failed its integrity checks; no engine was built.
    #[error("dataset rejected: {0}")]
    Dataset(#[source] CoreError),

    /// Plan construction or parameter validation failed.
    #[error(transparent)]
    Query(#[from] CoreError),

    #[error(transparent)]
    Load(#[from] marquee_io::Error),

    #[error("operator exec: {0}")]
    Operator(String),

    #[error("invalid plan: {0}")]
    Invalid(String),

    #[error("hashing error: {0}")]
    Hash(String),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ExecError {
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, ExecError::Dataset(e) if e.is_data_integrity())
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ExecError::Dataset(e) | ExecError::Query(e) => e.suggestions(),
            ExecError::Load(marquee_io::Error::MissingTable(_)) => vec![
                "Point --data-dir (or MARQUEE_DATA_DIR) at a directory with movies, \
                 actors and castings tables"
                    .into(),
                "Check --data-format matches the file extensions (csv or jsonl)".into(),
            ],
            _ => vec![],
        }
    }
}
