use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Planning error: {0}")]
    Plan(String),

    /// A foreign key points at a row that does not exist.
    #[error("Data integrity error: {table}.{column} = {value} references missing {referenced}")]
    DataIntegrity {
        table: &'static str,
        column: &'static str,
        value: String,
        referenced: &'static str,
    },

    #[error("Duplicate key in {table}: {key}")]
    DuplicateKey { table: &'static str, key: String },

    /// A query parameter outside the domain the query accepts.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Hashing error: {0}")]
    Hash(String),

    #[error("Internal invariant failed: {0}")]
    Invariant(String),

    /// Error with context chain for better debugging
    #[error("Error in {context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Add context to an error, creating an error chain.
    ///
    /// # Example
    /// ```rust,no_run
    /// use marquee_core::error::Error;
    /// let err = Error::Schema("unknown column 'movies.year'".into());
    /// let err = err.with_context("while planning ford_films");
    /// ```
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self) as Box<dyn std::error::Error + Send + Sync>,
        }
    }

    /// True for errors caused by the dataset rather than the query.
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            Error::DataIntegrity { .. } | Error::DuplicateKey { .. } | Error::Invariant(_)
        )
    }

    /// Get suggestions for common errors (e.g., column name suggestions).
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::Schema(msg) => {
                if msg.contains("column") {
                    vec![
                        "Check that the column name is spelled correctly".into(),
                        "Qualify columns with their table or alias, e.g. 'movies.title'".into(),
                    ]
                } else {
                    vec![]
                }
            }
            Error::DataIntegrity { referenced, .. } => vec![
                format!("Add the missing row to {referenced} or remove the dangling casting"),
                "Run `marquee validate` to list integrity problems".into(),
            ],
            Error::DuplicateKey { table, .. } => {
                vec![format!("Remove the repeated key from {table}")]
            }
            Error::Config(msg) => {
                if msg.contains("format") {
                    vec!["Supported dataset formats are 'csv' and 'jsonl'".into()]
                } else {
                    vec![]
                }
            }
            _ => vec![],
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_source() {
        let err = Error::Plan("join keys are empty".into()).with_context("colleagues_of_garfunkel");
        let msg = err.to_string();
        assert!(msg.contains("colleagues_of_garfunkel"));
        assert!(msg.contains("join keys are empty"));
    }

    #[test]
    fn integrity_errors_are_flagged() {
        let err = Error::DataIntegrity {
            table: "castings",
            column: "movie_id",
            value: "7".into(),
            referenced: "movies",
        };
        assert!(err.is_data_integrity());
        assert!(!Error::Schema("x".into()).is_data_integrity());
        assert!(Error::Invariant("ord 0".into()).is_data_integrity());
        assert!(!err.suggestions().is_empty());
    }
}
