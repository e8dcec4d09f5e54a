//! Operator trait + common interfaces.
//!
//! The engine calls `plan(...)` once per plan node to validate column
//! references and obtain the output schema, then `eval(...)` with the fully
//! materialised input batches (children are evaluated first).

use marquee_core::schema::Schema;
use marquee_core::types::RowBatch;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("planning error: {0}")]
    Plan(String),

    #[error("execution error: {0}")]
    Exec(String),

    #[error("schema error: {0}")]
    Schema(String),
}

impl OpError {
    /// Add context to an error, creating an error chain.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let ctx = context.into();
        match self {
            OpError::Plan(msg) => OpError::Plan(format!("{}: {}", ctx, msg)),
            OpError::Exec(msg) => OpError::Exec(format!("{}: {}", ctx, msg)),
            OpError::Schema(msg) => OpError::Schema(format!("{}: {}", ctx, msg)),
        }
    }

    /// Get suggestions for common errors.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            OpError::Schema(msg) => {
                if msg.contains("unknown column") {
                    vec![
                        "Check that the column name is spelled correctly".into(),
                        "Columns are qualified by table or alias, e.g. 'actors.name'".into(),
                    ]
                } else if msg.contains("duplicate column") {
                    vec!["Use an alias to give sub-query columns distinct names".into()]
                } else {
                    vec![]
                }
            }
            OpError::Exec(msg) if msg.contains("expression") => vec![
                "Check expression syntax".into(),
                "Verify column names and literal values".into(),
            ],
            _ => vec![],
        }
    }
}

/// Trait that all operators implement.
///
/// Invariants:
/// - `eval` must be deterministic given the same inputs.
/// - `eval` must produce columns named exactly as the schema from `plan`.
pub trait Operator: Send + Sync {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Given input schemas, return the output schema.
    fn plan(&self, input_schemas: &[Schema]) -> Result<Schema, OpError>;

    /// Evaluate the operator. Unary operators read `inputs[0]`; joins read
    /// `inputs[0]` (probe side) and `inputs[1]` (build side).
    fn eval(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError>;
}

/// Single input of a unary operator.
pub(crate) fn unary<'a, T>(inputs: &'a [T], op: &str) -> Result<&'a T, String> {
    match inputs {
        [one] => Ok(one),
        _ => Err(format!("{} expects one input, got {}", op, inputs.len())),
    }
}

/// Reject a schema whose field names are not unique.
pub(crate) fn ensure_unique(schema: &Schema) -> Result<(), OpError> {
    for (i, f) in schema.fields.iter().enumerate() {
        if schema.fields[..i].iter().any(|g| g.name == f.name) {
            return Err(OpError::Schema(format!("duplicate column '{}'", f.name)));
        }
    }
    Ok(())
}
