//! Logical plan tree.
//!
//! Plans are built by `marquee-planner` and interpreted by `marquee-exec`.
//! Every node is serde-serialisable so plans can be fingerprinted and
//! printed by `explain`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expr::Expr;
use crate::schema::Schema;

/// Aggregate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggFunc {
    /// Number of non-NULL values.
    Count,
    Sum,
    Min,
    Max,
    Avg,
}

impl AggFunc {
    /// Parse from "count", "sum", "min", "max", "avg".
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "count" => Ok(AggFunc::Count),
            "sum" => Ok(AggFunc::Sum),
            "min" => Ok(AggFunc::Min),
            "max" => Ok(AggFunc::Max),
            "avg" => Ok(AggFunc::Avg),
            other => Err(format!("unknown agg function: {}", other)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggFunc::Count => "count",
            AggFunc::Sum => "sum",
            AggFunc::Min => "min",
            AggFunc::Max => "max",
            AggFunc::Avg => "avg",
        }
    }
}

/// `func(column) AS alias`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateExpr {
    pub func: AggFunc,
    pub column: String,
    pub alias: String,
}

impl AggregateExpr {
    pub fn count(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            func: AggFunc::Count,
            column: column.into(),
            alias: alias.into(),
        }
    }
}

/// `column [AS alias]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectItem {
    pub column: String,
    pub alias: Option<String>,
}

impl ProjectItem {
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.column)
    }
}

impl From<&str> for ProjectItem {
    fn from(column: &str) -> Self {
        Self {
            column: column.to_string(),
            alias: None,
        }
    }
}

impl From<(&str, &str)> for ProjectItem {
    fn from((column, alias): (&str, &str)) -> Self {
        Self {
            column: column.to_string(),
            alias: Some(alias.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogicalPlan {
    /// Full scan of a base table; `schema` is already qualified by table name.
    Scan { table: String, schema: Schema },
    /// Re-qualify every column of a materialised sub-query with `name`.
    Alias { input: Box<LogicalPlan>, name: String },
    Filter { input: Box<LogicalPlan>, predicate: Expr },
    Project {
        input: Box<LogicalPlan>,
        columns: Vec<ProjectItem>,
    },
    /// Inner equi-join on `left_column = right_column`.
    Join {
        left: Box<LogicalPlan>,
        right: Box<LogicalPlan>,
        on: (String, String),
    },
    Aggregate {
        input: Box<LogicalPlan>,
        group_by: Vec<String>,
        aggs: Vec<AggregateExpr>,
    },
    Sort {
        input: Box<LogicalPlan>,
        keys: Vec<SortKey>,
    },
}

impl LogicalPlan {
    pub fn children(&self) -> Vec<&LogicalPlan> {
        use LogicalPlan::*;
        match self {
            Scan { .. } => vec![],
            Alias { input, .. }
            | Filter { input, .. }
            | Project { input, .. }
            | Aggregate { input, .. }
            | Sort { input, .. } => vec![input.as_ref()],
            Join { left, right, .. } => vec![left.as_ref(), right.as_ref()],
        }
    }

    /// Names of the base tables this plan reads, in scan order.
    pub fn tables(&self) -> Vec<&str> {
        match self {
            LogicalPlan::Scan { table, .. } => vec![table.as_str()],
            other => other.children().into_iter().flat_map(|c| c.tables()).collect(),
        }
    }

    fn describe(&self) -> String {
        use LogicalPlan::*;
        match self {
            Scan { table, .. } => format!("Scan: {}", table),
            Alias { name, .. } => format!("Alias: {}", name),
            Filter { predicate, .. } => format!("Filter: {}", predicate),
            Project { columns, .. } => {
                let cols: Vec<String> = columns
                    .iter()
                    .map(|c| match &c.alias {
                        Some(alias) => format!("{} AS {}", c.column, alias),
                        None => c.column.clone(),
                    })
                    .collect();
                format!("Project: {}", cols.join(", "))
            }
            Join { on, .. } => format!("Join: {} = {}", on.0, on.1),
            Aggregate { group_by, aggs, .. } => {
                let aggs: Vec<String> = aggs
                    .iter()
                    .map(|a| format!("{}({}) AS {}", a.func.name(), a.column, a.alias))
                    .collect();
                format!(
                    "Aggregate: group_by=[{}] aggs=[{}]",
                    group_by.join(", "),
                    aggs.join(", ")
                )
            }
            Sort { keys, .. } => {
                let keys: Vec<String> = keys
                    .iter()
                    .map(|k| {
                        let dir = if k.descending { "DESC" } else { "ASC" };
                        format!("{} {}", k.column, dir)
                    })
                    .collect();
                format!("Sort: {}", keys.join(", "))
            }
        }
    }

    fn fmt_indent(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.describe(), indent = depth * 2)?;
        for child in self.children() {
            child.fmt_indent(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for LogicalPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indent(f, 0)
    }
}
