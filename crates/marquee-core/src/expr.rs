//! Expression engine for SQL-like predicates.
//!
//! Supports comparisons, logical connectives, NULL tests, column references
//! and literals. Used by the Filter operator; the YAML query DSL parses
//! predicate strings with [`Expr::parse`], the plan builder constructs them
//! with [`col`] and [`lit`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{RowBatch, Scalar};

/// Binary operators for expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    // Comparison operators
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical operators
    And,
    Or,
}

impl BinOp {
    /// Parse a binary operator from a string.
    pub fn parse(op: &str) -> Result<Self, String> {
        match op {
            "==" | "=" => Ok(BinOp::Eq),
            "!=" | "<>" => Ok(BinOp::Ne),
            "<" => Ok(BinOp::Lt),
            "<=" => Ok(BinOp::Le),
            ">" => Ok(BinOp::Gt),
            ">=" => Ok(BinOp::Ge),
            "AND" | "and" | "&&" => Ok(BinOp::And),
            "OR" | "or" | "||" => Ok(BinOp::Or),
            _ => Err(format!("unknown binary operator: {}", op)),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            BinOp::Eq => "=",
            BinOp::Ne => "<>",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "AND",
            BinOp::Or => "OR",
        }
    }
}

/// Unary operators for expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    IsNull,
    IsNotNull,
}

/// Expression AST for SQL-like expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Column reference: "movies.title"
    Column(String),
    /// Literal value: 1962, 'Harrison Ford', true
    Literal(Scalar),
    /// Binary operation: left OP right
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Unary operation: OP arg
    UnaryOp { op: UnaryOp, arg: Box<Expr> },
}

/// Column reference.
pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column(name.into())
}

/// Literal value.
pub fn lit(value: impl Into<Scalar>) -> Expr {
    Expr::Literal(value.into())
}

impl Expr {
    fn binary(self, op: BinOp, right: Expr) -> Expr {
        Expr::BinaryOp {
            op,
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    pub fn eq(self, right: Expr) -> Expr {
        self.binary(BinOp::Eq, right)
    }

    pub fn not_eq(self, right: Expr) -> Expr {
        self.binary(BinOp::Ne, right)
    }

    pub fn gt_eq(self, right: Expr) -> Expr {
        self.binary(BinOp::Ge, right)
    }

    pub fn and(self, right: Expr) -> Expr {
        self.binary(BinOp::And, right)
    }

    pub fn or(self, right: Expr) -> Expr {
        self.binary(BinOp::Or, right)
    }

    pub fn is_null(self) -> Expr {
        Expr::UnaryOp {
            op: UnaryOp::IsNull,
            arg: Box::new(self),
        }
    }

    /// Column names referenced anywhere in the expression.
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Column(name) => out.push(name),
            Expr::Literal(_) => {}
            Expr::BinaryOp { left, right, .. } => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Expr::UnaryOp { arg, .. } => arg.collect_columns(out),
        }
    }

    /// Parse a predicate string into an Expr AST.
    ///
    /// Grammar, loosest binding first: `OR`, `AND`, `NOT`, `IS [NOT] NULL`,
    /// a single comparison, an atom. Keywords are case-insensitive and are
    /// ignored inside quoted literals. Parentheses are not supported.
    pub fn parse(expr_str: &str) -> Result<Self, String> {
        let expr_str = expr_str.trim();
        if expr_str.is_empty() {
            return Err("empty expression".into());
        }

        for (keyword, op) in [(" OR ", BinOp::Or), (" AND ", BinOp::And)] {
            let parts = split_keyword(expr_str, keyword);
            if parts.len() > 1 {
                let mut iter = parts.into_iter();
                let first = Self::parse(iter.next().unwrap_or_default())?;
                return iter.try_fold(first, |acc, part| Ok(acc.binary(op, Self::parse(part)?)));
            }
        }

        if let Some(rest) = strip_prefix_ci(expr_str, "NOT ") {
            return Ok(Expr::UnaryOp {
                op: UnaryOp::Not,
                arg: Box::new(Self::parse(rest)?),
            });
        }
        if let Some(rest) = strip_suffix_ci(expr_str, " IS NOT NULL") {
            return Ok(Expr::UnaryOp {
                op: UnaryOp::IsNotNull,
                arg: Box::new(Self::parse_atom(rest)?),
            });
        }
        if let Some(rest) = strip_suffix_ci(expr_str, " IS NULL") {
            return Ok(Expr::UnaryOp {
                op: UnaryOp::IsNull,
                arg: Box::new(Self::parse_atom(rest)?),
            });
        }

        if let Some((pos, op_str)) = find_comparison(expr_str) {
            let left_str = expr_str[..pos].trim();
            let right_str = expr_str[pos + op_str.len()..].trim();
            if left_str.is_empty() || right_str.is_empty() {
                return Err(format!("incomplete comparison: '{}'", expr_str));
            }
            let op = BinOp::parse(op_str)?;
            return Ok(Self::parse_atom(left_str)?.binary(op, Self::parse_atom(right_str)?));
        }

        Self::parse_atom(expr_str)
    }

    /// Parse an atomic expression (column or literal).
    fn parse_atom(atom_str: &str) -> Result<Self, String> {
        let atom_str = atom_str.trim();

        if let Ok(scalar) = parse_literal(atom_str) {
            return Ok(Expr::Literal(scalar));
        }

        let valid = atom_str
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.');
        if atom_str.is_empty() || !valid {
            return Err(format!("cannot parse '{}' as column or literal", atom_str));
        }
        Ok(Expr::Column(atom_str.to_string()))
    }

    /// Evaluate an expression against a row in a RowBatch.
    pub fn evaluate(&self, batch: &RowBatch, row_idx: usize) -> Result<Scalar, String> {
        match self {
            Expr::Column(name) => {
                let col = batch.column(name).ok_or_else(|| {
                    format!(
                        "column '{}' not found. Available columns: {:?}",
                        name,
                        batch.column_names()
                    )
                })?;
                col.values
                    .get(row_idx)
                    .cloned()
                    .ok_or_else(|| format!("row index {} out of bounds", row_idx))
            }
            Expr::Literal(scalar) => Ok(scalar.clone()),
            Expr::BinaryOp { op, left, right } => {
                let left_val = left.evaluate(batch, row_idx)?;
                let right_val = right.evaluate(batch, row_idx)?;
                Ok(evaluate_binary_op(*op, &left_val, &right_val))
            }
            Expr::UnaryOp { op, arg } => {
                let arg_val = arg.evaluate(batch, row_idx)?;
                Ok(evaluate_unary_op(*op, &arg_val))
            }
        }
    }

    /// Evaluate an expression to a boolean (for predicates). NULL is false.
    pub fn evaluate_bool(&self, batch: &RowBatch, row_idx: usize) -> Result<bool, String> {
        Ok(self.evaluate(batch, row_idx)?.is_truthy())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(name) => f.write_str(name),
            Expr::Literal(Scalar::Str(s)) => write!(f, "'{}'", s),
            Expr::Literal(Scalar::Null) => f.write_str("NULL"),
            Expr::Literal(v) => write!(f, "{}", v),
            Expr::BinaryOp { op, left, right } => {
                write!(f, "{} {} {}", left, op.symbol(), right)
            }
            Expr::UnaryOp { op, arg } => match op {
                UnaryOp::Not => write!(f, "NOT {}", arg),
                UnaryOp::IsNull => write!(f, "{} IS NULL", arg),
                UnaryOp::IsNotNull => write!(f, "{} IS NOT NULL", arg),
            },
        }
    }
}

/// Parse a literal string into a Scalar value.
fn parse_literal(literal: &str) -> Result<Scalar, String> {
    let trimmed = literal.trim();

    if trimmed.eq_ignore_ascii_case("null") {
        return Ok(Scalar::Null);
    }
    if let Ok(b) = trimmed.parse::<bool>() {
        return Ok(Scalar::Bool(b));
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Ok(Scalar::I64(i));
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return Ok(Scalar::F64(f));
    }

    // Try string (remove quotes if present)
    if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        let unquoted = &trimmed[1..trimmed.len() - 1];
        return Ok(Scalar::Str(unquoted.to_string()));
    }

    Err(format!("cannot parse '{}' as literal", literal))
}

/// Split on a case-insensitive keyword that is not inside quotes.
fn split_keyword<'a>(s: &'a str, keyword: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut skip_until = 0;
    for (i, c) in s.char_indices() {
        if i < skip_until {
            continue;
        }
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None => {
                let matches = s
                    .get(i..i + keyword.len())
                    .map(|w| w.eq_ignore_ascii_case(keyword))
                    .unwrap_or(false);
                if matches {
                    parts.push(&s[start..i]);
                    start = i + keyword.len();
                    skip_until = start;
                }
            }
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Position and text of the first comparison operator outside quotes.
fn find_comparison(s: &str) -> Option<(usize, &'static str)> {
    const OPS: [&str; 8] = ["==", "!=", "<>", "<=", ">=", "=", "<", ">"];
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None => {
                if let Some(op) = OPS.iter().find(|op| s[i..].starts_with(**op)) {
                    return Some((i, op));
                }
            }
        }
    }
    None
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let at = s.len().checked_sub(suffix.len())?;
    let tail = s.get(at..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &s[..at])
}

/// Evaluate a binary operation with SQL NULL semantics.
fn evaluate_binary_op(op: BinOp, left: &Scalar, right: &Scalar) -> Scalar {
    let compare = |f: fn(std::cmp::Ordering) -> bool| {
        if left.is_null() || right.is_null() {
            Scalar::Null
        } else {
            Scalar::Bool(f(left.sql_cmp(right)))
        }
    };
    match op {
        BinOp::Eq => left.sql_eq(right).map(Scalar::Bool).unwrap_or(Scalar::Null),
        BinOp::Ne => left
            .sql_eq(right)
            .map(|b| Scalar::Bool(!b))
            .unwrap_or(Scalar::Null),
        BinOp::Lt => compare(|o| o.is_lt()),
        BinOp::Le => compare(|o| o.is_le()),
        BinOp::Gt => compare(|o| o.is_gt()),
        BinOp::Ge => compare(|o| o.is_ge()),
        BinOp::And => Scalar::Bool(left.is_truthy() && right.is_truthy()),
        BinOp::Or => Scalar::Bool(left.is_truthy() || right.is_truthy()),
    }
}

/// Evaluate a unary operation.
fn evaluate_unary_op(op: UnaryOp, arg: &Scalar) -> Scalar {
    match op {
        UnaryOp::Not => {
            if arg.is_null() {
                Scalar::Null
            } else {
                Scalar::Bool(!arg.is_truthy())
            }
        }
        UnaryOp::IsNull => Scalar::Bool(arg.is_null()),
        UnaryOp::IsNotNull => Scalar::Bool(!arg.is_null()),
    }
}
