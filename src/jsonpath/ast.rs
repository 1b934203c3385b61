//! Abstract syntax tree types for query expressions.
//!
//! A parsed query is a single owned tree. Dropping the [`Query`] releases
//! every node; nothing is shared between trees.

use std::fmt;

/// Where a path starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Document root (`$`)
    Root,
    /// Element currently under test by the enclosing filter (`@`)
    This,
}

/// One step of a path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Object member lookup (`.name` or `["name"]`)
    Key(String),
    /// Array element lookup (`[0]`)
    Index(i64),
    /// Selection over the members or elements of a container (`[@.x > 1]`, `.*`)
    Filter(Expr),
}

/// An anchored chain of segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub anchor: Anchor,
    pub segments: Vec<PathSegment>,
}

impl Path {
    /// Creates a new path from an anchor and its segments.
    pub fn new(anchor: Anchor, segments: Vec<PathSegment>) -> Self {
        Self { anchor, segments }
    }
}

/// A literal value usable as a comparison operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Bool(bool),
    Number(i64),
    String(String),
}

impl Literal {
    /// Name of the literal kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Bool(_) => "boolean",
            Literal::Number(_) => "number",
            Literal::String(_) => "string",
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Applies the operator to the ordering of left against right.
    pub fn holds(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            CompareOp::Eq => ordering == Equal,
            CompareOp::Ne => ordering != Equal,
            CompareOp::Lt => ordering == Less,
            CompareOp::Le => ordering != Greater,
            CompareOp::Gt => ordering == Greater,
            CompareOp::Ge => ordering != Less,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        };
        f.write_str(symbol)
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Literal),
    /// Sub-path resolved against `$` or `@`, then coerced to a comparable scalar.
    Path(Path),
}

/// A boolean filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `*` - always true
    Wildcard,
    Not(Box<Expr>),
    /// Conjunction of one or more operands, evaluated left to right.
    And(Vec<Expr>),
    /// Disjunction of one or more operands, evaluated left to right.
    Or(Vec<Expr>),
    Compare {
        op: CompareOp,
        left: Operand,
        right: Operand,
    },
    /// A bare path: true when it resolves to any value, null included.
    Exists(Path),
    /// A bare literal. Never selects anything.
    Literal(Literal),
}

/// A complete query: an optional capture label wrapping a path.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub label: Option<String>,
    pub path: Path,
}

impl Query {
    /// Creates a new query.
    pub fn new(label: Option<String>, path: Path) -> Self {
        Self { label, path }
    }

    /// Name of the capture requested with a `name=` prefix, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
