use std::cmp::Ordering;

use log::{debug, trace};
use serde_json::{Number, Value};

use super::ast::{Anchor, Expr, Literal, Operand, Path, PathSegment, Query};

/// Why a comparison could not be carried out. Folded to `false` by filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incomparable {
    /// The operand path matched nothing.
    Unresolved,
    /// The operand path matched a value that has no comparable form.
    NotCoercible(&'static str),
    /// Both operands resolved, but to different literal kinds.
    KindMismatch {
        left: &'static str,
        right: &'static str,
    },
}

/// A comparison operand after resolution.
///
/// Document numbers keep their exact representation, so floats and integers
/// beyond the `i64` range compare by value against integer literals.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    fn kind(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "boolean",
            Scalar::Number(_) => "number",
            Scalar::String(_) => "string",
        }
    }
}

impl From<&Literal> for Scalar {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Bool(b) => Scalar::Bool(*b),
            Literal::Number(n) => Scalar::Number(Number::from(*n)),
            Literal::String(s) => Scalar::String(s.clone()),
        }
    }
}

pub struct Evaluator<'a> {
    root: &'a Value,
}

impl<'a> Evaluator<'a> {
    pub fn new(root: &'a Value) -> Self {
        Evaluator { root }
    }

    /// Evaluates a query and returns the matched value.
    ///
    /// A capture label does not change what is matched; the document is both
    /// root and starting point whatever the anchor.
    pub fn evaluate(&self, query: &Query) -> Option<&'a Value> {
        let result = self.walk(&query.path.segments, self.root);
        debug!(
            "query {} against document: {}",
            query.label().unwrap_or("<unlabeled>"),
            if result.is_some() { "matched" } else { "no match" }
        );
        result
    }

    /// Resolves a path against its anchor. `this` is the element under test.
    pub fn evaluate_path(&self, path: &Path, this: &'a Value) -> Option<&'a Value> {
        let start = match path.anchor {
            Anchor::Root => self.root,
            Anchor::This => this,
        };
        self.walk(&path.segments, start)
    }

    fn walk(&self, segments: &[PathSegment], current: &'a Value) -> Option<&'a Value> {
        let Some((segment, rest)) = segments.split_first() else {
            return Some(current);
        };

        match segment {
            PathSegment::Key(name) => self.walk(rest, current.as_object()?.get(name)?),
            PathSegment::Index(idx) => {
                let idx = usize::try_from(*idx).ok()?;
                self.walk(rest, current.as_array()?.get(idx)?)
            }
            PathSegment::Filter(expr) => self.select(expr, rest, current),
        }
    }

    /// Returns the first child, in document order, that passes the filter and
    /// from which the remaining segments resolve.
    fn select(&self, expr: &Expr, rest: &[PathSegment], current: &'a Value) -> Option<&'a Value> {
        let mut found = |child: &'a Value| {
            if self.test(expr, child) {
                self.walk(rest, child)
            } else {
                None
            }
        };

        match current {
            Value::Object(members) => members.values().find_map(&mut found),
            Value::Array(items) => items.iter().find_map(&mut found),
            _ => None,
        }
    }

    /// Evaluates a filter expression with `this` as the element under test.
    pub fn test(&self, expr: &Expr, this: &'a Value) -> bool {
        match expr {
            Expr::Wildcard => true,
            Expr::Not(inner) => !self.test(inner, this),
            Expr::And(operands) => operands.iter().all(|op| self.test(op, this)),
            Expr::Or(operands) => operands.iter().any(|op| self.test(op, this)),
            Expr::Exists(path) => self.evaluate_path(path, this).is_some(),
            Expr::Compare { op, left, right } => match self.compare(left, right, this) {
                Ok(ordering) => op.holds(ordering),
                Err(reason) => {
                    trace!("comparison {} treated as false: {:?}", op, reason);
                    false
                }
            },
            Expr::Literal(_) => false,
        }
    }

    fn compare(
        &self,
        left: &Operand,
        right: &Operand,
        this: &'a Value,
    ) -> Result<Ordering, Incomparable> {
        let left = self.resolve(left, this)?;
        let right = self.resolve(right, this)?;

        match (&left, &right) {
            (Scalar::Bool(a), Scalar::Bool(b)) => Ok(a.cmp(b)),
            (Scalar::Number(a), Scalar::Number(b)) => {
                compare_numbers(a, b).ok_or(Incomparable::NotCoercible("number"))
            }
            (Scalar::String(a), Scalar::String(b)) => Ok(a.as_bytes().cmp(b.as_bytes())),
            _ => Err(Incomparable::KindMismatch {
                left: left.kind(),
                right: right.kind(),
            }),
        }
    }

    fn resolve(&self, operand: &Operand, this: &'a Value) -> Result<Scalar, Incomparable> {
        match operand {
            Operand::Literal(literal) => Ok(Scalar::from(literal)),
            Operand::Path(path) => {
                let value = self
                    .evaluate_path(path, this)
                    .ok_or(Incomparable::Unresolved)?;
                coerce(value)
            }
        }
    }
}

impl Query {
    /// Matches this query against a document.
    pub fn evaluate<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        Evaluator::new(document).evaluate(self)
    }
}

/// Converts a scalar document value into a comparison operand.
pub fn coerce(value: &Value) -> Result<Scalar, Incomparable> {
    match value {
        Value::Bool(b) => Ok(Scalar::Bool(*b)),
        Value::Number(n) => Ok(Scalar::Number(n.clone())),
        Value::String(s) => Ok(Scalar::String(s.clone())),
        Value::Null => Err(Incomparable::NotCoercible("null")),
        Value::Array(_) => Err(Incomparable::NotCoercible("array")),
        Value::Object(_) => Err(Incomparable::NotCoercible("object")),
    }
}

/// Orders two JSON numbers by value, whatever their representation.
fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    match (as_integer(a), as_integer(b)) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        (Some(x), None) => compare_integer_float(x, b.as_f64()?),
        (None, Some(y)) => compare_integer_float(y, a.as_f64()?).map(Ordering::reverse),
        (None, None) => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Exact ordering of an integer against a float, without rounding the integer.
fn compare_integer_float(int: i128, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }

    // Every i128 lies in [-2^127, 2^127).
    let bound = 2f64.powi(127);
    let floor = float.floor();
    if floor >= bound {
        return Some(Ordering::Less);
    }
    if floor < -bound {
        return Some(Ordering::Greater);
    }

    let fraction = if float > floor {
        Ordering::Less
    } else {
        Ordering::Equal
    };
    Some(int.cmp(&(floor as i128)).then(fraction))
}
