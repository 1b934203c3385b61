//! Path query parser and evaluator for selecting values from JSON documents.
//!
//! A query names a single value inside a document. Each query yields at most
//! one match: the first value, in document order, that satisfies every segment.
//!
//! # Supported Syntax
//!
//! - `$` - Document root
//! - `@` - Element under test inside a filter (the root at top level)
//! - `.property` or `["property"]` - Named member access
//! - `[index]` - Array element (zero-based, non-negative)
//! - `.*` or `[*]` - Any member or element
//! - `[expr]` or `[?(expr)]` - First member or element for which `expr` holds
//! - `==` (or `=`), `!=`, `<`, `<=`, `>`, `>=` - Comparisons
//! - `&&`, `||`, `!`, `( )` - Logical combinators and grouping
//! - `NAME=path` - Capture the match under `NAME` for shell export
//!
//! # Examples
//!
//! ```
//! use jsonfilter::jsonpath::Query;
//! use serde_json::json;
//!
//! let doc = json!({"interface": [{"up": false, "name": "wan"}, {"up": true, "name": "lan"}]});
//! let query: Query = "@.interface[@.up=true].name".parse().unwrap();
//! assert_eq!(query.evaluate(&doc), Some(&json!("lan")));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;

pub use ast::{Anchor, CompareOp, Expr, Literal, Operand, Path, PathSegment, Query};
pub use error::{LexError, QueryError};
pub use evaluator::Evaluator;
pub use parser::Parser;
