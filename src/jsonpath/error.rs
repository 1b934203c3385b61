//! Error types for query tokenizing and parsing.

use thiserror::Error;

/// Errors raised while tokenizing a query expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unexpected character '{found}'")]
    UnexpectedCharacter { position: usize, found: char },
    #[error("Unterminated string")]
    UnterminatedString { position: usize },
    #[error("Invalid escape sequence")]
    InvalidEscape { position: usize },
    #[error("Invalid number '{literal}'")]
    InvalidNumber { position: usize, literal: String },
}

impl LexError {
    /// Byte offset of the offending input.
    pub fn position(&self) -> usize {
        match self {
            LexError::UnexpectedCharacter { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::InvalidEscape { position }
            | LexError::InvalidNumber { position, .. } => *position,
        }
    }
}

/// Errors that can occur while parsing a query expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("Unexpected token {found}, expecting {expected}")]
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    #[error("Unexpected end of expression, expecting {expected}")]
    UnexpectedEnd { position: usize, expected: String },
    #[error("Expression nested deeper than {limit} levels")]
    TooDeep { position: usize, limit: usize },
}

impl QueryError {
    /// Byte offset in the expression where the problem was detected.
    pub fn position(&self) -> usize {
        match self {
            QueryError::Lex(err) => err.position(),
            QueryError::UnexpectedToken { position, .. }
            | QueryError::UnexpectedEnd { position, .. }
            | QueryError::TooDeep { position, .. } => *position,
        }
    }

    /// Multi-line report naming the expression and pointing at the error.
    ///
    /// ```text
    /// Syntax error: Unexpected token ']', expecting a label or '*'
    /// In expression $.a.]
    /// Near here --------^
    /// ```
    pub fn report(&self, expression: &str) -> String {
        let column = expression
            .get(..self.position())
            .map(|prefix| prefix.chars().count())
            .unwrap_or_else(|| expression.chars().count());

        format!(
            "Syntax error: {}\nIn expression {}\nNear here ----{}^",
            self,
            expression,
            "-".repeat(column)
        )
    }
}
