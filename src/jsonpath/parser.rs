//! Query expression parser.
//!
//! Recursive descent over the token stream. Precedence, lowest first:
//! `||`, `&&`, `!`, comparisons, parentheses.

use std::str::FromStr;

use log::debug;

use super::ast::{Anchor, CompareOp, Expr, Literal, Operand, Path, PathSegment, Query};
use super::error::QueryError;
use super::lexer::{Lexer, Token, TokenKind};

/// Deepest nesting of brackets, parentheses and `!` accepted in one query.
pub const MAX_DEPTH: usize = 128;

/// Parser for query strings.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    /// Creates a new parser over already tokenized input.
    pub fn new(tokens: Vec<Token>, input_len: usize) -> Self {
        Self {
            tokens,
            position: 0,
            end: input_len,
            depth: 0,
        }
    }

    /// Parses the query string into a [`Query`].
    pub fn parse(query: &str) -> Result<Query, QueryError> {
        let tokens = Lexer::tokenize(query)?;
        let mut parser = Parser::new(tokens, query.len());
        let parsed = parser.parse_query()?;
        debug!("parsed query {:?}: {:?}", query, parsed);
        Ok(parsed)
    }

    fn parse_query(&mut self) -> Result<Query, QueryError> {
        let label = match (self.peek(), self.peek_at(1)) {
            (Some(TokenKind::Label(name)), Some(TokenKind::Eq)) => {
                let name = name.clone();
                self.position += 2;
                Some(name)
            }
            _ => None,
        };

        let path = self.parse_path()?;

        if let Some(token) = self.tokens.get(self.position) {
            return Err(QueryError::UnexpectedToken {
                position: token.position,
                found: token.kind.to_string(),
                expected: "end of expression".to_string(),
            });
        }

        Ok(Query::new(label, path))
    }

    /// Returns the current token kind without advancing.
    fn peek(&self) -> Option<&TokenKind> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.position + offset).map(|t| &t.kind)
    }

    /// Consumes the current token if it matches `kind`.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Expects a specific token and advances, or returns an error.
    fn expect(&mut self, kind: TokenKind) -> Result<(), QueryError> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    /// Builds an error describing the token at the current position.
    fn unexpected(&self, expected: &str) -> QueryError {
        match self.tokens.get(self.position) {
            Some(token) => QueryError::UnexpectedToken {
                position: token.position,
                found: token.kind.to_string(),
                expected: expected.to_string(),
            },
            None => QueryError::UnexpectedEnd {
                position: self.end,
                expected: expected.to_string(),
            },
        }
    }

    /// Enters one nesting level at the current token.
    fn descend(&mut self) -> Result<(), QueryError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let position = self
                .tokens
                .get(self.position)
                .map_or(self.end, |token| token.position);
            return Err(QueryError::TooDeep {
                position,
                limit: MAX_DEPTH,
            });
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn parse_path(&mut self) -> Result<Path, QueryError> {
        let anchor = match self.peek() {
            Some(TokenKind::Root) => Anchor::Root,
            Some(TokenKind::This) => Anchor::This,
            _ => return Err(self.unexpected("'$' or '@'")),
        };
        self.position += 1;

        let mut segments = Vec::new();
        loop {
            match self.peek() {
                Some(TokenKind::Dot) => {
                    self.position += 1;
                    segments.push(self.parse_dot_segment()?);
                }
                Some(TokenKind::BracketOpen) => {
                    self.position += 1;
                    segments.push(self.parse_bracket_segment()?);
                }
                _ => break,
            }
        }

        Ok(Path::new(anchor, segments))
    }

    /// Parses the member after a dot: `.name`, `.true` or `.*`
    fn parse_dot_segment(&mut self) -> Result<PathSegment, QueryError> {
        let segment = match self.peek() {
            Some(TokenKind::Label(name)) => PathSegment::Key(name.clone()),
            Some(TokenKind::Bool(b)) => PathSegment::Key(b.to_string()),
            Some(TokenKind::Wildcard) => PathSegment::Filter(Expr::Wildcard),
            _ => return Err(self.unexpected("a label or '*'")),
        };
        self.position += 1;
        Ok(segment)
    }

    /// Parses bracket contents: `["key"]`, `[0]`, `[filter]` or `[?filter]`
    fn parse_bracket_segment(&mut self) -> Result<PathSegment, QueryError> {
        self.descend()?;
        let explicit_filter = self.eat(&TokenKind::Question);
        let expr = self.parse_or()?;
        self.expect(TokenKind::BracketClose)?;
        self.ascend();

        let segment = match expr {
            Expr::Literal(Literal::String(key)) if !explicit_filter => PathSegment::Key(key),
            Expr::Literal(Literal::Number(idx)) if !explicit_filter => PathSegment::Index(idx),
            expr => PathSegment::Filter(expr),
        };
        Ok(segment)
    }

    fn parse_or(&mut self) -> Result<Expr, QueryError> {
        let mut operands = vec![self.parse_and()?];
        while self.eat(&TokenKind::Or) {
            operands.push(self.parse_and()?);
        }
        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::Or(operands)
        })
    }

    fn parse_and(&mut self) -> Result<Expr, QueryError> {
        let mut operands = vec![self.parse_unary()?];
        while self.eat(&TokenKind::And) {
            operands.push(self.parse_unary()?);
        }
        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::And(operands)
        })
    }

    fn parse_unary(&mut self) -> Result<Expr, QueryError> {
        match self.peek() {
            Some(TokenKind::Not) => {
                self.descend()?;
                self.position += 1;
                let inner = self.parse_unary()?;
                self.ascend();
                Ok(Expr::Not(Box::new(inner)))
            }
            Some(TokenKind::ParenOpen) => {
                self.descend()?;
                self.position += 1;
                let expr = self.parse_or()?;
                self.expect(TokenKind::ParenClose)?;
                self.ascend();
                Ok(expr)
            }
            Some(TokenKind::Wildcard) => {
                self.position += 1;
                Ok(Expr::Wildcard)
            }
            _ => self.parse_comparison(),
        }
    }

    fn parse_comparison(&mut self) -> Result<Expr, QueryError> {
        let left = self.parse_operand()?;

        let op = match self.peek() {
            Some(TokenKind::Eq) => CompareOp::Eq,
            Some(TokenKind::Ne) => CompareOp::Ne,
            Some(TokenKind::Lt) => CompareOp::Lt,
            Some(TokenKind::Le) => CompareOp::Le,
            Some(TokenKind::Gt) => CompareOp::Gt,
            Some(TokenKind::Ge) => CompareOp::Ge,
            _ => {
                return Ok(match left {
                    Operand::Path(path) => Expr::Exists(path),
                    Operand::Literal(literal) => Expr::Literal(literal),
                })
            }
        };
        self.position += 1;

        let right = self.parse_operand()?;
        Ok(Expr::Compare { op, left, right })
    }

    fn parse_operand(&mut self) -> Result<Operand, QueryError> {
        let literal = match self.peek() {
            Some(TokenKind::Root | TokenKind::This) => return Ok(Operand::Path(self.parse_path()?)),
            Some(TokenKind::Bool(b)) => Literal::Bool(*b),
            Some(TokenKind::Number(n)) => Literal::Number(*n),
            Some(TokenKind::String(s)) => Literal::String(s.clone()),
            _ => return Err(self.unexpected("a literal, '$', '@', '!', '(' or '*'")),
        };
        self.position += 1;
        Ok(Operand::Literal(literal))
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::parse(s)
    }
}
