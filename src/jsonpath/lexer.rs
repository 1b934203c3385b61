//! Tokenizer for query expressions.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use super::error::LexError;

/// Kinds of tokens produced by the [`Lexer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Root,
    This,
    Dot,
    BracketOpen,
    BracketClose,
    ParenOpen,
    ParenClose,
    Or,
    And,
    Not,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Wildcard,
    Question,
    Bool(bool),
    Number(i64),
    String(String),
    Label(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Root => write!(f, "'$'"),
            TokenKind::This => write!(f, "'@'"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::BracketOpen => write!(f, "'['"),
            TokenKind::BracketClose => write!(f, "']'"),
            TokenKind::ParenOpen => write!(f, "'('"),
            TokenKind::ParenClose => write!(f, "')'"),
            TokenKind::Or => write!(f, "'||'"),
            TokenKind::And => write!(f, "'&&'"),
            TokenKind::Not => write!(f, "'!'"),
            TokenKind::Eq => write!(f, "'=='"),
            TokenKind::Ne => write!(f, "'!='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::Wildcard => write!(f, "'*'"),
            TokenKind::Question => write!(f, "'?'"),
            TokenKind::Bool(b) => write!(f, "boolean {}", b),
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::String(s) => write!(f, "string {:?}", s),
            TokenKind::Label(l) => write!(f, "label '{}'", l),
        }
    }
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Converts an expression string into tokens.
pub struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    input: &'a str,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over the given expression.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            input,
        }
    }

    /// Tokenizes the whole expression.
    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
        Lexer::new(input).collect()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    /// Consumes the next character if it equals `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.chars.next();
        }
    }

    /// Byte offset of the next unread character.
    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|&(pos, _)| pos)
            .unwrap_or(self.input.len())
    }

    fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        self.skip_whitespace();
        let (position, ch) = self.chars.next()?;

        let kind = match ch {
            '$' => TokenKind::Root,
            '@' => TokenKind::This,
            '.' => TokenKind::Dot,
            '[' => TokenKind::BracketOpen,
            ']' => TokenKind::BracketClose,
            '(' => TokenKind::ParenOpen,
            ')' => TokenKind::ParenClose,
            '*' => TokenKind::Wildcard,
            '?' => TokenKind::Question,
            '|' if self.eat('|') => TokenKind::Or,
            '&' if self.eat('&') => TokenKind::And,
            '=' => {
                self.eat('=');
                TokenKind::Eq
            }
            '!' if self.eat('=') => TokenKind::Ne,
            '!' => TokenKind::Not,
            '<' if self.eat('=') => TokenKind::Le,
            '<' => TokenKind::Lt,
            '>' if self.eat('=') => TokenKind::Ge,
            '>' => TokenKind::Gt,
            '"' | '\'' => match self.lex_string(ch, position) {
                Ok(s) => TokenKind::String(s),
                Err(err) => return Some(Err(err)),
            },
            '-' | '0'..='9' => match self.lex_number(position) {
                Ok(n) => TokenKind::Number(n),
                Err(err) => return Some(Err(err)),
            },
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_word(position),
            found => return Some(Err(LexError::UnexpectedCharacter { position, found })),
        };

        Some(Ok(Token { kind, position }))
    }

    fn lex_string(&mut self, quote: char, start: usize) -> Result<String, LexError> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some((_, ch)) if ch == quote => return Ok(value),
                Some((pos, '\\')) => value.push(self.lex_escape(pos)?),
                Some((_, ch)) => value.push(ch),
                None => return Err(LexError::UnterminatedString { position: start }),
            }
        }
    }

    fn lex_escape(&mut self, position: usize) -> Result<char, LexError> {
        let escaped = match self.chars.next() {
            Some((_, ch)) => ch,
            None => return Err(LexError::InvalidEscape { position }),
        };
        match escaped {
            '"' | '\'' | '\\' | '/' => Ok(escaped),
            'b' => Ok('\u{8}'),
            'f' => Ok('\u{c}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = self
                        .chars
                        .next()
                        .and_then(|(_, ch)| ch.to_digit(16))
                        .ok_or(LexError::InvalidEscape { position })?;
                    code = code * 16 + digit;
                }
                char::from_u32(code).ok_or(LexError::InvalidEscape { position })
            }
            _ => Err(LexError::InvalidEscape { position }),
        }
    }

    fn lex_number(&mut self, start: usize) -> Result<i64, LexError> {
        while self.peek_char().is_some_and(|ch| ch.is_ascii_digit()) {
            self.chars.next();
        }
        let literal = &self.input[start..self.offset()];
        literal.parse::<i64>().map_err(|_| LexError::InvalidNumber {
            position: start,
            literal: literal.to_string(),
        })
    }

    fn lex_word(&mut self, start: usize) -> TokenKind {
        while self
            .peek_char()
            .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            self.chars.next();
        }
        match &self.input[start..self.offset()] {
            "true" => TokenKind::Bool(true),
            "false" => TokenKind::Bool(false),
            word => TokenKind::Label(word.to_string()),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
