// Copyright 2025 The TopicRoute Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tokenizer for filter expressions and action statements.
//!
//! Tokens carry the byte offset where they start so parse errors can point at the
//! offending input. Keywords are recognised case-insensitively; identifiers keep their
//! original spelling.

use std::fmt;

use topicroute_error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    And,
    Or,
    Not,
    Is,
    Null,
    Like,
    Escape,
    In,
    Exists,
    True,
    False,
    Set,
    Remove,
}

impl Keyword {
    pub(crate) fn lookup(word: &str) -> Option<Keyword> {
        let keyword = match word.to_ascii_uppercase().as_str() {
            "AND" => Keyword::And,
            "OR" => Keyword::Or,
            "NOT" => Keyword::Not,
            "IS" => Keyword::Is,
            "NULL" => Keyword::Null,
            "LIKE" => Keyword::Like,
            "ESCAPE" => Keyword::Escape,
            "IN" => Keyword::In,
            "EXISTS" => Keyword::Exists,
            "TRUE" => Keyword::True,
            "FALSE" => Keyword::False,
            "SET" => Keyword::Set,
            "REMOVE" => Keyword::Remove,
            _ => return None,
        };
        Some(keyword)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Bare identifier, possibly dotted (`sys.Subject`, `user.color`).
    Identifier(String),
    /// Identifier written in brackets (`[order id]`). Never a keyword, never split on dots.
    QuotedIdentifier(String),
    Keyword(Keyword),
    String(String),
    Integer(i64),
    Float(f64),
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(name) => write!(f, "identifier '{name}'"),
            TokenKind::QuotedIdentifier(name) => write!(f, "identifier '[{name}]'"),
            TokenKind::Keyword(keyword) => write!(f, "keyword {}", format!("{keyword:?}").to_ascii_uppercase()),
            TokenKind::String(value) => write!(f, "string '{value}'"),
            TokenKind::Integer(value) => write!(f, "number {value}"),
            TokenKind::Float(value) => write!(f, "number {value}"),
            TokenKind::Equal => write!(f, "'='"),
            TokenKind::NotEqual => write!(f, "'<>'"),
            TokenKind::LessThan => write!(f, "'<'"),
            TokenKind::LessThanOrEqual => write!(f, "'<='"),
            TokenKind::GreaterThan => write!(f, "'>'"),
            TokenKind::GreaterThanOrEqual => write!(f, "'>='"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::LeftParen => write!(f, "'('"),
            TokenKind::RightParen => write!(f, "')'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Splits `source` into tokens, always terminated by [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer {
        source,
        bytes: source.as_bytes(),
        pos: 0,
    };
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();
        let offset = self.pos;
        let Some(byte) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                offset,
            });
        };

        let kind = match byte {
            b'\'' => self.string_literal()?,
            b'[' => self.quoted_identifier()?,
            b'0'..=b'9' => self.number()?,
            b if is_identifier_start(b) => self.identifier(),
            _ => self.punctuation()?,
        };
        Ok(Token { kind, offset })
    }

    fn punctuation(&mut self) -> Result<TokenKind, ParseError> {
        let offset = self.pos;
        let (kind, width) = match (self.peek(), self.peek_at(1)) {
            (Some(b'<'), Some(b'>')) => (TokenKind::NotEqual, 2),
            (Some(b'!'), Some(b'=')) => (TokenKind::NotEqual, 2),
            (Some(b'<'), Some(b'=')) => (TokenKind::LessThanOrEqual, 2),
            (Some(b'>'), Some(b'=')) => (TokenKind::GreaterThanOrEqual, 2),
            (Some(b'<'), _) => (TokenKind::LessThan, 1),
            (Some(b'>'), _) => (TokenKind::GreaterThan, 1),
            (Some(b'='), _) => (TokenKind::Equal, 1),
            (Some(b'+'), _) => (TokenKind::Plus, 1),
            (Some(b'-'), _) => (TokenKind::Minus, 1),
            (Some(b'*'), _) => (TokenKind::Star, 1),
            (Some(b'/'), _) => (TokenKind::Slash, 1),
            (Some(b'%'), _) => (TokenKind::Percent, 1),
            (Some(b'('), _) => (TokenKind::LeftParen, 1),
            (Some(b')'), _) => (TokenKind::RightParen, 1),
            (Some(b','), _) => (TokenKind::Comma, 1),
            (Some(b';'), _) => (TokenKind::Semicolon, 1),
            _ => {
                let found = self.source[offset..].chars().next().unwrap_or('\0');
                return Err(ParseError::new(format!("Unexpected character '{found}'"), offset));
            }
        };
        self.pos += width;
        Ok(kind)
    }

    /// `'...'` with `''` standing for a single quote.
    fn string_literal(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        let mut segment_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(ParseError::new("Unterminated string literal", start)),
                Some(b'\'') if self.peek_at(1) == Some(b'\'') => {
                    value.push_str(&self.source[segment_start..self.pos]);
                    value.push('\'');
                    self.pos += 2;
                    segment_start = self.pos;
                }
                Some(b'\'') => {
                    value.push_str(&self.source[segment_start..self.pos]);
                    self.pos += 1;
                    return Ok(TokenKind::String(value));
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn quoted_identifier(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        let Some(length) = self.source[start + 1..].find(']') else {
            return Err(ParseError::new("Unterminated bracketed identifier", start));
        };
        let name = &self.source[start + 1..start + 1 + length];
        if name.is_empty() {
            return Err(ParseError::new("Empty bracketed identifier", start));
        }
        self.pos = start + length + 2;
        Ok(TokenKind::QuotedIdentifier(name.to_string()))
    }

    fn number(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        self.consume_digits();
        let mut is_float = false;
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            is_float = true;
            self.pos += 1;
            self.consume_digits();
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let sign = usize::from(matches!(self.peek_at(1), Some(b'+' | b'-')));
            if matches!(self.peek_at(1 + sign), Some(b'0'..=b'9')) {
                is_float = true;
                self.pos += 1 + sign;
                self.consume_digits();
            }
        }
        if matches!(self.peek(), Some(b) if is_identifier_part(b)) {
            return Err(ParseError::new("Malformed numeric literal", start));
        }

        let text = &self.source[start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| ParseError::new(format!("Malformed numeric literal '{text}'"), start))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Integer)
                .map_err(|_| ParseError::new(format!("Integer literal '{text}' is out of range"), start))
        }
    }

    fn consume_digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
    }

    fn identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if is_identifier_part(b) || b == b'.') {
            self.pos += 1;
        }
        let word = &self.source[start..self.pos];
        match Keyword::lookup(word) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(word.to_string()),
        }
    }
}

fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b'$'
}

fn is_identifier_part(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}
