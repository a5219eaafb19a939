//! Tokenizer for the relaxed grammar.
//!
//! Besides the JSON punctuation it produces parentheses for association-list
//! syntax and bare `Word` tokens for identifier keys and the `true` / `false`
//! / `null` / `nil` literals. `//`, `/* */` and `;` comments are skipped.

use crate::error::{DynError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    Colon,
    Comma,
    /// String value (unescaped)
    String(String),
    /// Number value, raw text exactly as written
    Number(String),
    /// Bare identifier
    Word(String),
    Eof,
}

impl Token {
    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::LeftBrace => "'{'".into(),
            Token::RightBrace => "'}'".into(),
            Token::LeftBracket => "'['".into(),
            Token::RightBracket => "']'".into(),
            Token::LeftParen => "'('".into(),
            Token::RightParen => "')'".into(),
            Token::Colon => "':'".into(),
            Token::Comma => "','".into(),
            Token::String(_) => "string".into(),
            Token::Number(raw) => format!("number {}", raw),
            Token::Word(word) => format!("identifier {:?}", word),
            Token::Eof => "end of input".into(),
        }
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + ahead).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    /// Build a parse error pointing at byte offset `at`.
    pub fn error_at(&self, at: usize, message: impl Into<String>) -> DynError {
        let (line, column) = line_column(self.input, at);
        DynError::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    fn error(&self, message: impl Into<String>) -> DynError {
        self.error_at(self.pos, message)
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\n' | b'\r') => {
                    self.advance();
                }
                Some(b';') => self.skip_line(),
                Some(b'/') if self.peek_at(1) == Some(b'/') => self.skip_line(),
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start = self.pos;
                    self.pos += 2;
                    match self.input[self.pos..].find("*/") {
                        Some(end) => self.pos += end + 2,
                        None => return Err(self.error_at(start, "unterminated block comment")),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_line(&mut self) {
        match self.input[self.pos..].find('\n') {
            Some(end) => self.pos += end + 1,
            None => self.pos = self.input.len(),
        }
    }

    /// Skip trivia and return the offset the next token starts at.
    pub fn token_start(&mut self) -> Result<usize> {
        self.skip_trivia()?;
        Ok(self.pos)
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;

        let punct = match self.peek() {
            None => return Ok(Token::Eof),
            Some(b'{') => Token::LeftBrace,
            Some(b'}') => Token::RightBrace,
            Some(b'[') => Token::LeftBracket,
            Some(b']') => Token::RightBracket,
            Some(b'(') => Token::LeftParen,
            Some(b')') => Token::RightParen,
            Some(b':') => Token::Colon,
            Some(b',') => Token::Comma,
            Some(b'"') => return self.read_string(),
            Some(b'-' | b'0'..=b'9') => return self.read_number(),
            Some(b) if is_word_start(b) => return Ok(self.read_word()),
            Some(_) => {
                let found = self.input[self.pos..].chars().next().unwrap_or('?');
                return Err(self.error(format!("unexpected character {:?}", found)));
            }
        };
        self.advance();
        Ok(punct)
    }

    fn read_word(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if is_word_continue(b)) {
            self.advance();
        }
        Token::Word(self.input[start..self.pos].to_owned())
    }

    fn read_string(&mut self) -> Result<Token> {
        let start = self.pos;
        self.advance();

        let mut result = String::new();
        loop {
            let rest = &self.input[self.pos..];
            let Some(c) = rest.chars().next() else {
                return Err(self.error_at(start, "unterminated string"));
            };
            match c {
                '"' => {
                    self.advance();
                    return Ok(Token::String(result));
                }
                '\\' => {
                    self.advance();
                    let escaped = self.read_escape_sequence()?;
                    result.push(escaped);
                }
                c if (c as u32) < 0x20 => {
                    return Err(self.error("control character in string"));
                }
                c => {
                    result.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
    }

    fn read_escape_sequence(&mut self) -> Result<char> {
        let at = self.pos;
        match self.advance() {
            Some(b'"') => Ok('"'),
            Some(b'\\') => Ok('\\'),
            Some(b'/') => Ok('/'),
            Some(b'b') => Ok('\u{0008}'),
            Some(b'f') => Ok('\u{000C}'),
            Some(b'n') => Ok('\n'),
            Some(b'r') => Ok('\r'),
            Some(b't') => Ok('\t'),
            Some(b'u') => self.read_unicode_escape(at),
            _ => Err(self.error_at(at, "invalid escape sequence")),
        }
    }

    /// `\uXXXX`, combining a high surrogate with the `\uXXXX` low surrogate
    /// that must follow it.
    fn read_unicode_escape(&mut self, at: usize) -> Result<char> {
        let first = self.read_hex4()?;
        let code = match first {
            0xD800..=0xDBFF => {
                if self.advance() != Some(b'\\') || self.advance() != Some(b'u') {
                    return Err(self.error_at(at, "unpaired surrogate in unicode escape"));
                }
                let second = self.read_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&second) {
                    return Err(self.error_at(at, "unpaired surrogate in unicode escape"));
                }
                0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(self.error_at(at, "unpaired surrogate in unicode escape")),
            code => code,
        };
        char::from_u32(code).ok_or_else(|| self.error_at(at, "invalid unicode escape"))
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let digits = self
            .input
            .get(self.pos..self.pos + 4)
            .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error("expected four hex digits"))?;
        let code = u32::from_str_radix(digits, 16).map_err(|_| self.error("expected four hex digits"))?;
        self.pos += 4;
        Ok(code)
    }

    /// JSON number grammar: `-? (0 | [1-9][0-9]*) (.[0-9]+)? ([eE][+-]?[0-9]+)?`.
    fn read_number(&mut self) -> Result<Token> {
        let start = self.pos;

        if self.peek() == Some(b'-') {
            self.advance();
        }

        match self.peek() {
            Some(b'0') => {
                self.advance();
                if matches!(self.peek(), Some(b'0'..=b'9')) {
                    return Err(self.error("leading zeros are not allowed"));
                }
            }
            Some(b'1'..=b'9') => self.skip_digits(),
            _ => return Err(self.error("expected digit")),
        }

        if self.peek() == Some(b'.') {
            self.advance();
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error("expected digit after decimal point"));
            }
            self.skip_digits();
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.advance();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.advance();
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error("expected digit in exponent"));
            }
            self.skip_digits();
        }

        if matches!(self.peek(), Some(b) if is_word_continue(b)) {
            return Err(self.error("invalid character after number"));
        }

        Ok(Token::Number(self.input[start..self.pos].to_owned()))
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.advance();
        }
    }
}

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_word_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// 1-based line and column (in characters) of byte offset `at`.
fn line_column(input: &str, at: usize) -> (usize, usize) {
    let at = at.min(input.len());
    let before = input.get(..at).unwrap_or(input);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
