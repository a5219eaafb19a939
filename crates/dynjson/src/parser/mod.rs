//! Text parser: relaxed JSON and Lisp-style association lists.
//!
//! The relaxed grammar accepts everything standard JSON does, plus:
//!
//! - bare identifier object keys: `{ a: 123 }`
//! - trailing commas in objects and arrays
//! - parenthesized lists `( ("a" 123) ("b" true) )` whose elements are
//!   separated by whitespace and/or commas
//! - `nil` as a synonym for `null`
//! - `//`, `/* */` and `;` comments
//!
//! Numbers keep their exact text. [`Syntax::Strict`] hands the input to
//! `serde_json` unchanged.

mod lexer;

use crate::error::{DynError, Result};
use crate::settings::{Settings, Syntax};
use crate::value::{Map, Payload, Value};
use lexer::{Lexer, Token};
use serde_json::Number;

/// Parse `text` with the grammar selected in `settings`.
///
/// Input that is empty or only whitespace parses as Null.
pub fn parse(text: &str, settings: &Settings) -> Result<Value> {
    tracing::trace!(len = text.len(), syntax = ?settings.parser, "parsing document");
    if text.trim().is_empty() {
        return Ok(Value::null());
    }
    match settings.parser {
        Syntax::Relaxed => Parser::new(text, settings.max_depth)?.parse_document(),
        Syntax::Strict => Ok(Value::from(serde_json::from_str::<serde_json::Value>(text)?)),
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    current_at: usize,
    depth: usize,
    /// 0 disables the limit.
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, max_depth: usize) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current_at = lexer.token_start()?;
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            current_at,
            depth: 0,
            max_depth,
        })
    }

    /// Move to the next token, returning the one just consumed.
    fn advance(&mut self) -> Result<Token> {
        self.current_at = self.lexer.token_start()?;
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn error(&self, message: impl Into<String>) -> DynError {
        self.lexer.error_at(self.current_at, message)
    }

    fn unexpected(&self, wanted: &str) -> DynError {
        self.error(format!("expected {}, found {}", wanted, self.current.describe()))
    }

    fn expect(&mut self, token: Token, wanted: &str) -> Result<()> {
        if self.current != token {
            return Err(self.unexpected(wanted));
        }
        self.advance()?;
        Ok(())
    }

    fn parse_document(mut self) -> Result<Value> {
        let value = self.parse_value()?;
        if self.current != Token::Eof {
            return Err(self.unexpected("end of input"));
        }
        Ok(value)
    }

    fn parse_value(&mut self) -> Result<Value> {
        match &self.current {
            Token::LeftBrace => self.nested(Self::parse_object),
            Token::LeftBracket => self.nested(Self::parse_array),
            Token::LeftParen => self.nested(Self::parse_list),
            Token::String(_) => match self.advance()? {
                Token::String(s) => Ok(Value::from(s)),
                _ => unreachable!("current token was a string"),
            },
            Token::Number(raw) => {
                let number = serde_json::from_str::<Number>(raw)
                    .map_err(|_| self.error(format!("invalid number {}", raw)))?;
                self.advance()?;
                Ok(Value::from(number))
            }
            Token::Word(word) => {
                let payload = match word.as_str() {
                    "true" => Payload::Bool(true),
                    "false" => Payload::Bool(false),
                    "null" | "nil" => Payload::Null,
                    _ => return Err(self.error(format!("unknown literal {:?}", word))),
                };
                self.advance()?;
                Ok(Value::from_payload(payload))
            }
            _ => Err(self.unexpected("a value")),
        }
    }

    /// Run a container parser one level deeper, enforcing the depth limit.
    fn nested(&mut self, parse: fn(&mut Self) -> Result<Value>) -> Result<Value> {
        self.depth += 1;
        if self.max_depth > 0 && self.depth > self.max_depth {
            return Err(self.error(format!("nesting exceeds the limit of {}", self.max_depth)));
        }
        let value = parse(self)?;
        self.depth -= 1;
        Ok(value)
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.expect(Token::LeftBrace, "'{'")?;
        let mut map = Map::new();

        while self.current != Token::RightBrace {
            let at = self.current_at;
            let key = match self.advance()? {
                Token::String(key) | Token::Word(key) => key,
                found => {
                    let message = format!("expected object key, found {}", found.describe());
                    return Err(self.lexer.error_at(at, message));
                }
            };
            self.expect(Token::Colon, "':'")?;
            let value = self.parse_value()?;
            // Later duplicates win, as in serde_json.
            map.insert(key, value);

            match self.current {
                Token::Comma => {
                    self.advance()?;
                }
                Token::RightBrace => {}
                _ => return Err(self.unexpected("',' or '}'")),
            }
        }

        self.advance()?;
        Ok(Value::from_payload(Payload::Object(map)))
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.expect(Token::LeftBracket, "'['")?;
        let mut items = Vec::new();

        while self.current != Token::RightBracket {
            items.push(self.parse_value()?);
            match self.current {
                Token::Comma => {
                    self.advance()?;
                }
                Token::RightBracket => {}
                _ => return Err(self.unexpected("',' or ']'")),
            }
        }

        self.advance()?;
        Ok(Value::from_payload(Payload::Array(items)))
    }

    fn parse_list(&mut self) -> Result<Value> {
        self.expect(Token::LeftParen, "'('")?;
        let mut items = Vec::new();

        while self.current != Token::RightParen {
            if self.current == Token::Eof {
                return Err(self.unexpected("')'"));
            }
            items.push(self.parse_value()?);
            if self.current == Token::Comma {
                self.advance()?;
            }
        }

        self.advance()?;
        Ok(Value::from_payload(Payload::Array(items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relaxed(text: &str) -> Result<Value> {
        parse(text, &Settings::default())
    }

    #[test]
    fn object_key_position_is_reported() {
        match relaxed("{\n  1: 2 }") {
            Err(DynError::Parse { line, column, .. }) => assert_eq!((line, column), (2, 3)),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn depth_limit_counts_containers() {
        let settings = Settings {
            max_depth: 2,
            ..Settings::default()
        };
        assert!(parse("[[1]]", &settings).is_ok());
        assert!(parse("[[[1]]]", &settings).is_err());
        assert!(parse("((1))", &settings).is_ok());
    }

    #[test]
    fn zero_depth_means_unlimited() {
        let settings = Settings {
            max_depth: 0,
            ..Settings::default()
        };
        let deep = format!("{}{}", "[".repeat(300), "]".repeat(300));
        assert!(parse(&deep, &settings).is_ok());
    }

    #[test]
    fn list_elements_may_mix_separators() {
        let v = relaxed("(1, 2 3 ,4)").unwrap();
        assert_eq!(v.len(), 4);
    }

    #[test]
    fn unknown_word_is_an_error() {
        assert!(relaxed("maybe").is_err());
    }

    #[test]
    fn trailing_garbage_is_an_error() {
        assert!(relaxed("[1] 2").is_err());
    }
}
