//! Token-to-value parser for textual IR records

use super::scanner::{Token, TokenKind};
use crate::error::{Error, Result};
use crate::value::{Tuple, Value};

/// Parser over scanned tokens
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// Create a parser over the given tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0 }
    }

    /// Parse every top-level value
    pub fn parse(mut self) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        while !matches!(self.peek().kind, TokenKind::Eof) {
            values.push(self.parse_value()?);
        }
        Ok(values)
    }

    fn parse_value(&mut self) -> Result<Value> {
        let token = self.advance().clone();
        match token.kind {
            TokenKind::LeftParen => {
                let mut elems = Vec::new();
                loop {
                    if matches!(self.peek().kind, TokenKind::RightParen) {
                        self.advance();
                        break;
                    }
                    if matches!(self.peek().kind, TokenKind::Eof) {
                        return Err(Error::invalid("unclosed parenthesis")
                            .at(token.line, token.column));
                    }
                    elems.push(self.parse_value()?);
                }
                // Tuples remember where they opened; the assembler carries
                // this through to #line directives.
                Ok(Value::Tuple(Tuple {
                    elems,
                    line: token.line,
                    column: token.column,
                }))
            }
            TokenKind::RightParen => {
                Err(Error::invalid("unexpected closing parenthesis")
                    .at(token.line, token.column))
            }
            TokenKind::Int(i) => Ok(Value::Int(i)),
            TokenKind::Float(x) => Ok(Value::Float(x)),
            TokenKind::Str(s) => Ok(Value::Str(s)),
            TokenKind::Keyword(k) => Ok(Value::Keyword(k)),
            TokenKind::Symbol(s) => Ok(match s.as_str() {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                _ => Value::Symbol(s),
            }),
            TokenKind::Eof => {
                Err(Error::invalid("unexpected end of input").at(token.line, token.column))
            }
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.current.min(self.tokens.len() - 1)];
        if self.current < self.tokens.len() {
            self.current += 1;
        }
        token
    }
}
