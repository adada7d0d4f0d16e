//! Textual front door for IR records
//!
//! Reads S-expression text into [`Value`] records the assembler consumes:
//! tuples, integers, floats, strings, symbols, keywords, and booleans, with
//! `;` comments. Tuples carry the line and column they opened at, which the
//! pipeline surfaces as `#line` directives in emitted C.

mod parser;
mod scanner;

pub use parser::Parser;
pub use scanner::{Scanner, Token, TokenKind};

use crate::error::Result;
use crate::value::Value;

/// Read every value in `source`
pub fn read_all(source: &str) -> Result<Vec<Value>> {
    let tokens = Scanner::new(source).scan_tokens()?;
    Parser::new(tokens).parse()
}

/// Read exactly one value from `source`
pub fn read_one(source: &str) -> Result<Value> {
    let mut values = read_all(source)?;
    if values.len() != 1 {
        return Err(crate::error::Error::invalid(format!(
            "expected exactly one value, got {}",
            values.len()
        )));
    }
    Ok(values.remove(0))
}
