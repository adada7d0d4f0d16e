//! Error type for IR assembly and verification

use crate::value::Value;
use thiserror::Error;

/// Errors produced while assembling or verifying IR
///
/// There is a single failure mode: the input was rejected. Shape problems
/// (malformed records), structure problems (missing terminator, bad jump
/// targets), and type problems (predicate violations) differ only in the
/// message carried here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The input records were structurally or semantically invalid
    #[error("invalid input: {message}{}", render_context(.value, .line, .column))]
    InvalidInput {
        /// Human-readable description of the rejection
        message: String,
        /// The offending value, when one is available
        value: Option<Value>,
        /// Source line of the offending record (0 = unknown)
        line: u32,
        /// Source column of the offending record (0 = unknown)
        column: u32,
    },
}

fn render_context(value: &Option<Value>, line: &u32, column: &u32) -> String {
    let mut out = String::new();
    if let Some(v) = value {
        out.push_str(&format!(", got {v}"));
    }
    if *line > 0 {
        out.push_str(&format!(" (line {line}, column {column})"));
    }
    out
}

impl Error {
    /// Create an error with a message only
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
            value: None,
            line: 0,
            column: 0,
        }
    }

    /// Create an error carrying the offending value
    pub fn with_value(message: impl Into<String>, value: Value) -> Self {
        Error::InvalidInput {
            message: message.into(),
            value: Some(value),
            line: 0,
            column: 0,
        }
    }

    /// Attach a source position (1-indexed; 0 means unknown)
    pub fn at(mut self, line: u32, column: u32) -> Self {
        let Error::InvalidInput {
            line: l, column: c, ..
        } = &mut self;
        *l = line;
        *c = column;
        self
    }

    /// The human-readable message without value or position context
    pub fn message(&self) -> &str {
        let Error::InvalidInput { message, .. } = self;
        message
    }
}

/// Result type for assembly and verification
pub type Result<T> = std::result::Result<T, Error>;
