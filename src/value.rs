//! Host data model for IR assembly input
//!
//! A front-end hands the assembler a sequence of instruction records built
//! from these values: tuples whose head is an opcode symbol, with integer,
//! symbol, or embedded-constant operands. Tuples optionally carry the source
//! position they were read from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A structured value in an instruction record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// Signed integer
    Int(i64),
    /// Floating-point number
    Float(f64),
    /// Boolean
    Boolean(bool),
    /// String literal
    Str(String),
    /// Symbol (opcode heads, call targets, primitive-kind names)
    Symbol(String),
    /// Keyword (label markers; skipped by the assembler)
    Keyword(String),
    /// Ordered tuple, optionally carrying a source position
    Tuple(Tuple),
}

/// An ordered tuple of values with optional source position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuple {
    /// Tuple elements in order
    pub elems: Vec<Value>,
    /// Source line the tuple was read from (0 = absent)
    pub line: u32,
    /// Source column the tuple was read from (0 = absent)
    pub column: u32,
}

impl Value {
    /// Create a symbol value
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    /// Create a keyword value
    pub fn keyword(name: impl Into<String>) -> Self {
        Value::Keyword(name.into())
    }

    /// Create a string value
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Create a tuple value with no source position
    pub fn tuple(elems: Vec<Value>) -> Self {
        Value::Tuple(Tuple {
            elems,
            line: 0,
            column: 0,
        })
    }

    /// Extract a non-negative integer operand, if this value is one
    pub fn as_uint(&self) -> Option<u32> {
        match self {
            Value::Int(i) if *i >= 0 && *i <= u32::MAX as i64 => Some(*i as u32),
            _ => None,
        }
    }

    /// The symbol name, if this value is a symbol
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

// Equality and hashing key the constant-interning and label maps, so they
// must agree with each other. Floats compare by bit pattern; tuples compare
// by contents, ignoring source position.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a.elems == b.elems,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Str(s) | Value::Symbol(s) | Value::Keyword(s) => s.hash(state),
            Value::Tuple(t) => t.elems.hash(state),
        }
    }
}

impl fmt::Display for Value {
    /// Printed form used when constants are emitted into C source: numbers
    /// in decimal, symbols bare, strings quoted with escapes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Str(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        '\r' => write!(f, "\\r")?,
                        _ => write!(f, "{c}")?,
                    }
                }
                write!(f, "\"")
            }
            Value::Symbol(s) => write!(f, "{s}"),
            Value::Keyword(k) => write!(f, ":{k}"),
            Value::Tuple(t) => {
                write!(f, "(")?;
                for (i, elem) in t.elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn display_forms() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::symbol("printf").to_string(), "printf");
        assert_eq!(Value::keyword("start").to_string(), ":start");
        assert_eq!(Value::str("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(
            Value::tuple(vec![Value::symbol("add"), Value::Int(2)]).to_string(),
            "(add 2)"
        );
    }

    #[test]
    fn as_uint_rejects_negatives_and_floats() {
        assert_eq!(Value::Int(7).as_uint(), Some(7));
        assert_eq!(Value::Int(-1).as_uint(), None);
        assert_eq!(Value::Float(7.0).as_uint(), None);
        assert_eq!(Value::symbol("x").as_uint(), None);
    }

    #[test]
    fn tuples_compare_by_contents_not_position() {
        let a = Value::Tuple(Tuple {
            elems: vec![Value::Int(1)],
            line: 3,
            column: 1,
        });
        let b = Value::Tuple(Tuple {
            elems: vec![Value::Int(1)],
            line: 9,
            column: 4,
        });
        assert_eq!(a, b);
    }

    #[test]
    fn values_key_hash_maps() {
        let mut map = HashMap::new();
        map.insert(Value::symbol("printf"), 0u32);
        map.insert(Value::Int(42), 1u32);
        assert_eq!(map.get(&Value::symbol("printf")), Some(&0));
        assert_eq!(map.get(&Value::Int(42)), Some(&1));
        assert_eq!(map.get(&Value::Float(42.0)), None);
    }
}
