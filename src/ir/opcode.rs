//! Opcode and primitive-kind tables

use serde::{Deserialize, Serialize};
use std::fmt;

/// IR operation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// dst = lhs + rhs
    Add,
    /// dst = lhs - rhs
    Sub,
    /// dst = lhs * rhs
    Mul,
    /// dst = lhs / rhs
    Div,
    /// dst = lhs & rhs
    Band,
    /// dst = lhs | rhs
    Bor,
    /// dst = lhs ^ rhs
    Bxor,
    /// dst = ~src
    Bnot,
    /// dst = lhs << rhs
    Shl,
    /// dst = lhs >> rhs
    Shr,
    /// dst = *src
    Load,
    /// *dst = src
    Store,
    /// dst = lhs > rhs
    Gt,
    /// dst = lhs < rhs
    Lt,
    /// dst = lhs == rhs
    Eq,
    /// dst = lhs != rhs
    Neq,
    /// dst = lhs >= rhs
    Gte,
    /// dst = lhs <= rhs
    Lte,
    /// dst = src
    Move,
    /// dst = (type of dst) src, reinterpreting
    Cast,
    /// dst = &src
    Address,
    /// dst = constant-pool entry
    Constant,
    /// dst = callee(args...), callee in a register
    Call,
    /// dst = callee(args...), callee interned in the constant pool.
    /// Synthesized from `call` when the callee is a symbol; not an input name.
    Callk,
    /// return src
    Return,
    /// goto target
    Jump,
    /// if cond goto target
    Branch,
    /// Declare a primitive type definition
    TypePrim,
    /// Declare a struct type definition
    TypeStruct,
    /// Bind a register to a type definition
    TypeBind,
    /// Variadic operand carrier following a `call`/`callk`/`struct` header.
    /// Synthesized by the assembler; not an input name.
    Arg,
    /// dst = struct_reg.field
    FieldGet,
    /// struct_reg.field = src
    FieldSet,
}

/// Input opcode names, sorted for binary search. `callk` and `arg` are
/// synthesized internally and deliberately absent.
static OPCODE_NAMES: [(&str, Opcode); 31] = [
    ("add", Opcode::Add),
    ("address", Opcode::Address),
    ("band", Opcode::Band),
    ("bind", Opcode::TypeBind),
    ("bnot", Opcode::Bnot),
    ("bor", Opcode::Bor),
    ("branch", Opcode::Branch),
    ("bxor", Opcode::Bxor),
    ("call", Opcode::Call),
    ("cast", Opcode::Cast),
    ("constant", Opcode::Constant),
    ("div", Opcode::Div),
    ("eq", Opcode::Eq),
    ("fget", Opcode::FieldGet),
    ("fset", Opcode::FieldSet),
    ("gt", Opcode::Gt),
    ("gte", Opcode::Gte),
    ("jump", Opcode::Jump),
    ("load", Opcode::Load),
    ("lt", Opcode::Lt),
    ("lte", Opcode::Lte),
    ("move", Opcode::Move),
    ("mul", Opcode::Mul),
    ("neq", Opcode::Neq),
    ("prim", Opcode::TypePrim),
    ("return", Opcode::Return),
    ("shl", Opcode::Shl),
    ("shr", Opcode::Shr),
    ("store", Opcode::Store),
    ("struct", Opcode::TypeStruct),
    ("sub", Opcode::Sub),
];

impl Opcode {
    /// Look up an input opcode symbol
    pub fn from_name(name: &str) -> Option<Opcode> {
        OPCODE_NAMES
            .binary_search_by_key(&name, |&(n, _)| n)
            .ok()
            .map(|i| OPCODE_NAMES[i].1)
    }
}

/// Primitive type kinds. `Struct` tags aggregate type definitions; all other
/// kinds are scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimType {
    /// 8-bit unsigned integer
    U8,
    /// 16-bit unsigned integer
    U16,
    /// 32-bit unsigned integer
    U32,
    /// 64-bit unsigned integer
    U64,
    /// 8-bit signed integer
    S8,
    /// 16-bit signed integer
    S16,
    /// 32-bit signed integer
    S32,
    /// 64-bit signed integer
    S64,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
    /// Untyped pointer
    Pointer,
    /// Boolean
    Boolean,
    /// Aggregate marker
    Struct,
}

/// Primitive-kind input names, sorted for binary search.
static PRIM_NAMES: [(&str, PrimType); 13] = [
    ("boolean", PrimType::Boolean),
    ("f32", PrimType::F32),
    ("f64", PrimType::F64),
    ("pointer", PrimType::Pointer),
    ("s16", PrimType::S16),
    ("s32", PrimType::S32),
    ("s64", PrimType::S64),
    ("s8", PrimType::S8),
    ("struct", PrimType::Struct),
    ("u16", PrimType::U16),
    ("u32", PrimType::U32),
    ("u64", PrimType::U64),
    ("u8", PrimType::U8),
];

impl PrimType {
    /// Look up a primitive-kind symbol
    pub fn from_name(name: &str) -> Option<PrimType> {
        PRIM_NAMES
            .binary_search_by_key(&name, |&(n, _)| n)
            .ok()
            .map(|i| PRIM_NAMES[i].1)
    }

    /// The input symbol for this kind
    pub fn name(self) -> &'static str {
        match self {
            PrimType::U8 => "u8",
            PrimType::U16 => "u16",
            PrimType::U32 => "u32",
            PrimType::U64 => "u64",
            PrimType::S8 => "s8",
            PrimType::S16 => "s16",
            PrimType::S32 => "s32",
            PrimType::S64 => "s64",
            PrimType::F32 => "f32",
            PrimType::F64 => "f64",
            PrimType::Pointer => "pointer",
            PrimType::Boolean => "boolean",
            PrimType::Struct => "struct",
        }
    }

    /// The C type name for a scalar kind; `None` for `Struct`, which has no
    /// scalar C spelling
    pub fn c_name(self) -> Option<&'static str> {
        match self {
            PrimType::U8 => Some("uint8_t"),
            PrimType::S8 => Some("int8_t"),
            PrimType::U16 => Some("uint16_t"),
            PrimType::S16 => Some("int16_t"),
            PrimType::U32 => Some("uint32_t"),
            PrimType::S32 => Some("int32_t"),
            PrimType::U64 => Some("uint64_t"),
            PrimType::S64 => Some("int64_t"),
            PrimType::F32 => Some("float"),
            PrimType::F64 => Some("double"),
            PrimType::Pointer => Some("char *"),
            PrimType::Boolean => Some("bool"),
            PrimType::Struct => None,
        }
    }

    /// True for the eight integer kinds
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            PrimType::U8
                | PrimType::U16
                | PrimType::U32
                | PrimType::U64
                | PrimType::S8
                | PrimType::S16
                | PrimType::S32
                | PrimType::S64
        )
    }
}

impl fmt::Display for PrimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
