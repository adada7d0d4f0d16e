//! # regir — a typed register-based IR with a C backend
//!
//! `regir` assembles, verifies, and lowers a small typed, register-based
//! intermediate representation intended as a portable low-level compilation
//! target. A front-end supplies instruction records as structured data (or
//! as text through [`reader`]); the core parses them into a compact
//! instruction array, builds a type environment, type-checks every
//! instruction, and emits a self-contained C translation unit.
//!
//! ## Pipeline
//!
//! ```text
//! records ──► assembler ──► type env ──► type checker ──► IrProgram ──► C
//! ```
//!
//! The stages run inside [`assemble`]; emission is a separate, infallible
//! step on the verified [`IrProgram`].
//!
//! ## Quick start
//!
//! ```
//! use regir::{assemble, reader, IrSource};
//!
//! let instructions = reader::read_all(
//!     "(prim 0 s32) (bind 0 0) (bind 1 0) (bind 2 0) (add 2 0 1) (return 2)",
//! )?;
//! let ir = assemble(&IrSource::new("add2", 2, instructions))?;
//!
//! let c = ir.to_c();
//! assert!(c.contains("typedef int32_t _t0;"));
//! assert!(c.contains("_t0 add2(_t0 _r0, _t0 _r1)"));
//! assert!(c.contains("_r2 = _r0 + _r1;"));
//! # Ok::<(), regir::Error>(())
//! ```
//!
//! ## Registers and types
//!
//! Registers are implicit: the register file is as large as the highest
//! index referenced. The first `parameter_count` registers are the
//! function's parameters. `bind` assigns a register its type; unbound
//! registers default to type-id 0, which is pre-seeded as `s32`. Call
//! targets given as symbols are interned into the constant pool and called
//! by name in the emitted C.

pub mod asm;
pub mod check;
pub mod emit;
pub mod error;
pub mod ir;
pub mod reader;
pub mod value;

pub use asm::{assemble, IrSource};
pub use error::{Error, Result};
pub use ir::{
    carried_operand, FieldDef, Instruction, IrProgram, Opcode, Operands, PrimType, TypeDef,
    TypeEnv,
};
pub use value::{Tuple, Value};
