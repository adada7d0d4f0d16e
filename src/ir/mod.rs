//! Typed register-based intermediate representation
//!
//! ```text
//! ir/
//! ├── mod.rs          # Module definition and re-exports
//! ├── opcode.rs       # Opcode, PrimType, sorted name tables
//! ├── instruction.rs  # Instruction, Operands (union-of-shapes payload)
//! ├── types.rs        # TypeDef, FieldDef, TypeEnv builder
//! └── program.rs      # IrProgram (verified, immutable record)
//! ```

mod instruction;
mod opcode;
mod program;
mod types;

pub use instruction::{carried_operand, Instruction, Operands};
pub use opcode::{Opcode, PrimType};
pub use program::IrProgram;
pub use types::{FieldDef, TypeDef, TypeEnv};
