//! The verified IR program record

use super::instruction::Instruction;
use super::types::{FieldDef, TypeDef};
use crate::value::Value;

/// A verified, immutable IR function
///
/// Produced by [`assemble`](crate::assemble); owns every table it references
/// and is released as one unit. The C backend consumes it without further
/// validation.
#[derive(Debug, Clone)]
pub struct IrProgram {
    /// C identifier emitted for the function
    pub link_name: String,
    /// Number of leading registers that are parameters
    pub parameter_count: u32,
    /// Total number of registers referenced
    pub register_count: u32,
    /// Inferred return type-id (type-id 0 when no `return` constrains it)
    pub return_type: u32,
    /// Instructions in execution order, carriers included
    pub instructions: Vec<Instruction>,
    /// Register index -> type-id
    pub types: Vec<u32>,
    /// Type definitions addressed by type-id
    pub type_defs: Vec<TypeDef>,
    /// Field entries shared by all struct definitions
    pub field_defs: Vec<FieldDef>,
    /// Deduplicated constant pool, in interning order
    pub constants: Vec<Value>,
}
