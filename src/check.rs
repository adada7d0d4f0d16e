//! Type checker and structural verifier
//!
//! Walks the assembled instructions once, verifying each opcode's operand
//! type contracts against the type environment and inferring the function
//! return type. Jump targets and the parameter count are validated here as
//! well, so the C backend can run without any checks of its own.

use crate::error::{Error, Result};
use crate::ir::{Instruction, Opcode, Operands, PrimType, TypeDef, TypeEnv};

/// Verify every instruction and infer the function return type-id
///
/// Returns type-id 0 (the `s32` default) when no `return` constrains it.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] carrying the offending type-ids or
/// indices and the instruction's source position.
pub fn type_check(
    instructions: &[Instruction],
    env: &TypeEnv,
    parameter_count: u32,
) -> Result<u32> {
    let checker = Checker { instructions, env };

    if parameter_count as usize > env.types.len() {
        return Err(Error::invalid(format!(
            "parameter count {parameter_count} exceeds register count {}",
            env.types.len()
        )));
    }

    let mut found_return = false;
    let mut return_type = 0u32;

    for instruction in instructions {
        checker
            .check_instruction(instruction, &mut found_return, &mut return_type)
            .map_err(|e| e.at(instruction.line, instruction.column))?;
    }

    tracing::debug!(return_type, "type check passed");
    Ok(return_type)
}

struct Checker<'a> {
    instructions: &'a [Instruction],
    env: &'a TypeEnv,
}

impl Checker<'_> {
    fn check_instruction(
        &self,
        instruction: &Instruction,
        found_return: &mut bool,
        return_type: &mut u32,
    ) -> Result<()> {
        match instruction.args {
            // Type declarations and carriers carry no register contracts.
            Operands::TypePrim { .. }
            | Operands::TypeStruct { .. }
            | Operands::TypeBind { .. }
            | Operands::Arg { .. } => {}
            Operands::Jump { to } => self.check_target(to)?,
            Operands::Branch { cond, to } => {
                self.check_boolean(cond)?;
                self.check_target(to)?;
            }
            Operands::One { src } => {
                let ret = self.type_of(src);
                if *found_return {
                    if *return_type != ret {
                        return Err(Error::invalid(format!(
                            "multiple return types are not allowed: type-id {ret} and type-id {return_type}"
                        )));
                    }
                } else {
                    *return_type = ret;
                    *found_return = true;
                }
            }
            Operands::Two { dest, src } => match instruction.opcode {
                Opcode::Move => self.check_equal(dest, src)?,
                // Reinterpreting cast; deliberately unchecked.
                Opcode::Cast => {}
                Opcode::Bnot => {
                    self.check_integer(src)?;
                    self.check_equal(dest, src)?;
                }
                Opcode::Load => self.check_pointer(src)?,
                Opcode::Store => self.check_pointer(dest)?,
                Opcode::Address => self.check_pointer(dest)?,
                _ => {}
            },
            Operands::Three { dest, lhs, rhs } => match instruction.opcode {
                Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => {
                    self.check_equal(lhs, rhs)?;
                    self.check_equal(dest, lhs)?;
                }
                Opcode::Band
                | Opcode::Bor
                | Opcode::Bxor
                | Opcode::Shl
                | Opcode::Shr => {
                    self.check_integer(lhs)?;
                    self.check_equal(lhs, rhs)?;
                    self.check_equal(dest, lhs)?;
                }
                Opcode::Gt
                | Opcode::Lt
                | Opcode::Eq
                | Opcode::Neq
                | Opcode::Gte
                | Opcode::Lte => {
                    self.check_equal(lhs, rhs)?;
                    self.check_equal(dest, lhs)?;
                    self.check_boolean(dest)?;
                }
                _ => {}
            },
            // Constant type conformance is not checked.
            Operands::Constant { .. } => {}
            Operands::Call { callee, .. } => self.check_pointer(callee)?,
            // No callee signature table exists, so the return type of a
            // named call goes unchecked.
            Operands::Callk { .. } => {}
            Operands::Field { r, st, field } => {
                let struct_type = self.type_of(st);
                let (field_start, field_count) =
                    match self.env.type_defs[struct_type as usize] {
                        TypeDef::Struct {
                            field_start,
                            field_count,
                        } => (field_start, field_count),
                        TypeDef::Prim(_) => {
                            return Err(Error::invalid(format!(
                                "type failure, expected struct, got type-id {struct_type}"
                            )));
                        }
                    };
                if field >= field_count {
                    return Err(Error::invalid(format!("invalid field index {field}")));
                }
                let field_type = self.env.field_defs[(field_start + field) as usize].type_id;
                let value_type = self.type_of(r);
                if field_type != value_type {
                    return Err(Error::invalid(format!(
                        "field of type type-id {field_type} does not match type-id {value_type}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn type_of(&self, reg: u32) -> u32 {
        self.env.types[reg as usize]
    }

    fn prim_of(&self, reg: u32) -> PrimType {
        self.env.type_defs[self.type_of(reg) as usize].prim()
    }

    fn check_boolean(&self, reg: u32) -> Result<()> {
        if self.prim_of(reg) != PrimType::Boolean {
            return Err(Error::invalid(format!(
                "type failure, expected boolean, got type-id {}",
                self.type_of(reg)
            )));
        }
        Ok(())
    }

    fn check_integer(&self, reg: u32) -> Result<()> {
        if !self.prim_of(reg).is_integer() {
            return Err(Error::invalid(format!(
                "type failure, expected integer, got type-id {}",
                self.type_of(reg)
            )));
        }
        Ok(())
    }

    fn check_pointer(&self, reg: u32) -> Result<()> {
        if self.prim_of(reg) != PrimType::Pointer {
            return Err(Error::invalid(format!(
                "type failure, expected pointer, got type-id {}",
                self.type_of(reg)
            )));
        }
        Ok(())
    }

    fn check_equal(&self, reg1: u32, reg2: u32) -> Result<()> {
        let t1 = self.type_of(reg1);
        let t2 = self.type_of(reg2);
        if t1 != t2 {
            return Err(Error::invalid(format!(
                "type failure, type-id {t1} does not match type-id {t2}"
            )));
        }
        Ok(())
    }

    fn check_target(&self, to: u32) -> Result<()> {
        if to as usize >= self.instructions.len() {
            return Err(Error::invalid(format!(
                "jump target {to} is not a valid instruction index"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TypeEnv;
    use crate::reader::read_all;

    fn check(source: &str, parameter_count: u32) -> Result<u32> {
        let records = read_all(source).unwrap();
        let source = crate::IrSource::new("f", parameter_count, records);
        crate::assemble(&source).map(|ir| ir.return_type)
    }

    #[test]
    fn unbound_register_defaults_to_s32() {
        assert_eq!(check("(return 0)", 0).unwrap(), 0);
    }

    #[test]
    fn conflicting_return_types_are_rejected() {
        let err = check(
            "(prim 0 s32) (prim 1 f64) (bind 0 0) (bind 1 1) (return 0) (return 1)",
            0,
        )
        .unwrap_err();
        assert!(err.message().contains("multiple return types"));
    }

    #[test]
    fn jump_targets_must_be_in_range() {
        let err = check("(jump 9)", 0).unwrap_err();
        assert!(err.message().contains("jump target 9"));
    }

    #[test]
    fn parameters_must_fit_the_register_file() {
        let err = check("(return 0)", 4).unwrap_err();
        assert!(err.message().contains("parameter count 4"));
    }

    #[test]
    fn empty_environment_still_checks() {
        let env = TypeEnv::build(&[], 0, 0);
        assert_eq!(type_check(&[], &env, 0).unwrap(), 0);
    }
}
