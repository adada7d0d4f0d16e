//! IR assembler
//!
//! Converts a sequence of instruction records into the compact instruction
//! array, interning call-target symbols into the constant pool and
//! discovering register and type-definition counts along the way. The
//! assembled form is then type-checked before an [`IrProgram`] is produced.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::check;
use crate::error::{Error, Result};
use crate::ir::{Instruction, IrProgram, Opcode, Operands, PrimType, TypeEnv};
use crate::value::Value;

/// Input to [`assemble`]: the records a front-end hands the core
///
/// Serializes with kebab-case keys (`link-name`, `parameter-count`,
/// `instructions`), matching the record shape hosts exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IrSource {
    /// C identifier for the synthesized function
    pub link_name: String,
    /// Number of leading registers that are parameters
    pub parameter_count: u32,
    /// Per-instruction records; tuples headed by an opcode symbol.
    /// Keyword records are skipped.
    pub instructions: Vec<Value>,
}

impl IrSource {
    /// Build a source record
    pub fn new(
        link_name: impl Into<String>,
        parameter_count: u32,
        instructions: Vec<Value>,
    ) -> Self {
        IrSource {
            link_name: link_name.into(),
            parameter_count,
            instructions,
        }
    }
}

/// Assemble and verify a function, producing an immutable [`IrProgram`]
///
/// Runs the full pipeline: record parsing, type-environment construction,
/// and type checking. On any failure no program is produced.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for malformed records, a missing
/// `jump`/`return` terminator, or any type-check violation.
pub fn assemble(source: &IrSource) -> Result<IrProgram> {
    let asm = Assembler::run(&source.instructions)?;
    let env = TypeEnv::build(&asm.instructions, asm.register_count, asm.type_def_count);
    let return_type = check::type_check(&asm.instructions, &env, source.parameter_count)?;

    tracing::debug!(
        link_name = %source.link_name,
        instructions = asm.instructions.len(),
        registers = asm.register_count,
        type_defs = env.type_defs.len(),
        constants = asm.constants.len(),
        "assembled and verified IR function"
    );

    Ok(IrProgram {
        link_name: source.link_name.clone(),
        parameter_count: source.parameter_count,
        register_count: asm.register_count,
        return_type,
        instructions: asm.instructions,
        types: env.types,
        type_defs: env.type_defs,
        field_defs: env.field_defs,
        constants: asm.constants,
    })
}

/// Working state for a single assembly run. Lives only for the duration of
/// [`Assembler::run`]; the label and constant-intern maps never escape.
#[derive(Debug)]
struct Assembler {
    instructions: Vec<Instruction>,
    register_count: u32,
    type_def_count: u32,
    /// Named-label hook: consulted by label operands, populated nowhere yet.
    labels: HashMap<Value, u32>,
    constant_cache: HashMap<Value, u32>,
    constants: Vec<Value>,
}

impl Assembler {
    fn run(records: &[Value]) -> Result<Assembler> {
        let mut asm = Assembler {
            instructions: Vec::with_capacity(records.len()),
            register_count: 0,
            type_def_count: 0,
            labels: HashMap::new(),
            constant_cache: HashMap::new(),
            constants: Vec::new(),
        };

        for record in records {
            match record {
                // Label declarations and section markers; skipped for now.
                Value::Keyword(_) => continue,
                Value::Tuple(tuple) => {
                    let (line, column) = (tuple.line, tuple.column);
                    asm.parse_tuple(&tuple.elems, line, column)
                        .map_err(|e| e.at(line, column))?;
                }
                other => {
                    return Err(Error::with_value(
                        "expected instruction to be tuple",
                        other.clone(),
                    ));
                }
            }
        }

        match asm.instructions.last() {
            Some(last) if matches!(last.opcode, Opcode::Jump | Opcode::Return) => {}
            Some(last) => {
                return Err(
                    Error::invalid("last instruction must be jump or return")
                        .at(last.line, last.column),
                );
            }
            None => {
                return Err(Error::invalid(
                    "no instructions given, missing jump or return terminator",
                ));
            }
        }

        Ok(asm)
    }

    fn parse_tuple(&mut self, elems: &[Value], line: u32, column: u32) -> Result<()> {
        let head = elems
            .first()
            .ok_or_else(|| Error::invalid("invalid instruction, no opcode"))?;
        let name = head.as_symbol().ok_or_else(|| {
            Error::with_value("expected opcode symbol", head.clone())
        })?;
        let opcode = Opcode::from_name(name)
            .ok_or_else(|| Error::with_value("unknown instruction", head.clone()))?;

        let instr = |opcode, args| Instruction {
            opcode,
            args,
            line,
            column,
        };

        match opcode {
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Band
            | Opcode::Bor
            | Opcode::Bxor
            | Opcode::Shl
            | Opcode::Shr
            | Opcode::Gt
            | Opcode::Gte
            | Opcode::Lt
            | Opcode::Lte
            | Opcode::Eq
            | Opcode::Neq => {
                expect_len(elems, 4)?;
                let args = Operands::Three {
                    dest: self.read_operand(&elems[1])?,
                    lhs: self.read_operand(&elems[2])?,
                    rhs: self.read_operand(&elems[3])?,
                };
                self.instructions.push(instr(opcode, args));
            }
            Opcode::Call => {
                expect_min_len(elems, 3)?;
                let dest = self.read_operand(&elems[1])?;
                let arg_count = (elems.len() - 3) as u32;
                // A symbol callee is interned and the call becomes indirect
                // by name.
                let header = if elems[2].as_symbol().is_some() {
                    let constant = self.intern_constant(&elems[2]);
                    instr(
                        Opcode::Callk,
                        Operands::Callk {
                            dest,
                            constant,
                            arg_count,
                        },
                    )
                } else {
                    let callee = self.read_operand(&elems[2])?;
                    instr(
                        opcode,
                        Operands::Call {
                            dest,
                            callee,
                            arg_count,
                        },
                    )
                };
                self.instructions.push(header);
                self.push_carriers(&elems[3..], line, column, Self::read_operand)?;
            }
            Opcode::Load
            | Opcode::Store
            | Opcode::Move
            | Opcode::Cast
            | Opcode::Bnot
            | Opcode::Address => {
                expect_len(elems, 3)?;
                let args = Operands::Two {
                    dest: self.read_operand(&elems[1])?,
                    src: self.read_operand(&elems[2])?,
                };
                self.instructions.push(instr(opcode, args));
            }
            Opcode::FieldGet => {
                expect_len(elems, 4)?;
                let args = Operands::Field {
                    r: self.read_operand(&elems[1])?,
                    st: self.read_operand(&elems[2])?,
                    field: read_field(&elems[3])?,
                };
                self.instructions.push(instr(opcode, args));
            }
            Opcode::FieldSet => {
                expect_len(elems, 4)?;
                let st = self.read_operand(&elems[1])?;
                let field = read_field(&elems[2])?;
                let r = self.read_operand(&elems[3])?;
                self.instructions
                    .push(instr(opcode, Operands::Field { r, st, field }));
            }
            Opcode::Return => {
                expect_len(elems, 2)?;
                let args = Operands::One {
                    src: self.read_operand(&elems[1])?,
                };
                self.instructions.push(instr(opcode, args));
            }
            Opcode::Branch => {
                expect_len(elems, 3)?;
                let args = Operands::Branch {
                    cond: self.read_operand(&elems[1])?,
                    to: self.read_label(&elems[2])?,
                };
                self.instructions.push(instr(opcode, args));
            }
            Opcode::Jump => {
                expect_len(elems, 2)?;
                let args = Operands::Jump {
                    to: self.read_label(&elems[1])?,
                };
                self.instructions.push(instr(opcode, args));
            }
            Opcode::Constant => {
                expect_len(elems, 3)?;
                let dest = self.read_operand(&elems[1])?;
                let constant = self.intern_constant(&elems[2]);
                self.instructions
                    .push(instr(opcode, Operands::Constant { dest, constant }));
            }
            Opcode::TypePrim => {
                expect_len(elems, 3)?;
                let args = Operands::TypePrim {
                    dest_type: self.read_type_operand(&elems[1])?,
                    prim: read_prim(&elems[2])?,
                };
                self.instructions.push(instr(opcode, args));
            }
            Opcode::TypeStruct => {
                expect_min_len(elems, 2)?;
                let dest_type = self.read_type_operand(&elems[1])?;
                let arg_count = (elems.len() - 2) as u32;
                self.instructions.push(instr(
                    opcode,
                    Operands::TypeStruct {
                        dest_type,
                        arg_count,
                    },
                ));
                self.push_carriers(&elems[2..], line, column, Self::read_type_operand)?;
            }
            Opcode::TypeBind => {
                expect_len(elems, 3)?;
                let args = Operands::TypeBind {
                    dest: self.read_operand(&elems[1])?,
                    type_id: self.read_type_operand(&elems[2])?,
                };
                self.instructions.push(instr(opcode, args));
            }
            // Synthesized opcodes never come back from the name table.
            Opcode::Callk | Opcode::Arg => {
                return Err(Error::with_value("invalid instruction", head.clone()));
            }
        }
        Ok(())
    }

    /// Pack extra operands three per carrier instruction after a variadic
    /// header.
    fn push_carriers(
        &mut self,
        operands: &[Value],
        line: u32,
        column: u32,
        read: fn(&mut Assembler, &Value) -> Result<u32>,
    ) -> Result<()> {
        for chunk in operands.chunks(3) {
            let mut args = [0u32; 3];
            for (k, operand) in chunk.iter().enumerate() {
                args[k] = read(self, operand)?;
            }
            self.instructions.push(Instruction {
                opcode: Opcode::Arg,
                args: Operands::Arg { args },
                line,
                column,
            });
        }
        Ok(())
    }

    /// Register operand; reading one grows the register file
    fn read_operand(&mut self, x: &Value) -> Result<u32> {
        let operand = x.as_uint().ok_or_else(|| {
            Error::with_value("expected non-negative integer operand", x.clone())
        })?;
        let needed = operand.checked_add(1).ok_or_else(|| {
            Error::with_value("register index too large", x.clone())
        })?;
        if needed > self.register_count {
            self.register_count = needed;
        }
        Ok(operand)
    }

    /// Type operand; reading one grows the type-definition table
    fn read_type_operand(&mut self, x: &Value) -> Result<u32> {
        let operand = x.as_uint().ok_or_else(|| {
            Error::with_value("expected non-negative integer operand", x.clone())
        })?;
        let needed = operand.checked_add(1).ok_or_else(|| {
            Error::with_value("type index too large", x.clone())
        })?;
        if needed > self.type_def_count {
            self.type_def_count = needed;
        }
        Ok(operand)
    }

    /// Label operand: a known label name, or a raw instruction index
    fn read_label(&mut self, x: &Value) -> Result<u32> {
        if let Some(&target) = self.labels.get(x) {
            return Ok(target);
        }
        x.as_uint()
            .ok_or_else(|| Error::with_value("expected non-negative integer label", x.clone()))
    }

    /// Intern a value into the constant pool, deduplicating on identity
    fn intern_constant(&mut self, x: &Value) -> u32 {
        if let Some(&index) = self.constant_cache.get(x) {
            return index;
        }
        let index = self.constants.len() as u32;
        self.constant_cache.insert(x.clone(), index);
        self.constants.push(x.clone());
        index
    }
}

/// Field index operand; grows nothing
fn read_field(x: &Value) -> Result<u32> {
    x.as_uint()
        .ok_or_else(|| Error::with_value("expected non-negative field index", x.clone()))
}

/// Primitive-kind operand
fn read_prim(x: &Value) -> Result<PrimType> {
    let name = x
        .as_symbol()
        .ok_or_else(|| Error::with_value("expected primitive type", x.clone()))?;
    PrimType::from_name(name).ok_or_else(|| Error::with_value("unknown type", x.clone()))
}

fn expect_len(elems: &[Value], len: usize) -> Result<()> {
    if elems.len() != len {
        return Err(Error::with_value(
            format!("expected instruction of length {len}"),
            Value::tuple(elems.to_vec()),
        ));
    }
    Ok(())
}

fn expect_min_len(elems: &[Value], len: usize) -> Result<()> {
    if elems.len() < len {
        return Err(Error::with_value(
            format!("expected instruction of at least length {len}"),
            Value::tuple(elems.to_vec()),
        ));
    }
    Ok(())
}
