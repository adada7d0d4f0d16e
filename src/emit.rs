//! C backend
//!
//! Lowers a verified [`IrProgram`] to a self-contained C translation unit:
//! typedefs for every declared type, the function signature over the
//! parameter registers, declarations for the remaining registers, and a
//! labeled statement per instruction. Source positions surface as `#line`
//! directives. All validity was established by the checker; emission is
//! total and infallible.

use crate::ir::{carried_operand, IrProgram, Opcode, Operands};

impl IrProgram {
    /// Append the emitted C translation unit to `out`
    pub fn emit_c(&self, out: &mut String) {
        out.push_str("#include <stdint.h>\n#include <tgmath.h>\n\n");

        // Type definitions, in source order.
        for (i, instruction) in self.instructions.iter().enumerate() {
            if !matches!(
                instruction.args,
                Operands::TypePrim { .. } | Operands::TypeStruct { .. }
            ) {
                continue;
            }
            if instruction.line > 0 {
                out.push_str(&format!("#line {}\n", instruction.line));
            }
            match instruction.args {
                Operands::TypePrim { dest_type, prim } => match prim.c_name() {
                    Some(name) => out.push_str(&format!("typedef {name} _t{dest_type};\n")),
                    // The struct kind declared through `prim` is an empty
                    // aggregate.
                    None => out.push_str(&format!("typedef struct {{\n}} _t{dest_type};\n")),
                },
                Operands::TypeStruct {
                    dest_type,
                    arg_count,
                } => {
                    out.push_str("typedef struct {\n");
                    for j in 0..arg_count {
                        let field_type = carried_operand(&self.instructions, i, j);
                        out.push_str(&format!("  _t{field_type} _f{j};\n"));
                    }
                    out.push_str(&format!("}} _t{dest_type};\n"));
                }
                _ => {}
            }
        }

        // Signature over the parameter registers.
        out.push_str(&format!("_t{} {}(", self.return_type, self.link_name));
        for i in 0..self.parameter_count {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&format!("_t{} _r{i}", self.types[i as usize]));
        }
        out.push_str(")\n{\n");

        // Remaining registers become locals.
        for i in self.parameter_count..self.register_count {
            out.push_str(&format!("  _t{} _r{i};\n", self.types[i as usize]));
        }
        out.push('\n');

        // Body: one labeled statement per non-type, non-carrier instruction.
        for (i, instruction) in self.instructions.iter().enumerate() {
            if matches!(
                instruction.opcode,
                Opcode::TypePrim | Opcode::TypeStruct | Opcode::TypeBind | Opcode::Arg
            ) {
                continue;
            }
            out.push_str(&format!("_i{i}:\n"));
            if instruction.line > 0 {
                out.push_str(&format!("#line {}\n  ", instruction.line));
            }
            out.push_str("  ");
            match instruction.args {
                Operands::Constant { dest, constant } => {
                    out.push_str(&format!(
                        "_r{dest} = (_t{}) {};\n",
                        self.types[dest as usize], self.constants[constant as usize]
                    ));
                }
                Operands::Jump { to } => {
                    out.push_str(&format!("goto _i{to};\n"));
                }
                Operands::Branch { cond, to } => {
                    out.push_str(&format!("if (_r{cond}) goto _i{to};\n"));
                }
                Operands::One { src } => {
                    out.push_str(&format!("return _r{src};\n"));
                }
                Operands::Three { dest, lhs, rhs } => {
                    let op = binop(instruction.opcode);
                    out.push_str(&format!("_r{dest} = _r{lhs} {op} _r{rhs};\n"));
                }
                Operands::Call {
                    dest,
                    callee,
                    arg_count,
                } => {
                    out.push_str(&format!(
                        "_r{dest} = _r{callee}({});\n",
                        self.call_args(i, arg_count)
                    ));
                }
                Operands::Callk {
                    dest,
                    constant,
                    arg_count,
                } => {
                    out.push_str(&format!(
                        "_r{dest} = {}({});\n",
                        self.constants[constant as usize],
                        self.call_args(i, arg_count)
                    ));
                }
                Operands::Two { dest, src } => match instruction.opcode {
                    Opcode::Move => {
                        out.push_str(&format!("_r{dest} = _r{src};\n"));
                    }
                    Opcode::Cast => {
                        out.push_str(&format!(
                            "_r{dest} = (_t{}) _r{src};\n",
                            self.types[dest as usize]
                        ));
                    }
                    Opcode::Bnot => {
                        out.push_str(&format!("_r{dest} = ~_r{src};\n"));
                    }
                    Opcode::Address => {
                        out.push_str(&format!("_r{dest} = (char *) &_r{src};\n"));
                    }
                    Opcode::Load => {
                        out.push_str(&format!(
                            "_r{dest} = *(({} *) _r{src});\n",
                            self.cast_name(self.types[dest as usize])
                        ));
                    }
                    Opcode::Store => {
                        out.push_str(&format!(
                            "*(({} *) _r{dest}) = _r{src};\n",
                            self.cast_name(self.types[src as usize])
                        ));
                    }
                    _ => unreachable!("two-operand payload on {:?}", instruction.opcode),
                },
                Operands::Field { r, st, field } => match instruction.opcode {
                    Opcode::FieldGet => {
                        out.push_str(&format!("_r{r} = _r{st}._f{field};\n"));
                    }
                    Opcode::FieldSet => {
                        out.push_str(&format!("_r{st}._f{field} = _r{r};\n"));
                    }
                    _ => unreachable!("field payload on {:?}", instruction.opcode),
                },
                Operands::TypePrim { .. }
                | Operands::TypeStruct { .. }
                | Operands::TypeBind { .. }
                | Operands::Arg { .. } => {}
            }
        }

        out.push_str("}\n");
    }

    /// Emit into a fresh buffer
    pub fn to_c(&self) -> String {
        let mut out = String::new();
        self.emit_c(&mut out);
        out
    }

    /// Comma-separated argument registers unpacked from the carriers after
    /// the header at `header_index`
    fn call_args(&self, header_index: usize, arg_count: u32) -> String {
        (0..arg_count)
            .map(|k| format!("_r{}", carried_operand(&self.instructions, header_index, k)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// C spelling used in `load`/`store` pointer casts: the scalar name of
    /// the register type's primitive kind, or the typedef name for
    /// aggregates, which have no scalar spelling
    fn cast_name(&self, type_id: u32) -> String {
        match self.type_defs[type_id as usize].prim().c_name() {
            Some(name) => name.to_string(),
            None => format!("_t{type_id}"),
        }
    }
}

/// C operator for a three-operand opcode
fn binop(opcode: Opcode) -> &'static str {
    match opcode {
        Opcode::Add => "+",
        Opcode::Sub => "-",
        Opcode::Mul => "*",
        Opcode::Div => "/",
        Opcode::Band => "&",
        Opcode::Bor => "|",
        Opcode::Bxor => "^",
        Opcode::Shl => "<<",
        Opcode::Shr => ">>",
        Opcode::Gt => ">",
        Opcode::Lt => "<",
        Opcode::Eq => "==",
        Opcode::Neq => "!=",
        Opcode::Gte => ">=",
        Opcode::Lte => "<=",
        _ => unreachable!("three-operand payload on {opcode:?}"),
    }
}
