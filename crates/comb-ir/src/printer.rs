//! Textual MLIR output for generated programs.
//!
//! `comb` operations are always printed in generic form.

use crate::instruction::Instruction;
use crate::program::{Function, Program, Terminator, Visibility};
use std::fmt::Write;

pub struct Printer {
    config: PrinterConfig,
}

#[derive(Debug, Clone)]
pub struct PrinterConfig {
    /// Spaces per nesting level
    pub indent: usize,
    /// Print `builtin.module` and `func.func` in generic form as well
    pub generic: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            generic: false,
        }
    }
}

impl Printer {
    pub fn new(config: PrinterConfig) -> Self {
        Self { config }
    }

    pub fn print(&self, program: &Program) -> String {
        let mut out = String::new();
        if self.config.generic {
            out.push_str("\"builtin.module\"() ({\n");
            for func in &program.functions {
                self.print_generic_function(&mut out, func);
            }
            out.push_str("}) : () -> ()\n");
        } else {
            out.push_str("module {\n");
            for func in &program.functions {
                self.print_function(&mut out, func);
            }
            out.push_str("}\n");
        }
        out
    }

    fn print_function(&self, out: &mut String, func: &Function) {
        let pad = self.pad(1);
        let visibility = match func.visibility {
            Visibility::Private => "private ",
            Visibility::Public => "",
        };
        let _ = writeln!(
            out,
            "{}func.func {}@{}({}) {{",
            pad,
            visibility,
            func.name,
            self.argument_list(func)
        );
        self.print_body(out, func, 2);
        let _ = writeln!(out, "{}}}", pad);
    }

    fn print_generic_function(&self, out: &mut String, func: &Function) {
        let pad = self.pad(1);
        let arg_types = func
            .argument_types()
            .iter()
            .map(|ty| ty.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let visibility = match func.visibility {
            Visibility::Private => ", sym_visibility = \"private\"",
            Visibility::Public => "",
        };
        let _ = writeln!(
            out,
            "{}\"func.func\"() <{{function_type = ({}) -> (), sym_name = \"{}\"{}}}> ({{",
            pad, arg_types, func.name, visibility
        );
        let _ = writeln!(out, "{}^bb0({}):", pad, self.argument_list(func));
        self.print_body(out, func, 2);
        let _ = writeln!(out, "{}}}) : () -> ()", pad);
    }

    fn print_body(&self, out: &mut String, func: &Function, depth: usize) {
        let pad = self.pad(depth);
        for block in &func.blocks {
            for inst in &block.instructions {
                let _ = writeln!(out, "{}{}", pad, self.format_instruction(func, inst));
            }
            match block.terminator {
                Some(Terminator::Return) if self.config.generic => {
                    let _ = writeln!(out, "{}\"func.return\"() : () -> ()", pad);
                }
                Some(Terminator::Return) => {
                    let _ = writeln!(out, "{}return", pad);
                }
                None => {}
            }
        }
    }

    /// `%2 = "comb.xor"(%arg0, %arg1) : (i1, i1) -> i1`
    pub fn format_instruction(&self, func: &Function, inst: &Instruction) -> String {
        let operands = inst
            .operands
            .iter()
            .map(|&op| func.value_name(op))
            .collect::<Vec<_>>()
            .join(", ");
        let operand_types = inst
            .operands
            .iter()
            .map(|&op| {
                func.value_type(op)
                    .map(|ty| ty.to_string())
                    .unwrap_or_else(|| "none".to_string())
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} = \"{}\"({}) : ({}) -> {}",
            func.value_name(inst.result),
            inst.opcode.mnemonic(),
            operands,
            operand_types,
            inst.ty
        )
    }

    fn argument_list(&self, func: &Function) -> String {
        func.arguments
            .iter()
            .filter_map(|&arg| {
                func.value_type(arg)
                    .map(|ty| format!("{}: {}", func.value_name(arg), ty))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn pad(&self, depth: usize) -> String {
        " ".repeat(self.config.indent * depth)
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(PrinterConfig::default())
    }
}
