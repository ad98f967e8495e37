//! Intermediate Representation (IR) for generated `comb` programs.
//!
//! A deliberately small SSA form: one module, one function, one straight-line
//! block of two-operand `comb` operations over integer values, ended by a
//! return. Values live in a per-function arena and are referred to by index.

pub mod instruction;
pub mod program;
pub mod printer;
pub mod validation;

pub use instruction::{
    DegeneracyClass, Instruction, Opcode, OpcodeFamily, ValueId, BINARY_OPCODES, VARIADIC_OPCODES,
};
pub use program::{BasicBlock, Function, Program, ProgramBuilder, Terminator, ValueDef, Visibility};
pub use printer::{Printer, PrinterConfig};
pub use validation::{check_liveness, validate_program};
