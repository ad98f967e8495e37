//! Instruction set for generated `comb` programs.

use comb_core::{Error, Type};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Handle to an SSA value: an index into its function's value arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValueId(pub u32);

impl ValueId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// `comb` opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    // Binary
    DivU,
    DivS,
    ModU,
    ModS,
    Shl,
    ShrU,
    ShrS,
    Sub,

    // Variadic
    Add,
    Mul,
    And,
    Or,
    Xor,
}

/// Which operand table an opcode belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpcodeFamily {
    /// Exactly two operands
    Binary,
    /// Any number of operands; always generated with two
    Variadic,
}

/// Whether an opcode may be generated with the same value on both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegeneracyClass {
    /// Shifting a value by itself is fine
    Shift,
    /// `x & x`, `x | x` and `x ^ x` are well defined
    Bitwise,
    /// Identical operands are rejected to keep programs nontrivial
    Strict,
}

/// Binary opcodes, in chooser index order.
pub const BINARY_OPCODES: [Opcode; 8] = [
    Opcode::DivU,
    Opcode::DivS,
    Opcode::ModU,
    Opcode::ModS,
    Opcode::Shl,
    Opcode::ShrU,
    Opcode::ShrS,
    Opcode::Sub,
];

/// Variadic opcodes, in chooser index order.
pub const VARIADIC_OPCODES: [Opcode; 5] = [
    Opcode::Add,
    Opcode::Mul,
    Opcode::And,
    Opcode::Or,
    Opcode::Xor,
];

impl Opcode {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::DivU => "comb.divu",
            Opcode::DivS => "comb.divs",
            Opcode::ModU => "comb.modu",
            Opcode::ModS => "comb.mods",
            Opcode::Shl => "comb.shl",
            Opcode::ShrU => "comb.shru",
            Opcode::ShrS => "comb.shrs",
            Opcode::Sub => "comb.sub",
            Opcode::Add => "comb.add",
            Opcode::Mul => "comb.mul",
            Opcode::And => "comb.and",
            Opcode::Or => "comb.or",
            Opcode::Xor => "comb.xor",
        }
    }

    pub fn family(&self) -> OpcodeFamily {
        match self {
            Opcode::DivU
            | Opcode::DivS
            | Opcode::ModU
            | Opcode::ModS
            | Opcode::Shl
            | Opcode::ShrU
            | Opcode::ShrS
            | Opcode::Sub => OpcodeFamily::Binary,
            Opcode::Add | Opcode::Mul | Opcode::And | Opcode::Or | Opcode::Xor => {
                OpcodeFamily::Variadic
            }
        }
    }

    pub fn degeneracy(&self) -> DegeneracyClass {
        match self {
            Opcode::Shl | Opcode::ShrU | Opcode::ShrS => DegeneracyClass::Shift,
            Opcode::And | Opcode::Or | Opcode::Xor => DegeneracyClass::Bitwise,
            Opcode::DivU
            | Opcode::DivS
            | Opcode::ModU
            | Opcode::ModS
            | Opcode::Sub
            | Opcode::Add
            | Opcode::Mul => DegeneracyClass::Strict,
        }
    }

    /// Returns true if `op x, x` may be generated
    pub fn allows_identical_operands(&self) -> bool {
        self.degeneracy() != DegeneracyClass::Strict
    }

    pub fn all() -> impl Iterator<Item = Opcode> {
        BINARY_OPCODES.into_iter().chain(VARIADIC_OPCODES)
    }
}

impl OpcodeFamily {
    /// The opcode table a chooser index selects into
    pub fn opcodes(&self) -> &'static [Opcode] {
        match self {
            OpcodeFamily::Binary => &BINARY_OPCODES,
            OpcodeFamily::Variadic => &VARIADIC_OPCODES,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Opcode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Opcode::all()
            .find(|op| op.mnemonic() == s)
            .ok_or_else(|| Error::Parse(format!("unknown opcode `{}`", s)))
    }
}

/// A single SSA instruction in the IR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<ValueId>,
    pub result: ValueId,
    pub ty: Type,
}

impl Instruction {
    pub fn new(opcode: Opcode, operands: Vec<ValueId>, result: ValueId, ty: Type) -> Self {
        Self {
            opcode,
            operands,
            result,
            ty,
        }
    }

    pub fn uses(&self, value: ValueId) -> bool {
        self.operands.contains(&value)
    }

    /// Returns true if every operand is the same value
    pub fn has_identical_operands(&self) -> bool {
        self.operands.windows(2).all(|pair| pair[0] == pair[1])
    }
}
