//! Expected, per-attempt rejections.

use comb_ir::{Opcode, ValueId};
use std::fmt;

/// Why a candidate program was discarded. Rejections are the normal outcome
/// for most choice sequences and never abort a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A strict opcode was given the same value on both sides
    DegenerateOperands { opcode: Opcode, operand: ValueId },
    /// A value other than the final result is never consumed
    DeadValue { value: ValueId },
}

/// Outcome of one construction step: the built item or a rejection.
pub type Attempt<T> = std::result::Result<T, Rejection>;

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::DegenerateOperands { opcode, operand } => write!(
                f,
                "{} applied to value {} on both sides",
                opcode, operand.0
            ),
            Rejection::DeadValue { value } => write!(f, "value {} is never used", value.0),
        }
    }
}
