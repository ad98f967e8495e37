//! Instruction selection: one chooser-driven instruction at a time.

use crate::pool::ValuePool;
use crate::rejection::{Attempt, Rejection};
use comb_core::{Error, Result, Type};
use comb_guide::Chooser;
use comb_ir::{OpcodeFamily, ProgramBuilder, ValueId};
use tracing::trace;

/// Pick between the binary and variadic tables, then build one instruction.
pub fn try_add_operation<C: Chooser + ?Sized>(
    pool: &mut ValuePool,
    chooser: &mut C,
    builder: &mut ProgramBuilder,
) -> Result<Attempt<ValueId>> {
    if chooser.choose(2) == 1 {
        try_add_binary(pool, chooser, builder)
    } else {
        try_add_variadic(pool, chooser, builder)
    }
}

/// Build one instruction from the binary opcode table.
pub fn try_add_binary<C: Chooser + ?Sized>(
    pool: &mut ValuePool,
    chooser: &mut C,
    builder: &mut ProgramBuilder,
) -> Result<Attempt<ValueId>> {
    try_add_from(OpcodeFamily::Binary, pool, chooser, builder)
}

/// Build one two-operand instruction from the variadic opcode table.
pub fn try_add_variadic<C: Chooser + ?Sized>(
    pool: &mut ValuePool,
    chooser: &mut C,
    builder: &mut ProgramBuilder,
) -> Result<Attempt<ValueId>> {
    try_add_from(OpcodeFamily::Variadic, pool, chooser, builder)
}

fn try_add_from<C: Chooser + ?Sized>(
    family: OpcodeFamily,
    pool: &mut ValuePool,
    chooser: &mut C,
    builder: &mut ProgramBuilder,
) -> Result<Attempt<ValueId>> {
    let types = pool.types_with_multiple_values();
    if types.is_empty() {
        return Err(Error::Precondition(format!(
            "no type has two values to build a {:?} operation from ({} values pooled)",
            family,
            pool.len()
        )));
    }

    let ty = types[pick(chooser, types.len())?];
    let table = family.opcodes();
    let opcode = table[pick(chooser, table.len())?];
    let lhs = pick_operand(pool, chooser, ty)?;
    let rhs = pick_operand(pool, chooser, ty)?;

    if lhs == rhs && !opcode.allows_identical_operands() {
        trace!(opcode = %opcode, operand = lhs.0, "rejected degenerate operands");
        return Ok(Err(Rejection::DegenerateOperands {
            opcode,
            operand: lhs,
        }));
    }

    let result = builder
        .create(opcode, &[lhs, rhs], &[ty])?
        .first()
        .copied()
        .ok_or_else(|| Error::InvalidIr(format!("{} produced no result", opcode)))?;
    pool.add(result, ty);
    Ok(Ok(result))
}

fn pick_operand<C: Chooser + ?Sized>(pool: &ValuePool, chooser: &mut C, ty: Type) -> Result<ValueId> {
    let index = pick(chooser, pool.count(ty))?;
    pool.lookup(ty, index)
        .ok_or_else(|| Error::Precondition(format!("no {} value at pool index {}", ty, index)))
}

/// `chooser.choose(n)`, refusing answers outside `0..n`.
fn pick<C: Chooser + ?Sized>(chooser: &mut C, n: usize) -> Result<usize> {
    let answer = chooser.choose(n);
    if answer >= n {
        return Err(Error::Precondition(format!(
            "chooser answered {} for a decision with {} options",
            answer, n
        )));
    }
    Ok(answer)
}
