//! Validation for generated programs.

use crate::instruction::ValueId;
use crate::program::{Function, Program, ValueDef};
use comb_core::{Error, Result};

/// Validate that a program is well-formed
pub fn validate_program(program: &Program) -> Result<()> {
    if program.functions.is_empty() {
        return Err(Error::InvalidIr("module has no functions".to_string()));
    }

    for func in &program.functions {
        validate_function(func)?;
    }

    Ok(())
}

fn validate_function(func: &Function) -> Result<()> {
    if func.blocks.len() != 1 {
        return Err(Error::InvalidIr(format!(
            "function @{} has {} blocks, expected one",
            func.name,
            func.blocks.len()
        )));
    }
    if !func.entry_block().is_terminated() {
        return Err(Error::InvalidIr(format!(
            "function @{} is missing its return",
            func.name
        )));
    }

    for (n, &arg) in func.arguments.iter().enumerate() {
        match func.value(arg).map(|info| info.def) {
            Some(ValueDef::Argument(index)) if index == n => {}
            _ => {
                return Err(Error::InvalidIr(format!(
                    "argument {} of @{} is not registered as an argument",
                    n, func.name
                )))
            }
        }
    }

    // Walk the block in order: a value is visible once its definition has
    // been passed.
    let mut defined = vec![false; func.values.len()];
    for &arg in &func.arguments {
        defined[arg.index()] = true;
    }

    for (n, inst) in func.instructions().iter().enumerate() {
        if inst.operands.len() != 2 {
            return Err(Error::InvalidIr(format!(
                "instruction {} ({}) has {} operands",
                n,
                inst.opcode,
                inst.operands.len()
            )));
        }
        for &op in &inst.operands {
            if !defined.get(op.index()).copied().unwrap_or(false) {
                return Err(Error::InvalidIr(format!(
                    "instruction {} ({}) uses {} before its definition",
                    n,
                    inst.opcode,
                    func.value_name(op)
                )));
            }
            if func.value_type(op) != Some(inst.ty) {
                return Err(Error::InvalidIr(format!(
                    "instruction {} ({}) operand {} does not have type {}",
                    n,
                    inst.opcode,
                    func.value_name(op),
                    inst.ty
                )));
            }
        }
        match func.value(inst.result) {
            Some(info) if info.def == ValueDef::Result(n) && info.ty == inst.ty => {}
            _ => {
                return Err(Error::InvalidIr(format!(
                    "instruction {} ({}) result is not registered as its own",
                    n, inst.opcode
                )))
            }
        }
        defined[inst.result.index()] = true;
    }

    Ok(())
}

/// Find the first value, in definition order, that no instruction consumes.
///
/// The last instruction's result is the function's observable output and is
/// exempt.
pub fn check_liveness(func: &Function) -> Option<ValueId> {
    let final_result = func.final_result();
    let counts = func.use_counts();
    (0..func.values.len())
        .map(|i| ValueId(i as u32))
        .filter(|&id| Some(id) != final_result)
        .find(|id| counts[id.index()] == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{Instruction, Opcode};
    use crate::program::ProgramBuilder;
    use comb_core::Type;

    #[test]
    fn test_validate_empty_program() {
        let program = Program::new();
        assert!(validate_program(&program).is_err());
    }

    #[test]
    fn test_validate_missing_return() {
        let mut builder = ProgramBuilder::new("foo");
        let a = builder.add_argument(Type::I1);
        builder.create(Opcode::Or, &[a, a], &[Type::I1]).unwrap();
        let mut program = Program::new();
        program.add_function(builder.function().clone());

        assert!(validate_program(&program).is_err());
    }

    #[test]
    fn test_validate_valid_program() {
        let mut builder = ProgramBuilder::new("foo");
        let a = builder.add_argument(Type::I1);
        let b = builder.add_argument(Type::I1);
        let r = builder.create(Opcode::DivU, &[a, b], &[Type::I1]).unwrap()[0];
        builder.create(Opcode::Shl, &[r, r], &[Type::I1]).unwrap();
        let program = builder.finish();

        assert!(validate_program(&program).is_ok());
        assert_eq!(check_liveness(&program.functions[0]), None);
    }

    #[test]
    fn test_validate_forward_reference() {
        let mut builder = ProgramBuilder::new("foo");
        let a = builder.add_argument(Type::I1);
        let b = builder.add_argument(Type::I1);
        builder.create(Opcode::Add, &[a, b], &[Type::I1]).unwrap();
        builder.create(Opcode::Mul, &[a, b], &[Type::I1]).unwrap();
        let mut program = builder.finish();

        // Make the first instruction read the second one's result.
        let func = &mut program.functions[0];
        func.blocks[0].instructions[0].operands[1] = ValueId(3);
        let err = validate_program(&program).unwrap_err();
        assert!(err.to_string().contains("before its definition"));
    }

    #[test]
    fn test_validate_wrong_arity() {
        let mut builder = ProgramBuilder::new("foo");
        let a = builder.add_argument(Type::I1);
        builder.create(Opcode::Xor, &[a, a], &[Type::I1]).unwrap();
        let mut program = builder.finish();

        program.functions[0].blocks[0].instructions[0] =
            Instruction::new(Opcode::Xor, vec![a], ValueId(1), Type::I1);
        assert!(validate_program(&program).is_err());
    }

    #[test]
    fn test_check_liveness_reports_first_dead_value() {
        let mut builder = ProgramBuilder::new("foo");
        let a = builder.add_argument(Type::I1);
        let b = builder.add_argument(Type::I1);
        let c = builder.add_argument(Type::I1);
        builder.create(Opcode::Xor, &[a, b], &[Type::I1]).unwrap();
        let program = builder.finish();

        assert_eq!(check_liveness(&program.functions[0]), Some(c));
    }
}
