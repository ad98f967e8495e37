//! Whole-program construction from a single chooser.

use crate::pool::ValuePool;
use crate::rejection::{Attempt, Rejection};
use crate::selector::try_add_operation;
use comb_core::{Error, GeneratorConfig, Result};
use comb_guide::Chooser;
use comb_ir::{Program, ProgramBuilder, ValueId};
use tracing::trace;

/// Builds one candidate program per chooser.
///
/// Every program has the configured arguments and exactly `fuel`
/// instructions. Only the last instruction's result may go unused.
#[derive(Debug, Clone)]
pub struct ProgramAssembler {
    config: GeneratorConfig,
}

/// A construction that made it through every instruction, before the
/// liveness filter runs.
struct Candidate {
    builder: ProgramBuilder,
    pool: ValuePool,
    result: ValueId,
}

impl ProgramAssembler {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build the program the chooser's answers describe, or report why they
    /// describe no acceptable program.
    pub fn build_program<C: Chooser + ?Sized>(&self, chooser: &mut C) -> Result<Attempt<Program>> {
        let candidate = match self.construct(chooser)? {
            Ok(candidate) => candidate,
            Err(rejection) => return Ok(Err(rejection)),
        };

        if let Some(value) = first_dead_value(&candidate) {
            trace!(value = value.0, "rejected dead value");
            return Ok(Err(Rejection::DeadValue { value }));
        }

        Ok(Ok(candidate.builder.finish()))
    }

    fn construct<C: Chooser + ?Sized>(&self, chooser: &mut C) -> Result<Attempt<Candidate>> {
        if self.config.fuel == 0 {
            return Err(Error::Precondition(
                "fuel must be at least 1 to produce a result".to_string(),
            ));
        }

        let mut builder = ProgramBuilder::new(self.config.function_name.as_str());
        let mut pool = ValuePool::new();
        for &ty in &self.config.arguments {
            let arg = builder.add_argument(ty);
            pool.add(arg, ty);
        }

        for _ in 0..self.config.fuel - 1 {
            if let Err(rejection) = try_add_operation(&mut pool, chooser, &mut builder)? {
                return Ok(Err(rejection));
            }
        }

        let result = match try_add_operation(&mut pool, chooser, &mut builder)? {
            Ok(result) => result,
            Err(rejection) => return Ok(Err(rejection)),
        };

        Ok(Ok(Candidate {
            builder,
            pool,
            result,
        }))
    }
}

/// First pooled value, in pool order, with no uses, other than the result.
fn first_dead_value(candidate: &Candidate) -> Option<ValueId> {
    let uses = candidate.builder.function().use_counts();
    candidate
        .pool
        .iter()
        .map(|(_, value)| value)
        .filter(|&value| value != candidate.result)
        .find(|value| uses.get(value.index()).copied().unwrap_or(0) == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use comb_core::Type;
    use comb_guide::ReplayChooser;
    use comb_ir::{check_liveness, validate_program, Opcode, Printer};

    const XOR: usize = 4;

    fn assembler(fuel: usize) -> ProgramAssembler {
        ProgramAssembler::new(GeneratorConfig {
            fuel,
            ..Default::default()
        })
    }

    /// Answers for one variadic instruction over i1: [family, type, opcode, lhs, rhs]
    fn variadic(opcode: usize, lhs: usize, rhs: usize) -> Vec<usize> {
        vec![0, 0, opcode, lhs, rhs]
    }

    #[test]
    fn test_xor_chain_on_first_two_slots() {
        let script: Vec<usize> = (0..3).flat_map(|_| variadic(XOR, 0, 1)).collect();

        let candidate = match assembler(3)
            .construct(&mut ReplayChooser::new(script.clone()))
            .unwrap()
        {
            Ok(candidate) => candidate,
            Err(rejection) => panic!("unexpected rejection: {}", rejection),
        };
        let func = candidate.builder.function();
        assert_eq!(func.instruction_count(), 3);
        for inst in func.instructions() {
            assert_eq!(inst.opcode, Opcode::Xor);
            assert_eq!(inst.operands, vec![ValueId(0), ValueId(1)]);
            assert_eq!(inst.ty, Type::I1);
        }
        assert_eq!(candidate.result, ValueId(5));
        assert_eq!(candidate.pool.len(), 6);

        // %arg2 is never consumed.
        let outcome = assembler(3)
            .build_program(&mut ReplayChooser::new(script))
            .unwrap();
        assert_eq!(outcome, Err(Rejection::DeadValue { value: ValueId(2) }));
    }

    #[test]
    fn test_chain_consuming_everything_is_accepted() {
        let script: Vec<usize> = [variadic(XOR, 0, 1), variadic(XOR, 2, 3), variadic(XOR, 4, 4)]
            .concat();

        let program = assembler(3)
            .build_program(&mut ReplayChooser::new(script))
            .unwrap()
            .unwrap();
        validate_program(&program).unwrap();
        let func = &program.functions[0];
        assert_eq!(check_liveness(func), None);
        assert_eq!(func.name, "foo");
        assert_eq!(func.argument_types(), vec![Type::I1; 3]);

        let text = Printer::default().print(&program);
        assert!(text.contains("%0 = \"comb.xor\"(%arg0, %arg1) : (i1, i1) -> i1"));
        assert!(text.contains("%1 = \"comb.xor\"(%arg2, %0) : (i1, i1) -> i1"));
        assert!(text.contains("%2 = \"comb.xor\"(%1, %1) : (i1, i1) -> i1"));
    }

    #[test]
    fn test_single_instruction_always_leaves_a_dead_input() {
        // With three inputs and two operand slots one input is always left
        // over.
        for (lhs, rhs) in [(0, 1), (1, 2), (0, 2), (2, 2)] {
            let outcome = assembler(1)
                .build_program(&mut ReplayChooser::new(variadic(XOR, lhs, rhs)))
                .unwrap();
            assert!(
                matches!(outcome, Err(Rejection::DeadValue { .. })),
                "xor({}, {}) was {:?}",
                lhs,
                rhs,
                outcome
            );
        }
    }

    #[test]
    fn test_degenerate_rejection_stops_construction() {
        // comb.sub %arg1, %arg1 fails at the first instruction.
        let script = [vec![1, 0, 7, 1, 1], variadic(XOR, 0, 2)].concat();
        let mut chooser = ReplayChooser::new(script);
        let outcome = assembler(2).build_program(&mut chooser).unwrap();

        assert_eq!(
            outcome,
            Err(Rejection::DegenerateOperands {
                opcode: Opcode::Sub,
                operand: ValueId(1)
            })
        );
        assert_eq!(chooser.choices().len(), 5);
    }

    #[test]
    fn test_same_answers_same_program() {
        let script = [variadic(0, 0, 1), vec![1, 0, 4, 2, 3]].concat();
        let first = assembler(2)
            .build_program(&mut ReplayChooser::new(script.clone()))
            .unwrap()
            .unwrap();
        let second = assembler(2)
            .build_program(&mut ReplayChooser::new(script))
            .unwrap()
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.functions[0].instructions()[1].opcode, Opcode::Shl);
    }

    #[test]
    fn test_dead_value_reported_in_pool_order() {
        let i2 = Type::integer(2).unwrap();
        let assembler = ProgramAssembler::new(GeneratorConfig {
            fuel: 1,
            arguments: vec![Type::I1, i2, Type::I1],
            ..Default::default()
        });

        // Only i1 has two values, so the type decision has a single option.
        let outcome = assembler
            .build_program(&mut ReplayChooser::new(variadic(XOR, 0, 1)))
            .unwrap();
        assert_eq!(outcome, Err(Rejection::DeadValue { value: ValueId(1) }));
    }

    #[test]
    fn test_zero_fuel_is_fatal() {
        let err = assembler(0)
            .build_program(&mut ReplayChooser::new(vec![]))
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_unbuildable_arguments_are_fatal() {
        let assembler = ProgramAssembler::new(GeneratorConfig {
            fuel: 1,
            arguments: vec![Type::I1, Type::integer(3).unwrap()],
            ..Default::default()
        });
        let err = assembler
            .build_program(&mut ReplayChooser::new(vec![0]))
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }
}
