//! Program structure for generated modules.

use crate::instruction::{Instruction, Opcode, ValueId};
use comb_core::{Error, Result, Type};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Where an SSA value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueDef {
    /// The n-th function argument
    Argument(usize),
    /// The result of the n-th instruction of the entry block
    Result(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueInfo {
    pub ty: Type,
    pub def: ValueDef,
}

/// Block terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminator {
    /// `return` with no values
    Return,
}

/// A basic block is a sequence of instructions with no internal control flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub instructions: Vec<Instruction>,
    pub terminator: Option<Terminator>,
}

impl BasicBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_instruction(&mut self, inst: Instruction) {
        self.instructions.push(inst);
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminator.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Private,
}

/// A function with a single straight-line body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub visibility: Visibility,
    pub arguments: Vec<ValueId>,
    pub values: Vec<ValueInfo>,
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    /// An empty private function taking no arguments and returning nothing.
    pub fn new(name: String) -> Self {
        Self {
            name,
            visibility: Visibility::Private,
            arguments: Vec::new(),
            values: Vec::new(),
            blocks: vec![BasicBlock::new()],
        }
    }

    pub fn entry_block(&self) -> &BasicBlock {
        &self.blocks[0]
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.entry_block().instructions
    }

    pub fn value(&self, id: ValueId) -> Option<&ValueInfo> {
        self.values.get(id.index())
    }

    pub fn value_type(&self, id: ValueId) -> Option<Type> {
        self.value(id).map(|info| info.ty)
    }

    pub fn argument_types(&self) -> Vec<Type> {
        self.arguments
            .iter()
            .filter_map(|&arg| self.value_type(arg))
            .collect()
    }

    /// Name of a value as it appears in printed IR (`%arg0`, `%3`)
    pub fn value_name(&self, id: ValueId) -> String {
        match self.value(id).map(|info| info.def) {
            Some(ValueDef::Argument(n)) => format!("%arg{}", n),
            Some(ValueDef::Result(n)) => format!("%{}", n),
            None => format!("%undef{}", id.0),
        }
    }

    /// Number of operand slots referring to `value`
    pub fn use_count(&self, value: ValueId) -> usize {
        self.instructions()
            .iter()
            .map(|inst| inst.operands.iter().filter(|&&op| op == value).count())
            .sum()
    }

    /// Use counts for every value, indexed by `ValueId`
    pub fn use_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.values.len()];
        for inst in self.instructions() {
            for op in &inst.operands {
                if let Some(count) = counts.get_mut(op.index()) {
                    *count += 1;
                }
            }
        }
        counts
    }

    /// The value produced by the last instruction, if any
    pub fn final_result(&self) -> Option<ValueId> {
        self.instructions().last().map(|inst| inst.result)
    }

    pub fn instruction_count(&self) -> usize {
        self.blocks.iter().map(|b| b.len()).sum()
    }
}

/// A generated module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub functions: Vec<Function>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_function(&mut self, function: Function) -> usize {
        self.functions.push(function);
        self.functions.len() - 1
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn num_functions(&self) -> usize {
        self.functions.len()
    }

    pub fn total_instructions(&self) -> usize {
        self.functions.iter().map(|f| f.instruction_count()).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Builds a module with one function, one block, appending instructions at
/// the end of that block.
#[derive(Debug, Clone)]
pub struct ProgramBuilder {
    function: Function,
}

impl ProgramBuilder {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function: Function::new(function_name.into()),
        }
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    /// Append a typed argument to the function signature
    pub fn add_argument(&mut self, ty: Type) -> ValueId {
        let id = self.next_value_id();
        let index = self.function.arguments.len();
        self.function.values.push(ValueInfo {
            ty,
            def: ValueDef::Argument(index),
        });
        self.function.arguments.push(id);
        id
    }

    /// Create one operation at the insertion point.
    ///
    /// Operands must already be defined and every operand and result must
    /// share one type.
    pub fn create(
        &mut self,
        opcode: Opcode,
        operands: &[ValueId],
        result_types: &[Type],
    ) -> Result<Vec<ValueId>> {
        if self.function.entry_block().is_terminated() {
            return Err(Error::InvalidIr("block is already terminated".to_string()));
        }
        if operands.len() != 2 {
            return Err(Error::InvalidIr(format!(
                "{} expects 2 operands, got {}",
                opcode,
                operands.len()
            )));
        }
        let ty = match result_types {
            [ty] => *ty,
            _ => {
                return Err(Error::InvalidIr(format!(
                    "{} produces exactly one result, got {} result types",
                    opcode,
                    result_types.len()
                )))
            }
        };
        for &operand in operands {
            match self.function.value_type(operand) {
                Some(operand_ty) if operand_ty == ty => {}
                Some(operand_ty) => {
                    return Err(Error::InvalidIr(format!(
                        "{} operand {} has type {}, expected {}",
                        opcode,
                        self.function.value_name(operand),
                        operand_ty,
                        ty
                    )))
                }
                None => {
                    return Err(Error::InvalidIr(format!(
                        "{} uses undefined value {}",
                        opcode, operand.0
                    )))
                }
            }
        }

        let result = self.next_value_id();
        let index = self.function.entry_block().len();
        self.function.values.push(ValueInfo {
            ty,
            def: ValueDef::Result(index),
        });
        self.function.blocks[0].add_instruction(Instruction::new(
            opcode,
            operands.to_vec(),
            result,
            ty,
        ));
        trace!(opcode = %opcode, result = result.0, "created instruction");
        Ok(vec![result])
    }

    pub fn use_count(&self, value: ValueId) -> usize {
        self.function.use_count(value)
    }

    /// Terminate the block with a no-value return and wrap the function in a
    /// module.
    pub fn finish(mut self) -> Program {
        self.function.blocks[0].terminator = Some(Terminator::Return);
        Program {
            functions: vec![self.function],
        }
    }

    fn next_value_id(&self) -> ValueId {
        ValueId(self.function.values.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i2() -> Type {
        Type::integer(2).unwrap()
    }

    #[test]
    fn test_basic_block() {
        let mut block = BasicBlock::new();
        assert!(block.is_empty());
        assert!(!block.is_terminated());

        block.add_instruction(Instruction::new(
            Opcode::And,
            vec![ValueId(0), ValueId(0)],
            ValueId(1),
            Type::I1,
        ));
        assert_eq!(block.len(), 1);
    }

    #[test]
    fn test_builder_arguments() {
        let mut builder = ProgramBuilder::new("foo");
        let a = builder.add_argument(Type::I1);
        let b = builder.add_argument(i2());
        assert_eq!(a, ValueId(0));
        assert_eq!(b, ValueId(1));

        let func = builder.function();
        assert_eq!(func.argument_types(), vec![Type::I1, i2()]);
        assert_eq!(func.value_name(b), "%arg1");
        assert_eq!(func.visibility, Visibility::Private);
    }

    #[test]
    fn test_builder_create() {
        let mut builder = ProgramBuilder::new("foo");
        let a = builder.add_argument(Type::I1);
        let b = builder.add_argument(Type::I1);

        let results = builder.create(Opcode::Xor, &[a, b], &[Type::I1]).unwrap();
        assert_eq!(results, vec![ValueId(2)]);
        assert_eq!(builder.function().value_name(results[0]), "%0");
        assert_eq!(builder.use_count(a), 1);

        let results = builder.create(Opcode::Shl, &[results[0], results[0]], &[Type::I1]).unwrap();
        assert_eq!(builder.use_count(ValueId(2)), 2);
        assert_eq!(builder.function().final_result(), Some(results[0]));

        let program = builder.finish();
        assert_eq!(program.num_functions(), 1);
        assert_eq!(program.total_instructions(), 2);
        let func = program.get_function("foo").unwrap();
        assert_eq!(func.entry_block().terminator, Some(Terminator::Return));
        assert_eq!(func.use_counts(), vec![1, 1, 2, 0]);
    }

    #[test]
    fn test_builder_rejects_bad_operations() {
        let mut builder = ProgramBuilder::new("foo");
        let a = builder.add_argument(Type::I1);
        let w = builder.add_argument(i2());

        assert!(builder.create(Opcode::Add, &[a, w], &[Type::I1]).is_err());
        assert!(builder.create(Opcode::Add, &[a, ValueId(9)], &[Type::I1]).is_err());
        assert!(builder.create(Opcode::Add, &[a], &[Type::I1]).is_err());
        assert!(builder.create(Opcode::Add, &[a, a], &[]).is_err());
        assert_eq!(builder.function().instruction_count(), 0);
    }

    #[test]
    fn test_program_json() {
        let mut builder = ProgramBuilder::new("foo");
        let a = builder.add_argument(Type::I1);
        let b = builder.add_argument(Type::I1);
        builder.create(Opcode::Or, &[a, b], &[Type::I1]).unwrap();
        let program = builder.finish();

        let json = program.to_json().unwrap();
        assert!(json.contains("\"i1\""));
        let back = Program::from_json(&json).unwrap();
        assert_eq!(back, program);
    }
}
