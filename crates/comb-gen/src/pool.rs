//! Values available at the insertion point, bucketed by type.

use comb_core::Type;
use comb_ir::ValueId;
use std::collections::BTreeMap;

/// Every value defined so far in the block, grouped by type in creation
/// order. Since the block is straight-line, everything in the pool dominates
/// the next instruction.
#[derive(Debug, Clone, Default)]
pub struct ValuePool {
    buckets: BTreeMap<Type, Vec<ValueId>>,
    len: usize,
}

impl ValuePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: ValueId, ty: Type) {
        self.buckets.entry(ty).or_default().push(value);
        self.len += 1;
    }

    /// Types an instruction could be built over, in ascending order
    pub fn types_with_multiple_values(&self) -> Vec<Type> {
        self.buckets
            .iter()
            .filter(|(_, values)| values.len() >= 2)
            .map(|(ty, _)| *ty)
            .collect()
    }

    pub fn lookup(&self, ty: Type, index: usize) -> Option<ValueId> {
        self.buckets.get(&ty).and_then(|values| values.get(index)).copied()
    }

    pub fn count(&self, ty: Type) -> usize {
        self.buckets.get(&ty).map_or(0, Vec::len)
    }

    pub fn values(&self, ty: Type) -> &[ValueId] {
        self.buckets.get(&ty).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All pooled values, bucket by bucket
    pub fn iter(&self) -> impl Iterator<Item = (Type, ValueId)> + '_ {
        self.buckets
            .iter()
            .flat_map(|(ty, values)| values.iter().map(move |&v| (*ty, v)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
