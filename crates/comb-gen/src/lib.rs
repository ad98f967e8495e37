//! Program construction and enumeration.
//!
//! Builds candidate programs one choice at a time from a value pool that
//! tracks which SSA values dominate the insertion point, rejects candidates
//! with degenerate operands or dead values, and drives a [`comb_guide::Guide`]
//! over the whole choice space.

pub mod assembler;
pub mod driver;
pub mod pool;
pub mod rejection;
pub mod selector;

pub use assembler::ProgramAssembler;
pub use driver::{CollectSink, EnumerationDriver, GenerationStats, ProgramSink};
pub use pool::ValuePool;
pub use rejection::{Attempt, Rejection};
pub use selector::{try_add_binary, try_add_operation, try_add_variadic};
