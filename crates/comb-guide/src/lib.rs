//! Choice-sequence guides for program enumeration.
//!
//! A [`Guide`] hands out [`Chooser`]s one at a time. Each chooser answers the
//! bounded decisions of a single construction attempt; its answers alone
//! determine what gets built. [`BfsGuide`] walks the whole decision tree,
//! [`RandomGuide`] samples it reproducibly from a seed, and [`ReplayChooser`]
//! plays back a recorded answer sequence.

pub mod bfs;
pub mod chooser;
pub mod random;
pub mod replay;

pub use bfs::{BfsChooser, BfsGuide};
pub use chooser::{Chooser, Guide};
pub use random::{RandomChooser, RandomGuide};
pub use replay::ReplayChooser;
