//! Exhaustive breadth-first enumeration of choice sequences.

use crate::chooser::{Chooser, Guide};
use std::collections::VecDeque;
use tracing::debug;

/// Walks every path of the decision tree exactly once.
///
/// The tree is discovered lazily: a chooser replays a pending prefix, then
/// takes branch 0 at every new decision while queueing branches `1..n` as
/// new prefixes. The attempt driven by the chooser may stop at any depth, so
/// paths of different lengths coexist; each is still produced once.
#[derive(Debug)]
pub struct BfsGuide {
    pending: VecDeque<Vec<usize>>,
    issued: u64,
    max_choosers: Option<u64>,
}

impl BfsGuide {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::from([Vec::new()]),
            issued: 0,
            max_choosers: None,
        }
    }

    /// Stop after `limit` choosers even if paths remain.
    pub fn with_max_choosers(mut self, limit: u64) -> Self {
        self.max_choosers = Some(limit);
        self
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Prefixes discovered but not yet handed out
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Default for BfsGuide {
    fn default() -> Self {
        Self::new()
    }
}

impl Guide for BfsGuide {
    type Chooser<'a> = BfsChooser<'a>;

    fn make_chooser(&mut self) -> Option<BfsChooser<'_>> {
        if self.max_choosers.is_some_and(|limit| self.issued >= limit) {
            debug!(issued = self.issued, "BFS guide reached its chooser limit");
            return None;
        }
        let prefix = self.pending.pop_front()?;
        self.issued += 1;
        Some(BfsChooser {
            pending: &mut self.pending,
            prefix,
            choices: Vec::new(),
        })
    }
}

/// Chooser handed out by [`BfsGuide`].
#[derive(Debug)]
pub struct BfsChooser<'g> {
    pending: &'g mut VecDeque<Vec<usize>>,
    prefix: Vec<usize>,
    choices: Vec<usize>,
}

impl Chooser for BfsChooser<'_> {
    fn choose(&mut self, n: usize) -> usize {
        assert!(n > 0, "choose called with zero options");

        let depth = self.choices.len();
        let answer = match self.prefix.get(depth) {
            Some(&replayed) => {
                assert!(
                    replayed < n,
                    "decision {} changed from {} options to {} between attempts",
                    depth,
                    replayed + 1,
                    n
                );
                replayed
            }
            None => {
                for sibling in 1..n {
                    let mut path = self.choices.clone();
                    path.push(sibling);
                    self.pending.push_back(path);
                }
                0
            }
        };

        self.choices.push(answer);
        answer
    }

    fn choices(&self) -> &[usize] {
        &self.choices
    }
}
