//! Playback of a recorded choice sequence.

use crate::chooser::Chooser;

/// Answers decisions from a fixed script, then with 0 once it runs out.
///
/// Feeding a chooser's recorded `choices()` back through a `ReplayChooser`
/// rebuilds exactly the same attempt.
#[derive(Debug, Clone, Default)]
pub struct ReplayChooser {
    script: Vec<usize>,
    choices: Vec<usize>,
}

impl ReplayChooser {
    pub fn new(script: Vec<usize>) -> Self {
        Self {
            script,
            choices: Vec::new(),
        }
    }

    /// True once every scripted answer has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.choices.len() >= self.script.len()
    }
}

impl Chooser for ReplayChooser {
    fn choose(&mut self, n: usize) -> usize {
        assert!(n > 0, "choose called with zero options");
        let answer = self.script.get(self.choices.len()).copied().unwrap_or(0);
        assert!(
            answer < n,
            "scripted answer {} at decision {} is out of range for {} options",
            answer,
            self.choices.len(),
            n
        );
        self.choices.push(answer);
        answer
    }

    fn choices(&self) -> &[usize] {
        &self.choices
    }
}
