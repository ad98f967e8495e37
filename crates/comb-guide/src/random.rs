//! Seeded random sampling of choice sequences.

use crate::chooser::{Chooser, Guide};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Hands out `samples` choosers whose answers are uniform draws.
///
/// The guide's own stream seeds each chooser, so the k-th chooser of a run
/// depends only on the guide seed and `k`.
#[derive(Debug, Clone)]
pub struct RandomGuide {
    rng: ChaCha8Rng,
    samples: u64,
    issued: u64,
}

impl RandomGuide {
    pub fn new(seed: u64, samples: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            samples,
            issued: 0,
        }
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }
}

impl Guide for RandomGuide {
    type Chooser<'a> = RandomChooser;

    fn make_chooser(&mut self) -> Option<RandomChooser> {
        if self.issued >= self.samples {
            return None;
        }
        self.issued += 1;
        Some(RandomChooser::new(self.rng.gen()))
    }
}

/// Chooser drawing every answer uniformly from its own ChaCha stream.
#[derive(Debug, Clone)]
pub struct RandomChooser {
    rng: ChaCha8Rng,
    choices: Vec<usize>,
}

impl RandomChooser {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            choices: Vec::new(),
        }
    }
}

impl Chooser for RandomChooser {
    fn choose(&mut self, n: usize) -> usize {
        assert!(n > 0, "choose called with zero options");
        let answer = self.rng.gen_range(0..n);
        self.choices.push(answer);
        answer
    }

    fn choices(&self) -> &[usize] {
        &self.choices
    }
}
