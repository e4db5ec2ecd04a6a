//! Random draws for power-up drops, curses and option shuffling.
//!
//! Every probabilistic step in the game goes through [`Luck`], so tests can
//! swap in a scripted source and assert exact outcomes.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::question::QuestionOption;

/// Extra questions a curse can add.
pub const CURSE_EXTRA_CHOICES: [usize; 2] = [2, 3];

/// Source of randomness for game transitions.
pub trait Luck {
    /// A Bernoulli trial that succeeds with probability `p`.
    fn chance(&mut self, p: f64) -> bool;

    /// Number of questions a curse adds, drawn from [`CURSE_EXTRA_CHOICES`].
    fn curse_extra(&mut self) -> usize;

    /// Permute a question's options in place.
    fn shuffle_options(&mut self, options: &mut [QuestionOption]);
}

/// [`Luck`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngLuck<R> {
    rng: R,
}

impl<R: Rng> RngLuck<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngLuck<StdRng> {
    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Luck for RngLuck<R> {
    fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    fn curse_extra(&mut self) -> usize {
        CURSE_EXTRA_CHOICES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(CURSE_EXTRA_CHOICES[0])
    }

    fn shuffle_options(&mut self, options: &mut [QuestionOption]) {
        options.shuffle(&mut self.rng);
    }
}
