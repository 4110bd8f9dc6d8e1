//! Tie-break sources for ranking diversification.
//!
//! The near-tie pass asks a [`TieBreaker`] whether to swap each eligible
//! adjacent pair. Production code uses [`RandomTieBreaker`]; tests inject
//! a seeded generator, [`NoTieBreak`], or a [`ScriptedTieBreaker`].

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Decides whether an eligible adjacent pair should be swapped.
pub trait TieBreaker {
    /// Called once per eligible pair, in ranking order.
    fn should_swap(&mut self) -> bool;
}

/// Swap with a fixed probability drawn from an RNG.
///
/// # Example
///
/// ```
/// use pulse_related::tie_break::{RandomTieBreaker, TieBreaker};
///
/// let mut never = RandomTieBreaker::seeded(7, 0.0);
/// assert!(!never.should_swap());
/// ```
#[derive(Debug, Clone)]
pub struct RandomTieBreaker<R> {
    rng: R,
    probability: f64,
}

impl<R: Rng> RandomTieBreaker<R> {
    /// Wrap `rng`. Probability is clamped to 0.0-1.0.
    pub fn new(rng: R, probability: f64) -> Self {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        Self { rng, probability }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl RandomTieBreaker<ThreadRng> {
    /// Unseeded, thread-local randomness.
    pub fn thread_local(probability: f64) -> Self {
        Self::new(rand::rng(), probability)
    }
}

impl RandomTieBreaker<StdRng> {
    /// Reproducible randomness from a fixed seed.
    pub fn seeded(seed: u64, probability: f64) -> Self {
        Self::new(StdRng::seed_from_u64(seed), probability)
    }
}

impl<R: Rng> TieBreaker for RandomTieBreaker<R> {
    fn should_swap(&mut self) -> bool {
        self.rng.random_bool(self.probability)
    }
}

/// Never swaps; makes ranking fully deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTieBreak;

impl TieBreaker for NoTieBreak {
    fn should_swap(&mut self) -> bool {
        false
    }
}

/// Replays a fixed list of decisions, then answers `false`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTieBreaker {
    decisions: Vec<bool>,
    calls: usize,
}

impl ScriptedTieBreaker {
    pub fn new(decisions: impl Into<Vec<bool>>) -> Self {
        Self {
            decisions: decisions.into(),
            calls: 0,
        }
    }

    /// How many eligible pairs have been offered so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl TieBreaker for ScriptedTieBreaker {
    fn should_swap(&mut self) -> bool {
        let decision = self.decisions.get(self.calls).copied().unwrap_or(false);
        self.calls += 1;
        decision
    }
}

/// Swaps every eligible pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysSwap;

impl TieBreaker for AlwaysSwap {
    fn should_swap(&mut self) -> bool {
        true
    }
}
