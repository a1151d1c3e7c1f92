//! Random sources for shape generation.
//!
//! Generators never call a global RNG; they draw from whatever
//! [`RandomSource`] the caller hands in.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A stream of uniform samples in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform sample in `[0, 1)`.
    fn unit(&mut self) -> f32;

    /// Uniform in `[-0.5, 0.5)`.
    fn centered(&mut self) -> f32 {
        self.unit() - 0.5
    }

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit()
    }

    /// Uniform angle in `[0, 2π)`.
    fn angle(&mut self) -> f32 {
        self.unit() * TAU
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RngSource: any `rand::Rng`
// ════════════════════════════════════════════════════════════════════════════

/// Adapts a `rand` generator to [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }
}

impl RngSource<StdRng> {
    /// Seeded from OS entropy; what the running application uses.
    pub fn from_entropy() -> Self {
        RngSource { rng: StdRng::from_entropy() }
    }

    /// Deterministic stream for a given seed.
    pub fn seeded(seed: u64) -> Self {
        RngSource { rng: StdRng::seed_from_u64(seed) }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SequenceSource: fixed values, cycled
// ════════════════════════════════════════════════════════════════════════════

/// Replays a fixed list of values, wrapping at the end.
///
/// An empty list yields `0.0` forever.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f32>) -> Self {
        SequenceSource { values, cursor: 0 }
    }

    pub fn constant(value: f32) -> Self {
        SequenceSource::new(vec![value])
    }

    /// Number of samples handed out so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceSource {
    fn unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
