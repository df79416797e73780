//! Injectable randomness
//!
//! Every placeholder heuristic that rolls dice (forecast noise, fallback
//! findings, presentation confidence, sampled recommendations) draws from an
//! [`EntropySource`] handed in by the caller. Nothing reads a global RNG, so a
//! seeded or fixed source makes every analysis reproducible.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

/// Source of uniform randomness for the scoring policy
pub trait EntropySource {
    /// Uniform sample in `[0, 1)`
    fn unit(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;

    /// Uniform sample in `[low, high)`; returns `low` for an empty range
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        low + self.unit() * (high - low)
    }

    /// Uniform integer in `[low, high]` (inclusive on both ends)
    fn int_inclusive(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        let span = (high - low + 1) as usize;
        low + self.index(span) as i64
    }

    /// `amount` distinct indices from `0..len`, in draw order
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        let amount = amount.min(len);
        let mut pool: Vec<usize> = (0..len).collect();
        let mut picked = Vec::with_capacity(amount);
        for _ in 0..amount {
            let i = self.index(pool.len());
            picked.push(pool.swap_remove(i));
        }
        picked
    }
}

/// Pseudo-random source backed by `StdRng`
pub struct SeededEntropy {
    rng: StdRng,
}

impl SeededEntropy {
    /// Reproducible source for a given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl EntropySource for SeededEntropy {
    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut self.rng, len, amount.min(len)).into_vec()
    }
}

/// Deterministic source that always returns the same draw
///
/// With the default midpoint (`0.5`) the forecast noise factor is exactly
/// 1.0, so it doubles as "noise disabled".
#[derive(Debug, Clone, Copy)]
pub struct FixedEntropy {
    value: f64,
}

impl FixedEntropy {
    pub fn new(value: f64) -> Self {
        Self {
            value: value.clamp(0.0, 1.0 - f64::EPSILON),
        }
    }

    pub fn midpoint() -> Self {
        Self::new(0.5)
    }
}

impl Default for FixedEntropy {
    fn default() -> Self {
        Self::midpoint()
    }
}

impl EntropySource for FixedEntropy {
    fn unit(&mut self) -> f64 {
        self.value
    }

    fn index(&mut self, len: usize) -> usize {
        ((self.value * len as f64) as usize).min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SeededEntropy::new(42);
        let mut b = SeededEntropy::new(42);
        let xs: Vec<f64> = (0..5).map(|_| a.unit()).collect();
        let ys: Vec<f64> = (0..5).map(|_| b.unit()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_uniform_bounds() {
        let mut rng = SeededEntropy::new(7);
        for _ in 0..200 {
            let x = rng.uniform(0.7, 0.9);
            assert!((0.7..0.9).contains(&x));
        }
        assert_eq!(rng.uniform(3.0, 3.0), 3.0);
    }

    #[test]
    fn test_int_inclusive_hits_both_ends() {
        let mut low = FixedEntropy::new(0.0);
        let mut high = FixedEntropy::new(1.0);
        assert_eq!(low.int_inclusive(20, 45), 20);
        assert_eq!(high.int_inclusive(20, 45), 45);
    }

    #[test]
    fn test_sample_indices_distinct() {
        let mut rng = SeededEntropy::new(3);
        let mut picked = rng.sample_indices(10, 3);
        assert_eq!(picked.len(), 3);
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), 3);

        let mut fixed = FixedEntropy::midpoint();
        let mut picked = fixed.sample_indices(10, 3);
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn test_sample_more_than_available() {
        let mut rng = SeededEntropy::new(1);
        assert_eq!(rng.sample_indices(2, 5).len(), 2);
    }

    #[test]
    fn test_fixed_midpoint() {
        let mut fixed = FixedEntropy::default();
        assert_eq!(fixed.unit(), 0.5);
        assert_eq!(fixed.index(5), 2);
        assert_eq!(fixed.uniform(-5.0, 5.0), 0.0);
    }
}
