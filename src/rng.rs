//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct provides the random draws the toolkit
//! needs (uniform reals, uniform indices, Bernoulli bits) on top of the
//! `rand` crate. All sampling in the crate goes through this type, so a run
//! is reproducible from a single seed.
//!
//! ## Example
//!
//! ```rust
//! use pbopt::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(42);
//! let index = rng.index(10);
//! assert!(index < 10);
//! let bit = rng.random_bit();
//! let _ = bit;
//! ```

use rand::{rngs::StdRng, Rng, SeedableRng};

/// A wrapper around the `rand` crate's `StdRng` that provides the draws used
/// by populations, neighborhoods and selection operators.
#[derive(Clone)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a uniform floating-point number in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    /// Draws a uniform index in `0..n`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero, like any empty-range draw.
    pub fn index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    /// Draws a fair coin flip.
    pub fn random_bit(&mut self) -> bool {
        self.rng.gen()
    }

    /// Draws `true` with probability `p`.
    ///
    /// Values of `p` outside `[0, 1]` are clamped by the comparison: `p <= 0`
    /// never fires, `p >= 1` always fires.
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.uniform() < p
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_in_range() {
        let mut rng = RandomNumberGenerator::new();
        for _ in 0..100 {
            let x = rng.uniform();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_index_in_range() {
        let mut rng = RandomNumberGenerator::new();
        for _ in 0..100 {
            assert!(rng.index(7) < 7);
        }
        assert_eq!(rng.index(1), 0);
    }

    #[test]
    fn test_bernoulli_extremes() {
        let mut rng = RandomNumberGenerator::new();
        for _ in 0..20 {
            assert!(!rng.bernoulli(0.0));
            assert!(rng.bernoulli(1.0));
        }
    }

    #[test]
    fn test_seeded_rngs_agree() {
        let mut rng1 = RandomNumberGenerator::from_seed(42);
        let mut rng2 = RandomNumberGenerator::from_seed(42);

        for _ in 0..10 {
            assert_eq!(rng1.uniform(), rng2.uniform());
            assert_eq!(rng1.index(100), rng2.index(100));
        }
    }

    #[test]
    fn test_clone_continues_the_same_sequence() {
        let mut rng1 = RandomNumberGenerator::from_seed(7);
        let mut rng2 = rng1.clone();

        for _ in 0..10 {
            assert_eq!(rng1.uniform(), rng2.uniform());
        }
    }
}
