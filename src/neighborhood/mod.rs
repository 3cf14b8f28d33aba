//! # Neighborhoods
//!
//! Neighborhood sampling primitives for local search. A neighborhood owns
//! an *origin* bit vector (the current point) and a *candidate* (the
//! origin with a sampled flip set applied), plus the
//! [`SparseBitVec`](crate::bitvec::SparseBitVec) relating the two, which
//! is exactly the delta the incremental-evaluation contract consumes.
//!
//! The proposal cycle is:
//!
//! 1. [`Neighborhood::propose`] samples a flip set and applies it to the
//!    candidate;
//! 2. the caller evaluates the candidate (incrementally via the flip set,
//!    or fully);
//! 3. [`Neighborhood::keep`] commits the move (the origin catches up), or
//!    [`Neighborhood::forget`] reverts it.
//!
//! All bookkeeping is proportional to the number of flipped bits, never to
//! the bit vector size, so a local-search step stays cheap.

use crate::bitvec::{BitVec, SparseBitVec};
use crate::error::{Result, SearchError};
use crate::rng::RandomNumberGenerator;

mod hamming;
mod single_bit_flip;
mod standard_bit_mutation;

pub use hamming::{HammingBall, HammingSphere};
pub use single_bit_flip::SingleBitFlip;
pub use standard_bit_mutation::StandardBitMutation;

/// A sampling distribution over the neighbors of the current point.
pub trait Neighborhood {
    /// Returns the bit vector size the neighborhood operates on.
    fn bv_size(&self) -> usize;

    /// Returns the current point.
    fn origin(&self) -> &BitVec;

    /// Returns the proposed point (equal to the origin outside an open
    /// proposal).
    fn candidate(&self) -> &BitVec;

    /// Returns the flip set relating origin and candidate.
    fn flipped_bits(&self) -> &SparseBitVec;

    /// Resets origin and candidate to `bv`, discarding any open proposal.
    ///
    /// # Errors
    ///
    /// Returns a `SizeMismatch` error if `bv` has the wrong length.
    fn set_origin(&mut self, bv: BitVec) -> Result<()>;

    /// Samples a flip set and applies it to the candidate. An open proposal
    /// is reverted first.
    fn propose(&mut self, rng: &mut RandomNumberGenerator);

    /// Commits the open proposal: the origin catches up with the candidate.
    fn keep(&mut self);

    /// Reverts the open proposal: the candidate falls back to the origin.
    fn forget(&mut self);
}

/// Shared origin/candidate/flip-set state for neighborhood
/// implementations.
///
/// Implementations sample indices into [`NeighborhoodState::apply`];
/// everything else (commit, revert, reset) is common.
#[derive(Debug, Clone)]
pub struct NeighborhoodState {
    origin: BitVec,
    candidate: BitVec,
    flipped: SparseBitVec,
}

impl NeighborhoodState {
    /// Creates state over all-zero vectors of length `bv_size`.
    pub fn new(bv_size: usize) -> Self {
        Self {
            origin: BitVec::zeros(bv_size),
            candidate: BitVec::zeros(bv_size),
            flipped: SparseBitVec::new(),
        }
    }

    pub fn bv_size(&self) -> usize {
        self.origin.len()
    }

    pub fn origin(&self) -> &BitVec {
        &self.origin
    }

    pub fn candidate(&self) -> &BitVec {
        &self.candidate
    }

    pub fn flipped_bits(&self) -> &SparseBitVec {
        &self.flipped
    }

    pub fn set_origin(&mut self, bv: BitVec) -> Result<()> {
        if bv.len() != self.origin.len() {
            return Err(SearchError::SizeMismatch {
                expected: self.origin.len(),
                found: bv.len(),
            });
        }
        self.candidate = bv.clone();
        self.origin = bv;
        self.flipped.clear();
        Ok(())
    }

    /// Applies a freshly sampled flip set to the candidate. The indices
    /// must be ascending and in range; samplers guarantee both.
    pub fn apply(&mut self, flipped: SparseBitVec) {
        self.forget();
        for i in flipped.iter() {
            self.candidate.flip(i);
        }
        self.flipped = flipped;
    }

    pub fn keep(&mut self) {
        for i in self.flipped.iter() {
            self.origin.flip(i);
        }
        self.flipped.clear();
    }

    pub fn forget(&mut self) {
        for i in self.flipped.iter() {
            self.candidate.flip(i);
        }
        self.flipped.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_cycle() {
        let mut state = NeighborhoodState::new(6);
        state.set_origin(BitVec::zeros(6)).unwrap();

        state.apply(SparseBitVec::from_indices(vec![1, 4]).unwrap());
        assert_eq!(state.origin().hamming_weight(), 0);
        assert_eq!(state.candidate().hamming_weight(), 2);
        assert_eq!(state.flipped_bits().len(), 2);

        state.keep();
        assert_eq!(state.origin(), state.candidate());
        assert!(state.flipped_bits().is_empty());

        state.apply(SparseBitVec::single(0));
        state.forget();
        assert_eq!(state.origin(), state.candidate());
        assert_eq!(state.candidate().hamming_weight(), 2);
    }

    #[test]
    fn test_apply_discards_open_proposal() {
        let mut state = NeighborhoodState::new(4);
        state.apply(SparseBitVec::single(0));
        state.apply(SparseBitVec::single(1));
        // Only the second proposal is live.
        assert_eq!(state.flipped_bits().indices(), &[1]);
        assert!(!state.candidate().get(0));
        assert!(state.candidate().get(1));
    }

    #[test]
    fn test_set_origin_checks_size() {
        let mut state = NeighborhoodState::new(4);
        assert!(state.set_origin(BitVec::zeros(5)).is_err());
        assert!(state.set_origin(BitVec::ones(4)).is_ok());
        assert_eq!(state.candidate().hamming_weight(), 4);
    }
}
