//! # Bit Vectors
//!
//! This module provides the universal representation of a candidate
//! solution, [`BitVec`] (a fixed-length sequence of 0/1 values, mutable in
//! place), and [`SparseBitVec`], the "list of flipped indices" delta passed
//! to incremental evaluation.
//!
//! A `SparseBitVec` maintains the invariant that its indices are strictly
//! ascending; applying it to a `BitVec` flips the listed bits, which makes
//! `apply` its own inverse.
//!
//! ## Example
//!
//! ```rust
//! use pbopt::bitvec::{BitVec, SparseBitVec};
//!
//! let mut bv = BitVec::zeros(8);
//! let flips = SparseBitVec::from_indices(vec![1, 3, 5]).unwrap();
//! flips.apply(&mut bv).unwrap();
//! assert_eq!(bv.hamming_weight(), 3);
//! flips.apply(&mut bv).unwrap();
//! assert_eq!(bv.hamming_weight(), 0);
//! ```

use std::fmt;

use crate::error::{Result, SearchError};
use crate::rng::RandomNumberGenerator;

/// A fixed-length vector of 0/1 values.
///
/// The length is fixed at construction; bits are mutable in place. `BitVec`
/// implements `Eq` and `Hash` over the exact bit pattern, so it can serve as
/// a cache key.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitVec {
    bits: Vec<bool>,
}

impl BitVec {
    /// Creates a bit vector of `n` zeros.
    pub fn zeros(n: usize) -> Self {
        Self {
            bits: vec![false; n],
        }
    }

    /// Creates a bit vector of `n` ones.
    pub fn ones(n: usize) -> Self {
        Self {
            bits: vec![true; n],
        }
    }

    /// Creates a bit vector from explicit bit values.
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Creates a uniformly random bit vector of length `n`.
    pub fn random(n: usize, rng: &mut RandomNumberGenerator) -> Self {
        let mut bv = Self::zeros(n);
        bv.randomize(rng);
        bv
    }

    /// Resamples every bit uniformly at random, in place.
    pub fn randomize(&mut self, rng: &mut RandomNumberGenerator) {
        for bit in &mut self.bits {
            *bit = rng.random_bit();
        }
    }

    /// Returns the number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns `true` if the vector has no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range, like slice indexing.
    pub fn get(&self, index: usize) -> bool {
        self.bits[index]
    }

    /// Sets the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range, like slice indexing.
    pub fn set(&mut self, index: usize, value: bool) {
        self.bits[index] = value;
    }

    /// Flips the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range, like slice indexing.
    pub fn flip(&mut self, index: usize) {
        self.bits[index] = !self.bits[index];
    }

    /// Returns the Hamming weight (number of ones).
    pub fn hamming_weight(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Returns the Hamming distance to another bit vector of the same length.
    ///
    /// # Errors
    ///
    /// Returns a `SizeMismatch` error if the lengths differ.
    pub fn hamming_distance(&self, other: &BitVec) -> Result<usize> {
        if self.len() != other.len() {
            return Err(SearchError::SizeMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        Ok(self
            .bits
            .iter()
            .zip(other.bits.iter())
            .filter(|(a, b)| a != b)
            .count())
    }

    /// Iterates over the bits in index order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }
}

impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// An ascending list of bit indices considered flipped relative to some
/// reference vector.
///
/// Invariant: indices are strictly ascending. Bounds against a concrete
/// vector are checked when the delta is applied.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SparseBitVec {
    indices: Vec<usize>,
}

impl SparseBitVec {
    /// Creates an empty flip set.
    pub fn new() -> Self {
        Self {
            indices: Vec::new(),
        }
    }

    /// Creates a flip set containing a single index.
    pub fn single(index: usize) -> Self {
        Self {
            indices: vec![index],
        }
    }

    /// Creates a flip set from strictly ascending indices.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidSparseIndices` error if the indices are not
    /// strictly ascending.
    pub fn from_indices(indices: Vec<usize>) -> Result<Self> {
        for window in indices.windows(2) {
            if window[0] >= window[1] {
                return Err(SearchError::InvalidSparseIndices(format!(
                    "indices must be strictly ascending, found {} before {}",
                    window[0], window[1]
                )));
            }
        }
        Ok(Self { indices })
    }

    /// Creates a flip set from indices the caller guarantees to be strictly
    /// ascending, skipping validation. Samplers that produce indices in
    /// order use this to stay infallible.
    pub(crate) fn from_ascending(indices: Vec<usize>) -> Self {
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        Self { indices }
    }

    /// Creates a flip set from indices in any order, sorting them.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidSparseIndices` error if the indices contain a
    /// duplicate.
    pub fn from_unsorted(mut indices: Vec<usize>) -> Result<Self> {
        indices.sort_unstable();
        Self::from_indices(indices)
    }

    /// Appends an index, which must be greater than the current last index.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidSparseIndices` error if `index` does not extend
    /// the ascending order.
    pub fn push(&mut self, index: usize) -> Result<()> {
        if let Some(&last) = self.indices.last() {
            if index <= last {
                return Err(SearchError::InvalidSparseIndices(format!(
                    "index {} does not extend ascending order past {}",
                    index, last
                )));
            }
        }
        self.indices.push(index);
        Ok(())
    }

    /// Removes all indices.
    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Returns the indices as a slice.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the number of flipped bits.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no bits are flipped.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Flips the listed bits of `bv`. Applying the same flip set twice
    /// restores the original vector.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidSparseIndices` error if an index is out of range
    /// for `bv`. Since the indices are ascending, only the last one is
    /// checked; no bit is flipped on failure.
    pub fn apply(&self, bv: &mut BitVec) -> Result<()> {
        if let Some(&last) = self.indices.last() {
            if last >= bv.len() {
                return Err(SearchError::InvalidSparseIndices(format!(
                    "index {} out of range for bit vector of length {}",
                    last,
                    bv.len()
                )));
            }
        }
        for &i in &self.indices {
            bv.flip(i);
        }
        Ok(())
    }

    /// Iterates over the flipped indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}
