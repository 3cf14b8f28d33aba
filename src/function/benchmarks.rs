//! Minimal benchmark functions.
//!
//! The full benchmark catalogue lives outside this crate; these three cover
//! what tests, benches and examples need: a function with incremental
//! evaluation and a known maximum ([`OneMax`]), a weighted variant
//! ([`LinearFunction`]), and one that deliberately does not support
//! incremental evaluation ([`LeadingOnes`]).

use crate::bitvec::{BitVec, SparseBitVec};
use crate::error::{EvalResult, Result, SearchError};
use crate::function::Function;

fn check_size(expected: usize, bv: &BitVec) -> Result<()> {
    if bv.len() != expected {
        return Err(SearchError::SizeMismatch {
            expected,
            found: bv.len(),
        });
    }
    Ok(())
}

fn check_flips(bv_size: usize, flipped_bits: &SparseBitVec) -> Result<()> {
    // Indices are ascending, so the last one bounds them all.
    if let Some(&last) = flipped_bits.indices().last() {
        if last >= bv_size {
            return Err(SearchError::InvalidSparseIndices(format!(
                "flip index {} out of range for size {}",
                last, bv_size
            )));
        }
    }
    Ok(())
}

/// The Hamming weight of the bit vector. Maximum `n`, reached by the
/// all-ones vector. Supports incremental evaluation.
#[derive(Debug, Clone)]
pub struct OneMax {
    bv_size: usize,
}

impl OneMax {
    /// Creates a OneMax instance on bit vectors of length `bv_size`.
    pub fn new(bv_size: usize) -> Self {
        Self { bv_size }
    }
}

impl Function for OneMax {
    fn bv_size(&self) -> usize {
        self.bv_size
    }

    fn evaluate(&mut self, bv: &BitVec) -> EvalResult<f64> {
        check_size(self.bv_size, bv)?;
        Ok(bv.hamming_weight() as f64)
    }

    fn evaluate_incrementally(
        &mut self,
        bv: &BitVec,
        last_value: f64,
        flipped_bits: &SparseBitVec,
    ) -> EvalResult<f64> {
        check_size(self.bv_size, bv)?;
        check_flips(self.bv_size, flipped_bits)?;
        let mut value = last_value;
        for i in flipped_bits.iter() {
            if bv.get(i) {
                value -= 1.0;
            } else {
                value += 1.0;
            }
        }
        Ok(value)
    }

    fn has_known_maximum(&self) -> bool {
        true
    }

    fn maximum(&self) -> Result<f64> {
        Ok(self.bv_size as f64)
    }

    fn provides_incremental_evaluation(&self) -> bool {
        true
    }
}

/// A linear pseudo-Boolean function: the sum of per-bit weights over the set
/// bits. Maximum = sum of the positive weights. Supports incremental
/// evaluation.
#[derive(Debug, Clone)]
pub struct LinearFunction {
    weights: Vec<f64>,
}

impl LinearFunction {
    /// Creates a linear function from per-bit weights.
    pub fn new(weights: Vec<f64>) -> Self {
        Self { weights }
    }

    /// Returns the per-bit weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl Function for LinearFunction {
    fn bv_size(&self) -> usize {
        self.weights.len()
    }

    fn evaluate(&mut self, bv: &BitVec) -> EvalResult<f64> {
        check_size(self.weights.len(), bv)?;
        let value = bv
            .iter()
            .zip(self.weights.iter())
            .filter(|(bit, _)| *bit)
            .map(|(_, w)| w)
            .sum();
        Ok(value)
    }

    fn evaluate_incrementally(
        &mut self,
        bv: &BitVec,
        last_value: f64,
        flipped_bits: &SparseBitVec,
    ) -> EvalResult<f64> {
        check_size(self.weights.len(), bv)?;
        check_flips(self.weights.len(), flipped_bits)?;
        let mut value = last_value;
        for i in flipped_bits.iter() {
            if bv.get(i) {
                value -= self.weights[i];
            } else {
                value += self.weights[i];
            }
        }
        Ok(value)
    }

    fn has_known_maximum(&self) -> bool {
        true
    }

    fn maximum(&self) -> Result<f64> {
        Ok(self.weights.iter().filter(|w| **w > 0.0).sum())
    }

    fn provides_incremental_evaluation(&self) -> bool {
        true
    }
}

/// The number of leading ones. Maximum `n`. A single flipped bit can change
/// the value by an arbitrary amount, so incremental evaluation is not
/// provided; this function exercises the full-evaluation path.
#[derive(Debug, Clone)]
pub struct LeadingOnes {
    bv_size: usize,
}

impl LeadingOnes {
    /// Creates a LeadingOnes instance on bit vectors of length `bv_size`.
    pub fn new(bv_size: usize) -> Self {
        Self { bv_size }
    }
}

impl Function for LeadingOnes {
    fn bv_size(&self) -> usize {
        self.bv_size
    }

    fn evaluate(&mut self, bv: &BitVec) -> EvalResult<f64> {
        check_size(self.bv_size, bv)?;
        Ok(bv.iter().take_while(|&b| b).count() as f64)
    }

    fn has_known_maximum(&self) -> bool {
        true
    }

    fn maximum(&self) -> Result<f64> {
        Ok(self.bv_size as f64)
    }
}
