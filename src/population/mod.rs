//! # Population
//!
//! A [`Population`] is a fixed-size collection of candidate bit vectors and
//! their fitness values, kept in index-aligned parallel arrays: `bvs[i]`
//! and `values[i]` always describe the same individual.
//!
//! It is the unit of batched evaluation. Serial evaluation
//! ([`Population::evaluate`]) walks the slots in order against one function
//! instance. Parallel evaluation ([`Population::evaluate_in_parallel`])
//! takes one independent function clone per worker, partitions the slots
//! into contiguous disjoint chunks, runs the signal-free
//! [`evaluate_safely`](crate::function::Function::evaluate_safely) on each
//! worker's own clone, and then replays every result through a strictly
//! sequential [`update`](crate::function::Function::update) pass in slot
//! order. That fan-out/fan-in shape is what makes it legal to use
//! controllers that raise termination signals or mutate counters: those
//! effects happen only in the sequential phase, on the authoritative clone.
//!
//! Sorting ([`Population::sort`], [`Population::partial_sort`]) orders the
//! slots by descending value; the sorted accessors and the tie-class query
//! [`Population::get_equivalent_bvs`] are the substrate selection and
//! replacement operators build on.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::trace;

use crate::bitvec::BitVec;
use crate::error::{EvalResult, Result, SearchError};
use crate::function::Function;
use crate::rng::RandomNumberGenerator;

/// How much of the population is currently ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    /// Bit vectors changed since the last evaluation.
    Unevaluated,
    /// Values are valid, slots unordered.
    Evaluated,
    /// The first `k` slots hold the `k` best in descending order.
    PartiallySorted(usize),
    /// All slots in descending order.
    Sorted,
}

/// Descending order on values; NaN sorts last.
fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or_else(|| {
        if b.is_nan() {
            Ordering::Less
        } else if a.is_nan() {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

/// A fixed-size, index-aligned collection of candidate bit vectors and
/// their fitness values.
#[derive(Debug, Clone)]
pub struct Population {
    bvs: Vec<BitVec>,
    values: Vec<f64>,
    order: Order,
}

impl Population {
    /// Creates a population of `size` all-zero bit vectors of length
    /// `bv_size`. The population is never resized afterwards.
    pub fn new(size: usize, bv_size: usize) -> Self {
        Self {
            bvs: vec![BitVec::zeros(bv_size); size],
            values: vec![0.0; size],
            order: Order::Unevaluated,
        }
    }

    /// Returns the number of individuals.
    pub fn size(&self) -> usize {
        self.bvs.len()
    }

    /// Returns the bit vector length of every individual.
    pub fn bv_size(&self) -> usize {
        self.bvs.first().map_or(0, |bv| bv.len())
    }

    /// Returns the bit vector in slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range, like slice indexing.
    pub fn get_bv(&self, index: usize) -> &BitVec {
        &self.bvs[index]
    }

    /// Replaces the bit vector in slot `index`, invalidating the values.
    ///
    /// # Errors
    ///
    /// Returns a `SizeMismatch` error if `bv` has the wrong length.
    pub fn set_bv(&mut self, index: usize, bv: BitVec) -> Result<()> {
        if bv.len() != self.bv_size() {
            return Err(SearchError::SizeMismatch {
                expected: self.bv_size(),
                found: bv.len(),
            });
        }
        self.bvs[index] = bv;
        self.order = Order::Unevaluated;
        Ok(())
    }

    /// Returns the fitness values, valid after an evaluation pass.
    ///
    /// # Errors
    ///
    /// Returns a `PopulationNotEvaluated` error if the bit vectors changed
    /// since the last evaluation.
    pub fn values(&self) -> Result<&[f64]> {
        if self.order == Order::Unevaluated {
            return Err(SearchError::PopulationNotEvaluated);
        }
        Ok(&self.values)
    }

    /// Fills every slot with an independently sampled random bit vector.
    pub fn random(&mut self, rng: &mut RandomNumberGenerator) {
        for bv in &mut self.bvs {
            bv.randomize(rng);
        }
        self.order = Order::Unevaluated;
    }

    fn check_function<F: Function>(&self, f: &F) -> Result<()> {
        if self.bvs.is_empty() {
            return Err(SearchError::EmptyPopulation);
        }
        if f.bv_size() != self.bv_size() {
            return Err(SearchError::SizeMismatch {
                expected: self.bv_size(),
                found: f.bv_size(),
            });
        }
        Ok(())
    }

    /// Evaluates every slot in index order against one function instance.
    ///
    /// A termination signal raised by a controller aborts the pass and
    /// propagates; the population is left unevaluated.
    pub fn evaluate<F: Function>(&mut self, f: &mut F) -> EvalResult<()> {
        self.check_function(f)?;
        self.order = Order::Unevaluated;
        for (bv, value) in self.bvs.iter().zip(self.values.iter_mut()) {
            *value = f.evaluate(bv)?;
        }
        self.order = Order::Evaluated;
        Ok(())
    }

    /// Evaluates the population across independent function clones, one
    /// per worker.
    ///
    /// The slots are split into contiguous chunks, one per clone; each
    /// worker runs `evaluate_safely` on its own clone over its own
    /// disjoint slice, so no locking is needed. After the fan-in barrier,
    /// every `(bv, value)` pair is replayed through `update` on the
    /// authoritative clone `fns[0]`, strictly in slot order 0..N-1. All
    /// counting, progress tracking and stop checks happen in that
    /// sequential pass, which keeps them deterministic regardless of the
    /// number of workers.
    ///
    /// The final values are identical to what `evaluate` produces for a
    /// deterministic function, whatever the clone count.
    pub fn evaluate_in_parallel<F: Function + Send>(&mut self, fns: &mut [F]) -> EvalResult<()> {
        if fns.is_empty() {
            return Err(SearchError::Configuration(
                "parallel evaluation needs at least one function clone".to_string(),
            )
            .into());
        }
        for f in fns.iter() {
            self.check_function(f)?;
        }
        self.order = Order::Unevaluated;

        let chunk_size = self.bvs.len().div_ceil(fns.len());
        trace!(
            size = self.bvs.len(),
            workers = fns.len(),
            chunk_size,
            "parallel evaluation pass"
        );

        let tasks: Vec<(&[BitVec], &mut [f64], &mut F)> = self
            .bvs
            .chunks(chunk_size)
            .zip(self.values.chunks_mut(chunk_size))
            .zip(fns.iter_mut())
            .map(|((bvs, values), f)| (bvs, values, f))
            .collect();

        tasks
            .into_par_iter()
            .try_for_each(|(bvs, values, f)| -> Result<()> {
                for (bv, value) in bvs.iter().zip(values.iter_mut()) {
                    *value = f.evaluate_safely(bv)?;
                }
                Ok(())
            })?;

        // Sequential update pass on the authoritative clone.
        let authoritative = &mut fns[0];
        for (bv, &value) in self.bvs.iter().zip(self.values.iter()) {
            authoritative.update(bv, value)?;
        }
        self.order = Order::Evaluated;
        Ok(())
    }

    /// Sorts the whole population by descending value, permuting the bit
    /// vectors alongside.
    ///
    /// # Errors
    ///
    /// Returns a `PopulationNotEvaluated` error if no evaluation pass has
    /// run since the bit vectors changed.
    pub fn sort(&mut self) -> Result<()> {
        if self.order == Order::Unevaluated {
            return Err(SearchError::PopulationNotEvaluated);
        }
        let mut perm: Vec<usize> = (0..self.bvs.len()).collect();
        perm.sort_unstable_by(|&a, &b| descending(self.values[a], self.values[b]));
        self.apply_permutation(&perm);
        self.order = Order::Sorted;
        Ok(())
    }

    /// Ensures the `k` best individuals occupy the first `k` slots in
    /// descending order; the order of the remaining slots is unspecified.
    ///
    /// # Errors
    ///
    /// Returns a `PopulationNotEvaluated` error before any evaluation, or
    /// a configuration error if `k` exceeds the population size.
    pub fn partial_sort(&mut self, k: usize) -> Result<()> {
        if self.order == Order::Unevaluated {
            return Err(SearchError::PopulationNotEvaluated);
        }
        if k > self.bvs.len() {
            return Err(SearchError::Configuration(format!(
                "partial sort requested {} best of a population of {}",
                k,
                self.bvs.len()
            )));
        }
        if k == self.bvs.len() {
            return self.sort();
        }
        if k > 0 {
            let mut perm: Vec<usize> = (0..self.bvs.len()).collect();
            perm.select_nth_unstable_by(k - 1, |&a, &b| {
                descending(self.values[a], self.values[b])
            });
            perm[..k].sort_unstable_by(|&a, &b| descending(self.values[a], self.values[b]));
            self.apply_permutation(&perm);
        }
        self.order = Order::PartiallySorted(k);
        Ok(())
    }

    fn apply_permutation(&mut self, perm: &[usize]) {
        let bvs = std::mem::take(&mut self.bvs);
        let values = std::mem::take(&mut self.values);
        self.bvs = perm.iter().map(|&i| bvs[i].clone()).collect();
        self.values = perm.iter().map(|&i| values[i]).collect();
    }

    /// Returns the number of slots guaranteed to be in descending order.
    fn sorted_prefix(&self) -> usize {
        match self.order {
            Order::Sorted => self.bvs.len(),
            Order::PartiallySorted(k) => k,
            _ => 0,
        }
    }

    /// Returns the bit vector of the `i`-th ranked individual; `i = 0` is
    /// the best.
    ///
    /// # Errors
    ///
    /// Returns a `PopulationNotSorted` error if `i` lies outside the
    /// sorted prefix.
    pub fn get_best_bv(&self, i: usize) -> Result<&BitVec> {
        if i >= self.sorted_prefix() {
            return Err(SearchError::PopulationNotSorted);
        }
        Ok(&self.bvs[i])
    }

    /// Returns the value of the `i`-th ranked individual; `i = 0` is the
    /// best.
    ///
    /// # Errors
    ///
    /// Returns a `PopulationNotSorted` error if `i` lies outside the
    /// sorted prefix.
    pub fn get_best_value(&self, i: usize) -> Result<f64> {
        if i >= self.sorted_prefix() {
            return Err(SearchError::PopulationNotSorted);
        }
        Ok(self.values[i])
    }

    /// Returns the tie-class of the `i`-th ranked individual: the maximal
    /// half-open range `[lo, hi)` containing `i` whose values all equal
    /// `values[i]`.
    ///
    /// # Errors
    ///
    /// Returns a `PopulationNotSorted` error unless the population is
    /// fully sorted and `i` is in range.
    pub fn get_equivalent_bvs(&self, i: usize) -> Result<(usize, usize)> {
        if self.order != Order::Sorted || i >= self.bvs.len() {
            return Err(SearchError::PopulationNotSorted);
        }
        let value = self.values[i];
        let mut lo = i;
        while lo > 0 && self.values[lo - 1] == value {
            lo -= 1;
        }
        let mut hi = i + 1;
        while hi < self.values.len() && self.values[hi] == value {
            hi += 1;
        }
        Ok((lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{CallCounter, ProgressTracker, StopOnTarget};
    use crate::error::EvalSignal;
    use crate::function::{LinearFunction, OneMax};

    fn evaluated(size: usize, bv_size: usize, seed: u64) -> Population {
        let mut rng = RandomNumberGenerator::from_seed(seed);
        let mut pop = Population::new(size, bv_size);
        pop.random(&mut rng);
        pop.evaluate(&mut OneMax::new(bv_size)).unwrap();
        pop
    }

    #[test]
    fn test_serial_evaluation_fills_values() {
        let pop = evaluated(10, 8, 1);
        let values = pop.values().unwrap();
        for (i, value) in values.iter().enumerate() {
            assert_eq!(*value, pop.get_bv(i).hamming_weight() as f64);
        }
    }

    #[test]
    fn test_empty_population_is_a_hard_error() {
        let mut pop = Population::new(0, 8);
        assert!(matches!(
            pop.evaluate(&mut OneMax::new(8)),
            Err(EvalSignal::Error(SearchError::EmptyPopulation))
        ));
    }

    #[test]
    fn test_size_mismatch_is_a_hard_error() {
        let mut pop = Population::new(4, 8);
        assert!(matches!(
            pop.evaluate(&mut OneMax::new(9)),
            Err(EvalSignal::Error(SearchError::SizeMismatch { .. }))
        ));
    }

    #[test]
    fn test_accessors_before_sort_are_hard_errors() {
        let mut pop = Population::new(4, 8);
        assert!(matches!(
            pop.values(),
            Err(SearchError::PopulationNotEvaluated)
        ));
        assert!(matches!(pop.sort(), Err(SearchError::PopulationNotEvaluated)));

        let mut rng = RandomNumberGenerator::from_seed(2);
        pop.random(&mut rng);
        pop.evaluate(&mut OneMax::new(8)).unwrap();
        assert!(matches!(
            pop.get_best_bv(0),
            Err(SearchError::PopulationNotSorted)
        ));
        pop.sort().unwrap();
        assert!(pop.get_best_bv(0).is_ok());
    }

    #[test]
    fn test_sort_descends_and_aligns() {
        let mut pop = evaluated(20, 10, 3);
        pop.sort().unwrap();
        let values = pop.values().unwrap().to_vec();
        for window in values.windows(2) {
            assert!(window[0] >= window[1]);
        }
        // Index alignment survives the permutation.
        for i in 0..pop.size() {
            assert_eq!(values[i], pop.get_bv(i).hamming_weight() as f64);
        }
    }

    #[test]
    fn test_partial_sort_top_k() {
        let mut pop = evaluated(30, 12, 4);
        let mut reference = pop.clone();
        reference.sort().unwrap();
        let sorted_values = reference.values().unwrap().to_vec();

        pop.partial_sort(5).unwrap();
        for i in 0..5 {
            assert_eq!(pop.get_best_value(i).unwrap(), sorted_values[i]);
        }
        // Past the sorted prefix the accessor refuses.
        assert!(pop.get_best_value(5).is_err());
        // A partial sort is not enough for tie-class queries.
        assert!(pop.get_equivalent_bvs(0).is_err());
    }

    #[test]
    fn test_partial_sort_bounds() {
        let mut pop = evaluated(10, 8, 5);
        assert!(pop.partial_sort(11).is_err());
        pop.partial_sort(0).unwrap();
        assert!(pop.get_best_value(0).is_err());
        pop.partial_sort(10).unwrap();
        assert!(pop.get_equivalent_bvs(0).is_ok());
    }

    #[test]
    fn test_equivalence_classes() {
        let mut pop = evaluated(40, 6, 6);
        pop.sort().unwrap();
        let values = pop.values().unwrap().to_vec();
        let n = pop.size();

        for i in 0..n {
            let (lo, hi) = pop.get_equivalent_bvs(i).unwrap();
            assert!(lo <= i && i < hi);
            assert_eq!(values[lo], values[i]);
            assert_eq!(values[hi - 1], values[i]);
            assert!(lo == 0 || values[lo - 1] != values[i]);
            assert!(hi == n || values[hi] != values[i]);
        }
    }

    #[test]
    fn test_parallel_matches_serial() {
        let weights: Vec<f64> = (0..16).map(|i| (i as f64) * 0.75 - 3.0).collect();

        for workers in [1usize, 2, 4] {
            let mut rng = RandomNumberGenerator::from_seed(7);
            let mut pop = Population::new(33, 16);
            pop.random(&mut rng);

            let mut serial = pop.clone();
            serial
                .evaluate(&mut LinearFunction::new(weights.clone()))
                .unwrap();

            let mut fns: Vec<LinearFunction> = (0..workers)
                .map(|_| LinearFunction::new(weights.clone()))
                .collect();
            pop.evaluate_in_parallel(&mut fns).unwrap();

            assert_eq!(pop.values().unwrap(), serial.values().unwrap());
        }
    }

    #[test]
    fn test_parallel_requires_a_clone() {
        let mut pop = Population::new(4, 8);
        let mut fns: Vec<OneMax> = Vec::new();
        assert!(pop.evaluate_in_parallel(&mut fns).is_err());
    }

    #[test]
    fn test_parallel_update_pass_is_sequential_and_counted() {
        let mut rng = RandomNumberGenerator::from_seed(11);
        let mut pop = Population::new(12, 8);
        pop.random(&mut rng);

        let mut fns: Vec<CallCounter<OneMax>> =
            (0..3).map(|_| CallCounter::new(OneMax::new(8))).collect();
        pop.evaluate_in_parallel(&mut fns).unwrap();

        // Only the authoritative clone sees the update pass.
        assert_eq!(fns[0].num_calls(), 12);
        assert_eq!(fns[1].num_calls(), 0);
        assert_eq!(fns[2].num_calls(), 0);
    }

    #[test]
    fn test_parallel_stop_signal_raised_in_update_pass() {
        // Force a known best: slot 3 is all ones.
        let mut rng = RandomNumberGenerator::from_seed(13);
        let mut pop = Population::new(6, 5);
        pop.random(&mut rng);
        pop.set_bv(3, BitVec::ones(5)).unwrap();

        // First slot holding the maximum, in index order.
        let first = (0..pop.size())
            .find(|&i| pop.get_bv(i).hamming_weight() == 5)
            .unwrap();

        let make = || StopOnTarget::new(ProgressTracker::new(OneMax::new(5)), 5.0);
        let mut fns = vec![make(), make()];

        match pop.evaluate_in_parallel(&mut fns) {
            Err(EvalSignal::TargetReached { bv, value }) => {
                assert_eq!(bv.hamming_weight(), 5);
                assert_eq!(value, 5.0);
            }
            other => panic!("expected TargetReached, got {:?}", other),
        }
        // The sequential update pass stopped at the first maximal slot:
        // the tracker on the authoritative clone observed slots 0..=first.
        assert_eq!(fns[0].inner().num_calls(), first as u64 + 1);
    }
}
