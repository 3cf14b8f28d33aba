use std::time::{Duration, Instant};

use tracing::debug;

use crate::bitvec::{BitVec, SparseBitVec};
use crate::error::{EvalResult, Result};
use crate::function::Function;

/// A record of the last strict improvement observed by a
/// [`ProgressTracker`].
#[derive(Debug, Clone, PartialEq)]
pub struct LastImprovement {
    /// Number of completed evaluations when the improvement was observed.
    pub num_evaluations: u64,
    /// The improved value.
    pub value: f64,
    /// The improving bit vector, when recording is enabled.
    pub bv: Option<BitVec>,
}

/// A controller that records the best value seen so far.
///
/// The tracker is itself a call counter: every completed `evaluate`,
/// `evaluate_incrementally` and `update` call increments its counter and
/// is compared against the current best. The record is replaced only on
/// strict improvement; the first observed value always counts as one.
/// Wall-clock time spent in the two evaluation operations is accumulated
/// as well.
///
/// By default only the improving value and evaluation index are kept;
/// enable [`ProgressTracker::record_bit_vector`] to also keep a copy of
/// the improving bit vector.
#[derive(Debug, Clone)]
pub struct ProgressTracker<F: Function> {
    inner: F,
    num_calls: u64,
    record_bv: bool,
    last_improvement: Option<LastImprovement>,
    evaluation_time: Duration,
}

impl<F: Function> ProgressTracker<F> {
    /// Wraps `inner` with an empty progress record.
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            num_calls: 0,
            record_bv: false,
            last_improvement: None,
            evaluation_time: Duration::ZERO,
        }
    }

    /// Also keep a copy of the improving bit vector in the record.
    pub fn record_bit_vector(mut self) -> Self {
        self.record_bv = true;
        self
    }

    /// Returns the number of completed calls.
    pub fn num_calls(&self) -> u64 {
        self.num_calls
    }

    /// Returns the last-improvement record, if any value was observed.
    pub fn last_improvement(&self) -> Option<&LastImprovement> {
        self.last_improvement.as_ref()
    }

    /// Returns the wall-clock time spent in `evaluate` and
    /// `evaluate_incrementally`.
    pub fn evaluation_time(&self) -> Duration {
        self.evaluation_time
    }

    /// Returns a reference to the wrapped function.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Consumes the controller and returns the wrapped function.
    pub fn into_inner(self) -> F {
        self.inner
    }

    fn observe(&mut self, bv: &BitVec, value: f64) {
        let improved = match &self.last_improvement {
            None => true,
            Some(record) => value > record.value,
        };
        if improved {
            debug!(
                num_evaluations = self.num_calls,
                value, "new best value observed"
            );
            self.last_improvement = Some(LastImprovement {
                num_evaluations: self.num_calls,
                value,
                bv: self.record_bv.then(|| bv.clone()),
            });
        }
    }
}

impl<F: Function> Function for ProgressTracker<F> {
    fn bv_size(&self) -> usize {
        self.inner.bv_size()
    }

    fn evaluate(&mut self, bv: &BitVec) -> EvalResult<f64> {
        let start = Instant::now();
        let value = self.inner.evaluate(bv)?;
        self.evaluation_time += start.elapsed();
        self.num_calls += 1;
        self.observe(bv, value);
        Ok(value)
    }

    fn evaluate_incrementally(
        &mut self,
        bv: &BitVec,
        last_value: f64,
        flipped_bits: &SparseBitVec,
    ) -> EvalResult<f64> {
        let start = Instant::now();
        let value = self
            .inner
            .evaluate_incrementally(bv, last_value, flipped_bits)?;
        self.evaluation_time += start.elapsed();
        self.num_calls += 1;
        // The observed point is the origin with the flips applied.
        if self.record_bv {
            let mut candidate = bv.clone();
            flipped_bits.apply(&mut candidate)?;
            self.observe(&candidate, value);
        } else {
            self.observe(bv, value);
        }
        Ok(value)
    }

    fn evaluate_safely(&mut self, bv: &BitVec) -> Result<f64> {
        self.inner.evaluate_safely(bv)
    }

    fn update(&mut self, bv: &BitVec, value: f64) -> EvalResult<()> {
        self.inner.update(bv, value)?;
        self.num_calls += 1;
        self.observe(bv, value);
        Ok(())
    }

    fn has_known_maximum(&self) -> bool {
        self.inner.has_known_maximum()
    }

    fn maximum(&self) -> Result<f64> {
        self.inner.maximum()
    }

    fn provides_incremental_evaluation(&self) -> bool {
        self.inner.provides_incremental_evaluation()
    }
}
