use crate::bitvec::{BitVec, SparseBitVec};
use crate::error::{EvalResult, Result};
use crate::function::Function;

/// A controller that counts completed evaluation calls.
///
/// `evaluate`, `evaluate_incrementally` and `update` each increment the
/// counter, but only after the inner call returns a value: a call that
/// raises a signal or fails is not counted as completed. The safe
/// evaluation path is never counted; on the parallel path the count is
/// taken during the sequential `update` pass instead.
#[derive(Debug, Clone)]
pub struct CallCounter<F: Function> {
    inner: F,
    num_calls: u64,
}

impl<F: Function> CallCounter<F> {
    /// Wraps `inner` with a fresh counter.
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            num_calls: 0,
        }
    }

    /// Returns the number of completed calls.
    pub fn num_calls(&self) -> u64 {
        self.num_calls
    }

    /// Returns a reference to the wrapped function.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Consumes the controller and returns the wrapped function.
    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F: Function> Function for CallCounter<F> {
    fn bv_size(&self) -> usize {
        self.inner.bv_size()
    }

    fn evaluate(&mut self, bv: &BitVec) -> EvalResult<f64> {
        let value = self.inner.evaluate(bv)?;
        self.num_calls += 1;
        Ok(value)
    }

    fn evaluate_incrementally(
        &mut self,
        bv: &BitVec,
        last_value: f64,
        flipped_bits: &SparseBitVec,
    ) -> EvalResult<f64> {
        let value = self
            .inner
            .evaluate_incrementally(bv, last_value, flipped_bits)?;
        self.num_calls += 1;
        Ok(value)
    }

    fn evaluate_safely(&mut self, bv: &BitVec) -> Result<f64> {
        self.inner.evaluate_safely(bv)
    }

    fn update(&mut self, bv: &BitVec, value: f64) -> EvalResult<()> {
        self.inner.update(bv, value)?;
        self.num_calls += 1;
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
