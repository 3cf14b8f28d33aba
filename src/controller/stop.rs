use tracing::debug;

use crate::bitvec::{BitVec, SparseBitVec};
use crate::error::{EvalResult, EvalSignal, Result};
use crate::function::Function;

/// A controller that raises [`EvalSignal::TargetReached`] whenever an
/// observed value reaches a configured target.
///
/// The check happens after the inner value is known and before it is
/// returned, on `evaluate`, `evaluate_incrementally` and `update`. The
/// signal carries the reaching bit vector and its value, so the driver can
/// recover the solution without re-evaluating. For incremental evaluation
/// the carried vector is the candidate (origin with the flips applied),
/// not the origin the caller passed.
///
/// The safe evaluation path never raises; on the parallel path the check
/// runs during the sequential `update` pass, which, together with its
/// strict slot order, gives deterministic "first reaching candidate,
/// lowest index" semantics.
#[derive(Debug, Clone)]
pub struct StopOnTarget<F: Function> {
    inner: F,
    target: f64,
}

impl<F: Function> StopOnTarget<F> {
    /// Wraps `inner`, stopping when a value `>= target` is observed.
    pub fn new(inner: F, target: f64) -> Self {
        Self { inner, target }
    }

    /// Returns the target value.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Returns a reference to the wrapped function.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Consumes the controller and returns the wrapped function.
    pub fn into_inner(self) -> F {
        self.inner
    }

    fn check(&self, bv: &BitVec, value: f64) -> EvalResult<()> {
        if value >= self.target {
            debug!(value, target = self.target, "target reached");
            return Err(EvalSignal::TargetReached {
                bv: bv.clone(),
                value,
            });
        }
        Ok(())
    }
}

impl<F: Function> Function for StopOnTarget<F> {
    fn bv_size(&self) -> usize {
        self.inner.bv_size()
    }

    fn evaluate(&mut self, bv: &BitVec) -> EvalResult<f64> {
        let value = self.inner.evaluate(bv)?;
        self.check(bv, value)?;
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
        if value >= self.target {
            // The value belongs to the candidate, not the origin.
            let mut candidate = bv.clone();
            flipped_bits.apply(&mut candidate)?;
            self.check(&candidate, value)?;
        }
        Ok(value)
    }

    fn evaluate_safely(&mut self, bv: &BitVec) -> Result<f64> {
        self.inner.evaluate_safely(bv)
    }

    fn update(&mut self, bv: &BitVec, value: f64) -> EvalResult<()> {
        self.inner.update(bv, value)?;
        self.check(bv, value)?;
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

/// A controller that stops when the known maximum of the inner function is
/// reached.
///
/// Behaves exactly like [`StopOnTarget`] with the target set to
/// [`Function::maximum`]; constructing one requires the inner function to
/// declare a known maximum.
#[derive(Debug, Clone)]
pub struct StopOnMaximum<F: Function> {
    inner: StopOnTarget<F>,
}

impl<F: Function> StopOnMaximum<F> {
    /// Wraps `inner`, stopping when its known maximum is observed.
    ///
    /// # Errors
    ///
    /// Returns an `UnknownMaximum` error if the inner function does not
    /// declare a known maximum.
    pub fn new(inner: F) -> Result<Self> {
        let target = inner.maximum()?;
        Ok(Self {
            inner: StopOnTarget::new(inner, target),
        })
    }

    /// Returns a reference to the wrapped function.
    pub fn inner(&self) -> &F {
        self.inner.inner()
    }

    /// Consumes the controller and returns the wrapped function.
    pub fn into_inner(self) -> F {
        self.inner.into_inner()
    }
}

impl<F: Function> Function for StopOnMaximum<F> {
    fn bv_size(&self) -> usize {
        self.inner.bv_size()
    }

    fn evaluate(&mut self, bv: &BitVec) -> EvalResult<f64> {
        self.inner.evaluate(bv)
    }

    fn evaluate_incrementally(
        &mut self,
        bv: &BitVec,
        last_value: f64,
        flipped_bits: &SparseBitVec,
    ) -> EvalResult<f64> {
        self.inner
            .evaluate_incrementally(bv, last_value, flipped_bits)
    }

    fn evaluate_safely(&mut self, bv: &BitVec) -> Result<f64> {
        self.inner.evaluate_safely(bv)
    }

    fn update(&mut self, bv: &BitVec, value: f64) -> EvalResult<()> {
        self.inner.update(bv, value)
    }

    fn has_known_maximum(&self) -> bool {
        true
    }

    fn maximum(&self) -> Result<f64> {
        self.inner.maximum()
    }

    fn provides_incremental_evaluation(&self) -> bool {
        self.inner.provides_incremental_evaluation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{LeadingOnes, OneMax};

    struct NoMaximum;

    impl Function for NoMaximum {
        fn bv_size(&self) -> usize {
            4
        }

        fn evaluate(&mut self, _bv: &BitVec) -> EvalResult<f64> {
            Ok(0.0)
        }
    }

    #[test]
    fn test_raises_with_payload_on_target() {
        let mut f = StopOnTarget::new(OneMax::new(4), 3.0);
        assert_eq!(f.evaluate(&BitVec::zeros(4)).unwrap(), 0.0);

        let reached = BitVec::ones(4);
        match f.evaluate(&reached) {
            Err(EvalSignal::TargetReached { bv, value }) => {
                assert_eq!(bv, reached);
                assert_eq!(value, 4.0);
            }
            other => panic!("expected TargetReached, got {:?}", other),
        }
    }

    #[test]
    fn test_below_target_passes_through() {
        let mut f = StopOnTarget::new(OneMax::new(4), 5.0);
        assert_eq!(f.evaluate(&BitVec::ones(4)).unwrap(), 4.0);
    }

    #[test]
    fn test_incremental_signal_carries_candidate() {
        let mut f = StopOnTarget::new(OneMax::new(3), 3.0);
        let origin = BitVec::from_bits(vec![true, true, false]);
        let value = f.evaluate(&origin).unwrap();
        let flips = SparseBitVec::single(2);

        match f.evaluate_incrementally(&origin, value, &flips) {
            Err(EvalSignal::TargetReached { bv, value }) => {
                assert_eq!(bv, BitVec::ones(3));
                assert_eq!(value, 3.0);
            }
            other => panic!("expected TargetReached, got {:?}", other),
        }
    }

    #[test]
    fn test_update_raises() {
        let mut f = StopOnTarget::new(OneMax::new(4), 4.0);
        assert!(f.update(&BitVec::zeros(4), 0.0).is_ok());
        assert!(matches!(
            f.update(&BitVec::ones(4), 4.0),
            Err(EvalSignal::TargetReached { .. })
        ));
    }

    #[test]
    fn test_safe_path_never_raises() {
        let mut f = StopOnTarget::new(OneMax::new(4), 0.0);
        // Value reaches the target, yet no signal on the safe path.
        assert_eq!(f.evaluate_safely(&BitVec::ones(4)).unwrap(), 4.0);
    }

    #[test]
    fn test_stop_on_maximum_requires_known_maximum() {
        assert!(StopOnMaximum::new(NoMaximum).is_err());
        let f = StopOnMaximum::new(LeadingOnes::new(5)).unwrap();
        assert_eq!(f.maximum().unwrap(), 5.0);
    }

    #[test]
    fn test_stop_on_maximum_raises_at_maximum() {
        let mut f = StopOnMaximum::new(OneMax::new(4)).unwrap();
        assert_eq!(f.evaluate(&BitVec::zeros(4)).unwrap(), 0.0);
        assert!(matches!(
            f.evaluate(&BitVec::ones(4)),
            Err(EvalSignal::TargetReached { value, .. }) if value == 4.0
        ));
    }
}
