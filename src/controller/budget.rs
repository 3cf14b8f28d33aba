use crate::bitvec::{BitVec, SparseBitVec};
use crate::error::{EvalResult, EvalSignal, Result};
use crate::function::Function;

/// A controller that enforces a maximum number of evaluations.
///
/// The wrapper is itself a call counter. Once the counter has reached the
/// budget, any further `evaluate`, `evaluate_incrementally` or `update`
/// call raises [`EvalSignal::BudgetExhausted`] *before* forwarding: no
/// extra evaluation is spent discovering that the budget is exceeded, and
/// the counter never moves past the budget.
///
/// The safe evaluation path is not gated; on the parallel path the budget
/// is charged during the sequential `update` pass.
#[derive(Debug, Clone)]
pub struct OnBudgetFunction<F: Function> {
    inner: F,
    budget: u64,
    num_calls: u64,
}

impl<F: Function> OnBudgetFunction<F> {
    /// Wraps `inner` with a budget of `budget` evaluations.
    pub fn new(inner: F, budget: u64) -> Self {
        Self {
            inner,
            budget,
            num_calls: 0,
        }
    }

    /// Returns the budget.
    pub fn budget(&self) -> u64 {
        self.budget
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

    fn charge(&self) -> EvalResult<()> {
        if self.num_calls >= self.budget {
            return Err(EvalSignal::BudgetExhausted);
        }
        Ok(())
    }
}

impl<F: Function> Function for OnBudgetFunction<F> {
    fn bv_size(&self) -> usize {
        self.inner.bv_size()
    }

    fn evaluate(&mut self, bv: &BitVec) -> EvalResult<f64> {
        self.charge()?;
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
        self.charge()?;
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
        self.charge()?;
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
