//! # Fitness Functions
//!
//! The [`Function`] trait is the single abstraction algorithms evaluate
//! against. Algorithms hold a function generically and never need to know
//! whether it is a raw benchmark or a stack of controllers
//! (see [`crate::controller`]).
//!
//! ## Evaluation contract
//!
//! - [`Function::evaluate`] is the one required operation. It is *not*
//!   reentrant: a function instance used from multiple threads must be
//!   cloned per thread, never shared. Implementations may keep internal
//!   scratch state.
//! - [`Function::evaluate_incrementally`] exists purely for performance: it
//!   recomputes a value from a previous value plus a small set of flipped
//!   bits, in time proportional to the number of flips rather than the bit
//!   vector size. It must be numerically consistent with full evaluation:
//!   `evaluate_incrementally(x, evaluate(x), s)` equals `evaluate(x ⊕ s)`
//!   whenever [`Function::provides_incremental_evaluation`] is `true`.
//!   The default implementation reports an unsupported-operation hard
//!   error, never a silent fallback.
//! - [`Function::evaluate_safely`] is the variant parallel workers call on
//!   their own clone. It must not raise a termination signal and must not
//!   mutate state shared across clones; its return type has no signal
//!   variants, which the compiler enforces.
//! - [`Function::update`] is called once per candidate *after* a safe
//!   evaluation, on the thread owning the authoritative controller chain,
//!   so that controllers can count, record progress, or raise a termination
//!   signal without having performed the evaluation themselves.

use crate::bitvec::{BitVec, SparseBitVec};
use crate::error::{EvalResult, EvalSignal, Result, SearchError};

mod benchmarks;

pub use benchmarks::{LeadingOnes, LinearFunction, OneMax};

/// A fitness function over fixed-length bit vectors.
pub trait Function {
    /// Returns the bit vector size the function is defined on. Fixed at
    /// construction.
    fn bv_size(&self) -> usize;

    /// Evaluates `bv` and returns its fitness value.
    ///
    /// Controllers layered on top may return a termination signal instead
    /// of a value; callers propagate it with `?`.
    fn evaluate(&mut self, bv: &BitVec) -> EvalResult<f64>;

    /// Recomputes the value of `bv` with `flipped_bits` applied, given the
    /// value of `bv` itself.
    ///
    /// The default implementation reports that incremental evaluation is
    /// unsupported.
    fn evaluate_incrementally(
        &mut self,
        bv: &BitVec,
        last_value: f64,
        flipped_bits: &SparseBitVec,
    ) -> EvalResult<f64> {
        let _ = (bv, last_value, flipped_bits);
        Err(SearchError::IncrementalEvaluationNotSupported.into())
    }

    /// Evaluates `bv` without raising termination signals or touching
    /// shared optimization state.
    ///
    /// The default delegates to [`Function::evaluate`] and maps any signal
    /// to a hard error; raw functions never raise signals, so the mapping
    /// only fires on a misbehaving implementation. Controllers override
    /// this to skip their side effects instead.
    fn evaluate_safely(&mut self, bv: &BitVec) -> Result<f64> {
        match self.evaluate(bv) {
            Ok(value) => Ok(value),
            Err(EvalSignal::Error(e)) => Err(e),
            Err(signal) => Err(SearchError::Other(format!(
                "termination signal raised on the safe evaluation path: {}",
                signal
            ))),
        }
    }

    /// Reacts to a `(bv, value)` pair produced by a safe evaluation.
    ///
    /// Runs single-threaded, in slot order, after a parallel evaluation
    /// pass; this is where controllers apply their deferred side effects.
    /// The default does nothing.
    fn update(&mut self, bv: &BitVec, value: f64) -> EvalResult<()> {
        let _ = (bv, value);
        Ok(())
    }

    /// Returns `true` if the maximum of the function is known.
    fn has_known_maximum(&self) -> bool {
        false
    }

    /// Returns the known maximum.
    ///
    /// # Errors
    ///
    /// Returns an `UnknownMaximum` error if the maximum is not known.
    fn maximum(&self) -> Result<f64> {
        Err(SearchError::UnknownMaximum)
    }

    /// Returns `true` if [`Function::evaluate_incrementally`] is supported.
    fn provides_incremental_evaluation(&self) -> bool {
        false
    }
}
