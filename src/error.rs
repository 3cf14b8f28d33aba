//! # Error Types and Termination Signals
//!
//! This module defines the two-level outcome model used throughout the crate:
//!
//! - [`SearchError`] covers *hard errors*: precondition violations,
//!   unsupported operations, malformed configuration. These are always fatal
//!   and never silently recovered by an algorithm.
//! - [`EvalSignal`] is the outcome type of the evaluate family of operations.
//!   Besides wrapping hard errors it carries the two *control-flow signals*,
//!   [`EvalSignal::TargetReached`] and [`EvalSignal::BudgetExhausted`], which
//!   are successful early-termination outcomes raised by controllers and
//!   propagated by early return (`?`) through every enclosing layer.
//!
//! Algorithms must not swallow a control-flow signal: they may intercept it
//! to snapshot their own best-known solution, but must then re-raise it so
//! the outermost driver observes it. The driver is the only legitimate final
//! catcher, where each signal maps to a reported outcome.
//!
//! ## Examples
//!
//! Propagating signals with the `?` operator:
//!
//! ```rust
//! use pbopt::bitvec::BitVec;
//! use pbopt::error::EvalResult;
//! use pbopt::function::Function;
//!
//! fn probe<F: Function>(f: &mut F, bv: &BitVec) -> EvalResult<f64> {
//!     // A target-reached or budget-exhausted signal raised by a controller
//!     // unwinds through this call untouched.
//!     let value = f.evaluate(bv)?;
//!     Ok(value)
//! }
//! ```

use thiserror::Error;

use crate::bitvec::BitVec;

/// Represents hard errors in the optimization toolkit.
///
/// Every variant is a fatal condition: a violated precondition, an
/// unsupported operation, or an invalid configuration. Hard errors abort the
/// run; they are never part of the normal early-termination protocol.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Incremental evaluation was requested on a function that does not
    /// provide it.
    #[error("incremental evaluation is not supported by this function")]
    IncrementalEvaluationNotSupported,

    /// The maximum of the function was requested but is not known.
    #[error("the maximum of this function is not known")]
    UnknownMaximum,

    /// A bit vector had a different size than the consumer expected.
    #[error("bit vector size mismatch: expected {expected}, found {found}")]
    SizeMismatch { expected: usize, found: usize },

    /// An operation was attempted on an empty population.
    #[error("cannot operate on an empty population")]
    EmptyPopulation,

    /// A value accessor was called on a population that has not been
    /// evaluated since its bit vectors last changed.
    #[error("population has not been evaluated")]
    PopulationNotEvaluated,

    /// A sorted-population accessor was called before `sort`/`partial_sort`,
    /// or past the sorted prefix.
    #[error("population is not sorted at the requested index")]
    PopulationNotSorted,

    /// A sparse bit vector violated the strictly-ascending-indices invariant
    /// or referenced an index out of range.
    #[error("invalid sparse bit vector: {0}")]
    InvalidSparseIndices(String),

    /// An invalid configuration was provided.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Random number generation failed.
    #[error("random generation error: {0}")]
    RandomGeneration(String),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized `Result` type for operations that can only fail with a
/// hard error.
///
/// This is the return type of the *safe* evaluation path
/// ([`Function::evaluate_safely`](crate::function::Function::evaluate_safely)):
/// the absence of signal variants in the error type is what guarantees, at
/// the type level, that parallel workers cannot trigger early-stop logic.
pub type Result<T> = std::result::Result<T, SearchError>;

/// The outcome of an evaluate-family call: a value, a control-flow signal,
/// or a hard error.
///
/// The two signal variants are *not* errors. [`EvalSignal::TargetReached`]
/// carries the bit vector and value that met the target, so the driver can
/// recover a usable result without re-evaluating. [`EvalSignal::BudgetExhausted`]
/// carries no payload; the best solution found so far lives in the
/// algorithm's own state.
#[derive(Error, Debug)]
pub enum EvalSignal {
    /// A configured target (or the known maximum) was reached.
    ///
    /// A successful outcome, not an error.
    #[error("target reached with value {value}")]
    TargetReached {
        /// The bit vector that reached the target.
        bv: BitVec,
        /// Its fitness value.
        value: f64,
    },

    /// The evaluation budget is exhausted; the refused call was not
    /// performed and not counted.
    #[error("evaluation budget exhausted")]
    BudgetExhausted,

    /// A hard error.
    #[error(transparent)]
    Error(#[from] SearchError),
}

impl EvalSignal {
    /// Returns `true` for the control-flow variants, `false` for hard errors.
    pub fn is_stop(&self) -> bool {
        !matches!(self, EvalSignal::Error(_))
    }
}

/// A specialized `Result` type for the evaluate family of operations.
pub type EvalResult<T> = std::result::Result<T, EvalSignal>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_error_converts_into_signal() {
        let signal: EvalSignal = SearchError::UnknownMaximum.into();
        assert!(!signal.is_stop());
        assert!(matches!(
            signal,
            EvalSignal::Error(SearchError::UnknownMaximum)
        ));
    }

    #[test]
    fn test_stop_signals_are_not_errors() {
        assert!(EvalSignal::BudgetExhausted.is_stop());
        let reached = EvalSignal::TargetReached {
            bv: BitVec::ones(4),
            value: 4.0,
        };
        assert!(reached.is_stop());
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::SizeMismatch {
            expected: 8,
            found: 4,
        };
        assert_eq!(
            err.to_string(),
            "bit vector size mismatch: expected 8, found 4"
        );
        assert_eq!(
            EvalSignal::BudgetExhausted.to_string(),
            "evaluation budget exhausted"
        );
    }
}
