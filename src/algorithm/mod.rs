//! # Algorithms
//!
//! The driver protocol and a minimal set of search algorithms exercising
//! the core. An [`Algorithm`] maximizes a
//! [`Function`](crate::function::Function) it holds generically: it never
//! needs to know whether the function is raw or wrapped in controllers.
//!
//! ## Termination contract
//!
//! An algorithm's `maximize` returns `Ok(())` when it exhausts its own
//! iteration budget, or propagates the termination signal a controller
//! raised. Algorithms intercept signals *only* to snapshot their best-known
//! solution into their own state, then re-raise; the outermost driver
//! ([`run`]) is the single place where signals map to a reported
//! [`Outcome`]. Hard errors abort.
//!
//! ## Example
//!
//! ```rust
//! use pbopt::algorithm::{run, Algorithm, LocalSearch, Outcome};
//! use pbopt::controller::StopOnMaximum;
//! use pbopt::function::OneMax;
//! use pbopt::neighborhood::SingleBitFlip;
//! use pbopt::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(42);
//! let mut f = StopOnMaximum::new(OneMax::new(8)).unwrap();
//! let mut search = LocalSearch::new(SingleBitFlip::new(8).unwrap(), 10_000).unwrap();
//!
//! let outcome = run(&mut search, &mut f, &mut rng).unwrap();
//! assert_eq!(outcome, Outcome::TargetReached);
//! let (bv, value) = search.solution().unwrap();
//! assert_eq!(value, 8.0);
//! assert_eq!(bv.hamming_weight(), 8);
//! ```

use crate::bitvec::BitVec;
use crate::error::{EvalResult, EvalSignal, Result, SearchError};
use crate::function::Function;
use crate::rng::RandomNumberGenerator;

mod local_search;
mod simple_ea;

pub use local_search::LocalSearch;
pub use simple_ea::SimpleEa;

/// A search algorithm maximizing a fitness function.
pub trait Algorithm<F: Function> {
    /// Runs the search until the iteration budget is exhausted or a
    /// termination signal propagates.
    ///
    /// On a signal the algorithm snapshots its best-known solution and
    /// re-raises; it never swallows the signal.
    fn maximize(&mut self, f: &mut F, rng: &mut RandomNumberGenerator) -> EvalResult<()>;

    /// Returns the best solution found so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm has not evaluated anything yet.
    fn solution(&self) -> Result<(&BitVec, f64)>;
}

/// The reported outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The algorithm exhausted its own iteration budget.
    Completed,
    /// A stop-on-target or stop-on-maximum controller fired.
    TargetReached,
    /// The evaluation budget ran out.
    BudgetExhausted,
}

/// Drives an algorithm to completion and maps termination signals to
/// outcomes.
///
/// This is the outermost catcher of the signaling protocol: both signals
/// are successful terminations here, and only hard errors remain errors.
/// The best solution is available from the algorithm afterwards in every
/// non-error case.
pub fn run<F, A>(
    algorithm: &mut A,
    f: &mut F,
    rng: &mut RandomNumberGenerator,
) -> Result<Outcome>
where
    F: Function,
    A: Algorithm<F>,
{
    match algorithm.maximize(f, rng) {
        Ok(()) => Ok(Outcome::Completed),
        Err(EvalSignal::TargetReached { .. }) => Ok(Outcome::TargetReached),
        Err(EvalSignal::BudgetExhausted) => Ok(Outcome::BudgetExhausted),
        Err(EvalSignal::Error(e)) => Err(e),
    }
}

/// Replaces `solution` if `value` improves on it (or if it is empty).
fn improve_solution(solution: &mut Option<(BitVec, f64)>, bv: &BitVec, value: f64) {
    let improved = solution.as_ref().map_or(true, |(_, best)| value > *best);
    if improved {
        *solution = Some((bv.clone(), value));
    }
}

/// Unpacks the stored solution of an algorithm.
fn solution_ref(solution: &Option<(BitVec, f64)>) -> Result<(&BitVec, f64)> {
    solution
        .as_ref()
        .map(|(bv, value)| (bv, *value))
        .ok_or_else(|| SearchError::Other("no solution: the algorithm has not run".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::OnBudgetFunction;
    use crate::function::OneMax;
    use crate::neighborhood::SingleBitFlip;

    #[test]
    fn test_run_maps_budget_to_outcome() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mut f = OnBudgetFunction::new(OneMax::new(8), 20);
        let mut search = LocalSearch::new(SingleBitFlip::new(8).unwrap(), 10_000).unwrap();

        let outcome = run(&mut search, &mut f, &mut rng).unwrap();
        assert_eq!(outcome, Outcome::BudgetExhausted);
        // The best-known solution survives the signal.
        assert!(search.solution().is_ok());
    }

    #[test]
    fn test_run_completes_without_controllers() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        let mut f = OneMax::new(8);
        let mut search = LocalSearch::new(SingleBitFlip::new(8).unwrap(), 100).unwrap();

        let outcome = run(&mut search, &mut f, &mut rng).unwrap();
        assert_eq!(outcome, Outcome::Completed);
    }

    #[test]
    fn test_solution_before_running_is_an_error() {
        let search = LocalSearch::new(SingleBitFlip::new(8).unwrap(), 100).unwrap();
        assert!(Algorithm::<OneMax>::solution(&search).is_err());
    }
}
