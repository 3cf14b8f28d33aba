//! # Controllers
//!
//! Controllers are wrappers that implement [`Function`](crate::function::Function)
//! by forwarding to an inner function while adding exactly one concern each:
//!
//! - [`CallCounter`]: counts completed evaluation calls;
//! - [`Cache`]: memoizes full evaluations by exact bit pattern;
//! - [`ProgressTracker`]: records the best value seen so far;
//! - [`OnBudgetFunction`]: enforces an evaluation budget;
//! - [`StopOnTarget`] / [`StopOnMaximum`]: raise a
//!   [`TargetReached`](crate::error::EvalSignal::TargetReached) signal.
//!
//! Controllers compose linearly, and the order matters. Wrapping a cache
//! *outside* a progress tracker makes cache hits invisible to progress
//! bookkeeping; wrapping it inside means every hit still updates the
//! record. The crate's standard order, outermost to innermost, is:
//! budget (if any), stop-on-target/maximum (if requested), progress
//! tracker, cache (if requested), raw function.
//!
//! None of these wrappers changes the numeric meaning of a value; they only
//! observe or gate it. On the safe evaluation path
//! ([`evaluate_safely`](crate::function::Function::evaluate_safely)) every
//! controller forwards without side effects that would be unsafe in a
//! worker clone; counting, progress and stop checks happen when the
//! authoritative chain replays results through
//! [`update`](crate::function::Function::update).
//!
//! ## Example
//!
//! ```rust
//! use pbopt::bitvec::BitVec;
//! use pbopt::controller::{Cache, ProgressTracker, StopOnTarget};
//! use pbopt::function::{Function, OneMax};
//!
//! let stack = StopOnTarget::new(ProgressTracker::new(Cache::new(OneMax::new(8))), 8.0);
//! let mut f = stack;
//! let value = f.evaluate(&BitVec::zeros(8)).unwrap();
//! assert_eq!(value, 0.0);
//! ```

mod budget;
mod cache;
mod call_counter;
mod progress;
mod stop;

pub use budget::OnBudgetFunction;
pub use cache::Cache;
pub use call_counter::CallCounter;
pub use progress::{LastImprovement, ProgressTracker};
pub use stop::{StopOnMaximum, StopOnTarget};
