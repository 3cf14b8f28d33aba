//! # pbopt
//!
//! A toolkit for maximizing pseudo-Boolean functions (black-box functions
//! mapping fixed-length bit vectors to `f64`) with composable evaluation
//! control.
//!
//! The crate is built around a small number of orthogonal pieces:
//!
//! - [`function::Function`]: the black-box under optimization, with
//!   optional incremental evaluation and a thread-safe parallel path.
//! - [`controller`]: transparent wrappers adding call counting, caching,
//!   progress tracking, evaluation budgets and target-based stopping to
//!   any function.
//! - [`error::EvalSignal`]: the termination protocol. Controllers raise
//!   signals through the same channel as hard errors, algorithms re-raise
//!   them after snapshotting their best solution, and the
//!   [`algorithm::run`] driver maps them to an [`algorithm::Outcome`].
//! - [`population::Population`]: index-aligned bit vectors and values with
//!   serial and parallel evaluation, sorting and rank queries.
//! - [`neighborhood`]: origin/candidate move proposal with sparse flip
//!   sets, the substrate for incremental evaluation.
//! - [`selection`]: operators picking parents from evaluated populations.
//! - [`algorithm`]: a local search and a simple evolutionary algorithm
//!   driving all of the above.
//!
//! ## Example
//!
//! ```rust
//! use pbopt::algorithm::{run, LocalSearch, Outcome};
//! use pbopt::controller::{OnBudgetFunction, StopOnMaximum};
//! use pbopt::function::OneMax;
//! use pbopt::neighborhood::StandardBitMutation;
//! use pbopt::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let mut f = OnBudgetFunction::new(
//!     StopOnMaximum::new(OneMax::new(16)).unwrap(),
//!     100_000,
//! );
//! let neighborhood = StandardBitMutation::one_over_n(16).unwrap();
//! let mut search = LocalSearch::new(neighborhood, 1_000_000).unwrap();
//!
//! let outcome = run(&mut search, &mut f, &mut rng).unwrap();
//! assert_eq!(outcome, Outcome::TargetReached);
//! let (bv, value) = search.solution().unwrap();
//! assert_eq!(value, 16.0);
//! assert_eq!(bv.hamming_weight(), 16);
//! ```

pub mod algorithm;
pub mod bitvec;
pub mod controller;
pub mod error;
pub mod function;
pub mod neighborhood;
pub mod population;
pub mod rng;
pub mod selection;

pub use bitvec::{BitVec, SparseBitVec};
pub use error::{EvalResult, EvalSignal, Result, SearchError};
pub use function::Function;
pub use population::Population;
