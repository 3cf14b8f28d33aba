//! # Selection Operators
//!
//! Selection operators consume an evaluated [`Population`] and pick one
//! individual, returning its slot index. Different operators trade
//! exploration against exploitation: tournament selection interpolates
//! between the two with its tournament size, fitness-proportionate and
//! Boltzmann selection weight individuals by value, and uniform selection
//! ignores fitness entirely.

use crate::error::Result;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;

mod boltzmann;
mod proportionate;
mod tournament;
mod uniform;

pub use boltzmann::BoltzmannSelection;
pub use proportionate::FitnessProportionateSelection;
pub use tournament::TournamentSelection;
pub use uniform::UniformSelection;

/// A strategy for picking one individual from an evaluated population.
pub trait Selection {
    /// Picks an individual and returns its slot index.
    ///
    /// # Errors
    ///
    /// Returns an error if the population is empty or has not been
    /// evaluated, or if the operator's own preconditions on the fitness
    /// values are violated.
    fn select(&self, population: &Population, rng: &mut RandomNumberGenerator) -> Result<usize>;
}

/// Spins a cumulative-weight wheel: returns the first index whose running
/// total exceeds a uniform draw over the total weight.
///
/// Weights must be non-negative with a positive total; callers validate.
pub(crate) fn spin_wheel(weights: &[f64], total: f64, rng: &mut RandomNumberGenerator) -> usize {
    let spin = rng.uniform() * total;
    let mut acc = 0.0;
    for (i, w) in weights.iter().enumerate() {
        acc += w;
        if spin < acc {
            return i;
        }
    }
    // Rounding can push the spin past the last accumulator.
    weights.len() - 1
}
