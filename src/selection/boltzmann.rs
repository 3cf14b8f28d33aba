use crate::error::{Result, SearchError};
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::selection::{spin_wheel, Selection};

/// Boltzmann selection: each individual is weighted by
/// `exp(beta * value)`.
///
/// Unlike fitness-proportionate selection this accepts arbitrary (also
/// negative) values. `beta` controls the selection pressure: `beta = 0`
/// degenerates to uniform selection, large `beta` to near-elitist
/// selection. Weights are computed relative to the maximum value, so large
/// values cannot overflow the exponential.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct BoltzmannSelection {
    beta: f64,
}

impl BoltzmannSelection {
    /// Creates a Boltzmann selection operator with inverse temperature
    /// `beta`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `beta` is negative or not finite.
    pub fn new(beta: f64) -> Result<Self> {
        if !beta.is_finite() || beta < 0.0 {
            return Err(SearchError::Configuration(format!(
                "beta must be finite and non-negative, got {}",
                beta
            )));
        }
        Ok(Self { beta })
    }

    /// Returns the inverse temperature.
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl Selection for BoltzmannSelection {
    fn select(&self, population: &Population, rng: &mut RandomNumberGenerator) -> Result<usize> {
        if population.size() == 0 {
            return Err(SearchError::EmptyPopulation);
        }
        let values = population.values()?;

        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(SearchError::Configuration(
                "Boltzmann selection requires finite values".to_string(),
            ));
        }

        let weights: Vec<f64> = values
            .iter()
            .map(|&v| (self.beta * (v - max)).exp())
            .collect();
        // The maximum contributes weight 1, so the total is >= 1.
        let total: f64 = weights.iter().sum();

        Ok(spin_wheel(&weights, total, rng))
    }
}
