use crate::error::{Result, SearchError};
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::selection::{spin_wheel, Selection};

/// Fitness-proportionate (roulette-wheel) selection: each individual is
/// picked with probability proportional to its fitness value.
///
/// Requires every value to be non-negative and the total to be positive;
/// negative values make proportional probabilities meaningless and an
/// all-zero population gives the wheel nothing to spin on.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct FitnessProportionateSelection;

impl FitnessProportionateSelection {
    /// Creates a fitness-proportionate selection operator.
    pub fn new() -> Self {
        Self
    }
}

impl Selection for FitnessProportionateSelection {
    fn select(&self, population: &Population, rng: &mut RandomNumberGenerator) -> Result<usize> {
        if population.size() == 0 {
            return Err(SearchError::EmptyPopulation);
        }
        let values = population.values()?;

        let mut total = 0.0;
        for &value in values {
            if value < 0.0 {
                return Err(SearchError::Configuration(
                    "fitness-proportionate selection requires non-negative values".to_string(),
                ));
            }
            total += value;
        }
        if total <= 0.0 || !total.is_finite() {
            return Err(SearchError::Configuration(format!(
                "fitness-proportionate selection needs a positive finite total, got {}",
                total
            )));
        }

        Ok(spin_wheel(values, total, rng))
    }
}
