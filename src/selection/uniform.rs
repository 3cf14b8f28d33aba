use crate::error::{Result, SearchError};
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::selection::Selection;

/// Uniform selection: every individual is equally likely, fitness is
/// ignored.
///
/// Still requires an evaluated population, so that swapping operators
/// never changes when evaluation preconditions fire.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct UniformSelection;

impl UniformSelection {
    /// Creates a uniform selection operator.
    pub fn new() -> Self {
        Self
    }
}

impl Selection for UniformSelection {
    fn select(&self, population: &Population, rng: &mut RandomNumberGenerator) -> Result<usize> {
        if population.size() == 0 {
            return Err(SearchError::EmptyPopulation);
        }
        population.values()?;
        Ok(rng.index(population.size()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::OneMax;

    #[test]
    fn test_index_in_range() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mut pop = Population::new(10, 4);
        pop.random(&mut rng);
        pop.evaluate(&mut OneMax::new(4)).unwrap();

        let selection = UniformSelection::new();
        for _ in 0..50 {
            assert!(selection.select(&pop, &mut rng).unwrap() < 10);
        }
    }

    #[test]
    fn test_requires_evaluation() {
        let pop = Population::new(10, 4);
        let mut rng = RandomNumberGenerator::from_seed(2);
        assert!(UniformSelection::new().select(&pop, &mut rng).is_err());
    }
}
