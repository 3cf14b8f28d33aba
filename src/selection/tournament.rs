use crate::error::{Result, SearchError};
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::selection::Selection;

/// Selects the best of `tournament_size` uniformly drawn individuals.
///
/// Smaller tournaments select more randomly; larger ones focus harder on
/// the best individuals. A tournament of size 1 is uniform selection.
/// Participants are drawn with replacement.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
}

impl TournamentSelection {
    /// Creates a tournament of the given size.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `tournament_size` is 0.
    pub fn new(tournament_size: usize) -> Result<Self> {
        if tournament_size < 1 {
            return Err(SearchError::Configuration(
                "tournament size must be at least 1".to_string(),
            ));
        }
        Ok(Self { tournament_size })
    }

    /// Returns the tournament size.
    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        // The default values are valid.
        Self::new(2).unwrap()
    }
}

impl Selection for TournamentSelection {
    fn select(&self, population: &Population, rng: &mut RandomNumberGenerator) -> Result<usize> {
        if population.size() == 0 {
            return Err(SearchError::EmptyPopulation);
        }
        let values = population.values()?;

        let mut best = rng.index(values.len());
        for _ in 1..self.tournament_size {
            let challenger = rng.index(values.len());
            if values[challenger] > values[best] {
                best = challenger;
            }
        }
        Ok(best)
    }
}
