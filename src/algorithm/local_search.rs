use tracing::trace;

use crate::algorithm::{improve_solution, solution_ref, Algorithm};
use crate::bitvec::BitVec;
use crate::error::{EvalResult, EvalSignal, Result, SearchError};
use crate::function::Function;
use crate::neighborhood::Neighborhood;
use crate::rng::RandomNumberGenerator;

/// Random local search over a pluggable neighborhood.
///
/// Each iteration proposes one neighbor, evaluates it (incrementally when
/// the function provides it, fully otherwise) and keeps the move when the
/// candidate is at least as good as the current point (or strictly better,
/// with [`LocalSearch::strict_improvement`]). With a
/// [`SingleBitFlip`](crate::neighborhood::SingleBitFlip) neighborhood this
/// is classic random local search; with
/// [`StandardBitMutation`](crate::neighborhood::StandardBitMutation) it is
/// a (1+1) evolutionary algorithm.
#[derive(Debug, Clone)]
pub struct LocalSearch<N: Neighborhood> {
    neighborhood: N,
    num_iterations: usize,
    strict: bool,
    start: Option<BitVec>,
    solution: Option<(BitVec, f64)>,
}

impl<N: Neighborhood> LocalSearch<N> {
    /// Creates a local search running `num_iterations` proposal steps.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `num_iterations` is 0.
    pub fn new(neighborhood: N, num_iterations: usize) -> Result<Self> {
        if num_iterations == 0 {
            return Err(SearchError::Configuration(
                "number of iterations must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            neighborhood,
            num_iterations,
            strict: false,
            start: None,
            solution: None,
        })
    }

    /// Accept only strictly improving moves. By default equal-valued moves
    /// are kept, which lets the search drift across plateaus.
    pub fn strict_improvement(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Starts the search from `bv` instead of a random point.
    pub fn with_start(mut self, bv: BitVec) -> Self {
        self.start = Some(bv);
        self
    }

    /// Returns the best solution found so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the search has not evaluated anything yet.
    pub fn solution(&self) -> Result<(&BitVec, f64)> {
        solution_ref(&self.solution)
    }

    fn search<F: Function>(
        &mut self,
        f: &mut F,
        rng: &mut RandomNumberGenerator,
    ) -> EvalResult<()> {
        let bv_size = f.bv_size();
        let start = match &self.start {
            Some(bv) => bv.clone(),
            None => BitVec::random(bv_size, rng),
        };
        self.neighborhood.set_origin(start)?;

        let mut value = f.evaluate(self.neighborhood.origin())?;
        improve_solution(&mut self.solution, self.neighborhood.origin(), value);
        let incremental = f.provides_incremental_evaluation();

        for iteration in 0..self.num_iterations {
            self.neighborhood.propose(rng);
            let candidate_value = if incremental {
                f.evaluate_incrementally(
                    self.neighborhood.origin(),
                    value,
                    self.neighborhood.flipped_bits(),
                )?
            } else {
                f.evaluate(self.neighborhood.candidate())?
            };

            let accept = if self.strict {
                candidate_value > value
            } else {
                candidate_value >= value
            };
            if accept {
                if candidate_value > value {
                    trace!(iteration, value = candidate_value, "improving move kept");
                }
                self.neighborhood.keep();
                value = candidate_value;
                improve_solution(&mut self.solution, self.neighborhood.origin(), value);
            } else {
                self.neighborhood.forget();
            }
        }
        Ok(())
    }
}

impl<N: Neighborhood, F: Function> Algorithm<F> for LocalSearch<N> {
    fn maximize(&mut self, f: &mut F, rng: &mut RandomNumberGenerator) -> EvalResult<()> {
        if f.bv_size() != self.neighborhood.bv_size() {
            return Err(SearchError::SizeMismatch {
                expected: self.neighborhood.bv_size(),
                found: f.bv_size(),
            }
            .into());
        }
        match self.search(f, rng) {
            // Snapshot the reaching solution, then re-raise.
            Err(EvalSignal::TargetReached { bv, value }) => {
                self.solution = Some((bv.clone(), value));
                Err(EvalSignal::TargetReached { bv, value })
            }
            other => other,
        }
    }

    fn solution(&self) -> Result<(&BitVec, f64)> {
        solution_ref(&self.solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{LeadingOnes, OneMax};
    use crate::neighborhood::{SingleBitFlip, StandardBitMutation};

    #[test]
    fn test_climbs_onemax() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mut f = OneMax::new(16);
        let mut search = LocalSearch::new(SingleBitFlip::new(16).unwrap(), 5_000)
            .unwrap()
            .with_start(BitVec::zeros(16));

        search.maximize(&mut f, &mut rng).unwrap();
        let (bv, value) = search.solution().unwrap();
        assert_eq!(value, 16.0);
        assert_eq!(bv.hamming_weight(), 16);
    }

    #[test]
    fn test_full_evaluation_fallback() {
        // LeadingOnes provides no incremental evaluation.
        let mut rng = RandomNumberGenerator::from_seed(2);
        let mut f = LeadingOnes::new(8);
        let mut search = LocalSearch::new(SingleBitFlip::new(8).unwrap(), 5_000)
            .unwrap()
            .with_start(BitVec::zeros(8));

        search.maximize(&mut f, &mut rng).unwrap();
        let (_, value) = search.solution().unwrap();
        assert_eq!(value, 8.0);
    }

    #[test]
    fn test_one_plus_one_ea() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let mut f = OneMax::new(12);
        let neighborhood = StandardBitMutation::one_over_n(12).unwrap();
        let mut search = LocalSearch::new(neighborhood, 10_000).unwrap();

        search.maximize(&mut f, &mut rng).unwrap();
        let (_, value) = search.solution().unwrap();
        assert_eq!(value, 12.0);
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let mut rng = RandomNumberGenerator::from_seed(4);
        let mut f = OneMax::new(10);
        let mut search = LocalSearch::new(SingleBitFlip::new(8).unwrap(), 100).unwrap();
        assert!(matches!(
            search.maximize(&mut f, &mut rng),
            Err(EvalSignal::Error(SearchError::SizeMismatch { .. }))
        ));
    }

    #[test]
    fn test_rejects_zero_iterations() {
        assert!(LocalSearch::new(SingleBitFlip::new(8).unwrap(), 0).is_err());
    }
}
