use tracing::debug;

use crate::algorithm::{improve_solution, solution_ref, Algorithm};
use crate::bitvec::BitVec;
use crate::error::{EvalResult, EvalSignal, Result, SearchError};
use crate::function::Function;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::selection::Selection;

/// A generational evolutionary algorithm with elitism.
///
/// Each generation evaluates the population, carries the best individual
/// over unchanged, and fills the remaining slots with mutated copies of
/// parents picked by the selection operator. The mutation rate defaults to
/// `1/n` and can be overridden with [`SimpleEa::with_mutation_probability`].
///
/// The population can be evaluated serially against one function or in
/// parallel against a slice of clones, see
/// [`SimpleEa::maximize_in_parallel`].
#[derive(Debug, Clone)]
pub struct SimpleEa<S: Selection> {
    selection: S,
    population_size: usize,
    num_generations: usize,
    mutation_probability: Option<f64>,
    solution: Option<(BitVec, f64)>,
}

impl<S: Selection> SimpleEa<S> {
    /// Creates an evolutionary algorithm with the given population size and
    /// generation budget.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `population_size` is less than 2
    /// or `num_generations` is 0.
    pub fn new(selection: S, population_size: usize, num_generations: usize) -> Result<Self> {
        if population_size < 2 {
            return Err(SearchError::Configuration(
                "population size must be at least 2".to_string(),
            ));
        }
        if num_generations == 0 {
            return Err(SearchError::Configuration(
                "number of generations must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            selection,
            population_size,
            num_generations,
            mutation_probability: None,
            solution: None,
        })
    }

    /// Overrides the default `1/n` per-bit mutation probability.
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless `0 < probability <= 1`.
    pub fn with_mutation_probability(mut self, probability: f64) -> Result<Self> {
        if !(probability > 0.0 && probability <= 1.0) {
            return Err(SearchError::Configuration(format!(
                "mutation probability must be in (0, 1], got {probability}"
            )));
        }
        self.mutation_probability = Some(probability);
        Ok(self)
    }

    /// Returns the best solution found so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm has not evaluated anything yet.
    pub fn solution(&self) -> Result<(&BitVec, f64)> {
        solution_ref(&self.solution)
    }

    /// Evaluates the population in parallel against `fns`, a slice of
    /// clones of the same function. Everything except evaluation is
    /// unchanged from [`Algorithm::maximize`].
    ///
    /// # Errors
    ///
    /// Returns an error if `fns` is empty, and propagates signals and
    /// errors like the serial path.
    pub fn maximize_in_parallel<F: Function + Send>(
        &mut self,
        fns: &mut [F],
        rng: &mut RandomNumberGenerator,
    ) -> EvalResult<()> {
        let bv_size = match fns.first() {
            Some(f) => f.bv_size(),
            None => {
                return Err(SearchError::Configuration(
                    "parallel evaluation needs at least one function".to_string(),
                )
                .into())
            }
        };
        let result = self.evolve(bv_size, rng, |population| {
            population.evaluate_in_parallel(fns)
        });
        self.finish(result)
    }

    fn evolve(
        &mut self,
        bv_size: usize,
        rng: &mut RandomNumberGenerator,
        mut eval: impl FnMut(&mut Population) -> EvalResult<()>,
    ) -> EvalResult<()> {
        let p = self
            .mutation_probability
            .unwrap_or(1.0 / bv_size as f64);
        let mut population = Population::new(self.population_size, bv_size);
        population.random(rng);

        for generation in 0..self.num_generations {
            eval(&mut population)?;
            population.partial_sort(1)?;
            let best_bv = population.get_best_bv(0)?.clone();
            let best_value = population.get_best_value(0)?;
            improve_solution(&mut self.solution, &best_bv, best_value);
            debug!(generation, best_value, "generation evaluated");

            // Elitist slot 0, selection-driven mutants elsewhere.
            let mut children = Vec::with_capacity(self.population_size);
            children.push(best_bv);
            for _ in 1..self.population_size {
                let parent = self.selection.select(&population, rng)?;
                let mut child = population.get_bv(parent).clone();
                for i in 0..bv_size {
                    if rng.bernoulli(p) {
                        child.flip(i);
                    }
                }
                children.push(child);
            }
            for (i, child) in children.into_iter().enumerate() {
                population.set_bv(i, child)?;
            }
        }
        Ok(())
    }

    fn finish(&mut self, result: EvalResult<()>) -> EvalResult<()> {
        match result {
            // Snapshot the reaching solution, then re-raise.
            Err(EvalSignal::TargetReached { bv, value }) => {
                self.solution = Some((bv.clone(), value));
                Err(EvalSignal::TargetReached { bv, value })
            }
            other => other,
        }
    }
}

impl<S: Selection, F: Function> Algorithm<F> for SimpleEa<S> {
    fn maximize(&mut self, f: &mut F, rng: &mut RandomNumberGenerator) -> EvalResult<()> {
        let result = self.evolve(f.bv_size(), rng, |population| population.evaluate(f));
        self.finish(result)
    }

    fn solution(&self) -> Result<(&BitVec, f64)> {
        solution_ref(&self.solution)
    }
}
