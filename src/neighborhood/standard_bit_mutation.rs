use crate::bitvec::{BitVec, SparseBitVec};
use crate::error::{Result, SearchError};
use crate::neighborhood::{Neighborhood, NeighborhoodState};
use crate::rng::RandomNumberGenerator;

/// Standard bit mutation: each bit is flipped independently with
/// probability `p`.
///
/// With `p = 1/n` this is the classic (1+1)-EA mutation. An empty flip set
/// proposes the origin itself; when the neighborhood is configured to
/// guarantee movement, sampling is repeated until at least one bit flips.
#[derive(Debug, Clone)]
pub struct StandardBitMutation {
    state: NeighborhoodState,
    p: f64,
    allow_no_mutation: bool,
}

impl StandardBitMutation {
    /// Creates a standard-bit-mutation neighborhood with per-bit flip
    /// probability `p`.
    ///
    /// By default an all-stay sample is resampled so that every proposal
    /// moves; see [`StandardBitMutation::allow_no_mutation`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `bv_size` is zero or `p` is not in
    /// `(0, 1]`.
    pub fn new(bv_size: usize, p: f64) -> Result<Self> {
        if bv_size == 0 {
            return Err(SearchError::Configuration(
                "neighborhood bit vector size must be greater than 0".to_string(),
            ));
        }
        if !(p > 0.0 && p <= 1.0) {
            return Err(SearchError::Configuration(format!(
                "mutation probability must be in (0, 1], got {}",
                p
            )));
        }
        Ok(Self {
            state: NeighborhoodState::new(bv_size),
            p,
            allow_no_mutation: false,
        })
    }

    /// Creates the classic `1/n` mutation for vectors of length `bv_size`.
    pub fn one_over_n(bv_size: usize) -> Result<Self> {
        let p = 1.0 / bv_size.max(1) as f64;
        Self::new(bv_size, p)
    }

    /// Accept proposals that flip no bit instead of resampling.
    pub fn allow_no_mutation(mut self) -> Self {
        self.allow_no_mutation = true;
        self
    }

    /// Returns the per-bit flip probability.
    pub fn probability(&self) -> f64 {
        self.p
    }

    fn sample(&self, rng: &mut RandomNumberGenerator) -> SparseBitVec {
        loop {
            // The scan visits indices in ascending order.
            let indices: Vec<usize> = (0..self.state.bv_size())
                .filter(|_| rng.bernoulli(self.p))
                .collect();
            if !indices.is_empty() || self.allow_no_mutation {
                return SparseBitVec::from_ascending(indices);
            }
        }
    }
}

impl Neighborhood for StandardBitMutation {
    fn bv_size(&self) -> usize {
        self.state.bv_size()
    }

    fn origin(&self) -> &BitVec {
        self.state.origin()
    }

    fn candidate(&self) -> &BitVec {
        self.state.candidate()
    }

    fn flipped_bits(&self) -> &SparseBitVec {
        self.state.flipped_bits()
    }

    fn set_origin(&mut self, bv: BitVec) -> Result<()> {
        self.state.set_origin(bv)
    }

    fn propose(&mut self, rng: &mut RandomNumberGenerator) {
        let flipped = self.sample(rng);
        self.state.apply(flipped);
    }

    fn keep(&mut self) {
        self.state.keep();
    }

    fn forget(&mut self) {
        self.state.forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(StandardBitMutation::new(0, 0.5).is_err());
        assert!(StandardBitMutation::new(8, 0.0).is_err());
        assert!(StandardBitMutation::new(8, 1.5).is_err());
        assert!(StandardBitMutation::new(8, f64::NAN).is_err());
    }

    #[test]
    fn test_moves_by_default() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let mut nh = StandardBitMutation::new(10, 0.05).unwrap();
        nh.set_origin(BitVec::zeros(10)).unwrap();

        for _ in 0..50 {
            nh.propose(&mut rng);
            assert!(!nh.flipped_bits().is_empty());
            let distance = nh.origin().hamming_distance(nh.candidate()).unwrap();
            assert_eq!(distance, nh.flipped_bits().len());
            nh.forget();
        }
    }

    #[test]
    fn test_p_one_flips_everything() {
        let mut rng = RandomNumberGenerator::from_seed(4);
        let mut nh = StandardBitMutation::new(6, 1.0).unwrap();
        nh.set_origin(BitVec::zeros(6)).unwrap();
        nh.propose(&mut rng);
        assert_eq!(nh.candidate().hamming_weight(), 6);
    }

    #[test]
    fn test_sampled_indices_are_strictly_ascending() {
        let mut rng = RandomNumberGenerator::from_seed(9);
        let mut nh = StandardBitMutation::new(32, 0.2).unwrap();
        nh.set_origin(BitVec::zeros(32)).unwrap();

        for _ in 0..50 {
            nh.propose(&mut rng);
            let indices = nh.flipped_bits().indices();
            assert!(indices.windows(2).all(|w| w[0] < w[1]));
            nh.forget();
        }
    }

    #[test]
    fn test_one_over_n() {
        let nh = StandardBitMutation::one_over_n(20).unwrap();
        assert_eq!(nh.probability(), 0.05);
    }
}
