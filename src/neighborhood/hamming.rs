use crate::bitvec::{BitVec, SparseBitVec};
use crate::error::{Result, SearchError};
use crate::neighborhood::{Neighborhood, NeighborhoodState};
use crate::rng::RandomNumberGenerator;

fn check_radius(bv_size: usize, radius: usize) -> Result<()> {
    if bv_size == 0 {
        return Err(SearchError::Configuration(
            "neighborhood bit vector size must be greater than 0".to_string(),
        ));
    }
    if radius == 0 || radius > bv_size {
        return Err(SearchError::Configuration(format!(
            "radius must be in 1..={}, got {}",
            bv_size, radius
        )));
    }
    Ok(())
}

/// Draws `k` distinct indices from `0..n` by a partial Fisher-Yates pass
/// over a persistent index pool.
fn sample_distinct(
    pool: &mut [usize],
    k: usize,
    rng: &mut RandomNumberGenerator,
) -> SparseBitVec {
    let n = pool.len();
    for j in 0..k {
        let swap = j + rng.index(n - j);
        pool.swap(j, swap);
    }
    let mut indices = pool[..k].to_vec();
    // Distinct by construction, so sorting makes them strictly ascending.
    indices.sort_unstable();
    SparseBitVec::from_ascending(indices)
}

/// The Hamming sphere of radius `k`: each proposal flips exactly `k`
/// distinct bits, chosen uniformly.
#[derive(Debug, Clone)]
pub struct HammingSphere {
    state: NeighborhoodState,
    radius: usize,
    pool: Vec<usize>,
}

impl HammingSphere {
    /// Creates a Hamming-sphere neighborhood of radius `radius`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `bv_size` is zero or `radius` is
    /// not in `1..=bv_size`.
    pub fn new(bv_size: usize, radius: usize) -> Result<Self> {
        check_radius(bv_size, radius)?;
        Ok(Self {
            state: NeighborhoodState::new(bv_size),
            radius,
            pool: (0..bv_size).collect(),
        })
    }

    /// Returns the radius.
    pub fn radius(&self) -> usize {
        self.radius
    }
}

impl Neighborhood for HammingSphere {
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
        let flipped = sample_distinct(&mut self.pool, self.radius, rng);
        self.state.apply(flipped);
    }

    fn keep(&mut self) {
        self.state.keep();
    }

    fn forget(&mut self) {
        self.state.forget();
    }
}

/// The punctured Hamming ball of radius `k`: each proposal draws a radius
/// uniformly from `1..=k`, then flips that many distinct bits.
#[derive(Debug, Clone)]
pub struct HammingBall {
    state: NeighborhoodState,
    max_radius: usize,
    pool: Vec<usize>,
}

impl HammingBall {
    /// Creates a Hamming-ball neighborhood of maximum radius `max_radius`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `bv_size` is zero or `max_radius`
    /// is not in `1..=bv_size`.
    pub fn new(bv_size: usize, max_radius: usize) -> Result<Self> {
        check_radius(bv_size, max_radius)?;
        Ok(Self {
            state: NeighborhoodState::new(bv_size),
            max_radius,
            pool: (0..bv_size).collect(),
        })
    }

    /// Returns the maximum radius.
    pub fn max_radius(&self) -> usize {
        self.max_radius
    }
}

impl Neighborhood for HammingBall {
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
        let radius = 1 + rng.index(self.max_radius);
        let flipped = sample_distinct(&mut self.pool, radius, rng);
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
    fn test_sphere_flips_exactly_radius_bits() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let mut nh = HammingSphere::new(20, 3).unwrap();
        nh.set_origin(BitVec::random(20, &mut rng)).unwrap();

        for _ in 0..50 {
            nh.propose(&mut rng);
            assert_eq!(nh.flipped_bits().len(), 3);
            assert_eq!(
                nh.origin().hamming_distance(nh.candidate()).unwrap(),
                3
            );
            nh.forget();
        }
    }

    #[test]
    fn test_ball_stays_within_radius() {
        let mut rng = RandomNumberGenerator::from_seed(6);
        let mut nh = HammingBall::new(20, 4).unwrap();
        nh.set_origin(BitVec::zeros(20)).unwrap();

        for _ in 0..50 {
            nh.propose(&mut rng);
            let distance = nh.flipped_bits().len();
            assert!((1..=4).contains(&distance));
            nh.forget();
        }
    }

    #[test]
    fn test_sampled_indices_are_strictly_ascending() {
        let mut rng = RandomNumberGenerator::from_seed(8);
        let mut nh = HammingSphere::new(24, 6).unwrap();
        nh.set_origin(BitVec::zeros(24)).unwrap();

        for _ in 0..50 {
            nh.propose(&mut rng);
            let indices = nh.flipped_bits().indices();
            assert_eq!(indices.len(), 6);
            assert!(indices.windows(2).all(|w| w[0] < w[1]));
            nh.forget();
        }
    }

    #[test]
    fn test_radius_validation() {
        assert!(HammingSphere::new(8, 0).is_err());
        assert!(HammingSphere::new(8, 9).is_err());
        assert!(HammingSphere::new(0, 1).is_err());
        assert!(HammingBall::new(8, 8).is_ok());
    }

    #[test]
    fn test_full_radius_sphere_flips_everything() {
        let mut rng = RandomNumberGenerator::from_seed(7);
        let mut nh = HammingSphere::new(5, 5).unwrap();
        nh.set_origin(BitVec::zeros(5)).unwrap();
        nh.propose(&mut rng);
        assert_eq!(nh.candidate().hamming_weight(), 5);
    }
}
