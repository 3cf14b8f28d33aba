use crate::bitvec::{BitVec, SparseBitVec};
use crate::error::{Result, SearchError};
use crate::neighborhood::{Neighborhood, NeighborhoodState};
use crate::rng::RandomNumberGenerator;

/// The Hamming-distance-1 neighborhood: each proposal flips exactly one
/// bit, chosen uniformly.
#[derive(Debug, Clone)]
pub struct SingleBitFlip {
    state: NeighborhoodState,
}

impl SingleBitFlip {
    /// Creates a single-bit-flip neighborhood on vectors of length
    /// `bv_size`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `bv_size` is zero.
    pub fn new(bv_size: usize) -> Result<Self> {
        if bv_size == 0 {
            return Err(SearchError::Configuration(
                "neighborhood bit vector size must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            state: NeighborhoodState::new(bv_size),
        })
    }
}

impl Neighborhood for SingleBitFlip {
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
        let index = rng.index(self.state.bv_size());
        self.state.apply(SparseBitVec::single(index));
    }

    fn keep(&mut self) {
        self.state.keep();
    }

    fn forget(&mut self) {
        self.state.forget();
    }
}
