use std::collections::HashMap;

use crate::bitvec::{BitVec, SparseBitVec};
use crate::error::{EvalResult, Result, SearchError};
use crate::function::Function;

/// A controller that memoizes full evaluations, keyed by the exact bit
/// pattern.
///
/// On a hit the stored value is returned without touching the inner
/// function and the lookup counter is incremented; on a miss the inner
/// function is evaluated, the result stored, and the evaluation counter
/// incremented.
///
/// Incremental evaluation is *not* supported through a cache:
/// [`Function::provides_incremental_evaluation`] is `false` even when the
/// inner function supports it, and calling it is a hard error. A cached
/// value would otherwise bypass the bookkeeping the cache exists for.
///
/// The original design leaves the table unbounded ("no control on the size
/// of the database"). That ambiguity is surfaced here as an optional entry
/// bound: when [`Cache::with_max_entries`] is used and the table is full,
/// the whole table is cleared before the next insert. The default remains
/// unbounded.
#[derive(Debug, Clone)]
pub struct Cache<F: Function> {
    inner: F,
    table: HashMap<BitVec, f64>,
    max_entries: Option<usize>,
    num_evaluations: u64,
    num_lookups: u64,
}

impl<F: Function> Cache<F> {
    /// Wraps `inner` with an empty, unbounded cache.
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            table: HashMap::new(),
            max_entries: None,
            num_evaluations: 0,
            num_lookups: 0,
        }
    }

    /// Wraps `inner` with a cache bounded to `max_entries` entries.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `max_entries` is zero.
    pub fn with_max_entries(inner: F, max_entries: usize) -> Result<Self> {
        if max_entries == 0 {
            return Err(SearchError::Configuration(
                "cache entry bound must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            inner,
            table: HashMap::new(),
            max_entries: Some(max_entries),
            num_evaluations: 0,
            num_lookups: 0,
        })
    }

    /// Returns the number of evaluations forwarded to the inner function
    /// (cache misses).
    pub fn num_evaluations(&self) -> u64 {
        self.num_evaluations
    }

    /// Returns the number of cache hits.
    pub fn num_lookups(&self) -> u64 {
        self.num_lookups
    }

    /// Returns the fraction of calls served from the cache, or 0 if no
    /// call was made.
    pub fn lookup_ratio(&self) -> f64 {
        let total = self.num_evaluations + self.num_lookups;
        if total == 0 {
            0.0
        } else {
            self.num_lookups as f64 / total as f64
        }
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Clears the cache table. Counters are kept.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns a reference to the wrapped function.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Consumes the controller and returns the wrapped function.
    pub fn into_inner(self) -> F {
        self.inner
    }

    fn store(&mut self, bv: &BitVec, value: f64) {
        if let Some(bound) = self.max_entries {
            if self.table.len() >= bound {
                self.table.clear();
            }
        }
        self.table.insert(bv.clone(), value);
    }
}

impl<F: Function> Function for Cache<F> {
    fn bv_size(&self) -> usize {
        self.inner.bv_size()
    }

    fn evaluate(&mut self, bv: &BitVec) -> EvalResult<f64> {
        if let Some(&value) = self.table.get(bv) {
            self.num_lookups += 1;
            return Ok(value);
        }
        let value = self.inner.evaluate(bv)?;
        self.num_evaluations += 1;
        self.store(bv, value);
        Ok(value)
    }

    /// A cache never provides incremental evaluation.
    fn evaluate_incrementally(
        &mut self,
        _bv: &BitVec,
        _last_value: f64,
        _flipped_bits: &SparseBitVec,
    ) -> EvalResult<f64> {
        Err(SearchError::IncrementalEvaluationNotSupported.into())
    }

    fn evaluate_safely(&mut self, bv: &BitVec) -> Result<f64> {
        // A worker clone owns its table, so probing and filling it here is
        // within the safe-evaluation contract.
        if let Some(&value) = self.table.get(bv) {
            self.num_lookups += 1;
            return Ok(value);
        }
        let value = self.inner.evaluate_safely(bv)?;
        self.num_evaluations += 1;
        self.store(bv, value);
        Ok(value)
    }

    fn update(&mut self, bv: &BitVec, value: f64) -> EvalResult<()> {
        self.inner.update(bv, value)
    }

    fn has_known_maximum(&self) -> bool {
        self.inner.has_known_maximum()
    }

    fn maximum(&self) -> Result<f64> {
        self.inner.maximum()
    }

    fn provides_incremental_evaluation(&self) -> bool {
        false
    }
}
