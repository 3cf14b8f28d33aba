use pbopt::{
    bitvec::BitVec,
    controller::{Cache, CallCounter, OnBudgetFunction, ProgressTracker, StopOnTarget},
    error::{EvalSignal, SearchError},
    function::{Function, OneMax},
};

fn all_bit_vectors(n: usize) -> Vec<BitVec> {
    (0..1usize << n)
        .map(|pattern| BitVec::from_bits((0..n).map(|i| pattern >> i & 1 == 1).collect()))
        .collect()
}

#[test]
fn test_cache_halves_evaluations_on_repeat() {
    // Every 4-bit vector twice: the second sweep is answered entirely
    // from the cache.
    let mut f = Cache::new(CallCounter::new(OneMax::new(4)));
    for bv in all_bit_vectors(4).iter().chain(all_bit_vectors(4).iter()) {
        let value = f.evaluate(bv).unwrap();
        assert_eq!(value, bv.hamming_weight() as f64);
    }
    assert_eq!(f.num_evaluations(), 16);
    assert_eq!(f.num_lookups(), 16);
    assert_eq!(f.lookup_ratio(), 0.5);
    assert_eq!(f.inner().num_calls(), 16);
}

#[test]
fn test_budget_raises_on_excess_call() {
    let mut f = OnBudgetFunction::new(CallCounter::new(OneMax::new(8)), 5);
    let bv = BitVec::ones(8);
    for _ in 0..5 {
        f.evaluate(&bv).unwrap();
    }
    assert!(matches!(f.evaluate(&bv), Err(EvalSignal::BudgetExhausted)));
    // The rejected call never reached the inner function.
    assert_eq!(f.inner().num_calls(), 5);
    // The budget gate stays shut.
    assert!(matches!(f.evaluate(&bv), Err(EvalSignal::BudgetExhausted)));
}

#[test]
fn test_stopped_call_is_not_charged() {
    // Budget outside stop: a call cut short by the stop signal is not a
    // completed call and does not consume budget.
    let mut f = OnBudgetFunction::new(StopOnTarget::new(OneMax::new(4), 4.0), 1);
    let result = f.evaluate(&BitVec::ones(4));
    assert!(matches!(
        result,
        Err(EvalSignal::TargetReached { value, .. }) if value == 4.0
    ));
    assert_eq!(f.num_calls(), 0);
    // Retrying raises the stop signal again, not the budget.
    assert!(matches!(
        f.evaluate(&BitVec::ones(4)),
        Err(EvalSignal::TargetReached { .. })
    ));
}

#[test]
fn test_progress_tracker_records_improvements_only() {
    let mut f = ProgressTracker::new(OneMax::new(8)).record_bit_vector();
    assert!(f.last_improvement().is_none());

    let mut bv = BitVec::zeros(8);
    bv.set(0, true);
    f.evaluate(&bv).unwrap();
    bv.set(1, true);
    f.evaluate(&bv).unwrap();
    // A worse value does not replace the record.
    f.evaluate(&BitVec::zeros(8)).unwrap();

    let improvement = f.last_improvement().unwrap();
    assert_eq!(improvement.value, 2.0);
    assert_eq!(improvement.num_evaluations, 2);
    assert_eq!(improvement.bv.as_ref().unwrap().hamming_weight(), 2);
    assert_eq!(f.num_calls(), 3);
}

#[test]
fn test_cache_refuses_incremental_evaluation() {
    use pbopt::bitvec::SparseBitVec;

    let mut f = Cache::new(OneMax::new(8));
    assert!(!f.provides_incremental_evaluation());
    let result = f.evaluate_incrementally(&BitVec::zeros(8), 0.0, &SparseBitVec::single(0));
    assert!(matches!(
        result,
        Err(EvalSignal::Error(
            SearchError::IncrementalEvaluationNotSupported
        ))
    ));
}

#[test]
fn test_full_stack_composition() {
    // The standard order: budget, stop, progress, cache, raw.
    let mut f = OnBudgetFunction::new(
        StopOnTarget::new(ProgressTracker::new(Cache::new(OneMax::new(4))), 4.0),
        100,
    );
    f.evaluate(&BitVec::zeros(4)).unwrap();
    f.evaluate(&BitVec::zeros(4)).unwrap();
    let result = f.evaluate(&BitVec::ones(4));
    assert!(matches!(result, Err(EvalSignal::TargetReached { .. })));

    let tracker = f.inner().inner();
    assert_eq!(tracker.num_calls(), 3);
    assert_eq!(tracker.last_improvement().unwrap().value, 4.0);
    // The repeated all-zeros vector hit the cache.
    assert_eq!(tracker.inner().num_evaluations(), 2);
    assert_eq!(tracker.inner().num_lookups(), 1);
}
