use querytime::model::lang::{eq, gt, lt};
use querytime::{
    enumerate_and_time, EnumerateError, Enumerator, IVar, SavedAssignment, Solver, INT_CST_MAX,
    INT_CST_MIN,
};
use std::time::Duration;

type Model = querytime::Model<String>;

/// One variable, `0 < i < 10`, `i == 4`: satisfiable exactly once, a single
/// blocking constraint, then unsatisfiable.
fn single_variable() -> (Model, Vec<IVar>) {
    let mut model = Model::new();
    let i = model.new_ivar(INT_CST_MIN, INT_CST_MAX, "i2302");
    model.enforce(gt(i, 0));
    model.enforce(lt(i, 10));
    model.enforce(eq(i, 4));
    (model, vec![i])
}

/// Four variables, `0 < i < 20` each, product equal to `65536`.
fn product_of_four() -> (Model, Vec<IVar>) {
    let mut model = Model::new();
    let vars: Vec<IVar> = ["i2302", "i2303", "i2304", "i2305"]
        .iter()
        .map(|name| model.new_ivar(INT_CST_MIN, INT_CST_MAX, *name))
        .collect();
    for &v in &vars {
        model.enforce_all([gt(v, 0), lt(v, 20)]);
    }
    model.enforce(eq(vars[0] * vars[1] * vars[2] * vars[3], 65536));
    (model, vars)
}

#[test]
fn single_variable_counts() {
    let (model, tracked) = single_variable();
    let mut enumerator = Enumerator::new(Solver::new(model), tracked.clone()).unwrap();
    let mut found = Vec::new();
    let measurement = enumerator
        .run_with(|model| found.push(model.value_of(tracked[0]).unwrap()))
        .unwrap();

    assert_eq!(found, vec![4]);
    assert_eq!(measurement.models, 1);
    assert_eq!(measurement.checks, 2);
    assert_eq!(enumerator.procedure().stats.num_checks, 2);
    assert_eq!(enumerator.procedure().stats.num_solutions, 1);
}

#[test]
fn product_of_four_terminates_with_distinct_models() {
    let (model, tracked) = product_of_four();
    let mut enumerator = Enumerator::new(Solver::new(model), tracked.clone()).unwrap();
    let mut found: Vec<Vec<i32>> = Vec::new();
    let measurement = enumerator
        .run_with(|model| {
            found.push(tracked.iter().map(|&v| model.value_of(v).unwrap()).collect())
        })
        .unwrap();

    assert_eq!(measurement.models as usize, found.len());
    for values in &found {
        assert_eq!(values.iter().map(|&v| v as i64).product::<i64>(), 65536);
        assert!(values.iter().all(|&v| 0 < v && v < 20));
    }
    // no model tuple is ever revisited
    for (i, a) in found.iter().enumerate() {
        for b in &found[i + 1..] {
            assert_ne!(a, b);
        }
    }
    // within 1..19 the only factorization of 2^16 is 16 * 16 * 16 * 16, and
    // escaping it along any variable introduces a factor that is not a power
    // of two
    assert_eq!(found, vec![vec![16, 16, 16, 16]]);
    assert_eq!(measurement.checks, 2);
}

#[test]
fn frontier_chain_on_a_line() {
    // i + j == 5 over 1..4: the chain visits the four solutions in lexical
    // order, each check after the first being forced over the previous point
    let mut model = Model::new();
    let i = model.new_ivar(1, 4, "i");
    let j = model.new_ivar(1, 4, "j");
    model.enforce(eq(i + j, 5));

    let mut enumerator = Enumerator::new(Solver::new(model), vec![i, j]).unwrap();
    let mut found: Vec<(i32, i32)> = Vec::new();
    let measurement = enumerator
        .run_with(|model| found.push((model.value_of(i).unwrap(), model.value_of(j).unwrap())))
        .unwrap();

    assert_eq!(found, vec![(1, 4), (2, 3), (3, 2), (4, 1)]);
    assert_eq!(measurement.models, 4);
    assert_eq!(measurement.checks, 5);
}

#[test]
fn unsat_base_set_queries_exactly_once() {
    let mut model = Model::new();
    let i = model.new_ivar(1, 9, "i");
    model.enforce(eq(i, 4));
    model.enforce(eq(i, 5));

    let mut enumerator = Enumerator::new(Solver::new(model), vec![i]).unwrap();
    let measurement = enumerator.run().unwrap();
    assert_eq!(measurement.models, 0);
    assert_eq!(measurement.checks, 1);
}

#[test]
fn identical_runs_make_identical_decision_sequences() {
    let run = || {
        let (model, tracked) = product_of_four();
        let mut enumerator = Enumerator::new(Solver::new(model), tracked).unwrap();
        let measurement = enumerator.run().unwrap();
        let stats = &enumerator.procedure().stats;
        (measurement.models, measurement.checks, stats.num_decisions, stats.num_conflicts)
    };
    assert_eq!(run(), run());
}

#[test]
fn empty_tracked_sequence_is_a_configuration_error() {
    let (model, _) = single_variable();
    assert!(matches!(
        Enumerator::new(Solver::new(model), vec![]),
        Err(EnumerateError::NoTrackedVariables)
    ));
}

#[test]
fn zero_timeout_cancels_the_run() {
    let (model, tracked) = product_of_four();
    let mut enumerator = Enumerator::new(Solver::new(model), tracked)
        .unwrap()
        .with_timeout(Duration::ZERO);
    assert!(matches!(enumerator.run(), Err(EnumerateError::Cancelled)));
}

#[test]
fn enumerate_and_time_reports_a_duration() {
    let (model, tracked) = single_variable();
    let elapsed = enumerate_and_time(&tracked, model).unwrap();
    assert!(elapsed > Duration::ZERO);
}

#[test]
fn model_snapshots_outlive_later_assertions() {
    let (model, tracked) = single_variable();
    let mut enumerator = Enumerator::new(Solver::new(model), tracked.clone()).unwrap();
    let mut snapshot: Option<SavedAssignment> = None;
    enumerator.run_with(|model| snapshot = Some(model.clone())).unwrap();
    // the blocking constraint asserted after the callback does not invalidate
    // the owned snapshot
    assert_eq!(snapshot.unwrap().value_of(tracked[0]), Some(4));
}
