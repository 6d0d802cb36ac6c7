//! Frontier enumeration and its measurement protocol.
//!
//! Given a satisfiable constraint set, the [`Enumerator`] repeatedly asks a
//! decision procedure for a model and excludes it by asserting the
//! disjunction, over every tracked variable `v`, of `v > value(v)`.  The
//! blocking constraint is never satisfied by the model that produced it, so
//! each iteration strictly shrinks the feasible region and the loop
//! terminates on bounded domains.
//!
//! Note that the disjunctive exclusion removes the whole region dominated by
//! a model along all tracked variables at once: the loop walks a chain of
//! successively larger assignments rather than visiting every satisfying
//! assignment.  This is the intended behavior; the measured quantity is the
//! cost of advancing the frontier until the solver reports unsatisfiable.

use crate::core::{IntCst, IVar, VarRef};
use crate::model::lang::{gt, or, BExpr};
use crate::model::{Label, Model, SavedAssignment};
use crate::solver::{Exit, Solver};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Verdict of a satisfiability check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SatResult {
    Sat,
    Unsat,
    Unknown,
}

/// Failure of a decision procedure.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("malformed constraint: {0}")]
    MalformedConstraint(String),
    #[error("internal solver error: {0}")]
    Internal(String),
    /// The deadline passed to [`DecisionProcedure::check`] expired.
    #[error("check interrupted by deadline")]
    Interrupted,
}

/// Minimal capability interface of the decision procedure driven by the
/// [`Enumerator`].
///
/// The procedure is incremental in its constraint set only: each `check`
/// decides the conjunction of everything asserted so far.  A model obtained
/// from [`DecisionProcedure::model`] is a snapshot and must be read before
/// the next `assert`, which may invalidate it.
pub trait DecisionProcedure {
    /// Adds a constraint to the live constraint set.  Irreversible.
    fn assert(&mut self, constraint: BExpr) -> Result<(), SolverError>;

    /// Decides satisfiability of the current constraint set.  May block for an
    /// unbounded time; a procedure that supports interruption gives up with
    /// [`SolverError::Interrupted`] once the deadline is reached.
    fn check(&mut self, deadline: Option<Instant>) -> Result<SatResult, SolverError>;

    /// The model of the last satisfiable check.
    fn model(&self) -> Result<Arc<SavedAssignment>, SolverError>;
}

impl<Lbl: Label> DecisionProcedure for Solver<Lbl> {
    fn assert(&mut self, constraint: BExpr) -> Result<(), SolverError> {
        if let Some(var) = self.model.unknown_variable(&constraint) {
            return Err(SolverError::MalformedConstraint(format!(
                "unknown variable {var:?} in {constraint}"
            )));
        }
        self.enforce(constraint);
        Ok(())
    }

    fn check(&mut self, deadline: Option<Instant>) -> Result<SatResult, SolverError> {
        for c in self.model.constraints() {
            if let Some(var) = self.model.unknown_variable(c) {
                return Err(SolverError::MalformedConstraint(format!(
                    "unknown variable {var:?} in {c}"
                )));
            }
        }
        match self.solve_with_deadline(deadline) {
            Ok(Some(_)) => Ok(SatResult::Sat),
            Ok(None) => Ok(SatResult::Unsat),
            Err(Exit::Interrupted) => Err(SolverError::Interrupted),
        }
    }

    fn model(&self) -> Result<Arc<SavedAssignment>, SolverError> {
        self.last_solution.clone().ok_or_else(|| {
            SolverError::Internal("no model available: the last check was not satisfiable".to_string())
        })
    }
}

/// Fatal outcomes of an enumeration run.  None of them carries a duration:
/// a failed run produces no timing at all.
#[derive(Debug, Error)]
pub enum EnumerateError {
    /// The tracked variable sequence is empty, making the blocking
    /// disjunction undefined.
    #[error("no tracked variables: the blocking disjunction would be undefined")]
    NoTrackedVariables,
    #[error(transparent)]
    Solver(#[from] SolverError),
    /// The procedure returned an inconclusive verdict.
    #[error("solver returned an inconclusive verdict")]
    UnknownResult,
    /// A tracked variable has no value in an otherwise satisfiable model.
    #[error("tracked variable {0:?} has no value in the model")]
    ModelExtraction(VarRef),
    /// The timeout expired; reported instead of a duration.
    #[error("enumeration cancelled by timeout")]
    Cancelled,
}

/// Outcome of a completed enumeration run.
#[derive(Copy, Clone, Debug)]
pub struct Measurement {
    /// Wall-clock time of the full decision sequence.
    pub elapsed: Duration,
    /// Number of models found, which is also the number of blocking
    /// constraints asserted.
    pub models: u64,
    /// Number of satisfiability checks, including the final unsatisfiable one.
    pub checks: u64,
}

/// Drives the enumeration loop against a decision procedure.
///
/// The enumerator owns the procedure exclusively for the duration of the run;
/// create a fresh procedure for every run.
pub struct Enumerator<S> {
    procedure: S,
    tracked: Vec<IVar>,
    timeout: Option<Duration>,
}

impl<S: DecisionProcedure> Enumerator<S> {
    /// Rejects an empty tracked sequence: with no variable to escape from,
    /// the loop could never make progress.
    pub fn new(procedure: S, tracked: Vec<IVar>) -> Result<Enumerator<S>, EnumerateError> {
        if tracked.is_empty() {
            return Err(EnumerateError::NoTrackedVariables);
        }
        Ok(Enumerator {
            procedure,
            tracked,
            timeout: None,
        })
    }

    /// Bounds the run: once the timeout expires the in-flight check is
    /// interrupted and the run reports [`EnumerateError::Cancelled`].
    pub fn with_timeout(mut self, timeout: Duration) -> Enumerator<S> {
        self.timeout = Some(timeout);
        self
    }

    pub fn procedure(&self) -> &S {
        &self.procedure
    }

    /// Runs the loop to exhaustion and reports the measurement.
    pub fn run(&mut self) -> Result<Measurement, EnumerateError> {
        self.run_with(|_| ())
    }

    /// Same as [`Enumerator::run`], invoking the callback on each model found.
    pub fn run_with(
        &mut self,
        mut on_model: impl FnMut(&SavedAssignment),
    ) -> Result<Measurement, EnumerateError> {
        let start = Instant::now();
        let deadline = self.timeout.and_then(|timeout| start.checked_add(timeout));
        let mut models = 0u64;
        let mut checks = 0u64;
        loop {
            checks += 1;
            match self.procedure.check(deadline) {
                Ok(SatResult::Unsat) => break,
                Ok(SatResult::Unknown) => return Err(EnumerateError::UnknownResult),
                Ok(SatResult::Sat) => {
                    let model = self.procedure.model()?;
                    // Read the tracked values before the next assertion
                    // invalidates the procedure's model.
                    let mut values: Vec<(IVar, IntCst)> = Vec::with_capacity(self.tracked.len());
                    for &v in &self.tracked {
                        let value = model
                            .value_of(v)
                            .ok_or(EnumerateError::ModelExtraction(v.variable()))?;
                        values.push((v, value));
                    }
                    on_model(&model);
                    let blocking = or(values.iter().map(|&(v, value)| gt(v, value)));
                    tracing::debug!("model #{}: blocking with {blocking}", models + 1);
                    self.procedure.assert(blocking)?;
                    models += 1;
                }
                Err(SolverError::Interrupted) => return Err(EnumerateError::Cancelled),
                Err(e) => return Err(EnumerateError::Solver(e)),
            }
        }
        Ok(Measurement {
            elapsed: start.elapsed(),
            models,
            checks,
        })
    }
}

/// Enumerates the solution frontier of the model and returns the elapsed
/// wall-clock time of the whole run, including the construction of the
/// solver seeded with the model's constraints.
pub fn enumerate_and_time<Lbl: Label>(
    tracked: &[IVar],
    model: Model<Lbl>,
) -> Result<Duration, EnumerateError> {
    let start = Instant::now();
    let mut enumerator = Enumerator::new(Solver::new(model), tracked.to_vec())?;
    enumerator.run()?;
    Ok(start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VarRef;
    use std::collections::VecDeque;

    /// A scripted procedure: plays back prepared verdicts and models, and
    /// records every asserted constraint.
    struct Scripted {
        verdicts: VecDeque<Result<SatResult, SolverError>>,
        models: VecDeque<Arc<SavedAssignment>>,
        current: Option<Arc<SavedAssignment>>,
        asserted: Vec<BExpr>,
    }

    impl Scripted {
        fn new(verdicts: Vec<Result<SatResult, SolverError>>) -> Scripted {
            Scripted {
                verdicts: verdicts.into(),
                models: VecDeque::new(),
                current: None,
                asserted: Vec::new(),
            }
        }

        fn with_models(mut self, models: Vec<Vec<IntCst>>) -> Scripted {
            self.models = models
                .into_iter()
                .map(|values| Arc::new(SavedAssignment::from_values(values)))
                .collect();
            self
        }
    }

    impl DecisionProcedure for Scripted {
        fn assert(&mut self, constraint: BExpr) -> Result<(), SolverError> {
            self.asserted.push(constraint);
            Ok(())
        }

        fn check(&mut self, _deadline: Option<Instant>) -> Result<SatResult, SolverError> {
            let verdict = self.verdicts.pop_front().expect("script exhausted");
            if let Ok(SatResult::Sat) = verdict {
                self.current = self.models.pop_front();
            }
            verdict
        }

        fn model(&self) -> Result<Arc<SavedAssignment>, SolverError> {
            self.current
                .clone()
                .ok_or_else(|| SolverError::Internal("no model scripted".to_string()))
        }
    }

    fn ivar(id: u32) -> IVar {
        IVar::new(VarRef::from_u32(id))
    }

    #[test]
    fn empty_tracked_sequence_is_rejected() {
        let procedure = Scripted::new(vec![]);
        assert!(matches!(
            Enumerator::new(procedure, vec![]),
            Err(EnumerateError::NoTrackedVariables)
        ));
    }

    #[test]
    fn unknown_verdict_is_fatal() {
        let procedure = Scripted::new(vec![Ok(SatResult::Unknown)]);
        let mut enumerator = Enumerator::new(procedure, vec![ivar(0)]).unwrap();
        assert!(matches!(enumerator.run(), Err(EnumerateError::UnknownResult)));
    }

    #[test]
    fn solver_failure_is_fatal() {
        let procedure = Scripted::new(vec![Err(SolverError::Internal("boom".to_string()))]);
        let mut enumerator = Enumerator::new(procedure, vec![ivar(0)]).unwrap();
        assert!(matches!(
            enumerator.run(),
            Err(EnumerateError::Solver(SolverError::Internal(_)))
        ));
    }

    #[test]
    fn interruption_is_reported_as_cancelled() {
        let procedure = Scripted::new(vec![Err(SolverError::Interrupted)]);
        let mut enumerator = Enumerator::new(procedure, vec![ivar(0)]).unwrap();
        assert!(matches!(enumerator.run(), Err(EnumerateError::Cancelled)));
    }

    #[test]
    fn missing_tracked_value_is_a_model_extraction_error() {
        // the model has a value for variable 0 only, while variable 1 is tracked
        let procedure =
            Scripted::new(vec![Ok(SatResult::Sat)]).with_models(vec![vec![3]]);
        let mut enumerator = Enumerator::new(procedure, vec![ivar(0), ivar(1)]).unwrap();
        match enumerator.run() {
            Err(EnumerateError::ModelExtraction(var)) => assert_eq!(var, VarRef::from_u32(1)),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn blocking_constraint_is_the_tracked_disjunction() {
        let procedure = Scripted::new(vec![Ok(SatResult::Sat), Ok(SatResult::Unsat)])
            .with_models(vec![vec![2, 2]]);
        let (i, j) = (ivar(0), ivar(1));
        let mut enumerator = Enumerator::new(procedure, vec![i, j]).unwrap();
        let measurement = enumerator.run().unwrap();
        assert_eq!(measurement.models, 1);
        assert_eq!(measurement.checks, 2);
        // the exclusion is the downward-closed region below (2, 2): a solver
        // holding other solutions dominated by it would never surface them
        assert_eq!(enumerator.procedure().asserted, vec![or([gt(i, 2), gt(j, 2)])]);
    }

    #[test]
    fn unsat_base_set_adds_no_blocking_constraint() {
        let procedure = Scripted::new(vec![Ok(SatResult::Unsat)]);
        let mut enumerator = Enumerator::new(procedure, vec![ivar(0)]).unwrap();
        let measurement = enumerator.run().unwrap();
        assert_eq!(measurement.checks, 1);
        assert_eq!(measurement.models, 0);
        assert!(enumerator.procedure().asserted.is_empty());
    }
}
