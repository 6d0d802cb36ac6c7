//! Measures the wall-clock cost of enumerating the solution frontier of small
//! integer constraint problems.
//!
//! The enumeration protocol is the one used when probing candidate
//! configurations with an SMT solver: repeatedly check satisfiability of an
//! accumulated constraint set, extract a model whenever the check succeeds,
//! and exclude the model (together with everything it dominates) by asserting
//! a disjunctive blocking constraint.  The loop stops on the first
//! unsatisfiable verdict and the elapsed time of the full decision sequence
//! is reported.
//!
//! The decision procedure sits behind the [`enumerate::DecisionProcedure`]
//! capability trait.  A self-contained finite-domain procedure
//! ([`solver::Solver`]) is provided so that benchmarks and tests run without
//! an external solver library.

pub mod core;
pub mod enumerate;
pub mod model;
pub mod solver;

pub use crate::core::{IntCst, IntDomain, IVar, VarRef, INT_CST_MAX, INT_CST_MIN};
pub use crate::enumerate::{
    enumerate_and_time, DecisionProcedure, EnumerateError, Enumerator, Measurement, SatResult,
    SolverError,
};
pub use crate::model::{Label, Model, SavedAssignment};
pub use crate::solver::{Exit, Solver};
