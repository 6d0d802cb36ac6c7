//! A self-contained decision procedure for finite-domain integer problems.
//!
//! The search is depth-first over the variables in declaration order, trying
//! values in increasing order, and prunes with the three-valued evaluation of
//! the constraint set.  Identical inputs always produce identical search
//! traces, which the enumeration harness relies on when comparing runs.

pub mod stats;

use crate::core::{Domains, IntDomain, VarRef};
use crate::model::lang::{BExpr, IExpr};
use crate::model::{Label, Model, SavedAssignment};
use crate::solver::stats::Stats;
use std::fmt::Formatter;
use std::sync::Arc;
use std::time::Instant;

/// Interval between two deadline inspections, in search nodes.
const DEADLINE_CHECK_PERIOD: u64 = 1024;

#[derive(Debug)]
pub enum Exit {
    Interrupted,
}
impl std::fmt::Display for Exit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Solver interrupted.")
    }
}
impl std::error::Error for Exit {}

pub struct Solver<Lbl> {
    pub model: Model<Lbl>,
    pub stats: Stats,
    /// Assignment produced by the last successful satisfiability check.
    /// Cleared whenever the constraint set is mutated.
    pub(crate) last_solution: Option<Arc<SavedAssignment>>,
}

impl<Lbl: Label> Solver<Lbl> {
    pub fn new(model: Model<Lbl>) -> Solver<Lbl> {
        Solver {
            model,
            stats: Stats::default(),
            last_solution: None,
        }
    }

    /// Imposes the constraint that the given expression is true in any solution.
    pub fn enforce(&mut self, constraint: impl Into<BExpr>) {
        self.last_solution = None;
        self.model.enforce(constraint);
    }

    /// Searches for the first satisfying assignment, returning none if the
    /// search space was exhausted without encountering a solution.
    pub fn solve(&mut self) -> Result<Option<Arc<SavedAssignment>>, Exit> {
        self.solve_with_deadline(None)
    }

    /// Same as [`Solver::solve`], giving up with [`Exit::Interrupted`] once the
    /// deadline is reached.  The deadline is inspected before the first search
    /// node and periodically afterwards.
    pub fn solve_with_deadline(
        &mut self,
        deadline: Option<Instant>,
    ) -> Result<Option<Arc<SavedAssignment>>, Exit> {
        let start_time = Instant::now();
        self.stats.num_checks += 1;

        let mut ticker = Ticker::new(deadline);
        let result = self.search_from_root(&mut ticker);

        self.stats.solve_time += start_time.elapsed();
        match result? {
            Some(solution) => {
                self.stats.num_solutions += 1;
                let solution = Arc::new(solution);
                self.last_solution = Some(solution.clone());
                Ok(Some(solution))
            }
            None => Ok(None),
        }
    }

    pub fn print_stats(&self) {
        println!("{}", self.stats);
    }

    fn search_from_root(&mut self, ticker: &mut Ticker) -> Result<Option<SavedAssignment>, Exit> {
        ticker.expired()?;

        // Work on a copy of the initial domains: every check restarts from the
        // model's root state with the full accumulated constraint set.
        let mut doms = self.model.state.clone();
        if !propagate_unary(self.model.constraints(), &mut doms) {
            self.stats.num_conflicts += 1;
            return Ok(None);
        }
        self.search(&mut doms, ticker)
    }

    fn search(&mut self, doms: &mut Domains, ticker: &mut Ticker) -> Result<Option<SavedAssignment>, Exit> {
        ticker.tick()?;

        let mut undecided = false;
        for c in self.model.constraints() {
            match c.eval(doms) {
                Some(false) => {
                    self.stats.num_conflicts += 1;
                    return Ok(None);
                }
                Some(true) => {}
                None => undecided = true,
            }
        }

        let unfixed = (0..doms.num_vars())
            .map(|v| VarRef::from_u32(v as u32))
            .find(|&v| doms.var_domain(v).as_singleton().is_none());

        let Some(var) = unfixed else {
            // Total assignment.  Every constraint evaluates decisively on it,
            // except ill-formed terms (division by zero) which are rejected.
            return if undecided {
                self.stats.num_conflicts += 1;
                Ok(None)
            } else {
                Ok(Some(SavedAssignment::from_domains(doms)))
            };
        };

        let IntDomain { lb, ub } = doms.var_domain(var);
        for value in lb..=ub {
            self.stats.num_decisions += 1;
            doms.set(var, IntDomain::new(value, value));
            if let Some(solution) = self.search(doms, ticker)? {
                return Ok(Some(solution));
            }
        }
        doms.set(var, IntDomain::new(lb, ub));
        Ok(None)
    }
}

/// Tightens variable domains with the unary bound predicates of the
/// constraint set.  Returns false if some domain becomes empty.
///
/// This is only an accelerator: the constraints remain part of the set and
/// are still checked by the search.
fn propagate_unary(constraints: &[BExpr], doms: &mut Domains) -> bool {
    for c in constraints {
        match c {
            BExpr::Leq(IExpr::Var(v), IExpr::Cst(cst)) => {
                let dom = doms.var_domain(*v);
                doms.set(v.variable(), IntDomain::new(dom.lb, dom.ub.min(*cst)));
            }
            BExpr::Leq(IExpr::Cst(cst), IExpr::Var(v)) => {
                let dom = doms.var_domain(*v);
                doms.set(v.variable(), IntDomain::new(dom.lb.max(*cst), dom.ub));
            }
            BExpr::Lt(IExpr::Var(v), IExpr::Cst(cst)) => {
                let dom = doms.var_domain(*v);
                doms.set(v.variable(), IntDomain::new(dom.lb, dom.ub.min(cst.saturating_sub(1))));
            }
            BExpr::Lt(IExpr::Cst(cst), IExpr::Var(v)) => {
                let dom = doms.var_domain(*v);
                doms.set(v.variable(), IntDomain::new(dom.lb.max(cst.saturating_add(1)), dom.ub));
            }
            BExpr::Eq(IExpr::Var(v), IExpr::Cst(cst)) | BExpr::Eq(IExpr::Cst(cst), IExpr::Var(v)) => {
                let dom = doms.var_domain(*v);
                doms.set(
                    v.variable(),
                    IntDomain::new(dom.lb.max(*cst), dom.ub.min(*cst)),
                );
            }
            _ => {}
        }
    }
    (0..doms.num_vars()).all(|v| !doms.var_domain(VarRef::from_u32(v as u32)).is_empty())
}

struct Ticker {
    nodes: u64,
    deadline: Option<Instant>,
}

impl Ticker {
    fn new(deadline: Option<Instant>) -> Ticker {
        Ticker { nodes: 0, deadline }
    }

    fn tick(&mut self) -> Result<(), Exit> {
        self.nodes += 1;
        if self.nodes % DEADLINE_CHECK_PERIOD == 0 {
            self.expired()?;
        }
        Ok(())
    }

    fn expired(&self) -> Result<(), Exit> {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(Exit::Interrupted);
            }
        }
        Ok(())
    }
}
