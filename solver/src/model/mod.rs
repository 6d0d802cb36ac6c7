//! Problem description: variable declaration, the constraint language and
//! assignment snapshots.

pub mod lang;

use crate::core::{Domains, IntCst, IntDomain, IVar, VarRef};
use crate::model::lang::BExpr;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait requiring the minimum capabilities for a type to serve as the label of variables.
pub trait Label: Display + Debug + Clone + Eq + PartialEq + Hash + Send + Sync + 'static {}
impl<T> Label for T where T: Display + Debug + Clone + Eq + PartialEq + Hash + Send + Sync + 'static {}

/// Description of a problem, composed of its variables (labels and initial
/// domains) and the constraints accumulated so far.
///
/// The constraint set is append-only: constraints can be added with
/// [`Model::enforce`] but never removed.
#[derive(Clone)]
pub struct Model<Lbl> {
    labels: Vec<Lbl>,
    constraints: Vec<BExpr>,
    /// Initial domain of all variables, defining the state the search starts from.
    pub state: Domains,
}

impl<Lbl: Label> Model<Lbl> {
    pub fn new() -> Model<Lbl> {
        Model {
            labels: Vec::new(),
            constraints: Vec::new(),
            state: Domains::new(),
        }
    }

    /// Declares a new integer variable with domain `[lb, ub]`.
    pub fn new_ivar(&mut self, lb: IntCst, ub: IntCst, label: impl Into<Lbl>) -> IVar {
        let var = self.state.new_var(lb, ub);
        self.labels.push(label.into());
        IVar::new(var)
    }

    pub fn num_vars(&self) -> usize {
        self.state.num_vars()
    }

    /// Imposes the constraint that the given expression is true in any solution.
    pub fn enforce(&mut self, constraint: impl Into<BExpr>) {
        let c = constraint.into();
        tracing::trace!("Adding constraint: {c}");
        self.constraints.push(c);
    }

    pub fn enforce_all(&mut self, constraints: impl IntoIterator<Item = BExpr>) {
        for c in constraints {
            self.enforce(c);
        }
    }

    pub fn constraints(&self) -> &[BExpr] {
        &self.constraints
    }

    pub fn var_domain(&self, var: impl Into<VarRef>) -> IntDomain {
        self.state.var_domain(var)
    }

    pub fn label(&self, var: impl Into<VarRef>) -> &Lbl {
        &self.labels[var.into().to_u32() as usize]
    }

    /// Returns the unique variable with this label, if any.
    ///
    /// Panics if more than one variable carries the label.
    pub fn get_variable(&self, label: &Lbl) -> Option<IVar> {
        let mut matches = self
            .labels
            .iter()
            .enumerate()
            .filter(|(_, l)| *l == label)
            .map(|(i, _)| IVar::new(VarRef::from_u32(i as u32)));
        match (matches.next(), matches.next()) {
            (None, _) => None,
            (Some(var), None) => Some(var),
            (Some(_), Some(_)) => panic!("More than one variable with label: {label:?}"),
        }
    }

    /// Returns a variable appearing in the constraint but not declared in this
    /// model, if any.
    pub fn unknown_variable(&self, constraint: &BExpr) -> Option<VarRef> {
        let num_vars = self.num_vars() as u32;
        let mut unknown = None;
        constraint.for_each_var(&mut |v: VarRef| {
            if v.to_u32() >= num_vars && unknown.is_none() {
                unknown = Some(v);
            }
        });
        unknown
    }
}

impl<Lbl: Label> Default for Model<Lbl> {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of a total assignment: one value for each variable of the model
/// that produced it.
///
/// The snapshot is owned and remains valid after the constraint set of the
/// producing solver is mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedAssignment {
    values: Vec<IntCst>,
}

impl SavedAssignment {
    /// Builds a snapshot from explicit values, indexed by variable number.
    pub fn from_values(values: Vec<IntCst>) -> SavedAssignment {
        SavedAssignment { values }
    }

    pub(crate) fn from_domains(doms: &Domains) -> SavedAssignment {
        debug_assert!((0..doms.num_vars())
            .all(|v| doms.var_domain(VarRef::from_u32(v as u32)).as_singleton().is_some()));
        let values = (0..doms.num_vars())
            .map(|v| doms.var_domain(VarRef::from_u32(v as u32)).lb)
            .collect();
        SavedAssignment { values }
    }

    /// Value of the variable in the snapshot, or `None` if the variable has no
    /// value in it.
    pub fn value_of(&self, var: impl Into<VarRef>) -> Option<IntCst> {
        self.values.get(var.into().to_u32() as usize).copied()
    }
}
