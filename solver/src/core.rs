//! Base types: integer constants, variable references and domains.

/// Type representing an integer constant.
pub type IntCst = i32;

/// Type used to store the result of operations on [`IntCst`] that may overflow.
pub type LongCst = i64;

/// Overflow tolerant max value for integer constants.
/// It is used as a default for the upper bound of integer variable domains.
pub const INT_CST_MAX: IntCst = IntCst::MAX / 4 - 1;

/// Overflow tolerant min value for integer constants.
/// It is used as a default for the lower bound of integer variable domains.
pub const INT_CST_MIN: IntCst = -INT_CST_MAX;

/// Reference to a variable of a [`Model`](crate::model::Model).
///
/// Variables are numbered in declaration order and are only meaningful for
/// the model that created them.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarRef(u32);

impl VarRef {
    pub const fn from_u32(id: u32) -> VarRef {
        VarRef(id)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for VarRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "var{}", self.0)
    }
}

/// An integer variable: typed view over a [`VarRef`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IVar(VarRef);

impl IVar {
    pub const fn new(var: VarRef) -> IVar {
        IVar(var)
    }

    pub const fn variable(self) -> VarRef {
        self.0
    }
}

impl From<IVar> for VarRef {
    fn from(v: IVar) -> VarRef {
        v.0
    }
}

impl std::fmt::Debug for IVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Inclusive set of admissible values of an integer variable.
///
/// A domain with `lb > ub` is empty.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IntDomain {
    pub lb: IntCst,
    pub ub: IntCst,
}

impl IntDomain {
    pub fn new(lb: IntCst, ub: IntCst) -> IntDomain {
        IntDomain { lb, ub }
    }

    pub fn is_empty(&self) -> bool {
        self.lb > self.ub
    }

    /// If the domain contains a single value, returns it.
    pub fn as_singleton(&self) -> Option<IntCst> {
        if self.lb == self.ub {
            Some(self.lb)
        } else {
            None
        }
    }
}

/// Current admissible values of every declared variable.
#[derive(Clone, Debug, Default)]
pub struct Domains {
    doms: Vec<IntDomain>,
}

impl Domains {
    pub fn new() -> Domains {
        Domains::default()
    }

    /// Declares a new variable with domain `[lb, ub]` and returns its reference.
    pub fn new_var(&mut self, lb: IntCst, ub: IntCst) -> VarRef {
        self.doms.push(IntDomain::new(lb, ub));
        VarRef::from_u32((self.doms.len() - 1) as u32)
    }

    pub fn num_vars(&self) -> usize {
        self.doms.len()
    }

    pub fn var_domain(&self, var: impl Into<VarRef>) -> IntDomain {
        self.doms[var.into().to_u32() as usize]
    }

    pub(crate) fn set(&mut self, var: VarRef, dom: IntDomain) {
        self.doms[var.to_u32() as usize] = dom;
    }
}
