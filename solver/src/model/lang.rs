//! Expression language over integer variables.
//!
//! Integer expressions ([`IExpr`]) are trees of variables, constants and the
//! arithmetic operators `+ - * / %`.  Predicates ([`BExpr`]) compare two
//! integer expressions or combine other predicates with conjunction and
//! disjunction.  Both support three-valued evaluation against partial
//! domains, which is what the search uses for pruning.

use crate::core::{Domains, IntCst, IVar, LongCst, VarRef};
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Div, Mul, Rem, Sub};

/// An integer expression.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum IExpr {
    Var(IVar),
    Cst(IntCst),
    Add(Box<IExpr>, Box<IExpr>),
    Sub(Box<IExpr>, Box<IExpr>),
    Mul(Box<IExpr>, Box<IExpr>),
    Div(Box<IExpr>, Box<IExpr>),
    Mod(Box<IExpr>, Box<IExpr>),
}

impl IExpr {
    /// Range of values the expression may take under the given domains.
    ///
    /// The result is a conservative superset of the reachable values:
    /// arithmetic saturates at the [`LongCst`] bounds and division/modulo are
    /// only evaluated once both operands are fixed.
    pub fn bounds(&self, doms: &Domains) -> (LongCst, LongCst) {
        match self {
            IExpr::Var(v) => {
                let dom = doms.var_domain(*v);
                (dom.lb as LongCst, dom.ub as LongCst)
            }
            IExpr::Cst(c) => (*c as LongCst, *c as LongCst),
            IExpr::Add(a, b) => {
                let (la, ua) = a.bounds(doms);
                let (lb, ub) = b.bounds(doms);
                (la.saturating_add(lb), ua.saturating_add(ub))
            }
            IExpr::Sub(a, b) => {
                let (la, ua) = a.bounds(doms);
                let (lb, ub) = b.bounds(doms);
                (la.saturating_sub(ub), ua.saturating_sub(lb))
            }
            IExpr::Mul(a, b) => {
                let (la, ua) = a.bounds(doms);
                let (lb, ub) = b.bounds(doms);
                let corners = [
                    la.saturating_mul(lb),
                    la.saturating_mul(ub),
                    ua.saturating_mul(lb),
                    ua.saturating_mul(ub),
                ];
                (*corners.iter().min().unwrap(), *corners.iter().max().unwrap())
            }
            IExpr::Div(a, b) => match (a.bounds(doms), b.bounds(doms)) {
                ((la, ua), (lb, ub)) if la == ua && lb == ub && lb != 0 => (la / lb, la / lb),
                _ => (LongCst::MIN, LongCst::MAX),
            },
            IExpr::Mod(a, b) => match (a.bounds(doms), b.bounds(doms)) {
                ((la, ua), (lb, ub)) if la == ua && lb == ub && lb != 0 => (la % lb, la % lb),
                _ => (LongCst::MIN, LongCst::MAX),
            },
        }
    }

    pub fn for_each_var(&self, f: &mut impl FnMut(VarRef)) {
        match self {
            IExpr::Var(v) => f(v.variable()),
            IExpr::Cst(_) => {}
            IExpr::Add(a, b)
            | IExpr::Sub(a, b)
            | IExpr::Mul(a, b)
            | IExpr::Div(a, b)
            | IExpr::Mod(a, b) => {
                a.for_each_var(f);
                b.for_each_var(f);
            }
        }
    }
}

impl From<IVar> for IExpr {
    fn from(v: IVar) -> IExpr {
        IExpr::Var(v)
    }
}

impl From<IntCst> for IExpr {
    fn from(c: IntCst) -> IExpr {
        IExpr::Cst(c)
    }
}

macro_rules! iexpr_binop {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl<Rhs: Into<IExpr>> $trait<Rhs> for IExpr {
            type Output = IExpr;
            fn $method(self, rhs: Rhs) -> IExpr {
                IExpr::$variant(Box::new(self), Box::new(rhs.into()))
            }
        }
        impl<Rhs: Into<IExpr>> $trait<Rhs> for IVar {
            type Output = IExpr;
            fn $method(self, rhs: Rhs) -> IExpr {
                IExpr::$variant(Box::new(self.into()), Box::new(rhs.into()))
            }
        }
    };
}

iexpr_binop!(Add, add, Add);
iexpr_binop!(Sub, sub, Sub);
iexpr_binop!(Mul, mul, Mul);
iexpr_binop!(Div, div, Div);
iexpr_binop!(Rem, rem, Mod);

impl Display for IExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IExpr::Var(v) => write!(f, "{v:?}"),
            IExpr::Cst(c) => write!(f, "{c}"),
            IExpr::Add(a, b) => write!(f, "({a} + {b})"),
            IExpr::Sub(a, b) => write!(f, "({a} - {b})"),
            IExpr::Mul(a, b) => write!(f, "({a} * {b})"),
            IExpr::Div(a, b) => write!(f, "({a} / {b})"),
            IExpr::Mod(a, b) => write!(f, "({a} % {b})"),
        }
    }
}

/// A boolean predicate over integer expressions.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum BExpr {
    Leq(IExpr, IExpr),
    Lt(IExpr, IExpr),
    Eq(IExpr, IExpr),
    Neq(IExpr, IExpr),
    And(Box<[BExpr]>),
    Or(Box<[BExpr]>),
}

pub fn leq(lhs: impl Into<IExpr>, rhs: impl Into<IExpr>) -> BExpr {
    BExpr::Leq(lhs.into(), rhs.into())
}

pub fn lt(lhs: impl Into<IExpr>, rhs: impl Into<IExpr>) -> BExpr {
    BExpr::Lt(lhs.into(), rhs.into())
}

pub fn geq(lhs: impl Into<IExpr>, rhs: impl Into<IExpr>) -> BExpr {
    leq(rhs, lhs)
}

pub fn gt(lhs: impl Into<IExpr>, rhs: impl Into<IExpr>) -> BExpr {
    lt(rhs, lhs)
}

pub fn eq(lhs: impl Into<IExpr>, rhs: impl Into<IExpr>) -> BExpr {
    BExpr::Eq(lhs.into(), rhs.into())
}

pub fn neq(lhs: impl Into<IExpr>, rhs: impl Into<IExpr>) -> BExpr {
    BExpr::Neq(lhs.into(), rhs.into())
}

pub fn and(conjuncts: impl IntoIterator<Item = BExpr>) -> BExpr {
    BExpr::And(conjuncts.into_iter().collect())
}

pub fn or(disjuncts: impl IntoIterator<Item = BExpr>) -> BExpr {
    BExpr::Or(disjuncts.into_iter().collect())
}

impl BExpr {
    /// Three-valued evaluation under the given domains: `Some(true)` and
    /// `Some(false)` are definitive for every completion of the domains,
    /// `None` means undecided.
    pub fn eval(&self, doms: &Domains) -> Option<bool> {
        match self {
            BExpr::Leq(a, b) => {
                let (la, ua) = a.bounds(doms);
                let (lb, ub) = b.bounds(doms);
                if ua <= lb {
                    Some(true)
                } else if la > ub {
                    Some(false)
                } else {
                    None
                }
            }
            BExpr::Lt(a, b) => {
                let (la, ua) = a.bounds(doms);
                let (lb, ub) = b.bounds(doms);
                if ua < lb {
                    Some(true)
                } else if la >= ub {
                    Some(false)
                } else {
                    None
                }
            }
            BExpr::Eq(a, b) => {
                let (la, ua) = a.bounds(doms);
                let (lb, ub) = b.bounds(doms);
                if ua < lb || ub < la {
                    Some(false)
                } else if la == ua && lb == ub {
                    Some(la == lb)
                } else {
                    None
                }
            }
            BExpr::Neq(a, b) => {
                let (la, ua) = a.bounds(doms);
                let (lb, ub) = b.bounds(doms);
                if ua < lb || ub < la {
                    Some(true)
                } else if la == ua && lb == ub {
                    Some(la != lb)
                } else {
                    None
                }
            }
            BExpr::And(conjuncts) => {
                let mut all_true = true;
                for c in conjuncts.iter() {
                    match c.eval(doms) {
                        Some(false) => return Some(false),
                        Some(true) => {}
                        None => all_true = false,
                    }
                }
                if all_true {
                    Some(true)
                } else {
                    None
                }
            }
            BExpr::Or(disjuncts) => {
                let mut all_false = true;
                for d in disjuncts.iter() {
                    match d.eval(doms) {
                        Some(true) => return Some(true),
                        Some(false) => {}
                        None => all_false = false,
                    }
                }
                if all_false {
                    Some(false)
                } else {
                    None
                }
            }
        }
    }

    pub fn for_each_var(&self, f: &mut impl FnMut(VarRef)) {
        match self {
            BExpr::Leq(a, b) | BExpr::Lt(a, b) | BExpr::Eq(a, b) | BExpr::Neq(a, b) => {
                a.for_each_var(f);
                b.for_each_var(f);
            }
            BExpr::And(xs) | BExpr::Or(xs) => {
                for x in xs.iter() {
                    x.for_each_var(f);
                }
            }
        }
    }
}

impl Display for BExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BExpr::Leq(a, b) => write!(f, "{a} <= {b}"),
            BExpr::Lt(a, b) => write!(f, "{a} < {b}"),
            BExpr::Eq(a, b) => write!(f, "{a} == {b}"),
            BExpr::Neq(a, b) => write!(f, "{a} != {b}"),
            BExpr::And(conjuncts) => write!(f, "and({})", conjuncts.iter().format(", ")),
            BExpr::Or(disjuncts) => write!(f, "or({})", disjuncts.iter().format(", ")),
        }
    }
}
