//! Precedence levels and the relational predicates a `Constrain` node tests
//! them against.
//!
//! A rule's precedence is just an integer; a precedence-constrained reference
//! to a non-terminal (`(expr < 20)` in the combinator surface) carries one of
//! the six relational operators below, tested against a reducer's declared
//! precedence at completion time (see `chart::Chart::register_reduction`).

use std::fmt;

/// The precedence level a production is declared at, and a reduction is
/// tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precedence(pub i32);

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for Precedence {
    fn from(value: i32) -> Self {
        Precedence(value)
    }
}

/// The six relational operators a constraint can be built from, mirroring
/// `operator.lt`/`operator.le`/... in the original Python source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl fmt::Display for PrecOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrecOp::Lt => "<",
            PrecOp::Le => "<=",
            PrecOp::Gt => ">",
            PrecOp::Ge => ">=",
            PrecOp::Eq => "==",
            PrecOp::Ne => "!=",
        };
        write!(f, "{s}")
    }
}

/// `φ` in the spec: a predicate over a reducer's precedence, attached to a
/// `Constrain` node and inherited by the kernel item it registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecPredicate {
    op: PrecOp,
    bound: i32,
}

impl PrecPredicate {
    pub fn new(op: PrecOp, bound: i32) -> Self {
        Self { op, bound }
    }

    pub fn lt(bound: i32) -> Self {
        Self::new(PrecOp::Lt, bound)
    }

    pub fn le(bound: i32) -> Self {
        Self::new(PrecOp::Le, bound)
    }

    pub fn gt(bound: i32) -> Self {
        Self::new(PrecOp::Gt, bound)
    }

    pub fn ge(bound: i32) -> Self {
        Self::new(PrecOp::Ge, bound)
    }

    // Named `eq_to`/`ne_to` rather than `eq`/`ne`: those names collide with
    // `PartialEq::eq`/`ne`, which this type also derives.
    pub fn eq_to(bound: i32) -> Self {
        Self::new(PrecOp::Eq, bound)
    }

    pub fn ne_to(bound: i32) -> Self {
        Self::new(PrecOp::Ne, bound)
    }

    /// `φ(p)`: does the reducer's precedence satisfy this predicate?
    pub fn test(&self, p: Precedence) -> bool {
        match self.op {
            PrecOp::Lt => p.0 < self.bound,
            PrecOp::Le => p.0 <= self.bound,
            PrecOp::Gt => p.0 > self.bound,
            PrecOp::Ge => p.0 >= self.bound,
            PrecOp::Eq => p.0 == self.bound,
            PrecOp::Ne => p.0 != self.bound,
        }
    }
}

impl fmt::Display for PrecPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relational_predicates_test_as_expected() {
        assert!(PrecPredicate::lt(20).test(Precedence(19)));
        assert!(!PrecPredicate::lt(20).test(Precedence(20)));
        assert!(PrecPredicate::le(20).test(Precedence(20)));
        assert!(!PrecPredicate::le(20).test(Precedence(21)));
        assert!(PrecPredicate::gt(10).test(Precedence(11)));
        assert!(PrecPredicate::ge(10).test(Precedence(10)));
        assert!(PrecPredicate::eq_to(5).test(Precedence(5)));
        assert!(PrecPredicate::ne_to(5).test(Precedence(6)));
    }
}
