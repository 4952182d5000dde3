use num::Float;

use crate::ops::{AndOp, OrOp};
use crate::variable::TermHandle;

/// A rule premise: membership terms combined with fuzzy AND / OR.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Term(TermHandle),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn and(self, rhs: impl Into<Expr>) -> Self {
        Expr::And(Box::new(self), Box::new(rhs.into()))
    }

    pub fn or(self, rhs: impl Into<Expr>) -> Self {
        Expr::Or(Box::new(self), Box::new(rhs.into()))
    }

    /// Every term referenced by the expression, left to right.
    pub fn terms(&self) -> Vec<TermHandle> {
        let mut props = Vec::new();

        fn parse(expr: &Expr, out: &mut Vec<TermHandle>) {
            match expr {
                Expr::Term(handle) => out.push(*handle),
                Expr::And(lhs, rhs) | Expr::Or(lhs, rhs) => {
                    parse(lhs, out);
                    parse(rhs, out);
                },
            }
        }

        parse(self, &mut props);

        props
    }

    /// Evaluates the expression bottom-up, with `degree` supplying the
    /// fuzzified truth of each leaf.
    pub fn eval<F, E>(
        &self,
        and_op: AndOp,
        or_op: OrOp,
        degree: &mut impl FnMut(TermHandle) -> Result<F, E>,
    ) -> Result<F, E>
    where
        F: Float,
    {
        match self {
            Expr::Term(handle) => degree(*handle),
            Expr::And(lhs, rhs) => {
                let left = lhs.eval(and_op, or_op, degree)?;
                let right = rhs.eval(and_op, or_op, degree)?;

                Ok(and_op.apply(left, right))
            },
            Expr::Or(lhs, rhs) => {
                let left = lhs.eval(and_op, or_op, degree)?;
                let right = rhs.eval(and_op, or_op, degree)?;

                Ok(or_op.apply(left, right))
            },
        }
    }
}

impl From<TermHandle> for Expr {
    fn from(handle: TermHandle) -> Self {
        Expr::Term(handle)
    }
}

impl TermHandle {
    pub fn and(self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).and(rhs)
    }

    pub fn or(self, rhs: impl Into<Expr>) -> Expr {
        Expr::from(self).or(rhs)
    }
}
