//! Relational operators.
//!
//! Both operands are always evaluated. Infinities compare by sign alone:
//! infinities of the same sign are equal, and `+infinity` is greater than
//! every finite value. Reals compare through the configured
//! [`RealCompare`](crate::RealCompare) mode.

use std::cmp::Ordering;

use mdl_ir::BinaryOp;

use super::mismatch;
use crate::config::RealCompare;
use crate::expr::Expr;
use crate::outcome::{ErrorKind, Outcome, Sign, Value};
use crate::protocol::Protocol;

pub(crate) fn evaluate<P: Protocol>(
    expr: &Expr,
    op: BinaryOp,
    left: Outcome,
    right: Outcome,
    p: &mut P,
) -> Outcome {
    if let Some(special) = Outcome::dominant(&left, &right) {
        return special;
    }
    let ordering = match (&left, &right) {
        (Outcome::Infinity(a), Outcome::Infinity(b)) => a.cmp(b),
        (Outcome::Infinity(sign), Outcome::Normal(_)) => against_finite(*sign),
        (Outcome::Normal(_), Outcome::Infinity(sign)) => against_finite(*sign).reverse(),
        (Outcome::Normal(a), Outcome::Normal(b)) => {
            match compare_values(a, b, p.config().real_compare) {
                Some(ordering) => ordering,
                None => return mismatch(expr, b, p),
            }
        }
        _ => {
            return p.raise(
                expr,
                ErrorKind::InternalInconsistency,
                "special outcome escaped dominance check",
            )
        }
    };
    Outcome::bool(holds(op, ordering))
}

/// How an infinity of `sign` orders against any finite value.
fn against_finite(sign: Sign) -> Ordering {
    match sign {
        Sign::Negative => Ordering::Less,
        Sign::Positive => Ordering::Greater,
    }
}

fn compare_values(a: &Value, b: &Value, mode: RealCompare) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Real(a), Value::Real(b)) => compare_reals(*a, *b, mode),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn compare_reals(a: f64, b: f64, mode: RealCompare) -> Option<Ordering> {
    if mode.approx_eq(a, b) {
        Some(Ordering::Equal)
    } else {
        a.partial_cmp(&b)
    }
}

fn holds(op: BinaryOp, ordering: Ordering) -> bool {
    match op {
        BinaryOp::Eq => ordering == Ordering::Equal,
        BinaryOp::NotEq => ordering != Ordering::Equal,
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::GtEq => ordering != Ordering::Less,
        _ => false,
    }
}
