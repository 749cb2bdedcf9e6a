//! Negation and logical not.

use mdl_ir::BaseType;

use super::numeric::Numeric;
use super::{mismatch, settle, unsupported};
use crate::expr::Expr;
use crate::outcome::{ErrorKind, Outcome, Value};
use crate::protocol::Protocol;

/// `-x`. Infinities flip sign; special outcomes pass through.
pub(crate) fn negate<P: Protocol>(expr: &Expr, operand: &Expr, p: &mut P) -> Outcome {
    let outcome = p.eval(operand);
    match expr.ty().base() {
        Some(BaseType::Int) => negate_as::<i64, P>(expr, outcome, p),
        Some(BaseType::Real) => negate_as::<f64, P>(expr, outcome, p),
        _ => unsupported(expr, p),
    }
}

fn negate_as<T: Numeric, P: Protocol>(expr: &Expr, outcome: Outcome, p: &mut P) -> Outcome {
    match outcome {
        Outcome::Infinity(sign) => Outcome::Infinity(sign.flip()),
        Outcome::Normal(value) => {
            let Some(x) = T::from_value(&value) else {
                return mismatch(expr, &value, p);
            };
            match x.try_neg() {
                Some(negated) => settle(expr, negated.into_outcome(), p),
                None => p.raise(
                    expr,
                    ErrorKind::Overflow,
                    format_args!("cannot negate {x}"),
                ),
            }
        }
        special => special,
    }
}

/// `!b`. Special outcomes pass through.
pub(crate) fn not<P: Protocol>(expr: &Expr, operand: &Expr, p: &mut P) -> Outcome {
    match p.eval(operand) {
        Outcome::Normal(Value::Bool(b)) => Outcome::bool(!b),
        Outcome::Normal(other) => mismatch(expr, &other, p),
        Outcome::Infinity(_) => p.raise(
            expr,
            ErrorKind::InternalInconsistency,
            "logical negation of infinity",
        ),
        special => special,
    }
}
