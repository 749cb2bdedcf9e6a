//! Integer remainder.

use super::mismatch;
use crate::expr::Expr;
use crate::outcome::{ErrorKind, Outcome, Value};
use crate::protocol::Protocol;

/// `left % right`, with the sign of `left`.
///
/// A zero divisor is an error, as is an infinite dividend; a finite value
/// modulo an infinity is the value itself.
pub(crate) fn evaluate<P: Protocol>(expr: &Expr, left: Outcome, right: Outcome, p: &mut P) -> Outcome {
    if let Some(special) = Outcome::dominant(&left, &right) {
        return special;
    }
    match (left, right) {
        (_, Outcome::Normal(Value::Int(0))) => {
            p.raise(expr, ErrorKind::DivideByZero, "remainder by zero")
        }
        (Outcome::Infinity(_), _) => p.raise(expr, ErrorKind::Undefined, "remainder of infinity"),
        (Outcome::Normal(Value::Int(a)), Outcome::Infinity(_)) => Outcome::int(a),
        (Outcome::Normal(Value::Int(a)), Outcome::Normal(Value::Int(b))) => match a.checked_rem(b) {
            Some(r) => Outcome::int(r),
            None => p.raise(
                expr,
                ErrorKind::Overflow,
                format_args!("{a} % {b} does not fit in an integer"),
            ),
        },
        (Outcome::Normal(other), _) | (_, Outcome::Normal(other)) => mismatch(expr, &other, p),
        _ => p.raise(
            expr,
            ErrorKind::InternalInconsistency,
            "special outcome escaped dominance check",
        ),
    }
}
