//! Short-circuit `|` and `&`.

use super::mismatch;
use crate::expr::Expr;
use crate::outcome::{ErrorKind, Outcome, Value};
use crate::protocol::Protocol;

/// Scan `operands` left to right until one is `conclusive` (`true` for
/// `|`, `false` for `&`).
///
/// An error or null operand ends the scan and is the result. An unknown
/// operand does not end the scan; it makes the result unknown unless a
/// later operand is conclusive.
pub(crate) fn evaluate<'e, P: Protocol>(
    expr: &Expr,
    conclusive: bool,
    operands: impl IntoIterator<Item = &'e Expr>,
    p: &mut P,
) -> Outcome {
    let mut unknown = false;
    for operand in operands {
        match p.eval(operand) {
            Outcome::Normal(Value::Bool(b)) if b == conclusive => return Outcome::bool(conclusive),
            Outcome::Normal(Value::Bool(_)) => {}
            Outcome::Unknown => unknown = true,
            Outcome::Normal(other) => return mismatch(expr, &other, p),
            Outcome::Infinity(_) => {
                return p.raise(
                    expr,
                    ErrorKind::InternalInconsistency,
                    "infinite logical operand",
                );
            }
            special @ (Outcome::Error(_) | Outcome::Null) => return special,
        }
    }
    if unknown {
        Outcome::Unknown
    } else {
        Outcome::bool(!conclusive)
    }
}
