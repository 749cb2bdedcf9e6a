//! Sums: `+` and `-` over ints and reals, `+` over strings.

use mdl_ir::BaseType;

use super::numeric::Numeric;
use super::{mismatch, settle, unsupported};
use crate::expr::Expr;
use crate::outcome::{ErrorKind, Outcome, Sign, Value};
use crate::protocol::Protocol;

/// Evaluate a sum of `terms`; an inverted term is subtracted.
pub(crate) fn evaluate<'e, P: Protocol>(
    expr: &Expr,
    terms: impl IntoIterator<Item = (&'e Expr, bool)>,
    p: &mut P,
) -> Outcome {
    match expr.ty().base() {
        Some(BaseType::Int) => accumulate::<i64, P>(expr, terms, p),
        Some(BaseType::Real) => accumulate::<f64, P>(expr, terms, p),
        Some(BaseType::Str) => concatenate(expr, terms, p),
        _ => unsupported(expr, p),
    }
}

/// Running sum over numeric terms.
///
/// Terms are scanned left to right. An error term ends the scan. After a
/// null term the remaining terms are still evaluated, but only an error can
/// change the result. Once an infinity has been absorbed, finite terms are
/// skipped and an infinity of the opposite sign is undefined. Unknown terms
/// and integer overflow are deferred to the end of the scan, where an
/// infinity takes precedence over both. The total is kept wide and only
/// narrowed once, so `MAX + 1 - 1` is `MAX` however it is grouped.
fn accumulate<'e, T: Numeric, P: Protocol>(
    expr: &Expr,
    terms: impl IntoIterator<Item = (&'e Expr, bool)>,
    p: &mut P,
) -> Outcome {
    let mut total = T::WIDE_ZERO;
    let mut infinity: Option<Sign> = None;
    let mut null = false;
    let mut unknown = false;
    let mut overflow = false;

    for (term, inverted) in terms {
        let outcome = p.eval(term);
        if null {
            if outcome.is_error() {
                return outcome;
            }
            continue;
        }
        match outcome {
            Outcome::Error(_) => return outcome,
            Outcome::Null => null = true,
            Outcome::Unknown => unknown = true,
            Outcome::Infinity(sign) => {
                let sign = if inverted { sign.flip() } else { sign };
                match infinity {
                    Some(seen) if seen != sign => {
                        return p.raise(
                            expr,
                            ErrorKind::Undefined,
                            "infinity minus infinity",
                        );
                    }
                    _ => infinity = Some(sign),
                }
            }
            Outcome::Normal(value) => {
                let Some(x) = T::from_value(&value) else {
                    return mismatch(expr, &value, p);
                };
                if infinity.is_some() || overflow {
                    continue;
                }
                let next = if inverted {
                    T::wide_sub(total, x)
                } else {
                    T::wide_add(total, x)
                };
                match next {
                    Some(value) => total = value,
                    None => overflow = true,
                }
            }
        }
    }

    if null {
        Outcome::Null
    } else if let Some(sign) = infinity {
        Outcome::Infinity(sign)
    } else if unknown {
        Outcome::Unknown
    } else {
        match T::narrow(total).filter(|_| !overflow) {
            Some(total) => settle(expr, total.into_outcome(), p),
            None => p.raise(expr, ErrorKind::Overflow, "sum does not fit in an integer"),
        }
    }
}

/// String concatenation; same treatment of special terms as numeric sums.
fn concatenate<'e, P: Protocol>(
    expr: &Expr,
    terms: impl IntoIterator<Item = (&'e Expr, bool)>,
    p: &mut P,
) -> Outcome {
    let mut text = String::new();
    let mut null = false;
    let mut unknown = false;

    for (term, _) in terms {
        let outcome = p.eval(term);
        if null {
            if outcome.is_error() {
                return outcome;
            }
            continue;
        }
        match outcome {
            Outcome::Error(_) => return outcome,
            Outcome::Null => null = true,
            Outcome::Unknown => unknown = true,
            Outcome::Normal(Value::Str(part)) => text.push_str(&part),
            Outcome::Normal(other) => return mismatch(expr, &other, p),
            Outcome::Infinity(_) => {
                return p.raise(
                    expr,
                    ErrorKind::InternalInconsistency,
                    "infinite string operand",
                );
            }
        }
    }

    if null {
        Outcome::Null
    } else if unknown {
        Outcome::Unknown
    } else {
        Outcome::string(text)
    }
}
