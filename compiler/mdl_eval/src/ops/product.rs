//! Products: `*` and `/` over ints and reals.

use mdl_ir::BaseType;

use super::numeric::Numeric;
use super::{mismatch, settle, unsupported};
use crate::expr::Expr;
use crate::outcome::{ErrorKind, Outcome, Sign};
use crate::protocol::Protocol;

/// Evaluate a product of `terms`; an inverted term divides.
pub(crate) fn evaluate<'e, P: Protocol>(
    expr: &Expr,
    terms: impl IntoIterator<Item = (&'e Expr, bool)>,
    p: &mut P,
) -> Outcome {
    match expr.ty().base() {
        Some(BaseType::Int) => accumulate::<i64, P>(expr, terms, p),
        Some(BaseType::Real) => accumulate::<f64, P>(expr, terms, p),
        _ => unsupported(expr, p),
    }
}

/// Three-state product accumulator: finite, zero, or infinite.
///
/// A zero factor and an infinite factor together are undefined whichever
/// comes first; dividing by an infinity contributes a zero factor and
/// dividing by zero is an error. Error and null terms are handled as in
/// sums. An unknown factor is absorbed by a zero or infinite result and
/// makes a finite result unknown. Integer overflow is decided on the wide
/// product at the end of the scan, after a zero factor has had its say.
fn accumulate<'e, T: Numeric, P: Protocol>(
    expr: &Expr,
    terms: impl IntoIterator<Item = (&'e Expr, bool)>,
    p: &mut P,
) -> Outcome {
    let mut product = T::WIDE_ONE;
    let mut sign = Sign::Positive;
    let mut zero = false;
    let mut infinite = false;
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
            Outcome::Infinity(_) if inverted => zero = true,
            Outcome::Infinity(factor) => {
                infinite = true;
                sign = sign.combine(factor);
            }
            Outcome::Normal(value) => {
                let Some(x) = T::from_value(&value) else {
                    return mismatch(expr, &value, p);
                };
                if x.is_zero() {
                    if inverted {
                        return p.raise(expr, ErrorKind::DivideByZero, "divisor is zero");
                    }
                    zero = true;
                } else {
                    sign = sign.combine(x.sign());
                    if !zero && !overflow {
                        let next = if inverted {
                            T::wide_div(product, x)
                        } else {
                            T::wide_mul(product, x)
                        };
                        match next {
                            Some(value) => product = value,
                            None => overflow = true,
                        }
                    }
                }
            }
        }
        if zero && infinite {
            return p.raise(expr, ErrorKind::Undefined, "zero times infinity");
        }
    }

    if null {
        Outcome::Null
    } else if infinite {
        Outcome::Infinity(sign)
    } else if zero {
        T::ZERO.into_outcome()
    } else if unknown {
        Outcome::Unknown
    } else {
        match T::narrow(product).filter(|_| !overflow) {
            Some(product) => settle(expr, product.into_outcome(), p),
            None => p.raise(expr, ErrorKind::Overflow, "product does not fit in an integer"),
        }
    }
}
