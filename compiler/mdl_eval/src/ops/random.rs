//! Draws from discrete and continuous distributions.
//!
//! Every draw consumes exactly one uniform variate and maps it through the
//! inverse distribution function, so a seeded generator makes `sample`
//! reproducible. The variate is taken even when the parameters end the
//! draw early, so each visited draw advances the stream by one.

use smallvec::SmallVec;

use crate::expr::{Distribution, Expr, Operand};
use crate::outcome::{ErrorKind, Outcome, Value};
use crate::protocol::Protocol;

/// Draw from `dist` with the given parameter operands.
///
/// Parameters are evaluated first, then the variate is drawn. Outside
/// `sample` the draw is unknown unless a parameter faulted.
pub(crate) fn draw<P: Protocol>(
    expr: &Expr,
    dist: Distribution,
    params: &[Operand],
    p: &mut P,
) -> Outcome {
    let args: SmallVec<[Outcome; 2]> = params.iter().map(|o| p.eval(&o.expr)).collect();
    let u = p.uniform();
    if let Some(special) = Outcome::dominant_in(&args) {
        return special;
    }
    let Some(u) = u else {
        return Outcome::Unknown;
    };
    match dist {
        Distribution::Bernoulli => match real_param(&args, 0) {
            Some(prob) if (0.0..=1.0).contains(&prob) => Outcome::bool(u < prob),
            _ => out_of_range(expr, dist, p),
        },
        Distribution::Uniform => match (real_param(&args, 0), real_param(&args, 1)) {
            (Some(a), Some(b)) if a <= b => Outcome::real(u.mul_add(b - a, a)),
            _ => out_of_range(expr, dist, p),
        },
        Distribution::Equilikely => match (int_param(&args, 0), int_param(&args, 1)) {
            (Some(a), Some(b)) if a <= b => Outcome::int(equilikely(a, b, u)),
            _ => out_of_range(expr, dist, p),
        },
    }
}

/// `a + floor((b - a + 1) * u)`, clamped to `b` against rounding.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    reason = "offset is within [0, b - a]"
)]
fn equilikely(a: i64, b: i64, u: f64) -> i64 {
    let span = (i128::from(b) - i128::from(a) + 1) as f64;
    let offset = (span * u).floor() as i128;
    let value = (i128::from(a) + offset).min(i128::from(b));
    i64::try_from(value).unwrap_or(b)
}

/// Finite real parameter; infinite parameters are out of range.
fn real_param(args: &[Outcome], index: usize) -> Option<f64> {
    match args.get(index)? {
        Outcome::Normal(Value::Real(x)) => Some(*x),
        #[allow(clippy::cast_precision_loss, reason = "int parameters of real draws")]
        Outcome::Normal(Value::Int(i)) => Some(*i as f64),
        _ => None,
    }
}

fn int_param(args: &[Outcome], index: usize) -> Option<i64> {
    match args.get(index)? {
        Outcome::Normal(Value::Int(i)) => Some(*i),
        _ => None,
    }
}

#[cold]
fn out_of_range<P: Protocol>(expr: &Expr, dist: Distribution, p: &mut P) -> Outcome {
    p.raise(
        expr,
        ErrorKind::OutOfRange,
        format_args!("invalid parameters for {}", dist.name()),
    )
}
