//! Typecasts.
//!
//! Which `(source, target)` base pairs may be converted is decided by one
//! static table built on first use. Qualifiers are checked separately: a
//! cast may add `rand`/`proc` but never drop them, and a change of
//! qualifiers alone produces a [`CastKind::Lift`] node that evaluates its
//! operand unchanged.

use std::sync::OnceLock;

use mdl_diagnostic::{Diagnostic, ErrorCode};
use mdl_ir::{BaseType, ScalarType, Type};
use rustc_hash::FxHashMap;

use crate::expr::{AssocKind, Expr, ExprKind, Operand, UnaryKind};
use crate::ops::mismatch;
use crate::outcome::{ErrorKind, Outcome, Sign, Value};
use crate::protocol::Protocol;

/// Conversion performed by a cast node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CastKind {
    /// Same payload, added qualifiers.
    Lift,
    IntToReal,
    /// Truncation toward zero.
    RealToInt,
    /// Draw from an exponential distribution with the operand as rate.
    ExpoToRandomReal,
}

impl CastKind {
    /// Name printed for the cast (`real(x)`).
    pub const fn name(self) -> &'static str {
        match self {
            CastKind::Lift => "",
            CastKind::IntToReal => "real",
            CastKind::RealToInt => "int",
            CastKind::ExpoToRandomReal => "expo",
        }
    }
}

/// Entry of the cast table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CastRule {
    /// Bases already agree.
    Identity,
    Convert(CastKind),
    Reject,
}

/// The `(source base, target base)` dispatch table.
#[derive(Debug)]
pub struct CastTable {
    rules: FxHashMap<(BaseType, BaseType), CastRule>,
}

const BASES: [BaseType; 6] = [
    BaseType::Void,
    BaseType::Bool,
    BaseType::Int,
    BaseType::Real,
    BaseType::Str,
    BaseType::Expo,
];

impl CastTable {
    /// The process-wide table.
    pub fn global() -> &'static CastTable {
        static TABLE: OnceLock<CastTable> = OnceLock::new();
        TABLE.get_or_init(CastTable::build)
    }

    fn build() -> Self {
        let mut rules = FxHashMap::default();
        for base in BASES {
            rules.insert((base, base), CastRule::Identity);
        }
        rules.insert(
            (BaseType::Int, BaseType::Real),
            CastRule::Convert(CastKind::IntToReal),
        );
        rules.insert(
            (BaseType::Real, BaseType::Int),
            CastRule::Convert(CastKind::RealToInt),
        );
        rules.insert(
            (BaseType::Expo, BaseType::Real),
            CastRule::Convert(CastKind::ExpoToRandomReal),
        );
        CastTable { rules }
    }

    /// Rule for casting `from` to `to`; pairs not in the table are rejected.
    pub fn rule(&self, from: BaseType, to: BaseType) -> CastRule {
        self.rules
            .get(&(from, to))
            .copied()
            .unwrap_or(CastRule::Reject)
    }
}

/// Cast `expr` to `target`.
///
/// Returns `expr` itself when it already has the target type. Aggregates
/// are cast component by component; only aggregate nodes can be.
pub fn make_typecast(expr: &Expr, target: &Type) -> Result<Expr, Diagnostic> {
    if expr.ty() == target {
        return Ok(expr.clone());
    }
    match (expr.ty(), target) {
        (Type::Scalar(from), Type::Scalar(to)) => cast_scalar(expr, *from, *to),
        (Type::Aggregate(from), Type::Aggregate(to)) if from.len() == to.len() => {
            cast_aggregate(expr, to)
        }
        _ => Err(illegal_cast(expr, target)),
    }
}

fn cast_scalar(expr: &Expr, from: ScalarType, to: ScalarType) -> Result<Expr, Diagnostic> {
    let target = Type::Scalar(to);
    if !to.modifiers.contains(from.modifiers) {
        return Err(illegal_cast(expr, &target)
            .with_note("`rand` and `proc` qualifiers cannot be cast away"));
    }
    match CastTable::global().rule(from.base, to.base) {
        CastRule::Identity => Ok(cast_node(expr, CastKind::Lift, target)),
        CastRule::Convert(CastKind::ExpoToRandomReal) if !to.is_random() => Err(illegal_cast(
            expr, &target,
        )
        .with_note("an exponential rate converts only to `rand real`")),
        CastRule::Convert(kind) => Ok(cast_node(expr, kind, target)),
        CastRule::Reject => Err(illegal_cast(expr, &target)),
    }
}

fn cast_aggregate(expr: &Expr, targets: &[Type]) -> Result<Expr, Diagnostic> {
    let ExprKind::Assoc {
        op: AssocKind::Aggregate,
        operands,
    } = expr.kind()
    else {
        return Err(illegal_cast(expr, &Type::aggregate(targets.iter().cloned()))
            .with_note("only aggregate expressions can be cast component-wise"));
    };

    let mut changed = false;
    let mut components = Vec::with_capacity(operands.len());
    for (operand, target) in operands.iter().zip(targets) {
        let component = make_typecast(&operand.expr, target)?;
        changed |= !component.ptr_eq(&operand.expr);
        components.push(Operand::new(component));
    }
    if !changed {
        return Ok(expr.clone());
    }
    Ok(Expr::assoc(
        AssocKind::Aggregate,
        components,
        Type::aggregate(targets.iter().cloned()),
        expr.location().clone(),
    ))
}

fn cast_node(expr: &Expr, kind: CastKind, target: Type) -> Expr {
    Expr::new(
        ExprKind::Unary {
            op: UnaryKind::Cast(kind),
            operand: expr.clone(),
        },
        target,
        expr.location().clone(),
    )
}

#[cold]
fn illegal_cast(expr: &Expr, target: &Type) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message(format!("cannot cast `{}` to `{target}`", expr.ty()))
        .with_label(expr.location().clone(), "cast requested here")
}

/// Evaluate a cast node.
pub(crate) fn apply<P: Protocol>(expr: &Expr, cast: CastKind, operand: &Expr, p: &mut P) -> Outcome {
    match cast {
        CastKind::Lift => p.eval(operand),
        CastKind::IntToReal => match p.eval(operand) {
            #[allow(clippy::cast_precision_loss, reason = "int to real rounds to nearest")]
            Outcome::Normal(Value::Int(i)) => Outcome::real(i as f64),
            Outcome::Normal(other) => mismatch(expr, &other, p),
            special => special,
        },
        CastKind::RealToInt => match p.eval(operand) {
            Outcome::Normal(Value::Real(x)) => truncate(expr, x, p),
            Outcome::Normal(other) => mismatch(expr, &other, p),
            special => special,
        },
        CastKind::ExpoToRandomReal => exponential(expr, operand, p),
    }
}

/// Smallest real that no longer fits in an `i64` after truncation.
#[allow(clippy::cast_precision_loss, reason = "2^63 is exact in f64")]
const INT_LIMIT: f64 = i64::MAX as f64;

fn truncate<P: Protocol>(expr: &Expr, x: f64, p: &mut P) -> Outcome {
    let truncated = x.trunc();
    if truncated >= -INT_LIMIT && truncated < INT_LIMIT {
        #[allow(clippy::cast_possible_truncation, reason = "range checked above")]
        let value = truncated as i64;
        Outcome::int(value)
    } else {
        p.raise(
            expr,
            ErrorKind::OutOfRange,
            format_args!("{x} does not fit in an integer"),
        )
    }
}

/// Exponential variate by inversion: `-ln(1 - u) / rate`.
///
/// A zero rate is the constant infinity and an infinite rate the constant
/// zero, under every protocol. Other rates draw one uniform when sampling
/// and are unknown otherwise.
fn exponential<P: Protocol>(expr: &Expr, operand: &Expr, p: &mut P) -> Outcome {
    let rate = p.eval(operand);
    let u = p.uniform();
    let rate = match rate {
        Outcome::Normal(Value::Real(rate)) => rate,
        Outcome::Infinity(Sign::Positive) => return Outcome::real(0.0),
        Outcome::Infinity(Sign::Negative) => {
            return p.raise(expr, ErrorKind::OutOfRange, "exponential rate is negative")
        }
        Outcome::Normal(other) => return mismatch(expr, &other, p),
        special => return special,
    };
    if rate < 0.0 {
        return p.raise(
            expr,
            ErrorKind::OutOfRange,
            format_args!("exponential rate {rate} is negative"),
        );
    }
    if rate == 0.0 {
        return Outcome::Infinity(Sign::Positive);
    }
    match u {
        Some(u) => Outcome::real(-(-u).ln_1p() / rate),
        None => Outcome::Unknown,
    }
}
