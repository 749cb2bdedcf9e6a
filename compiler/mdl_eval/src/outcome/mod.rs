//! The five-way outcome algebra.
//!
//! Every evaluation produces an [`Outcome`]: a normal payload or one of four
//! special results. When operands of one operator disagree, the special
//! results dominate in a single fixed order:
//!
//! ```text
//! Error > Null > Unknown > Infinity > Normal
//! ```
//!
//! `Error` means the computation faulted (the diagnostic was emitted where
//! the fault was raised), `Null` means a value was undefined by design,
//! `Unknown` means a non-deterministic value queried deterministically.

use std::fmt;
use std::sync::Arc;

use mdl_diagnostic::{Diagnostic, ErrorCode};

use crate::config::DisplayOptions;

/// Sign of an infinite outcome.
///
/// Ordered so that `-infinity < +infinity`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Sign {
    Negative,
    Positive,
}

impl Sign {
    #[must_use]
    pub const fn flip(self) -> Sign {
        match self {
            Sign::Negative => Sign::Positive,
            Sign::Positive => Sign::Negative,
        }
    }

    /// Sign of a product of two factors with these signs.
    #[must_use]
    pub const fn combine(self, other: Sign) -> Sign {
        match (self, other) {
            (Sign::Negative, Sign::Negative) | (Sign::Positive, Sign::Positive) => Sign::Positive,
            (Sign::Negative, Sign::Positive) | (Sign::Positive, Sign::Negative) => Sign::Negative,
        }
    }

    /// Sign from an integer signum; zero counts as positive.
    pub const fn from_signum(value: i64) -> Sign {
        if value < 0 {
            Sign::Negative
        } else {
            Sign::Positive
        }
    }
}

/// Runtime fault carried by an error outcome.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("division by zero")]
    DivideByZero,
    #[error("undefined operation")]
    Undefined,
    #[error("value out of range")]
    OutOfRange,
    #[error("integer overflow")]
    Overflow,
    #[error("internal inconsistency")]
    InternalInconsistency,
}

impl ErrorKind {
    /// Diagnostic code reported for this fault.
    pub const fn error_code(self) -> ErrorCode {
        match self {
            ErrorKind::DivideByZero => ErrorCode::E6001,
            ErrorKind::Undefined => ErrorCode::E6002,
            ErrorKind::OutOfRange => ErrorCode::E6003,
            ErrorKind::Overflow => ErrorCode::E6004,
            ErrorKind::InternalInconsistency => ErrorCode::E9001,
        }
    }

    /// Whether this fault means the engine itself is broken.
    pub const fn is_internal(self) -> bool {
        matches!(self, ErrorKind::InternalInconsistency)
    }

    /// Label text attached to the faulting expression.
    pub const fn primary_label(self) -> &'static str {
        match self {
            ErrorKind::DivideByZero => "divisor evaluates to zero",
            ErrorKind::Undefined => "result is undefined",
            ErrorKind::OutOfRange => "operand is out of range",
            ErrorKind::Overflow => "result does not fit in an integer",
            ErrorKind::InternalInconsistency => "engine invariant violated here",
        }
    }

    /// An empty diagnostic of the right code and severity for this fault.
    pub fn diagnostic(self) -> Diagnostic {
        if self.is_internal() {
            Diagnostic::bug(self.error_code())
        } else {
            Diagnostic::error(self.error_code())
        }
    }
}

/// Payload of a normal outcome.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Result of a state update or sequence.
    Void,
    Bool(bool),
    Int(i64),
    /// Always finite; infinite reals are [`Outcome::Infinity`].
    Real(f64),
    Str(Arc<str>),
    /// Components of an aggregate, each with its own outcome.
    Tuple(Arc<[Outcome]>),
}

impl Value {
    /// Name of the payload's runtime type.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Real(_) => "real",
            Value::Str(_) => "string",
            Value::Tuple(_) => "aggregate",
        }
    }
}

/// Result of evaluating an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Normal(Value),
    Null,
    Unknown,
    Infinity(Sign),
    Error(ErrorKind),
}

impl Outcome {
    #[inline]
    pub fn bool(value: bool) -> Self {
        Outcome::Normal(Value::Bool(value))
    }

    #[inline]
    pub fn int(value: i64) -> Self {
        Outcome::Normal(Value::Int(value))
    }

    /// A real outcome; infinite inputs become [`Outcome::Infinity`] and NaN
    /// becomes an undefined error.
    pub fn real(value: f64) -> Self {
        if value.is_nan() {
            Outcome::Error(ErrorKind::Undefined)
        } else if value.is_infinite() {
            Outcome::Infinity(if value < 0.0 {
                Sign::Negative
            } else {
                Sign::Positive
            })
        } else {
            Outcome::Normal(Value::Real(value))
        }
    }

    pub fn string(value: impl Into<Arc<str>>) -> Self {
        Outcome::Normal(Value::Str(value.into()))
    }

    pub fn tuple(components: impl IntoIterator<Item = Outcome>) -> Self {
        Outcome::Normal(Value::Tuple(components.into_iter().collect()))
    }

    #[inline]
    pub const fn void() -> Self {
        Outcome::Normal(Value::Void)
    }

    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self, Outcome::Normal(_))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Outcome::Null)
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Outcome::Unknown)
    }

    #[inline]
    pub fn is_infinity(&self) -> bool {
        matches!(self, Outcome::Infinity(_))
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Outcome::Normal(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Outcome::Normal(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Outcome::Normal(Value::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Outcome::Normal(Value::Real(x)) => Some(*x),
            _ => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Error(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn infinity_sign(&self) -> Option<Sign> {
        match self {
            Outcome::Infinity(sign) => Some(*sign),
            _ => None,
        }
    }

    /// Rank in the dominance order; higher wins.
    fn rank(&self) -> u8 {
        match self {
            Outcome::Normal(_) => 0,
            Outcome::Infinity(_) => 1,
            Outcome::Unknown => 2,
            Outcome::Null => 3,
            Outcome::Error(_) => 4,
        }
    }

    /// The special outcome that decides a pair of operands, if any.
    ///
    /// Returns the left operand on a tie, so the first faulting operand is
    /// the one propagated. Infinities are not returned: they take part in
    /// the operator's own arithmetic.
    pub fn dominant(left: &Outcome, right: &Outcome) -> Option<Outcome> {
        Self::dominant_in([left, right])
    }

    /// [`Outcome::dominant`] over any number of operands.
    pub fn dominant_in<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> Option<Outcome> {
        let mut best: Option<&Outcome> = None;
        for outcome in outcomes {
            if outcome.rank() < 2 {
                continue;
            }
            if best.map_or(true, |b| outcome.rank() > b.rank()) {
                best = Some(outcome);
            }
        }
        best.cloned()
    }

    /// Printable form using the given spelling of special outcomes.
    pub fn display<'a>(&'a self, options: &'a DisplayOptions) -> OutcomeDisplay<'a> {
        OutcomeDisplay {
            outcome: self,
            options,
        }
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Outcome::Normal(value)
    }
}

impl From<ErrorKind> for Outcome {
    fn from(kind: ErrorKind) -> Self {
        Outcome::Error(kind)
    }
}

/// [`Outcome`] paired with [`DisplayOptions`] for printing.
pub struct OutcomeDisplay<'a> {
    outcome: &'a Outcome,
    options: &'a DisplayOptions,
}

impl fmt::Display for OutcomeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = self.options;
        match self.outcome {
            Outcome::Normal(value) => write_value(f, value, options),
            Outcome::Null => f.write_str(&options.null),
            Outcome::Unknown => f.write_str(&options.unknown),
            Outcome::Infinity(Sign::Positive) => f.write_str(&options.infinity),
            Outcome::Infinity(Sign::Negative) => write!(f, "-{}", options.infinity),
            Outcome::Error(kind) => write!(f, "<error: {kind}>"),
        }
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, options: &DisplayOptions) -> fmt::Result {
    match value {
        Value::Void => f.write_str("void"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Int(i) => write!(f, "{i}"),
        Value::Real(x) => match options.real_precision {
            Some(precision) => write!(f, "{x:.precision$}"),
            None => write!(f, "{x:?}"),
        },
        Value::Str(s) => write!(f, "{s:?}"),
        Value::Tuple(components) => {
            f.write_str("(")?;
            for (i, component) in components.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                fmt::Display::fmt(&component.display(options), f)?;
            }
            f.write_str(")")
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display(&DisplayOptions::default()), f)
    }
}
