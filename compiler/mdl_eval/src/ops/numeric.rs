//! Payload types that support arithmetic.

use std::fmt;

use crate::outcome::{Outcome, Sign, Value};

/// Integer or real payload.
///
/// Sums and products accumulate in [`Numeric::Wide`] and narrow once at
/// the end of the scan, so whether an integer chain overflows depends only
/// on its terms, not on how they are grouped. For integers the wide type
/// is `i128`; for reals it is `f64` itself, where overflow saturates to an
/// infinity instead.
pub(crate) trait Numeric: Copy + PartialOrd + fmt::Display {
    type Wide: Copy;

    const ZERO: Self;
    const WIDE_ZERO: Self::Wide;
    const WIDE_ONE: Self::Wide;

    fn from_value(value: &Value) -> Option<Self>;
    fn into_outcome(self) -> Outcome;

    /// The final total, or `None` if it does not fit in `Self`.
    fn narrow(total: Self::Wide) -> Option<Self>;

    fn wide_add(total: Self::Wide, x: Self) -> Option<Self::Wide>;
    fn wide_sub(total: Self::Wide, x: Self) -> Option<Self::Wide>;
    fn wide_mul(total: Self::Wide, x: Self) -> Option<Self::Wide>;
    /// `x` is never zero.
    fn wide_div(total: Self::Wide, x: Self) -> Option<Self::Wide>;

    fn try_neg(self) -> Option<Self>;

    fn is_zero(self) -> bool;
    fn sign(self) -> Sign;
}

impl Numeric for i64 {
    type Wide = i128;

    const ZERO: Self = 0;
    const WIDE_ZERO: i128 = 0;
    const WIDE_ONE: i128 = 1;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn into_outcome(self) -> Outcome {
        Outcome::int(self)
    }

    fn narrow(total: i128) -> Option<Self> {
        i64::try_from(total).ok()
    }

    fn wide_add(total: i128, x: Self) -> Option<i128> {
        total.checked_add(i128::from(x))
    }

    fn wide_sub(total: i128, x: Self) -> Option<i128> {
        total.checked_sub(i128::from(x))
    }

    fn wide_mul(total: i128, x: Self) -> Option<i128> {
        total.checked_mul(i128::from(x))
    }

    fn wide_div(total: i128, x: Self) -> Option<i128> {
        total.checked_div(i128::from(x))
    }

    fn try_neg(self) -> Option<Self> {
        self.checked_neg()
    }

    fn is_zero(self) -> bool {
        self == 0
    }

    fn sign(self) -> Sign {
        Sign::from_signum(self)
    }
}

impl Numeric for f64 {
    type Wide = f64;

    const ZERO: Self = 0.0;
    const WIDE_ZERO: f64 = 0.0;
    const WIDE_ONE: f64 = 1.0;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Real(x) => Some(*x),
            #[allow(clippy::cast_precision_loss, reason = "int operands of real arithmetic")]
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    fn into_outcome(self) -> Outcome {
        Outcome::real(self)
    }

    fn narrow(total: f64) -> Option<Self> {
        Some(total)
    }

    fn wide_add(total: f64, x: Self) -> Option<f64> {
        Some(total + x)
    }

    fn wide_sub(total: f64, x: Self) -> Option<f64> {
        Some(total - x)
    }

    fn wide_mul(total: f64, x: Self) -> Option<f64> {
        Some(total * x)
    }

    fn wide_div(total: f64, x: Self) -> Option<f64> {
        Some(total / x)
    }

    fn try_neg(self) -> Option<Self> {
        Some(-self)
    }

    #[allow(clippy::float_cmp, reason = "exact zero test")]
    fn is_zero(self) -> bool {
        self == 0.0
    }

    fn sign(self) -> Sign {
        if self < 0.0 {
            Sign::Negative
        } else {
            Sign::Positive
        }
    }
}
