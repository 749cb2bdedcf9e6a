//! Evaluation configuration.
//!
//! Everything here is read-only during evaluation; drivers build one
//! [`EvalConfig`] and hand a reference to every [`EvalContext`](crate::EvalContext).

/// Settings shared by all three evaluation protocols.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EvalConfig {
    /// How relational operators decide that two reals are equal.
    pub real_compare: RealCompare,
    /// Spelling of special outcomes when expressions and outcomes are printed.
    pub display: DisplayOptions,
}

/// Equality test used when comparing real payloads.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RealCompare {
    /// Bitwise IEEE equality.
    #[default]
    Exact,
    /// Equal when `|a - b| <= epsilon`.
    Absolute(f64),
    /// Equal when `|a - b| <= epsilon * max(|a|, |b|)`.
    Relative(f64),
}

impl RealCompare {
    /// Whether `a` and `b` compare equal under this mode.
    #[allow(clippy::float_cmp, reason = "exact mode is IEEE equality")]
    pub fn approx_eq(self, a: f64, b: f64) -> bool {
        match self {
            RealCompare::Exact => a == b,
            RealCompare::Absolute(epsilon) => (a - b).abs() <= epsilon,
            RealCompare::Relative(epsilon) => (a - b).abs() <= epsilon * a.abs().max(b.abs()),
        }
    }
}

/// Spelling of outcomes in printed expressions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DisplayOptions {
    /// Printed for positive infinity; negative infinity gets a leading `-`.
    pub infinity: String,
    pub null: String,
    pub unknown: String,
    /// Digits after the decimal point for reals; `None` prints the shortest
    /// representation that round-trips.
    pub real_precision: Option<usize>,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            infinity: "infinity".to_string(),
            null: "null".to_string(),
            unknown: "?".to_string(),
            real_precision: None,
        }
    }
}
