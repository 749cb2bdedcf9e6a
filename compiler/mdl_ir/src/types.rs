//! Static expression types.
//!
//! A type is protocol-independent: it records the primitive payload
//! (`BaseType`) and whether the value is random and/or process-dependent
//! (`Modifiers`). The evaluation protocol a driver picks is orthogonal.

use std::fmt;
use std::sync::Arc;

/// Primitive payload type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BaseType {
    Void,
    Bool,
    Int,
    Real,
    Str,
    /// Rate parameter of an exponential distribution.
    Expo,
}

impl BaseType {
    /// Keyword used by the printer and in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Real => "real",
            Self::Str => "string",
            Self::Expo => "expo",
        }
    }

    /// Whether values of this type support arithmetic.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Real)
    }

    /// Whether this type admits signed infinity as a value.
    pub const fn admits_infinity(self) -> bool {
        matches!(self, Self::Int | Self::Real | Self::Expo)
    }
}

bitflags::bitflags! {
    /// Protocol qualifiers of a type.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Modifiers: u8 {
        /// Value is drawn from a distribution (`rand`).
        const RANDOM = 1 << 0;
        /// Value depends on or changes the process state (`proc`).
        const PROCESS = 1 << 1;
    }
}

/// A primitive type together with its protocol qualifiers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarType {
    pub base: BaseType,
    pub modifiers: Modifiers,
}

impl ScalarType {
    pub const fn new(base: BaseType, modifiers: Modifiers) -> Self {
        ScalarType { base, modifiers }
    }

    /// An unqualified (deterministic, state-free) type.
    pub const fn deterministic(base: BaseType) -> Self {
        ScalarType {
            base,
            modifiers: Modifiers::empty(),
        }
    }

    pub const fn is_random(self) -> bool {
        self.modifiers.contains(Modifiers::RANDOM)
    }

    pub const fn is_process(self) -> bool {
        self.modifiers.contains(Modifiers::PROCESS)
    }

    /// Common type of two scalars, if there is one.
    ///
    /// Bases must match, except that `int` and `real` meet at `real`.
    /// Qualifiers are unioned: mixing a `rand` operand into an expression
    /// makes the whole expression `rand`.
    pub fn join(self, other: ScalarType) -> Option<ScalarType> {
        let base = match (self.base, other.base) {
            (a, b) if a == b => a,
            (BaseType::Int, BaseType::Real) | (BaseType::Real, BaseType::Int) => BaseType::Real,
            _ => return None,
        };
        Some(ScalarType::new(base, self.modifiers | other.modifiers))
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_process() {
            f.write_str("proc ")?;
        }
        if self.is_random() {
            f.write_str("rand ")?;
        }
        f.write_str(self.base.name())
    }
}

/// Static type of an expression.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    Scalar(ScalarType),
    /// Tuple-like aggregate; components are cast and evaluated one by one.
    Aggregate(Arc<[Type]>),
}

impl Type {
    pub const VOID: Type = Type::Scalar(ScalarType::deterministic(BaseType::Void));
    pub const BOOL: Type = Type::Scalar(ScalarType::deterministic(BaseType::Bool));
    pub const INT: Type = Type::Scalar(ScalarType::deterministic(BaseType::Int));
    pub const REAL: Type = Type::Scalar(ScalarType::deterministic(BaseType::Real));
    pub const STR: Type = Type::Scalar(ScalarType::deterministic(BaseType::Str));
    pub const EXPO: Type = Type::Scalar(ScalarType::deterministic(BaseType::Expo));

    /// A scalar type with explicit qualifiers.
    pub const fn scalar(base: BaseType, modifiers: Modifiers) -> Self {
        Type::Scalar(ScalarType::new(base, modifiers))
    }

    /// `rand <base>`.
    pub const fn random(base: BaseType) -> Self {
        Type::scalar(base, Modifiers::RANDOM)
    }

    /// `proc <base>`.
    pub const fn process(base: BaseType) -> Self {
        Type::scalar(base, Modifiers::PROCESS)
    }

    /// Aggregate of the given component types.
    pub fn aggregate(components: impl IntoIterator<Item = Type>) -> Self {
        Type::Aggregate(components.into_iter().collect())
    }

    /// The scalar view of this type, if it is not an aggregate.
    pub fn as_scalar(&self) -> Option<ScalarType> {
        match self {
            Type::Scalar(scalar) => Some(*scalar),
            Type::Aggregate(_) => None,
        }
    }

    /// The primitive payload type, if this is a scalar.
    pub fn base(&self) -> Option<BaseType> {
        self.as_scalar().map(|scalar| scalar.base)
    }

    /// Qualifiers of this type; an aggregate carries the union of its
    /// components' qualifiers.
    pub fn modifiers(&self) -> Modifiers {
        match self {
            Type::Scalar(scalar) => scalar.modifiers,
            Type::Aggregate(components) => components
                .iter()
                .fold(Modifiers::empty(), |acc, t| acc | t.modifiers()),
        }
    }

    pub fn is_random(&self) -> bool {
        self.modifiers().contains(Modifiers::RANDOM)
    }

    pub fn is_process(&self) -> bool {
        self.modifiers().contains(Modifiers::PROCESS)
    }

    /// Whether this is a scalar of the given base, regardless of qualifiers.
    pub fn has_base(&self, base: BaseType) -> bool {
        self.base() == Some(base)
    }

    /// Common scalar type of two types (see [`ScalarType::join`]).
    pub fn join(&self, other: &Type) -> Option<Type> {
        let joined = self.as_scalar()?.join(other.as_scalar()?)?;
        Some(Type::Scalar(joined))
    }

    /// Same qualifiers, different base. Aggregates have no single base.
    pub fn with_base(&self, base: BaseType) -> Option<Type> {
        self.as_scalar()
            .map(|scalar| Type::scalar(base, scalar.modifiers))
    }
}

impl From<ScalarType> for Type {
    fn from(scalar: ScalarType) -> Self {
        Type::Scalar(scalar)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Scalar(scalar) => fmt::Display::fmt(scalar, f),
            Type::Aggregate(components) => {
                f.write_str("(")?;
                for (i, component) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(component, f)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_qualifiers() {
        assert_eq!(Type::INT.to_string(), "int");
        assert_eq!(Type::random(BaseType::Real).to_string(), "rand real");
        assert_eq!(
            Type::scalar(BaseType::Int, Modifiers::RANDOM | Modifiers::PROCESS).to_string(),
            "proc rand int"
        );
        assert_eq!(
            Type::aggregate([Type::INT, Type::BOOL]).to_string(),
            "(int, bool)"
        );
    }

    #[test]
    fn test_join_promotes_int_to_real() {
        assert_eq!(Type::INT.join(&Type::REAL), Some(Type::REAL));
        assert_eq!(Type::REAL.join(&Type::INT), Some(Type::REAL));
        assert_eq!(Type::INT.join(&Type::INT), Some(Type::INT));
    }

    #[test]
    fn test_join_unions_modifiers() {
        let joined = Type::random(BaseType::Int).join(&Type::process(BaseType::Real));
        assert_eq!(
            joined,
            Some(Type::scalar(
                BaseType::Real,
                Modifiers::RANDOM | Modifiers::PROCESS
            ))
        );
    }

    #[test]
    fn test_join_rejects_unrelated_bases() {
        assert_eq!(Type::BOOL.join(&Type::INT), None);
        assert_eq!(Type::STR.join(&Type::REAL), None);
        assert_eq!(Type::aggregate([Type::INT]).join(&Type::INT), None);
    }

    #[test]
    fn test_aggregate_modifiers() {
        let t = Type::aggregate([Type::INT, Type::random(BaseType::Bool)]);
        assert!(t.is_random());
        assert!(!t.is_process());
        assert_eq!(t.base(), None);
    }

    #[test]
    fn test_base_properties() {
        assert!(BaseType::Int.is_numeric());
        assert!(!BaseType::Expo.is_numeric());
        assert!(BaseType::Expo.admits_infinity());
        assert!(!BaseType::Bool.admits_infinity());
    }
}
