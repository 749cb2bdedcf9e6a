//! Unary, binary and associative operators.
//!
//! Binary sums/products and their n-ary counterparts are distinct operators:
//! the builder produces binary nodes, and the associative optimizer folds
//! chains of them into a single [`AssocOp`] node.

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    /// Arithmetic negation (`-x`).
    Neg,
    /// Logical negation (`!b`).
    Not,
}

impl UnaryOp {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    ///
    /// Used by the printer and in diagnostics.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&",
            Self::Or => "|",
        }
    }

    /// Returns the precedence level of this operator.
    ///
    /// Higher number = lower precedence (binds less tightly).
    /// - 3: `*` `/` `%`
    /// - 4: `+` `-`
    /// - 7: `<` `>` `<=` `>=`
    /// - 8: `==` `!=`
    /// - 12: `&`
    /// - 13: `|`
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Mod => 3,
            Self::Add | Self::Sub => 4,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 7,
            Self::Eq | Self::NotEq => 8,
            Self::And => 12,
            Self::Or => 13,
        }
    }

    /// Whether this is one of the six relational operators.
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }

    /// The associative operator a chain of this operator flattens into,
    /// and whether the right operand enters that chain inverted
    /// (negated for `-`, reciprocated for `/`).
    pub const fn assoc_form(self) -> Option<(AssocOp, bool)> {
        match self {
            Self::Add => Some((AssocOp::Add, false)),
            Self::Sub => Some((AssocOp::Add, true)),
            Self::Mul => Some((AssocOp::Mul, false)),
            Self::Div => Some((AssocOp::Mul, true)),
            Self::And => Some((AssocOp::And, false)),
            Self::Or => Some((AssocOp::Or, false)),
            _ => None,
        }
    }
}

/// N-ary associative operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssocOp {
    /// Sum; inverted operands are subtracted.
    Add,
    /// Product; inverted operands divide.
    Mul,
    /// Short-circuit disjunction.
    Or,
    /// Short-circuit conjunction.
    And,
    /// Left-to-right application of state changes.
    Sequence,
}

impl AssocOp {
    /// Symbol printed between operands.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Mul => "*",
            Self::Or => "|",
            Self::And => "&",
            Self::Sequence => ";",
        }
    }

    /// Symbol printed before an inverted operand, if the operator has one.
    pub const fn inverse_symbol(self) -> Option<&'static str> {
        match self {
            Self::Add => Some("-"),
            Self::Mul => Some("/"),
            Self::Or | Self::And | Self::Sequence => None,
        }
    }
}
