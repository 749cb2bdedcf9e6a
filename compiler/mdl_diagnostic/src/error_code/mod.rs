//! Error codes for all engine diagnostics.
//!
//! Each code is a unique identifier (e.g. `E6001`) whose first digit names
//! the phase that produced it.

use std::fmt;

/// Error codes for all engine diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E2xxx: Build errors (node construction, typecast table)
/// - E6xxx: Runtime / evaluation errors
/// - E9xxx: Internal errors (broken invariants)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Build Errors (E2xxx)
    /// Illegal typecast
    E2001,
    /// Operand type not accepted by operator
    E2002,
    /// Associative node built without operands
    E2003,
    /// Literal payload does not match its declared type
    E2004,

    // Runtime / Eval Errors (E6xxx)
    /// Division by zero
    E6001,
    /// Undefined infinity arithmetic
    E6002,
    /// Value out of range
    E6003,
    /// Integer overflow
    E6004,

    // Internal Errors (E9xxx)
    /// Internal inconsistency
    E9001,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    ///
    /// When adding a new variant: add it to the enum, `as_str()`, and here.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E6001,
        ErrorCode::E6002,
        ErrorCode::E6003,
        ErrorCode::E6004,
        ErrorCode::E9001,
    ];

    /// The code as it is printed (`"E6001"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line explanation of the code.
    pub const fn description(self) -> &'static str {
        match self {
            ErrorCode::E2001 => "illegal typecast",
            ErrorCode::E2002 => "operand type not accepted by operator",
            ErrorCode::E2003 => "associative operator without operands",
            ErrorCode::E2004 => "literal does not match its declared type",
            ErrorCode::E6001 => "division by zero",
            ErrorCode::E6002 => "undefined operation on infinity",
            ErrorCode::E6003 => "value out of range",
            ErrorCode::E6004 => "integer overflow",
            ErrorCode::E9001 => "internal inconsistency",
        }
    }

    /// Raised while building expression graphs.
    pub const fn is_build_error(self) -> bool {
        matches!(
            self,
            ErrorCode::E2001 | ErrorCode::E2002 | ErrorCode::E2003 | ErrorCode::E2004
        )
    }

    /// Raised while evaluating expression graphs.
    pub const fn is_runtime_error(self) -> bool {
        matches!(
            self,
            ErrorCode::E6001 | ErrorCode::E6002 | ErrorCode::E6003 | ErrorCode::E6004
        )
    }

    /// Indicates a broken engine invariant rather than a model fault.
    pub const fn is_internal(self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
