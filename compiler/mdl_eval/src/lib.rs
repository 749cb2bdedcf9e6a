//! Mdl Eval - evaluation core of the modeling-language expression engine.
//!
//! Expressions are a shared, reference-counted DAG of [`Expr`] nodes built
//! bottom-up by the factory functions in [`builder`]. Any node can be
//! evaluated under three protocols:
//!
//! - [`Expr::compute`]: deterministic evaluation
//! - [`Expr::sample`]: stochastic evaluation with an explicit RNG
//! - [`Expr::next_state`]: state-transition evaluation of process expressions
//!
//! Every evaluation produces an [`Outcome`]: a normal value, null, unknown,
//! a runtime error, or a signed infinity. The special outcomes combine under
//! one fixed dominance order (error > null > unknown > infinity > normal)
//! that every operator family shares, whatever the payload type or protocol.
//!
//! # Architecture
//!
//! - `outcome`: the five-way value algebra
//! - `expr`: node representation, sharing, substitution and printing
//! - `builder`: type-checked node factories with build-time diagnostics
//! - `typecast`: the `(source, target)` cast table and cast nodes
//! - `protocol`: the three evaluation protocols and their context
//! - `ops`: operator semantics written once, generic over payload and protocol
//! - `optimize`: flattening of binary sum/product chains into n-ary nodes

pub mod builder;
mod config;
mod expr;
mod logging;
mod ops;
mod optimize;
mod outcome;
mod protocol;
mod state;
mod typecast;

#[cfg(test)]
mod test_helpers;

pub use builder::{
    bool_literal, infinity_literal, int_literal, make_aggregate, make_assoc, make_binary,
    make_constant, make_draw, make_literal, make_state_var, make_symbol, make_unary,
    make_update, null_literal, real_literal, string_literal, unknown_literal,
};
pub use config::{DisplayOptions, EvalConfig, RealCompare};
pub use expr::{
    AssocKind, Constant, Distribution, Expr, ExprDisplay, ExprKind, Operand, StateUpdate,
    SubstituteMode, Symbol, UnaryKind, UpdateOp, WeakExpr,
};
pub use logging::init_tracing;
pub use optimize::optimize;
pub use outcome::{ErrorKind, Outcome, OutcomeDisplay, Sign, Value};
pub use protocol::EvalContext;
pub use state::State;
pub use typecast::{make_typecast, CastKind, CastRule, CastTable};

// Re-export the shared vocabulary so drivers need a single dependency.
pub use mdl_diagnostic::{Diagnostic, DiagnosticQueue, DiagnosticSink, ErrorCode};
pub use mdl_ir::{AssocOp, BaseType, BinaryOp, Location, Modifiers, ScalarType, Type, UnaryOp};
