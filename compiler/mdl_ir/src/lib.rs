//! Mdl IR - shared definitions for the modeling-language expression engine.
//!
//! This crate holds the pieces every other layer agrees on:
//! - [`Location`]: the `(file, line)` provenance carried by every node
//! - [`Type`]: the static, protocol-independent type of an expression
//! - [`UnaryOp`], [`BinaryOp`], [`AssocOp`]: the operator vocabulary
//!
//! Nothing here evaluates anything; see `mdl_eval` for the engine.

mod location;
mod operators;
mod types;

pub use location::Location;
pub use operators::{AssocOp, BinaryOp, UnaryOp};
pub use types::{BaseType, Modifiers, ScalarType, Type};
