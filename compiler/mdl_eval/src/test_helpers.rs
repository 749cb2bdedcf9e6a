//! Helpers for evaluating expressions in unit tests.
//!
//! Each helper runs one protocol against a fresh context that collects
//! diagnostics into a `Vec`, so tests can check both the outcome and what
//! was reported.

#![allow(clippy::expect_used)]

use mdl_diagnostic::Diagnostic;
use mdl_ir::{AssocOp, BinaryOp, Location, Type, UnaryOp};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::builder::{make_assoc, make_binary, make_literal, make_unary};
use crate::{EvalConfig, EvalContext, Expr, Outcome, State};

/// Location used by expressions built in tests.
pub fn loc(line: u32) -> Location {
    Location::new("test.sm", line)
}

pub fn compute_with(expr: &Expr, config: &EvalConfig) -> (Outcome, Vec<Diagnostic>) {
    let mut sink: Vec<Diagnostic> = Vec::new();
    let outcome = {
        let mut ctx = EvalContext::new(config, &mut sink);
        expr.compute(&mut ctx)
    };
    (outcome, sink)
}

/// `compute` under the default configuration.
pub fn compute(expr: &Expr) -> (Outcome, Vec<Diagnostic>) {
    compute_with(expr, &EvalConfig::default())
}

/// Just the outcome of `compute`.
pub fn eval(expr: &Expr) -> Outcome {
    compute(expr).0
}

/// `sample` with a generator seeded from `seed`.
pub fn sample(expr: &Expr, seed: u64) -> (Outcome, Vec<Diagnostic>) {
    let config = EvalConfig::default();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sink: Vec<Diagnostic> = Vec::new();
    let outcome = {
        let mut ctx = EvalContext::new(&config, &mut sink);
        expr.sample(&mut rng, &mut ctx)
    };
    (outcome, sink)
}

pub fn next_state(expr: &Expr, state: &State) -> (Outcome, Option<State>, Vec<Diagnostic>) {
    let config = EvalConfig::default();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let (outcome, next) = {
        let mut ctx = EvalContext::new(&config, &mut sink);
        expr.next_state(state, &mut ctx)
    };
    (outcome, next, sink)
}

pub fn lit(ty: Type, value: Outcome) -> Expr {
    make_literal(ty, value, Location::internal()).expect("literal should fit its type")
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    make_unary(op, operand, loc(1)).expect("unary operand should be well-typed")
}

pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    make_binary(left, op, right, loc(1)).expect("binary operands should be well-typed")
}

pub fn assoc(op: AssocOp, operands: Vec<Expr>) -> Expr {
    make_assoc(op, operands, loc(1)).expect("assoc operands should be well-typed")
}
