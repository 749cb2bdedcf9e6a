use mdl_diagnostic::{Diagnostic, ErrorCode};
use mdl_ir::{BinaryOp, Location, Type};
use pretty_assertions::assert_eq;

use crate::builder::{
    infinity_literal, int_literal, make_binary, make_constant, make_symbol, real_literal,
};
use crate::config::{DisplayOptions, EvalConfig};
use crate::expr::SubstituteMode;
use crate::outcome::{ErrorKind, Outcome, Sign};
use crate::test_helpers::{binary, compute, compute_with, eval, loc, sample};

use super::EvalContext;

#[test]
fn compute_is_idempotent() {
    let expr = binary(int_literal(6), BinaryOp::Mul, int_literal(7));
    assert_eq!(eval(&expr), Outcome::int(42));
    assert_eq!(eval(&expr), Outcome::int(42));
}

#[test]
fn fault_is_reported_where_it_is_raised() {
    let division = make_binary(int_literal(5), BinaryOp::Div, int_literal(0), loc(2))
        .expect("division should build");
    let sum = make_binary(division, BinaryOp::Add, real_literal(1.0), loc(9))
        .expect("sum should build");

    let (outcome, diagnostics) = compute(&sum);
    assert_eq!(outcome, Outcome::Error(ErrorKind::DivideByZero));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::E6001);
    assert_eq!(diagnostics[0].primary_location(), Some(&loc(2)));
}

#[test]
fn context_counts_raised_faults() {
    let config = EvalConfig::default();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let mut ctx = EvalContext::new(&config, &mut sink);
    let overflow = binary(int_literal(i64::MAX), BinaryOp::Add, int_literal(1));
    let _ = overflow.compute(&mut ctx);
    let _ = overflow.compute(&mut ctx);
    assert_eq!(ctx.raised_count(), 2);
    assert_eq!(sink.len(), 2);
}

#[test]
fn diagnostics_use_configured_spelling() {
    let config = EvalConfig {
        display: DisplayOptions {
            infinity: "INF".to_string(),
            ..DisplayOptions::default()
        },
        ..EvalConfig::default()
    };
    let undefined = binary(
        infinity_literal(Sign::Positive),
        BinaryOp::Sub,
        infinity_literal(Sign::Positive),
    );
    let (_, diagnostics) = compute_with(&undefined, &config);
    assert_eq!(diagnostics[0].notes, vec!["while evaluating `INF - INF`".to_string()]);
}

#[test]
fn constant_is_computed_once() {
    let definition = binary(int_literal(2), BinaryOp::Add, int_literal(3));
    let constant = make_constant("five", definition, loc(1)).expect("deterministic constant");
    let info = constant.as_constant().expect("constant node");
    assert!(info.cached().is_none());

    assert_eq!(eval(&constant), Outcome::int(5));
    assert_eq!(info.cached(), Some(&Outcome::int(5)));
    assert_eq!(sample(&constant, 0).0, Outcome::int(5));
}

#[test]
fn constant_fault_is_reported_once() {
    let definition = binary(int_literal(1), BinaryOp::Div, int_literal(0));
    let constant = make_constant("bad", definition, loc(1)).expect("deterministic constant");
    let user = binary(constant.clone(), BinaryOp::Add, constant);

    let (outcome, diagnostics) = compute(&user);
    assert_eq!(outcome, Outcome::Error(ErrorKind::DivideByZero));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(eval(&user), Outcome::Error(ErrorKind::DivideByZero));
}

#[test]
fn symbol_binding_is_read_at_evaluation() {
    let x = make_symbol("x", Type::INT, SubstituteMode::Keep, Location::internal());
    let expr = binary(x.clone(), BinaryOp::Mul, int_literal(2));
    assert_eq!(eval(&expr), Outcome::Null);

    x.as_symbol()
        .expect("symbol node")
        .bind(Outcome::int(4))
        .expect("int binding fits");
    assert_eq!(eval(&expr), Outcome::int(8));
}
