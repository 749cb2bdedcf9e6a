//! Property-based tests for the evaluation engine.
//!
//! These tests use proptest to generate random expression trees and verify:
//! 1. Dominance: error, null and unknown operands decide a binary result
//! 2. Flattening: `optimize` never changes what an expression evaluates to,
//!    except that it can rescue a tree whose subtree overflowed
//! 3. Wide accumulation: int chains overflow only when the exact total does
//! 4. Idempotence: optimizing an optimized tree returns the same node
//! 5. Substitution identity: a tree without symbols substitutes to itself

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::needless_pass_by_value,
    reason = "Proptest macros generate code with these patterns"
)]

use mdl_eval::{
    infinity_literal, int_literal, make_assoc, make_binary, make_literal, optimize,
    unknown_literal, AssocOp, BinaryOp, Diagnostic, ErrorKind, EvalConfig, EvalContext, Expr,
    Location, Outcome, Sign, Type,
};
use proptest::prelude::*;

// -- Strategies --

/// Leaf of a generated integer tree.
#[derive(Clone, Debug)]
enum Leaf {
    Int(i64),
    Infinity(Sign),
    Unknown,
}

#[derive(Clone, Debug)]
enum Tree {
    Leaf(Leaf),
    Node(BinaryOp, Box<Tree>, Box<Tree>),
}

fn sign_strategy() -> impl Strategy<Value = Sign> {
    prop_oneof![Just(Sign::Positive), Just(Sign::Negative)]
}

/// Mostly small ints, with the range limits and arbitrary values mixed in.
fn int_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![
        6 => -5i64..=5,
        1 => prop::sample::select(vec![i64::MAX, i64::MIN, i64::MAX - 1, i64::MIN + 1]),
        1 => any::<i64>(),
    ]
}

fn leaf_strategy() -> impl Strategy<Value = Leaf> {
    prop_oneof![
        6 => int_strategy().prop_map(Leaf::Int),
        1 => sign_strategy().prop_map(Leaf::Infinity),
        1 => Just(Leaf::Unknown),
    ]
}

/// A tree of `ops` over ints, infinities and unknowns.
fn tree_strategy(ops: &'static [BinaryOp], depth: u32) -> BoxedStrategy<Tree> {
    if depth == 0 {
        leaf_strategy().prop_map(Tree::Leaf).boxed()
    } else {
        prop_oneof![
            leaf_strategy().prop_map(Tree::Leaf),
            (
                prop::sample::select(ops),
                tree_strategy(ops, depth - 1),
                tree_strategy(ops, depth - 1),
            )
                .prop_map(|(op, left, right)| Tree::Node(op, Box::new(left), Box::new(right))),
        ]
        .boxed()
    }
}

/// Finite, null, unknown or error `int` operands.
///
/// Infinities are left out: sums and products resolve an unknown operand
/// next to an infinity arithmetically.
fn outcome_strategy(nonzero: bool) -> impl Strategy<Value = Outcome> {
    let ints = (-9i64..=9)
        .prop_filter("nonzero operand", move |i| !nonzero || *i != 0)
        .prop_map(Outcome::int);
    prop_oneof![
        4 => ints,
        1 => Just(Outcome::Null),
        1 => Just(Outcome::Unknown),
        1 => prop::sample::select(vec![
            ErrorKind::DivideByZero,
            ErrorKind::Undefined,
            ErrorKind::Overflow,
        ])
        .prop_map(Outcome::Error),
    ]
}

// -- Helpers --

fn build(tree: &Tree) -> Expr {
    match tree {
        Tree::Leaf(Leaf::Int(i)) => int_literal(*i),
        Tree::Leaf(Leaf::Infinity(sign)) => infinity_literal(*sign),
        Tree::Leaf(Leaf::Unknown) => unknown_literal(Type::INT),
        Tree::Node(op, left, right) => {
            make_binary(build(left), *op, build(right), Location::new("prop.sm", 1))
                .expect("integer operands are well-typed")
        }
    }
}

fn literal(outcome: Outcome) -> Expr {
    make_literal(Type::INT, outcome, Location::internal()).expect("fits `int`")
}

fn compute(expr: &Expr) -> Outcome {
    let config = EvalConfig::default();
    let mut sink: Vec<Diagnostic> = Vec::new();
    expr.compute(&mut EvalContext::new(&config, &mut sink))
}

fn chain(op: AssocOp, terms: &[i64]) -> Expr {
    let operands = terms.iter().copied().map(int_literal).collect();
    make_assoc(op, operands, Location::new("prop.sm", 2)).expect("int terms")
}

fn narrow(total: Option<i128>) -> Outcome {
    total
        .and_then(|total| i64::try_from(total).ok())
        .map_or(Outcome::Error(ErrorKind::Overflow), Outcome::int)
}

/// Flattening may only differ from the nested tree when a nested subtree
/// overflowed on its own.
fn assert_flattening_keeps_value(expr: &Expr) -> Result<(), TestCaseError> {
    let nested = compute(expr);
    if nested != Outcome::Error(ErrorKind::Overflow) {
        prop_assert_eq!(compute(&optimize(expr)), nested);
    }
    Ok(())
}

const SUM_OPS: &[BinaryOp] = &[BinaryOp::Add, BinaryOp::Sub];
const PRODUCT_OPS: &[BinaryOp] = &[BinaryOp::Mul];

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    /// Special operands decide sums and comparisons.
    #[test]
    fn prop_dominance(
        left in outcome_strategy(false),
        right in outcome_strategy(false),
        op in prop::sample::select(vec![BinaryOp::Add, BinaryOp::Lt, BinaryOp::NotEq]),
    ) {
        let expr = make_binary(literal(left.clone()), op, literal(right.clone()), Location::internal())
            .expect("int operands");
        if let Some(dominant) = Outcome::dominant(&left, &right) {
            prop_assert_eq!(compute(&expr), dominant);
        }
    }

    /// Same for products, where a zero factor also absorbs unknown.
    #[test]
    fn prop_product_dominance(left in outcome_strategy(true), right in outcome_strategy(true)) {
        let expr = make_binary(literal(left.clone()), BinaryOp::Mul, literal(right.clone()), Location::internal())
            .expect("int operands");
        if let Some(dominant) = Outcome::dominant(&left, &right) {
            prop_assert_eq!(compute(&expr), dominant);
        }
    }

    /// Flattening a sum tree keeps its value.
    #[test]
    fn prop_sum_flattening(tree in tree_strategy(SUM_OPS, 4)) {
        assert_flattening_keeps_value(&build(&tree))?;
    }

    /// Flattening a product tree keeps its value.
    #[test]
    fn prop_product_flattening(tree in tree_strategy(PRODUCT_OPS, 4)) {
        assert_flattening_keeps_value(&build(&tree))?;
    }

    /// An int sum chain is its exact total, or an overflow when that total
    /// leaves the `int` range.
    #[test]
    fn prop_wide_sum(terms in prop::collection::vec(int_strategy(), 2..8)) {
        let exact: i128 = terms.iter().copied().map(i128::from).sum();
        prop_assert_eq!(compute(&chain(AssocOp::Add, &terms)), narrow(Some(exact)));
    }

    /// Same for products, where a zero factor wins over any overflow.
    #[test]
    fn prop_wide_product(terms in prop::collection::vec(int_strategy(), 2..6)) {
        let expected = if terms.contains(&0) {
            Outcome::int(0)
        } else {
            narrow(
                terms
                    .iter()
                    .try_fold(1i128, |acc, &term| acc.checked_mul(i128::from(term))),
            )
        };
        prop_assert_eq!(compute(&chain(AssocOp::Mul, &terms)), expected);
    }

    /// The second optimization pass is a no-op.
    #[test]
    fn prop_optimize_idempotence(tree in tree_strategy(SUM_OPS, 4)) {
        let once = optimize(&build(&tree));
        prop_assert!(optimize(&once).ptr_eq(&once));
    }

    /// Trees without symbols are their own substitution.
    #[test]
    fn prop_substitution_identity(tree in tree_strategy(PRODUCT_OPS, 3)) {
        let expr = build(&tree);
        prop_assert!(expr.substitute().ptr_eq(&expr));
        let flat = optimize(&expr);
        prop_assert!(flat.substitute().ptr_eq(&flat));
    }
}
