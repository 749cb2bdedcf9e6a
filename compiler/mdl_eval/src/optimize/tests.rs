use mdl_ir::{AssocOp, BinaryOp, Type};
use pretty_assertions::assert_eq;

use crate::builder::{infinity_literal, int_literal, real_literal, unknown_literal};
use crate::expr::{AssocKind, Expr, ExprKind, Operand};
use crate::outcome::{Outcome, Sign};
use crate::test_helpers::{binary, eval};

use super::*;

/// Operator and `(inverted, operand)` pairs of a flattened node.
fn shape(expr: &Expr) -> (AssocOp, Vec<(bool, Expr)>) {
    let ExprKind::Assoc {
        op: AssocKind::Op(op),
        operands,
    } = expr.kind()
    else {
        panic!("expected an associative node, found {expr}");
    };
    let terms = operands
        .iter()
        .map(|o| (o.inverted, o.expr.clone()))
        .collect();
    (*op, terms)
}

fn assert_terms(expr: &Expr, op: AssocOp, expected: &[(bool, &Expr)]) {
    let (actual_op, terms) = shape(expr);
    assert_eq!(actual_op, op);
    assert_eq!(terms.len(), expected.len(), "term count of {expr}");
    for ((inverted, term), (want_inverted, want)) in terms.iter().zip(expected) {
        assert_eq!(inverted, want_inverted, "inversion of `{term}` in {expr}");
        assert!(term.ptr_eq(want), "`{term}` is not the original node");
    }
}

mod sums {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_chain_becomes_one_node() {
        let [a, b, c, d, e] = [1, 2, 3, 4, 5].map(int_literal);
        let ab = binary(a.clone(), BinaryOp::Add, b.clone());
        let abc = binary(ab, BinaryOp::Add, c.clone());
        let de = binary(d.clone(), BinaryOp::Add, e.clone());
        let expr = binary(abc, BinaryOp::Add, de);

        let flat = optimize(&expr);
        assert_terms(
            &flat,
            AssocOp::Add,
            &[(false, &a), (false, &b), (false, &c), (false, &d), (false, &e)],
        );
        assert_eq!(flat.location(), expr.location());
        assert_eq!(eval(&flat), Outcome::int(15));
        assert_eq!(eval(&expr), Outcome::int(15));
    }

    #[test]
    fn subtraction_inverts_terms() {
        let [a, b, c] = [10, 4, 1].map(int_literal);
        let expr = binary(
            a.clone(),
            BinaryOp::Sub,
            binary(b.clone(), BinaryOp::Sub, c.clone()),
        );
        let flat = optimize(&expr);
        assert_terms(&flat, AssocOp::Add, &[(false, &a), (true, &b), (false, &c)]);
        assert_eq!(flat.to_string(), "10 - 4 + 1");
        assert_eq!(eval(&flat), eval(&expr));
    }

    #[test]
    fn other_types_stay_opaque() {
        let inner = binary(int_literal(1), BinaryOp::Add, int_literal(2));
        let expr = binary(inner, BinaryOp::Add, real_literal(0.5));
        let flat = optimize(&expr);
        let (_, terms) = shape(&flat);
        assert_eq!(terms.len(), 2);
        // The cast to real wraps a flattened int sum.
        let ExprKind::Unary { operand, .. } = terms[0].1.kind() else {
            panic!("expected the int-to-real cast");
        };
        assert_eq!(shape(operand).1.len(), 2);
        assert_eq!(eval(&flat), Outcome::real(3.5));
    }

    #[test]
    fn special_outcomes_survive_flattening() {
        let unknown = unknown_literal(Type::INT);
        let expr = binary(
            binary(unknown.clone(), BinaryOp::Add, int_literal(1)),
            BinaryOp::Add,
            infinity_literal(Sign::Positive),
        );
        assert_eq!(eval(&expr), Outcome::Infinity(Sign::Positive));
        assert_eq!(eval(&optimize(&expr)), Outcome::Infinity(Sign::Positive));

        let expr = binary(
            int_literal(5),
            BinaryOp::Sub,
            binary(unknown, BinaryOp::Add, infinity_literal(Sign::Positive)),
        );
        assert_eq!(eval(&expr), Outcome::Infinity(Sign::Negative));
        assert_eq!(eval(&optimize(&expr)), Outcome::Infinity(Sign::Negative));
    }
}

mod products {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn division_inverts_terms() {
        let [a, b, c] = [6.0, 2.0, 4.0].map(real_literal);
        let expr = binary(
            binary(a.clone(), BinaryOp::Mul, b.clone()),
            BinaryOp::Div,
            c.clone(),
        );
        let flat = optimize(&expr);
        assert_terms(&flat, AssocOp::Mul, &[(false, &a), (false, &b), (true, &c)]);
        assert_eq!(eval(&flat), Outcome::real(3.0));
    }

    #[test]
    fn divisor_product_is_one_term() {
        let [a, b, c] = [8.0, 4.0, 2.0].map(real_literal);
        let divisor = binary(b.clone(), BinaryOp::Div, c.clone());
        let expr = binary(a.clone(), BinaryOp::Div, divisor);
        let flat = optimize(&expr);

        let (_, terms) = shape(&flat);
        assert_eq!(terms.len(), 2);
        assert!(terms[0].1.ptr_eq(&a));
        assert!(terms[1].0);
        assert_terms(&terms[1].1, AssocOp::Mul, &[(false, &b), (true, &c)]);
        assert_eq!(eval(&flat), Outcome::real(4.0));
    }

    #[test]
    fn unknown_times_zero_is_zero_in_any_grouping() {
        let unknown = unknown_literal(Type::INT);
        let expr = binary(
            binary(unknown, BinaryOp::Mul, int_literal(0)),
            BinaryOp::Mul,
            int_literal(3),
        );
        assert_eq!(eval(&expr), Outcome::int(0));
        assert_eq!(eval(&optimize(&expr)), Outcome::int(0));
    }
}

mod identity {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn optimizing_twice_returns_same_node() {
        let expr = binary(
            binary(int_literal(1), BinaryOp::Add, int_literal(2)),
            BinaryOp::Add,
            int_literal(3),
        );
        let once = optimize(&expr);
        assert!(!once.ptr_eq(&expr));
        assert!(optimize(&once).ptr_eq(&once));
    }

    #[test]
    fn non_arithmetic_tree_is_untouched() {
        let expr = binary(int_literal(1), BinaryOp::Lt, int_literal(2));
        assert!(optimize(&expr).ptr_eq(&expr));
        let leaf = int_literal(7);
        assert!(optimize(&leaf).ptr_eq(&leaf));
    }

    #[test]
    fn chains_below_other_operators_are_flattened() {
        let sum = binary(
            binary(int_literal(1), BinaryOp::Add, int_literal(2)),
            BinaryOp::Add,
            int_literal(3),
        );
        let expr = binary(sum, BinaryOp::Lt, int_literal(7));
        let flat = optimize(&expr);
        let ExprKind::Binary { op, left, .. } = flat.kind() else {
            panic!("comparison should stay binary");
        };
        assert_eq!(*op, BinaryOp::Lt);
        assert_eq!(shape(left).1.len(), 3);
        assert_eq!(eval(&flat), Outcome::bool(true));
    }
}

mod collection {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn leaf_is_its_own_term() {
        let leaf = int_literal(4);
        let mut terms: Vec<Operand> = Vec::new();
        leaf.collect_sums(&mut terms);
        assert_eq!(terms.len(), 1);
        assert!(terms[0].expr.ptr_eq(&leaf));
        assert!(!terms[0].inverted);
    }

    #[test]
    fn products_report_divisors() {
        let [a, b, c] = [1.0, 2.0, 3.0].map(real_literal);
        let expr = binary(
            binary(a.clone(), BinaryOp::Mul, b.clone()),
            BinaryOp::Div,
            c.clone(),
        );
        let mut terms = Vec::new();
        expr.collect_products(&mut terms);
        let inversions: Vec<bool> = terms.iter().map(|t| t.inverted).collect();
        assert_eq!(inversions, vec![false, false, true]);
        assert!(terms[2].expr.ptr_eq(&c));

        let mut sums = Vec::new();
        expr.collect_sums(&mut sums);
        assert_eq!(sums.len(), 1);
    }
}
