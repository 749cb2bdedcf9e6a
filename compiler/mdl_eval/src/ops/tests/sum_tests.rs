//! Tests for `+` and `-`.

use mdl_diagnostic::ErrorCode;
use mdl_ir::{AssocOp, BinaryOp, Type};

use crate::builder::{
    infinity_literal, int_literal, null_literal, real_literal, string_literal, unknown_literal,
};
use crate::expr::Expr;
use crate::outcome::{ErrorKind, Outcome, Sign};
use crate::test_helpers::{assoc, binary, compute, eval, lit, loc};

fn pos_inf() -> Expr {
    infinity_literal(Sign::Positive)
}

fn neg_inf() -> Expr {
    infinity_literal(Sign::Negative)
}

fn error(kind: ErrorKind) -> Expr {
    lit(Type::INT, Outcome::Error(kind))
}

mod finite {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn int_sum() {
        let sum = assoc(
            AssocOp::Add,
            vec![int_literal(1), int_literal(2), int_literal(3)],
        );
        assert_eq!(eval(&sum), Outcome::int(6));
    }

    #[test]
    fn int_difference() {
        assert_eq!(
            eval(&binary(int_literal(5), BinaryOp::Sub, int_literal(7))),
            Outcome::int(-2)
        );
    }

    #[test]
    fn mixed_operands_promote_to_real() {
        assert_eq!(
            eval(&binary(int_literal(1), BinaryOp::Add, real_literal(0.5))),
            Outcome::real(1.5)
        );
    }

    #[test]
    fn string_concatenation() {
        let sum = assoc(
            AssocOp::Add,
            vec![string_literal("ab"), string_literal("c"), string_literal("d")],
        );
        assert_eq!(eval(&sum), Outcome::string("abcd"));
    }

    #[test]
    fn string_with_null_is_null() {
        let sum = binary(string_literal("ab"), BinaryOp::Add, null_literal(Type::STR));
        assert_eq!(eval(&sum), Outcome::Null);
    }
}

mod infinity {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn same_sign_infinities() {
        assert_eq!(
            eval(&binary(pos_inf(), BinaryOp::Add, pos_inf())),
            Outcome::Infinity(Sign::Positive)
        );
    }

    #[test]
    fn opposite_infinities_are_undefined() {
        assert_eq!(
            eval(&binary(pos_inf(), BinaryOp::Add, neg_inf())),
            Outcome::Error(ErrorKind::Undefined)
        );
    }

    #[test]
    fn infinity_minus_infinity_is_undefined() {
        let (outcome, diagnostics) = compute(&binary(pos_inf(), BinaryOp::Sub, pos_inf()));
        assert_eq!(outcome, Outcome::Error(ErrorKind::Undefined));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::E6002);
        assert_eq!(diagnostics[0].primary_location(), Some(&loc(1)));
    }

    #[test]
    fn infinity_minus_opposite_infinity() {
        assert_eq!(
            eval(&binary(pos_inf(), BinaryOp::Sub, neg_inf())),
            Outcome::Infinity(Sign::Positive)
        );
    }

    #[test]
    fn finite_minus_infinity_flips_sign() {
        assert_eq!(
            eval(&binary(int_literal(5), BinaryOp::Sub, pos_inf())),
            Outcome::Infinity(Sign::Negative)
        );
    }

    #[test]
    fn infinity_absorbs_finite_terms() {
        let sum = assoc(
            AssocOp::Add,
            vec![int_literal(3), neg_inf(), int_literal(i64::MAX)],
        );
        assert_eq!(eval(&sum), Outcome::Infinity(Sign::Negative));
    }

    #[test]
    fn infinity_absorbs_unknown() {
        let sum = assoc(
            AssocOp::Add,
            vec![unknown_literal(Type::INT), pos_inf(), int_literal(1)],
        );
        assert_eq!(eval(&sum), Outcome::Infinity(Sign::Positive));
    }

    #[test]
    fn opposite_infinity_found_after_unknown() {
        let sum = assoc(
            AssocOp::Add,
            vec![pos_inf(), unknown_literal(Type::INT), neg_inf()],
        );
        assert_eq!(eval(&sum), Outcome::Error(ErrorKind::Undefined));
    }

    #[test]
    fn real_overflow_becomes_infinity() {
        let sum = binary(real_literal(1e308), BinaryOp::Add, real_literal(1e308));
        assert_eq!(eval(&sum), Outcome::Infinity(Sign::Positive));
    }
}

mod dominance {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn error_beats_null() {
        let sum = assoc(
            AssocOp::Add,
            vec![null_literal(Type::INT), error(ErrorKind::DivideByZero)],
        );
        assert_eq!(eval(&sum), Outcome::Error(ErrorKind::DivideByZero));
    }

    #[test]
    fn first_error_wins() {
        let sum = assoc(
            AssocOp::Add,
            vec![error(ErrorKind::OutOfRange), error(ErrorKind::Overflow)],
        );
        assert_eq!(eval(&sum), Outcome::Error(ErrorKind::OutOfRange));
    }

    #[test]
    fn null_beats_unknown() {
        let sum = assoc(
            AssocOp::Add,
            vec![unknown_literal(Type::INT), null_literal(Type::INT)],
        );
        assert_eq!(eval(&sum), Outcome::Null);
    }

    #[test]
    fn null_stops_infinity_arithmetic() {
        let sum = assoc(
            AssocOp::Add,
            vec![pos_inf(), null_literal(Type::INT), neg_inf()],
        );
        assert_eq!(eval(&sum), Outcome::Null);
    }

    #[test]
    fn unknown_without_infinity() {
        let sum = binary(unknown_literal(Type::INT), BinaryOp::Add, int_literal(1));
        assert_eq!(eval(&sum), Outcome::Unknown);
    }

    #[test]
    fn propagated_error_is_not_reported_again() {
        let sum = binary(error(ErrorKind::Undefined), BinaryOp::Add, int_literal(1));
        let (outcome, diagnostics) = compute(&sum);
        assert_eq!(outcome, Outcome::Error(ErrorKind::Undefined));
        assert!(diagnostics.is_empty());
    }
}

mod overflow {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn int_overflow_is_an_error() {
        let (outcome, diagnostics) =
            compute(&binary(int_literal(i64::MAX), BinaryOp::Add, int_literal(1)));
        assert_eq!(outcome, Outcome::Error(ErrorKind::Overflow));
        assert_eq!(diagnostics[0].code, ErrorCode::E6004);
    }

    #[test]
    fn int_underflow_is_an_error() {
        assert_eq!(
            eval(&binary(int_literal(i64::MIN), BinaryOp::Sub, int_literal(1))),
            Outcome::Error(ErrorKind::Overflow)
        );
    }

    #[test]
    fn intermediate_overflow_recovers() {
        let sum = assoc(
            AssocOp::Add,
            vec![int_literal(i64::MAX), int_literal(1), int_literal(-1)],
        );
        assert_eq!(eval(&sum), Outcome::int(i64::MAX));
    }

    #[test]
    fn grouping_does_not_change_overflow() {
        let max_plus_zeros = binary(
            binary(int_literal(i64::MAX), BinaryOp::Add, int_literal(0)),
            BinaryOp::Add,
            int_literal(0),
        );
        let nested = binary(
            max_plus_zeros,
            BinaryOp::Add,
            binary(int_literal(1), BinaryOp::Add, int_literal(-1)),
        );
        let flat = crate::optimize::optimize(&nested);
        assert_eq!(eval(&nested), Outcome::int(i64::MAX));
        assert_eq!(eval(&flat), Outcome::int(i64::MAX));
    }

    #[test]
    fn infinity_wins_over_overflow() {
        let sum = assoc(
            AssocOp::Add,
            vec![int_literal(i64::MAX), int_literal(1), pos_inf()],
        );
        assert_eq!(eval(&sum), Outcome::Infinity(Sign::Positive));
    }
}
