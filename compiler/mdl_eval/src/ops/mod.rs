//! Operator semantics.
//!
//! Each operator family is written once, generic over the payload type
//! (via [`Numeric`](numeric::Numeric)) and over the evaluation protocol
//! (via [`Protocol`]). [`evaluate`] is the single dispatch point from a
//! node kind to its family.
//!
//! All families agree on how special outcomes combine: an error operand
//! wins over everything, null over unknown, unknown over infinity. A
//! family only decides what happens between infinities and normal values.

mod compare;
mod logic;
mod modulo;
mod numeric;
mod process;
mod product;
mod random;
mod sum;
mod unary;

use mdl_ir::{AssocOp, BinaryOp, UnaryOp};
use mdl_stack::ensure_sufficient_stack;

use crate::expr::{AssocKind, Expr, ExprKind, Operand, UnaryKind};
use crate::outcome::{ErrorKind, Outcome, Value};
use crate::protocol::Protocol;
use crate::typecast;

/// Evaluate `expr` under protocol `p`.
pub(crate) fn evaluate<P: Protocol>(expr: &Expr, p: &mut P) -> Outcome {
    ensure_sufficient_stack(|| match expr.kind() {
        ExprKind::Literal(outcome) => outcome.clone(),
        ExprKind::Symbol(symbol) => symbol.current(),
        ExprKind::Constant(constant) => {
            constant.get_or_compute(|definition| p.compute_nested(definition))
        }
        ExprKind::StateVar(var) => process::read(expr, *var, p),
        ExprKind::Unary { op, operand } => match op {
            UnaryKind::Op(UnaryOp::Neg) => unary::negate(expr, operand, p),
            UnaryKind::Op(UnaryOp::Not) => unary::not(expr, operand, p),
            UnaryKind::Cast(cast) => typecast::apply(expr, *cast, operand, p),
            UnaryKind::Update(update) => process::update(expr, *update, operand, p),
        },
        ExprKind::Binary { op, left, right } => binary(expr, *op, left, right, p),
        ExprKind::Assoc { op, operands } => match op {
            AssocKind::Op(AssocOp::Add) => sum::evaluate(expr, terms(operands), p),
            AssocKind::Op(AssocOp::Mul) => product::evaluate(expr, terms(operands), p),
            AssocKind::Op(AssocOp::Or) => {
                logic::evaluate(expr, true, operands.iter().map(|o| &o.expr), p)
            }
            AssocKind::Op(AssocOp::And) => {
                logic::evaluate(expr, false, operands.iter().map(|o| &o.expr), p)
            }
            AssocKind::Op(AssocOp::Sequence) => process::sequence(operands, p),
            AssocKind::Aggregate => Outcome::tuple(operands.iter().map(|o| p.eval(&o.expr))),
            AssocKind::Draw(dist) => random::draw(expr, *dist, operands, p),
        },
    })
}

fn terms(operands: &[Operand]) -> impl Iterator<Item = (&Expr, bool)> + '_ {
    operands.iter().map(|o| (&o.expr, o.inverted))
}

/// Binary nodes share the n-ary code paths: `a - b` is the sum `a + (-b)`
/// and `a / b` the product `a * (1/b)`.
fn binary<P: Protocol>(expr: &Expr, op: BinaryOp, left: &Expr, right: &Expr, p: &mut P) -> Outcome {
    match op {
        BinaryOp::Add => sum::evaluate(expr, [(left, false), (right, false)], p),
        BinaryOp::Sub => sum::evaluate(expr, [(left, false), (right, true)], p),
        BinaryOp::Mul => product::evaluate(expr, [(left, false), (right, false)], p),
        BinaryOp::Div => product::evaluate(expr, [(left, false), (right, true)], p),
        BinaryOp::Or => logic::evaluate(expr, true, [left, right], p),
        BinaryOp::And => logic::evaluate(expr, false, [left, right], p),
        BinaryOp::Mod => {
            let (l, r) = (p.eval(left), p.eval(right));
            modulo::evaluate(expr, l, r, p)
        }
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq => {
            let (l, r) = (p.eval(left), p.eval(right));
            compare::evaluate(expr, op, l, r, p)
        }
    }
}

/// Report a fault produced by payload arithmetic itself (a real operation
/// that has no value). Other outcomes pass through.
pub(crate) fn settle<P: Protocol>(expr: &Expr, outcome: Outcome, p: &mut P) -> Outcome {
    match outcome {
        Outcome::Error(kind) => p.raise(expr, kind, "arithmetic result is not a number"),
        other => other,
    }
}

/// A normal payload whose runtime type disagrees with the static type.
#[cold]
pub(crate) fn mismatch<P: Protocol>(expr: &Expr, found: &Value, p: &mut P) -> Outcome {
    p.raise(
        expr,
        ErrorKind::InternalInconsistency,
        format_args!(
            "`{}` operand evaluated to a {} payload",
            expr.ty(),
            found.type_name()
        ),
    )
}

/// A node whose static type the operator has no semantics for.
#[cold]
pub(crate) fn unsupported<P: Protocol>(expr: &Expr, p: &mut P) -> Outcome {
    p.raise(
        expr,
        ErrorKind::InternalInconsistency,
        format_args!("operator has no semantics for `{}`", expr.ty()),
    )
}

#[cfg(test)]
mod tests;
