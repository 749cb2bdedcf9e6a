//! State variables, state updates and sequencing.
//!
//! Only `next_state` has a state to read and write. Under the other
//! protocols a state variable is unknown and an update does nothing.

use super::mismatch;
use crate::expr::{Expr, Operand, StateUpdate, UpdateOp};
use crate::outcome::{ErrorKind, Outcome, Value};
use crate::protocol::Protocol;

/// `state[var]`.
pub(crate) fn read<P: Protocol>(expr: &Expr, var: usize, p: &mut P) -> Outcome {
    let Some((value, len)) = p.state().map(|state| (state.get(var), state.len())) else {
        return Outcome::Unknown;
    };
    match value {
        Some(value) => Outcome::int(value),
        None => p.raise(
            expr,
            ErrorKind::OutOfRange,
            format_args!("state has {len} variables, no variable {var}"),
        ),
    }
}

/// `state[var] := value`, `+=` or `-=`.
pub(crate) fn update<P: Protocol>(
    expr: &Expr,
    update: StateUpdate,
    operand: &Expr,
    p: &mut P,
) -> Outcome {
    let amount = match p.eval(operand) {
        Outcome::Normal(Value::Int(amount)) => amount,
        Outcome::Normal(other) => return mismatch(expr, &other, p),
        Outcome::Infinity(_) => {
            return p.raise(
                expr,
                ErrorKind::OutOfRange,
                "state variables hold finite values",
            )
        }
        special => return special,
    };
    let Some(current) = p.state().map(|state| state.get(update.var)) else {
        return Outcome::Unknown;
    };
    let Some(current) = current else {
        return p.raise(
            expr,
            ErrorKind::OutOfRange,
            format_args!("no state variable {}", update.var),
        );
    };
    let next = match update.op {
        UpdateOp::Assign => Some(amount),
        UpdateOp::Increase => current.checked_add(amount),
        UpdateOp::Decrease => current.checked_sub(amount),
    };
    let Some(next) = next else {
        return p.raise(
            expr,
            ErrorKind::Overflow,
            format_args!("state[{}] {} {amount} overflows", update.var, update.op.as_symbol()),
        );
    };
    tracing::trace!(var = update.var, from = current, to = next, "state update");
    p.write_state(update.var, next);
    Outcome::void()
}

/// Apply `operands` left to right; the result is the last operand's.
pub(crate) fn sequence<P: Protocol>(operands: &[Operand], p: &mut P) -> Outcome {
    let mut last = Outcome::void();
    for operand in operands {
        last = p.eval(&operand.expr);
        if last.is_error() {
            break;
        }
    }
    last
}
