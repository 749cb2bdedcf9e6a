//! Printing expressions back in source form.
//!
//! Parenthesization is driven by operator precedence (see
//! [`BinaryOp::precedence`]); the three shapes share one helper each.

use std::fmt;

use mdl_ir::{AssocOp, BinaryOp};
use mdl_stack::ensure_sufficient_stack;

use super::{AssocKind, Expr, ExprKind, Operand, UnaryKind};
use crate::config::DisplayOptions;
use crate::typecast::CastKind;

/// Precedence of prefix operators.
const PREFIX_PRECEDENCE: u8 = 1;

/// Precedence of leaves and call-like forms, which never need parentheses.
const ATOM_PRECEDENCE: u8 = 0;

/// [`Expr`] paired with [`DisplayOptions`] for printing.
pub struct ExprDisplay<'a> {
    expr: &'a Expr,
    options: &'a DisplayOptions,
}

impl Expr {
    /// Printable form using the given spelling of literal outcomes.
    pub fn display<'a>(&'a self, options: &'a DisplayOptions) -> ExprDisplay<'a> {
        ExprDisplay {
            expr: self,
            options,
        }
    }
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self.expr, self.options)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self, &DisplayOptions::default())
    }
}

fn assoc_precedence(op: AssocOp) -> u8 {
    match op {
        AssocOp::Add => BinaryOp::Add.precedence(),
        AssocOp::Mul => BinaryOp::Mul.precedence(),
        AssocOp::And => BinaryOp::And.precedence(),
        AssocOp::Or => BinaryOp::Or.precedence(),
        AssocOp::Sequence => BinaryOp::Or.precedence() + 2,
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr.kind() {
        ExprKind::Unary {
            op: UnaryKind::Op(_),
            ..
        } => PREFIX_PRECEDENCE,
        ExprKind::Unary {
            op: UnaryKind::Cast(CastKind::Lift),
            operand,
        } => precedence(operand),
        ExprKind::Unary {
            op: UnaryKind::Update(_),
            ..
        } => assoc_precedence(AssocOp::Sequence) - 1,
        ExprKind::Binary { op, .. } => op.precedence(),
        ExprKind::Assoc {
            op: AssocKind::Op(op),
            ..
        } => assoc_precedence(*op),
        _ => ATOM_PRECEDENCE,
    }
}

fn write_expr(f: &mut fmt::Formatter<'_>, expr: &Expr, options: &DisplayOptions) -> fmt::Result {
    ensure_sufficient_stack(|| match expr.kind() {
        ExprKind::Literal(outcome) => write!(f, "{}", outcome.display(options)),
        ExprKind::Symbol(symbol) => f.write_str(symbol.name()),
        ExprKind::Constant(constant) => f.write_str(constant.name()),
        ExprKind::StateVar(var) => write!(f, "state[{var}]"),
        ExprKind::Unary { op, operand } => match op {
            UnaryKind::Op(op) => write_prefix(f, op.as_symbol(), operand, options),
            UnaryKind::Cast(CastKind::Lift) => write_expr(f, operand, options),
            UnaryKind::Cast(cast) => write_call(f, cast.name(), [operand], options),
            UnaryKind::Update(update) => {
                write!(f, "state[{}] {} ", update.var, update.op.as_symbol())?;
                write_expr(f, operand, options)
            }
        },
        ExprKind::Binary { op, left, right } => {
            let parent = op.precedence();
            write_operand(f, left, parent, false, options)?;
            write!(f, " {} ", op.as_symbol())?;
            write_operand(f, right, parent, true, options)
        }
        ExprKind::Assoc { op, operands } => match op {
            AssocKind::Op(op) => write_chain(f, *op, operands, options),
            AssocKind::Aggregate => write_call(f, "", operands.iter().map(|o| &o.expr), options),
            AssocKind::Draw(dist) => {
                write_call(f, dist.name(), operands.iter().map(|o| &o.expr), options)
            }
        },
    })
}

/// Write `child`, parenthesized if it binds less tightly than its parent.
///
/// `strict` also parenthesizes equal precedence (right operands of
/// left-associative operators, inverted chain operands).
fn write_operand(
    f: &mut fmt::Formatter<'_>,
    child: &Expr,
    parent: u8,
    strict: bool,
    options: &DisplayOptions,
) -> fmt::Result {
    let child_precedence = precedence(child);
    let wrap = child_precedence > parent || (strict && child_precedence == parent);
    if wrap {
        f.write_str("(")?;
    }
    write_expr(f, child, options)?;
    if wrap {
        f.write_str(")")?;
    }
    Ok(())
}

fn write_prefix(
    f: &mut fmt::Formatter<'_>,
    symbol: &str,
    operand: &Expr,
    options: &DisplayOptions,
) -> fmt::Result {
    f.write_str(symbol)?;
    write_operand(f, operand, PREFIX_PRECEDENCE, false, options)
}

fn write_chain(
    f: &mut fmt::Formatter<'_>,
    op: AssocOp,
    operands: &[Operand],
    options: &DisplayOptions,
) -> fmt::Result {
    let parent = assoc_precedence(op);
    for (i, operand) in operands.iter().enumerate() {
        let inverse = operand.inverted.then(|| op.inverse_symbol()).flatten();
        match (i, inverse) {
            (0, None) => {}
            (0, Some(_)) if op == AssocOp::Mul => f.write_str("1 / ")?,
            (0, Some(symbol)) => f.write_str(symbol)?,
            (_, Some(symbol)) => write!(f, " {symbol} ")?,
            (_, None) if op == AssocOp::Sequence => f.write_str("; ")?,
            (_, None) => write!(f, " {} ", op.as_symbol())?,
        }
        write_operand(f, &operand.expr, parent, inverse.is_some(), options)?;
    }
    Ok(())
}

fn write_call<'e>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    args: impl IntoIterator<Item = &'e Expr>,
    options: &DisplayOptions,
) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, arg) in args.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_expr(f, arg, options)?;
    }
    f.write_str(")")
}
