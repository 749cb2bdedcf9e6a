//! Associative flattening.
//!
//! Chains of binary `+`/`-` (or `*`/`/`) nodes and nested n-ary sums (or
//! products) of the same type are rewritten into a single n-ary node whose
//! operands are the chain's terms, each optimized in turn. Subtraction and
//! division enter as inverted terms. Sums and products combine special
//! outcomes independently of operand order, so the rewrite preserves what
//! the expression evaluates to.

use mdl_ir::{AssocOp, Type};
use mdl_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use crate::expr::{AssocKind, Expr, ExprKind, Operand};

/// Scratch list of collected terms.
type Terms = SmallVec<[Operand; 8]>;

/// Which associative chain is being collected.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Family {
    Sum,
    Product,
}

impl Family {
    /// The chain `expr` heads, if any.
    fn of(expr: &Expr) -> Option<Family> {
        let op = match expr.kind() {
            ExprKind::Binary { op, .. } => op.assoc_form()?.0,
            ExprKind::Assoc {
                op: AssocKind::Op(op),
                ..
            } => *op,
            _ => return None,
        };
        match op {
            AssocOp::Add => Some(Family::Sum),
            AssocOp::Mul => Some(Family::Product),
            _ => None,
        }
    }

    const fn op(self) -> AssocOp {
        match self {
            Family::Sum => AssocOp::Add,
            Family::Product => AssocOp::Mul,
        }
    }
}

/// Flatten every sum and product chain in `expr`.
///
/// Returns `expr` itself when there is nothing to flatten, so optimizing an
/// optimized expression gives back the same node.
#[tracing::instrument(level = "debug", skip_all, fields(location = %expr.location()))]
pub fn optimize(expr: &Expr) -> Expr {
    optimize_node(expr)
}

fn optimize_node(expr: &Expr) -> Expr {
    ensure_sufficient_stack(|| {
        if let Some(family) = Family::of(expr) {
            let mut terms = Terms::new();
            collect(expr, family, expr.ty(), false, &mut terms);
            if terms.len() > 1 {
                return flatten(expr, family, terms);
            }
        }
        expr.map_children(optimize_node)
    })
}

/// Append the terms `expr` contributes to a chain of `family` and type `ty`.
///
/// A sub-expression of another type or operator is a single opaque term. In
/// a product, an inverted sub-product stays opaque: the divisor is
/// evaluated as a whole.
fn collect(expr: &Expr, family: Family, ty: &Type, inverted: bool, out: &mut Terms) {
    ensure_sufficient_stack(|| {
        if expr.ty() == ty && !(family == Family::Product && inverted) {
            match expr.kind() {
                ExprKind::Binary { op, left, right } => {
                    if let Some((assoc, flips)) = op.assoc_form() {
                        if assoc == family.op() {
                            collect(left, family, ty, inverted, out);
                            collect(right, family, ty, inverted ^ flips, out);
                            return;
                        }
                    }
                }
                ExprKind::Assoc {
                    op: AssocKind::Op(op),
                    operands,
                } if *op == family.op() => {
                    for operand in operands.iter() {
                        collect(&operand.expr, family, ty, inverted ^ operand.inverted, out);
                    }
                    return;
                }
                _ => {}
            }
        }
        out.push(Operand {
            expr: expr.clone(),
            inverted,
        });
    });
}

fn flatten(expr: &Expr, family: Family, terms: Terms) -> Expr {
    let operands: Vec<Operand> = terms
        .into_iter()
        .map(|term| Operand {
            expr: optimize_node(&term.expr),
            inverted: term.inverted,
        })
        .collect();

    if let ExprKind::Assoc {
        op: AssocKind::Op(op),
        operands: current,
    } = expr.kind()
    {
        let same = *op == family.op()
            && current.len() == operands.len()
            && current
                .iter()
                .zip(&operands)
                .all(|(a, b)| a.inverted == b.inverted && a.expr.ptr_eq(&b.expr));
        if same {
            return expr.clone();
        }
    }

    tracing::trace!(
        op = family.op().as_symbol(),
        terms = operands.len(),
        "flattened associative chain"
    );
    Expr::assoc(
        AssocKind::Op(family.op()),
        operands,
        expr.ty().clone(),
        expr.location().clone(),
    )
}

impl Expr {
    /// Terms of the sum this expression heads: itself if it is not a sum.
    pub fn collect_sums(&self, out: &mut Vec<Operand>) {
        let mut terms = Terms::new();
        collect(self, Family::Sum, self.ty(), false, &mut terms);
        out.extend(terms);
    }

    /// Factors of the product this expression heads: itself if it is not a
    /// product. Divisors are inverted.
    pub fn collect_products(&self, out: &mut Vec<Operand>) {
        let mut terms = Terms::new();
        collect(self, Family::Product, self.ty(), false, &mut terms);
        out.extend(terms);
    }
}

#[cfg(test)]
mod tests;
