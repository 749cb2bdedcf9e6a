//! Generic traversal over the three operator shapes.
//!
//! Rewrites (substitution, optimization) are written once against
//! [`Expr::map_children`]. A node whose children all come back unchanged is
//! returned as-is, so an untouched subtree keeps its identity and sharing.

use mdl_stack::ensure_sufficient_stack;

use super::{Expr, ExprKind, Operand, SubstituteMode};

impl Expr {
    /// Rebuild this node with each child replaced by `f(child)`.
    ///
    /// Returns `self` (sharing the node) when every child is returned
    /// unchanged. Leaves are always returned as-is.
    pub(crate) fn map_children(&self, mut f: impl FnMut(&Expr) -> Expr) -> Expr {
        let kind = match self.kind() {
            ExprKind::Literal(_)
            | ExprKind::Symbol(_)
            | ExprKind::Constant(_)
            | ExprKind::StateVar(_) => return self.clone(),
            ExprKind::Unary { op, operand } => {
                let mapped = f(operand);
                if mapped.ptr_eq(operand) {
                    return self.clone();
                }
                ExprKind::Unary {
                    op: *op,
                    operand: mapped,
                }
            }
            ExprKind::Binary { op, left, right } => {
                let (mapped_left, mapped_right) = (f(left), f(right));
                if mapped_left.ptr_eq(left) && mapped_right.ptr_eq(right) {
                    return self.clone();
                }
                ExprKind::Binary {
                    op: *op,
                    left: mapped_left,
                    right: mapped_right,
                }
            }
            ExprKind::Assoc { op, operands } => {
                let mapped: Vec<Operand> = operands
                    .iter()
                    .map(|operand| Operand {
                        expr: f(&operand.expr),
                        inverted: operand.inverted,
                    })
                    .collect();
                let unchanged = mapped
                    .iter()
                    .zip(operands.iter())
                    .all(|(new, old)| new.expr.ptr_eq(&old.expr));
                if unchanged {
                    return self.clone();
                }
                ExprKind::Assoc {
                    op: *op,
                    operands: mapped.into_boxed_slice(),
                }
            }
        };
        Expr::new(kind, self.ty().clone(), self.location().clone())
    }

    /// Replace every freezing symbol by a literal of its current binding.
    ///
    /// Symbols in [`SubstituteMode::Keep`] stay in place. Subtrees without a
    /// freezing symbol are shared with the original, so substituting an
    /// expression with nothing to substitute returns the same node.
    #[must_use]
    pub fn substitute(&self) -> Expr {
        ensure_sufficient_stack(|| match self.kind() {
            ExprKind::Symbol(symbol) => match symbol.mode() {
                SubstituteMode::Freeze => Expr::new(
                    ExprKind::Literal(symbol.current()),
                    self.ty().clone(),
                    self.location().clone(),
                ),
                SubstituteMode::Keep => self.clone(),
            },
            _ => self.map_children(Expr::substitute),
        })
    }
}
