//! Expression nodes.
//!
//! An [`Expr`] is a cheap handle to an immutable, reference-counted node.
//! Sub-expressions may be shared by any number of parents: cloning an
//! `Expr` shares the node, and the node is destroyed exactly once, when the
//! last handle goes away. Nodes never point back at their parents, so the
//! graph is acyclic by construction.
//!
//! Every node has the same three parts: where it was built, its static
//! type, and its [`ExprKind`]. The three operator shapes (unary, binary,
//! associative) are kinds, not separate node types; generic traversal over
//! them lives in `shape`.

mod display;
mod shape;

use std::sync::{Arc, OnceLock, Weak};

use mdl_diagnostic::{Diagnostic, ErrorCode};
use mdl_ir::{AssocOp, BinaryOp, Location, Type, UnaryOp};
use parking_lot::RwLock;
use smallvec::SmallVec;

use crate::builder::literal_fits;
use crate::outcome::{Outcome, Value};
use crate::typecast::CastKind;

pub use display::ExprDisplay;

/// Shared handle to an expression node.
#[derive(Clone, Debug)]
pub struct Expr(Arc<ExprNode>);

#[derive(Debug)]
struct ExprNode {
    location: Location,
    ty: Type,
    kind: ExprKind,
}

/// What an expression node computes.
#[derive(Debug)]
pub enum ExprKind {
    /// A fixed outcome.
    Literal(Outcome),
    /// A named slot whose current binding is read at evaluation time.
    Symbol(Symbol),
    /// A named deterministic definition, computed at most once.
    Constant(Constant),
    /// A state variable of the process (`state[i]`).
    StateVar(usize),
    Unary {
        op: UnaryKind,
        operand: Expr,
    },
    Binary {
        op: BinaryOp,
        left: Expr,
        right: Expr,
    },
    Assoc {
        op: AssocKind,
        operands: Box<[Operand]>,
    },
}

/// Operators of the unary shape.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryKind {
    Op(UnaryOp),
    Cast(CastKind),
    Update(StateUpdate),
}

/// Operators of the associative shape.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssocKind {
    Op(AssocOp),
    /// Component-wise aggregate; operands are the components.
    Aggregate,
    /// A draw from a distribution; operands are its parameters.
    Draw(Distribution),
}

/// Operand of an associative node.
#[derive(Clone, Debug)]
pub struct Operand {
    pub expr: Expr,
    /// Negated (in a sum) or reciprocated (in a product).
    pub inverted: bool,
}

impl Operand {
    pub fn new(expr: Expr) -> Self {
        Operand {
            expr,
            inverted: false,
        }
    }

    pub fn inverted(expr: Expr) -> Self {
        Operand {
            expr,
            inverted: true,
        }
    }
}

/// Distributions that can be sampled from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Distribution {
    /// `bernoulli(p)`: `true` with probability `p`.
    Bernoulli,
    /// `uniform(a, b)`: real uniformly distributed on `[a, b)`.
    Uniform,
    /// `equilikely(a, b)`: integer uniformly distributed on `[a, b]`.
    Equilikely,
}

impl Distribution {
    pub const fn name(self) -> &'static str {
        match self {
            Distribution::Bernoulli => "bernoulli",
            Distribution::Uniform => "uniform",
            Distribution::Equilikely => "equilikely",
        }
    }

    /// Number of parameters the distribution takes.
    pub const fn arity(self) -> usize {
        match self {
            Distribution::Bernoulli => 1,
            Distribution::Uniform | Distribution::Equilikely => 2,
        }
    }
}

/// A write to one state variable.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct StateUpdate {
    pub var: usize,
    pub op: UpdateOp,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UpdateOp {
    Assign,
    Increase,
    Decrease,
}

impl UpdateOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            UpdateOp::Assign => ":=",
            UpdateOp::Increase => "+=",
            UpdateOp::Decrease => "-=",
        }
    }
}

/// How substitution treats a symbol.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum SubstituteMode {
    /// Replace the symbol by a literal of its current binding.
    #[default]
    Freeze,
    /// Keep the symbol; its binding is read at every evaluation.
    Keep,
}

/// A named slot bound to an outcome of its declared type.
#[derive(Debug)]
pub struct Symbol {
    name: Arc<str>,
    ty: Type,
    location: Location,
    mode: SubstituteMode,
    binding: RwLock<Outcome>,
}

impl Symbol {
    pub(crate) fn new(name: Arc<str>, ty: Type, mode: SubstituteMode, location: Location) -> Self {
        Symbol {
            name,
            ty,
            location,
            mode,
            binding: RwLock::new(Outcome::Null),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> SubstituteMode {
        self.mode
    }

    /// The current binding; unbound symbols are null.
    pub fn current(&self) -> Outcome {
        self.binding.read().clone()
    }

    /// Rebind the symbol. Every node sharing it sees the new value.
    ///
    /// The value must fit the symbol's type under the same rules as a
    /// literal; otherwise the binding is left unchanged.
    pub fn bind(&self, value: Outcome) -> Result<(), Diagnostic> {
        let value = match value {
            Outcome::Normal(Value::Real(x)) => Outcome::real(x),
            other => other,
        };
        if !literal_fits(&self.ty, &value) {
            return Err(Diagnostic::error(ErrorCode::E2004)
                .with_message(format!(
                    "cannot bind `{value}` to `{}` of type `{}`",
                    self.name, self.ty
                ))
                .with_label(self.location.clone(), "symbol declared here"));
        }
        *self.binding.write() = value;
        Ok(())
    }
}

/// A named deterministic definition evaluated at most once.
#[derive(Debug)]
pub struct Constant {
    name: Arc<str>,
    definition: Expr,
    cache: OnceLock<Outcome>,
}

impl Constant {
    pub(crate) fn new(name: Arc<str>, definition: Expr) -> Self {
        Constant {
            name,
            definition,
            cache: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definition(&self) -> &Expr {
        &self.definition
    }

    /// The memoized outcome, if the constant has been evaluated.
    pub fn cached(&self) -> Option<&Outcome> {
        self.cache.get()
    }

    pub(crate) fn get_or_compute(&self, compute: impl FnOnce(&Expr) -> Outcome) -> Outcome {
        self.cache
            .get_or_init(|| compute(&self.definition))
            .clone()
    }
}

impl Expr {
    pub(crate) fn new(kind: ExprKind, ty: Type, location: Location) -> Self {
        Expr(Arc::new(ExprNode { location, ty, kind }))
    }

    /// Associative node over already-typed operands.
    pub(crate) fn assoc(
        op: AssocKind,
        operands: impl Into<Box<[Operand]>>,
        ty: Type,
        location: Location,
    ) -> Self {
        Expr::new(
            ExprKind::Assoc {
                op,
                operands: operands.into(),
            },
            ty,
            location,
        )
    }

    #[inline]
    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.0.ty
    }

    #[inline]
    pub fn location(&self) -> &Location {
        &self.0.location
    }

    /// Whether both handles share the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to this node (parents plus outside owners).
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// A non-owning handle, for observing when the node is destroyed.
    pub fn downgrade(&self) -> WeakExpr {
        WeakExpr(Arc::downgrade(&self.0))
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self.kind() {
            ExprKind::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self.kind() {
            ExprKind::Constant(constant) => Some(constant),
            _ => None,
        }
    }

    /// Operand count of an associative node.
    pub fn operand_count(&self) -> Option<usize> {
        match self.kind() {
            ExprKind::Assoc { operands, .. } => Some(operands.len()),
            _ => None,
        }
    }

    /// Direct sub-expressions, in evaluation order.
    pub fn children(&self) -> SmallVec<[&Expr; 4]> {
        match self.kind() {
            ExprKind::Literal(_)
            | ExprKind::Symbol(_)
            | ExprKind::Constant(_)
            | ExprKind::StateVar(_) => SmallVec::new(),
            ExprKind::Unary { operand, .. } => smallvec::smallvec![operand],
            ExprKind::Binary { left, right, .. } => smallvec::smallvec![left, right],
            ExprKind::Assoc { operands, .. } => operands.iter().map(|o| &o.expr).collect(),
        }
    }
}

/// Non-owning handle to an expression node.
#[derive(Clone, Debug)]
pub struct WeakExpr(Weak<ExprNode>);

impl WeakExpr {
    pub fn upgrade(&self) -> Option<Expr> {
        self.0.upgrade().map(Expr)
    }

    /// Whether the node still exists.
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}
