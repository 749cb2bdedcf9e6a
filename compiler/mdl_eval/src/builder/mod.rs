//! Node factories.
//!
//! Every factory type-checks its operands, promotes them to the operator's
//! operand type through [`make_typecast`], and returns a [`Diagnostic`] if
//! the node cannot be built. Nodes that would be ill-typed never exist, so
//! evaluation can rely on payloads matching static types.

use std::sync::Arc;

use mdl_diagnostic::{Diagnostic, ErrorCode};
use mdl_ir::{AssocOp, BaseType, BinaryOp, Location, Modifiers, Type, UnaryOp};

use crate::expr::{
    AssocKind, Constant, Distribution, Expr, ExprKind, Operand, StateUpdate, SubstituteMode,
    Symbol, UnaryKind, UpdateOp,
};
use crate::outcome::{Outcome, Sign, Value};
use crate::typecast::make_typecast;

/// A literal of type `ty`.
///
/// Non-finite reals are stored as the matching infinity (or as an undefined
/// error for NaN). Null, unknown and error literals fit any type.
pub fn make_literal(ty: Type, value: Outcome, location: Location) -> Result<Expr, Diagnostic> {
    let value = match value {
        Outcome::Normal(Value::Real(x)) => Outcome::real(x),
        other => other,
    };
    if !literal_fits(&ty, &value) {
        return Err(Diagnostic::error(ErrorCode::E2004)
            .with_message(format!("literal `{value}` is not a value of type `{ty}`"))
            .with_label(location, "literal declared here"));
    }
    Ok(Expr::new(ExprKind::Literal(value), ty, location))
}

pub(crate) fn literal_fits(ty: &Type, value: &Outcome) -> bool {
    match value {
        Outcome::Null | Outcome::Unknown | Outcome::Error(_) => true,
        Outcome::Infinity(_) => ty.base().is_some_and(BaseType::admits_infinity),
        Outcome::Normal(value) => payload_fits(ty, value),
    }
}

fn payload_fits(ty: &Type, value: &Value) -> bool {
    match (ty, value) {
        (Type::Scalar(scalar), value) => matches!(
            (scalar.base, value),
            (BaseType::Void, Value::Void)
                | (BaseType::Bool, Value::Bool(_))
                | (BaseType::Int, Value::Int(_))
                | (BaseType::Real | BaseType::Expo, Value::Real(_))
                | (BaseType::Str, Value::Str(_))
        ),
        (Type::Aggregate(types), Value::Tuple(components)) => {
            types.len() == components.len()
                && types
                    .iter()
                    .zip(components.iter())
                    .all(|(ty, component)| literal_fits(ty, component))
        }
        (Type::Aggregate(_), _) => false,
    }
}

/// A named symbol, initially bound to null.
pub fn make_symbol(name: &str, ty: Type, mode: SubstituteMode, location: Location) -> Expr {
    let symbol = Symbol::new(Arc::from(name), ty.clone(), mode, location.clone());
    Expr::new(ExprKind::Symbol(symbol), ty, location)
}

/// A named deterministic definition that is computed once, on first use.
pub fn make_constant(name: &str, definition: Expr, location: Location) -> Result<Expr, Diagnostic> {
    if definition.ty().is_random() || definition.ty().is_process() {
        return Err(bad_operand(
            &location,
            format!(
                "constant `{name}` must be deterministic, but its definition has type `{}`",
                definition.ty()
            ),
        ));
    }
    let ty = definition.ty().clone();
    Ok(Expr::new(
        ExprKind::Constant(Constant::new(Arc::from(name), definition)),
        ty,
        location,
    ))
}

pub fn make_unary(op: UnaryOp, operand: Expr, location: Location) -> Result<Expr, Diagnostic> {
    let accepted = match op {
        UnaryOp::Neg => operand.ty().base().is_some_and(BaseType::is_numeric),
        UnaryOp::Not => operand.ty().has_base(BaseType::Bool),
    };
    if !accepted {
        return Err(bad_operand(
            &location,
            format!(
                "operator `{}` cannot be applied to `{}`",
                op.as_symbol(),
                operand.ty()
            ),
        ));
    }
    let ty = operand.ty().clone();
    Ok(Expr::new(
        ExprKind::Unary {
            op: UnaryKind::Op(op),
            operand,
        },
        ty,
        location,
    ))
}

/// A binary node. Operands are promoted to their common type; division
/// always promotes to `real`.
pub fn make_binary(
    left: Expr,
    op: BinaryOp,
    right: Expr,
    location: Location,
) -> Result<Expr, Diagnostic> {
    let mismatch = || {
        bad_operand(
            &location,
            format!(
                "operator `{}` cannot be applied to `{}` and `{}`",
                op.as_symbol(),
                left.ty(),
                right.ty()
            ),
        )
    };
    let common = left.ty().join(right.ty()).ok_or_else(mismatch)?;
    let Some(base) = common.base() else {
        return Err(mismatch());
    };
    let accepted = match op {
        BinaryOp::Add => base.is_numeric() || base == BaseType::Str,
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => base.is_numeric(),
        BinaryOp::Mod => base == BaseType::Int,
        BinaryOp::Eq | BinaryOp::NotEq => {
            matches!(base, BaseType::Bool | BaseType::Int | BaseType::Real | BaseType::Str)
        }
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            matches!(base, BaseType::Int | BaseType::Real | BaseType::Str)
        }
        BinaryOp::And | BinaryOp::Or => base == BaseType::Bool,
    };
    if !accepted {
        return Err(mismatch());
    }

    let operand_ty = match op {
        BinaryOp::Div => common.with_base(BaseType::Real).ok_or_else(mismatch)?,
        _ => common,
    };
    let result_ty = if op.is_comparison() {
        operand_ty
            .with_base(BaseType::Bool)
            .ok_or_else(mismatch)?
    } else {
        operand_ty.clone()
    };
    let left = make_typecast(&left, &operand_ty)?;
    let right = make_typecast(&right, &operand_ty)?;
    Ok(Expr::new(
        ExprKind::Binary { op, left, right },
        result_ty,
        location,
    ))
}

/// An n-ary node. Operands of `+`, `*`, `|` and `&` are promoted to their
/// common type; a sequence keeps its operands as they are and has the type
/// of its last operand.
pub fn make_assoc(op: AssocOp, operands: Vec<Expr>, location: Location) -> Result<Expr, Diagnostic> {
    let Some(last) = operands.last() else {
        return Err(Diagnostic::error(ErrorCode::E2003)
            .with_message(format!("`{}` needs at least one operand", op.as_symbol()))
            .with_label(location, "empty operand list"));
    };

    if op == AssocOp::Sequence {
        let modifiers = operands
            .iter()
            .fold(Modifiers::empty(), |acc, o| acc | o.ty().modifiers());
        let ty = match last.ty() {
            Type::Scalar(scalar) => Type::scalar(scalar.base, scalar.modifiers | modifiers),
            aggregate @ Type::Aggregate(_) => aggregate.clone(),
        };
        let operands: Vec<Operand> = operands.into_iter().map(Operand::new).collect();
        return Ok(Expr::assoc(AssocKind::Op(op), operands, ty, location));
    }

    let mut common = last.ty().clone();
    for operand in &operands {
        common = common.join(operand.ty()).ok_or_else(|| {
            bad_operand(
                &location,
                format!(
                    "operator `{}` cannot combine `{}` and `{}`",
                    op.as_symbol(),
                    common,
                    operand.ty()
                ),
            )
        })?;
    }
    let accepted = common.base().is_some_and(|base| match op {
        AssocOp::Add => base.is_numeric() || base == BaseType::Str,
        AssocOp::Mul => base.is_numeric(),
        AssocOp::Or | AssocOp::And => base == BaseType::Bool,
        AssocOp::Sequence => true,
    });
    if !accepted {
        return Err(bad_operand(
            &location,
            format!("operator `{}` cannot be applied to `{common}`", op.as_symbol()),
        ));
    }

    let operands = operands
        .iter()
        .map(|operand| make_typecast(operand, &common).map(Operand::new))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Expr::assoc(AssocKind::Op(op), operands, common, location))
}

/// A tuple of `components`, cast and evaluated component-wise.
pub fn make_aggregate(components: Vec<Expr>, location: Location) -> Expr {
    let ty = Type::aggregate(components.iter().map(|c| c.ty().clone()));
    let operands: Vec<Operand> = components.into_iter().map(Operand::new).collect();
    Expr::assoc(AssocKind::Aggregate, operands, ty, location)
}

/// A draw from `dist`.
///
/// `bernoulli` takes a real probability and yields `rand bool`; `uniform`
/// takes real bounds and yields `rand real`; `equilikely` takes int bounds
/// and yields `rand int`.
pub fn make_draw(dist: Distribution, params: Vec<Expr>, location: Location) -> Result<Expr, Diagnostic> {
    if params.len() != dist.arity() {
        return Err(bad_operand(
            &location,
            format!(
                "`{}` takes {} parameters, found {}",
                dist.name(),
                dist.arity(),
                params.len()
            ),
        ));
    }
    let (param_base, result_base) = match dist {
        Distribution::Bernoulli => (BaseType::Real, BaseType::Bool),
        Distribution::Uniform => (BaseType::Real, BaseType::Real),
        Distribution::Equilikely => (BaseType::Int, BaseType::Int),
    };
    let mut modifiers = Modifiers::RANDOM;
    let mut operands = Vec::with_capacity(params.len());
    for param in &params {
        let accepted = match (param.ty().base(), param_base) {
            (Some(base), BaseType::Real) => base.is_numeric(),
            (Some(base), expected) => base == expected,
            (None, _) => false,
        };
        if !accepted {
            return Err(bad_operand(
                &location,
                format!(
                    "`{}` parameters must be `{}`, found `{}`",
                    dist.name(),
                    param_base.name(),
                    param.ty()
                ),
            ));
        }
        modifiers |= param.ty().modifiers();
        let target = Type::scalar(param_base, param.ty().modifiers());
        operands.push(Operand::new(make_typecast(param, &target)?));
    }
    Ok(Expr::assoc(
        AssocKind::Draw(dist),
        operands,
        Type::scalar(result_base, modifiers),
        location,
    ))
}

/// `state[var]`, a `proc int`.
pub fn make_state_var(var: usize, location: Location) -> Expr {
    Expr::new(
        ExprKind::StateVar(var),
        Type::process(BaseType::Int),
        location,
    )
}

/// `state[var] := value` (or `+=`, `-=`), a `proc void`.
pub fn make_update(
    var: usize,
    op: UpdateOp,
    value: Expr,
    location: Location,
) -> Result<Expr, Diagnostic> {
    if !value.ty().has_base(BaseType::Int) {
        return Err(bad_operand(
            &location,
            format!(
                "state variables hold `int`, cannot use `{}` in `{}`",
                value.ty(),
                op.as_symbol()
            ),
        ));
    }
    let ty = Type::scalar(BaseType::Void, value.ty().modifiers() | Modifiers::PROCESS);
    Ok(Expr::new(
        ExprKind::Unary {
            op: UnaryKind::Update(StateUpdate { var, op }),
            operand: value,
        },
        ty,
        location,
    ))
}

#[cold]
fn bad_operand(location: &Location, message: String) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2002)
        .with_message(message)
        .with_label(location.clone(), "operand types not accepted here")
}

// Shorthand literals for drivers and tests; all carry the internal location.

fn literal(ty: Type, value: Outcome) -> Expr {
    Expr::new(ExprKind::Literal(value), ty, Location::internal())
}

pub fn bool_literal(value: bool) -> Expr {
    literal(Type::BOOL, Outcome::bool(value))
}

pub fn int_literal(value: i64) -> Expr {
    literal(Type::INT, Outcome::int(value))
}

/// A real literal; non-finite values become infinities.
pub fn real_literal(value: f64) -> Expr {
    literal(Type::REAL, Outcome::real(value))
}

pub fn string_literal(value: &str) -> Expr {
    literal(Type::STR, Outcome::string(value))
}

/// Signed infinity of type `int`; promotes to `real` like any int.
pub fn infinity_literal(sign: Sign) -> Expr {
    literal(Type::INT, Outcome::Infinity(sign))
}

pub fn null_literal(ty: Type) -> Expr {
    literal(ty, Outcome::Null)
}

pub fn unknown_literal(ty: Type) -> Expr {
    literal(ty, Outcome::Unknown)
}
