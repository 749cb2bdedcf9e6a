//! The three evaluation protocols.
//!
//! Operator semantics are written once, generic over [`Protocol`]. A
//! protocol decides only what differs between the three ways of
//! evaluating: whether random leaves draw from an RNG (`sample`), and
//! whether state variables can be read and written (`next_state`).
//! Under the other protocols those leaves are unknown.

use std::fmt;

use mdl_diagnostic::{Diagnostic, DiagnosticSink};
use rand::Rng;

use crate::config::EvalConfig;
use crate::expr::Expr;
use crate::ops;
use crate::outcome::{ErrorKind, Outcome};
use crate::state::State;

/// Caller-owned environment of one evaluation.
///
/// Runtime faults are reported into the sink exactly once, by the operator
/// that raises them; propagating an error outcome reports nothing.
pub struct EvalContext<'a> {
    config: &'a EvalConfig,
    sink: &'a mut dyn DiagnosticSink,
    raised: usize,
}

impl<'a> EvalContext<'a> {
    pub fn new(config: &'a EvalConfig, sink: &'a mut dyn DiagnosticSink) -> Self {
        EvalContext {
            config,
            sink,
            raised: 0,
        }
    }

    pub fn config(&self) -> &EvalConfig {
        self.config
    }

    /// Number of faults raised through this context so far.
    pub fn raised_count(&self) -> usize {
        self.raised
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.raised += 1;
        self.sink.emit(diagnostic);
    }
}

/// What one evaluation protocol provides to operator code.
pub(crate) trait Protocol {
    /// Protocol name for tracing.
    const NAME: &'static str;

    fn config(&self) -> &EvalConfig;

    fn emit(&mut self, diagnostic: Diagnostic);

    /// Deterministically evaluate a memoized definition.
    fn compute_nested(&mut self, expr: &Expr) -> Outcome;

    /// One variate uniform on `[0, 1)`, or `None` if this protocol does not
    /// sample.
    fn uniform(&mut self) -> Option<f64> {
        None
    }

    /// The state being transformed, or `None` outside `next_state`.
    fn state(&self) -> Option<&State> {
        None
    }

    /// Write a state variable; `false` if the protocol has no state or the
    /// variable does not exist.
    fn write_state(&mut self, _var: usize, _value: i64) -> bool {
        false
    }

    fn eval(&mut self, expr: &Expr) -> Outcome
    where
        Self: Sized,
    {
        ops::evaluate(expr, self)
    }

    /// Raise a runtime fault at `at`: report it and return the error outcome.
    #[cold]
    fn raise(&mut self, at: &Expr, kind: ErrorKind, detail: impl fmt::Display) -> Outcome
    where
        Self: Sized,
    {
        let rendered = at.display(&self.config().display).to_string();
        if kind.is_internal() {
            tracing::error!(location = %at.location(), %kind, "{detail}");
            debug_assert!(
                !kind.is_internal(),
                "internal inconsistency at {}: {detail}",
                at.location()
            );
        } else {
            tracing::debug!(
                location = %at.location(),
                %kind,
                protocol = Self::NAME,
                "{detail}"
            );
        }
        let diagnostic = kind
            .diagnostic()
            .with_message(format!("{kind}: {detail}"))
            .with_label(at.location().clone(), kind.primary_label())
            .with_note(format!("while evaluating `{rendered}`"));
        self.emit(diagnostic);
        Outcome::Error(kind)
    }
}

/// Deterministic evaluation.
pub(crate) struct Compute<'c, 'a> {
    ctx: &'c mut EvalContext<'a>,
}

impl Protocol for Compute<'_, '_> {
    const NAME: &'static str = "compute";

    fn config(&self) -> &EvalConfig {
        self.ctx.config
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.ctx.emit(diagnostic);
    }

    fn compute_nested(&mut self, expr: &Expr) -> Outcome {
        self.eval(expr)
    }
}

/// Stochastic evaluation; every random leaf draws from `rng`.
pub(crate) struct Sample<'c, 'a, R> {
    ctx: &'c mut EvalContext<'a>,
    rng: &'c mut R,
}

impl<R: Rng> Protocol for Sample<'_, '_, R> {
    const NAME: &'static str = "sample";

    fn config(&self) -> &EvalConfig {
        self.ctx.config
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.ctx.emit(diagnostic);
    }

    fn compute_nested(&mut self, expr: &Expr) -> Outcome {
        Compute { ctx: &mut *self.ctx }.eval(expr)
    }

    fn uniform(&mut self) -> Option<f64> {
        Some(self.rng.gen::<f64>())
    }
}

/// State-transition evaluation over a private copy of the state.
pub(crate) struct NextState<'c, 'a> {
    ctx: &'c mut EvalContext<'a>,
    state: State,
    changed: bool,
}

impl Protocol for NextState<'_, '_> {
    const NAME: &'static str = "next_state";

    fn config(&self) -> &EvalConfig {
        self.ctx.config
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.ctx.emit(diagnostic);
    }

    fn compute_nested(&mut self, expr: &Expr) -> Outcome {
        Compute { ctx: &mut *self.ctx }.eval(expr)
    }

    fn state(&self) -> Option<&State> {
        Some(&self.state)
    }

    fn write_state(&mut self, var: usize, value: i64) -> bool {
        let written = self.state.set(var, value);
        self.changed |= written;
        written
    }
}

impl Expr {
    /// Evaluate deterministically.
    ///
    /// Random leaves and state variables evaluate to unknown.
    #[tracing::instrument(level = "trace", skip_all, fields(location = %self.location()))]
    pub fn compute(&self, ctx: &mut EvalContext<'_>) -> Outcome {
        Compute { ctx }.eval(self)
    }

    /// Evaluate stochastically, drawing every random leaf from `rng`.
    ///
    /// Each random leaf draws exactly one uniform variate per visit, in
    /// evaluation order, so a seeded `rng` reproduces the same outcome.
    #[tracing::instrument(level = "trace", skip_all, fields(location = %self.location()))]
    pub fn sample<R: Rng>(&self, rng: &mut R, ctx: &mut EvalContext<'_>) -> Outcome {
        Sample { ctx, rng }.eval(self)
    }

    /// Evaluate as a state transition from `current`.
    ///
    /// Returns the outcome together with the new state if any variable was
    /// written. A transition that faults yields no new state.
    #[tracing::instrument(level = "trace", skip_all, fields(location = %self.location()))]
    pub fn next_state(
        &self,
        current: &State,
        ctx: &mut EvalContext<'_>,
    ) -> (Outcome, Option<State>) {
        let mut protocol = NextState {
            ctx,
            state: current.clone(),
            changed: false,
        };
        let outcome = protocol.eval(self);
        let next = (protocol.changed && !outcome.is_error()).then_some(protocol.state);
        (outcome, next)
    }
}

#[cfg(test)]
mod tests;
