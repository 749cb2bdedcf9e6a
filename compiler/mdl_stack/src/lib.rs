//! Stack growth for recursive descent over expression graphs.
//!
//! Evaluation, substitution and optimization all recurse once per node
//! level. Models routinely produce long left-leaning chains (a sum built
//! one term at a time by a loop), so the recursion depth is bounded only
//! by the model, not by the engine.
//!
//! - **Native targets**: `stacker` allocates a fresh segment when the
//!   remaining stack drops below the red zone.
//! - **WASM targets**: passthrough; the host manages the stack.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
///
/// Wrap the body of any function that recurses into child expressions:
///
/// ```text
/// fn evaluate(expr: &Expr, p: &mut P) -> Outcome {
///     ensure_sufficient_stack(|| match expr.kind() { ... })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM version: call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
