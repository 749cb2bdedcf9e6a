//! Diagnostic system for build-time and evaluation-time faults.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary location (where it went wrong, as `(file, line)`)
//! - Notes (why it went wrong)
//!
//! Builders return a [`Diagnostic`] directly when a node cannot be built.
//! Evaluation never fails by returning one: an operator that raises a
//! runtime fault emits its diagnostic into a [`DiagnosticSink`] and hands
//! an error outcome back to its caller.

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue, DiagnosticSink, TracingSink};
