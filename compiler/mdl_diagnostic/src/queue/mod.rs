//! Destinations for diagnostics produced during evaluation.
//!
//! - [`DiagnosticSink`]: what an evaluation context writes into
//! - [`DiagnosticQueue`]: collects, deduplicates and sorts diagnostics
//! - [`TracingSink`]: forwards diagnostics to `tracing` instead of keeping them
//!
//! Drivers evaluate the same graph many times (once per loop binding, once
//! per sampled run), so the same fault at the same location tends to be
//! raised over and over. The queue keeps the first occurrence.

use mdl_ir::Location;

use crate::{Diagnostic, Severity};

/// Receiver for diagnostics raised while evaluating.
pub trait DiagnosticSink {
    /// Accept one diagnostic.
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop diagnostics identical in code, location and message to one
    /// already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 100,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// A config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// let mut ctx = EvalContext::new(&config, &mut queue);
/// expr.compute(&mut ctx);
/// for diagnostic in queue.flush() { ... }
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    suppressed: usize,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            suppressed: 0,
            config,
        }
    }

    /// Add a diagnostic.
    ///
    /// Returns `true` if the diagnostic was kept, `false` if it was filtered.
    pub fn add(&mut self, diagnostic: Diagnostic) -> bool {
        if self.limit_reached() || (self.config.deduplicate && self.is_duplicate(&diagnostic)) {
            self.suppressed += 1;
            return false;
        }

        if diagnostic.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
        true
    }

    fn is_duplicate(&self, diagnostic: &Diagnostic) -> bool {
        self.diagnostics.iter().any(|queued| {
            queued.code == diagnostic.code
                && queued.primary_location() == diagnostic.primary_location()
                && queued.message == diagnostic.message
        })
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Number of errors kept.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Number of diagnostics dropped by deduplication or the error limit.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed
    }

    /// Whether any error has been kept.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Number of diagnostics kept.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics kept so far, in arrival order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain the queue, sorted by file then line.
    ///
    /// Diagnostics without a primary location sort first. Arrival order is
    /// kept among diagnostics at the same location.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut drained = std::mem::take(&mut self.diagnostics);
        drained.sort_by(|a, b| sort_key(a.primary_location()).cmp(&sort_key(b.primary_location())));
        self.error_count = 0;
        self.suppressed = 0;
        drained
    }
}

fn sort_key(location: Option<&Location>) -> (bool, &str, u32) {
    match location {
        Some(loc) => (true, loc.file(), loc.line()),
        None => (false, "", 0),
    }
}

impl DiagnosticSink for DiagnosticQueue {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.add(diagnostic);
    }
}

/// Sink that logs each diagnostic through `tracing` and keeps nothing.
///
/// Runtime faults are logged at `warn`, broken invariants at `error`.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let location = diagnostic
            .primary_location()
            .map_or_else(String::new, ToString::to_string);
        match diagnostic.severity {
            Severity::Bug => tracing::error!(
                code = %diagnostic.code,
                %location,
                "{}",
                diagnostic.message
            ),
            Severity::Error | Severity::Warning => tracing::warn!(
                code = %diagnostic.code,
                %location,
                "{}",
                diagnostic.message
            ),
            Severity::Note => tracing::info!(
                code = %diagnostic.code,
                %location,
                "{}",
                diagnostic.message
            ),
        }
    }
}
