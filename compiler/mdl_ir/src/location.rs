//! Source locations.
//!
//! Every expression node remembers the file and line it was built from so
//! that a runtime fault can be reported where it originated.

use std::fmt;
use std::sync::Arc;

/// Placeholder file name for nodes synthesized by the engine itself.
const INTERNAL_FILE: &str = "<internal>";

/// Originating `(file, line)` of an expression.
///
/// The file name is shared, so cloning a location is a reference-count bump.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Location {
    file: Arc<str>,
    line: u32,
}

impl Location {
    /// Create a location for `line` of `file`.
    pub fn new(file: impl Into<Arc<str>>, line: u32) -> Self {
        Location {
            file: file.into(),
            line,
        }
    }

    /// Location used for nodes the engine builds on its own
    /// (frozen substitutions, literals made by tests or drivers).
    pub fn internal() -> Self {
        Location {
            file: Arc::from(INTERNAL_FILE),
            line: 0,
        }
    }

    /// Name of the source file.
    #[inline]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// One-based line number (0 for internal nodes).
    #[inline]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Whether this location was synthesized rather than parsed.
    pub fn is_internal(&self) -> bool {
        self.line == 0 && &*self.file == INTERNAL_FILE
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::internal()
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_internal() {
            f.write_str(INTERNAL_FILE)
        } else {
            write!(f, "{}:{}", self.file, self.line)
        }
    }
}
