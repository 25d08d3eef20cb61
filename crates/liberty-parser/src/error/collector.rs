//! Collector for accumulating diagnostics during lexing.

use crate::error::{Diagnostic, ParseError};

/// Accumulates diagnostics and turns them into a result once a phase ends.
///
/// A phase that keeps going after an error (the lexer in accumulate mode)
/// emits each diagnostic here and calls [`finish`](Self::finish) at the end.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` once any diagnostic has been emitted.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Finish collection.
    ///
    /// Returns `Err(ParseError)` with every diagnostic, in emission order,
    /// if any were emitted.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.diagnostics.is_empty() {
            Ok(())
        } else {
            Err(ParseError::new(self.diagnostics))
        }
    }
}
