//! Collector for accumulating diagnostics while reading a document.
//!
//! The [`DiagnosticCollector`] lets the reader report every malformed value
//! instead of failing on the first one.

use crate::error::{Diagnostic, ParseError};

/// A collector for accumulating diagnostics during a processing phase.
///
/// # Example
///
/// ```text
/// let mut collector = DiagnosticCollector::new();
///
/// collector.emit(
///     Diagnostic::error("`dc:Bounds` attribute `x` is not a number")
///         .with_code(ErrorCode::E200)
///         .with_label(Span::new(10..40), "invalid value `abc`")
/// );
///
/// let result = collector.finish();
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` once an error-severity diagnostic has been emitted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Finish collection and return a result.
    ///
    /// - If there are errors, returns `Err(ParseError)` with all diagnostics.
    /// - If there are no errors, returns `Ok(())`. Warnings are logged and dropped.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.has_errors {
            return Err(ParseError::new(self.diagnostics));
        }
        for diagnostic in &self.diagnostics {
            log::warn!(diagnostic:% = diagnostic; "DMN document warning");
        }
        Ok(())
    }
}
