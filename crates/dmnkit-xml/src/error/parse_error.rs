//! The error returned by [`read_definitions`](crate::read_definitions).

use std::fmt;

use crate::error::Diagnostic;

/// Result of a single fallible step of the XML tree builder.
pub type Result<T> = std::result::Result<T, Diagnostic>;

/// Every problem found while reading one DMN document.
///
/// The reader keeps going after recoverable problems, so one error can list
/// every malformed bound, color and reference at once. Warnings emitted
/// before the first error are kept alongside the errors.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// All diagnostics, in document order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity().is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity().is_warning())
    }
}

/// Shows the first error and how many more there are.
impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut errors = self.errors();
        let Some(first) = errors.next().or_else(|| self.diagnostics.first()) else {
            return Ok(());
        };
        write!(f, "{first}")?;
        let more = errors.count();
        if more > 0 {
            write!(f, " (+{more} more)")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(vec![diagnostic])
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_from_single_diagnostic() {
        let err = ParseError::from(
            Diagnostic::error("`inputData` is missing attribute `id`").with_code(ErrorCode::E101),
        );

        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(
            err.to_string(),
            "error[E101]: `inputData` is missing attribute `id`"
        );
    }

    #[test]
    fn test_display_counts_other_errors_only() {
        let err = ParseError::from(vec![
            Diagnostic::warning("unknown model namespace"),
            Diagnostic::error("`x` is not a number"),
            Diagnostic::error("`y` is not a number"),
        ]);

        assert_eq!(err.to_string(), "error: `x` is not a number (+1 more)");
        assert_eq!(err.errors().count(), 2);
        assert_eq!(err.warnings().count(), 1);
    }

    #[test]
    fn test_display_falls_back_to_warning() {
        let err = ParseError::from(Diagnostic::warning("unknown model namespace"));

        assert_eq!(err.to_string(), "warning: unknown model namespace");
    }
}
