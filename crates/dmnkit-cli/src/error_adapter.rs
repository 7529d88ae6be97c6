//! Error adapter for converting DmnError to miette diagnostics.
//!
//! Reader diagnostics point into the DMN XML source, so they are rendered
//! with source snippets. Every other error is rendered as a plain message
//! with a code.
//!
//! # Multi-Error Support
//!
//! When a [`dmnkit_xml::error::ParseError`] contains multiple diagnostics, each
//! diagnostic is rendered independently.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use dmnkit::DmnError;
use dmnkit_xml::{Span, error::Diagnostic};

/// Adapter for a single reader diagnostic.
///
/// This adapter wraps a single [`Diagnostic`] and implements
/// [`MietteDiagnostic`] to enable rich error formatting in the CLI.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// Source code for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for non-diagnostic [`DmnError`] variants.
///
/// This adapter handles errors that don't point into the source, such as
/// I/O, import resolution and marshalling errors.
pub struct ErrorAdapter<'a>(pub &'a DmnError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            DmnError::Io(_) => "dmnkit::io",
            DmnError::Parse { .. } => return None,
            DmnError::Write(err) => {
                return Some(Box::new(format!("dmnkit::write::{}", err.code())));
            }
            DmnError::Import(_) => "dmnkit::import",
            DmnError::Graph(_) => "dmnkit::graph",
            DmnError::Marshall(_) => "dmnkit::marshall",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            DmnError::Import(_) => Some(Box::new(
                "imports are read relative to the importing document; pass --resolve-imports to follow them",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single diagnostic or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a reader [`Span`] to a miette [`SourceSpan`].
fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`DmnError`] into a list of reportable errors.
///
/// For [`DmnError::Parse`], this returns one [`Reportable`] for
/// each diagnostic in the error. For other error variants, this returns a
/// single [`Reportable`].
pub fn to_reportables(err: &DmnError) -> Vec<Reportable<'_>> {
    match err {
        DmnError::Parse {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use dmnkit_xml::{
        WriteError,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    const SOURCE: &str = r#"<definitions><decision id="d1"><bogus/></decision></definitions>"#;

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("unexpected element `bogus`")
            .with_code(ErrorCode::E101)
            .with_label(Span::new(31..39), "not a DMN element")
            .with_help("remove the element or move it into an extension");
        let parse_err = ParseError::from(diag);
        let err = DmnError::new_parse_error(parse_err, SOURCE);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "unexpected element `bogus`");
                assert_eq!(d.code().map(|c| c.to_string()).as_deref(), Some("E101"));
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diags = vec![
            Diagnostic::error("missing attribute `id`")
                .with_code(ErrorCode::E100)
                .with_label(Span::new(13..31), "first"),
            Diagnostic::error("unexpected element `bogus`")
                .with_code(ErrorCode::E101)
                .with_label(Span::new(31..39), "second")
                .with_help("help for second"),
            Diagnostic::error("unclosed tag").with_label(Span::new(0..13), "third"),
        ];
        let parse_err = ParseError::from(diags);
        let err = DmnError::new_parse_error(parse_err, SOURCE);

        let reportables = to_reportables(&err);

        // Each diagnostic is separate
        assert_eq!(reportables.len(), 3);
        assert_eq!(reportables[0].to_string(), "missing attribute `id`");
        assert_eq!(reportables[1].to_string(), "unexpected element `bogus`");
        assert_eq!(reportables[2].to_string(), "unclosed tag");
    }

    #[test]
    fn test_non_parse_error() {
        let err = DmnError::Marshall("decision service without a divider".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(
                    e.to_string(),
                    "Marshall error: decision service without a divider"
                );
                assert_eq!(
                    e.code().map(|c| c.to_string()).as_deref(),
                    Some("dmnkit::marshall")
                );
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_write_error_carries_writer_code() {
        let err = DmnError::from(WriteError::Xml("broken".to_string()));

        let adapter = ErrorAdapter(&err);

        assert_eq!(
            adapter.code().map(|c| c.to_string()).as_deref(),
            Some("dmnkit::write::E300")
        );
    }

    #[test]
    fn test_import_error_has_help() {
        let err = DmnError::Import("cannot read shared.dmn".to_string());

        let adapter = ErrorAdapter(&err);

        assert!(adapter.help().is_some());
    }

    #[test]
    fn test_all_labels_returned() {
        let diag = Diagnostic::error("error with labels")
            .with_label(Span::new(0..5), "primary label")
            .with_secondary_label(Span::new(10..15), "secondary label");

        let adapter = DiagnosticAdapter::new(&diag, SOURCE);

        // labels() should return all labels
        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("primary label"));
        assert_eq!(labels[1].label(), Some("secondary label"));
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
    }
}
