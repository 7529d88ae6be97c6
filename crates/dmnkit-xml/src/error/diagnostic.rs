//! One problem found in a DMN document.

use std::fmt;

use crate::{
    error::{Severity, error_code::ErrorCode, label::Label},
    span::Span,
};

/// An error or warning, pinned to the tags it concerns.
///
/// The first label is the offending tag. Secondary labels point at the
/// element that encloses or owns it, so a report on a requirement without
/// a reference also shows the decision declaring it:
///
/// ```text
/// error[E102]: `dmn:informationRequirement` references nothing
///   --> model.dmn:12:9
///    |
/// 11 |       <dmn:decision id="_eligible" name="Eligible">
///    |       --------------------------------------------- required by `_eligible`
/// 12 |         <dmn:informationRequirement id="_ir1"/>
///    |         ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^ expected a `requiredDecision` or `requiredInput` child
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// # Example
    ///
    /// ```
    /// # use dmnkit_xml::error::{Diagnostic, ErrorCode};
    /// # use dmnkit_xml::Span;
    /// let diag = Diagnostic::error("document root is `model`, expected `definitions`")
    ///     .with_code(ErrorCode::E100)
    ///     .with_label(Span::new(0..7), "unexpected root")
    ///     .with_help("DMN files start with a `definitions` element");
    ///
    /// assert_eq!(diag.labels().len(), 1);
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, message.into())
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, message.into())
    }

    fn with_severity(severity: Severity, message: String) -> Self {
        Self {
            severity,
            code: None,
            message,
            labels: Vec::new(),
            help: None,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Primary labels first in the order added, then the secondary ones.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Marks the tag at fault.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        let at = self.labels.iter().take_while(|label| label.is_primary()).count();
        self.labels.insert(at, Label::primary(span, message));
        self
    }

    /// Marks a tag giving context, such as the enclosing diagram of a shape.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// `error[E101]: message`, or `warning: message` without a code.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}[{code}]: {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}
