//! Labeled source spans for diagnostic messages.
//!
//! A label associates a message with a byte range of the DMN source,
//! usually the start tag of the element that caused the problem.

use crate::span::Span;

/// A labeled span in the source document.
///
/// The primary label marks the tag at fault. Secondary labels give
/// context and render with a dashed underline:
///
/// ```text
/// error[E102]: shape for `_d1` has no `dc:Bounds`
///   --> model.dmn:40:5
///    |
/// 40 |     <dmndi:DMNDiagram id="_drg" name="DRG">
///    |     --------------------------------------- in diagram `_drg`
/// 41 |       <dmndi:DMNShape id="dmnshape-_d1" dmnElementRef="_d1"/>
///    |       ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^ shape declared here
/// ```
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the span this label applies to.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Check if this is a secondary label.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
