//! Error and diagnostic system for the DMN XML codec.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The reader reports problems as [`Diagnostic`]s carrying the byte span of the
//! offending tag. Multiple diagnostics are wrapped in [`ParseError`]. The writer
//! has its own [`WriteError`] since it never has source text to point into.
//!
//! # Example
//!
//! ```
//! # use dmnkit_xml::error::{Diagnostic, ErrorCode};
//! # use dmnkit_xml::Span;
//!
//! let span = Span::new(120..160);
//!
//! let diag = Diagnostic::error("`dc:Bounds` attribute `width` is not a number")
//!     .with_code(ErrorCode::E200)
//!     .with_label(span, "expected a floating point value")
//!     .with_help("use a plain decimal such as `100.0`");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;
mod write_error;

pub(crate) use collector::DiagnosticCollector;
pub(crate) use parse_error::Result;
pub(crate) use write_error::xml_error;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
pub use write_error::WriteError;
