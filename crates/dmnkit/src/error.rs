//! Error types for dmnkit operations.
//!
//! This module provides the main error type [`DmnError`] which wraps
//! the error conditions that can occur while converting DMN documents.

use std::io;

use thiserror::Error;

use dmnkit_xml::{ParseError, WriteError};

/// The main error type for dmnkit operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant contains structured error information with source code
/// spans. This provides detailed error information that can be used for rich
/// error reporting.
///
/// # Policies
///
/// Unmarshalling is lenient: unresolved references and missing shapes are
/// logged, not returned. Marshalling is strict: a graph that could not have
/// come from a valid document is a [`DmnError::Marshall`].
#[derive(Debug, Error)]
pub enum DmnError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Marshall error: {0}")]
    Marshall(String),
}

impl DmnError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
