//! Errors raised while serializing a document.

use thiserror::Error;

use crate::error::ErrorCode;

/// Error type for [`write_definitions`](crate::write_definitions).
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to serialize DMN document: {0}")]
    Xml(String),

    #[error("serialized DMN document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl WriteError {
    /// The diagnostic code matching this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Xml(_) => ErrorCode::E300,
            Self::Encoding(_) => ErrorCode::E301,
        }
    }
}

/// Maps an error from the XML writer into a [`WriteError`].
pub(crate) fn xml_error(err: impl std::fmt::Display) -> WriteError {
    WriteError::Xml(err.to_string())
}
