//! Error codes for the DMN codec diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - XML syntax errors
//! - `E1xx` - Document structure errors
//! - `E2xx` - Attribute value errors
//! - `E3xx` - Writer errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // XML Syntax Errors (E0xx)
    // =========================================================================
    /// Malformed XML.
    ///
    /// The underlying XML reader rejected the input (mismatched tags, bad
    /// entity, invalid attribute syntax).
    E001,

    /// Unexpected end of document.
    ///
    /// The input ended while elements were still open.
    E002,

    // =========================================================================
    // Document Structure Errors (E1xx)
    // =========================================================================
    /// Missing `definitions` root.
    ///
    /// The document root is not a DMN `definitions` element.
    E100,

    /// Missing required attribute.
    ///
    /// An element that needs an `id`, `href` or similar attribute does not carry it.
    E101,

    /// Missing required child element.
    ///
    /// A DMNDI shape without `dc:Bounds`, or a requirement without a reference.
    E102,

    // =========================================================================
    // Attribute Value Errors (E2xx)
    // =========================================================================
    /// Invalid number.
    ///
    /// A coordinate, size or width is not a valid floating point number.
    E200,

    /// Invalid boolean.
    ///
    /// A boolean attribute holds something other than `true` or `false`.
    E201,

    /// Invalid color component.
    ///
    /// A `DMNStyle` color component is not an integer in `0..=255`.
    E202,

    // =========================================================================
    // Writer Errors (E3xx)
    // =========================================================================
    /// XML serialization failed.
    E300,

    /// Serialized output is not valid UTF-8.
    E301,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // XML syntax errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            // Structure errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            // Attribute value errors
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            // Writer errors
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // XML syntax errors
            ErrorCode::E001 => "malformed xml",
            ErrorCode::E002 => "unexpected end of document",
            // Structure errors
            ErrorCode::E100 => "missing definitions root",
            ErrorCode::E101 => "missing required attribute",
            ErrorCode::E102 => "missing required element",
            // Attribute value errors
            ErrorCode::E200 => "invalid number",
            ErrorCode::E201 => "invalid boolean",
            ErrorCode::E202 => "invalid color component",
            // Writer errors
            ErrorCode::E300 => "xml serialization failed",
            ErrorCode::E301 => "invalid utf-8 output",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E200.to_string(), "E200");
        assert_eq!(ErrorCode::E300.to_string(), "E300");
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::E002.as_str(), "E002");
        assert_eq!(ErrorCode::E301.as_str(), "E301");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "malformed xml");
        assert_eq!(ErrorCode::E101.description(), "missing required attribute");
        assert_eq!(ErrorCode::E202.description(), "invalid color component");
    }
}
