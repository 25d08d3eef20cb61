//! Error codes for the Liberty diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexical errors
//! - `E1xx` - Syntax errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexical Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string was opened with `"` but the source ended before an unescaped
    /// closing quote.
    E001,

    /// Unexpected character.
    ///
    /// The character starts neither a token nor whitespace, a comment, or a
    /// line continuation.
    E002,

    /// Unterminated block comment.
    ///
    /// A `/*` comment was never closed by `*/`.
    E003,

    // =========================================================================
    // Syntax Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The parser encountered a token no alternative of the current rule
    /// accepts.
    E100,

    /// Incomplete input.
    ///
    /// The input ended before the current statement was complete.
    E101,

    /// Trailing input.
    ///
    /// A document holds exactly one top-level statement; more tokens followed it.
    E102,

    /// Nesting limit exceeded.
    ///
    /// Groups are nested deeper than the configured `max_depth`.
    E103,

    /// Empty group body.
    ///
    /// A group has no statements between `{` and `}` while empty groups are
    /// rejected.
    E104,
}

/// The two failure classes a parse can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Input text matching no token or ignore pattern.
    Lexical,
    /// A token sequence matching no grammar alternative.
    Syntax,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "unterminated block comment",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E102 => "trailing input",
            ErrorCode::E103 => "nesting too deep",
            ErrorCode::E104 => "empty group body",
        }
    }

    /// Returns the phase this code belongs to.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ErrorCode::E001 | ErrorCode::E002 | ErrorCode::E003 => DiagnosticKind::Lexical,
            _ => DiagnosticKind::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
