//! The core diagnostic type for the Liberty error system.
//!
//! A [`Diagnostic`] represents a single error with an optional
//! error code, labeled source spans, the resolved location of the offending
//! text, the tokens that would have been accepted, and help text.

use std::fmt;

use crate::{
    error::{DiagnosticKind, error_code::ErrorCode, label::Label},
    span::{Location, Span},
};

/// A diagnostic message with source location information.
///
/// Every diagnostic is an error: the parser either returns a document or
/// the diagnostics explaining why it could not.
///
/// # Example
///
/// ```text
/// error[E100]: expected an attribute value after `:`, found `;`
///   --> cells.lib:4:13
///    |
///  4 |   direction : ;
///    |               ^ unexpected token
///    |
///    = help: expected one of: a number, a string, an identifier
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
    location: Option<Location>,
    expected: Vec<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use liberty_parser::error::{Diagnostic, ErrorCode};
    /// # use liberty_parser::Span;
    ///
    /// let diag = Diagnostic::error("unexpected character `$`")
    ///     .with_code(ErrorCode::E002)
    ///     .with_label(Span::new(12..13), "unexpected character")
    ///     .with_help("remove the character or quote the value");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
            location: None,
            expected: Vec::new(),
        }
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Whether this is a lexical or a syntax error, derived from the code.
    pub fn kind(&self) -> Option<DiagnosticKind> {
        self.code.map(|code| code.kind())
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Span of the first primary label.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Line and column of the offending text, if resolved.
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Descriptions of the tokens that would have been accepted.
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Set the resolved source location.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the list of acceptable tokens.
    pub fn with_expected<I, S>(mut self, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected = expected.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message", then the position
        write!(f, "error")?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(location) = self.location {
            write!(f, " (line {}, column {})", location.line, location.column)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::error("test error");

        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.kind().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
        assert!(diag.location().is_none());
        assert!(diag.expected().is_empty());
    }

    #[test]
    fn test_diagnostic_kind_follows_code() {
        let lexical = Diagnostic::error("unexpected character").with_code(ErrorCode::E002);
        let syntax = Diagnostic::error("unexpected token").with_code(ErrorCode::E100);

        assert_eq!(lexical.kind(), Some(DiagnosticKind::Lexical));
        assert_eq!(syntax.kind(), Some(DiagnosticKind::Syntax));
    }

    #[test]
    fn test_diagnostic_primary_span() {
        let diag = Diagnostic::error("expected `}`")
            .with_secondary_label(Span::new(4..5), "group opened here")
            .with_label(Span::new(20..20), "incomplete");

        assert_eq!(diag.labels().len(), 2);
        assert_eq!(diag.primary_span(), Some(Span::new(20..20)));
    }

    #[test]
    fn test_diagnostic_with_expected() {
        let diag = Diagnostic::error("expected `;` or `{` after argument list")
            .with_expected(["`;`", "`{`"]);

        assert_eq!(diag.expected(), ["`;`", "`{`"]);
    }

    #[test]
    fn test_diagnostic_display_with_code() {
        let diag = Diagnostic::error("unexpected character `$`").with_code(ErrorCode::E002);

        assert_eq!(diag.to_string(), "error[E002]: unexpected character `$`");
    }

    #[test]
    fn test_diagnostic_display_with_location() {
        let diag = Diagnostic::error("expected `;`")
            .with_code(ErrorCode::E100)
            .with_location(Location {
                offset: 30,
                line: 3,
                column: 7,
            });

        assert_eq!(
            diag.to_string(),
            "error[E100]: expected `;` (line 3, column 7)"
        );
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::error("unexpected end of input");

        assert_eq!(diag.to_string(), "error: unexpected end of input");
    }
}
