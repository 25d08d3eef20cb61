//! Error and diagnostic system for the Liberty parser.
//!
//! This module provides an error handling system with:
//! - Error codes grouped by phase (`E0xx` lexical, `E1xx` syntax)
//! - Labeled spans and resolved line/column locations
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error with an optional error code, source locations,
//! the tokens that would have been accepted, and help text. Multiple
//! diagnostics are wrapped in [`ParseError`] when returned from a parse.
//!
//! # Example
//!
//! ```
//! # use liberty_parser::error::{Diagnostic, ErrorCode};
//! # use liberty_parser::Span;
//!
//! let diag = Diagnostic::error("expected an attribute value after `:`")
//!     .with_code(ErrorCode::E100)
//!     .with_label(Span::new(6..7), "unexpected token")
//!     .with_expected(["a number", "a string", "an identifier"]);
//!
//! assert!(diag.kind().is_some());
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::{DiagnosticKind, ErrorCode};
pub use label::Label;
pub use parse_error::ParseError;
