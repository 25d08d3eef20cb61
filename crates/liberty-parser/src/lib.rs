//! # Liberty Parser
//!
//! Parser for the Liberty cell-library format. This crate turns Liberty
//! source text into a generic tree of attributes and nested groups; it does
//! not interpret what a `cell`, `pin`, or `timing` group means.
//!
//! ## Usage
//!
//! ```
//! # use liberty_parser::{parse, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         library(demo) {
//!             delay_model : table_lookup;
//!             cell(INV) {
//!                 area : 1.5;
//!                 pin(A) { direction : input; capacitance : 0.001985; }
//!             }
//!         }
//!     "#;
//!
//!     let doc = parse(source)?;
//!     let library = doc.root().as_group().unwrap();
//!     let cell = library.group("cell", "INV").unwrap();
//!     assert_eq!(cell.attribute("area").unwrap().as_str(), "1.5");
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Tokenize** - [`Lexer`] skips whitespace, comments, and line
//!    continuations and classifies the rest into [`Token`]s
//! 2. **Parse** - a recursive-descent parser builds [`KeyDatum`] statements,
//!    resolving each literal token into an [`Atom`]
//!
//! Both phases report failures as [`Diagnostic`]s with a code, a span, and a
//! line/column [`Location`]. [`ParseOptions`] selects the comment policy, the
//! empty-group policy, the nesting limit, and whether lexical errors are
//! accumulated.

mod atom;
pub mod error;
mod lexer;
mod options;
mod parser;
mod span;
mod tokens;
mod tree;

pub use atom::{Atom, Number, NumericValue};
pub use error::{Diagnostic, DiagnosticKind, ErrorCode, ParseError};
pub use lexer::{Lexer, tokenize};
pub use options::{CommentStyle, DEFAULT_MAX_DEPTH, EmptyGroups, ErrorMode, ParseOptions};
pub use span::{LineIndex, Location, Span, Spanned};
pub use tokens::{PositionedToken, Token, TokenKind};
pub use tree::{ComplexAttribute, Document, Group, KeyDatum, SimpleAttribute, Walk};

use log::debug;

/// Parse Liberty source text with the default options.
///
/// # Example
///
/// ```
/// let doc = liberty_parser::parse("direction : input;").unwrap();
/// assert_eq!(doc.root().name().as_str(), "direction");
///
/// let err = liberty_parser::parse("foo : ;").unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "error[E100]: expected an attribute value after `:`, found `;` (line 1, column 7)"
/// );
/// ```
pub fn parse(source: &str) -> Result<Document, ParseError> {
    parse_with(source, &ParseOptions::default())
}

/// Parse Liberty source text.
///
/// # Arguments
///
/// * `source` - The Liberty source text
/// * `options` - Comment, empty-group, nesting, and error policies
///
/// # Returns
///
/// Returns the [`Document`] on success, or a [`ParseError`] holding every
/// lexical diagnostic (all of them in accumulate mode) or the first syntax
/// diagnostic.
pub fn parse_with(source: &str, options: &ParseOptions) -> Result<Document, ParseError> {
    debug!(bytes = source.len(), options:? = options; "Parsing Liberty source");

    // Step 1: Tokenize
    let tokens = lexer::tokenize(source, options)?;

    // Step 2: Parse
    let document = parser::build_document(source, &tokens, options)?;

    Ok(document)
}
