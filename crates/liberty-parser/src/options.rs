//! Parser configuration.
//!
//! [`ParseOptions`] controls the policies the Liberty grammar leaves open:
//! how block comments are matched, whether empty group bodies are accepted,
//! whether lexing stops at the first error, and how deep groups may nest.
//! Every field has a default, and the type implements
//! [`serde::Deserialize`] so it can be loaded from a configuration file.
//!
//! # Example
//!
//! ```
//! # use liberty_parser::{CommentStyle, ErrorMode, ParseOptions};
//! let options = ParseOptions::default()
//!     .with_errors(ErrorMode::Accumulate)
//!     .with_comments(CommentStyle::Grammar);
//!
//! assert_eq!(options.max_depth(), 256);
//! ```

use serde::Deserialize;

/// Default limit on group nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// What happens after the first lexical error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorMode {
    /// Stop at the first error.
    #[default]
    FailFast,
    /// Keep lexing past errors and report all of them together.
    ///
    /// After an unexpected character the lexer skips that character and
    /// resumes. Parsing still stops at the first syntax error.
    Accumulate,
}

/// How `/* ... */` comments are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentStyle {
    /// A comment runs to the first `*/`, across any number of lines.
    #[default]
    Block,
    /// The literal `/\*.*(\n.*)?\*/` pattern.
    ///
    /// A comment may cover its opening line and at most one more, and ends at
    /// the *last* `*/` on the furthest line it reaches. Longer comments are
    /// lexical errors.
    Grammar,
}

/// Whether `name() { }` with no statements is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyGroups {
    #[default]
    Allow,
    /// Require at least one statement per group body.
    Reject,
}

/// Options for a single parse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ParseOptions {
    errors: ErrorMode,
    comments: CommentStyle,
    empty_groups: EmptyGroups,
    max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            errors: ErrorMode::default(),
            comments: CommentStyle::default(),
            empty_groups: EmptyGroups::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Returns the error mode.
    pub fn errors(&self) -> ErrorMode {
        self.errors
    }

    /// Returns the comment style.
    pub fn comments(&self) -> CommentStyle {
        self.comments
    }

    /// Returns the empty group policy.
    pub fn empty_groups(&self) -> EmptyGroups {
        self.empty_groups
    }

    /// Returns the maximum group nesting depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Set the error mode.
    pub fn with_errors(mut self, errors: ErrorMode) -> Self {
        self.errors = errors;
        self
    }

    /// Set the comment style.
    pub fn with_comments(mut self, comments: CommentStyle) -> Self {
        self.comments = comments;
        self
    }

    /// Set the empty group policy.
    pub fn with_empty_groups(mut self, empty_groups: EmptyGroups) -> Self {
        self.empty_groups = empty_groups;
        self
    }

    /// Set the maximum group nesting depth.
    ///
    /// The top-level statement is at depth 1.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
