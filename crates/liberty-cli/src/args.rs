//! Command-line argument definitions for the Liberty CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input and output paths, the output
//! format, configuration file selection, parser policy overrides, and
//! logging verbosity.

use clap::{Parser, ValueEnum};

use liberty_parser::CommentStyle;

/// Command-line arguments for the Liberty parser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input Liberty file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file; standard output when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Report every lexical error instead of stopping at the first one
    #[arg(long)]
    pub accumulate_errors: bool,

    /// Block comment matching; overrides the configuration file
    #[arg(long, value_enum)]
    pub comments: Option<CommentsArg>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// What to write for a successfully parsed file.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Root statement, statement counts, and nesting depth
    #[default]
    Summary,
    /// Indented outline of every statement
    Tree,
    /// The tree as JSON
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentsArg {
    /// `/* ... */` across any number of lines
    Block,
    /// At most two lines, ending at the last `*/`
    Grammar,
}

impl From<CommentsArg> for CommentStyle {
    fn from(arg: CommentsArg) -> Self {
        match arg {
            CommentsArg::Block => CommentStyle::Block,
            CommentsArg::Grammar => CommentStyle::Grammar,
        }
    }
}
