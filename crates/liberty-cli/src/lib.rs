//! CLI logic for the Liberty parser.
//!
//! Reads a Liberty file, parses it with options resolved from the
//! configuration file and the command line, and writes a summary, an outline,
//! or JSON.

pub mod error_adapter;

mod args;
mod config;
mod error;
mod render;

pub use args::{Args, CommentsArg, OutputFormat};
pub use config::{AppConfig, ConfigError};
pub use error::CliError;

use std::{
    fs,
    io::{self, Write as _},
};

use log::{debug, info};

use liberty_parser::{ErrorMode, ParseOptions};

/// Run the Liberty CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - JSON serialization errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        format:? = args.format;
        "Processing Liberty file"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let options = resolve_options(args, app_config.parser);

    let source = fs::read_to_string(&args.input)?;

    let document = match liberty_parser::parse_with(&source, &options) {
        Ok(document) => document,
        Err(err) => return Err(CliError::new_parse_error(err, source)),
    };
    debug!(
        statements = document.statement_count(),
        depth = document.depth();
        "Parsed document"
    );

    let output = render::render(&document, args.format)?;

    match &args.output {
        Some(path) => {
            fs::write(path, output)?;
            info!(output_file = path; "Output written");
        }
        None => io::stdout().lock().write_all(output.as_bytes())?,
    }

    Ok(())
}

/// Apply command-line overrides on top of the configured parser options.
fn resolve_options(args: &Args, mut options: ParseOptions) -> ParseOptions {
    if args.accumulate_errors {
        options = options.with_errors(ErrorMode::Accumulate);
    }
    if let Some(comments) = args.comments {
        options = options.with_comments(comments.into());
    }
    options
}
