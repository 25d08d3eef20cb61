//! Rendering [`CliError`]s through miette.
//!
//! Every error becomes one or more [`Report`]s. A parse error yields one
//! report per diagnostic, carrying the source text so miette can underline
//! the offending span; any other error yields a single report with no source.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceCode, SourceSpan};

use liberty_parser::{Diagnostic, error::Label};

use crate::CliError;

/// One miette-renderable error.
#[derive(Debug)]
pub struct Report<'a> {
    message: String,
    code: Option<String>,
    help: Option<String>,
    labels: Vec<LabeledSpan>,
    src: Option<&'a str>,
    cause: Option<&'a CliError>,
}

impl<'a> Report<'a> {
    /// A report for one parser diagnostic over `src`.
    ///
    /// The resolved location is appended to the message. The primary label
    /// names the tokens that would have been accepted, when the parser
    /// recorded them.
    pub fn from_diagnostic(diag: &Diagnostic, src: &'a str) -> Self {
        let message = match diag.location() {
            Some(location) => format!(
                "{} (line {}, column {})",
                diag.message(),
                location.line,
                location.column
            ),
            None => diag.message().to_string(),
        };

        let mut labels: Vec<_> = diag
            .labels()
            .iter()
            .map(|label| labeled_span(label, diag.expected()))
            .collect();
        if labels.is_empty() {
            if let Some(location) = diag.location() {
                labels.push(LabeledSpan::new_primary_with_span(
                    Some("here".to_string()),
                    SourceSpan::new(location.offset.into(), 0),
                ));
            }
        }

        Self {
            message,
            code: diag.code().map(|code| code.to_string()),
            help: diag.help().map(str::to_string),
            labels,
            src: Some(src),
            cause: None,
        }
    }

    /// A report for an error that has no position in the input.
    pub fn from_error(err: &'a CliError) -> Self {
        let code = match err {
            CliError::Io(_) => Some("liberty::io"),
            CliError::Parse { .. } => None,
            CliError::Config(_) => Some("liberty::config"),
            CliError::Json(_) => Some("liberty::json"),
        };
        let help = matches!(err, CliError::Config(_)).then(|| {
            "configuration is read from --config, liberty/config.toml, or the user config directory"
                .to_string()
        });

        Self {
            message: err.to_string(),
            code: code.map(str::to_string),
            help,
            labels: Vec::new(),
            src: None,
            cause: Some(err),
        }
    }
}

/// Convert a label, describing the expected tokens on the primary one.
fn labeled_span(label: &Label, expected: &[String]) -> LabeledSpan {
    let span = SourceSpan::new(label.span().start().into(), label.span().len());
    if !label.is_primary() {
        return LabeledSpan::new_with_span(Some(label.message().to_string()), span);
    }
    let text = match expected {
        [] => label.message().to_string(),
        [only] => format!("expected {only}"),
        [first, second] => format!("expected {first} or {second}"),
        [init @ .., last] => format!("expected {}, or {last}", init.join(", ")),
    };
    LabeledSpan::new_primary_with_span(Some(text), span)
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Report<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.and_then(std::error::Error::source)
    }
}

impl MietteDiagnostic for Report<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.code
            .as_ref()
            .map(|code| Box::new(code) as Box<dyn fmt::Display>)
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.src.as_ref().map(|src| src as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            return None;
        }
        Some(Box::new(self.labels.iter().cloned()))
    }
}

/// Split a [`CliError`] into the reports to print.
///
/// [`CliError::Parse`] yields one report per diagnostic, in order.
pub fn reports(err: &CliError) -> Vec<Report<'_>> {
    match err {
        CliError::Parse { err: parse_err, src } => parse_err
            .diagnostics()
            .iter()
            .map(|diag| Report::from_diagnostic(diag, src))
            .collect(),
        _ => vec![Report::from_error(err)],
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use liberty_parser::{ErrorCode, ErrorMode, ParseError, ParseOptions, Span, parse, parse_with};

    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_parse_error_becomes_one_report() {
        let src = "foo : ;";
        let err = CliError::new_parse_error(parse(src).unwrap_err(), src);

        let reports = reports(&err);
        assert_eq!(reports.len(), 1);

        let report = &reports[0];
        assert_eq!(
            report.to_string(),
            "expected an attribute value after `:`, found `;` (line 1, column 7)"
        );
        assert_eq!(report.code().unwrap().to_string(), "E100");
        assert!(report.source_code().is_some());

        let labels: Vec<_> = report.labels().unwrap().collect();
        assert_eq!(labels[0].offset(), 6);
        assert_eq!(labels[0].len(), 1);
        assert_eq!(
            labels[0].label(),
            Some("expected an identifier, a number, or a string")
        );
    }

    #[test]
    fn test_single_expected_token_in_label() {
        let src = "foo : 1 }";
        let err = CliError::new_parse_error(parse(src).unwrap_err(), src);

        let reports = reports(&err);
        let labels: Vec<_> = reports[0].labels().unwrap().collect();
        assert_eq!(labels[0].label(), Some("expected `;`"));
        assert_eq!(labels[0].offset(), 8);
    }

    #[test]
    fn test_label_without_expected_tokens_is_kept() {
        let diag = Diagnostic::error("unexpected character `$`")
            .with_code(ErrorCode::E002)
            .with_label(Span::new(4..5), "unexpected character");

        let report = Report::from_diagnostic(&diag, "a : $;");
        assert_eq!(report.to_string(), "unexpected character `$`");
        let labels: Vec<_> = report.labels().unwrap().collect();
        assert_eq!(labels[0].label(), Some("unexpected character"));
    }

    #[test]
    fn test_location_without_labels_marks_the_position() {
        let diag = Diagnostic::error("unexpected end of input").with_location(
            liberty_parser::Location {
                offset: 3,
                line: 1,
                column: 4,
            },
        );

        let report = Report::from_diagnostic(&diag, "a :");
        assert_eq!(
            report.to_string(),
            "unexpected end of input (line 1, column 4)"
        );
        let labels: Vec<_> = report.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert_eq!((labels[0].offset(), labels[0].len()), (3, 0));
    }

    #[test]
    fn test_accumulated_diagnostics_render_separately() {
        let src = "a : $1; # b";
        let options = ParseOptions::default().with_errors(ErrorMode::Accumulate);
        let err = CliError::new_parse_error(parse_with(src, &options).unwrap_err(), src);

        let reports = reports(&err);
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.code().unwrap().to_string() == "E002"));
        assert!(reports[0].to_string().ends_with("(line 1, column 5)"));
        assert!(reports[1].to_string().ends_with("(line 1, column 9)"));
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diags = vec![
            Diagnostic::error("first error")
                .with_code(ErrorCode::E002)
                .with_label(Span::new(0..1), "first"),
            Diagnostic::error("second error")
                .with_code(ErrorCode::E002)
                .with_label(Span::new(4..5), "second")
                .with_help("help for second"),
        ];
        let err = CliError::new_parse_error(ParseError::from(diags), "source");

        let reports = reports(&err);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].to_string(), "first error");
        assert!(reports[0].help().is_none());
        assert_eq!(reports[1].help().unwrap().to_string(), "help for second");
    }

    #[test]
    fn test_non_parse_error() {
        let err = CliError::Config(ConfigError::MissingFile(PathBuf::from("missing.toml")));

        let reports = reports(&err);
        assert_eq!(reports.len(), 1);

        let report = &reports[0];
        assert_eq!(
            report.to_string(),
            "Configuration error: Missing configuration file: missing.toml"
        );
        assert_eq!(report.code().unwrap().to_string(), "liberty::config");
        assert!(report.help().is_some());
        assert!(report.source_code().is_none());
        assert!(report.labels().is_none());
    }

    #[test]
    fn test_primary_flag_on_labels() {
        let diag = Diagnostic::error("expected a statement or `}`, found end of input")
            .with_label(Span::new(12..12), "unexpected end of input")
            .with_secondary_label(Span::new(8..9), "group opened here");

        let report = Report::from_diagnostic(&diag, "library(x) {");

        let labels: Vec<_> = report.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert_eq!(labels[0].label(), Some("unexpected end of input"));
        assert_eq!(labels[1].label(), Some("group opened here"));
        assert!(!labels[1].primary());
    }
}
