//! Lexical analyzer for Liberty source text.
//!
//! The lexer turns source text into [`PositionedToken`]s. Whitespace, line
//! continuations (`\` followed by a newline), and `/* ... */` comments are
//! skipped; everything else must be a number, a quoted string, an
//! identifier, or one of `: ; , ( ) { }`.
//!
//! [`Lexer`] is a lazy iterator that yields one token per call and can be
//! restarted from any byte offset. [`tokenize`] drives it to completion and
//! collects either every token or every diagnostic.

use log::{debug, trace};
use winnow::{
    Parser as _,
    ascii::{digit0, digit1},
    combinator::{alt, cut_err, opt, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location as _, Stream},
    token::{any, none_of, one_of, take_until, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    options::{CommentStyle, ErrorMode, ParseOptions},
    span::{LineIndex, Location, Span},
    tokens::{PositionedToken, Token},
};

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()`; the error span covers from
/// `start` to the position where the error was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Spaces, tabs, carriage returns, and newlines.
fn whitespace(input: &mut Input<'_>) -> IResult<()> {
    take_while(1.., [' ', '\t', '\r', '\n'])
        .void()
        .parse_next(input)
}

/// A backslash immediately followed by a newline joins two physical lines.
fn line_continuation(input: &mut Input<'_>) -> IResult<()> {
    ('\\', opt('\r'), '\n').void().parse_next(input)
}

/// `/* ... */` ending at the first `*/`, across any number of lines.
fn block_comment(input: &mut Input<'_>) -> IResult<()> {
    let start = input.current_token_start();

    "/*".parse_next(input)?;

    cut_err(terminated(take_until(0.., "*/"), "*/"))
        .context(LexerDiagnostic {
            code: ErrorCode::E003,
            message: "unterminated block comment",
            help: Some("close the comment with `*/`"),
            start,
        })
        .void()
        .parse_next(input)
}

/// `/* ... */` matched the way the `/\*.*(\n.*)?\*/` pattern matches it.
///
/// A comment that cannot be matched is left in the input, so its `/` is
/// reported as an unexpected character.
fn grammar_comment(input: &mut Input<'_>) -> IResult<()> {
    match grammar_comment_len(input.peek_slice(input.eof_offset())) {
        Some(len) => {
            input.next_slice(len);
            Ok(())
        }
        None => Err(ErrMode::Backtrack(ContextError::new())),
    }
}

/// Length of the two-line comment at the start of `text`, if any.
///
/// `.` never matches a newline and both repetitions are greedy, so the
/// comment ends at the last `*/` of the second line when there is one, and
/// otherwise at the last `*/` of the first line.
fn grammar_comment_len(text: &str) -> Option<usize> {
    let body = text.strip_prefix("/*")?;
    let first_end = body.find('\n').unwrap_or(body.len());
    let first = &body[..first_end];

    if let Some(rest) = body.get(first_end + 1..) {
        let second = &rest[..rest.find('\n').unwrap_or(rest.len())];
        if let Some(close) = second.rfind("*/") {
            return Some(2 + first_end + 1 + close + 2);
        }
    }

    first.rfind("*/").map(|close| 2 + close + 2)
}

/// Skip everything between tokens.
fn ignored(input: &mut Input<'_>, comments: CommentStyle) -> IResult<()> {
    let comment: fn(&mut Input<'_>) -> IResult<()> = match comments {
        CommentStyle::Block => block_comment,
        CommentStyle::Grammar => grammar_comment,
    };

    repeat(0.., alt((whitespace, line_continuation, comment))).parse_next(input)
}

/// A double-quoted string, returned raw with its quotes and escapes.
///
/// A backslash escapes the character after it, including a quote, another
/// backslash, or a newline.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();

    let string_char = alt((preceded('\\', any).void(), none_of(['"', '\\']).void()));

    (
        '"',
        cut_err(terminated(
            repeat::<_, _, (), _, _>(0.., string_char),
            '"',
        ))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add the closing `\"`"),
            start,
        }),
    )
        .take()
        .map(Token::String)
        .parse_next(input)
}

/// `[+-]?\d+(\.\d*)?`
fn number_literal<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    (opt(one_of(['+', '-'])), digit1, opt(('.', digit0)))
        .take()
        .parse_next(input)
}

/// A `[3]` bus index suffix.
fn bus_index(input: &mut Input<'_>) -> IResult<()> {
    ('[', digit1, ']').void().parse_next(input)
}

/// Word characters followed by any number of bus indices: `A`, `1v8`, `D[0][3]`.
fn identifier<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    (
        take_while(1.., is_word_char),
        repeat::<_, _, (), _, _>(0.., bus_index),
    )
        .take()
        .parse_next(input)
}

/// A number or an identifier, whichever match is longer.
///
/// Words such as `3ns` or `1[2]` are identifiers because they extend further
/// than the number they start with. A tie goes to the number.
fn word<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.checkpoint();

    let number = number_literal(input)
        .ok()
        .map(|text| (text, input.checkpoint()));
    input.reset(&start);

    let identifier = identifier(input)
        .ok()
        .map(|text| (text, input.checkpoint()));
    input.reset(&start);

    let (token, end) = match (number, identifier) {
        (Some((number, _)), Some((identifier, end))) if identifier.len() > number.len() => {
            (Token::Identifier(identifier), end)
        }
        (Some((number, end)), _) => (Token::Number(number), end),
        (None, Some((identifier, end))) => (Token::Identifier(identifier), end),
        (None, None) => return Err(ErrMode::Backtrack(ContextError::new())),
    };

    input.reset(&end);
    Ok(token)
}

fn punctuation<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        ':'.value(Token::Colon),
        ';'.value(Token::Semicolon),
        ','.value(Token::Comma),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
    ))
    .parse_next(input)
}

fn token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        string_literal, // Commits after the opening quote
        word,
        punctuation,
    ))
    .parse_next(input)
}

/// Lazy, restartable Liberty lexer.
///
/// Each call to [`Iterator::next`] skips ignorable text and yields the next
/// token or a lexical [`Diagnostic`]. With [`ErrorMode::FailFast`] the
/// iterator ends after the first diagnostic. With [`ErrorMode::Accumulate`]
/// it skips the offending character and keeps going; an unterminated string
/// or comment swallows the rest of the input.
///
/// # Example
///
/// ```
/// # use liberty_parser::{Lexer, ParseOptions, Token};
/// let options = ParseOptions::default();
/// let mut lexer = Lexer::new("area : 4.5;", &options);
///
/// let first = lexer.next().unwrap().unwrap();
/// assert_eq!(first.token, Token::Identifier("area"));
///
/// // Restart from where the first lexer stopped.
/// let rest: Vec<_> = Lexer::resume("area : 4.5;", lexer.offset(), &options)
///     .map(|token| token.unwrap().token)
///     .collect();
/// assert_eq!(rest, [Token::Colon, Token::Number("4.5"), Token::Semicolon]);
/// ```
pub struct Lexer<'src> {
    source: &'src str,
    input: Input<'src>,
    lines: LineIndex<'src>,
    /// Location of the last token, the starting point for the next lookup
    last: Location,
    errors: ErrorMode,
    comments: CommentStyle,
    done: bool,
}

impl<'src> Lexer<'src> {
    /// Create a lexer positioned at the start of `source`.
    pub fn new(source: &'src str, options: &ParseOptions) -> Self {
        Self {
            source,
            input: LocatingSlice::new(source),
            lines: LineIndex::new(source),
            last: Location {
                offset: 0,
                line: 1,
                column: 1,
            },
            errors: options.errors(),
            comments: options.comments(),
            done: false,
        }
    }

    /// Create a lexer that starts scanning at byte `offset` of `source`.
    ///
    /// Token spans and locations stay relative to the whole source.
    pub fn resume(source: &'src str, offset: usize, options: &ParseOptions) -> Self {
        let mut lexer = Self::new(source, options);
        lexer.seek(offset);
        lexer
    }

    /// Byte offset where scanning will continue.
    pub fn offset(&self) -> usize {
        self.input.current_token_start()
    }

    /// Move the lexer to byte `offset`.
    ///
    /// Offsets inside a multi-byte character move forward to the next
    /// character boundary; offsets past the end move to the end.
    pub fn seek(&mut self, offset: usize) {
        let mut offset = offset.min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset += 1;
        }

        self.input = LocatingSlice::new(self.source);
        self.input.next_slice(offset);
        self.done = false;
    }

    /// Report an error and position the input for the next call.
    fn recover(
        &mut self,
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let diagnostic = self.convert_err_mode(err, error_pos);
        if let Some(location) = diagnostic.location() {
            self.last = location;
        }
        trace!(code:? = diagnostic.code(), offset = error_pos; "Lexical error");

        match self.errors {
            ErrorMode::FailFast => self.done = true,
            ErrorMode::Accumulate => {
                if diagnostic.code() == Some(ErrorCode::E002) {
                    self.input.next_token();
                } else {
                    let rest = self.input.eof_offset();
                    self.input.next_slice(rest);
                }
            }
        }

        diagnostic
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Uses the attached `LexerDiagnostic` when present and falls back to
    /// E002 (unexpected character) otherwise.
    fn convert_err_mode(
        &self,
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos.max(*start));

            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description())
                .with_location(self.lines.location_from(self.last, *start));
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let rest = self.source.get(error_pos..).unwrap_or_default();
        let Some(c) = rest.chars().next() else {
            return Diagnostic::error("unexpected end of input")
                .with_code(ErrorCode::E002)
                .with_label(Span::new(error_pos..error_pos), "input ends here")
                .with_location(self.lines.location_from(self.last, error_pos));
        };

        let span = Span::new(error_pos..error_pos + c.len_utf8());
        let mut diag = Diagnostic::error(format!("unexpected character `{}`", c.escape_debug()))
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
            .with_location(self.lines.location_from(self.last, error_pos));

        let help = match c {
            '\\' => Some("a line continuation `\\` must be followed directly by a newline"),
            '+' | '-' => Some("a sign must be followed by digits"),
            '/' if self.comments == CommentStyle::Grammar && rest.starts_with("/*") => {
                Some("with the grammar comment style, a comment may span at most two lines")
            }
            '/' if rest.starts_with("//") => Some("line comments are not supported; use `/* */`"),
            _ => None,
        };
        if let Some(h) = help {
            diag = diag.with_help(h);
        }
        diag
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<PositionedToken<'src>, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Err(err) = ignored(&mut self.input, self.comments) {
            let error_pos = self.input.current_token_start();
            return Some(Err(self.recover(err, error_pos)));
        }

        if self.input.is_empty() {
            self.done = true;
            return None;
        }

        let start = self.input.current_token_start();
        let checkpoint = self.input.checkpoint();

        match token(&mut self.input) {
            Ok(token) => {
                let end = self.input.current_token_start();
                let span = Span::new(start..end);
                self.last = self.lines.location_from(self.last, start);
                Some(Ok(PositionedToken::new(token, span, self.last)))
            }
            Err(err @ ErrMode::Cut(_)) => {
                let error_pos = self.input.current_token_start();
                Some(Err(self.recover(err, error_pos)))
            }
            Err(err) => {
                self.input.reset(&checkpoint);
                Some(Err(self.recover(err, start)))
            }
        }
    }
}

/// Tokenize a whole source text.
///
/// # Returns
///
/// - `Ok(tokens)` - every token, in source order
/// - `Err(ParseError)` - the lexical diagnostics; one in fail-fast mode, all
///   of them in accumulate mode
pub fn tokenize<'src>(
    source: &'src str,
    options: &ParseOptions,
) -> Result<Vec<PositionedToken<'src>>, ParseError> {
    let mut tokens = Vec::new();
    let mut diagnostics = DiagnosticCollector::new();

    for item in Lexer::new(source, options) {
        match item {
            Ok(token) => tokens.push(token),
            Err(diagnostic) => diagnostics.emit(diagnostic),
        }
    }

    debug!(tokens = tokens.len(), errors = diagnostics.has_errors(); "Tokenized source");

    diagnostics.finish().map(|()| tokens)
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    /// Identifiers that cannot be read as numbers.
    fn identifier_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z_][A-Za-z0-9_]{0,16}(\\[[0-9]{1,3}\\]){0,2}"
    }

    /// Signed decimal numbers.
    fn number_strategy() -> impl Strategy<Value = String> {
        (any::<i32>(), proptest::option::of(0u32..100_000)).prop_map(|(integer, fraction)| {
            match fraction {
                Some(fraction) => format!("{integer}.{fraction}"),
                None => integer.to_string(),
            }
        })
    }

    /// String bodies without quotes or backslashes.
    fn string_body_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 ,.:;(){}!&|*+-]{0,24}"
    }

    // ===================
    // Property Test Functions
    // ===================

    fn check_single_token(source: &str, expected: Token<'_>) -> Result<(), TestCaseError> {
        let tokens = tokenize(source, &ParseOptions::default());
        prop_assert!(tokens.is_ok(), "Failed to tokenize `{source}`: {tokens:?}");
        let tokens: Vec<_> = tokens.unwrap().into_iter().map(|t| t.token).collect();
        prop_assert_eq!(tokens, vec![expected]);
        Ok(())
    }

    fn check_identifier(id: &str) -> Result<(), TestCaseError> {
        check_single_token(id, Token::Identifier(id))
    }

    fn check_number(number: &str) -> Result<(), TestCaseError> {
        check_single_token(number, Token::Number(number))
    }

    fn check_string(body: &str) -> Result<(), TestCaseError> {
        let source = format!("\"{body}\"");
        check_single_token(&source, Token::String(&source))
    }

    /// Spans of consecutive tokens never overlap and always slice the token text.
    fn check_spans_are_ordered(ids: &[String]) -> Result<(), TestCaseError> {
        let source = ids.join(" /* c */ ");
        let tokens = tokenize(&source, &ParseOptions::default()).unwrap();
        prop_assert_eq!(tokens.len(), ids.len());
        for (token, id) in tokens.iter().zip(ids) {
            prop_assert_eq!(token.span.slice(&source), id.as_str());
        }
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].span.end() < pair[1].span.start());
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn identifiers_tokenize(id in identifier_strategy()) {
            check_identifier(&id)?;
        }

        #[test]
        fn numbers_tokenize(number in number_strategy()) {
            check_number(&number)?;
        }

        #[test]
        fn strings_tokenize(body in string_body_strategy()) {
            check_string(&body)?;
        }

        #[test]
        fn spans_are_ordered(ids in proptest::collection::vec(identifier_strategy(), 1..8)) {
            check_spans_are_ordered(&ids)?;
        }
    }
}
