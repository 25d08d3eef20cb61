//! Parser for Liberty tokens.
//!
//! This module turns the token stream from the [`lexer`](super::lexer) into a
//! [`Document`]. The grammar needs one token of lookahead after a statement
//! name:
//!
//! ```text
//! start     := key_datum EOF
//! key_datum := atom ':' atom ';'
//!            | atom '(' args ')' ';'
//!            | atom '(' args ')' '{' key_datum* '}'
//! args      := (atom (',' atom)*)?
//! ```
//!
//! Nothing is ever backtracked past a consumed token, and the first syntax
//! error ends the parse. The entry point is [`build_document`].

use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::opt,
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    atom::Atom,
    error::{Diagnostic, ErrorCode},
    options::{EmptyGroups, ParseOptions},
    span::{LineIndex, Span, Spanned},
    tokens::{PositionedToken, Token},
    tree::{ComplexAttribute, Document, Group, KeyDatum, SimpleAttribute},
};

/// What the parser was looking for when it failed.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Expectation {
    message: &'static str,
    expected: &'static [&'static str],
}

const ATOM: &[&str] = &["an identifier", "a number", "a string"];

static DOCUMENT_START: Expectation = Expectation {
    message: "expected a statement",
    expected: ATOM,
};

static STATEMENT_OR_CLOSE: Expectation = Expectation {
    message: "expected a statement or `}`",
    expected: &["an identifier", "a number", "a string", "`}`"],
};

static STATEMENT_START: Expectation = Expectation {
    message: "expected `:` or `(` to begin a statement",
    expected: &["`:`", "`(`"],
};

static ATTRIBUTE_VALUE: Expectation = Expectation {
    message: "expected an attribute value after `:`",
    expected: ATOM,
};

static ATTRIBUTE_END: Expectation = Expectation {
    message: "expected `;` after attribute value",
    expected: &["`;`"],
};

static FIRST_ARGUMENT: Expectation = Expectation {
    message: "expected an argument or `)`",
    expected: &["an identifier", "a number", "a string", "`)`"],
};

static NEXT_ARGUMENT: Expectation = Expectation {
    message: "expected an argument after `,`",
    expected: ATOM,
};

static ARGUMENT_LIST_END: Expectation = Expectation {
    message: "expected `,` or `)` after argument",
    expected: &["`,`", "`)`"],
};

static AFTER_ARGUMENTS: Expectation = Expectation {
    message: "expected `;` or `{` after argument list",
    expected: &["`;`", "`{`"],
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// The alternatives that would have been accepted
    Expected(&'static Expectation),
    /// The `{` of the innermost group left open at end of input
    GroupOpened(Span),
    /// A group's `{` at a depth beyond the limit
    DepthLimit { limit: usize, span: Span },
    /// An empty `{ }` while empty groups are rejected
    EmptyGroup(Span),
    /// Tokens after the top-level statement
    TrailingInput,
}

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// Create a Cut error carrying a single context
fn cut_error(context: Context) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(context);
    ErrMode::Cut(e)
}

/// Run `parser`, turning a backtrack into a committed syntax error.
///
/// The input is left at the offending token so the error span points at it.
fn expect<'src, O>(
    input: &mut Input<'src>,
    mut parser: impl FnMut(&mut Input<'src>) -> IResult<O>,
    expectation: &'static Expectation,
) -> IResult<O> {
    let checkpoint = input.checkpoint();

    match parser(input) {
        Ok(output) => Ok(output),
        Err(ErrMode::Backtrack(_)) => {
            input.reset(&checkpoint);
            Err(cut_error(Context::Expected(expectation)))
        }
        Err(e) => Err(e),
    }
}

/// Record the enclosing group's `{` on errors caused by end of input.
fn note_open_group(
    error: ErrMode<ContextError<Context>>,
    input: &Input<'_>,
    open: Span,
) -> ErrMode<ContextError<Context>> {
    match error {
        ErrMode::Cut(mut e) if input.eof_offset() == 0 => {
            if !e
                .context()
                .any(|ctx| matches!(ctx, Context::GroupOpened(_)))
            {
                e.push(Context::GroupOpened(open));
            }
            ErrMode::Cut(e)
        }
        other => other,
    }
}

/// Parse a number, string, or identifier token into an atom
fn atom<'src>(input: &mut Input<'src>) -> IResult<Spanned<Atom>> {
    any.verify_map(|token: &PositionedToken<'_>| {
        token
            .is_atom()
            .then(|| Spanned::new(Atom::resolve(&token.token), token.span))
    })
    .parse_next(input)
}

/// Parse one punctuation token, returning its span
fn punctuation<'src>(expected: Token<'static>) -> impl FnMut(&mut Input<'src>) -> IResult<Span> {
    move |input: &mut Input<'src>| {
        any.verify_map(|token: &PositionedToken<'_>| {
            (token.token == expected).then_some(token.span)
        })
        .parse_next(input)
    }
}

/// Parse `args )` after an opening parenthesis.
///
/// Examples:
/// - `()` - no arguments
/// - `(A)` - one argument
/// - `("0.1, 0.2", 3, fast)` - mixed atoms, in source order
fn argument_list<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<Atom>>> {
    let mut args = Vec::new();

    if opt(punctuation(Token::RightParen))
        .parse_next(input)?
        .is_some()
    {
        return Ok(args);
    }

    args.push(expect(input, atom, &FIRST_ARGUMENT)?);

    loop {
        if opt(punctuation(Token::RightParen))
            .parse_next(input)?
            .is_some()
        {
            return Ok(args);
        }
        expect(input, punctuation(Token::Comma), &ARGUMENT_LIST_END)?;
        args.push(expect(input, atom, &NEXT_ARGUMENT)?);
    }
}

/// Parse a group body after its `{`, through the closing `}`.
fn group_body<'src>(
    input: &mut Input<'src>,
    options: &ParseOptions,
    depth: usize,
    open: Span,
) -> IResult<(Vec<KeyDatum>, Span)> {
    let mut body = Vec::new();

    loop {
        if let Some(close) = opt(punctuation(Token::RightBrace)).parse_next(input)? {
            return Ok((body, close));
        }

        match key_datum(input, options, depth + 1, &STATEMENT_OR_CLOSE) {
            Ok(statement) => body.push(statement),
            Err(e) => return Err(note_open_group(e, input, open)),
        }
    }
}

/// Parse a single statement of any form.
///
/// `depth` is 1 for the top-level statement and grows by one per enclosing
/// group.
fn key_datum<'src>(
    input: &mut Input<'src>,
    options: &ParseOptions,
    depth: usize,
    name_expectation: &'static Expectation,
) -> IResult<KeyDatum> {
    let name = expect(input, atom, name_expectation)?;

    if opt(punctuation(Token::Colon)).parse_next(input)?.is_some() {
        let value = expect(input, atom, &ATTRIBUTE_VALUE)?;
        let end = expect(input, punctuation(Token::Semicolon), &ATTRIBUTE_END)?;
        let span = name.span().union(end);
        return Ok(KeyDatum::SimpleAttribute(SimpleAttribute { name, value, span }));
    }

    expect(input, punctuation(Token::LeftParen), &STATEMENT_START)?;
    let args = argument_list(input)?;

    if let Some(end) = opt(punctuation(Token::Semicolon)).parse_next(input)? {
        let span = name.span().union(end);
        return Ok(KeyDatum::ComplexAttribute(ComplexAttribute { name, args, span }));
    }

    let open = expect(input, punctuation(Token::LeftBrace), &AFTER_ARGUMENTS)?;

    if depth > options.max_depth() {
        return Err(cut_error(Context::DepthLimit {
            limit: options.max_depth(),
            span: open,
        }));
    }

    let (body, close) = group_body(input, options, depth, open)?;

    if body.is_empty() && options.empty_groups() == EmptyGroups::Reject {
        return Err(cut_error(Context::EmptyGroup(open.union(close))));
    }

    trace!(name = name.as_str(), depth = depth, statements = body.len(); "Parsed group");

    let span = name.span().union(close);
    Ok(KeyDatum::Group(Group {
        name,
        args,
        body,
        span,
    }))
}

/// Parse the single top-level statement and require end of input after it.
fn document<'src>(input: &mut Input<'src>, options: &ParseOptions) -> IResult<KeyDatum> {
    let root = key_datum(input, options, 1, &DOCUMENT_START)?;

    if input.eof_offset() > 0 {
        return Err(cut_error(Context::TrailingInput));
    }

    Ok(root)
}

/// Describe a token for use in a message.
fn describe(token: &Token<'_>) -> String {
    match token {
        Token::Number(text) => format!("number `{text}`"),
        Token::Identifier(text) => format!("identifier `{text}`"),
        Token::String(text) => format!("string {text}"),
        punctuation => format!("`{punctuation}`"),
    }
}

/// Convert a parser error into a diagnostic.
///
/// The offending token is the one at the position the input was left at;
/// `current_remaining` is the input's `eof_offset()` at the time of failure.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    source: &str,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let context_error = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };
    let lines = LineIndex::new(source);
    let found = tokens.get(tokens.len() - current_remaining);

    for context in context_error.context() {
        match context {
            Context::DepthLimit { limit, span } => {
                return Diagnostic::error(format!("groups are nested deeper than {limit} levels"))
                    .with_code(ErrorCode::E103)
                    .with_label(*span, "group exceeds the nesting limit")
                    .with_help("raise `max-depth` in the parser options to accept deeper files")
                    .with_location(lines.location(span.start()));
            }
            Context::EmptyGroup(span) => {
                return Diagnostic::error("group body is empty")
                    .with_code(ErrorCode::E104)
                    .with_label(*span, ErrorCode::E104.description())
                    .with_help("add a statement, or allow empty groups in the parser options")
                    .with_location(lines.location(span.start()));
            }
            Context::TrailingInput => {
                let span = match (found, tokens.last()) {
                    (Some(first), Some(last)) => first.span.union(last.span),
                    _ => Span::new(source.len()..source.len()),
                };
                let found = found.map_or_else(|| "end of input".to_string(), |t| describe(t));
                return Diagnostic::error(format!(
                    "expected end of input after the top-level statement, found {found}"
                ))
                .with_code(ErrorCode::E102)
                .with_label(span, ErrorCode::E102.description())
                .with_help("a Liberty file holds exactly one top-level statement")
                .with_location(lines.location(span.start()));
            }
            _ => {}
        }
    }

    let expectation = context_error.context().find_map(|ctx| match ctx {
        Context::Expected(expectation) => Some(*expectation),
        _ => None,
    });
    let (message, expected) = match expectation {
        Some(expectation) => (expectation.message, expectation.expected),
        None => ("unexpected token", &[][..]),
    };

    let mut diag = match found {
        Some(token) => Diagnostic::error(format!("{message}, found {}", describe(&token.token)))
            .with_code(ErrorCode::E100)
            .with_label(token.span, ErrorCode::E100.description())
            .with_location(token.location),
        None => {
            let end = Span::new(source.len()..source.len());
            let mut diag = Diagnostic::error(format!("{message}, found end of input"))
                .with_code(ErrorCode::E101)
                .with_label(end, "input ends here")
                .with_location(lines.location(source.len()));
            if let Some(open) = context_error.context().find_map(|ctx| match ctx {
                Context::GroupOpened(span) => Some(*span),
                _ => None,
            }) {
                diag = diag.with_secondary_label(open, "group opened here");
            }
            diag
        }
    };

    if expected.len() > 1 {
        diag = diag.with_help(format!("expected one of: {}", expected.join(", ")));
    }
    diag.with_expected(expected.iter().copied())
}

/// Build a document from a token stream.
pub(crate) fn build_document<'src>(
    source: &str,
    tokens: &'src [PositionedToken<'src>],
    options: &ParseOptions,
) -> Result<Document, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    match document(&mut token_slice, options) {
        Ok(root) => {
            let span = root.span();
            debug!(
                statements = root.statement_count(),
                depth = root.depth();
                "Parsed document"
            );
            Ok(Document::new(root, span))
        }
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            let diagnostic = convert_error(e, source, tokens, current_remaining);
            trace!(code:? = diagnostic.code(), message = diagnostic.message(); "Syntax error");
            Err(diagnostic)
        }
    }
}
