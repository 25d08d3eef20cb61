//! Token types produced by the [`lexer`](crate::lexer).

use std::fmt;

use winnow::stream::Location as StreamLocation;

use crate::span::{Location, Span};

/// Token types for the Liberty format
///
/// Literal variants borrow their raw source text. String literals keep their
/// surrounding quotes and escapes; the [`atom`](crate::atom) resolver turns
/// them into values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'src> {
    // Literals
    Number(&'src str),
    String(&'src str),
    Identifier(&'src str),

    // Punctuation
    Colon,      // :
    Semicolon,  // ;
    Comma,      // ,
    LeftParen,  // (
    RightParen, // )
    LeftBrace,  // {
    RightBrace, // }
}

/// Coarse token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    String,
    Identifier,
    Punctuation,
}

impl Token<'_> {
    /// Classify this token.
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Number(_) => TokenKind::Number,
            Token::String(_) => TokenKind::String,
            Token::Identifier(_) => TokenKind::Identifier,
            _ => TokenKind::Punctuation,
        }
    }

    /// Returns `true` for tokens that can be resolved into an [`Atom`](crate::Atom).
    pub fn is_atom(&self) -> bool {
        self.kind() != TokenKind::Punctuation
    }
}

/// A token with position information for winnow integration
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
    /// Line and column of the first character of the token
    pub location: Location,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span, location: Location) -> Self {
        Self {
            token,
            span,
            location,
        }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl<'src> AsRef<Token<'src>> for PositionedToken<'src> {
    fn as_ref(&self) -> &Token<'src> {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl StreamLocation for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(text) | Token::String(text) | Token::Identifier(text) => {
                write!(f, "{text}")
            }

            Token::Colon => write!(f, ":"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kinds() {
        assert_eq!(Token::Number("1.5").kind(), TokenKind::Number);
        assert_eq!(Token::String("\"a\"").kind(), TokenKind::String);
        assert_eq!(Token::Identifier("A[1]").kind(), TokenKind::Identifier);
        assert_eq!(Token::LeftBrace.kind(), TokenKind::Punctuation);
        assert!(Token::Identifier("pin").is_atom());
        assert!(!Token::Semicolon.is_atom());
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::String("\"x\"").to_string(), "\"x\"");
        assert_eq!(Token::LeftBrace.to_string(), "{");
        assert_eq!(Token::RightBrace.to_string(), "}");
        assert_eq!(Token::Number("-0.5").to_string(), "-0.5");
    }
}
