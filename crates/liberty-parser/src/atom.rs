//! Resolved literal values.
//!
//! An [`Atom`] is produced from exactly one number, string, or identifier
//! token. Numbers keep their source text; strings have their quotes removed
//! and escapes resolved.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::tokens::Token;

/// A decimal number, stored as the exact text it was written with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number {
    text: String,
}

/// The numeric interpretation of a [`Number`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NumericValue {
    Integer(i64),
    Float(f64),
}

impl Number {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The number as written in the source.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns `true` when [`value`](Self::value) is an integer, as for
    /// `12`, `-3`, and `4.0`.
    pub fn is_integer(&self) -> bool {
        matches!(self.value(), NumericValue::Integer(_))
    }

    /// Returns `true` when [`value`](Self::value) holds the written number
    /// without rounding.
    ///
    /// Integers that fit an `i64` are exact. Other numbers are exact when they
    /// are finite and have no more significant digits than an `f64` keeps.
    pub fn is_exact(&self) -> bool {
        if self.to_i64().is_some() {
            return true;
        }
        if !self.to_f64().is_finite() {
            return false;
        }
        let digits: String = self.text.chars().filter(char::is_ascii_digit).collect();
        let significant = digits.trim_start_matches('0').trim_end_matches('0');
        significant.len() <= f64::DIGITS as usize
    }

    /// Parse the text as a floating point value.
    pub fn to_f64(&self) -> f64 {
        self.text.parse().unwrap_or(f64::NAN)
    }

    /// Parse the text as an integer, if it is written as one and fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.text.parse().ok()
    }

    /// The value as an integer when it is integral, otherwise as a float.
    ///
    /// `4.0` and `4.` are integral and resolve to `Integer(4)`.
    ///
    /// ```
    /// # use liberty_parser::{Atom, NumericValue};
    /// let doc = liberty_parser::parse("a : 4.0;").unwrap();
    /// let Some(Atom::Number(n)) = doc.root().value() else { panic!() };
    /// assert_eq!(n.value(), NumericValue::Integer(4));
    /// ```
    pub fn value(&self) -> NumericValue {
        if let Some(integer) = self.to_i64() {
            return NumericValue::Integer(integer);
        }

        let float = self.to_f64();
        if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
            NumericValue::Integer(float as i64)
        } else {
            NumericValue::Float(float)
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Serializes as [`Number::value`], or as the source text when the value
/// would round or overflow.
impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_exact() {
            self.value().serialize(serializer)
        } else {
            serializer.serialize_str(&self.text)
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Integer(value) => write!(f, "{value}"),
            NumericValue::Float(value) => write!(f, "{value}"),
        }
    }
}

/// A single resolved literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Atom {
    /// A decimal number such as `0.001985`
    Number(Number),
    /// An identifier or bus-indexed name such as `input` or `A[1]`
    Text(String),
    /// The unescaped content of a quoted string
    QuotedString(String),
}

impl Atom {
    /// Resolve a literal token.
    ///
    /// # Panics
    ///
    /// Panics if `token` is punctuation. The parser only passes literal
    /// tokens, so this indicates a bug in the caller.
    pub fn resolve(token: &Token<'_>) -> Self {
        match *token {
            Token::Number(text) => Atom::Number(Number::new(text)),
            Token::Identifier(text) => Atom::Text(text.to_owned()),
            Token::String(raw) => Atom::QuotedString(unquote(raw)),
            punctuation => panic!("cannot resolve punctuation `{punctuation}` into an atom"),
        }
    }

    /// The atom's text: the number as written, the identifier, or the
    /// unescaped string content.
    pub fn as_str(&self) -> &str {
        match self {
            Atom::Number(number) => number.as_str(),
            Atom::Text(text) | Atom::QuotedString(text) => text,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Atom::Number(number) => Some(number),
            _ => None,
        }
    }

    /// Returns `true` if the atom came from a quoted string.
    pub fn is_quoted(&self) -> bool {
        matches!(self, Atom::QuotedString(_))
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Number(number) => number.fmt(f),
            Atom::Text(text) => f.write_str(text),
            Atom::QuotedString(text) => write!(f, "{text:?}"),
        }
    }
}

/// Strip the quotes from a raw string literal and resolve its escapes.
///
/// `\x` becomes `x` for any character. A backslash before a newline (or a
/// `\r\n` pair) is a line continuation and is removed together with the
/// line break.
fn unquote(raw: &str) -> String {
    let body = raw
        .strip_prefix('"')
        .and_then(|body| body.strip_suffix('"'))
        .unwrap_or(raw);

    let mut text = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('\n') => {}
            Some('\r') => {
                let mut lookahead = chars.clone();
                if lookahead.next() == Some('\n') {
                    chars = lookahead;
                } else {
                    text.push('\r');
                }
            }
            Some(escaped) => text.push(escaped),
            None => {}
        }
    }
    text
}
