//! The generic Liberty syntax tree.
//!
//! Every statement is a [`KeyDatum`]: a simple attribute (`name : value;`),
//! a complex attribute (`name(args);`), or a group (`name(args) { ... }`).
//! The tree carries no Liberty semantics; a `cell` group and a `pin` group
//! have the same shape.
//!
//! ## Source Location Tracking
//!
//! Names, values, and arguments are wrapped in [`Spanned<T>`]. Each statement
//! also records the span from its name through its terminating `;` or `}`.
//! Spans never take part in equality, so trees parsed from differently
//! formatted text compare equal when their content matches.

use serde::Serialize;

use crate::{
    atom::Atom,
    span::{Span, Spanned},
};

/// `name : value ;`
#[derive(Debug, Clone, Serialize)]
pub struct SimpleAttribute {
    pub name: Spanned<Atom>,
    pub value: Spanned<Atom>,
    #[serde(skip)]
    pub span: Span,
}

/// `name ( args ) ;`
#[derive(Debug, Clone, Serialize)]
pub struct ComplexAttribute {
    pub name: Spanned<Atom>,
    pub args: Vec<Spanned<Atom>>,
    #[serde(skip)]
    pub span: Span,
}

/// `name ( args ) { body }`
#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub name: Spanned<Atom>,
    pub args: Vec<Spanned<Atom>>,
    /// Statements in source order
    pub body: Vec<KeyDatum>,
    #[serde(skip)]
    pub span: Span,
}

impl PartialEq for SimpleAttribute {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl PartialEq for ComplexAttribute {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args && self.body == other.body
    }
}

impl ComplexAttribute {
    /// Argument values without their spans.
    pub fn values(&self) -> impl Iterator<Item = &Atom> {
        self.args.iter().map(Spanned::inner)
    }
}

impl Group {
    /// Argument values without their spans.
    pub fn values(&self) -> impl Iterator<Item = &Atom> {
        self.args.iter().map(Spanned::inner)
    }

    /// Value of the simple attribute `name` in this group's body.
    ///
    /// When the attribute is repeated, the last occurrence wins.
    ///
    /// ```
    /// let doc = liberty_parser::parse("pin(A) { direction : input; direction : output; }").unwrap();
    /// let pin = doc.root().as_group().unwrap();
    /// assert_eq!(pin.attribute("direction").unwrap().as_str(), "output");
    /// ```
    pub fn attribute(&self, name: &str) -> Option<&Atom> {
        self.body.iter().rev().find_map(|statement| match statement {
            KeyDatum::SimpleAttribute(attr) if attr.name.as_str() == name => Some(attr.value.inner()),
            _ => None,
        })
    }

    /// The complex attribute `name` in this group's body; the last one if repeated.
    pub fn complex_attribute(&self, name: &str) -> Option<&ComplexAttribute> {
        self.body.iter().rev().find_map(|statement| match statement {
            KeyDatum::ComplexAttribute(attr) if attr.name.as_str() == name => Some(attr),
            _ => None,
        })
    }

    /// Child groups called `name`, in source order.
    pub fn groups<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Group> + use<'a, 'n> {
        self.body.iter().filter_map(move |statement| match statement {
            KeyDatum::Group(group) if group.name.as_str() == name => Some(group),
            _ => None,
        })
    }

    /// The child group `name` whose first argument is `arg`, e.g. `pin(A)`.
    pub fn group(&self, name: &str, arg: &str) -> Option<&Group> {
        self.body.iter().find_map(|statement| match statement {
            KeyDatum::Group(group)
                if group.name.as_str() == name
                    && group.args.first().is_some_and(|first| first.as_str() == arg) =>
            {
                Some(group)
            }
            _ => None,
        })
    }
}

/// One Liberty statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum KeyDatum {
    SimpleAttribute(SimpleAttribute),
    ComplexAttribute(ComplexAttribute),
    Group(Group),
}

impl KeyDatum {
    /// The statement's name.
    pub fn name(&self) -> &Atom {
        match self {
            KeyDatum::SimpleAttribute(attr) => &attr.name,
            KeyDatum::ComplexAttribute(attr) => &attr.name,
            KeyDatum::Group(group) => &group.name,
        }
    }

    /// Span from the name through the terminating `;` or `}`.
    pub fn span(&self) -> Span {
        match self {
            KeyDatum::SimpleAttribute(attr) => attr.span,
            KeyDatum::ComplexAttribute(attr) => attr.span,
            KeyDatum::Group(group) => group.span,
        }
    }

    /// The value of a simple attribute.
    pub fn value(&self) -> Option<&Atom> {
        match self {
            KeyDatum::SimpleAttribute(attr) => Some(attr.value.inner()),
            _ => None,
        }
    }

    /// The argument list of a complex attribute or group; empty for simple attributes.
    pub fn args(&self) -> &[Spanned<Atom>] {
        match self {
            KeyDatum::SimpleAttribute(_) => &[],
            KeyDatum::ComplexAttribute(attr) => &attr.args,
            KeyDatum::Group(group) => &group.args,
        }
    }

    /// The body of a group; empty for attributes.
    pub fn body(&self) -> &[KeyDatum] {
        match self {
            KeyDatum::Group(group) => &group.body,
            _ => &[],
        }
    }

    pub fn as_simple_attribute(&self) -> Option<&SimpleAttribute> {
        match self {
            KeyDatum::SimpleAttribute(attr) => Some(attr),
            _ => None,
        }
    }

    pub fn as_complex_attribute(&self) -> Option<&ComplexAttribute> {
        match self {
            KeyDatum::ComplexAttribute(attr) => Some(attr),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            KeyDatum::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Visit this statement and everything nested in it, depth-first and
    /// in source order.
    ///
    /// ```
    /// let doc = liberty_parser::parse("cell(INV) { area : 1; pin(A) { } }").unwrap();
    /// let names: Vec<_> = doc.root().walk().map(|s| s.name().as_str()).collect();
    /// assert_eq!(names, ["cell", "area", "pin"]);
    /// ```
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Number of statements in this subtree, including this one.
    pub fn statement_count(&self) -> usize {
        self.walk().count()
    }

    /// Nesting depth of this subtree. An attribute or a group with an empty
    /// body has depth 1.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1)];
        while let Some((statement, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(statement.body().iter().map(|child| (child, depth + 1)));
        }
        max_depth
    }
}

/// Pre-order iterator returned by [`KeyDatum::walk`].
///
/// Uses an explicit stack, so deep trees do not grow the call stack.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    stack: Vec<&'a KeyDatum>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a KeyDatum;

    fn next(&mut self) -> Option<Self::Item> {
        let statement = self.stack.pop()?;
        self.stack.extend(statement.body().iter().rev());
        Some(statement)
    }
}

/// A parsed Liberty file: exactly one top-level statement.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    root: KeyDatum,
    #[serde(skip)]
    span: Span,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl Document {
    pub(crate) fn new(root: KeyDatum, span: Span) -> Self {
        Self { root, span }
    }

    pub fn root(&self) -> &KeyDatum {
        &self.root
    }

    pub fn into_root(self) -> KeyDatum {
        self.root
    }

    /// Span of the whole statement, excluding leading and trailing ignorable text.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Total number of statements.
    pub fn statement_count(&self) -> usize {
        self.root.statement_count()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}
