//! Text renderings of a parsed document.

use std::fmt;

use liberty_parser::{Atom, Document, KeyDatum, Spanned};

use crate::{CliError, args::OutputFormat};

/// Render `document` in the requested format.
pub fn render(document: &Document, format: OutputFormat) -> Result<String, CliError> {
    let output = match format {
        OutputFormat::Summary => Summary(document).to_string(),
        OutputFormat::Tree => Outline(document.root()).to_string(),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(document)?;
            json.push('\n');
            json
        }
    };
    Ok(output)
}

struct Summary<'a>(&'a Document);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (mut simple, mut complex, mut groups) = (0, 0, 0);
        for statement in self.0.root().walk() {
            match statement {
                KeyDatum::SimpleAttribute(_) => simple += 1,
                KeyDatum::ComplexAttribute(_) => complex += 1,
                KeyDatum::Group(_) => groups += 1,
            }
        }

        let root = self.0.root();
        write!(f, "root: {}", root.name())?;
        if !matches!(root, KeyDatum::SimpleAttribute(_)) {
            write!(f, "({})", ArgList(root.args()))?;
        }
        writeln!(f)?;
        writeln!(f, "statements: {}", self.0.statement_count())?;
        writeln!(f, "  simple attributes: {simple}")?;
        writeln!(f, "  complex attributes: {complex}")?;
        writeln!(f, "  groups: {groups}")?;
        writeln!(f, "depth: {}", self.0.depth())
    }
}

/// One line per statement, indented by nesting level.
struct Outline<'a>(&'a KeyDatum);

impl Outline<'_> {
    fn write_statement(f: &mut fmt::Formatter<'_>, statement: &KeyDatum, level: usize) -> fmt::Result {
        let indent = "  ".repeat(level);
        match statement {
            KeyDatum::SimpleAttribute(attr) => {
                writeln!(f, "{indent}{} : {};", attr.name, attr.value)
            }
            KeyDatum::ComplexAttribute(attr) => {
                writeln!(f, "{indent}{}({});", attr.name, ArgList(&attr.args))
            }
            KeyDatum::Group(group) if group.body.is_empty() => {
                writeln!(f, "{indent}{}({}) {{ }}", group.name, ArgList(&group.args))
            }
            KeyDatum::Group(group) => {
                writeln!(f, "{indent}{}({}) {{", group.name, ArgList(&group.args))?;
                for child in &group.body {
                    Self::write_statement(f, child, level + 1)?;
                }
                writeln!(f, "{indent}}}")
            }
        }
    }
}

impl fmt::Display for Outline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::write_statement(f, self.0, 0)
    }
}

struct ArgList<'a>(&'a [Spanned<Atom>]);

impl fmt::Display for ArgList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"cell (INV) {
        area : 1.5;
        pin (A) { direction : input; }
        index_1 ("0.1, 0.2");
        ff (IQ, IQN) { }
    }"#;

    fn document() -> Document {
        liberty_parser::parse(SOURCE).unwrap()
    }

    #[test]
    fn test_summary() {
        let output = render(&document(), OutputFormat::Summary).unwrap();
        assert_eq!(
            output,
            "root: cell(INV)\n\
             statements: 6\n\
             \x20 simple attributes: 2\n\
             \x20 complex attributes: 1\n\
             \x20 groups: 3\n\
             depth: 3\n"
        );
    }

    #[test]
    fn test_summary_of_single_attribute() {
        let document = liberty_parser::parse("direction : input;").unwrap();
        let output = render(&document, OutputFormat::Summary).unwrap();
        assert!(output.starts_with("root: direction\nstatements: 1\n"));
    }

    #[test]
    fn test_outline() {
        let output = render(&document(), OutputFormat::Tree).unwrap();
        assert_eq!(
            output,
            "cell(INV) {\n\
             \x20 area : 1.5;\n\
             \x20 pin(A) {\n\
             \x20   direction : input;\n\
             \x20 }\n\
             \x20 index_1(\"0.1, 0.2\");\n\
             \x20 ff(IQ, IQN) { }\n\
             }\n"
        );
    }

    #[test]
    fn test_json() {
        let output = render(&document(), OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["root"]["type"], "group");
        assert_eq!(json["root"]["body"][0]["value"]["value"], 1.5);
        assert_eq!(json["root"]["body"][3]["args"][1]["value"], "IQN");
    }
}
