use super::AstNode;
use crate::ParseTree;
use std::fmt::Write;

/// Render a node as an indented constructor-style dump:
///
/// ```text
/// Add(
///   left = Add(
///     left = 1,
///     right = 2,
///   ),
///   right = 3,
/// )
/// ```
pub fn write_ast(node: &AstNode, writer: &mut dyn Write) -> std::fmt::Result {
    write_level(node, writer, 0)
}

/// [write_ast] into a fresh string.
pub fn dump(node: &AstNode) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_ast(node, &mut out);
    out
}

const INDENT: &str = "  ";

fn write_level(node: &AstNode, writer: &mut dyn Write, level: usize) -> std::fmt::Result {
    if node.fields().next().is_none() {
        return write!(writer, "{}()", node.class_name());
    }

    let field_margin = INDENT.repeat(level + 1);
    writeln!(writer, "{}(", node.class_name())?;
    for (name, value) in node.fields() {
        write!(writer, "{}{} = ", field_margin, name)?;
        write_value(value, writer, level + 1)?;
        writeln!(writer, ",")?;
    }
    write!(writer, "{})", INDENT.repeat(level))
}

fn write_value(value: &ParseTree, writer: &mut dyn Write, level: usize) -> std::fmt::Result {
    match value {
        ParseTree::Node(node) => write_level(node, writer, level),
        ParseTree::Tuple(items) => {
            if items.is_empty() {
                return write!(writer, "()");
            }
            let elem_margin = INDENT.repeat(level + 1);
            writeln!(writer, "(")?;
            for item in items.iter() {
                write!(writer, "{}", elem_margin)?;
                write_value(item, writer, level + 1)?;
                writeln!(writer, ",")?;
            }
            write!(writer, "{})", INDENT.repeat(level))
        }
        other => write!(writer, "{}", other),
    }
}
