use super::Parser;
use std::collections::HashSet;
use std::fmt::{Debug, Display, Formatter, Write};

impl Parser {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Parser::Empty => "Empty",
            Parser::Epsilon(_) => "Epsilon",
            Parser::Literal(_) => "Lit",
            Parser::Alternate(_, _) => "Alt",
            Parser::Concatenate(_, _) => "Cat",
            Parser::Reduce(_, _) => "Red",
            Parser::Delta(_) => "Delta",
            Parser::Recurrence(_) => "Rec",
            Parser::Lazy(_) => "Lazy",
        }
    }

    /// Render the parser to text, guarding against the cycles recursive grammars form:
    /// nodes beyond `max_depth` and nodes already printed render as their kind name.
    pub fn to_text(&self, max_depth: usize) -> String {
        let mut out = String::new();
        let mut seen: HashSet<*const Parser> = HashSet::new();
        let _ = self.write_text(&mut out, &mut seen, max_depth);
        out
    }

    fn write_text(
        &self,
        out: &mut String,
        seen: &mut HashSet<*const Parser>,
        depth_left: usize,
    ) -> std::fmt::Result {
        if depth_left == 0 || !seen.insert(self as *const Parser) {
            return write!(out, "{}(...)", self.kind_name());
        }
        match self {
            Parser::Empty => write!(out, "Empty"),
            Parser::Epsilon(trees) => write!(out, "Epsilon<{}>", trees.len()),
            Parser::Literal(kind) => write!(out, "Lit('{}')", kind),
            Parser::Alternate(left, right) => {
                write!(out, "Alt(")?;
                left.write_text(out, seen, depth_left - 1)?;
                write!(out, ", ")?;
                right.write_text(out, seen, depth_left - 1)?;
                write!(out, ")")
            }
            Parser::Concatenate(left, right) => {
                write!(out, "Cat(")?;
                left.write_text(out, seen, depth_left - 1)?;
                write!(out, ", ")?;
                right.write_text(out, seen, depth_left - 1)?;
                write!(out, ")")
            }
            Parser::Reduce(inner, _) => {
                write!(out, "Red(")?;
                inner.write_text(out, seen, depth_left - 1)?;
                write!(out, ")")
            }
            Parser::Delta(inner) => {
                write!(out, "Delta(")?;
                inner.write_text(out, seen, depth_left - 1)?;
                write!(out, ")")
            }
            Parser::Recurrence(recurrence) => {
                write!(out, "Rec[{}]", recurrence.name())?;
                match recurrence.inner.get() {
                    Some(inner) => {
                        write!(out, "(")?;
                        inner.write_text(out, seen, depth_left - 1)?;
                        write!(out, ")")
                    }
                    None => write!(out, "(?)"),
                }
            }
            Parser::Lazy(cell) => {
                write!(out, "Lazy['{}']", cell.token.kind)
            }
        }
    }
}

impl Display for Parser {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_text(4))
    }
}

impl Debug for Parser {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_text(4))
    }
}
