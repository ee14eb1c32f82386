use crate::{GrammarError, ParseError};
use std::fmt::{Display, Formatter};

impl GrammarError {
    pub fn new(what: &str, message: String) -> Self {
        Self {
            message,
            what: what.to_string(),
        }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GrammarError: {}-{}", self.what, self.message)
    }
}

impl ParseError {
    pub fn new(pointer: usize, message: String) -> Self {
        Self { pointer, message }
    }

    /// A semantic-action failure raised inside a reduction, where no source pointer is
    /// available (parse trees do not carry spans).
    pub fn semantic(message: String) -> Self {
        Self {
            pointer: 0,
            message,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SyntaxError: {}", self.message)
    }
}
