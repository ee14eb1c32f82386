use crate::{Token, TokenValue};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Kind and value of the sentinel closing every token stream.
pub const END_MARKER: &str = "ENDMARKER";

impl Token {
    pub fn new(kind: impl Into<Rc<str>>, value: TokenValue) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }

    /// A token whose value is its lexeme.
    pub fn text(kind: impl Into<Rc<str>>, lexeme: impl Into<Rc<str>>) -> Self {
        Token::new(kind, TokenValue::Str(lexeme.into()))
    }

    /// A token carrying an evaluated integer literal.
    pub fn int(kind: impl Into<Rc<str>>, value: i64) -> Self {
        Token::new(kind, TokenValue::Int(value))
    }

    /// An operator, punctuation, or keyword token: the kind *is* the matched text, so
    /// grammars can write `lit("+")` or `lit("while")` directly.
    pub fn symbol(text: &str) -> Self {
        let shared: Rc<str> = Rc::from(text);
        Token::new(shared.clone(), TokenValue::Str(shared))
    }

    /// The `ENDMARKER` sentinel.
    pub fn end() -> Self {
        Token::text(END_MARKER, END_MARKER)
    }

    pub fn is_end(&self) -> bool {
        &*self.kind == END_MARKER
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({}, {})", self.kind, self.value)
    }
}

impl TokenValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenValue::Str(s) => Some(s),
            TokenValue::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            TokenValue::Str(_) => None,
            TokenValue::Int(n) => Some(*n),
        }
    }
}

impl Display for TokenValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenValue::Str(s) => write!(f, "{}", s),
            TokenValue::Int(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        TokenValue::Str(Rc::from(value))
    }
}

impl From<String> for TokenValue {
    fn from(value: String) -> Self {
        TokenValue::Str(Rc::from(value.as_str()))
    }
}

impl From<i64> for TokenValue {
    fn from(value: i64) -> Self {
        TokenValue::Int(value)
    }
}
