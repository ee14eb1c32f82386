use crate::{ParseError, ParseTree, TokenValue};
use ptree::TreeItem;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

impl ParseTree {
    /// Create the product tree of a concatenation.
    pub fn pair(left: ParseTree, right: ParseTree) -> Self {
        ParseTree::Pair(Rc::new((left, right)))
    }

    pub fn tuple(items: Vec<ParseTree>) -> Self {
        ParseTree::Tuple(Rc::new(items))
    }

    pub fn empty_tuple() -> Self {
        ParseTree::Tuple(Rc::new(Vec::new()))
    }

    pub fn lexeme(value: impl Into<TokenValue>) -> Self {
        ParseTree::Lexeme(value.into())
    }

    pub fn node(node: Rc<crate::ast::AstNode>) -> Self {
        ParseTree::Node(node)
    }

    pub fn as_pair(&self) -> Option<(&ParseTree, &ParseTree)> {
        match self {
            ParseTree::Pair(inner) => Some((&inner.0, &inner.1)),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[ParseTree]> {
        match self {
            ParseTree::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Rc<crate::ast::AstNode>> {
        match self {
            ParseTree::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_lexeme(&self) -> Option<&TokenValue> {
        match self {
            ParseTree::Lexeme(value) => Some(value),
            _ => None,
        }
    }

    /// Flatten `n` left-nested concatenation pairs into their `n` constituents, in source
    /// order: `((x, y), z)` unpacks to `[x, y, z]`.
    ///
    /// This is the shape produced by chaining [cat](crate::parser::cat), so reductions over
    /// a fixed-arity rule start with `tree.unpack(n)?`.
    pub fn unpack(&self, n: usize) -> Result<Vec<ParseTree>, ParseError> {
        if n == 0 {
            return Err(ParseError::semantic(
                "cannot unpack a parse tree into zero values".into(),
            ));
        }
        let mut parts = Vec::with_capacity(n);
        let mut seq = self.clone();
        for _ in 0..n - 1 {
            match seq.as_pair() {
                Some((rest, last)) => {
                    let rest = rest.clone();
                    parts.push(last.clone());
                    seq = rest;
                }
                None => {
                    return Err(ParseError::semantic(format!(
                        "expected {} concatenated values, found non-pair tree {}",
                        n, seq
                    )))
                }
            }
        }
        parts.push(seq);
        parts.reverse();
        Ok(parts)
    }

    /// Flatten every left-nested pair into a flat, source-ordered list.
    pub fn flatten(&self) -> Vec<ParseTree> {
        let mut parts = Vec::new();
        let mut seq = self.clone();
        while let Some((rest, last)) = seq.as_pair() {
            let rest = rest.clone();
            parts.push(last.clone());
            seq = rest;
        }
        parts.push(seq);
        parts.reverse();
        parts
    }

    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(self)
    }
}

impl Display for ParseTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseTree::Nil => write!(f, "''"),
            ParseTree::Lexeme(value) => write!(f, "{}", value),
            ParseTree::Pair(inner) => write!(f, "({}, {})", inner.0, inner.1),
            ParseTree::Tuple(items) => {
                write!(f, "(")?;
                for (index, item) in items.iter().enumerate() {
                    if index != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            ParseTree::Node(node) => write!(f, "{}", node),
        }
    }
}

impl Debug for ParseTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl TreeItem for ParseTree {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        match self {
            ParseTree::Nil => write!(f, "''"),
            ParseTree::Lexeme(value) => write!(f, "{}", value),
            ParseTree::Pair(_) => write!(f, "pair"),
            ParseTree::Tuple(_) => write!(f, "tuple"),
            ParseTree::Node(node) => write!(f, "{}", node.class_name()),
        }
    }

    fn children(&self) -> Cow<[Self::Child]> {
        match self {
            ParseTree::Nil | ParseTree::Lexeme(_) => Cow::from(vec![]),
            ParseTree::Pair(inner) => Cow::from(vec![inner.0.clone(), inner.1.clone()]),
            ParseTree::Tuple(items) => Cow::from(items.as_ref().clone()),
            ParseTree::Node(node) => Cow::from(node.values().to_vec()),
        }
    }
}
