use super::{LazyDerivative, Parser, ParserRef, Recurrence, Reduction};
use crate::{Forest, ParseError, ParseTree, Token};
use once_cell::unsync::OnceCell;
use std::rc::Rc;

thread_local! {
    static EMPTY: ParserRef = Rc::new(Parser::Empty);
}

/// The empty language `{}`. Every canonicalizing constructor hands out this singleton.
pub fn empty() -> ParserRef {
    EMPTY.with(|parser| parser.clone())
}

/// The language `{ε}` carrying the given forest. An empty forest collapses to [empty].
pub fn eps(trees: Forest) -> ParserRef {
    if trees.is_empty() {
        empty()
    } else {
        Rc::new(Parser::Epsilon(trees))
    }
}

/// The language `{ε}` carrying exactly one tree.
pub fn eps_tree(tree: ParseTree) -> ParserRef {
    let mut trees = Forest::new();
    trees.insert(tree);
    Rc::new(Parser::Epsilon(trees))
}

/// A terminal matching one token of the given kind.
pub fn lit(kind: &str) -> ParserRef {
    Rc::new(Parser::Literal(Rc::from(kind)))
}

/// Union of two languages. An empty side collapses to the other.
pub fn alt(left: &ParserRef, right: &ParserRef) -> ParserRef {
    if left.is_empty() {
        right.clone()
    } else if right.is_empty() {
        left.clone()
    } else {
        Rc::new(Parser::Alternate(left.clone(), right.clone()))
    }
}

/// Concatenation of two languages. An empty side collapses the whole product to [empty].
pub fn cat(left: &ParserRef, right: &ParserRef) -> ParserRef {
    if left.is_empty() || right.is_empty() {
        empty()
    } else {
        Rc::new(Parser::Concatenate(left.clone(), right.clone()))
    }
}

/// Attach a semantic action to a parser.
pub fn red<F>(parser: &ParserRef, func: F) -> ParserRef
where
    F: Fn(&ParseTree) -> Result<ParseTree, ParseError> + 'static,
{
    reduce(parser, Rc::new(func))
}

/// [red] with an already shared action; used when a reduction travels through a derivative.
pub fn reduce(parser: &ParserRef, func: Reduction) -> ParserRef {
    if parser.is_empty() {
        empty()
    } else {
        Rc::new(Parser::Reduce(parser.clone(), func))
    }
}

/// A nullable skeleton of `parser`: contributes its nullability set, accepts no input.
pub fn delta(parser: &ParserRef) -> ParserRef {
    Rc::new(Parser::Delta(parser.clone()))
}

/// A fresh, undefined recurrence node; tie the knot with [Parser::define].
pub fn rec() -> ParserRef {
    Rc::new(Parser::Recurrence(Recurrence::unnamed()))
}

pub(crate) fn rec_named(name: Rc<str>) -> ParserRef {
    Rc::new(Parser::Recurrence(Recurrence::named(name)))
}

pub(crate) fn lazy(parser: &ParserRef, token: &Token) -> ParserRef {
    Rc::new(Parser::Lazy(LazyDerivative {
        parser: parser.clone(),
        token: token.clone(),
        forced: OnceCell::new(),
    }))
}

/// Zero or one: `ε | p`. The ε branch contributes [ParseTree::Nil].
pub fn opt(parser: &ParserRef) -> ParserRef {
    alt(&eps_tree(ParseTree::Nil), parser)
}

/// Zero or more, folded right into a [ParseTree::Tuple] in match order.
pub fn star(parser: &ParserRef) -> ParserRef {
    let recurrence = rec();
    let repeat = red(&cat(parser, &recurrence), fold_repeat);
    let body = alt(&eps_tree(ParseTree::empty_tuple()), &repeat);
    if recurrence.define(body).is_err() {
        panic!("Internal error.");
    }
    recurrence
}

/// One or more, folded right into a [ParseTree::Tuple] in match order.
pub fn plus(parser: &ParserRef) -> ParserRef {
    red(&cat(parser, &star(parser)), fold_repeat)
}

// Prepends the head of a repetition onto the already folded tail tuple.
fn fold_repeat(tree: &ParseTree) -> Result<ParseTree, ParseError> {
    let (first, rest) = match tree.as_pair() {
        Some(pair) => pair,
        None => {
            return Err(ParseError::semantic(format!(
                "repetition step produced a non-pair tree {}",
                tree
            )))
        }
    };
    match rest.as_tuple() {
        Some(items) => {
            let mut folded = Vec::with_capacity(items.len() + 1);
            folded.push(first.clone());
            folded.extend(items.iter().cloned());
            Ok(ParseTree::tuple(folded))
        }
        None => Err(ParseError::semantic(format!(
            "repetition tail folded to a non-tuple tree {}",
            rest
        ))),
    }
}

/// Builder-style combinator methods on shared parser references, so grammars can be written
/// as left-to-right chains: `a.cat(&b).alt(&c).red(f)`.
pub trait ParserExt {
    fn cat(&self, other: &ParserRef) -> ParserRef;
    fn alt(&self, other: &ParserRef) -> ParserRef;
    fn opt(&self) -> ParserRef;
    fn star(&self) -> ParserRef;
    fn plus(&self) -> ParserRef;
    fn red<F>(&self, func: F) -> ParserRef
    where
        F: Fn(&ParseTree) -> Result<ParseTree, ParseError> + 'static;
}

impl ParserExt for ParserRef {
    fn cat(&self, other: &ParserRef) -> ParserRef {
        cat(self, other)
    }

    fn alt(&self, other: &ParserRef) -> ParserRef {
        alt(self, other)
    }

    fn opt(&self) -> ParserRef {
        opt(self)
    }

    fn star(&self) -> ParserRef {
        star(self)
    }

    fn plus(&self) -> ParserRef {
        plus(self)
    }

    fn red<F>(&self, func: F) -> ParserRef
    where
        F: Fn(&ParseTree) -> Result<ParseTree, ParseError> + 'static,
    {
        red(self, func)
    }
}
