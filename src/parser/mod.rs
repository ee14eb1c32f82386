//! The derivative algebra: the closed set of parser variants and the combinators that
//! build them.
//!
//! A parser here is a *value* describing a language. The engine never walks the input with
//! it directly; instead [ParseCache](crate::ParseCache) repeatedly rewrites the value — the
//! token derivative after each token, structural compaction after each derivative, and the
//! nullability fixed point at the end — until the parse forest falls out.
//!
//! Grammar authors only touch the combinators: [lit] for terminals, [cat] and [alt] for
//! sequencing and alternatives, [opt]/[star]/[plus] for the usual closures, and [red] to
//! attach a semantic action that reshapes the trees flowing through a rule. The remaining
//! variants ([Delta](Parser::Delta), [Recurrence](Parser::Recurrence),
//! [Lazy](Parser::Lazy)) are created by the engine or the [Grammar](crate::Grammar)
//! namespace while tying recursive rules together.
mod combinators;
mod compaction;
mod derivative;
mod display;
mod nullability;

#[cfg(test)]
mod __tests__;

use crate::{Forest, GrammarError, ParseError, ParseTree, Token};
use once_cell::unsync::OnceCell;
use std::rc::Rc;

pub use combinators::{
    alt, cat, delta, empty, eps, eps_tree, lit, opt, plus, rec, red, reduce, star, ParserExt,
};
pub(crate) use combinators::rec_named;

/// A shared, immutable reference to a parser node. Node identity (the pointer) is the memo
/// key for every cache; two structurally equal parsers built separately are distinct.
pub type ParserRef = Rc<Parser>;

/// A semantic action attached to a [Reduce](Parser::Reduce) node. Actions are opaque to the
/// engine and must be pure; an `Err` propagates out of the parse unchanged.
pub type Reduction = Rc<dyn Fn(&ParseTree) -> Result<ParseTree, ParseError>>;

/// A parser for a context-free language, as a closed sum of variants.
///
/// The discriminated-union shape keeps the derivative, nullability, and compaction rule
/// tables exhaustive: adding a variant fails to compile until every table handles it.
pub enum Parser {
    /// The language `{}`; a per-thread singleton obtained through canonicalizing
    /// constructors.
    Empty,
    /// The language `{ε}`, carrying the forest already accumulated on this branch.
    Epsilon(Forest),
    /// Matches one token whose kind equals the field; contributes that token's value.
    Literal(Rc<str>),
    /// Union of two languages.
    Alternate(ParserRef, ParserRef),
    /// Concatenation; the forest is the Cartesian product of the sub-forests.
    Concatenate(ParserRef, ParserRef),
    /// A parser reduced by a semantic action.
    Reduce(ParserRef, Reduction),
    /// A nullable skeleton: contributes the inner parser's nullability set but accepts no
    /// further input.
    Delta(ParserRef),
    /// A forward-declared recursion point whose inner parser is set once, later.
    Recurrence(Recurrence),
    /// A deferred derivative, evaluated on first observation.
    Lazy(LazyDerivative),
}

/// The mutable cell inside a [Recurrence](Parser::Recurrence) node: a one-time-set inner
/// parser and an optional rule name for diagnostics.
pub struct Recurrence {
    name: Option<Rc<str>>,
    inner: OnceCell<ParserRef>,
}

/// A deferred derivative of `parser` with respect to `token`; the structural derivative is
/// computed on first observation and cached in `forced`.
pub struct LazyDerivative {
    pub(crate) parser: ParserRef,
    pub(crate) token: Token,
    pub(crate) forced: OnceCell<ParserRef>,
}

impl Parser {
    pub fn is_empty(&self) -> bool {
        matches!(self, Parser::Empty)
    }

    /// Set the inner parser of a recurrence node. Fails on a second assignment and on any
    /// non-recurrence variant; both are grammar-construction errors.
    pub fn define(&self, inner: ParserRef) -> Result<(), GrammarError> {
        match self {
            Parser::Recurrence(recurrence) => recurrence.inner.set(inner).map_err(|_| {
                GrammarError::new(
                    "DoubleAssignment",
                    format!("Recurrence '{}' is already defined.", recurrence.name()),
                )
            }),
            _ => Err(GrammarError::new(
                "NotARecurrence",
                "Only a recurrence node can be defined after construction.".into(),
            )),
        }
    }

    /// Whether this node is ready to parse: every variant except an unset recurrence.
    pub fn is_defined(&self) -> bool {
        match self {
            Parser::Recurrence(recurrence) => recurrence.inner.get().is_some(),
            _ => true,
        }
    }
}

impl Recurrence {
    pub(crate) fn unnamed() -> Self {
        Self {
            name: None,
            inner: OnceCell::new(),
        }
    }

    pub(crate) fn named(name: Rc<str>) -> Self {
        Self {
            name: Some(name),
            inner: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }

    /// The inner parser. An unset recurrence cannot be observed through a frozen
    /// [Grammar](crate::Grammar); if the engine reaches one anyway it behaves as the empty
    /// language.
    pub(crate) fn resolved(&self) -> ParserRef {
        match self.inner.get() {
            Some(inner) => inner.clone(),
            None => {
                if cfg!(debug_assertions) {
                    panic!("Recurrence '{}' is not defined", self.name())
                }
                combinators::empty()
            }
        }
    }
}
