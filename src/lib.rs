//! Language parsing with derivatives (lang_pwd) is a library for recognizing context-free
//! languages by treating the parser itself as a value: recognition repeatedly differentiates
//! that value with respect to each input token, compacts the result, and finally reads the
//! parse forest off the final parser's nullability set.
//!
//! # Overview
//! A grammar built with this library is a graph of [Parser] nodes created through the
//! combinators in the [parser] module ([lit](parser::lit), [cat](parser::cat),
//! [alt](parser::alt), [opt](parser::opt), [star](parser::star), [plus](parser::plus),
//! [red](parser::red)). Recursive and mutually recursive rules are tied together through a
//! [Grammar] namespace: reading a rule before it is defined forward-declares a recurrence
//! node, and [freeze](Grammar::freeze) checks every declared rule was eventually defined.
//!
//! Unlike backtracking or table-driven parsers, the derivative engine handles left recursion
//! and ambiguity directly. Deriving a recurrence yields a lazy thunk that is only forced
//! during compaction, which is what lets left-recursive grammars terminate, and the result of
//! a parse is a [Forest]: the *set* of every derivation the grammar admits for the input.
//!
//! # Design
//!
//! The parser algebra is a closed set of variants ([Parser]) with three operations, all
//! memoized on node identity inside a per-parse [ParseCache]:
//!
//! * the token derivative ([derive](ParseCache::derive)),
//! * the nullability set ([derive_null](ParseCache::derive_null)), computed as a least
//!   fixed point over set inclusion, and
//! * structural compaction ([compact](ParseCache::compact)), a language-preserving rewrite
//!   applied after every derivative step.
//!
//! Around the engine the crate carries the rest of the toolchain: a [Lexicon](lexer::Lexicon)
//! tokenizer built from a priority-ordered regex table, a stack-machine tokenizer
//! ([StackTokenizer](lexer::StackTokenizer)) for syntaxes a single table cannot express, and
//! a generic AST substrate ([ast]) whose nodes carry precomputed structural hashes so that
//! parse forests behave as sets.
//!
//! # Example
//!
//! A minimal arithmetic recognizer over `NUMBER (+ NUMBER)*`:
//!
//! ```
//! use lang_pwd::parser::{cat, lit, red, star};
//! use lang_pwd::{parse, Token};
//!
//! let addition = red(&cat(&lit("+"), &lit("NUMBER")), |tree| {
//!     // Keep the number, drop the operator lexeme.
//!     let parts = tree.unpack(2)?;
//!     Ok(parts[1].clone())
//! });
//! let sum = cat(&lit("NUMBER"), &star(&addition));
//!
//! let tokens = vec![
//!     Token::int("NUMBER", 1),
//!     Token::symbol("+"),
//!     Token::int("NUMBER", 2),
//!     Token::symbol("+"),
//!     Token::int("NUMBER", 3),
//! ];
//! let forest = parse(&sum, tokens).unwrap();
//! assert_eq!(forest.len(), 1);
//!
//! let tree = forest.into_iter().next().unwrap();
//! let parts = tree.unpack(2).unwrap();
//! assert_eq!(format!("{}", parts[1]), "(2, 3)");
//! ```
//!
//! Grammars with named, mutually recursive rules go through [Grammar]; complete worked
//! clients (an arithmetic calculator and a JSON reader) live in the [examples] module.
mod cache;
mod error;
mod grammar;
mod parsing;
mod token;
mod tree;
pub mod ast;
pub mod examples;
pub mod lexer;
pub mod parser;
mod util;

use crate::ast::AstNode;
use once_cell::unsync::OnceCell;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

pub use parser::{Parser, ParserRef, Reduction};
pub use parsing::{parse, parse_with};
pub use token::END_MARKER;
pub use util::{Code, Log, Position};

/// One lexical element: a `(kind, value)` pair.
///
/// The `kind` drives terminal matching ([lit](parser::lit) compares against it); the `value`
/// is what flows into the parse forest when the terminal matches. Tokens are immutable and
/// hash by pair equality. A token stream always terminates with the
/// [`ENDMARKER`](Token::end) sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: Rc<str>,
    pub value: TokenValue,
}

/// The payload of a [Token]: the raw lexeme or an evaluated integer literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenValue {
    Str(Rc<str>),
    Int(i64),
}

/// One derivation in a parse forest.
///
/// Trees are built by the engine (token values from [Literal](Parser::Literal) matches,
/// pairs from concatenation) and reshaped by reductions, which typically fold them into
/// [Tuple](ParseTree::Tuple)s or [ast] nodes. Equality and hashing are structural, so trees
/// participate in the [Forest] set and duplicate derivations coalesce.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ParseTree {
    /// The ε seed carried by an epsilon parser before any input contributed.
    Nil,
    /// A matched token's value.
    Lexeme(TokenValue),
    /// The product of a concatenation.
    Pair(Rc<(ParseTree, ParseTree)>),
    /// A flattened repetition, as produced by [star](parser::star) and [plus](parser::plus).
    Tuple(Rc<Vec<ParseTree>>),
    /// A typed tree node constructed by a reduction.
    Node(Rc<AstNode>),
}

/// The set of parse trees a parse yields; empty means the input was rejected.
pub type Forest = HashSet<ParseTree>;

/// An error raised eagerly while building a grammar, lexicon, or AST class, before any
/// input touches the engine.
#[derive(Debug)]
pub struct GrammarError {
    message: String,
    what: String,
}

/// A runtime failure: tokenization hit an unmatched character (the message carries line and
/// column, `pointer` indexes the offending byte), or a semantic action rejected a tree while
/// the forest was being built.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub pointer: usize,
    pub message: String,
}

/// The seam between tokenizers and the parsing driver.
///
/// Implemented by [Lexicon](lexer::Lexicon) and [StackTokenizer](lexer::StackTokenizer);
/// clients with bespoke lexers implement it to plug into [DefaultParser].
pub trait ITokenize {
    /// Split the input into a token stream ending with the `ENDMARKER` sentinel.
    fn tokenize(&self, code: &Code) -> Result<Vec<Token>, ParseError>;
}

/// A namespace of named grammar rules supporting forward and mutual recursion.
///
/// Reading a rule that has not been defined yet allocates a recurrence node for it, so rules
/// can be written in natural order. [freeze](Grammar::freeze) verifies every declared rule
/// was defined and makes the namespace read-only.
pub struct Grammar {
    name: Rc<str>,
    rules: RefCell<HashMap<Rc<str>, ParserRef>>,
    recurrences: RefCell<HashMap<Rc<str>, ParserRef>>,
    frozen: Cell<bool>,
}

/// A cache key wrapping a parser reference: hashes and compares by node identity, never by
/// structure (parser graphs are cyclic). Holding the reference keeps the node alive for the
/// key's lifetime, so a recycled allocation can never alias a stale entry.
#[derive(Clone)]
pub struct ParserKey(pub(crate) ParserRef);

/// The memoization substrate for one parse: the derivative cache (which guarantees the
/// derivative of a recurrence is the *same* lazy node each time), the nullability
/// fixed-point state, and the per-step compaction cache.
///
/// [parse] clears the cache at entry and exit; test harnesses can hold one explicitly,
/// drive [parse_with], and inspect [residency](ParseCache::residency).
pub struct ParseCache {
    derivatives: HashMap<(ParserKey, Token), ParserRef>,
    compactions: HashMap<ParserKey, ParserRef>,
    null_sets: HashMap<ParserKey, Forest>,
    null_done: HashSet<ParserKey>,
    null_pass: HashSet<ParserKey>,
    null_changed: bool,
}

/// A parser facade chaining a tokenizer and a grammar root: text in, forest out.
pub struct DefaultParser {
    lexicon: Rc<dyn ITokenize>,
    root: ParserRef,
    debug: OnceCell<Log<&'static str>>,
}
