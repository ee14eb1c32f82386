//! A generic substrate for typed abstract syntax trees.
//!
//! Reductions in a grammar usually end by packing their parse tree into a named node:
//! declare the node shapes once with [NodeClass::define] (and
//! [subclass](NodeClass::subclass) for families sharing fields), then build instances with
//! [NodeClass::node]. Nodes are immutable, compare field by field, and carry a hash
//! precomputed at construction so forests of them behave as cheap hash sets.
//!
//! Consumers traverse the result with [walk] (breadth-first), a [NodeVisitor] (dispatch on
//! the concrete class name with a generic recursive fallback), or a [NodeTransformer]
//! (same dispatch, but every visit returns a [Rewrite]; changed children rebuild a fresh
//! parent, originals are never touched). [write_ast] renders a node as an indented
//! constructor-style dump.
mod format;
mod node;
mod visit;

#[cfg(test)]
mod __tests__;

use crate::ParseTree;
use std::rc::Rc;

pub use format::{dump, write_ast};
pub use visit::{walk, NodeTransformer, NodeVisitor, Rewrite, Walk};

/// The runtime description of a node class: a name, an optional parent class, and the full
/// ordered field list (the parent's fields followed by the class's own).
///
/// Classes are compared by identity, like the engine's parsers: two classes defined
/// separately under the same name are distinct, and so are their nodes.
pub struct NodeClass {
    name: Rc<str>,
    parent: Option<Rc<NodeClass>>,
    fields: Vec<Rc<str>>,
}

/// One tree node: a class, one value per declared field, and a structural hash precomputed
/// at construction.
#[derive(Clone)]
pub struct AstNode {
    class: Rc<NodeClass>,
    values: Vec<ParseTree>,
    hash: u64,
}
