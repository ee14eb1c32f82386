use super::combinators::{alt, cat, empty, eps, red, reduce};
use super::{Parser, ParserRef};
use crate::{ParseCache, ParseError, ParseTree, ParserKey};
use std::rc::Rc;

// The single tree of an epsilon node carrying exactly one, if so.
fn single_tree(parser: &ParserRef) -> Option<ParseTree> {
    match &**parser {
        Parser::Epsilon(trees) if trees.len() == 1 => trees.iter().next().cloned(),
        _ => None,
    }
}

impl ParseCache {
    /// A language-preserving rewrite that shrinks the parser graph.
    ///
    /// Rules are applied bottom-up and memoized for the current parse step; the cache is
    /// seeded with `p → p` before recursing so cyclic graphs terminate (a node reached
    /// through its own cycle stands unchanged). Every rewrite is a semantic identity:
    /// neither the language nor the nullability set changes. Compaction builds new nodes
    /// rather than mutating shared structure, and a node no rule fires on keeps its
    /// identity, which makes the pass idempotent.
    pub fn compact(&mut self, parser: &ParserRef) -> Result<ParserRef, ParseError> {
        let key = ParserKey::of(parser);
        if let Some(compacted) = self.compactions.get(&key) {
            return Ok(compacted.clone());
        }
        self.compactions.insert(key.clone(), parser.clone());
        let compacted = match &**parser {
            Parser::Empty | Parser::Epsilon(_) | Parser::Literal(_) => parser.clone(),
            Parser::Alternate(left, right) => {
                let c_left = self.compact(left)?;
                let c_right = self.compact(right)?;
                if c_left.is_empty() {
                    c_right
                } else if c_right.is_empty() {
                    c_left
                } else if Rc::ptr_eq(&c_left, left) && Rc::ptr_eq(&c_right, right) {
                    parser.clone()
                } else {
                    alt(&c_left, &c_right)
                }
            }
            Parser::Concatenate(left, right) => {
                let c_left = self.compact(left)?;
                let c_right = self.compact(right)?;
                if c_left.is_empty() || c_right.is_empty() {
                    empty()
                } else if let Some(tree) = single_tree(&c_left) {
                    // ε{v} · p recognizes exactly L(p); shift the fixed tree into a
                    // reduction pairing it onto every result.
                    red(&c_right, move |t| {
                        Ok(ParseTree::pair(tree.clone(), t.clone()))
                    })
                } else if let Some(tree) = single_tree(&c_right) {
                    red(&c_left, move |t| {
                        Ok(ParseTree::pair(t.clone(), tree.clone()))
                    })
                } else if Rc::ptr_eq(&c_left, left) && Rc::ptr_eq(&c_right, right) {
                    parser.clone()
                } else {
                    cat(&c_left, &c_right)
                }
            }
            Parser::Reduce(inner, func) => {
                let c_inner = self.compact(inner)?;
                if c_inner.is_empty() {
                    empty()
                } else if let Parser::Reduce(base, inner_func) = &*c_inner {
                    // Reduction fusion: Red(Red(p, g), f) = Red(p, f ∘ g).
                    let outer = func.clone();
                    let inner_fn = inner_func.clone();
                    red(base, move |t| {
                        let mid = inner_fn.as_ref()(t)?;
                        outer.as_ref()(&mid)
                    })
                } else if Rc::ptr_eq(&c_inner, inner) {
                    parser.clone()
                } else {
                    reduce(&c_inner, func.clone())
                }
            }
            Parser::Delta(inner) => {
                // Freeze the nullability: the skeleton accepts no input, so its whole
                // contribution is its nullability set.
                let forest = self.derive_null(inner)?;
                eps(forest)
            }
            Parser::Recurrence(recurrence) => {
                let inner = recurrence.resolved();
                self.compact(&inner)?
            }
            Parser::Lazy(_) => {
                let forced = self.force(parser);
                self.compact(&forced)?
            }
        };
        self.compactions.insert(key, compacted.clone());
        Ok(compacted)
    }
}
