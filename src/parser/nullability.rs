use super::{Parser, ParserRef};
use crate::{Forest, ParseCache, ParseError, ParseTree, ParserKey};

impl ParseCache {
    /// The nullability set of `parser`: every parse tree it contributes for the empty
    /// remaining input. For recursive graphs this is a least fixed point over set
    /// inclusion, computed by Kleene iteration: repeat recomputation passes until a pass
    /// changes no cached set. Termination holds because every tree is built from tokens
    /// already consumed, so each node's universe of candidate trees is finite.
    pub fn derive_null(&mut self, parser: &ParserRef) -> Result<Forest, ParseError> {
        loop {
            self.null_changed = false;
            self.null_pass.clear();
            let forest = self.null_step(parser)?;
            if !self.null_changed {
                // Converged: every set touched by this pass is final for the rest of the
                // parse, because node structure never changes once built.
                for key in self.null_pass.drain() {
                    self.null_done.insert(key);
                }
                return Ok(forest);
            }
        }
    }

    // One recomputation pass. A node revisited within the same pass (a cycle, or a shared
    // subgraph already recomputed) reads the current approximation instead of recursing.
    fn null_step(&mut self, parser: &ParserRef) -> Result<Forest, ParseError> {
        let key = ParserKey::of(parser);
        if self.null_done.contains(&key) || !self.null_pass.insert(key.clone()) {
            return Ok(self.null_sets.get(&key).cloned().unwrap_or_default());
        }
        let forest = match &**parser {
            Parser::Empty | Parser::Literal(_) => Forest::new(),
            Parser::Epsilon(trees) => trees.clone(),
            Parser::Alternate(left, right) => {
                let mut forest = self.null_step(left)?;
                forest.extend(self.null_step(right)?);
                forest
            }
            Parser::Concatenate(left, right) => {
                let left_set = self.null_step(left)?;
                let right_set = self.null_step(right)?;
                let mut forest = Forest::with_capacity(left_set.len() * right_set.len());
                for left_tree in &left_set {
                    for right_tree in &right_set {
                        forest.insert(ParseTree::pair(left_tree.clone(), right_tree.clone()));
                    }
                }
                forest
            }
            Parser::Reduce(inner, func) => {
                let inner_set = self.null_step(inner)?;
                let mut forest = Forest::with_capacity(inner_set.len());
                for tree in &inner_set {
                    forest.insert(func.as_ref()(tree)?);
                }
                forest
            }
            Parser::Delta(inner) => self.null_step(inner)?,
            Parser::Recurrence(recurrence) => {
                let inner = recurrence.resolved();
                self.null_step(&inner)?
            }
            Parser::Lazy(_) => {
                let forced = self.force(parser);
                self.null_step(&forced)?
            }
        };
        let changed = match self.null_sets.get(&key) {
            Some(previous) => *previous != forest,
            None => !forest.is_empty(),
        };
        if changed {
            self.null_changed = true;
            self.null_sets.insert(key, forest.clone());
        }
        Ok(forest)
    }
}
