use super::combinators::{alt, cat, delta, empty, eps_tree, lazy, reduce};
use super::{Parser, ParserRef};
use crate::{ParseCache, ParseTree, ParserKey, Token};

impl ParseCache {
    /// The token derivative `∂_tok p`: the parser accepting every string `s` such that
    /// `tok·s` is in the language of `p`.
    ///
    /// Memoized on `(node identity, token)`. The memo is what guarantees that deriving a
    /// recurrence twice hands back the *same* lazy node, so the derived graph shares
    /// structure instead of unfolding forever.
    pub fn derive(&mut self, parser: &ParserRef, token: &Token) -> ParserRef {
        let key = (ParserKey::of(parser), token.clone());
        if let Some(derived) = self.derivatives.get(&key) {
            return derived.clone();
        }
        let derived = match &**parser {
            Parser::Empty | Parser::Epsilon(_) | Parser::Delta(_) => empty(),
            Parser::Literal(kind) => {
                if *token.kind == **kind {
                    eps_tree(ParseTree::Lexeme(token.value.clone()))
                } else {
                    empty()
                }
            }
            // Every cycle in a parser graph passes through a recurrence or a lazy node, so
            // these two defer; eager descent through the variants below then terminates.
            Parser::Recurrence(_) | Parser::Lazy(_) => lazy(parser, token),
            Parser::Alternate(left, right) => {
                let d_left = self.derive(left, token);
                let d_right = self.derive(right, token);
                alt(&d_left, &d_right)
            }
            Parser::Concatenate(left, right) => {
                let d_left = self.derive(left, token);
                let d_right = self.derive(right, token);
                alt(&cat(&d_left, right), &cat(&delta(left), &d_right))
            }
            Parser::Reduce(inner, func) => {
                let d_inner = self.derive(inner, token);
                reduce(&d_inner, func.clone())
            }
        };
        self.derivatives.insert(key, derived.clone());
        derived
    }

    /// Evaluate a lazy node: compute the structural derivative it stands for, once, and
    /// cache it in the node. Non-lazy nodes pass through unchanged.
    pub(crate) fn force(&mut self, parser: &ParserRef) -> ParserRef {
        let cell = match &**parser {
            Parser::Lazy(cell) => cell,
            _ => return parser.clone(),
        };
        if let Some(forced) = cell.forced.get() {
            return forced.clone();
        }
        let forced = match &*cell.parser {
            Parser::Recurrence(recurrence) => {
                let inner = recurrence.resolved();
                self.derive(&inner, &cell.token)
            }
            Parser::Lazy(_) => {
                let inner = self.force(&cell.parser);
                self.derive(&inner, &cell.token)
            }
            // Thunks are only ever created over the two deferring variants.
            _ => {
                if cfg!(debug_assertions) {
                    panic!("Internal error.")
                }
                empty()
            }
        };
        // force never re-enters itself for one node: derive defers instead of forcing.
        if cell.forced.set(forced.clone()).is_err() {
            panic!("Internal error.");
        }
        forced
    }
}
