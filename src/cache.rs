use crate::parser::ParserRef;
use crate::{ParseCache, ParserKey};
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

impl ParserKey {
    pub(crate) fn of(parser: &ParserRef) -> Self {
        ParserKey(parser.clone())
    }
}

impl Hash for ParserKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state)
    }
}

impl PartialEq for ParserKey {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ParserKey {}

impl ParseCache {
    pub fn new() -> Self {
        Self {
            derivatives: HashMap::new(),
            compactions: HashMap::new(),
            null_sets: HashMap::new(),
            null_done: HashSet::new(),
            null_pass: HashSet::new(),
            null_changed: false,
        }
    }

    /// Release every cached entry. Called at the start and end of each top-level parse so
    /// caches never accumulate across independent parses.
    pub fn clear(&mut self) {
        self.derivatives.clear();
        self.compactions.clear();
        self.null_sets.clear();
        self.null_done.clear();
        self.null_pass.clear();
        self.null_changed = false;
    }

    /// Open a new compaction scope. The compaction cache is only valid within one parse
    /// step; the derivative and nullability caches persist for the whole parse.
    pub(crate) fn begin_step(&mut self) {
        self.compactions.clear();
    }

    /// Cache occupancy as `(derivatives, nullability entries, compactions)`, for harnesses
    /// measuring residency.
    pub fn residency(&self) -> (usize, usize, usize) {
        (
            self.derivatives.len(),
            self.null_sets.len(),
            self.compactions.len(),
        )
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new()
    }
}
