use crate::parser::{rec_named, ParserRef};
use crate::{Grammar, GrammarError};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

impl Grammar {
    pub fn new(name: &str) -> Self {
        Self {
            name: Rc::from(name),
            rules: RefCell::new(HashMap::new()),
            recurrences: RefCell::new(HashMap::new()),
            frozen: Cell::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    /// Look up a rule. Reading a rule that has not been defined yet forward-declares it by
    /// allocating a recurrence node under that name, which is what lets grammars be written
    /// in natural order with forward and mutual references. After [freeze](Grammar::freeze),
    /// unknown names are an error.
    pub fn rule(&self, name: &str) -> Result<ParserRef, GrammarError> {
        if let Some(parser) = self.rules.borrow().get(name) {
            return Ok(parser.clone());
        }
        if self.frozen.get() {
            return Err(GrammarError::new(
                "UnknownRule",
                format!("Frozen grammar '{}' has no rule '{}'.", self.name, name),
            ));
        }
        let shared: Rc<str> = Rc::from(name);
        let recurrence = rec_named(shared.clone());
        self.rules
            .borrow_mut()
            .insert(shared.clone(), recurrence.clone());
        self.recurrences.borrow_mut().insert(shared, recurrence.clone());
        Ok(recurrence)
    }

    /// Define a rule. If the rule was forward-declared, the recurrence allocated for it has
    /// its inner parser set (a second definition is an error); otherwise the parser is
    /// stored directly under the name.
    pub fn define(&self, name: &str, parser: ParserRef) -> Result<(), GrammarError> {
        if self.frozen.get() {
            return Err(GrammarError::new(
                "FrozenGrammar",
                format!("Frozen grammar '{}' cannot be assigned to.", self.name),
            ));
        }
        if let Some(recurrence) = self.recurrences.borrow().get(name) {
            return recurrence.define(parser);
        }
        if self.rules.borrow().contains_key(name) {
            return Err(GrammarError::new(
                "DoubleAssignment",
                format!(
                    "Rule '{}' of grammar '{}' is already assigned.",
                    name, self.name
                ),
            ));
        }
        self.rules.borrow_mut().insert(Rc::from(name), parser);
        Ok(())
    }

    /// Check every forward-declared rule was eventually defined, then make the grammar
    /// read-only. Every recurrence reachable from the grammar's rules has a non-null inner
    /// parser from here on, so parsing can begin.
    pub fn freeze(&self) -> Result<(), GrammarError> {
        for (name, recurrence) in self.recurrences.borrow().iter() {
            if !recurrence.is_defined() {
                return Err(GrammarError::new(
                    "UndefinedRule",
                    format!(
                        "Rule '{}' of grammar '{}' is declared but never defined.",
                        name, self.name
                    ),
                ));
            }
        }
        self.frozen.set(true);
        Ok(())
    }

    /// Convenience for tests and small drivers: the parser stored under `name`, without
    /// forward-declaring anything.
    pub fn get(&self, name: &str) -> Option<ParserRef> {
        self.rules.borrow().get(name).cloned()
    }

    /// Iterate the defined rule names in no particular order.
    pub fn rule_names(&self) -> Vec<Rc<str>> {
        self.rules.borrow().keys().cloned().collect()
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Grammar(name='{}')", self.name)
    }
}
