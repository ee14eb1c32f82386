use super::{AstNode, NodeClass};
use crate::{GrammarError, ParseError, ParseTree};
use ptree::TreeItem;
use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

fn check_identifier(what: &str, name: &str) -> Result<(), GrammarError> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(GrammarError::new(
            what,
            format!("'{}' is not a valid identifier.", name),
        ))
    }
}

impl NodeClass {
    /// Declare a new root node class with the given ordered field names.
    pub fn define(name: &str, fields: &[&str]) -> Result<Rc<NodeClass>, GrammarError> {
        NodeClass::build(name, None, fields)
    }

    /// Declare a subclass: it inherits the parent's fields and appends its own. Field names
    /// must stay unique across the whole chain.
    pub fn subclass(
        self: &Rc<NodeClass>,
        name: &str,
        fields: &[&str],
    ) -> Result<Rc<NodeClass>, GrammarError> {
        NodeClass::build(name, Some(self.clone()), fields)
    }

    fn build(
        name: &str,
        parent: Option<Rc<NodeClass>>,
        own_fields: &[&str],
    ) -> Result<Rc<NodeClass>, GrammarError> {
        check_identifier("InvalidClassName", name)?;
        let mut fields: Vec<Rc<str>> = match &parent {
            Some(parent) => parent.fields.clone(),
            None => Vec::new(),
        };
        for field in own_fields {
            check_identifier("InvalidFieldName", field)?;
            if fields.iter().any(|existing| &**existing == *field) {
                return Err(GrammarError::new(
                    "DuplicateField",
                    format!(
                        "Field '{}' of class '{}' is already declared in the class chain.",
                        field, name
                    ),
                ));
            }
            fields.push(Rc::from(*field));
        }
        Ok(Rc::new(NodeClass {
            name: Rc::from(name),
            parent,
            fields,
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Rc<NodeClass>> {
        self.parent.as_ref()
    }

    /// The full ordered field chain, parent fields first.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| &**field)
    }

    pub fn is_subclass_of(self: &Rc<NodeClass>, other: &Rc<NodeClass>) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if Rc::ptr_eq(class, other) {
                return true;
            }
            current = class.parent.as_ref();
        }
        false
    }

    /// Construct a node, taking positional values in field order.
    ///
    /// An arity mismatch is reported as a [ParseError] because nodes are normally built
    /// inside reductions, whose failures propagate out of the parse.
    pub fn node(
        self: &Rc<NodeClass>,
        values: Vec<ParseTree>,
    ) -> Result<Rc<AstNode>, ParseError> {
        if values.len() != self.fields.len() {
            return Err(ParseError::semantic(format!(
                "Class '{}' takes {} field values but {} were given.",
                self.name,
                self.fields.len(),
                values.len()
            )));
        }
        let mut hasher = DefaultHasher::new();
        self.name.hash(&mut hasher);
        for value in &values {
            value.hash(&mut hasher);
        }
        let hash = hasher.finish();
        Ok(Rc::new(AstNode {
            class: self.clone(),
            values,
            hash,
        }))
    }
}

impl Debug for NodeClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeClass('{}')", self.name)
    }
}

impl AstNode {
    pub fn class(&self) -> &Rc<NodeClass> {
        &self.class
    }

    pub fn class_name(&self) -> &str {
        &self.class.name
    }

    pub(crate) fn values(&self) -> &[ParseTree] {
        &self.values
    }

    /// Iterate `(field name, value)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ParseTree)> {
        self.class
            .fields
            .iter()
            .map(|field| &**field)
            .zip(self.values.iter())
    }

    pub fn get(&self, field: &str) -> Option<&ParseTree> {
        self.fields()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    /// The AST-valued children of this node: fields holding nodes, plus nodes inside tuple
    /// fields. Scalar fields are skipped.
    pub fn children(&self) -> Vec<Rc<AstNode>> {
        let mut children = Vec::new();
        for value in &self.values {
            match value {
                ParseTree::Node(node) => children.push(node.clone()),
                ParseTree::Tuple(items) => {
                    for item in items.iter() {
                        if let ParseTree::Node(node) = item {
                            children.push(node.clone());
                        }
                    }
                }
                _ => {}
            }
        }
        children
    }

    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(self)
    }
}

impl PartialEq for AstNode {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && Rc::ptr_eq(&self.class, &other.class)
            && self.values == other.values
    }
}

impl Eq for AstNode {}

impl Hash for AstNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash)
    }
}

impl Display for AstNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.class.name)?;
        for (index, (field, value)) in self.fields().enumerate() {
            if index != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", field, value)?;
        }
        write!(f, ")")
    }
}

impl Debug for AstNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl TreeItem for AstNode {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        write!(f, "{}", self.class.name)
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(
            AstNode::children(self)
                .into_iter()
                .map(|child| (*child).clone())
                .collect::<Vec<_>>(),
        )
    }
}
