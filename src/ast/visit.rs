use super::AstNode;
use crate::ParseTree;
use std::collections::VecDeque;
use std::rc::Rc;

/// Breadth-first iterator over a node and all its AST descendants.
pub struct Walk {
    queue: VecDeque<Rc<AstNode>>,
}

/// Walk all nodes reachable from `root`, breadth-first, root included.
pub fn walk(root: &Rc<AstNode>) -> Walk {
    let mut queue = VecDeque::new();
    queue.push_back(root.clone());
    Walk { queue }
}

impl Iterator for Walk {
    type Item = Rc<AstNode>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.children());
        Some(node)
    }
}

/// Visit every node in an AST, dispatching on the concrete class.
///
/// Implementors override [visit_named](NodeVisitor::visit_named), match on
/// `node.class_name()`, and return `true` for the classes they handle; everything else
/// falls back to [generic_visit](NodeVisitor::generic_visit), a plain recursive walk.
pub trait NodeVisitor {
    fn visit(&mut self, node: &Rc<AstNode>) {
        if !self.visit_named(node) {
            self.generic_visit(node);
        }
    }

    /// The dispatch hook; return `true` when this node's class was handled.
    fn visit_named(&mut self, _node: &Rc<AstNode>) -> bool {
        false
    }

    fn generic_visit(&mut self, node: &Rc<AstNode>) {
        for child in node.children() {
            self.visit(&child);
        }
    }
}

/// The outcome a [NodeTransformer] reports for one node.
pub enum Rewrite {
    /// Not handled here; run the generic rebuilding pass.
    Unhandled,
    /// Keep the node exactly as it is, children included.
    Keep,
    /// Substitute another node.
    Replace(Rc<AstNode>),
    /// Drop the node: removed from tuple fields, a scalar field keeps a `Nil` hole.
    Remove,
}

/// Rebuild an AST bottom-up, dispatching on the concrete class.
///
/// Like [NodeVisitor] but every visit produces a [Rewrite]. The generic pass transforms
/// node-valued fields and the elements of tuple fields; if any child changed, a *new*
/// parent is constructed around the replacements — original nodes are never mutated.
pub trait NodeTransformer {
    fn transform(&mut self, node: &Rc<AstNode>) -> Option<Rc<AstNode>> {
        match self.transform_named(node) {
            Rewrite::Unhandled => self.generic_transform(node),
            Rewrite::Keep => Some(node.clone()),
            Rewrite::Replace(replacement) => Some(replacement),
            Rewrite::Remove => None,
        }
    }

    /// The dispatch hook; return [Rewrite::Unhandled] to fall through to the generic pass.
    fn transform_named(&mut self, _node: &Rc<AstNode>) -> Rewrite {
        Rewrite::Unhandled
    }

    fn generic_transform(&mut self, node: &Rc<AstNode>) -> Option<Rc<AstNode>> {
        let mut changed = false;
        let mut new_values = Vec::with_capacity(node.values().len());
        for value in node.values() {
            let new_value = match value {
                ParseTree::Node(child) => match self.transform(child) {
                    Some(replacement) => ParseTree::Node(replacement),
                    None => ParseTree::Nil,
                },
                ParseTree::Tuple(items) => {
                    let mut rebuilt = Vec::with_capacity(items.len());
                    for item in items.iter() {
                        match item {
                            ParseTree::Node(child) => {
                                if let Some(replacement) = self.transform(child) {
                                    rebuilt.push(ParseTree::Node(replacement));
                                }
                            }
                            other => rebuilt.push(other.clone()),
                        }
                    }
                    ParseTree::tuple(rebuilt)
                }
                other => other.clone(),
            };
            if new_value != *value {
                changed = true;
            }
            new_values.push(new_value);
        }
        if changed {
            let rebuilt = node
                .class()
                .node(new_values)
                .expect("field arity is preserved by the generic pass");
            Some(rebuilt)
        } else {
            Some(node.clone())
        }
    }
}
