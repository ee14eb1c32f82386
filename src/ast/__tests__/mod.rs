use crate::ast::{dump, walk, NodeClass, NodeTransformer, NodeVisitor, Rewrite};
use crate::ast::AstNode;
use crate::ParseTree;
use std::collections::HashSet;
use std::rc::Rc;

fn leaf(value: i64) -> ParseTree {
    ParseTree::lexeme(value)
}

#[test]
fn subclasses_extend_the_field_chain() {
    let compound = NodeClass::define("Compound", &["left", "right"]).unwrap();
    let call = compound.subclass("Call", &["args"]).unwrap();

    assert_eq!(call.fields().collect::<Vec<_>>(), vec!["left", "right", "args"]);
    assert!(call.is_subclass_of(&compound));
    assert!(!compound.is_subclass_of(&call));
}

#[test]
fn duplicate_fields_across_the_chain_are_rejected() {
    let compound = NodeClass::define("Compound", &["left", "right"]).unwrap();
    assert!(compound.subclass("Call", &["left"]).is_err());
    assert!(NodeClass::define("Pair", &["a", "a"]).is_err());
    assert!(NodeClass::define("bad name", &[]).is_err());
    assert!(NodeClass::define("Ok", &["1st"]).is_err());
}

#[test]
fn construction_checks_the_arity() {
    let compound = NodeClass::define("Compound", &["left", "right"]).unwrap();
    assert!(compound.node(vec![leaf(1)]).is_err());
    assert!(compound.node(vec![leaf(1), leaf(2)]).is_ok());
}

#[test]
fn equality_is_structural_and_hash_is_stable() {
    let compound = NodeClass::define("Compound", &["left", "right"]).unwrap();
    let first = compound.node(vec![leaf(1), leaf(2)]).unwrap();
    let second = compound.node(vec![leaf(1), leaf(2)]).unwrap();
    let different = compound.node(vec![leaf(1), leaf(3)]).unwrap();

    assert_eq!(first, second);
    assert_ne!(first, different);

    let mut set: HashSet<Rc<AstNode>> = HashSet::new();
    set.insert(first.clone());
    set.insert(second.clone());
    set.insert(different.clone());
    assert_eq!(set.len(), 2);

    // Classes compare by identity: an equally named class defined separately is distinct.
    let other_class = NodeClass::define("Compound", &["left", "right"]).unwrap();
    let foreign = other_class.node(vec![leaf(1), leaf(2)]).unwrap();
    assert_ne!(first, foreign);
}

#[test]
fn field_introspection_follows_declaration_order() {
    let compound = NodeClass::define("Compound", &["left", "right"]).unwrap();
    let node = compound.node(vec![leaf(1), leaf(2)]).unwrap();

    let names: Vec<&str> = node.fields().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["left", "right"]);
    assert_eq!(node.get("right"), Some(&leaf(2)));
    assert_eq!(node.get("missing"), None);
}

fn sample_tree() -> (Rc<AstNode>, Rc<NodeClass>, Rc<NodeClass>) {
    let compound = NodeClass::define("Compound", &["left", "right"]).unwrap();
    let add = compound.subclass("Add", &[]).unwrap();
    let mul = compound.subclass("Mul", &[]).unwrap();

    let product = mul.node(vec![leaf(2), leaf(3)]).unwrap();
    let inner = add.node(vec![leaf(1), ParseTree::Node(product)]).unwrap();
    let root = add.node(vec![ParseTree::Node(inner), leaf(4)]).unwrap();
    (root, add, mul)
}

#[test]
fn walk_is_breadth_first() {
    let (root, _, _) = sample_tree();
    let names: Vec<String> = walk(&root)
        .map(|node| node.class_name().to_string())
        .collect();
    assert_eq!(names, vec!["Add", "Add", "Mul"]);
}

#[test]
fn walk_descends_into_tuple_fields() {
    let wrapper = NodeClass::define("Block", &["statements"]).unwrap();
    let item = NodeClass::define("Item", &["value"]).unwrap();
    let first = item.node(vec![leaf(1)]).unwrap();
    let second = item.node(vec![leaf(2)]).unwrap();
    let block = wrapper
        .node(vec![ParseTree::tuple(vec![
            ParseTree::Node(first),
            ParseTree::Node(second),
        ])])
        .unwrap();

    assert_eq!(walk(&block).count(), 3);
}

struct AddCounter {
    count: usize,
}

impl NodeVisitor for AddCounter {
    fn visit_named(&mut self, node: &Rc<AstNode>) -> bool {
        if node.class_name() == "Add" {
            self.count += 1;
        }
        // Never handled outright: always fall through to the recursive walk.
        false
    }
}

#[test]
fn visitor_dispatches_by_class_name() {
    let (root, _, _) = sample_tree();
    let mut counter = AddCounter { count: 0 };
    counter.visit(&root);
    assert_eq!(counter.count, 2);
}

struct MulToAdd {
    add: Rc<NodeClass>,
}

impl NodeTransformer for MulToAdd {
    fn transform_named(&mut self, node: &Rc<AstNode>) -> Rewrite {
        if node.class_name() == "Mul" {
            let values: Vec<ParseTree> = node.fields().map(|(_, value)| value.clone()).collect();
            match self.add.node(values) {
                Ok(rebuilt) => Rewrite::Replace(rebuilt),
                Err(_) => Rewrite::Keep,
            }
        } else {
            Rewrite::Unhandled
        }
    }
}

#[test]
fn transformer_rebuilds_changed_parents_only() {
    let (root, add, _) = sample_tree();
    let mut transformer = MulToAdd { add };

    let rebuilt = transformer.transform(&root).unwrap();
    assert!(!Rc::ptr_eq(&rebuilt, &root));

    let names: Vec<String> = walk(&rebuilt)
        .map(|node| node.class_name().to_string())
        .collect();
    assert_eq!(names, vec!["Add", "Add", "Add"]);

    // The original tree is untouched.
    let original: Vec<String> = walk(&root)
        .map(|node| node.class_name().to_string())
        .collect();
    assert_eq!(original, vec!["Add", "Add", "Mul"]);
}

#[test]
fn transformer_keeps_unchanged_trees_by_identity() {
    let (root, _, _) = sample_tree();
    // A transformer with no opinions leaves the tree alone.
    struct Inert;
    impl NodeTransformer for Inert {}

    let rebuilt = Inert.transform(&root).unwrap();
    assert!(Rc::ptr_eq(&rebuilt, &root));
}

struct DropItems;

impl NodeTransformer for DropItems {
    fn transform_named(&mut self, node: &Rc<AstNode>) -> Rewrite {
        if node.class_name() == "Item" {
            Rewrite::Remove
        } else {
            Rewrite::Unhandled
        }
    }
}

#[test]
fn transformer_drops_nodes_from_tuple_fields() {
    let wrapper = NodeClass::define("Block", &["statements"]).unwrap();
    let item = NodeClass::define("Item", &["value"]).unwrap();
    let keep = NodeClass::define("Keep", &[]).unwrap();
    let block = wrapper
        .node(vec![ParseTree::tuple(vec![
            ParseTree::Node(item.node(vec![leaf(1)]).unwrap()),
            ParseTree::Node(keep.node(vec![]).unwrap()),
            ParseTree::Node(item.node(vec![leaf(2)]).unwrap()),
        ])])
        .unwrap();

    let rebuilt = DropItems.transform(&block).unwrap();
    let statements = rebuilt.get("statements").unwrap().as_tuple().unwrap();
    assert_eq!(statements.len(), 1);
}

#[test]
fn dump_renders_an_indented_constructor_view() {
    let (root, _, _) = sample_tree();
    let text = dump(&root);
    assert!(text.starts_with("Add(\n"));
    assert!(text.contains("Mul(\n"));
    assert!(text.contains("left = "));
    assert!(text.ends_with(")"));
}
