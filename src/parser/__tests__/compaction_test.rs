use crate::parser::{cat, delta, eps, eps_tree, lit, opt, red, Parser};
use crate::{parse, ParseCache, ParseTree, Token};
use std::rc::Rc;

fn tok(kind: &str, value: &str) -> Token {
    Token::text(kind, value)
}

#[test]
fn reduction_chains_fuse_into_one() {
    let inner = red(&lit("N"), |tree| {
        Ok(ParseTree::tuple(vec![tree.clone()]))
    });
    let chain = red(&inner, |tree| {
        Ok(ParseTree::pair(ParseTree::Nil, tree.clone()))
    });

    let mut cache = ParseCache::new();
    let compacted = cache.compact(&chain).unwrap();

    match &*compacted {
        Parser::Reduce(base, fused) => {
            assert!(matches!(&**base, Parser::Literal(_)));
            // h(x) == f(g(x)) for the fused action.
            let input = ParseTree::lexeme("v");
            let output = fused.as_ref()(&input).unwrap();
            assert_eq!(
                output,
                ParseTree::pair(ParseTree::Nil, ParseTree::tuple(vec![input]))
            );
        }
        other => panic!("expected a fused reduction, found {}", other),
    }
}

#[test]
fn compaction_is_idempotent() {
    let inner = red(&lit("N"), |tree| Ok(tree.clone()));
    let chain = red(&inner, |tree| Ok(tree.clone()));

    let mut cache = ParseCache::new();
    let first = cache.compact(&chain).unwrap();
    cache.clear();
    let second = cache.compact(&first).unwrap();
    assert!(Rc::ptr_eq(&first, &second));
}

#[test]
fn single_tree_epsilon_fuses_into_a_pairing_reduction() {
    let parser = cat(&eps_tree(ParseTree::lexeme("v")), &lit("N"));

    let mut cache = ParseCache::new();
    let compacted = cache.compact(&parser).unwrap();
    assert!(matches!(&*compacted, Parser::Reduce(_, _)));

    // The rewrite must preserve the language and the forest shape.
    let forest = parse(&compacted, vec![tok("N", "n")]).unwrap();
    assert_eq!(forest.len(), 1);
    let tree = forest.into_iter().next().unwrap();
    assert_eq!(format!("{}", tree), "(v, n)");
}

#[test]
fn delta_freezes_to_the_nullability_set() {
    let parser = delta(&opt(&lit("x")));

    let mut cache = ParseCache::new();
    let compacted = cache.compact(&parser).unwrap();
    match &*compacted {
        Parser::Epsilon(trees) => {
            assert_eq!(trees.len(), 1);
            assert!(trees.contains(&ParseTree::Nil));
        }
        other => panic!("expected a frozen epsilon, found {}", other),
    }
}

#[test]
fn delta_freeze_is_idempotent_on_the_forest() {
    let parser = opt(&lit("x"));

    let mut cache = ParseCache::new();
    let null_set = cache.derive_null(&parser).unwrap();
    let frozen = eps(null_set.clone());
    let refrozen = cache.derive_null(&frozen).unwrap();
    assert_eq!(null_set, refrozen);
}

#[test]
fn compaction_preserves_the_language() {
    let parser = cat(&eps_tree(ParseTree::lexeme("v")), &lit("N"));

    let mut cache = ParseCache::new();
    let compacted = cache.compact(&parser).unwrap();

    let original = parse(&parser, vec![tok("N", "n")]).unwrap();
    let rewritten = parse(&compacted, vec![tok("N", "n")]).unwrap();
    assert_eq!(original, rewritten);

    let original_null = {
        let mut cache = ParseCache::new();
        cache.derive_null(&parser).unwrap()
    };
    let rewritten_null = {
        let mut cache = ParseCache::new();
        cache.derive_null(&compacted).unwrap()
    };
    assert_eq!(original_null, rewritten_null);
}

#[test]
fn empty_collapses_through_constructors() {
    use crate::parser::{alt, empty};

    assert!(eps(crate::Forest::new()).is_empty());
    assert!(cat(&empty(), &lit("a")).is_empty());
    assert!(cat(&lit("a"), &empty()).is_empty());
    assert!(red(&empty(), |tree| Ok(tree.clone())).is_empty());

    let terminal = lit("a");
    assert!(Rc::ptr_eq(&alt(&empty(), &terminal), &terminal));
    assert!(Rc::ptr_eq(&alt(&terminal, &empty()), &terminal));
}
