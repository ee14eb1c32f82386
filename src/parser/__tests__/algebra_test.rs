use crate::parser::{alt, cat, lit, rec, red, star, ParserExt};
use crate::{parse, parse_with, ParseCache, Token};

fn tok(kind: &str, value: &str) -> Token {
    Token::text(kind, value)
}

#[test]
fn kleene_star_folds_into_a_tuple() {
    let root = red(&star(&lit("1")).cat(&lit("ENDMARKER")), |tree| {
        let parts = tree.unpack(2)?;
        Ok(parts[0].clone())
    });
    let tokens = vec![tok("1", "a"), tok("1", "b"), tok("1", "c"), Token::end()];

    let forest = parse(&root, tokens).unwrap();
    assert_eq!(forest.len(), 1);
    let tree = forest.into_iter().next().unwrap();
    assert_eq!(format!("{}", tree), "(a, b, c)");
}

#[test]
fn star_accepts_the_empty_input() {
    let root = star(&lit("1"));
    let forest = parse(&root, Vec::new()).unwrap();
    assert_eq!(forest.len(), 1);
    let tree = forest.into_iter().next().unwrap();
    assert_eq!(format!("{}", tree), "()");
}

#[test]
fn left_recursive_rule_associates_left() {
    // E ::= E '+' N | N
    let number = lit("NUMBER");
    let expression = rec();
    let addition = expression.cat(&lit("+")).cat(&number);
    expression.define(alt(&number, &addition)).unwrap();

    let tokens = vec![
        tok("NUMBER", "1"),
        Token::symbol("+"),
        tok("NUMBER", "2"),
        Token::symbol("+"),
        tok("NUMBER", "3"),
    ];
    let forest = parse(&expression, tokens).unwrap();
    assert_eq!(forest.len(), 1);
    let tree = forest.into_iter().next().unwrap();
    assert_eq!(format!("{}", tree), "((((1, +), 2), +), 3)");
}

#[test]
fn ambiguous_grammar_yields_catalan_forest() {
    // S ::= S S | 'a'; "aaa" admits C₂ = 2 derivations.
    let s = rec();
    s.define(cat(&s, &s).alt(&lit("a"))).unwrap();

    let tokens = vec![tok("a", "a"), tok("a", "a"), tok("a", "a")];
    let forest = parse(&s, tokens).unwrap();
    assert_eq!(forest.len(), 2);
}

#[test]
fn empty_language_short_circuits() {
    let root = lit("a");
    let forest = parse(&root, vec![tok("b", "b")]).unwrap();
    assert!(forest.is_empty());
}

#[test]
fn rejection_is_an_empty_forest_not_an_error() {
    let root = cat(&lit("a"), &lit("b"));
    let forest = parse(&root, vec![tok("a", "a"), tok("a", "a")]).unwrap();
    assert!(forest.is_empty());
}

#[test]
fn parse_is_deterministic_across_repeated_runs() {
    let s = rec();
    s.define(cat(&s, &s).alt(&lit("a"))).unwrap();
    let tokens = vec![tok("a", "a"), tok("a", "a"), tok("a", "a")];

    let first = parse(&s, tokens.clone()).unwrap();
    let second = parse(&s, tokens).unwrap();
    assert_eq!(first, second);
}

#[test]
fn caches_release_after_a_parse() {
    let s = rec();
    s.define(cat(&s, &s).alt(&lit("a"))).unwrap();
    let tokens = vec![tok("a", "a"), tok("a", "a")];

    let mut cache = ParseCache::new();
    let forest = parse_with(&mut cache, &s, tokens).unwrap();
    assert_eq!(forest.len(), 1);
    assert_eq!(cache.residency(), (0, 0, 0));
}

#[test]
fn manual_stepping_exposes_cache_residency() {
    let s = rec();
    s.define(cat(&s, &s).alt(&lit("a"))).unwrap();

    let mut cache = ParseCache::new();
    let derived = cache.derive(&s, &tok("a", "a"));
    let compacted = cache.compact(&derived).unwrap();
    assert!(!compacted.is_empty());

    let (derivatives, _, compactions) = cache.residency();
    assert!(derivatives > 0);
    assert!(compactions > 0);
}

#[test]
fn semantic_action_failure_propagates() {
    let failing = red(&lit("a"), |_| {
        Err(crate::ParseError::semantic("rejected by the action".into()))
    });
    let err = parse(&failing, vec![tok("a", "a")]).unwrap_err();
    assert!(err.message.contains("rejected by the action"));
}

#[test]
fn opt_contributes_the_nil_tree() {
    use crate::parser::opt;
    use crate::ParseTree;

    let root = opt(&lit("x"));
    let forest = parse(&root, Vec::new()).unwrap();
    assert_eq!(forest.len(), 1);
    assert!(forest.contains(&ParseTree::Nil));
}

#[test]
fn plus_requires_at_least_one_match() {
    use crate::parser::plus;

    let root = plus(&lit("1"));
    assert!(parse(&root, Vec::new()).unwrap().is_empty());

    let forest = parse(&root, vec![tok("1", "a")]).unwrap();
    assert_eq!(forest.len(), 1);
    let tree = forest.into_iter().next().unwrap();
    assert_eq!(format!("{}", tree), "(a)");
}

#[test]
fn duplicate_derivations_coalesce() {
    // Both branches derive 'a' to the same epsilon tree; the forest is still one tree.
    let root = alt(&lit("a"), &lit("a"));
    let forest = parse(&root, vec![tok("a", "a")]).unwrap();
    assert_eq!(forest.len(), 1);
}
