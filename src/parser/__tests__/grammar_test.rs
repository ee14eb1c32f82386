use crate::parser::{alt, cat, lit, ParserExt};
use crate::{parse, Grammar, Token};

fn tok(kind: &str, value: &str) -> Token {
    Token::text(kind, value)
}

#[test]
fn freeze_rejects_an_undefined_rule_by_name() {
    let grammar = Grammar::new("G");
    grammar.rule("a").unwrap();

    let err = grammar.freeze().unwrap_err();
    let message = format!("{}", err);
    assert!(message.contains("'a'"), "error should name the rule: {}", message);
    assert!(!grammar.is_frozen());
}

#[test]
fn defining_a_rule_twice_fails() {
    let grammar = Grammar::new("G");
    grammar.rule("a").unwrap();
    grammar.define("a", lit("X")).unwrap();
    assert!(grammar.define("a", lit("Y")).is_err());
}

#[test]
fn directly_assigned_rules_reject_reassignment() {
    let grammar = Grammar::new("G");
    grammar.define("a", lit("X")).unwrap();
    assert!(grammar.define("a", lit("Y")).is_err());
}

#[test]
fn frozen_grammar_rejects_writes_and_unknown_reads() {
    let grammar = Grammar::new("G");
    grammar.define("a", lit("X")).unwrap();
    grammar.freeze().unwrap();

    assert!(grammar.define("b", lit("Y")).is_err());
    assert!(grammar.rule("b").is_err());
    // Known rules stay readable.
    assert!(grammar.rule("a").is_ok());
}

#[test]
fn forward_reference_parses_after_definition() {
    let grammar = Grammar::new("G");
    // Use before definition.
    let body = grammar.rule("item").unwrap().cat(&lit("!"));
    grammar.define("main", body).unwrap();
    grammar.define("item", lit("ID")).unwrap();
    grammar.freeze().unwrap();

    let main = grammar.get("main").unwrap();
    let forest = parse(&main, vec![tok("ID", "x"), Token::symbol("!")]).unwrap();
    assert_eq!(forest.len(), 1);
}

#[test]
fn mutually_recursive_rules_parse() {
    // a ::= 'x' b | 'x' ; b ::= 'y' a
    let grammar = Grammar::new("G");
    let a = grammar.rule("a").unwrap();
    let b = grammar.rule("b").unwrap();
    grammar
        .define("a", alt(&cat(&lit("x"), &b), &lit("x")))
        .unwrap();
    grammar.define("b", cat(&lit("y"), &a)).unwrap();
    grammar.freeze().unwrap();

    let tokens = vec![
        tok("x", "x"),
        tok("y", "y"),
        tok("x", "x"),
        tok("y", "y"),
        tok("x", "x"),
    ];
    let forest = parse(&a, tokens).unwrap();
    assert_eq!(forest.len(), 1);
}

#[test]
fn rule_reads_hand_back_the_same_recurrence() {
    let grammar = Grammar::new("G");
    let first = grammar.rule("a").unwrap();
    let second = grammar.rule("a").unwrap();
    assert!(std::rc::Rc::ptr_eq(&first, &second));
}
