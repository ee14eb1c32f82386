use crate::lexer::{
    CommentScanner, DigitsScanner, IdentScanner, Lexicon, QuotedScanner, SpacingScanner,
    StackTokenizer, SubScanner, SymbolScanner, TokenAction,
};
use crate::{Code, ITokenize, Token, TokenValue};
use std::rc::Rc;

fn sample_lexicon() -> Lexicon {
    Lexicon::new(
        vec![
            ("NUMBER", r"\d+(\.\d*)?", TokenAction::Number),
            ("ID", r"[a-zA-Z_][a-zA-Z0-9_]*", TokenAction::Identifier),
            ("OP", r"[-+*/=<>]", TokenAction::Symbol),
            ("PAREN", r"[()\[\]{}]", TokenAction::Symbol),
            ("NEWLINE", r"\n", TokenAction::Newline),
            ("FORMAT", r"[ \t]+", TokenAction::Skip),
        ],
        &["let", "if"],
    )
    .unwrap()
}

fn kinds(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(|token| token.kind.to_string()).collect()
}

#[test]
fn table_order_tokenizes_and_skips_formatting() {
    let lexicon = sample_lexicon();
    let tokens = lexicon.tokenize(&Code::from("x = 12 + y")).unwrap();
    assert_eq!(kinds(&tokens), vec!["ID", "=", "NUMBER", "+", "ID", "ENDMARKER"]);
}

#[test]
fn keywords_are_promoted_to_their_own_kind() {
    let lexicon = sample_lexicon();
    let tokens = lexicon.tokenize(&Code::from("let x")).unwrap();
    assert_eq!(kinds(&tokens), vec!["let", "ID", "ENDMARKER"]);
    assert_eq!(tokens[0].value, TokenValue::Str(Rc::from("let")));
}

#[test]
fn integer_literals_are_evaluated() {
    let lexicon = sample_lexicon();
    let tokens = lexicon.tokenize(&Code::from("42")).unwrap();
    assert_eq!(tokens[0].value, TokenValue::Int(42));
    // Non-integer numerics keep their lexeme.
    let tokens = lexicon.tokenize(&Code::from("4.5")).unwrap();
    assert_eq!(tokens[0].value, TokenValue::Str(Rc::from("4.5")));
}

#[test]
fn the_stream_ends_with_the_sentinel() {
    let lexicon = sample_lexicon();
    let tokens = lexicon.tokenize(&Code::from("x")).unwrap();
    assert!(tokens.last().unwrap().is_end());

    let tokens = lexicon.tokenize(&Code::from("")).unwrap();
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_end());
}

#[test]
fn unmatched_characters_fail_with_a_source_pointer() {
    let lexicon = sample_lexicon();
    let err = lexicon.tokenize(&Code::from("x = $")).unwrap_err();
    assert_eq!(err.pointer, 4);
    assert!(err.message.contains("'$'"));
    assert!(err.message.contains("line"));
}

#[test]
fn error_positions_account_for_line_breaks() {
    let lexicon = sample_lexicon();
    let err = lexicon.tokenize(&Code::from("x\ny $")).unwrap_err();
    assert_eq!(err.pointer, 4);
    let position = Code::from("x\ny $").obtain_position(err.pointer);
    assert_eq!((position.line, position.column), (2, 3));
}

#[test]
fn newline_tokens_are_emitted() {
    let lexicon = sample_lexicon();
    let tokens = lexicon.tokenize(&Code::from("x\ny")).unwrap();
    assert_eq!(kinds(&tokens), vec!["ID", "NEWLINE", "ID", "ENDMARKER"]);
}

#[test]
fn custom_handlers_reshape_tokens() {
    let lexicon = Lexicon::new(
        vec![
            (
                "STRING",
                r#"'[^']*'"#,
                TokenAction::custom(|lexeme, _| {
                    Some(Token::text("STRING", &lexeme[1..lexeme.len() - 1]))
                }),
            ),
            ("FORMAT", r"\s+", TokenAction::Skip),
        ],
        &[],
    )
    .unwrap();

    let tokens = lexicon.tokenize(&Code::from("'hi' 'there'")).unwrap();
    assert_eq!(tokens[0].value, TokenValue::Str(Rc::from("hi")));
    assert_eq!(tokens[1].value, TokenValue::Str(Rc::from("there")));
}

#[test]
fn duplicate_lexicon_rules_are_rejected() {
    let result = Lexicon::new(
        vec![
            ("ID", r"[a-z]+", TokenAction::Emit),
            ("ID", r"[A-Z]+", TokenAction::Emit),
        ],
        &[],
    );
    assert!(result.is_err());
}

fn sample_stack() -> StackTokenizer {
    let scanners: Vec<Rc<dyn SubScanner>> = vec![
        Rc::new(SpacingScanner),
        Rc::new(CommentScanner::new(b'#')),
        Rc::new(IdentScanner::new("ID", &["let"])),
        Rc::new(DigitsScanner::new("NUMBER")),
        Rc::new(QuotedScanner::new("LIT", b'\'')),
        Rc::new(SymbolScanner::new("+-*/=()")),
    ];
    StackTokenizer::new(scanners)
}

#[test]
fn stack_tokenizer_walks_the_scanner_table() {
    let tokens = sample_stack()
        .tokenize(&Code::from("let x = 'hi' + 42"))
        .unwrap();
    assert_eq!(
        kinds(&tokens),
        vec!["let", "ID", "=", "LIT", "+", "NUMBER", "ENDMARKER"]
    );
    assert_eq!(tokens[5].value, TokenValue::Int(42));
}

#[test]
fn stack_tokenizer_finishes_open_runs_at_end_of_input() {
    // The identifier run is still `running` when input ends; it must flush its token.
    let tokens = sample_stack().tokenize(&Code::from("abc")).unwrap();
    assert_eq!(kinds(&tokens), vec!["ID", "ENDMARKER"]);
}

#[test]
fn stack_tokenizer_rejects_unterminated_literals() {
    let err = sample_stack().tokenize(&Code::from("'open")).unwrap_err();
    assert!(err.message.contains("Unterminated"));
}

#[test]
fn stack_tokenizer_skips_comments_to_the_line_break() {
    let tokens = sample_stack()
        .tokenize(&Code::from("x # all of this goes\ny"))
        .unwrap();
    assert_eq!(kinds(&tokens), vec!["ID", "ID", "ENDMARKER"]);
}

#[test]
fn stack_tokenizer_fails_on_foreign_bytes() {
    let err = sample_stack().tokenize(&Code::from("x ?")).unwrap_err();
    assert_eq!(err.pointer, 2);
}
