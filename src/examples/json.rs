//! A JSON reader built on the derivative engine: scalar values stay lexemes, while
//! objects, members, and arrays become AST nodes.
use crate::ast::NodeClass;
use crate::lexer::{Lexicon, TokenAction};
use crate::parser::{lit, opt, red, ParserExt, ParserRef};
use crate::{DefaultParser, Grammar, GrammarError, ParseError, ParseTree, Token};
use std::rc::Rc;

pub struct JsonClasses {
    pub object: Rc<NodeClass>,
    pub member: Rc<NodeClass>,
    pub array: Rc<NodeClass>,
}

impl JsonClasses {
    pub fn new() -> Result<Self, GrammarError> {
        Ok(Self {
            object: NodeClass::define("Object", &["members"])?,
            member: NodeClass::define("Member", &["key", "value"])?,
            array: NodeClass::define("Array", &["items"])?,
        })
    }
}

pub fn json_lexicon() -> Result<Lexicon, GrammarError> {
    Lexicon::new(
        vec![
            (
                "STRING",
                r#""([^"\\\r\n]|\\.)*""#,
                // Strip the surrounding quotes so the forest carries the payload.
                TokenAction::custom(|lexeme, _| {
                    Some(Token::text("STRING", &lexeme[1..lexeme.len() - 1]))
                }),
            ),
            ("NUMBER", r"-?\d+(\.\d+)?([eE][+-]?\d+)?", TokenAction::Number),
            ("CONSTANT", r"true|false|null", TokenAction::Symbol),
            ("PUNCT", r"[{}\[\]:,]", TokenAction::Symbol),
            ("SPACE", r"\s+", TokenAction::Skip),
        ],
        &[],
    )
}

// `item (sep item)*`, flattened into a single tuple in source order.
fn separated(item: &ParserRef, separator: &str) -> ParserRef {
    let tail_item = red(&lit(separator).cat(item), |tree| {
        let parts = tree.unpack(2)?;
        Ok(parts[1].clone())
    });
    red(&item.cat(&tail_item.star()), |tree| {
        let parts = tree.unpack(2)?;
        let tail = parts[1].as_tuple().ok_or_else(|| {
            ParseError::semantic("separated list tail is not a tuple".into())
        })?;
        let mut items = Vec::with_capacity(tail.len() + 1);
        items.push(parts[0].clone());
        items.extend(tail.iter().cloned());
        Ok(ParseTree::tuple(items))
    })
}

// The tree of an optional list: `Nil` when absent, the tuple when present.
fn list_or_empty(tree: &ParseTree) -> ParseTree {
    match tree {
        ParseTree::Nil => ParseTree::empty_tuple(),
        other => other.clone(),
    }
}

fn emit_wrapped(class: Rc<NodeClass>) -> impl Fn(&ParseTree) -> Result<ParseTree, ParseError> {
    move |tree| {
        let parts = tree.unpack(3)?;
        let node = class.node(vec![list_or_empty(&parts[1])])?;
        Ok(ParseTree::Node(node))
    }
}

pub fn json_grammar(classes: &JsonClasses) -> Result<Grammar, GrammarError> {
    let grammar = Grammar::new("JSON");
    let value = grammar.rule("value")?;

    let member_class = classes.member.clone();
    let member = red(&lit("STRING").cat(&lit(":")).cat(&value), move |tree| {
        let parts = tree.unpack(3)?;
        let node = member_class.node(vec![parts[0].clone(), parts[2].clone()])?;
        Ok(ParseTree::Node(node))
    });

    let object = red(
        &lit("{").cat(&opt(&separated(&member, ","))).cat(&lit("}")),
        emit_wrapped(classes.object.clone()),
    );
    let array = red(
        &lit("[").cat(&opt(&separated(&value, ","))).cat(&lit("]")),
        emit_wrapped(classes.array.clone()),
    );

    let scalar = lit("STRING")
        .alt(&lit("NUMBER"))
        .alt(&lit("true"))
        .alt(&lit("false"))
        .alt(&lit("null"));
    grammar.define("value", object.alt(&array).alt(&scalar))?;

    let document = red(&value.cat(&lit("ENDMARKER")), |tree| {
        let parts = tree.unpack(2)?;
        Ok(parts[0].clone())
    });
    grammar.define("document", document)?;

    grammar.freeze()?;
    Ok(grammar)
}

/// The ready-to-use JSON reader rooted at `document`.
pub fn json_parser() -> Result<(DefaultParser, JsonClasses), GrammarError> {
    let classes = JsonClasses::new()?;
    let grammar = json_grammar(&classes)?;
    let lexicon = json_lexicon()?;
    let root = grammar.get("document").ok_or_else(|| {
        GrammarError::new(
            "UnknownRule",
            format!("Grammar '{}' has no rule 'document'.", grammar.name()),
        )
    })?;
    Ok((DefaultParser::new(Rc::new(lexicon), root), classes))
}
