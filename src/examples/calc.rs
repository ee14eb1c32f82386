//! An arithmetic calculator: tokenizer, left-recursive grammar with AST-building
//! reductions, and an evaluator.
//!
//! The grammar is deliberately left-recursive (`sum ::= sum '+' product | ...`), which the
//! derivative engine parses directly; the reductions shape the forest into
//! `Add`/`Sub`/`Mul`/`Div` nodes so that `1+2+3` comes out left-associated as
//! `Add(Add(1, 2), 3)`.
use crate::ast::{AstNode, NodeClass, NodeVisitor};
use crate::lexer::{Lexicon, TokenAction};
use crate::parser::{lit, red, ParserExt, ParserRef};
use crate::{DefaultParser, Grammar, GrammarError, ParseError, ParseTree, TokenValue};
use std::rc::Rc;

/// The calculator's node classes: a `Compound(left, right)` base with one subclass per
/// operator.
pub struct CalcClasses {
    pub compound: Rc<NodeClass>,
    pub add: Rc<NodeClass>,
    pub sub: Rc<NodeClass>,
    pub mul: Rc<NodeClass>,
    pub div: Rc<NodeClass>,
}

impl CalcClasses {
    pub fn new() -> Result<Self, GrammarError> {
        let compound = NodeClass::define("Compound", &["left", "right"])?;
        Ok(Self {
            add: compound.subclass("Add", &[])?,
            sub: compound.subclass("Sub", &[])?,
            mul: compound.subclass("Mul", &[])?,
            div: compound.subclass("Div", &[])?,
            compound,
        })
    }
}

pub fn calc_lexicon() -> Result<Lexicon, GrammarError> {
    Lexicon::new(
        vec![
            ("NUMBER", r"\d+(\.\d*)?", TokenAction::Number),
            ("ID", r"[a-zA-Z_][a-zA-Z0-9_]*", TokenAction::Identifier),
            ("OP", r"[-+*/^%!~@.<>&|]", TokenAction::Symbol),
            ("PAREN", r"[()\[\]{}]", TokenAction::Symbol),
            ("NEWLINE", r"\n", TokenAction::Newline),
            ("FORMAT", r"[ \t]+", TokenAction::Skip),
        ],
        &[],
    )
}

// Builds `class(left, right)` from the three-part tree of `left OP right`.
fn emit_compound(class: Rc<NodeClass>) -> impl Fn(&ParseTree) -> Result<ParseTree, ParseError> {
    move |tree| {
        let parts = tree.unpack(3)?;
        let node = class.node(vec![parts[0].clone(), parts[2].clone()])?;
        Ok(ParseTree::Node(node))
    }
}

pub fn calc_grammar(classes: &CalcClasses) -> Result<Grammar, GrammarError> {
    let grammar = Grammar::new("Calc");
    let sum = grammar.rule("sum")?;
    let product = grammar.rule("product")?;
    let item = grammar.rule("item")?;

    let addition = red(
        &sum.cat(&lit("+")).cat(&product),
        emit_compound(classes.add.clone()),
    );
    let subtraction = red(
        &sum.cat(&lit("-")).cat(&product),
        emit_compound(classes.sub.clone()),
    );
    grammar.define("sum", product.alt(&addition).alt(&subtraction))?;

    let multiplication = red(
        &product.cat(&lit("*")).cat(&item),
        emit_compound(classes.mul.clone()),
    );
    let division = red(
        &product.cat(&lit("/")).cat(&item),
        emit_compound(classes.div.clone()),
    );
    grammar.define("product", item.alt(&multiplication).alt(&division))?;

    let negation = red(&lit("-").cat(&item), |tree| {
        let parts = tree.unpack(2)?;
        Ok(parts[1].clone())
    });
    let parenthesised = red(&lit("(").cat(&sum).cat(&lit(")")), |tree| {
        let parts = tree.unpack(3)?;
        Ok(parts[1].clone())
    });
    grammar.define("item", lit("NUMBER").alt(&negation).alt(&parenthesised))?;

    let equation = red(&sum.cat(&lit("ENDMARKER")), |tree| {
        let parts = tree.unpack(2)?;
        Ok(parts[0].clone())
    });
    grammar.define("equation", equation)?;

    grammar.freeze()?;
    Ok(grammar)
}

/// The ready-to-use calculator: lexicon plus the frozen grammar's `equation` root.
pub fn calc_parser() -> Result<(DefaultParser, CalcClasses), GrammarError> {
    let classes = CalcClasses::new()?;
    let grammar = calc_grammar(&classes)?;
    let lexicon = calc_lexicon()?;
    let root = root_rule(&grammar, "equation")?;
    Ok((DefaultParser::new(Rc::new(lexicon), root), classes))
}

fn root_rule(grammar: &Grammar, name: &str) -> Result<ParserRef, GrammarError> {
    grammar.get(name).ok_or_else(|| {
        GrammarError::new(
            "UnknownRule",
            format!("Grammar '{}' has no rule '{}'.", grammar.name(), name),
        )
    })
}

/// Evaluates a calculator AST: a [NodeVisitor] whose table maps each compound class to its
/// arithmetic operator, with scalar fields feeding a value stack.
pub struct EvalVisitor {
    eval_table: Vec<(&'static str, fn(f64, f64) -> f64)>,
    stack: Vec<f64>,
    error: Option<ParseError>,
}

impl EvalVisitor {
    pub fn new() -> Self {
        Self {
            eval_table: vec![
                ("Add", |left, right| left + right),
                ("Sub", |left, right| left - right),
                ("Mul", |left, right| left * right),
                ("Div", |left, right| left / right),
            ],
            stack: Vec::new(),
            error: None,
        }
    }

    /// Evaluate one parse tree down to a number. The visitor is reusable; each call starts
    /// from a clean stack.
    pub fn eval(&mut self, tree: &ParseTree) -> Result<f64, ParseError> {
        self.stack.clear();
        self.error = None;
        self.push_value(tree);
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        match self.stack.pop() {
            Some(result) if self.stack.is_empty() => Ok(result),
            _ => Err(ParseError::semantic(
                "evaluation left an unbalanced value stack".into(),
            )),
        }
    }

    // Scalar leaves push directly; nodes go through the visitor dispatch.
    fn push_value(&mut self, value: &ParseTree) {
        if self.error.is_some() {
            return;
        }
        match value {
            ParseTree::Lexeme(TokenValue::Int(number)) => self.stack.push(*number as f64),
            ParseTree::Lexeme(TokenValue::Str(text)) => match text.parse::<f64>() {
                Ok(number) => self.stack.push(number),
                Err(_) => self.fail(format!("'{}' is not a number", text)),
            },
            ParseTree::Node(node) => self.visit(node),
            other => self.fail(format!("cannot evaluate parse tree {}", other)),
        }
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(ParseError::semantic(message));
        }
    }
}

impl NodeVisitor for EvalVisitor {
    fn visit_named(&mut self, node: &Rc<AstNode>) -> bool {
        if self.error.is_some() {
            return true;
        }
        let operator = self
            .eval_table
            .iter()
            .find(|(class, _)| *class == node.class_name())
            .map(|(_, operator)| *operator);
        let operator = match operator {
            Some(operator) => operator,
            None => {
                self.fail(format!(
                    "no evaluation rule for '{}'",
                    node.class_name()
                ));
                return true;
            }
        };
        for field in ["left", "right"] {
            match node.get(field) {
                Some(value) => self.push_value(value),
                None => self.fail(format!(
                    "{} node has no '{}' field",
                    node.class_name(),
                    field
                )),
            }
        }
        if self.error.is_some() {
            return true;
        }
        if let (Some(right), Some(left)) = (self.stack.pop(), self.stack.pop()) {
            self.stack.push(operator(left, right));
        } else {
            self.fail("evaluation left an unbalanced value stack".into());
        }
        true
    }
}

/// Evaluate a calculator tree down to a number with a fresh [EvalVisitor].
pub fn eval(tree: &ParseTree) -> Result<f64, ParseError> {
    EvalVisitor::new().eval(tree)
}
