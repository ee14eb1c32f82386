use super::{LexRule, Lexicon, ScanState, TokenAction};
use crate::{Code, GrammarError, ITokenize, Log, ParseError, Token};
use once_cell::unsync::OnceCell;
use regex::bytes::Regex;
use std::collections::HashSet;
use std::rc::Rc;

impl TokenAction {
    /// A caller-supplied handler, the analogue of overriding a `handle_<KIND>` method.
    pub fn custom<F>(handler: F) -> Self
    where
        F: Fn(&str, &mut ScanState) -> Option<Token> + 'static,
    {
        TokenAction::Custom(Rc::new(handler))
    }
}

impl Lexicon {
    /// Compile a lexicon from a priority-ordered rule table and a keyword set.
    ///
    /// Rule kinds double as regex group names, so they must be unique identifiers; the
    /// table order is the match preference order (the compiled alternation prefers the
    /// leftmost matching branch).
    pub fn new(
        table: Vec<(&str, &str, TokenAction)>,
        keywords: &[&str],
    ) -> Result<Self, GrammarError> {
        if table.is_empty() {
            return Err(GrammarError::new(
                "EmptyLexicon",
                "A lexicon needs at least one rule.".into(),
            ));
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for (kind, _, _) in &table {
            if !seen.insert(*kind) {
                return Err(GrammarError::new(
                    "DuplicateRule",
                    format!("Lexicon rule '{}' is declared twice.", kind),
                ));
            }
        }
        let alternation = table
            .iter()
            .map(|(kind, pattern, _)| format!("(?P<{}>{})", kind, pattern))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation).map_err(|err| {
            GrammarError::new(
                "InvalidPattern",
                format!("Lexicon table does not compile: {}", err),
            )
        })?;
        // An empty match would pin the cursor in place forever.
        if pattern.is_match(b"") {
            return Err(GrammarError::new(
                "NullablePattern",
                "Lexicon patterns must not match the empty string.".into(),
            ));
        }
        let rules = table
            .into_iter()
            .map(|(kind, _, action)| LexRule {
                kind: Rc::from(kind),
                action,
            })
            .collect();
        Ok(Self {
            pattern,
            rules,
            keywords: keywords.iter().map(|k| Rc::from(*k)).collect(),
            log: OnceCell::new(),
        })
    }

    /// Set a log label to trace emitted tokens based on the level of [Log].
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.log
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    fn emit(
        &self,
        rule: &LexRule,
        lexeme: &str,
        state: &mut ScanState,
        match_end: usize,
    ) -> Option<Token> {
        match &rule.action {
            TokenAction::Emit => Some(Token::text(rule.kind.clone(), lexeme)),
            TokenAction::Symbol => Some(Token::symbol(lexeme)),
            TokenAction::Identifier => {
                if self.keywords.contains(lexeme) {
                    Some(Token::symbol(lexeme))
                } else {
                    Some(Token::text(rule.kind.clone(), lexeme))
                }
            }
            TokenAction::Number => match lexeme.parse::<i64>() {
                Ok(value) => Some(Token::int(rule.kind.clone(), value)),
                Err(_) => Some(Token::text(rule.kind.clone(), lexeme)),
            },
            TokenAction::Newline => {
                state.line += lexeme.bytes().filter(|b| *b == b'\n').count();
                state.line_start = match_end;
                Some(Token::text(rule.kind.clone(), lexeme))
            }
            TokenAction::Skip => None,
            TokenAction::Custom(handler) => handler.as_ref()(lexeme, state),
        }
    }
}

impl ITokenize for Lexicon {
    /// Step a match cursor across the input, dispatching each match to its rule's action.
    /// A gap before the next match is an unmatched character: a hard error carrying the
    /// byte offset with line and column in the message.
    fn tokenize(&self, code: &Code) -> Result<Vec<Token>, ParseError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut state = ScanState {
            line: 1,
            line_start: 0,
        };
        let mut pointer: usize = 0;

        #[cfg(debug_assertions)]
        let debug = self.log.get().map_or(Log::None, |log| *log);

        while pointer < code.value.len() {
            let captures = match self.pattern.captures(&code.value[pointer..]) {
                Some(captures) => captures,
                None => {
                    #[cfg(debug_assertions)]
                    debug.log_failure(pointer, code);
                    return Err(unmatched_error(code, pointer));
                }
            };
            let whole = match captures.get(0) {
                Some(whole) => whole,
                None => return Err(unmatched_error(code, pointer)),
            };
            if whole.start() != 0 {
                #[cfg(debug_assertions)]
                debug.log_failure(pointer, code);
                return Err(unmatched_error(code, pointer));
            }

            let matched = self
                .rules
                .iter()
                .find_map(|rule| captures.name(&rule.kind).map(|group| (rule, group)));
            let (rule, group) = match matched {
                Some(found) => found,
                None => return Err(unmatched_error(code, pointer)),
            };

            let lexeme = String::from_utf8_lossy(group.as_bytes()).into_owned();
            let match_end = pointer + whole.end();
            if let Some(token) = self.emit(rule, &lexeme, &mut state, match_end) {
                #[cfg(debug_assertions)]
                debug.log_token(&token, pointer, code);
                tokens.push(token);
            }
            pointer = match_end;
        }

        tokens.push(Token::end());
        Ok(tokens)
    }
}

fn unmatched_error(code: &Code, pointer: usize) -> ParseError {
    let character = code.value.get(pointer).map_or(' ', |b| *b as char);
    ParseError::new(
        pointer,
        format!(
            "Unable to match character '{}' at {}",
            character,
            code.obtain_position(pointer)
        ),
    )
}
