use crate::parser::ParserRef;
use crate::{Code, DefaultParser, Forest, ITokenize, Log, ParseCache, ParseError, Token};
use once_cell::unsync::OnceCell;
use std::rc::Rc;

/// Run the derivative loop: for each token, replace the parser with the compacted
/// derivative; stop early once it is the empty language (its nullability is empty, so the
/// result is unaffected); finally return the nullability set of the last parser — the
/// complete forest of derivations for the input.
///
/// A rejected input is not an error: the forest is simply empty. An `Err` only reports a
/// semantic action rejecting a tree.
pub fn parse(
    root: &ParserRef,
    tokens: impl IntoIterator<Item = Token>,
) -> Result<Forest, ParseError> {
    let mut cache = ParseCache::new();
    parse_with(&mut cache, root, tokens)
}

/// [parse] against a caller-held [ParseCache], so harnesses can measure cache residency
/// between steps. The cache is cleared on entry and exit either way.
pub fn parse_with(
    cache: &mut ParseCache,
    root: &ParserRef,
    tokens: impl IntoIterator<Item = Token>,
) -> Result<Forest, ParseError> {
    cache.clear();
    let mut parser = root.clone();
    for token in tokens {
        cache.begin_step();
        let derived = cache.derive(&parser, &token);
        parser = match cache.compact(&derived) {
            Ok(compacted) => compacted,
            Err(err) => {
                cache.clear();
                return Err(err);
            }
        };
        if parser.is_empty() {
            break;
        }
    }
    let result = cache.derive_null(&parser);
    cache.clear();
    result
}

impl DefaultParser {
    pub fn new(lexicon: Rc<dyn ITokenize>, root: ParserRef) -> Self {
        Self {
            lexicon,
            root,
            debug: OnceCell::new(),
        }
    }

    /// Set a log label to trace the per-token derivative loop based on the level of [Log].
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.debug
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    pub fn tokenize(&self, text: &[u8]) -> Result<Vec<Token>, ParseError> {
        self.lexicon.tokenize(&Code::new(text))
    }

    /// Tokenize and parse in one call.
    pub fn parse(&self, text: &[u8]) -> Result<Forest, ParseError> {
        let tokens = self.tokenize(text)?;
        self.parse_tokens(tokens)
    }

    /// Run the derivative loop over an already tokenized stream.
    pub fn parse_tokens(&self, tokens: Vec<Token>) -> Result<Forest, ParseError> {
        let mut cache = ParseCache::new();
        let mut parser = self.root.clone();

        #[cfg(debug_assertions)]
        let debug = self.debug.get().map_or(Log::None, |log| *log);

        for (_index, token) in tokens.iter().enumerate() {
            cache.begin_step();
            let derived = cache.derive(&parser, token);
            parser = match cache.compact(&derived) {
                Ok(compacted) => compacted,
                Err(err) => {
                    cache.clear();
                    return Err(err);
                }
            };

            #[cfg(debug_assertions)]
            if debug.order() >= Log::Verbose(()).order() {
                let (derivatives, null_sets, compactions) = cache.residency();
                println!(
                    "[{}; Derivative]: token {} ('{}') caches {}/{}/{}",
                    debug, _index, token.kind, derivatives, null_sets, compactions
                );
            }

            if parser.is_empty() {
                #[cfg(debug_assertions)]
                if debug.order() >= Log::Default(()).order() {
                    println!(
                        "[{}; EmptyLanguage]: no derivation past token {} ('{}')",
                        debug, _index, token.kind
                    );
                }
                break;
            }
        }
        let result = cache.derive_null(&parser);
        cache.clear();
        result
    }
}
