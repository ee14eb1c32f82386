//! Tokenizer utilities that turn input text into the [Token](crate::Token) stream the
//! derivative engine consumes.
//!
//! [Lexicon] covers most languages: a priority-ordered table of `(kind, pattern, action)`
//! rules compiled into a single alternation regex with named groups. Each match dispatches
//! on the matching group to its [TokenAction], which either yields a token or skips the
//! text (formatting, comments); an unmatched character is a hard error pointing into the
//! source. The stream always terminates with the `ENDMARKER` sentinel.
//!
//! [StackTokenizer] is the explicit state-machine variant for syntaxes a flat table cannot
//! express: a priority list of [SubScanner]s, where the active scan consumes bytes while
//! [Running](ScanStatus::Running) and finishes either [Handled](ScanStatus::Handled)
//! (byte consumed, tokens emitted) or [Unhandled](ScanStatus::Unhandled) (the byte does not
//! belong to it; control pops back and the byte is retried against the scanner table).
//! Both tokenizers implement [ITokenize](crate::ITokenize).
mod lexicon;
mod stack;

#[cfg(test)]
mod __tests__;

use crate::{Log, Token};
use once_cell::unsync::OnceCell;
use regex::bytes::Regex;
use std::collections::HashSet;
use std::rc::Rc;

/// A regex-table tokenizer: one compiled alternation, one named group per rule, a keyword
/// set for identifier promotion.
pub struct Lexicon {
    pattern: Regex,
    rules: Vec<LexRule>,
    keywords: HashSet<Rc<str>>,
    log: OnceCell<Log<&'static str>>,
}

pub(crate) struct LexRule {
    pub(crate) kind: Rc<str>,
    pub(crate) action: TokenAction,
}

/// What to do with the text a lexicon rule matched.
pub enum TokenAction {
    /// Emit `Token(kind, lexeme)`.
    Emit,
    /// Emit `Token(lexeme, lexeme)`: operators and parens become their own kind, so
    /// grammars write `lit("+")` directly.
    Symbol,
    /// Emit an identifier, unless the lexeme is in the keyword set — keywords are emitted
    /// with their own kind equal to the keyword text.
    Identifier,
    /// Evaluate an integer literal into `TokenValue::Int` (falling back to the raw lexeme
    /// for non-integer numerics).
    Number,
    /// Track the line count and emit `Token(kind, lexeme)`.
    Newline,
    /// Yield nothing: formatting and comments.
    Skip,
    /// A caller-supplied handler; returning `None` skips the match.
    Custom(Rc<dyn Fn(&str, &mut ScanState) -> Option<Token>>),
}

/// Mutable tokenization context handed to [Newline](TokenAction::Newline) accounting and
/// [Custom](TokenAction::Custom) handlers.
pub struct ScanState {
    pub line: usize,
    pub line_start: usize,
}

/// The state of one sub-scanner run inside a [StackTokenizer].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// Keep feeding bytes.
    Running,
    /// The byte was consumed and the run is complete; collect its tokens.
    Handled,
    /// The byte does not belong to this run; the run is complete and the byte is retried.
    Unhandled,
}

/// A factory in a [StackTokenizer]'s priority table.
pub trait SubScanner {
    /// Whether this scanner wants to start a run on the given byte.
    fn should_enter(&self, byte: u8) -> bool;
    /// Begin a fresh run; the entry byte is fed first.
    fn begin(&self) -> Box<dyn ScanRun>;
}

/// One in-flight sub-scanner run.
pub trait ScanRun {
    fn feed(&mut self, byte: u8) -> ScanStatus;
    /// Input exhausted while still running; `Err` carries an "unterminated" message.
    fn end(&mut self) -> Result<(), String>;
    /// The tokens this run produced; called once, after the run completed.
    fn tokens(&mut self) -> Vec<Token>;
}

/// The state-machine tokenizer: a priority list of sub-scanners driven over the input.
pub struct StackTokenizer {
    scanners: Vec<Rc<dyn SubScanner>>,
    log: OnceCell<Log<&'static str>>,
}

/// Consumes identifiers, promoting keyword lexemes to their own token kind.
pub struct IdentScanner {
    kind: Rc<str>,
    keywords: Rc<HashSet<Rc<str>>>,
}

/// Consumes an integer literal into a `NUMBER`-style token.
pub struct DigitsScanner {
    kind: Rc<str>,
}

/// Consumes one delimited literal (e.g. a quoted string); the payload excludes the
/// delimiters. Unterminated literals fail at end of input.
pub struct QuotedScanner {
    kind: Rc<str>,
    delimiter: u8,
}

/// Consumes one byte from a symbol set, emitting it as its own kind.
pub struct SymbolScanner {
    symbols: Vec<u8>,
}

/// Consumes formatting bytes (spaces, tabs) and emits nothing.
pub struct SpacingScanner;

/// Consumes a line comment introduced by a marker byte, up to the line break.
pub struct CommentScanner {
    marker: u8,
}
