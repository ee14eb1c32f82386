use super::{
    CommentScanner, DigitsScanner, IdentScanner, QuotedScanner, ScanRun, ScanStatus,
    SpacingScanner, StackTokenizer, SubScanner, SymbolScanner,
};
use crate::{Code, ITokenize, Log, ParseError, Token};
use once_cell::unsync::OnceCell;
use std::collections::HashSet;
use std::rc::Rc;

impl StackTokenizer {
    /// Build the tokenizer from a priority-ordered scanner table: on each input position
    /// the first scanner whose [should_enter](SubScanner::should_enter) accepts the byte
    /// takes control.
    pub fn new(scanners: Vec<Rc<dyn SubScanner>>) -> Self {
        Self {
            scanners,
            log: OnceCell::new(),
        }
    }

    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.log
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }
}

impl ITokenize for StackTokenizer {
    fn tokenize(&self, code: &Code) -> Result<Vec<Token>, ParseError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut pointer: usize = 0;

        #[cfg(debug_assertions)]
        let debug = self.log.get().map_or(Log::None, |log| *log);

        'input: while pointer < code.value.len() {
            let entry_byte = code.value[pointer];
            let scanner = self
                .scanners
                .iter()
                .find(|scanner| scanner.should_enter(entry_byte));
            let scanner = match scanner {
                Some(scanner) => scanner,
                None => {
                    #[cfg(debug_assertions)]
                    debug.log_failure(pointer, code);
                    return Err(unmatched_error(code, pointer));
                }
            };

            let mut run = scanner.begin();
            let mut consumed: usize = 0;
            loop {
                if pointer >= code.value.len() {
                    // Input exhausted while the run is still open.
                    if let Err(message) = run.end() {
                        return Err(ParseError::new(
                            pointer,
                            format!("{} at {}", message, code.obtain_position(pointer)),
                        ));
                    }
                    for token in run.tokens() {
                        #[cfg(debug_assertions)]
                        debug.log_token(&token, pointer, code);
                        tokens.push(token);
                    }
                    break 'input;
                }
                match run.feed(code.value[pointer]) {
                    ScanStatus::Running => {
                        pointer += 1;
                        consumed += 1;
                    }
                    ScanStatus::Handled => {
                        pointer += 1;
                        for token in run.tokens() {
                            #[cfg(debug_assertions)]
                            debug.log_token(&token, pointer, code);
                            tokens.push(token);
                        }
                        break;
                    }
                    ScanStatus::Unhandled => {
                        if consumed == 0 {
                            // The scanner rejected its own entry byte; without this guard
                            // the same scanner would be selected again forever.
                            return Err(unmatched_error(code, pointer));
                        }
                        for token in run.tokens() {
                            #[cfg(debug_assertions)]
                            debug.log_token(&token, pointer, code);
                            tokens.push(token);
                        }
                        break;
                    }
                }
            }
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

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_ident_part(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

impl IdentScanner {
    pub fn new(kind: &str, keywords: &[&str]) -> Self {
        Self {
            kind: Rc::from(kind),
            keywords: Rc::new(keywords.iter().map(|k| Rc::from(*k)).collect()),
        }
    }
}

struct IdentRun {
    kind: Rc<str>,
    keywords: Rc<HashSet<Rc<str>>>,
    text: String,
}

impl SubScanner for IdentScanner {
    fn should_enter(&self, byte: u8) -> bool {
        is_ident_start(byte)
    }

    fn begin(&self) -> Box<dyn ScanRun> {
        Box::new(IdentRun {
            kind: self.kind.clone(),
            keywords: self.keywords.clone(),
            text: String::new(),
        })
    }
}

impl ScanRun for IdentRun {
    fn feed(&mut self, byte: u8) -> ScanStatus {
        if is_ident_part(byte) {
            self.text.push(byte as char);
            ScanStatus::Running
        } else {
            ScanStatus::Unhandled
        }
    }

    fn end(&mut self) -> Result<(), String> {
        Ok(())
    }

    fn tokens(&mut self) -> Vec<Token> {
        if self.keywords.contains(self.text.as_str()) {
            vec![Token::symbol(&self.text)]
        } else {
            vec![Token::text(self.kind.clone(), self.text.as_str())]
        }
    }
}

impl DigitsScanner {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: Rc::from(kind),
        }
    }
}

struct DigitsRun {
    kind: Rc<str>,
    text: String,
}

impl SubScanner for DigitsScanner {
    fn should_enter(&self, byte: u8) -> bool {
        byte.is_ascii_digit()
    }

    fn begin(&self) -> Box<dyn ScanRun> {
        Box::new(DigitsRun {
            kind: self.kind.clone(),
            text: String::new(),
        })
    }
}

impl ScanRun for DigitsRun {
    fn feed(&mut self, byte: u8) -> ScanStatus {
        if byte.is_ascii_digit() {
            self.text.push(byte as char);
            ScanStatus::Running
        } else {
            ScanStatus::Unhandled
        }
    }

    fn end(&mut self) -> Result<(), String> {
        Ok(())
    }

    fn tokens(&mut self) -> Vec<Token> {
        match self.text.parse::<i64>() {
            Ok(value) => vec![Token::int(self.kind.clone(), value)],
            Err(_) => vec![Token::text(self.kind.clone(), self.text.as_str())],
        }
    }
}

impl QuotedScanner {
    pub fn new(kind: &str, delimiter: u8) -> Self {
        Self {
            kind: Rc::from(kind),
            delimiter,
        }
    }
}

struct QuotedRun {
    kind: Rc<str>,
    delimiter: u8,
    text: String,
    opened: bool,
    closed: bool,
}

impl SubScanner for QuotedScanner {
    fn should_enter(&self, byte: u8) -> bool {
        byte == self.delimiter
    }

    fn begin(&self) -> Box<dyn ScanRun> {
        Box::new(QuotedRun {
            kind: self.kind.clone(),
            delimiter: self.delimiter,
            text: String::new(),
            opened: false,
            closed: false,
        })
    }
}

impl ScanRun for QuotedRun {
    fn feed(&mut self, byte: u8) -> ScanStatus {
        if !self.opened {
            self.opened = true;
            return ScanStatus::Running;
        }
        if byte == self.delimiter {
            self.closed = true;
            ScanStatus::Handled
        } else {
            self.text.push(byte as char);
            ScanStatus::Running
        }
    }

    fn end(&mut self) -> Result<(), String> {
        if self.closed {
            Ok(())
        } else {
            Err(format!("Unterminated '{}' literal", self.kind))
        }
    }

    fn tokens(&mut self) -> Vec<Token> {
        vec![Token::text(self.kind.clone(), self.text.as_str())]
    }
}

impl SymbolScanner {
    pub fn new(symbols: &str) -> Self {
        Self {
            symbols: symbols.bytes().collect(),
        }
    }
}

struct SymbolRun {
    symbol: Option<u8>,
}

impl SubScanner for SymbolScanner {
    fn should_enter(&self, byte: u8) -> bool {
        self.symbols.contains(&byte)
    }

    fn begin(&self) -> Box<dyn ScanRun> {
        Box::new(SymbolRun { symbol: None })
    }
}

impl ScanRun for SymbolRun {
    fn feed(&mut self, byte: u8) -> ScanStatus {
        self.symbol = Some(byte);
        ScanStatus::Handled
    }

    fn end(&mut self) -> Result<(), String> {
        Ok(())
    }

    fn tokens(&mut self) -> Vec<Token> {
        match self.symbol.take() {
            Some(byte) => vec![Token::symbol(&(byte as char).to_string())],
            None => Vec::new(),
        }
    }
}

struct SpacingRun;

impl SubScanner for SpacingScanner {
    fn should_enter(&self, byte: u8) -> bool {
        byte == b' ' || byte == b'\t' || byte == b'\r' || byte == b'\n'
    }

    fn begin(&self) -> Box<dyn ScanRun> {
        Box::new(SpacingRun)
    }
}

impl ScanRun for SpacingRun {
    fn feed(&mut self, byte: u8) -> ScanStatus {
        if byte == b' ' || byte == b'\t' || byte == b'\r' || byte == b'\n' {
            ScanStatus::Running
        } else {
            ScanStatus::Unhandled
        }
    }

    fn end(&mut self) -> Result<(), String> {
        Ok(())
    }

    fn tokens(&mut self) -> Vec<Token> {
        Vec::new()
    }
}

impl CommentScanner {
    pub fn new(marker: u8) -> Self {
        Self { marker }
    }
}

struct CommentRun;

impl SubScanner for CommentScanner {
    fn should_enter(&self, byte: u8) -> bool {
        byte == self.marker
    }

    fn begin(&self) -> Box<dyn ScanRun> {
        Box::new(CommentRun)
    }
}

impl ScanRun for CommentRun {
    fn feed(&mut self, byte: u8) -> ScanStatus {
        if byte == b'\n' {
            ScanStatus::Unhandled
        } else {
            ScanStatus::Running
        }
    }

    fn end(&mut self) -> Result<(), String> {
        Ok(())
    }

    fn tokens(&mut self) -> Vec<Token> {
        Vec::new()
    }
}
