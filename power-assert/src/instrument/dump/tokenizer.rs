//! Dump tokenizer
//!
//!     A character-class state machine over the dump text, one line at a time. The dump prints
//!     one node per line, so every non-blank line starts with an [`DumpToken::Indent`] carrying
//!     the number of leading spaces, followed by the line's tokens.
//!
//! Token Rules
//!
//!     - `'` opens a symbol, closed by the next `'`.
//!     - `"` opens a string; `\` escapes the next character.
//!     - `(` is standalone at the start of a word. Inside a word it opens a group, so that
//!       `XCTest.(file).XCTAssert(_:_:file:line:)` stays one token.
//!     - `)` closes the innermost group of the current word, or is standalone.
//!     - `:` is standalone when it ends an identifier word outside any group and is followed
//!       by whitespace or the end of the line (`inherits: Equatable`). `t.swift:3:5` and
//!       `labels=_:_:` keep their colons.
//!     - The first `=` of a word whose prefix is an identifier splits `key=value` into
//!       `key`, `=`, `value`. Any later `=` belongs to the value (`extension.==`).
//!
//! Noise Filtering
//!
//!     Conformance records and requirement witnesses are large and never contain code worth
//!     instrumenting. [`filter_noise`] drops lines starting with one of the configured markers,
//!     along with every more-indented line nested under them, before tokenizing.

use super::token::DumpToken;

/// Markers dropped by default; see [`filter_noise`].
pub const DEFAULT_NOISE_MARKERS: &[&str] = &[
    "(normal_conformance",
    "(specialized_conformance",
    "(inherited_conformance",
    "(builtin_conformance",
    "(abstract_conformance",
    "(self_conformance",
    "(value req=",
    "(assoc_type req=",
    "(requirement_witness",
];

/// Drop noise lines and the lines nested under them.
pub fn filter_noise<S: AsRef<str>>(text: &str, markers: &[S]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut skipping_below: Option<usize> = None;

    for line in text.lines() {
        let indent = leading_spaces(line);
        let trimmed = &line[indent..];

        if let Some(depth) = skipping_below {
            if indent > depth || trimmed.is_empty() {
                continue;
            }
            skipping_below = None;
        }

        if markers.iter().any(|m| trimmed.starts_with(m.as_ref())) {
            skipping_below = Some(indent);
            continue;
        }

        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Tokenize dump text.
pub fn tokenize(text: &str) -> Vec<DumpToken> {
    let mut tokenizer = Tokenizer::default();
    for line in text.lines() {
        tokenizer.line(line);
    }
    tokenizer.tokens
}

fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ').count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Word,
    Symbol,
    String { escaped: bool },
}

#[derive(Default)]
struct Tokenizer {
    tokens: Vec<DumpToken>,
    buffer: String,
    /// Open `(` groups inside the current word.
    depth: usize,
}

impl Tokenizer {
    fn line(&mut self, line: &str) {
        let indent = leading_spaces(line);
        let chars: Vec<char> = line[indent..].chars().collect();
        if chars.iter().all(|c| c.is_whitespace()) {
            return;
        }
        self.tokens.push(DumpToken::Indent(indent));

        let mut state = State::Idle;
        for (i, &c) in chars.iter().enumerate() {
            let ends_word = chars.get(i + 1).map_or(true, |next| next.is_whitespace());
            state = match state {
                State::Idle => self.idle(c, ends_word),
                State::Word => self.word(c, ends_word),
                State::Symbol => {
                    if c == '\'' {
                        self.emit(DumpToken::Symbol);
                        State::Idle
                    } else {
                        self.buffer.push(c);
                        State::Symbol
                    }
                }
                State::String { escaped: true } => {
                    self.buffer.push(c);
                    State::String { escaped: false }
                }
                State::String { escaped: false } => match c {
                    '\\' => State::String { escaped: true },
                    '"' => {
                        self.emit(DumpToken::String);
                        State::Idle
                    }
                    _ => {
                        self.buffer.push(c);
                        State::String { escaped: false }
                    }
                },
            };
        }

        // Symbols and strings never span lines; an unterminated one ends here.
        match state {
            State::Idle => {}
            State::Word => self.flush_word(),
            State::Symbol => self.emit(DumpToken::Symbol),
            State::String { .. } => self.emit(DumpToken::String),
        }
    }

    fn idle(&mut self, c: char, ends_word: bool) -> State {
        match c {
            ' ' | '\t' => State::Idle,
            '\'' => State::Symbol,
            '"' => State::String { escaped: false },
            '(' | ')' => {
                self.tokens.push(DumpToken::Token(c.to_string()));
                State::Idle
            }
            ':' if ends_word => {
                self.tokens.push(DumpToken::token(":"));
                State::Idle
            }
            _ => self.word(c, ends_word),
        }
    }

    fn word(&mut self, c: char, ends_word: bool) -> State {
        match c {
            ' ' | '\t' => {
                self.flush_word();
                State::Idle
            }
            '(' => {
                self.depth += 1;
                self.buffer.push(c);
                State::Word
            }
            ')' if self.depth > 0 => {
                self.depth -= 1;
                self.buffer.push(c);
                State::Word
            }
            ')' => {
                self.flush_word();
                self.tokens.push(DumpToken::token(")"));
                State::Idle
            }
            ':' if self.depth == 0 && ends_word && is_label(&self.buffer) => {
                self.flush_word();
                self.tokens.push(DumpToken::token(":"));
                State::Idle
            }
            '=' if self.depth == 0 && is_identifier(&self.buffer) => {
                self.flush_word();
                self.tokens.push(DumpToken::token("="));
                // The value may be quoted, so it starts from a fresh state.
                State::Idle
            }
            _ => {
                self.buffer.push(c);
                State::Word
            }
        }
    }

    fn flush_word(&mut self) {
        self.depth = 0;
        if !self.buffer.is_empty() {
            self.emit(DumpToken::Token);
        }
    }

    fn emit(&mut self, make: fn(String) -> DumpToken) {
        let text = std::mem::take(&mut self.buffer);
        self.tokens.push(make(text));
    }
}

/// `inherits:` ends a label; `_:_:` and `x:` in argument labels do not.
fn is_label(text: &str) -> bool {
    text.len() > 1 && is_identifier(text)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
