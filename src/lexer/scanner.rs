//! Scanner driving the automaton over a character stream
//!
//! The scanner reads one character at a time, case-folded to lowercase, and
//! feeds its class to [`step`]. Tokens such as identifiers, numbers and `<`
//! are only known to be finished once the character after them has been
//! read. That character is pushed back and becomes the first character of
//! the next scan. Only characters read fresh from the source advance the line
//! counter, so a pushed-back newline is never counted twice.

use super::automaton::{step, CharClass, State, Step};
use super::token::{Token, TokenKind};
use crate::errors::{CompileError, LexicalError, LexicalErrorKind};
use indexmap::IndexSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Output of a complete scan
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub tokens: Vec<Token>,
    /// Number literals in first-seen order
    pub numbers: IndexSet<i64>,
    /// Identifier lexemes in first-seen order
    pub identifiers: IndexSet<String>,
}

impl Scan {
    /// Look up a number literal by its 1-based token index.
    pub fn number(&self, index: usize) -> Option<i64> {
        index
            .checked_sub(1)
            .and_then(|i| self.numbers.get_index(i))
            .copied()
    }

    /// Look up an identifier by its 1-based token index.
    pub fn identifier(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.identifiers.get_index(i))
            .map(String::as_str)
    }

    /// Render a token the way it appeared in the source.
    pub fn lexeme(&self, token: &Token) -> String {
        match (token.kind, token.index) {
            (TokenKind::Id, Some(i)) => self.identifier(i).unwrap_or("?").to_string(),
            (TokenKind::Num, Some(i)) => self
                .number(i)
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string()),
            (kind, _) => kind.terminal().to_string(),
        }
    }
}

/// Tokenize a whole source text.
pub fn scan(source: &str) -> Result<Scan, LexicalError> {
    Scanner::new(source.chars()).run()
}

/// Tokenize the contents of a file.
///
/// The file handle only lives inside this call and is closed on every path.
pub fn scan_file(path: impl AsRef<Path>) -> Result<Scan, CompileError> {
    let mut source = String::new();
    {
        let file = File::open(path.as_ref())?;
        BufReader::new(file).read_to_string(&mut source)?;
    }
    Ok(scan(&source)?)
}

/// Single-pass scanner with one character of pushback
pub struct Scanner<I: Iterator<Item = char>> {
    input: I,
    /// Character to re-feed before reading from `input`. `Some(None)` re-feeds
    /// the end of input.
    pushback: Option<Option<char>>,
    line: usize,
    scan: Scan,
}

impl<I: Iterator<Item = char>> Scanner<I> {
    pub fn new(input: I) -> Self {
        Scanner {
            input,
            pushback: None,
            line: 1,
            scan: Scan::default(),
        }
    }

    /// Run the automaton to the end of input.
    pub fn run(mut self) -> Result<Scan, LexicalError> {
        let mut state = State::Start;
        let mut lexeme = String::new();
        let mut token_line = self.line;

        loop {
            let ch = self.read();
            let class = CharClass::of(ch);

            if state == State::Start {
                if class == CharClass::End {
                    self.scan.tokens.push(Token::new(self.line, TokenKind::End));
                    break;
                }
                token_line = self.line;
            }

            match step(state, class) {
                Step::Continue { state: next, keep } => {
                    if keep {
                        lexeme.extend(ch);
                    } else if next == State::Comment {
                        lexeme.clear();
                    }
                    state = next;
                }
                Step::Emit(kind) => {
                    lexeme.extend(ch);
                    self.emit(kind, &lexeme, token_line)?;
                    lexeme.clear();
                    state = State::Start;
                }
                Step::EmitBefore(kind) => {
                    self.pushback = Some(ch);
                    self.emit(kind, &lexeme, token_line)?;
                    lexeme.clear();
                    state = State::Start;
                }
                Step::CommentClosed => {
                    lexeme.clear();
                    state = State::Start;
                }
                Step::Reject(kind) => {
                    let fragment = if kind == LexicalErrorKind::UnterminatedComment {
                        "/*".to_string()
                    } else {
                        lexeme.extend(ch);
                        lexeme
                    };
                    return Err(LexicalError {
                        fragment,
                        kind,
                        line: self.line,
                    });
                }
            }
        }

        log::debug!(
            "scanned {} tokens, {} numbers, {} identifiers",
            self.scan.tokens.len(),
            self.scan.numbers.len(),
            self.scan.identifiers.len()
        );
        Ok(self.scan)
    }

    fn read(&mut self) -> Option<char> {
        if let Some(ch) = self.pushback.take() {
            return ch;
        }
        let ch = self.input.next().map(|c| c.to_ascii_lowercase());
        if ch == Some('\n') {
            self.line += 1;
        }
        ch
    }

    fn emit(&mut self, kind: TokenKind, lexeme: &str, line: usize) -> Result<(), LexicalError> {
        let token = match kind {
            TokenKind::Id => match TokenKind::keyword(lexeme) {
                Some(keyword) => Token::new(line, keyword),
                None => {
                    let (i, _) = self.scan.identifiers.insert_full(lexeme.to_string());
                    Token::with_index(line, TokenKind::Id, i + 1)
                }
            },
            TokenKind::Num => {
                let value = lexeme.parse::<i64>().map_err(|_| LexicalError {
                    fragment: lexeme.to_string(),
                    kind: LexicalErrorKind::NumberOutOfRange,
                    line,
                })?;
                let (i, _) = self.scan.numbers.insert_full(value);
                Token::with_index(line, TokenKind::Num, i + 1)
            }
            other => Token::new(line, other),
        };
        log::trace!("line {}: {:?} {:?}", line, token.kind, lexeme);
        self.scan.tokens.push(token);
        Ok(())
    }
}
