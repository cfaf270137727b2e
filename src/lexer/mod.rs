//! C-minus lexical scanner
//!
//! Turns source text into a flat token stream plus two literal tables:
//! - [`token`]: token kinds and the `(line, kind, index)` token record
//! - [`automaton`]: character classes and the transition function
//! - [`scanner`]: the scanning loop with one character of pushback
//!
//! Comments are written `/* ... */` and produce no tokens. Input is case
//! insensitive: everything is folded to lowercase before classification.

pub mod automaton;
pub mod scanner;
pub mod token;

pub use scanner::{scan, scan_file, Scan, Scanner};
pub use token::{Token, TokenKind};
