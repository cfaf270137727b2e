//! Error types for every phase of the front end
//!
//! Each phase has its own error type, and every failure is fatal: the phase
//! stops at the first error and hands it back to the caller.
//!
//! - [`LexicalError`]: the scanner rejected a character sequence
//! - [`GrammarLoadError`]: the grammar text is malformed
//! - [`ConflictError`]: the grammar is not LL(1)
//! - [`SyntaxError`], [`SemanticError`], [`InputError`]: the parser driver
//!   rejected the token stream (grouped as [`ParseError`])
//!
//! [`CompileError`] aggregates all of them so that callers driving the whole
//! pipeline can propagate with `?`.

use crate::grammar::table::TableConflict;
use crate::parser::symtab::TypeSpec;
use thiserror::Error;

/// Category of a lexical failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorKind {
    InvalidCharacter,
    DigitsInIdentifier,
    LettersInNumber,
    /// `!` not followed by `=`
    MalformedOperator,
    UnterminatedComment,
    NumberOutOfRange,
}

impl std::fmt::Display for LexicalErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            LexicalErrorKind::InvalidCharacter => "Invalid Char",
            LexicalErrorKind::DigitsInIdentifier => "Identifiers cannot have numbers",
            LexicalErrorKind::LettersInNumber => "Numbers cannot have letters",
            LexicalErrorKind::MalformedOperator => "expected '='",
            LexicalErrorKind::UnterminatedComment => "Unterminated comment",
            LexicalErrorKind::NumberOutOfRange => "Number out of range",
        };
        f.write_str(text)
    }
}

/// The scanner rejected the source text
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("LEXICAL ERROR: {kind}: '{fragment}' in line {line}")]
pub struct LexicalError {
    pub fragment: String,
    pub kind: LexicalErrorKind,
    pub line: usize,
}

/// Malformed grammar text. Lines are 1-based.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GrammarLoadError {
    #[error("GRAMMAR ERROR: line {line} is missing the '->' separator: {text:?}")]
    MissingSeparator { line: usize, text: String },

    #[error("GRAMMAR ERROR: line {line} has no nonterminal before '->'")]
    EmptyLhs { line: usize },

    #[error("GRAMMAR ERROR: nonterminal '{name}' is defined again in line {line}")]
    DuplicateNonterminal { name: String, line: usize },

    #[error("GRAMMAR ERROR: empty alternative for '{nonterminal}' in line {line}")]
    EmptyAlternative { nonterminal: String, line: usize },

    #[error("GRAMMAR ERROR: 'ε' must be the only symbol of its production ('{nonterminal}', line {line})")]
    MisplacedEpsilon { nonterminal: String, line: usize },

    #[error("GRAMMAR ERROR: '{symbol}' is reserved for the end marker (line {line})")]
    ReservedSymbol { symbol: String, line: usize },

    #[error("GRAMMAR ERROR: grammar has no rules")]
    Empty,
}

/// The grammar is not LL(1): at least one table cell has two claimants
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("GRAMMAR ERROR: grammar is not LL(1), {} conflicting cell(s); first: {}", .conflicts.len(), .conflicts[0])]
pub struct ConflictError {
    pub conflicts: Vec<TableConflict>,
}

/// Rejections from the predictive parser's stack machine
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyntaxError {
    /// A terminal on top of the stack did not match the current token
    #[error("SYNTAX ERROR: expected {expected} got {found} in line {line}")]
    StackMismatch {
        expected: String,
        found: String,
        line: usize,
    },

    /// The parse table has no production for (nonterminal, token)
    #[error("SYNTAX ERROR: {message} (got {found} while expecting {nonterminal}) in line {line}")]
    TableReject {
        nonterminal: String,
        found: String,
        message: String,
        line: usize,
    },

    /// Tokens ran out while grammar symbols were still pending
    #[error("SYNTAX ERROR: input ended prematurely, top of stack: {top} in line {line}")]
    PrematureEnd { top: String, line: usize },

    /// The stack emptied before the end marker was reached
    #[error("SYNTAX ERROR: did not end on $, got {found} in line {line}")]
    TrailingInput { found: String, line: usize },
}

/// Static scope and type violations found while parsing
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SemanticError {
    #[error("SEMANTIC ERROR: 'main' is declared more than once in line {line}")]
    MainRedeclared { line: usize },

    #[error("SEMANTIC ERROR: 'main' must return void, found {found} in line {line}")]
    MainReturnType { found: TypeSpec, line: usize },

    #[error("SEMANTIC ERROR: 'main' must take exactly one parameter of type void in line {line}")]
    MainSignature { line: usize },

    #[error("SEMANTIC ERROR: '{name}' is reserved and cannot name a variable in line {line}")]
    ReservedName { name: String, line: usize },

    #[error("SEMANTIC ERROR: '{name}' is not declared in line {line}")]
    Undeclared { name: String, line: usize },

    #[error("SEMANTIC ERROR: '{name}' is not a function in line {line}")]
    NotAFunction { name: String, line: usize },

    #[error("SEMANTIC ERROR: 'main' cannot be called in line {line}")]
    EntryPointCalled { line: usize },

    #[error("SEMANTIC ERROR: cannot assign to function '{name}' in line {line}")]
    AssignToFunction { name: String, line: usize },

    #[error("SEMANTIC ERROR: '{name}' is not in scope in line {line}")]
    OutOfScope { name: String, line: usize },

    #[error("SEMANTIC ERROR: '{name}' returns void and has no value in line {line}")]
    VoidValue { name: String, line: usize },

    #[error("SEMANTIC ERROR: program does not declare 'main'")]
    MissingEntryPoint,

    #[error("SEMANTIC ERROR: the last function declared must be 'void main(void)', found '{found}'")]
    EntryPointNotLast { found: String },
}

impl SemanticError {
    /// Source line of the offending identifier, if the error has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            SemanticError::MainRedeclared { line }
            | SemanticError::MainReturnType { line, .. }
            | SemanticError::MainSignature { line }
            | SemanticError::ReservedName { line, .. }
            | SemanticError::Undeclared { line, .. }
            | SemanticError::NotAFunction { line, .. }
            | SemanticError::EntryPointCalled { line }
            | SemanticError::AssignToFunction { line, .. }
            | SemanticError::OutOfScope { line, .. }
            | SemanticError::VoidValue { line, .. } => Some(*line),
            SemanticError::MissingEntryPoint | SemanticError::EntryPointNotLast { .. } => None,
        }
    }
}

/// Structural problems with the program as a whole
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("INPUT: code file cannot be empty")]
    EmptyProgram,
}

/// Anything the parser driver can fail with
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error(transparent)]
    Input(#[from] InputError),
}

impl ParseError {
    /// Source line to highlight, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Syntax(SyntaxError::StackMismatch { line, .. })
            | ParseError::Syntax(SyntaxError::TableReject { line, .. })
            | ParseError::Syntax(SyntaxError::PrematureEnd { line, .. })
            | ParseError::Syntax(SyntaxError::TrailingInput { line, .. }) => Some(*line),
            ParseError::Semantic(e) => e.line(),
            ParseError::Input(_) => None,
        }
    }
}

/// Top-level error for the whole pipeline
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),

    #[error(transparent)]
    Grammar(#[from] GrammarLoadError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SyntaxError> for CompileError {
    fn from(err: SyntaxError) -> Self {
        CompileError::Parse(err.into())
    }
}

impl From<SemanticError> for CompileError {
    fn from(err: SemanticError) -> Self {
        CompileError::Parse(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_error_message() {
        let err = LexicalError {
            fragment: "x1".to_string(),
            kind: LexicalErrorKind::DigitsInIdentifier,
            line: 3,
        };
        assert_eq!(
            err.to_string(),
            "LEXICAL ERROR: Identifiers cannot have numbers: 'x1' in line 3"
        );
    }

    #[test]
    fn test_parse_error_is_transparent() {
        let err: ParseError = SemanticError::Undeclared {
            name: "y".to_string(),
            line: 1,
        }
        .into();
        assert_eq!(err.to_string(), "SEMANTIC ERROR: 'y' is not declared in line 1");
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_compile_error_from_parts() {
        let err: CompileError = ParseError::from(InputError::EmptyProgram).into();
        assert!(matches!(
            err,
            CompileError::Parse(ParseError::Input(InputError::EmptyProgram))
        ));
        assert!(err.to_string().contains("code file cannot be empty"));
    }
}
