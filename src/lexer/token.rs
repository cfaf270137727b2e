//! Token kinds and the classified token record produced by the scanner.

use std::fmt;

/// Every token kind the scanner can emit.
///
/// The declaration order is significant: [`TokenKind::id`] numbers the kinds
/// 1..=30 in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    // Literals
    Num,
    Id,

    // Keywords
    If,
    Else,
    Void,
    Return,
    Int,
    While,
    Input,
    Output,

    // Relational
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Assignment / equality
    Assign, // =
    EqEq,   // ==

    // Arithmetic
    Plus,  // +
    Minus, // -
    Star,  // *
    Slash, // /

    // Punctuation
    Comma,     // ,
    Semicolon, // ;
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }

    // End of input
    End,
}

impl TokenKind {
    pub const ALL: [TokenKind; 30] = [
        TokenKind::Num,
        TokenKind::Id,
        TokenKind::If,
        TokenKind::Else,
        TokenKind::Void,
        TokenKind::Return,
        TokenKind::Int,
        TokenKind::While,
        TokenKind::Input,
        TokenKind::Output,
        TokenKind::NotEq,
        TokenKind::Lt,
        TokenKind::Le,
        TokenKind::Gt,
        TokenKind::Ge,
        TokenKind::Assign,
        TokenKind::EqEq,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::Comma,
        TokenKind::Semicolon,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::LBracket,
        TokenKind::RBracket,
        TokenKind::LBrace,
        TokenKind::RBrace,
        TokenKind::End,
    ];

    /// 1-based classifier id.
    pub fn id(self) -> usize {
        self as usize + 1
    }

    /// Inverse of [`TokenKind::id`].
    pub fn from_id(id: usize) -> Option<TokenKind> {
        id.checked_sub(1)
            .and_then(|i| TokenKind::ALL.get(i))
            .copied()
    }

    /// The grammar terminal this kind stands for.
    pub fn terminal(self) -> &'static str {
        match self {
            TokenKind::Num => "NUM",
            TokenKind::Id => "ID",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Void => "void",
            TokenKind::Return => "return",
            TokenKind::Int => "int",
            TokenKind::While => "while",
            TokenKind::Input => "input",
            TokenKind::Output => "output",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::Assign => "=",
            TokenKind::EqEq => "==",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::End => "$",
        }
    }

    /// Reserved word lookup. Returns `None` for ordinary identifiers.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        match word {
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "void" => Some(TokenKind::Void),
            "return" => Some(TokenKind::Return),
            "int" => Some(TokenKind::Int),
            "while" => Some(TokenKind::While),
            "input" => Some(TokenKind::Input),
            "output" => Some(TokenKind::Output),
            _ => None,
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::If
                | TokenKind::Else
                | TokenKind::Void
                | TokenKind::Return
                | TokenKind::Int
                | TokenKind::While
                | TokenKind::Input
                | TokenKind::Output
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Num => write!(f, "number"),
            TokenKind::Id => write!(f, "identifier"),
            TokenKind::End => write!(f, "end of file"),
            other => write!(f, "'{}'", other.terminal()),
        }
    }
}

/// A classified token.
///
/// `index` is only set for [`TokenKind::Num`] and [`TokenKind::Id`] and is
/// 1-based into the matching literal table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub line: usize,
    pub kind: TokenKind,
    pub index: Option<usize>,
}

impl Token {
    pub fn new(line: usize, kind: TokenKind) -> Self {
        Token {
            line,
            kind,
            index: None,
        }
    }

    pub fn with_index(line: usize, kind: TokenKind, index: usize) -> Self {
        Token {
            line,
            kind,
            index: Some(index),
        }
    }
}
