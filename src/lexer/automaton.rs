//! Character classes and the scanner's transition function
//!
//! The scanner is a deterministic automaton over a small, fixed alphabet of
//! character classes. [`CharClass::of`] maps every input character (and the
//! end of input) onto that alphabet, and [`step`] gives the next state for a
//! (state, class) pair. States that finish a token are [`Step`] outcomes
//! rather than [`State`]s, so the scanner loop never has to look them up.

use super::token::TokenKind;
use crate::errors::LexicalErrorKind;

/// Input alphabet of the automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Letter,
    Digit,
    /// Space, tab, carriage return or newline
    Delim,
    /// End of input
    End,
    Bang,
    Less,
    Greater,
    Equal,
    Plus,
    Minus,
    Star,
    Slash,
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    /// Anything the language does not use
    Reject,
}

impl CharClass {
    pub fn of(ch: Option<char>) -> CharClass {
        let Some(ch) = ch else {
            return CharClass::End;
        };
        match ch {
            'a'..='z' | 'A'..='Z' => CharClass::Letter,
            '0'..='9' => CharClass::Digit,
            ' ' | '\t' | '\r' | '\n' => CharClass::Delim,
            '!' => CharClass::Bang,
            '<' => CharClass::Less,
            '>' => CharClass::Greater,
            '=' => CharClass::Equal,
            '+' => CharClass::Plus,
            '-' => CharClass::Minus,
            '*' => CharClass::Star,
            '/' => CharClass::Slash,
            ',' => CharClass::Comma,
            ';' => CharClass::Semicolon,
            '(' => CharClass::LParen,
            ')' => CharClass::RParen,
            '[' => CharClass::LBracket,
            ']' => CharClass::RBracket,
            '{' => CharClass::LBrace,
            '}' => CharClass::RBrace,
            _ => CharClass::Reject,
        }
    }

    /// Single-glyph tokens that never need a second character.
    fn single(self) -> Option<TokenKind> {
        match self {
            CharClass::Plus => Some(TokenKind::Plus),
            CharClass::Minus => Some(TokenKind::Minus),
            CharClass::Star => Some(TokenKind::Star),
            CharClass::Comma => Some(TokenKind::Comma),
            CharClass::Semicolon => Some(TokenKind::Semicolon),
            CharClass::LParen => Some(TokenKind::LParen),
            CharClass::RParen => Some(TokenKind::RParen),
            CharClass::LBracket => Some(TokenKind::LBracket),
            CharClass::RBracket => Some(TokenKind::RBracket),
            CharClass::LBrace => Some(TokenKind::LBrace),
            CharClass::RBrace => Some(TokenKind::RBrace),
            _ => None,
        }
    }
}

/// Non-final automaton states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Start,
    Identifier,
    Number,
    Bang,
    Less,
    Greater,
    Equal,
    Slash,
    Comment,
    CommentStar,
}

/// Result of feeding one character class to the automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep scanning. `keep` says whether the character belongs to the lexeme.
    Continue { state: State, keep: bool },
    /// Token finished, the current character is part of it
    Emit(TokenKind),
    /// Token finished one character early, the current character must be
    /// pushed back and re-fed
    EmitBefore(TokenKind),
    /// A `/* ... */` comment closed
    CommentClosed,
    Reject(LexicalErrorKind),
}

fn to(state: State) -> Step {
    Step::Continue { state, keep: true }
}

fn skip(state: State) -> Step {
    Step::Continue { state, keep: false }
}

/// Transition function of the scanner automaton.
pub fn step(state: State, class: CharClass) -> Step {
    use CharClass as C;

    match state {
        State::Start => match class {
            C::Delim | C::End => skip(State::Start),
            C::Letter => to(State::Identifier),
            C::Digit => to(State::Number),
            C::Bang => to(State::Bang),
            C::Less => to(State::Less),
            C::Greater => to(State::Greater),
            C::Equal => to(State::Equal),
            C::Slash => to(State::Slash),
            C::Reject => Step::Reject(LexicalErrorKind::InvalidCharacter),
            other => match other.single() {
                Some(kind) => Step::Emit(kind),
                None => Step::Reject(LexicalErrorKind::InvalidCharacter),
            },
        },

        // Identifiers are letters only
        State::Identifier => match class {
            C::Letter => to(State::Identifier),
            C::Digit => Step::Reject(LexicalErrorKind::DigitsInIdentifier),
            _ => Step::EmitBefore(TokenKind::Id),
        },

        // Numbers are digits only
        State::Number => match class {
            C::Digit => to(State::Number),
            C::Letter => Step::Reject(LexicalErrorKind::LettersInNumber),
            _ => Step::EmitBefore(TokenKind::Num),
        },

        State::Bang => match class {
            C::Equal => Step::Emit(TokenKind::NotEq),
            _ => Step::Reject(LexicalErrorKind::MalformedOperator),
        },

        State::Less => match class {
            C::Equal => Step::Emit(TokenKind::Le),
            _ => Step::EmitBefore(TokenKind::Lt),
        },

        State::Greater => match class {
            C::Equal => Step::Emit(TokenKind::Ge),
            _ => Step::EmitBefore(TokenKind::Gt),
        },

        State::Equal => match class {
            C::Equal => Step::Emit(TokenKind::EqEq),
            _ => Step::EmitBefore(TokenKind::Assign),
        },

        State::Slash => match class {
            C::Star => skip(State::Comment),
            _ => Step::EmitBefore(TokenKind::Slash),
        },

        State::Comment => match class {
            C::Star => skip(State::CommentStar),
            C::End => Step::Reject(LexicalErrorKind::UnterminatedComment),
            _ => skip(State::Comment),
        },

        State::CommentStar => match class {
            C::Slash => Step::CommentClosed,
            C::Star => skip(State::CommentStar),
            C::End => Step::Reject(LexicalErrorKind::UnterminatedComment),
            _ => skip(State::Comment),
        },
    }
}
