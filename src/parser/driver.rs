//! Table-driven predictive parser
//!
//! The driver keeps an explicit symbol stack seeded with `[$, start]` and
//! repeatedly compares its top with the current token:
//!
//! - a terminal on top must equal the token, and both are consumed
//! - a nonterminal on top is replaced by the body of the production the
//!   parse table selects for the token
//!
//! Matching an identifier runs the semantic action for the current
//! [`SemanticContext`], which every expansion replaces. Braces open and close
//! scopes. Parsing stops at the first error.

use super::diagnostics::diagnose;
use super::scope::ScopeSet;
use super::semantic::{check_entry_point, Resolver, SemanticContext};
use super::symtab::SymbolTable;
use crate::errors::{InputError, ParseError, SyntaxError};
use crate::grammar::{Cell, Grammar, ParseTable, Symbol, TerminalId};
use crate::lexer::{Token, TokenKind};
use crate::snapshot::{Action, ParseSnapshot, Trace};

/// Everything that changes while parsing, apart from the symbol table
#[derive(Debug, Clone)]
pub struct ParserState {
    pub stack: Vec<Symbol>,
    pub cursor: usize,
    pub context: SemanticContext,
    pub scopes: ScopeSet,
    pub depth: u32,
}

impl ParserState {
    pub fn new(grammar: &Grammar) -> Self {
        ParserState {
            stack: vec![
                Symbol::Terminal(grammar.end_marker()),
                Symbol::Nonterminal(grammar.start()),
            ],
            cursor: 0,
            context: SemanticContext::Neutral,
            scopes: ScopeSet::new(),
            depth: 0,
        }
    }
}

/// Parse a token stream, resolving `symbols` as declarations are seen.
pub fn parse(
    grammar: &Grammar,
    table: &ParseTable,
    tokens: &[Token],
    symbols: &mut SymbolTable,
) -> Result<(), ParseError> {
    Parser::new(grammar, table, tokens, symbols).run()
}

/// Like [`parse`], recording a snapshot before every step into `trace`.
pub fn parse_traced(
    grammar: &Grammar,
    table: &ParseTable,
    tokens: &[Token],
    symbols: &mut SymbolTable,
    trace: &mut Trace,
) -> Result<(), ParseError> {
    Parser::new(grammar, table, tokens, symbols)
        .with_trace(trace)
        .run()
}

pub struct Parser<'a> {
    grammar: &'a Grammar,
    table: &'a ParseTable,
    tokens: &'a [Token],
    /// Table column of each token, `None` if the grammar lacks its terminal
    columns: Vec<Option<TerminalId>>,
    /// Context entered by expanding each nonterminal
    contexts: Vec<SemanticContext>,
    symbols: &'a mut SymbolTable,
    state: ParserState,
    trace: Option<&'a mut Trace>,
    steps: usize,
}

impl<'a> Parser<'a> {
    pub fn new(
        grammar: &'a Grammar,
        table: &'a ParseTable,
        tokens: &'a [Token],
        symbols: &'a mut SymbolTable,
    ) -> Self {
        let columns = tokens
            .iter()
            .map(|t| grammar.terminal_id(t.kind.terminal()))
            .collect();
        let contexts = grammar
            .nonterminals()
            .iter()
            .map(|name| SemanticContext::from_nonterminal(name))
            .collect();
        Parser {
            grammar,
            table,
            tokens,
            columns,
            contexts,
            symbols,
            state: ParserState::new(grammar),
            trace: None,
            steps: 0,
        }
    }

    pub fn with_trace(mut self, trace: &'a mut Trace) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Drive the stack machine to acceptance, then check the entry point.
    pub fn run(mut self) -> Result<(), ParseError> {
        if self.tokens.first().map_or(true, |t| t.kind == TokenKind::End) {
            return Err(InputError::EmptyProgram.into());
        }
        log::info!("parsing {} tokens", self.tokens.len());

        loop {
            let before = self.trace.is_some().then(|| self.capture());
            let result = self.step();
            if let Some(mut snapshot) = before {
                snapshot.action = match &result {
                    Ok(action) => action.clone(),
                    Err(e) => Action::Reject {
                        message: e.to_string(),
                    },
                };
                self.record(snapshot);
            }
            self.steps += 1;
            if result? == Action::Accept {
                break;
            }
        }

        log::info!("accepted after {} steps", self.steps);
        check_entry_point(self.symbols)?;
        Ok(())
    }

    /// One transition of the stack machine.
    pub fn step(&mut self) -> Result<Action, ParseError> {
        let end = self.grammar.end_marker();
        let top = match self.state.stack.last() {
            Some(top) => *top,
            None => return Err(self.premature_end(end)),
        };
        let Some(&token) = self.tokens.get(self.state.cursor) else {
            return Err(self.premature_end_at(top));
        };
        let column = self.columns[self.state.cursor];

        if top == Symbol::Terminal(end) {
            if token.kind == TokenKind::End {
                self.state.stack.pop();
                log::trace!("accept at line {}", token.line);
                return Ok(Action::Accept);
            }
            return Err(SyntaxError::TrailingInput {
                found: token.kind.to_string(),
                line: token.line,
            }
            .into());
        }

        match top {
            Symbol::Terminal(expected) => {
                if column != Some(expected) {
                    if token.kind == TokenKind::End {
                        return Err(self.premature_end_at(top));
                    }
                    return Err(SyntaxError::StackMismatch {
                        expected: self.describe_terminal(expected),
                        found: token.kind.to_string(),
                        line: token.line,
                    }
                    .into());
                }
                self.state.stack.pop();
                self.matched(token)?;
                self.state.cursor += 1;
                let terminal = self.grammar.terminal_name(expected).to_string();
                log::trace!("line {}: match {}", token.line, terminal);
                Ok(Action::Match { terminal })
            }
            Symbol::Nonterminal(nt) => {
                let cell = column.map_or(Cell::Error, |t| self.table.get(nt, t));
                let Cell::Production(id) = cell else {
                    let nonterminal = self.grammar.nonterminal_name(nt).to_string();
                    let message = diagnose(&nonterminal, token.kind);
                    return Err(SyntaxError::TableReject {
                        nonterminal,
                        found: token.kind.to_string(),
                        message,
                        line: token.line,
                    }
                    .into());
                };
                let production = self.grammar.production(id);
                self.state.stack.pop();
                self.state.stack.extend(production.rhs.iter().rev().copied());
                self.state.context = self.contexts[production.lhs.0];
                let rule = self.grammar.render_production(production);
                log::trace!("line {}: expand p{} {}", token.line, id, rule);
                Ok(Action::Expand {
                    production: id,
                    rule,
                })
            }
        }
    }

    fn matched(&mut self, token: Token) -> Result<(), ParseError> {
        match token.kind {
            TokenKind::Id => {
                let mut resolver = Resolver {
                    symbols: &mut *self.symbols,
                    scopes: &mut self.state.scopes,
                    depth: self.state.depth,
                };
                resolver.identifier(self.state.context, self.tokens, self.state.cursor)?;
            }
            TokenKind::LBrace => self.state.depth += 1,
            TokenKind::RBrace => {
                self.state.scopes.purge_from(self.state.depth);
                self.state.depth = self.state.depth.saturating_sub(1);
            }
            _ => {}
        }
        Ok(())
    }

    fn premature_end_at(&self, top: Symbol) -> ParseError {
        let line = self
            .tokens
            .get(self.state.cursor)
            .or(self.tokens.last())
            .map_or(0, |t| t.line);
        SyntaxError::PrematureEnd {
            top: self.grammar.symbol_name(top).to_string(),
            line,
        }
        .into()
    }

    fn premature_end(&self, end: TerminalId) -> ParseError {
        self.premature_end_at(Symbol::Terminal(end))
    }

    /// `';'` for terminals the scanner produces, the raw name otherwise.
    fn describe_terminal(&self, t: TerminalId) -> String {
        let name = self.grammar.terminal_name(t);
        TokenKind::ALL
            .iter()
            .find(|k| k.terminal() == name)
            .map_or_else(|| name.to_string(), |k| k.to_string())
    }

    fn describe_token(&self, token: &Token) -> String {
        match (token.kind, token.index) {
            (TokenKind::Id, Some(i)) => self
                .symbols
                .get(i)
                .map_or_else(|| token.kind.to_string(), |e| e.name.clone()),
            (kind, _) => kind.to_string(),
        }
    }

    fn capture(&self) -> ParseSnapshot {
        let token = self.tokens.get(self.state.cursor);
        ParseSnapshot {
            step: self.steps,
            stack: self
                .state
                .stack
                .iter()
                .map(|s| self.grammar.symbol_name(*s).to_string())
                .collect(),
            cursor: self.state.cursor,
            token: token.map_or_else(String::new, |t| self.describe_token(t)),
            line: token.map_or(0, |t| t.line),
            context: self.state.context,
            depth: self.state.depth,
            scopes: self.state.scopes.sorted(),
            symbols: self.symbols.entries().to_vec(),
            action: Action::Accept,
        }
    }

    fn record(&mut self, snapshot: ParseSnapshot) {
        if let Some(trace) = self.trace.as_deref_mut() {
            if trace.is_truncated() {
                return;
            }
            if let Err(e) = trace.push(snapshot) {
                log::warn!("{}; later steps are not recorded", e);
            }
        }
    }
}
