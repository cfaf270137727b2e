//! LL(1) parse table
//!
//! A dense `nonterminals x terminals` grid. Column order matches
//! [`Grammar::terminals`]: sorted terminal names with the end marker last.

use super::first_plus::FirstPlusSets;
use super::{Grammar, NonterminalId, ProductionId, TerminalId};
use crate::config::ConflictPolicy;
use crate::errors::ConflictError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Error,
    Production(ProductionId),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Error => f.write_str("ERROR"),
            Cell::Production(p) => write!(f, "{}", p),
        }
    }
}

/// Two productions selected by the same `(nonterminal, terminal)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConflict {
    pub nonterminal: String,
    pub terminal: String,
    /// Production already in the cell
    pub existing: ProductionId,
    /// Production that claimed it second
    pub incoming: ProductionId,
}

impl fmt::Display for TableConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}): p{} vs p{}",
            self.nonterminal, self.terminal, self.existing, self.incoming
        )
    }
}

#[derive(Debug, Clone)]
pub struct ParseTable {
    cells: Vec<Cell>,
    width: usize,
    conflicts: Vec<TableConflict>,
}

impl ParseTable {
    pub fn build(
        grammar: &Grammar,
        first_plus: &FirstPlusSets,
        policy: ConflictPolicy,
    ) -> Result<ParseTable, ConflictError> {
        let width = grammar.terminals().len();
        let mut cells = vec![Cell::Error; grammar.nonterminals().len() * width];
        let mut conflicts = Vec::new();

        for production in grammar.productions() {
            let mut lookahead: Vec<TerminalId> =
                first_plus.get(production.id).iter().copied().collect();
            lookahead.sort_unstable();

            for t in lookahead {
                let cell = &mut cells[production.lhs.0 * width + t.0];
                if let Cell::Production(existing) = *cell {
                    let conflict = TableConflict {
                        nonterminal: grammar.nonterminal_name(production.lhs).to_string(),
                        terminal: grammar.terminal_name(t).to_string(),
                        existing,
                        incoming: production.id,
                    };
                    if policy == ConflictPolicy::LastWins {
                        log::warn!("parse table conflict {}, keeping p{}", conflict, production.id);
                    }
                    conflicts.push(conflict);
                    if policy == ConflictPolicy::Reject {
                        continue;
                    }
                }
                *cell = Cell::Production(production.id);
            }
        }

        if policy == ConflictPolicy::Reject && !conflicts.is_empty() {
            return Err(ConflictError { conflicts });
        }

        log::debug!(
            "parse table: {} x {}, {} conflict(s)",
            grammar.nonterminals().len(),
            width,
            conflicts.len()
        );

        Ok(ParseTable {
            cells,
            width,
            conflicts,
        })
    }

    pub fn get(&self, nt: NonterminalId, t: TerminalId) -> Cell {
        self.cells[nt.0 * self.width + t.0]
    }

    /// Cells overwritten under [`ConflictPolicy::LastWins`].
    pub fn conflicts(&self) -> &[TableConflict] {
        &self.conflicts
    }

    /// Terminals with a production in the row of `nt`, in column order.
    pub fn expected(&self, nt: NonterminalId) -> impl Iterator<Item = TerminalId> + '_ {
        self.cells[nt.0 * self.width..(nt.0 + 1) * self.width]
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell != Cell::Error)
            .map(|(i, _)| TerminalId(i))
    }

    /// Comma-separated dump: a header of quoted terminals, then one row per
    /// nonterminal.
    pub fn to_csv(&self, grammar: &Grammar) -> String {
        let header: Vec<String> = grammar
            .terminals()
            .iter()
            .map(|t| format!("\"{}\"", t))
            .collect();
        let mut out = format!("non-terminals,{}\n", header.join(","));
        for (i, nt) in grammar.nonterminals().iter().enumerate() {
            let row: Vec<String> = (0..self.width)
                .map(|t| format!("\"{}\"", self.get(NonterminalId(i), TerminalId(t))))
                .collect();
            out.push_str(&format!("{},{}\n", nt, row.join(",")));
        }
        out
    }
}
