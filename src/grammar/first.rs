//! FIRST sets
//!
//! Nonterminals are visited in reverse declaration order, which settles most
//! leaf-like rules before the rules that use them. A nonterminal that reads
//! the FIRST set of one not yet visited is marked pending; if any are
//! pending after the first pass, whole passes are repeated until nothing
//! changes.

use super::{Grammar, NonterminalId, Symbol, TerminalId};
use rustc_hash::FxHashSet;

/// Terminals that can begin a derivation, plus whether it can be empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstSet {
    terminals: FxHashSet<TerminalId>,
    epsilon: bool,
}

impl FirstSet {
    pub fn of_terminal(t: TerminalId) -> Self {
        let mut terminals = FxHashSet::default();
        terminals.insert(t);
        FirstSet {
            terminals,
            epsilon: false,
        }
    }

    pub fn epsilon() -> Self {
        FirstSet {
            terminals: FxHashSet::default(),
            epsilon: true,
        }
    }

    pub fn contains(&self, t: TerminalId) -> bool {
        self.terminals.contains(&t)
    }

    pub fn has_epsilon(&self) -> bool {
        self.epsilon
    }

    pub fn terminals(&self) -> impl Iterator<Item = TerminalId> + '_ {
        self.terminals.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.terminals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminals.is_empty() && !self.epsilon
    }

    /// Merge the terminals of `other` (not its ε). Returns true on growth.
    fn absorb_terminals(&mut self, other: &FirstSet) -> bool {
        let before = self.terminals.len();
        self.terminals.extend(other.terminals.iter().copied());
        self.terminals.len() != before
    }
}

#[derive(Debug, Clone)]
pub struct FirstSets {
    sets: Vec<FirstSet>,
}

impl FirstSets {
    pub fn compute(grammar: &Grammar) -> FirstSets {
        let count = grammar.nonterminals().len();
        let mut sets = vec![FirstSet::default(); count];
        let mut visited = vec![false; count];
        let mut pending: Vec<NonterminalId> = Vec::new();

        for nt in (0..count).rev().map(NonterminalId) {
            let mut waits = false;
            for production in grammar.rules(nt) {
                for symbol in &production.rhs {
                    if let Symbol::Nonterminal(dep) = symbol {
                        if !visited[dep.0] {
                            waits = true;
                        }
                    }
                }
            }
            update(grammar, &mut sets, nt);
            visited[nt.0] = true;
            if waits {
                pending.push(nt);
            }
        }

        if !pending.is_empty() {
            log::debug!(
                "FIRST: {} nonterminal(s) pending after first pass",
                pending.len()
            );
            let mut passes = 0;
            loop {
                passes += 1;
                let mut changed = false;
                for nt in (0..count).rev().map(NonterminalId) {
                    changed |= update(grammar, &mut sets, nt);
                }
                if !changed {
                    break;
                }
            }
            log::debug!("FIRST: stable after {} extra pass(es)", passes);
        }

        FirstSets { sets }
    }

    pub fn of_nonterminal(&self, nt: NonterminalId) -> &FirstSet {
        &self.sets[nt.0]
    }

    pub fn of_symbol(&self, symbol: Symbol) -> FirstSet {
        match symbol {
            Symbol::Terminal(t) => FirstSet::of_terminal(t),
            Symbol::Nonterminal(nt) => self.sets[nt.0].clone(),
        }
    }

    /// FIRST of a symbol string. The empty string yields `{ε}`.
    pub fn of_sequence(&self, symbols: &[Symbol]) -> FirstSet {
        sequence(&self.sets, symbols)
    }
}

fn sequence(sets: &[FirstSet], symbols: &[Symbol]) -> FirstSet {
    let mut result = FirstSet::default();
    for symbol in symbols {
        match symbol {
            Symbol::Terminal(t) => {
                result.terminals.insert(*t);
                return result;
            }
            Symbol::Nonterminal(nt) => {
                let set = &sets[nt.0];
                result.absorb_terminals(set);
                if !set.epsilon {
                    return result;
                }
            }
        }
    }
    result.epsilon = true;
    result
}

/// Recompute one nonterminal from the current sets. Returns true on growth.
fn update(grammar: &Grammar, sets: &mut [FirstSet], nt: NonterminalId) -> bool {
    let mut changed = false;
    for production in grammar.rules(nt) {
        let derived = sequence(sets, &production.rhs);
        let target = &mut sets[nt.0];
        changed |= target.absorb_terminals(&derived);
        if derived.epsilon && !target.epsilon {
            target.epsilon = true;
            changed = true;
        }
    }
    changed
}
