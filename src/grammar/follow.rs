//! FOLLOW sets

use super::first::FirstSets;
use super::{Grammar, NonterminalId, Symbol, TerminalId};
use crate::config::FollowStrategy;
use rustc_hash::FxHashSet;

/// Terminals that may appear right after each nonterminal. Never holds ε.
#[derive(Debug, Clone)]
pub struct FollowSets {
    sets: Vec<FxHashSet<TerminalId>>,
}

impl FollowSets {
    pub fn compute(grammar: &Grammar, first: &FirstSets, strategy: FollowStrategy) -> FollowSets {
        let mut sets = vec![FxHashSet::default(); grammar.nonterminals().len()];
        sets[grammar.start().0].insert(grammar.end_marker());

        let mut passes = 0;
        loop {
            let changed = sweep(grammar, first, &mut sets);
            passes += 1;
            match strategy {
                FollowStrategy::FixedPoint if !changed => break,
                FollowStrategy::Sweeps(limit) if passes >= limit => {
                    if changed {
                        log::debug!("FOLLOW: still changing after {} sweep(s)", limit);
                    }
                    break;
                }
                _ => {}
            }
        }
        log::debug!("FOLLOW: {} pass(es)", passes);

        FollowSets { sets }
    }

    pub fn get(&self, nt: NonterminalId) -> &FxHashSet<TerminalId> {
        &self.sets[nt.0]
    }
}

fn sweep(grammar: &Grammar, first: &FirstSets, sets: &mut [FxHashSet<TerminalId>]) -> bool {
    let mut changed = false;
    for production in grammar.productions() {
        for (i, symbol) in production.rhs.iter().enumerate() {
            let Symbol::Nonterminal(target) = *symbol else {
                continue;
            };
            let rest = first.of_sequence(&production.rhs[i + 1..]);
            let before = sets[target.0].len();
            sets[target.0].extend(rest.terminals());
            if rest.has_epsilon() && target != production.lhs {
                let inherited: Vec<TerminalId> = sets[production.lhs.0].iter().copied().collect();
                sets[target.0].extend(inherited);
            }
            changed |= sets[target.0].len() != before;
        }
    }
    changed
}
