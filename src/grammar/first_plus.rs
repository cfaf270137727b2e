//! FIRST+ (selection) sets, one per production

use super::first::FirstSets;
use super::follow::FollowSets;
use super::{Grammar, ProductionId, TerminalId};
use crate::config::DanglingElse;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone)]
pub struct FirstPlusSets {
    /// Indexed by production number - 1
    sets: Vec<FxHashSet<TerminalId>>,
}

impl FirstPlusSets {
    /// `FIRST(β)` for `A->β`, widened by `FOLLOW(A)` when β can vanish.
    ///
    /// With `dangling_else` set, its terminal is dropped from the ε-production
    /// of its nonterminal so the terminal always extends the innermost
    /// construct.
    pub fn compute(
        grammar: &Grammar,
        first: &FirstSets,
        follow: &FollowSets,
        dangling_else: Option<&DanglingElse>,
    ) -> FirstPlusSets {
        let mut sets: Vec<FxHashSet<TerminalId>> = grammar
            .productions()
            .iter()
            .map(|production| {
                let body = first.of_sequence(&production.rhs);
                let mut set: FxHashSet<TerminalId> = body.terminals().collect();
                if body.has_epsilon() {
                    set.extend(follow.get(production.lhs).iter().copied());
                }
                set
            })
            .collect();

        if let Some(carve) = dangling_else {
            let target = grammar
                .nonterminal_id(&carve.nonterminal)
                .zip(grammar.terminal_id(&carve.terminal));
            match target {
                Some((nt, t)) => {
                    for production in grammar.rules(nt).iter().filter(|p| p.is_epsilon()) {
                        if sets[production.id.0 - 1].remove(&t) {
                            log::debug!(
                                "FIRST+: removed '{}' from {}",
                                carve.terminal,
                                grammar.render_production(production)
                            );
                        }
                    }
                }
                None => log::debug!(
                    "FIRST+: no '{}'/'{}' pair in grammar, dangling-else rule unused",
                    carve.nonterminal,
                    carve.terminal
                ),
            }
        }

        FirstPlusSets { sets }
    }

    pub fn get(&self, production: ProductionId) -> &FxHashSet<TerminalId> {
        &self.sets[production.0 - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FollowStrategy;

    fn build(text: &str, carve: Option<&DanglingElse>) -> (Grammar, FirstPlusSets) {
        let grammar = Grammar::parse(text).unwrap();
        let first = FirstSets::compute(&grammar);
        let follow = FollowSets::compute(&grammar, &first, FollowStrategy::FixedPoint);
        let plus = FirstPlusSets::compute(&grammar, &first, &follow, carve);
        (grammar, plus)
    }

    fn names(grammar: &Grammar, plus: &FirstPlusSets, id: usize) -> Vec<String> {
        let mut out: Vec<String> = plus
            .get(ProductionId(id))
            .iter()
            .map(|t| grammar.terminal_name(*t).to_string())
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_epsilon_production_takes_follow() {
        let (grammar, plus) = build("s->t x\nt->a | ε", None);
        assert_eq!(names(&grammar, &plus, 2), vec!["a"]);
        assert_eq!(names(&grammar, &plus, 3), vec!["x"]);
    }

    #[test]
    fn test_dangling_else_carve_out() {
        let text = "s->if s e | x\ne->else s | ε";
        let (grammar, plain) = build(text, None);
        assert_eq!(names(&grammar, &plain, 4), vec!["$", "else"]);

        let carve = DanglingElse {
            nonterminal: "e".to_string(),
            terminal: "else".to_string(),
        };
        let (grammar, carved) = build(text, Some(&carve));
        assert_eq!(names(&grammar, &carved, 4), vec!["$"]);
        assert_eq!(names(&grammar, &carved, 3), vec!["else"]);
    }

    #[test]
    fn test_missing_carve_out_target_is_ignored() {
        let (grammar, plus) = build("s->t x\nt->a | ε", Some(&DanglingElse::default()));
        assert_eq!(names(&grammar, &plus, 3), vec!["x"]);
    }
}
