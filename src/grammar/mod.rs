//! Grammar loading and LL(1) analysis
//!
//! A grammar is read from text, one nonterminal per line:
//!
//! ```text
//! expression->additive_expression relation_tail
//! relation_tail->relop additive_expression | ε
//! ```
//!
//! The first nonterminal is the start symbol. Every symbol that never
//! appears on a left-hand side is a terminal, and `ε` marks the empty
//! production. Symbols are interned into dense ids so the analysis passes and
//! the parse table can index plain vectors.
//!
//! - [`first`]: FIRST sets
//! - [`follow`]: FOLLOW sets
//! - [`first_plus`]: per-production selection sets
//! - [`table`]: the LL(1) parse table

pub mod first;
pub mod first_plus;
pub mod follow;
pub mod table;

use crate::config::AnalyzerConfig;
use crate::errors::{ConflictError, GrammarLoadError};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

pub use first::{FirstSet, FirstSets};
pub use first_plus::FirstPlusSets;
pub use follow::FollowSets;
pub use table::{Cell, ParseTable, TableConflict};

/// The C-minus grammar shipped with the crate
pub const CMINUS_GRAMMAR: &str = include_str!("cminus.grammar");

pub const EPSILON: &str = "ε";
pub const END_MARKER: &str = "$";
const SEPARATOR: &str = "->";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonterminalId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerminalId(pub usize);

/// 1-based production number, as listed in the production table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductionId(pub usize);

impl fmt::Display for ProductionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A grammar symbol inside a production body. ε is the empty body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(TerminalId),
    Nonterminal(NonterminalId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub id: ProductionId,
    pub lhs: NonterminalId,
    /// Empty for the ε-production
    pub rhs: Vec<Symbol>,
}

impl Production {
    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }
}

/// An interned context-free grammar
#[derive(Debug, Clone)]
pub struct Grammar {
    nonterminals: Vec<String>,
    /// Sorted, with the end marker appended last
    terminals: Vec<String>,
    nonterminal_ids: FxHashMap<String, NonterminalId>,
    terminal_ids: FxHashMap<String, TerminalId>,
    productions: Vec<Production>,
    /// Slice of `productions` owned by each nonterminal
    rules: Vec<Range<usize>>,
}

impl Grammar {
    /// Parse grammar text in `LHS->RHS1 | ... | RHSn` form.
    pub fn parse(text: &str) -> Result<Grammar, GrammarLoadError> {
        let mut raw: Vec<(String, Vec<Vec<&str>>)> = Vec::new();
        let mut seen: FxHashSet<&str> = FxHashSet::default();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let entry = line.trim();
            if entry.is_empty() {
                continue;
            }

            let (lhs, rhs) =
                entry
                    .split_once(SEPARATOR)
                    .ok_or_else(|| GrammarLoadError::MissingSeparator {
                        line: line_no,
                        text: line.to_string(),
                    })?;

            let lhs = lhs.trim();
            if lhs.is_empty() {
                return Err(GrammarLoadError::EmptyLhs { line: line_no });
            }
            if lhs == END_MARKER {
                return Err(GrammarLoadError::ReservedSymbol {
                    symbol: lhs.to_string(),
                    line: line_no,
                });
            }
            if !seen.insert(lhs) {
                return Err(GrammarLoadError::DuplicateNonterminal {
                    name: lhs.to_string(),
                    line: line_no,
                });
            }

            let mut alternatives = Vec::new();
            for alternative in rhs.split('|') {
                let symbols: Vec<&str> = alternative.split_whitespace().collect();
                if symbols.is_empty() {
                    return Err(GrammarLoadError::EmptyAlternative {
                        nonterminal: lhs.to_string(),
                        line: line_no,
                    });
                }
                if symbols.len() > 1 && symbols.contains(&EPSILON) {
                    return Err(GrammarLoadError::MisplacedEpsilon {
                        nonterminal: lhs.to_string(),
                        line: line_no,
                    });
                }
                if symbols.contains(&END_MARKER) {
                    return Err(GrammarLoadError::ReservedSymbol {
                        symbol: END_MARKER.to_string(),
                        line: line_no,
                    });
                }
                alternatives.push(symbols);
            }

            raw.push((lhs.to_string(), alternatives));
        }

        if raw.is_empty() {
            return Err(GrammarLoadError::Empty);
        }

        let nonterminals: Vec<String> = raw.iter().map(|(lhs, _)| lhs.clone()).collect();
        let nonterminal_ids: FxHashMap<String, NonterminalId> = nonterminals
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), NonterminalId(i)))
            .collect();

        let terminal_names: BTreeSet<&str> = raw
            .iter()
            .flat_map(|(_, alternatives)| alternatives.iter().flatten().copied())
            .filter(|s| *s != EPSILON && !nonterminal_ids.contains_key(*s))
            .collect();
        let mut terminals: Vec<String> = terminal_names.into_iter().map(str::to_string).collect();
        terminals.push(END_MARKER.to_string());
        let terminal_ids: FxHashMap<String, TerminalId> = terminals
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), TerminalId(i)))
            .collect();

        let mut productions = Vec::new();
        let mut rules = Vec::with_capacity(raw.len());
        for (nt, (_, alternatives)) in raw.iter().enumerate() {
            let begin = productions.len();
            for symbols in alternatives {
                let rhs = symbols
                    .iter()
                    .filter(|s| **s != EPSILON)
                    .map(|s| match nonterminal_ids.get(*s) {
                        Some(&id) => Symbol::Nonterminal(id),
                        None => Symbol::Terminal(terminal_ids[*s]),
                    })
                    .collect();
                productions.push(Production {
                    id: ProductionId(productions.len() + 1),
                    lhs: NonterminalId(nt),
                    rhs,
                });
            }
            rules.push(begin..productions.len());
        }

        log::debug!(
            "loaded grammar: {} nonterminals, {} terminals, {} productions",
            nonterminals.len(),
            terminals.len(),
            productions.len()
        );

        Ok(Grammar {
            nonterminals,
            terminals,
            nonterminal_ids,
            terminal_ids,
            productions,
            rules,
        })
    }

    /// Inline every unit production `A->B` with B's alternatives, at the
    /// position the unit production held, until none remain. Nonterminal
    /// order and terminals are kept; productions are renumbered.
    ///
    /// A unit production that would reintroduce an already inlined
    /// nonterminal (a cycle such as `a->b`, `b->a`) is dropped, as are
    /// alternatives the nonterminal already has.
    pub fn remove_unit_productions(&self) -> Grammar {
        let mut bodies: Vec<Vec<Vec<Symbol>>> = (0..self.nonterminals.len())
            .map(|nt| {
                self.rules(NonterminalId(nt))
                    .iter()
                    .map(|p| p.rhs.clone())
                    .collect()
            })
            .collect();

        let mut inlined = 0;
        for nt in 0..bodies.len() {
            let mut expanded: FxHashSet<NonterminalId> = FxHashSet::default();
            expanded.insert(NonterminalId(nt));
            let mut i = 0;
            while i < bodies[nt].len() {
                let target = match bodies[nt][i].as_slice() {
                    [Symbol::Nonterminal(target)] => *target,
                    _ => {
                        i += 1;
                        continue;
                    }
                };
                bodies[nt].remove(i);
                if !expanded.insert(target) {
                    continue;
                }
                let replacement: Vec<Vec<Symbol>> = bodies[target.0]
                    .iter()
                    .filter(|body| !bodies[nt].contains(*body))
                    .cloned()
                    .collect();
                for (offset, body) in replacement.into_iter().enumerate() {
                    bodies[nt].insert(i + offset, body);
                }
                inlined += 1;
            }
        }

        let mut productions = Vec::new();
        let mut rules = Vec::with_capacity(bodies.len());
        for (nt, alternatives) in bodies.into_iter().enumerate() {
            let begin = productions.len();
            for rhs in alternatives {
                productions.push(Production {
                    id: ProductionId(productions.len() + 1),
                    lhs: NonterminalId(nt),
                    rhs,
                });
            }
            rules.push(begin..productions.len());
        }
        log::debug!(
            "inlined {} unit production(s), {} productions remain",
            inlined,
            productions.len()
        );

        Grammar {
            nonterminals: self.nonterminals.clone(),
            terminals: self.terminals.clone(),
            nonterminal_ids: self.nonterminal_ids.clone(),
            terminal_ids: self.terminal_ids.clone(),
            productions,
            rules,
        }
    }

    /// The bundled C-minus grammar.
    pub fn cminus() -> Result<Grammar, GrammarLoadError> {
        Grammar::parse(CMINUS_GRAMMAR)
    }

    pub fn start(&self) -> NonterminalId {
        NonterminalId(0)
    }

    pub fn end_marker(&self) -> TerminalId {
        TerminalId(self.terminals.len() - 1)
    }

    /// Nonterminal names in declaration order.
    pub fn nonterminals(&self) -> &[String] {
        &self.nonterminals
    }

    /// Terminal names in table column order (end marker last).
    pub fn terminals(&self) -> &[String] {
        &self.terminals
    }

    pub fn nonterminal_id(&self, name: &str) -> Option<NonterminalId> {
        self.nonterminal_ids.get(name).copied()
    }

    pub fn terminal_id(&self, name: &str) -> Option<TerminalId> {
        self.terminal_ids.get(name).copied()
    }

    pub fn nonterminal_name(&self, id: NonterminalId) -> &str {
        &self.nonterminals[id.0]
    }

    pub fn terminal_name(&self, id: TerminalId) -> &str {
        &self.terminals[id.0]
    }

    pub fn symbol_name(&self, symbol: Symbol) -> &str {
        match symbol {
            Symbol::Terminal(t) => self.terminal_name(t),
            Symbol::Nonterminal(n) => self.nonterminal_name(n),
        }
    }

    /// The flat production table, numbered from 1.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, id: ProductionId) -> &Production {
        &self.productions[id.0 - 1]
    }

    /// Productions of one nonterminal, in declaration order.
    pub fn rules(&self, nt: NonterminalId) -> &[Production] {
        &self.productions[self.rules[nt.0].clone()]
    }

    /// `lhs->a b c`, or `lhs->ε` for the empty production.
    pub fn render_production(&self, production: &Production) -> String {
        let body = if production.is_epsilon() {
            EPSILON.to_string()
        } else {
            production
                .rhs
                .iter()
                .map(|s| self.symbol_name(*s))
                .collect::<Vec<_>>()
                .join(" ")
        };
        format!("{}->{}", self.nonterminal_name(production.lhs), body)
    }

    /// Print the grammar back in its input format.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, name) in self.nonterminals.iter().enumerate() {
            let alternatives: Vec<String> = self
                .rules(NonterminalId(i))
                .iter()
                .map(|p| {
                    let rendered = self.render_production(p);
                    rendered[name.len() + SEPARATOR.len()..].to_string()
                })
                .collect();
            out.push_str(&format!("{}->{}\n", name, alternatives.join(" | ")));
        }
        out
    }
}

/// Everything derived from a grammar: sets and the parse table
#[derive(Debug, Clone)]
pub struct Analysis {
    pub first: FirstSets,
    pub follow: FollowSets,
    pub first_plus: FirstPlusSets,
    pub table: ParseTable,
}

impl Analysis {
    pub fn run(grammar: &Grammar, config: &AnalyzerConfig) -> Result<Analysis, ConflictError> {
        let first = FirstSets::compute(grammar);
        let follow = FollowSets::compute(grammar, &first, config.follow);
        let first_plus =
            FirstPlusSets::compute(grammar, &first, &follow, config.dangling_else.as_ref());
        let table = ParseTable::build(grammar, &first_plus, config.conflicts)?;
        Ok(Analysis {
            first,
            follow,
            first_plus,
            table,
        })
    }

    /// `FIRST(X) = {...}` listings for FIRST, FOLLOW and FIRST+.
    pub fn render_sets(&self, grammar: &Grammar) -> String {
        let names = |set: &mut dyn Iterator<Item = TerminalId>| {
            let mut names: Vec<&str> = set.map(|t| grammar.terminal_name(t)).collect();
            names.sort_unstable();
            names
        };

        let mut out = String::new();
        for (i, nt) in grammar.nonterminals().iter().enumerate() {
            let set = self.first.of_nonterminal(NonterminalId(i));
            let mut members = names(&mut set.terminals());
            if set.has_epsilon() {
                members.push(EPSILON);
            }
            out.push_str(&format!("FIRST({}) = {{{}}}\n", nt, members.join(", ")));
        }
        out.push('\n');
        for (i, nt) in grammar.nonterminals().iter().enumerate() {
            let members = names(&mut self.follow.get(NonterminalId(i)).iter().copied());
            out.push_str(&format!("FOLLOW({}) = {{{}}}\n", nt, members.join(", ")));
        }
        out.push('\n');
        for production in grammar.productions() {
            let members = names(&mut self.first_plus.get(production.id).iter().copied());
            out.push_str(&format!(
                "FIRST+({}) = {{{}}}\n",
                grammar.render_production(production),
                members.join(", ")
            ));
        }
        out
    }
}
