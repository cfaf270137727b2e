// Parse history for step-by-step replay

use crate::grammar::ProductionId;
use crate::parser::scope::ScopeLevel;
use crate::parser::semantic::SemanticContext;
use crate::parser::symtab::SymbolEntry;
use std::fmt;
use thiserror::Error;

/// What the driver did in one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Terminal on top of the stack matched the current token
    Match { terminal: String },
    /// Nonterminal on top was replaced by a production body
    Expand { production: ProductionId, rule: String },
    Accept,
    Reject { message: String },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Match { terminal } => write!(f, "match {}", terminal),
            Action::Expand { production, rule } => write!(f, "expand p{}: {}", production, rule),
            Action::Accept => f.write_str("accept"),
            Action::Reject { message } => write!(f, "reject: {}", message),
        }
    }
}

/// Parser state captured before a step
#[derive(Debug, Clone)]
pub struct ParseSnapshot {
    pub step: usize,
    /// Stack contents, bottom first
    pub stack: Vec<String>,
    pub cursor: usize,
    /// Current token as it appeared in the source
    pub token: String,
    pub line: usize,
    pub context: SemanticContext,
    pub depth: u32,
    pub scopes: Vec<(String, ScopeLevel)>,
    pub symbols: Vec<SymbolEntry>,
    pub action: Action,
}

impl ParseSnapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        let strings: usize = self.stack.iter().map(|s| s.len() + 24).sum::<usize>()
            + self.scopes.iter().map(|(s, _)| s.len() + 32).sum::<usize>()
            + self.symbols.iter().map(|e| e.name.len() + 40).sum::<usize>();
        std::mem::size_of::<ParseSnapshot>() + strings + self.token.len()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("trace memory limit exceeded: {used} + {needed} > {limit}")]
pub struct TraceLimitExceeded {
    pub used: usize,
    pub needed: usize,
    pub limit: usize,
}

/// Recorded parse history with a memory budget
#[derive(Debug)]
pub struct Trace {
    snapshots: Vec<ParseSnapshot>,
    max_memory: usize,
    current_memory: usize,
    truncated: bool,
}

impl Trace {
    pub fn new(max_memory: usize) -> Self {
        Trace {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
            truncated: false,
        }
    }

    /// Add a snapshot to history. Once the budget is exhausted the trace is
    /// marked truncated and nothing more is stored.
    pub fn push(&mut self, snapshot: ParseSnapshot) -> Result<(), TraceLimitExceeded> {
        let snapshot_size = snapshot.estimated_size();

        if self.truncated || self.current_memory + snapshot_size > self.max_memory {
            self.truncated = true;
            return Err(TraceLimitExceeded {
                used: self.current_memory,
                needed: snapshot_size,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&ParseSnapshot> {
        self.snapshots.get(index)
    }

    pub fn last(&self) -> Option<&ParseSnapshot> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// True if the parse ran past the memory budget
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}
