//! Lexical scope tracking
//!
//! The scope set holds `(name, level)` pairs for every variable and parameter
//! currently visible. Closing a block at depth `d` purges every pair declared
//! at `Block(d)` or deeper. Globals live at [`ScopeLevel::Global`], which sorts
//! below every block and is never purged.

use rustc_hash::FxHashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeLevel {
    Global,
    Block(u32),
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeLevel::Global => f.write_str("global"),
            ScopeLevel::Block(depth) => write!(f, "{}", depth),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSet {
    entries: FxHashSet<(String, ScopeLevel)>,
}

impl ScopeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, level: ScopeLevel) {
        self.entries.insert((name.to_string(), level));
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Drop every entry declared at `Block(depth)` or deeper.
    pub fn purge_from(&mut self, depth: u32) {
        let floor = ScopeLevel::Block(depth);
        let before = self.entries.len();
        self.entries.retain(|(_, level)| *level < floor);
        log::trace!(
            "scope: purged {} entr(ies) at depth >= {}",
            before - self.entries.len(),
            depth
        );
    }

    /// Entries ordered by level, then name.
    pub fn sorted(&self) -> Vec<(String, ScopeLevel)> {
        let mut entries: Vec<(String, ScopeLevel)> = self.entries.iter().cloned().collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_sorts_below_blocks() {
        assert!(ScopeLevel::Global < ScopeLevel::Block(0));
        assert!(ScopeLevel::Block(1) < ScopeLevel::Block(2));
    }

    #[test]
    fn test_purge_keeps_outer_levels() {
        let mut scopes = ScopeSet::new();
        scopes.declare("g", ScopeLevel::Global);
        scopes.declare("a", ScopeLevel::Block(1));
        scopes.declare("b", ScopeLevel::Block(2));
        scopes.declare("c", ScopeLevel::Block(3));

        scopes.purge_from(2);
        assert!(scopes.is_visible("g"));
        assert!(scopes.is_visible("a"));
        assert!(!scopes.is_visible("b"));
        assert!(!scopes.is_visible("c"));

        scopes.purge_from(1);
        assert!(!scopes.is_visible("a"));
        assert_eq!(scopes.sorted(), vec![("g".to_string(), ScopeLevel::Global)]);
    }

    #[test]
    fn test_shadowed_name_survives_inner_purge() {
        let mut scopes = ScopeSet::new();
        scopes.declare("x", ScopeLevel::Block(1));
        scopes.declare("x", ScopeLevel::Block(2));
        assert_eq!(scopes.len(), 2);
        scopes.purge_from(2);
        assert!(scopes.is_visible("x"));
    }
}
