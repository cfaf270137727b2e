//! Tunables for grammar analysis and parse tracing

/// Memory budget for the recorded parse history (64 MB)
pub const TRACE_MEMORY_LIMIT: usize = 64 * 1024 * 1024;

/// Sweep count used by the compatibility FOLLOW computation
pub const COMPAT_FOLLOW_SWEEPS: usize = 5;

/// How FOLLOW sets are iterated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowStrategy {
    /// Repeat full passes until no set changes
    FixedPoint,
    /// Run exactly this many passes, fixed point or not
    Sweeps(usize),
}

/// What to do when two productions claim the same parse-table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Collect every conflict and fail the build
    Reject,
    /// Log a warning and let the later production overwrite the cell
    LastWins,
}

/// Resolution of the dangling-else ambiguity: `terminal` is removed from the
/// selection set of the ε-production of `nonterminal`, so an `else` always
/// binds to the nearest `if`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingElse {
    pub nonterminal: String,
    pub terminal: String,
}

impl Default for DanglingElse {
    fn default() -> Self {
        DanglingElse {
            nonterminal: "else_part".to_string(),
            terminal: "else".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub follow: FollowStrategy,
    pub conflicts: ConflictPolicy,
    pub dangling_else: Option<DanglingElse>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            follow: FollowStrategy::FixedPoint,
            conflicts: ConflictPolicy::Reject,
            dangling_else: Some(DanglingElse::default()),
        }
    }
}

impl AnalyzerConfig {
    /// Fixed FOLLOW sweep count and last-wins conflicts, for reproducing
    /// tables built by older tooling cell for cell.
    pub fn compat() -> Self {
        AnalyzerConfig {
            follow: FollowStrategy::Sweeps(COMPAT_FOLLOW_SWEEPS),
            conflicts: ConflictPolicy::LastWins,
            ..AnalyzerConfig::default()
        }
    }
}
