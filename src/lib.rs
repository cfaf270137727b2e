//! # Introduction
//!
//! A compiler front end for C-minus, a small C-like language. Source text is
//! scanned by a hand-written automaton, and a predictive parser driven by an
//! LL(1) table checks it. The table is generated from a textual grammar. The
//! parser resolves declarations and scopes as it goes and stops at the first
//! error.
//!
//! ## Pipeline
//!
//! ```text
//! Grammar text → Analysis → Parse table ─┐
//!                                         ├→ Parser → Symbol table
//! Source text  → Lexer    → Tokens ──────┘
//! ```
//!
//! 1. [`grammar`]: grammar loading, FIRST/FOLLOW/FIRST+ sets and the table.
//! 2. [`lexer`]: tokens plus number and identifier literal tables.
//! 3. [`parser`]: the stack machine, semantic actions and scope tracking.
//! 4. [`pipeline`]: the three phases behind one [`pipeline::Frontend`].
//! 5. [`snapshot`]: per-step parse history with a memory limit.
//! 6. [`ui`]: ratatui trace viewer; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use cminus::config::AnalyzerConfig;
//! use cminus::pipeline::Frontend;
//!
//! let frontend = Frontend::with_default_grammar(&AnalyzerConfig::default()).unwrap();
//! let outcome = frontend.check("int x; void main(void) { output x; }").unwrap();
//! assert_eq!(outcome.symbols.last_function().unwrap().name, "main");
//! ```

pub mod config;
pub mod errors;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod snapshot;
pub mod ui;
