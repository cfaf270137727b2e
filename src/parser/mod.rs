//! Predictive parser with scope-aware semantic checks
//!
//! - [`driver`]: the LL(1) stack machine
//! - [`semantic`]: identifier actions keyed by grammatical context
//! - [`symtab`]: per-identifier roles
//! - [`scope`]: visible `(name, level)` pairs
//! - [`diagnostics`]: messages for parse-table rejections
//!
//! The parser does not build a tree. It accepts or rejects the token stream
//! and leaves the resolved [`symtab::SymbolTable`] behind.

pub mod diagnostics;
pub mod driver;
pub mod scope;
pub mod semantic;
pub mod symtab;

pub use driver::{parse, parse_traced, Parser, ParserState};
pub use symtab::{Role, SymbolTable, TypeSpec};
