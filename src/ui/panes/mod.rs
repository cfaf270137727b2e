//! TUI pane rendering modules
//!
//! - [`source`]: program text with the current token's line marked
//! - [`stack`]: the parser's symbol stack and the step's action
//! - [`symbols`]: visible scope entries and the symbol table
//! - [`status`]: step counter, keybindings and outcome
//!
//! Each module exports one stateless `render_*` function.

pub mod source;
pub mod stack;
pub mod status;
pub mod symbols;

pub use source::{render_source_pane, SourceScrollState};
pub use stack::render_stack_pane;
pub use status::render_status_bar;
pub use symbols::render_symbols_pane;
