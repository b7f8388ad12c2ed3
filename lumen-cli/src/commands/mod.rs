//! CLI command implementations.

pub mod compile;
pub mod eval;
pub mod repl;
