//! CLI command handling
//!
//! Argument parsing plus one module per subcommand

pub mod parser;
pub mod route;
pub mod tree;

// Re-exports (used by main.rs)
pub use parser::*;
