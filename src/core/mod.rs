//! Core process logic
//!
//! Process records, the sources that produce them, and tree rendering

pub mod models;
pub mod process_source;
pub mod process_tree;
