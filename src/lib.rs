//! proctree library
//!
//! Process hierarchy rendering over a pluggable process source, and a small
//! verb/path route table with a not-found fallback.

pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod router;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::models::{ProcessNode, ProcessRecord, ProcessSnapshot};
pub use core::process_source::{ProcessRecordSource, ProcfsSource, StaticSource, SystemSource};
pub use core::process_tree::{render, render_with, CycleReport, RenderOptions, Rendering};
pub use error::{ProctreeError, ProctreeResult};
pub use router::{HttpVerb, RouteTable, SharedRouteTable};
