//! Utility modules
//!
//! Logging setup and settings file handling

pub mod config_paths;
pub mod logger;
