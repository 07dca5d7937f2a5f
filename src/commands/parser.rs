//! Command-line parsing
//!
//! Defines the CLI with clap derive. Running without a subcommand prints the
//! process tree from the sentinel root.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

/// Output format for the tree command
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented `+--` lines
    #[default]
    Text,
    /// Nested JSON with snapshot metadata
    Json,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeArgs {
    /// PID to start from (default: 0, the top of the hierarchy)
    #[arg(long, value_name = "PID")]
    pub root: Option<u32>,

    /// Deepest level to print; 0 shows only the root's direct children
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Read a procfs directory instead of querying the OS
    #[arg(long, value_name = "DIR")]
    pub proc_dir: Option<PathBuf>,

    /// Fail when cyclic parent links are found instead of only warning
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the process hierarchy (default)
    Tree(TreeArgs),

    /// Dispatch a request against the demo route table
    Dispatch {
        /// Request verb (GET, POST, PUT, DELETE; any case)
        verb: String,
        /// Exact request path
        path: String,
    },

    /// List the routes registered in the demo route table
    Routes,
}

/// proctree - process hierarchy printer and route table demo
#[derive(Parser, Debug, Clone)]
#[command(
    name = "proctree",
    about = "Print the parent/child process hierarchy",
    version,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Log filter (trace, debug, info, warn, error); defaults to RUST_LOG or warn
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Also append logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: ~/.proctree/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse process arguments (clap prints errors and exits on failure)
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse a custom argv (used by tests)
    pub fn try_parse_args_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }

    /// The subcommand to run, defaulting to `tree` with no flags
    pub fn resolved_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Tree(TreeArgs::default()))
    }
}
