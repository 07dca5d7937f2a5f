/// PID that stands for "no parent"; records pointing at it are top-level.
pub const ROOT_SENTINEL_PID: u32 = 0;
pub const ROOT_LABEL: &str = "Root (System)";

// Two spaces per depth level, then the branch marker
pub const INDENT_UNIT: &str = "  ";
pub const BRANCH_MARKER: &str = "+-- ";

pub const NOT_FOUND_BODY: &str = "404 Not Found";

pub const DEFAULT_PROC_DIR: &str = "/proc";
pub const DEFAULT_LOG_FILTER: &str = "warn";

pub const CONFIG_ENV: &str = "PROCTREE_CONFIG";
pub const PROC_DIR_ENV: &str = "PROCTREE_PROC_DIR";

// Common constants used across modules
pub const CONFIG_DIRECTORY: &str = ".proctree";
pub const CONFIG_FILE_NAME: &str = "config.json";
