//! Unified error handling for proctree
//!
//! Every failure surfaced to the binary goes through [`ProctreeError`], which
//! carries its own category, severity, user-facing message and exit code.

use std::io;
use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum ProctreeError {
    /// The process table could not be read at all
    #[error("Process source unavailable ({source_name}): {message}")]
    SourceUnavailable {
        source_name: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The source answered, but with zero records
    #[error("Process source {source_name} returned no records")]
    EmptySnapshot { source_name: String },

    /// A parent-pid chain leads back onto the path being walked
    #[error("Cyclic parentage: pid {pid} (ppid {parent_pid}) is already an ancestor")]
    CyclicParentage { pid: u32, parent_pid: u32 },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        value: Option<String>,
    },

    /// Filesystem errors
    #[error("Filesystem error: {message} (path: {path})")]
    Filesystem {
        message: String,
        path: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ProctreeError {
    /// Get error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProctreeError::SourceUnavailable { .. } | ProctreeError::EmptySnapshot { .. } => {
                ErrorCategory::Source
            }
            ProctreeError::CyclicParentage { .. } => ErrorCategory::Tree,
            ProctreeError::Config { .. } => ErrorCategory::Config,
            ProctreeError::Validation { .. } => ErrorCategory::Validation,
            ProctreeError::Filesystem { .. } => ErrorCategory::Filesystem,
        }
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ProctreeError::SourceUnavailable { .. } => ErrorSeverity::High,
            ProctreeError::EmptySnapshot { .. } => ErrorSeverity::Medium,
            ProctreeError::CyclicParentage { .. } => ErrorSeverity::Low,
            ProctreeError::Config { .. } => ErrorSeverity::High,
            ProctreeError::Validation { .. } => ErrorSeverity::Low,
            ProctreeError::Filesystem { .. } => ErrorSeverity::Medium,
        }
    }

    /// Process exit status for the binary
    pub fn exit_code(&self) -> u8 {
        match self {
            ProctreeError::EmptySnapshot { .. } => 2,
            ProctreeError::CyclicParentage { .. } => 3,
            _ => 1,
        }
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            ProctreeError::SourceUnavailable {
                source_name,
                message,
                ..
            } => format!("Could not read the process table via {}: {}", source_name, message),
            ProctreeError::EmptySnapshot { .. } => {
                "No process information retrieved. This might happen on unsupported systems or due to permissions."
                    .to_string()
            }
            ProctreeError::CyclicParentage { pid, parent_pid } => format!(
                "Process {} (parent {}) loops back into its own ancestry; its subtree was skipped",
                pid, parent_pid
            ),
            ProctreeError::Config { message, .. } => {
                format!("Configuration problem: {}", message)
            }
            ProctreeError::Validation { message, .. } => {
                format!("Input validation failed: {}", message)
            }
            ProctreeError::Filesystem { message, .. } => {
                format!("File system problem: {}", message)
            }
        }
    }

    /// The reader of our output went away (`proctree | head`)
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            ProctreeError::Filesystem {
                source: Some(source),
                ..
            } => source
                .downcast_ref::<io::Error>()
                .is_some_and(|err| err.kind() == io::ErrorKind::BrokenPipe),
            _ => false,
        }
    }

    /// Actionable hint shown under the message, if any
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ProctreeError::SourceUnavailable { .. } => {
                Some("Run on Linux/macOS, or point --proc-dir at a readable procfs mount.")
            }
            ProctreeError::EmptySnapshot { .. } => {
                Some("Check that the proc directory is mounted and readable by this user.")
            }
            ProctreeError::Config { .. } => {
                Some("Fix or remove the JSON settings file (see --config / PROCTREE_CONFIG).")
            }
            ProctreeError::Filesystem { .. } => {
                Some("Ensure the path exists and proctree has permission to read/write it.")
            }
            ProctreeError::CyclicParentage { .. } | ProctreeError::Validation { .. } => None,
        }
    }
}

impl From<io::Error> for ProctreeError {
    fn from(err: io::Error) -> Self {
        ProctreeError::Filesystem {
            message: format!("I/O error: {err}"),
            path: "<io>".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Source,
    Tree,
    Config,
    Validation,
    Filesystem,
}

impl ErrorCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            ErrorCategory::Source => "Process source",
            ErrorCategory::Tree => "Process tree",
            ErrorCategory::Config => "Configuration",
            ErrorCategory::Validation => "Validation",
            ErrorCategory::Filesystem => "Filesystem",
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
}

/// Result type alias for convenience
pub type ProctreeResult<T> = Result<T, ProctreeError>;

/// Convenience functions for creating common errors
pub mod errors {
    use super::*;

    pub fn source_unavailable(
        source_name: impl Into<String>,
        message: impl Into<String>,
    ) -> ProctreeError {
        ProctreeError::SourceUnavailable {
            source_name: source_name.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn source_unavailable_with_source(
        source_name: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> ProctreeError {
        ProctreeError::SourceUnavailable {
            source_name: source_name.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn config_error(message: impl Into<String>, path: Option<String>) -> ProctreeError {
        ProctreeError::Config {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn validation_error(
        message: impl Into<String>,
        field: Option<String>,
        value: Option<String>,
    ) -> ProctreeError {
        ProctreeError::Validation {
            message: message.into(),
            field,
            value,
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> ProctreeError {
        ProctreeError::Filesystem {
            message: message.into(),
            path: path.into(),
            source: Some(Box::new(source)),
        }
    }
}
