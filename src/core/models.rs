//! Process data models
//!
//! Flat records as produced by a source, the snapshot that carries them, and
//! the nested node form used for structured output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One process as seen at snapshot time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub parent_pid: u32,
    pub name: String,
}

impl ProcessRecord {
    pub fn new(pid: u32, parent_pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            parent_pid,
            name: name.into(),
        }
    }
}

impl fmt::Display for ProcessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (PID: {}, PPID: {})",
            self.name, self.pid, self.parent_pid
        )
    }
}

/// A batch of records read in one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub captured_at: DateTime<Utc>,
    /// Name of the source that produced the batch
    pub source: String,
    pub records: Vec<ProcessRecord>,
}

impl ProcessSnapshot {
    pub fn new(source: impl Into<String>, records: Vec<ProcessRecord>) -> Self {
        Self {
            captured_at: Utc::now(),
            source: source.into(),
            records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// A record together with its ordered children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessNode {
    #[serde(flatten)]
    pub record: ProcessRecord,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ProcessNode>,
}

impl ProcessNode {
    pub fn leaf(record: ProcessRecord) -> Self {
        Self {
            record,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, self included
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ProcessNode::subtree_len)
            .sum::<usize>()
    }
}
