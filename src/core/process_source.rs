//! Process record sources
//!
//! A source reads the host's process table once and hands back a flat
//! [`ProcessSnapshot`]. Entries that vanish or cannot be parsed mid-scan are
//! skipped; only failure to read the table as a whole is an error.
//!
//! Platform strategy:
//! - Unix: [`SystemSource`] goes through psutil
//! - Linux procfs mounts (including a host /proc bind-mounted elsewhere):
//!   [`ProcfsSource`] reads `<dir>/<pid>/stat` directly
//! - Anything else: [`SystemSource`] reports the source as unavailable

use crate::config::DEFAULT_PROC_DIR;
use crate::core::models::{ProcessRecord, ProcessSnapshot};
use crate::error::{errors, ProctreeResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Something that can list every process visible to the caller
pub trait ProcessRecordSource {
    /// Short label used in logs, errors and JSON output
    fn name(&self) -> &str;

    fn fetch_all(&self) -> ProctreeResult<ProcessSnapshot>;
}

/// The host process table via psutil
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSource;

impl SystemSource {
    pub const NAME: &'static str = "system";

    pub fn new() -> Self {
        Self
    }
}

impl ProcessRecordSource for SystemSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    #[cfg(unix)]
    fn fetch_all(&self) -> ProctreeResult<ProcessSnapshot> {
        let processes = psutil::process::processes().map_err(|err| {
            errors::source_unavailable_with_source(
                Self::NAME,
                "failed to enumerate processes",
                err,
            )
        })?;

        let mut records = Vec::with_capacity(processes.len());
        for process in processes {
            let process = match process {
                Ok(process) => process,
                Err(err) => {
                    debug!("Skipping process that could not be opened: {:?}", err);
                    continue;
                }
            };
            let pid = process.pid();
            let parent_pid = match process.ppid() {
                Ok(ppid) => ppid.unwrap_or(crate::config::ROOT_SENTINEL_PID),
                Err(err) => {
                    debug!(pid, "Skipping process without readable ppid: {:?}", err);
                    continue;
                }
            };
            let name = match process.name() {
                Ok(name) => name,
                Err(err) => {
                    debug!(pid, "Skipping process without readable name: {:?}", err);
                    continue;
                }
            };
            records.push(ProcessRecord::new(pid, parent_pid, name));
        }

        info!(count = records.len(), "Collected process records via psutil");
        Ok(ProcessSnapshot::new(Self::NAME, records))
    }

    #[cfg(not(unix))]
    fn fetch_all(&self) -> ProctreeResult<ProcessSnapshot> {
        Err(errors::source_unavailable(
            Self::NAME,
            "process enumeration is not supported on this platform",
        ))
    }
}

/// Reads a procfs-style directory tree: `<proc_dir>/<pid>/stat`
#[derive(Debug, Clone)]
pub struct ProcfsSource {
    proc_dir: PathBuf,
}

impl ProcfsSource {
    pub const NAME: &'static str = "procfs";

    pub fn new(proc_dir: impl Into<PathBuf>) -> Self {
        Self {
            proc_dir: proc_dir.into(),
        }
    }

    pub fn proc_dir(&self) -> &Path {
        &self.proc_dir
    }

    fn read_entry(&self, pid: u32, dir: &Path) -> Option<ProcessRecord> {
        let stat_path = dir.join("stat");
        // comm is raw bytes set by the process itself and need not be UTF-8
        let bytes = match fs::read(&stat_path) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(pid, path = %stat_path.display(), "Skipping unreadable stat file: {}", err);
                return None;
            }
        };

        let record = parse_stat_line(&String::from_utf8_lossy(&bytes));
        match record {
            Some(record) if record.pid == pid => Some(record),
            Some(record) => {
                debug!(pid, stat_pid = record.pid, "Skipping stat file with mismatched pid");
                None
            }
            None => {
                debug!(pid, "Skipping malformed stat line");
                None
            }
        }
    }
}

impl Default for ProcfsSource {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_DIR)
    }
}

impl ProcessRecordSource for ProcfsSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fetch_all(&self) -> ProctreeResult<ProcessSnapshot> {
        let entries = fs::read_dir(&self.proc_dir).map_err(|err| {
            errors::source_unavailable_with_source(
                Self::NAME,
                format!("cannot open {}", self.proc_dir.display()),
                err,
            )
        })?;

        let mut records = Vec::new();
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(pid) = file_name.to_str().and_then(parse_pid_dir_name) else {
                continue;
            };
            if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            if let Some(record) = self.read_entry(pid, &entry.path()) {
                records.push(record);
            }
        }

        info!(
            count = records.len(),
            proc_dir = %self.proc_dir.display(),
            "Collected process records from procfs"
        );
        Ok(ProcessSnapshot::new(Self::NAME, records))
    }
}

/// Fixed record list, for tests and for callers that already hold the data
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<ProcessRecord>,
}

impl StaticSource {
    pub const NAME: &'static str = "static";

    pub fn new(records: Vec<ProcessRecord>) -> Self {
        Self { records }
    }
}

impl ProcessRecordSource for StaticSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fetch_all(&self) -> ProctreeResult<ProcessSnapshot> {
        Ok(ProcessSnapshot::new(Self::NAME, self.records.clone()))
    }
}

fn parse_pid_dir_name(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// Parse the leading fields of a `/proc/<pid>/stat` line
///
/// Layout is `pid (comm) state ppid ...`. `comm` may itself contain spaces
/// and parentheses, so it runs from the first `(` to the last `)`.
pub fn parse_stat_line(line: &str) -> Option<ProcessRecord> {
    let open = line.find('(')?;
    let close = line.rfind(')')?;
    if close < open {
        return None;
    }

    let pid = line[..open].trim().parse().ok()?;
    let name = &line[open + 1..close];

    let mut rest = line[close + 1..].split_whitespace();
    let _state = rest.next()?;
    let parent_pid = rest.next()?.parse().ok()?;

    Some(ProcessRecord::new(pid, parent_pid, name))
}
