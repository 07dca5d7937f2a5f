//! Process tree construction and rendering
//!
//! Records are grouped by parent pid once, then walked in pre-order from a
//! root pid. Children are always visited in ascending pid order. The walk
//! keeps its own stack and the list of pids on the current path, so a
//! parent chain that loops back on itself is cut off and reported instead of
//! recursing forever.

use crate::config::{BRANCH_MARKER, INDENT_UNIT, ROOT_LABEL, ROOT_SENTINEL_PID};
use crate::core::models::{ProcessNode, ProcessRecord};
use crate::error::{ProctreeError, ProctreeResult};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

/// Parent pid -> children sorted by pid
#[derive(Debug, Default)]
pub struct ChildIndex<'a> {
    children: HashMap<u32, Vec<&'a ProcessRecord>>,
}

impl<'a> ChildIndex<'a> {
    pub fn build(records: &'a [ProcessRecord]) -> Self {
        let mut children: HashMap<u32, Vec<&'a ProcessRecord>> = HashMap::new();
        for record in records {
            children.entry(record.parent_pid).or_default().push(record);
        }
        for siblings in children.values_mut() {
            siblings.sort_by_key(|record| record.pid);
        }
        Self { children }
    }

    pub fn children_of(&self, pid: u32) -> &[&'a ProcessRecord] {
        self.children.get(&pid).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Where to start and how deep to go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub root_pid: u32,
    /// Deepest level still printed; 0 means only the root's direct children
    pub max_depth: Option<usize>,
}

impl RenderOptions {
    pub fn new(root_pid: u32) -> Self {
        Self {
            root_pid,
            max_depth: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new(ROOT_SENTINEL_PID)
    }
}

/// One printed line of the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// 0 for direct children of the root
    pub depth: usize,
    pub record: ProcessRecord,
}

impl TreeEntry {
    pub fn line(&self) -> String {
        format!("{}{}{}", INDENT_UNIT.repeat(self.depth), BRANCH_MARKER, self.record)
    }
}

/// A child that pointed back at one of its own ancestors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub pid: u32,
    pub parent_pid: u32,
    /// Depth at which the repeated pid would have been printed
    pub depth: usize,
}

impl From<CycleReport> for ProctreeError {
    fn from(report: CycleReport) -> Self {
        ProctreeError::CyclicParentage {
            pid: report.pid,
            parent_pid: report.parent_pid,
        }
    }
}

/// Result of one render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    root_pid: u32,
    root_line: String,
    entries: Vec<TreeEntry>,
    cycles: Vec<CycleReport>,
}

impl Rendering {
    pub fn root_pid(&self) -> u32 {
        self.root_pid
    }

    pub fn root_line(&self) -> &str {
        &self.root_line
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn cycles(&self) -> &[CycleReport] {
        &self.cycles
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Root line followed by one line per visited process
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(self.root_line.clone())
            .chain(self.entries.iter().map(TreeEntry::line))
            .collect()
    }

    /// Fails with the first detected cycle, if there was one
    pub fn ensure_acyclic(&self) -> ProctreeResult<()> {
        match self.cycles.first() {
            Some(report) => Err((*report).into()),
            None => Ok(()),
        }
    }

    /// Rebuild the nested form of the walk; one node per direct root child
    pub fn to_nodes(&self) -> Vec<ProcessNode> {
        let mut roots = Vec::new();
        let mut open: Vec<ProcessNode> = Vec::new();

        for entry in &self.entries {
            while open.len() > entry.depth {
                close_last(&mut open, &mut roots);
            }
            open.push(ProcessNode::leaf(entry.record.clone()));
        }
        while !open.is_empty() {
            close_last(&mut open, &mut roots);
        }

        roots
    }
}

fn close_last(open: &mut Vec<ProcessNode>, roots: &mut Vec<ProcessNode>) {
    if let Some(node) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

impl fmt::Display for Rendering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.root_line)?;
        for entry in &self.entries {
            writeln!(f, "{}", entry.line())?;
        }
        Ok(())
    }
}

/// Render the tree below `root_pid`
pub fn render(records: &[ProcessRecord], root_pid: u32) -> Rendering {
    render_with(records, &RenderOptions::new(root_pid))
}

pub fn render_with(records: &[ProcessRecord], options: &RenderOptions) -> Rendering {
    debug!(
        records = records.len(),
        root_pid = options.root_pid,
        max_depth = ?options.max_depth,
        "Building process tree"
    );

    let index = ChildIndex::build(records);
    let mut entries = Vec::new();
    let mut cycles = Vec::new();

    // path[i] is the pid whose children stack[i] iterates. The sentinel is
    // not a process, so a pid-0 record below it is not a cycle.
    let mut path = vec![options.root_pid];
    let mut on_path = HashSet::new();
    if options.root_pid != ROOT_SENTINEL_PID {
        on_path.insert(options.root_pid);
    }
    let mut stack = vec![index.children_of(options.root_pid).iter()];

    while let Some(depth) = stack.len().checked_sub(1) {
        let Some(&child) = stack[depth].next() else {
            stack.pop();
            if let Some(pid) = path.pop() {
                on_path.remove(&pid);
            }
            continue;
        };

        if on_path.contains(&child.pid) {
            warn!(
                pid = child.pid,
                parent_pid = child.parent_pid,
                depth,
                "Cyclic parentage detected, skipping subtree"
            );
            cycles.push(CycleReport {
                pid: child.pid,
                parent_pid: child.parent_pid,
                depth,
            });
            continue;
        }

        entries.push(TreeEntry {
            depth,
            record: child.clone(),
        });

        // A pid-0 record's children are the top-level processes; print it as a leaf
        if child.pid == ROOT_SENTINEL_PID {
            continue;
        }

        if options.max_depth.map_or(true, |max| depth < max) {
            path.push(child.pid);
            on_path.insert(child.pid);
            stack.push(index.children_of(child.pid).iter());
        }
    }

    Rendering {
        root_pid: options.root_pid,
        root_line: root_line(records, options.root_pid),
        entries,
        cycles,
    }
}

fn root_line(records: &[ProcessRecord], root_pid: u32) -> String {
    if root_pid != ROOT_SENTINEL_PID {
        if let Some(record) = records.iter().find(|record| record.pid == root_pid) {
            return record.to_string();
        }
    }
    format!("{} (PID: {}, PPID: {})", ROOT_LABEL, root_pid, root_pid)
}
