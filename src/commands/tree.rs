//! `proctree tree`

use super::parser::{OutputFormat, TreeArgs};
use crate::config::ROOT_SENTINEL_PID;
use crate::core::models::{ProcessNode, ProcessSnapshot};
use crate::core::process_source::{ProcessRecordSource, ProcfsSource, SystemSource};
use crate::core::process_tree::{render_with, CycleReport, RenderOptions, Rendering};
use crate::error::{ProctreeError, ProctreeResult};
use crate::utils::config_paths::Settings;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};
use tracing::info;

/// JSON shape of `--format json`
#[derive(Debug, Serialize)]
pub struct TreeDocument<'a> {
    pub captured_at: DateTime<Utc>,
    pub source: &'a str,
    pub root_pid: u32,
    pub process_count: usize,
    pub tree: Vec<ProcessNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cycles: Vec<CycleReport>,
}

/// CLI flags first, then settings, then built-in defaults
pub fn render_options(args: &TreeArgs, settings: &Settings) -> RenderOptions {
    let root_pid = args.root.or(settings.root_pid).unwrap_or(ROOT_SENTINEL_PID);
    RenderOptions::new(root_pid).with_max_depth(args.max_depth.or(settings.max_depth))
}

pub fn select_source(args: &TreeArgs, settings: &Settings) -> Box<dyn ProcessRecordSource> {
    match args.proc_dir.as_ref().or(settings.proc_dir.as_ref()) {
        Some(dir) => Box::new(ProcfsSource::new(dir)),
        None => Box::new(SystemSource::new()),
    }
}

/// Read a snapshot and render it; an empty snapshot is an error
pub fn build_tree(
    source: &dyn ProcessRecordSource,
    options: &RenderOptions,
) -> ProctreeResult<(ProcessSnapshot, Rendering)> {
    info!(source = source.name(), "Gathering process information...");
    let snapshot = source.fetch_all()?;
    if snapshot.is_empty() {
        return Err(ProctreeError::EmptySnapshot {
            source_name: source.name().to_string(),
        });
    }

    info!(processes = snapshot.len(), "Building process tree...");
    let rendering = render_with(&snapshot.records, options);
    Ok((snapshot, rendering))
}

pub fn write_tree(
    out: &mut dyn Write,
    format: OutputFormat,
    snapshot: &ProcessSnapshot,
    rendering: &Rendering,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => write!(out, "{rendering}"),
        OutputFormat::Json => {
            let document = TreeDocument {
                captured_at: snapshot.captured_at,
                source: &snapshot.source,
                root_pid: rendering.root_pid(),
                process_count: snapshot.len(),
                tree: rendering.to_nodes(),
                cycles: rendering.cycles().to_vec(),
            };
            serde_json::to_writer_pretty(&mut *out, &document)?;
            writeln!(out)
        }
    }
}

/// Run the tree command, writing the tree to `out`
///
/// Returns the cycles that were cut out of the output. With `--strict` the
/// first cycle becomes the error instead, after the tree has been written.
pub fn run(
    args: &TreeArgs,
    settings: &Settings,
    out: &mut dyn Write,
) -> ProctreeResult<Vec<CycleReport>> {
    let source = select_source(args, settings);
    let options = render_options(args, settings);
    let (snapshot, rendering) = build_tree(source.as_ref(), &options)?;

    write_tree(out, args.format, &snapshot, &rendering)?;

    if args.strict {
        rendering.ensure_acyclic()?;
    }
    Ok(rendering.cycles().to_vec())
}
