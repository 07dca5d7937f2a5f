//! ProcfsSource against fake procfs trees

use proctree::{ProcessRecord, ProcessRecordSource, ProcfsSource};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_stat(root: &Path, dir_name: &str, line: &str) {
    let dir = root.join(dir_name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("stat"), line).unwrap();
}

fn sorted(mut records: Vec<ProcessRecord>) -> Vec<ProcessRecord> {
    records.sort_by_key(|r| r.pid);
    records
}

#[test]
fn reads_numeric_directories_only() {
    let proc_dir = tempdir().unwrap();
    write_stat(proc_dir.path(), "1", "1 (init) S 0 1 1 0 -1");
    write_stat(proc_dir.path(), "42", "42 (bash) S 1 42 42 0 -1");
    write_stat(proc_dir.path(), "self", "42 (bash) S 1 42 42 0 -1");
    fs::write(proc_dir.path().join("uptime"), "123.45 67.89").unwrap();

    let snapshot = ProcfsSource::new(proc_dir.path()).fetch_all().unwrap();

    assert_eq!(snapshot.source, "procfs");
    assert_eq!(
        sorted(snapshot.records),
        vec![ProcessRecord::new(1, 0, "init"), ProcessRecord::new(42, 1, "bash")]
    );
}

#[test]
fn skips_unreadable_and_malformed_entries() {
    let proc_dir = tempdir().unwrap();
    write_stat(proc_dir.path(), "1", "1 (init) S 0 1 1 0 -1");
    write_stat(proc_dir.path(), "2", "garbage");
    write_stat(proc_dir.path(), "3", "4 (mismatch) S 1");
    // Exited between listing and reading: directory without stat
    fs::create_dir_all(proc_dir.path().join("5")).unwrap();

    let snapshot = ProcfsSource::new(proc_dir.path()).fetch_all().unwrap();
    assert_eq!(snapshot.records, vec![ProcessRecord::new(1, 0, "init")]);
}

#[test]
fn keeps_names_with_spaces_and_parentheses() {
    let proc_dir = tempdir().unwrap();
    write_stat(proc_dir.path(), "77", "77 (tmux: server (1)) S 1 77 77 0 -1");

    let snapshot = ProcfsSource::new(proc_dir.path()).fetch_all().unwrap();
    assert_eq!(snapshot.records[0].name, "tmux: server (1)");
    assert_eq!(snapshot.records[0].parent_pid, 1);
}

#[test]
fn empty_directory_gives_empty_snapshot() {
    let proc_dir = tempdir().unwrap();
    let snapshot = ProcfsSource::new(proc_dir.path()).fetch_all().unwrap();
    assert!(snapshot.is_empty());
}

#[test]
fn missing_directory_is_source_unavailable() {
    let proc_dir = tempdir().unwrap();
    let missing = proc_dir.path().join("not-here");
    let err = ProcfsSource::new(missing).fetch_all().unwrap_err();
    assert!(matches!(
        err,
        proctree::ProctreeError::SourceUnavailable { .. }
    ));
}

#[test]
fn non_utf8_name_keeps_the_process_and_its_children() {
    let proc_dir = tempdir().unwrap();
    write_stat(proc_dir.path(), "1", "1 (init) S 0 1 1 0 -1");
    let dir = proc_dir.path().join("2");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("stat"), b"2 (bad\xffname) S 1 2 2 0 -1").unwrap();
    write_stat(proc_dir.path(), "3", "3 (child) S 2 3 3 0 -1");

    let snapshot = ProcfsSource::new(proc_dir.path()).fetch_all().unwrap();
    let records = sorted(snapshot.records);
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].name, "bad\u{FFFD}name");
    assert_eq!(records[1].parent_pid, 1);

    let lines = proctree::render(&records, 0).lines();
    assert_eq!(
        lines,
        vec![
            "Root (System) (PID: 0, PPID: 0)".to_string(),
            "+-- init (PID: 1, PPID: 0)".to_string(),
            "  +-- bad\u{FFFD}name (PID: 2, PPID: 1)".to_string(),
            "    +-- child (PID: 3, PPID: 2)".to_string(),
        ]
    );
}
