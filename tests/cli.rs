//! End-to-end CLI behaviour

use assert_cmd::Command;
use predicates::prelude::*;
use proctree::commands::{Cli, Commands, OutputFormat, TreeArgs};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn parse(args: &[&str]) -> Cli {
    let argv = std::iter::once("proctree").chain(args.iter().copied());
    Cli::try_parse_args_from(argv).expect("expected command parsing to succeed")
}

/// Isolated settings file so the caller's ~/.proctree does not leak in
fn settings_dir() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.json"), "{}").unwrap();
    dir
}

fn proctree(settings: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("proctree").unwrap();
    cmd.env_remove("PROCTREE_PROC_DIR")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(settings.path().join("config.json"));
    cmd
}

fn fake_proc(entries: &[(u32, u32, &str)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (pid, ppid, name) in entries {
        write_stat(dir.path(), *pid, &format!("{pid} ({name}) S {ppid} 0 0 0"));
    }
    dir
}

fn write_stat(root: &Path, pid: u32, line: &str) {
    let dir = root.join(pid.to_string());
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("stat"), line).unwrap();
}

#[test]
fn no_subcommand_defaults_to_tree() {
    let cli = parse(&[]);
    assert_eq!(cli.resolved_command(), Commands::Tree(TreeArgs::default()));
}

#[test]
fn parses_tree_flags() {
    let cli = parse(&[
        "tree",
        "--root",
        "1",
        "--max-depth",
        "2",
        "--format",
        "json",
        "--strict",
        "--log-level",
        "debug",
    ]);
    match cli.resolved_command() {
        Commands::Tree(args) => {
            assert_eq!(args.root, Some(1));
            assert_eq!(args.max_depth, Some(2));
            assert_eq!(args.format, OutputFormat::Json);
            assert!(args.strict);
        }
        other => panic!("expected tree command, got {other:?}"),
    }
    assert_eq!(cli.log_level.as_deref(), Some("debug"));
}

#[test]
fn parses_dispatch() {
    match parse(&["dispatch", "get", "/about"]).resolved_command() {
        Commands::Dispatch { verb, path } => {
            assert_eq!(verb, "get");
            assert_eq!(path, "/about");
        }
        other => panic!("expected dispatch command, got {other:?}"),
    }
}

#[test]
fn prints_tree_from_proc_dir() {
    let settings = settings_dir();
    let proc_dir = fake_proc(&[(1, 0, "init"), (2, 1, "shell"), (3, 1, "editor"), (4, 2, "child")]);

    proctree(&settings)
        .arg("tree")
        .arg("--proc-dir")
        .arg(proc_dir.path())
        .assert()
        .success()
        .stdout(
            "Root (System) (PID: 0, PPID: 0)\n\
             +-- init (PID: 1, PPID: 0)\n\
             \x20 +-- shell (PID: 2, PPID: 1)\n\
             \x20   +-- child (PID: 4, PPID: 2)\n\
             \x20 +-- editor (PID: 3, PPID: 1)\n",
        );
}

#[test]
fn empty_proc_dir_exits_with_code_2() {
    let settings = settings_dir();
    let proc_dir = tempdir().unwrap();

    proctree(&settings)
        .arg("tree")
        .arg("--proc-dir")
        .arg(proc_dir.path())
        .assert()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains("No process information retrieved"));
}

#[test]
fn missing_proc_dir_exits_with_code_1() {
    let settings = settings_dir();
    let proc_dir = tempdir().unwrap();

    proctree(&settings)
        .arg("tree")
        .arg("--proc-dir")
        .arg(proc_dir.path().join("absent"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("procfs"));
}

#[test]
fn cycle_warns_by_default_and_fails_when_strict() {
    let settings = settings_dir();
    let proc_dir = fake_proc(&[(5, 6, "a"), (6, 5, "b")]);

    proctree(&settings)
        .args(["tree", "--root", "5", "--proc-dir"])
        .arg(proc_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("+-- b (PID: 6, PPID: 5)"))
        .stderr(predicate::str::contains("warning"));

    proctree(&settings)
        .args(["tree", "--root", "5", "--strict", "--proc-dir"])
        .arg(proc_dir.path())
        .assert()
        .code(3);
}

#[test]
fn json_output_is_nested() {
    let settings = settings_dir();
    let proc_dir = fake_proc(&[(1, 0, "init"), (2, 1, "shell")]);

    let output = proctree(&settings)
        .args(["tree", "--format", "json", "--proc-dir"])
        .arg(proc_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["source"], "procfs");
    assert_eq!(value["tree"][0]["children"][0]["name"], "shell");
}

#[test]
fn settings_file_supplies_proc_dir() {
    let proc_dir = fake_proc(&[(1, 0, "init")]);
    let settings = tempdir().unwrap();
    let config = serde_json::json!({ "proc_dir": proc_dir.path() });
    fs::write(settings.path().join("config.json"), config.to_string()).unwrap();

    proctree(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("+-- init (PID: 1, PPID: 0)"));
}

#[test]
fn broken_settings_file_fails() {
    let settings = tempdir().unwrap();
    fs::write(settings.path().join("config.json"), "{ nope").unwrap();

    proctree(&settings)
        .arg("routes")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration problem"));
}

#[test]
fn dispatch_against_demo_routes() {
    let settings = settings_dir();

    proctree(&settings)
        .args(["dispatch", "get", "/"])
        .assert()
        .success()
        .stdout("Welcome to the home page!\n");

    proctree(&settings)
        .args(["dispatch", "PUT", "/update"])
        .assert()
        .success()
        .stdout("404 Not Found\n");
}

#[test]
fn lists_demo_routes() {
    let settings = settings_dir();

    proctree(&settings)
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains("POST   /submit"));
}

#[cfg(unix)]
#[test]
fn closed_stdout_is_not_an_error() {
    use std::io::{BufRead, BufReader};
    use std::process::Stdio;

    let settings = settings_dir();
    let proc_dir = tempdir().unwrap();
    // Enough lines to overflow the pipe buffer once the reader is gone
    for pid in 1..=6000u32 {
        write_stat(proc_dir.path(), pid, &format!("{pid} (worker-process) S 0 0 0 0"));
    }

    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("proctree"))
        .env_remove("PROCTREE_PROC_DIR")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(settings.path().join("config.json"))
        .arg("tree")
        .arg("--proc-dir")
        .arg(proc_dir.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let mut first_line = String::new();
    BufReader::new(child.stdout.take().unwrap())
        .read_line(&mut first_line)
        .unwrap();
    assert_eq!(first_line, "Root (System) (PID: 0, PPID: 0)\n");

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).contains("Error:"));
}
