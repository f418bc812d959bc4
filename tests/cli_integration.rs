//! Integration tests for the `tuck` CLI.
//!
//! Each test points `tuck` at a temp data directory, runs it as a
//! subprocess, and checks stdout, stderr and the stored files.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Get the path to the built `tuck` binary.
fn tuck_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tuck");
    path
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(tuck_bin())
        .arg("--data-dir")
        .arg(dir)
        .args(args)
        .env_remove("TUCK_DIR")
        .env_remove("TUCK_LOG")
        .output()
        .unwrap()
}

/// Run and expect success; returns stdout.
fn tuck(dir: &Path, args: &[&str]) -> String {
    let out = run(dir, args);
    assert!(
        out.status.success(),
        "tuck {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).unwrap()
}

/// Run and expect failure; returns stderr.
fn tuck_err(dir: &Path, args: &[&str]) -> String {
    let out = run(dir, args);
    assert!(!out.status.success(), "tuck {:?} should have failed", args);
    String::from_utf8(out.stderr).unwrap()
}

fn stored(dir: &Path, key: &str) -> serde_json::Value {
    let raw = fs::read_to_string(dir.join(format!("{}.json", key))).unwrap();
    serde_json::from_str(&raw).unwrap()
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[test]
fn add_and_list() {
    let tmp = TempDir::new().unwrap();
    assert_eq!(tuck(tmp.path(), &["add", "buy", "milk"]), "Added \"buy milk\"\n");
    tuck(tmp.path(), &["add", "call mom"]);

    let out = tuck(tmp.path(), &["list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Tasks (2)");
    assert!(lines[1].starts_with("  1. [ ] call mom  ("));
    assert!(lines[2].starts_with("  2. [ ] buy milk  ("));

    let active = stored(tmp.path(), "activeTasks");
    assert_eq!(active[0]["title"], "call mom");
    assert!(active[0].get("completedAt").is_none());
}

#[test]
fn empty_list() {
    let tmp = TempDir::new().unwrap();
    let out = tuck(tmp.path(), &["list", "--all"]);
    assert!(out.contains("Tasks (0)"));
    assert!(out.contains("Archive (0)"));
}

#[test]
fn blank_title_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let err = tuck_err(tmp.path(), &["add", "   "]);
    assert!(err.contains("error: title cannot be empty"));
    assert!(!tmp.path().join("activeTasks.json").exists());
}

#[test]
fn done_and_restore_by_position() {
    let tmp = TempDir::new().unwrap();
    tuck(tmp.path(), &["add", "first"]);
    tuck(tmp.path(), &["add", "second"]);

    assert_eq!(tuck(tmp.path(), &["done", "2"]), "Archived \"first\"\n");
    let out = tuck(tmp.path(), &["list", "--archived"]);
    assert!(out.starts_with("Archive (1)\n"));
    assert!(out.contains("[x] first"));
    assert!(!out.contains("Tasks ("));
    assert!(stored(tmp.path(), "archivedTasks")[0]["completedAt"].is_i64());

    assert_eq!(tuck(tmp.path(), &["restore", "1"]), "Restored \"first\"\n");
    let out = tuck(tmp.path(), &["list"]);
    assert!(out.contains("  1. [ ] first"));
    assert_eq!(stored(tmp.path(), "archivedTasks"), serde_json::json!([]));
}

#[test]
fn done_by_id_prefix() {
    let tmp = TempDir::new().unwrap();
    tuck(tmp.path(), &["add", "only"]);
    let id = stored(tmp.path(), "activeTasks")[0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    tuck(tmp.path(), &["done", &id[..16]]);
    assert_eq!(stored(tmp.path(), "activeTasks"), serde_json::json!([]));
}

#[test]
fn unknown_reference_fails() {
    let tmp = TempDir::new().unwrap();
    tuck(tmp.path(), &["add", "one"]);
    let err = tuck_err(tmp.path(), &["done", "zzz"]);
    assert!(err.contains("no active task matches 'zzz'"));
    let err = tuck_err(tmp.path(), &["restore", "1"]);
    assert!(err.contains("no archived task matches '1'"));
}

#[test]
fn edit_renames() {
    let tmp = TempDir::new().unwrap();
    tuck(tmp.path(), &["add", "draft"]);
    assert_eq!(
        tuck(tmp.path(), &["edit", "1", "final", "title"]),
        "Renamed to \"final title\"\n"
    );
    assert_eq!(stored(tmp.path(), "activeTasks")[0]["title"], "final title");
}

#[test]
fn edit_to_blank_keeps_title() {
    let tmp = TempDir::new().unwrap();
    tuck(tmp.path(), &["add", "keep me"]);
    let err = tuck_err(tmp.path(), &["edit", "1", " "]);
    assert!(err.contains("title cannot be empty"));
    assert_eq!(stored(tmp.path(), "activeTasks")[0]["title"], "keep me");
}

#[test]
fn rm_from_each_collection() {
    let tmp = TempDir::new().unwrap();
    tuck(tmp.path(), &["add", "a"]);
    tuck(tmp.path(), &["add", "b"]);
    tuck(tmp.path(), &["done", "1"]);

    // "b" is archived, so it is not found in the active list
    tuck_err(tmp.path(), &["rm", "b"]);
    assert_eq!(tuck(tmp.path(), &["rm", "--archived", "1"]), "Deleted \"b\"\n");
    assert_eq!(tuck(tmp.path(), &["rm", "1"]), "Deleted \"a\"\n");
    assert_eq!(stored(tmp.path(), "activeTasks"), serde_json::json!([]));
    assert_eq!(stored(tmp.path(), "archivedTasks"), serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[test]
fn json_list_and_add() {
    let tmp = TempDir::new().unwrap();
    let added: serde_json::Value =
        serde_json::from_str(&tuck(tmp.path(), &["--json", "add", "x"])).unwrap();
    assert_eq!(added["title"], "x");
    assert_eq!(added["collection"], "active");
    assert_eq!(added["position"], 1);

    tuck(tmp.path(), &["done", "1"]);
    let list: serde_json::Value =
        serde_json::from_str(&tuck(tmp.path(), &["list", "--all", "--json"])).unwrap();
    assert_eq!(list["active"], serde_json::json!([]));
    assert_eq!(list["archived"][0]["title"], "x");
    assert_eq!(list["archived"][0]["collection"], "archived");
    assert!(list["archived"][0]["completedAt"].is_i64());
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[test]
fn theme_defaults_to_moss() {
    let tmp = TempDir::new().unwrap();
    let out = tuck(tmp.path(), &["theme"]);
    assert!(out.starts_with("theme: moss\n"));
}

#[test]
fn theme_set_and_custom() {
    let tmp = TempDir::new().unwrap();
    let out = tuck(tmp.path(), &["theme", "set", "Midnight"]);
    assert!(out.starts_with("theme: midnight"));
    assert_eq!(tuck(tmp.path(), &["theme", "show"]), out);

    tuck(
        tmp.path(),
        &[
            "theme", "custom", "--bg", "#101010", "--panel", "#202020", "--accent", "#ABCDEF",
            "--text", "#f0f0f0",
        ],
    );
    let theme: serde_json::Value =
        serde_json::from_str(&tuck(tmp.path(), &["theme", "--json"])).unwrap();
    assert_eq!(theme["name"], "custom");
    assert_eq!(theme["palette"]["accentColor"], "#abcdef");

    // Going back to a preset drops the custom palette
    tuck(tmp.path(), &["theme", "set", "stone"]);
    assert!(!tmp.path().join("customTheme.json").exists());
}

#[test]
fn theme_rejects_bad_input() {
    let tmp = TempDir::new().unwrap();
    let err = tuck_err(tmp.path(), &["theme", "set", "neon"]);
    assert!(err.contains("neon"));
    tuck_err(
        tmp.path(),
        &[
            "theme", "custom", "--bg", "black", "--panel", "#202020", "--accent", "#abcdef",
            "--text", "#f0f0f0",
        ],
    );
    assert!(!tmp.path().join("customTheme.json").exists());
}
