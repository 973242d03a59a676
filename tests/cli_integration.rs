//! Integration tests for the `scenes` CLI.
//!
//! Each test initializes a temp data directory, runs `scenes` as a
//! subprocess, and verifies stdout and/or the stored JSON.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pretty_assertions::assert_eq;

/// Get the path to the built `scenes` binary.
fn scenes_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("scenes");
    path
}

/// Run `scenes` with the given args in the given directory.
fn run_scenes(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(scenes_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run scenes");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `scenes` expecting success, return stdout.
fn run_scenes_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_scenes(dir, args);
    if !success {
        panic!(
            "scenes {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// A temp directory initialized with the sample data.
fn init_dir() -> tempfile::TempDir {
    let tmp = tempfile::TempDir::new().unwrap();
    run_scenes_ok(tmp.path(), &["init"]);
    tmp
}

fn stored_shot(dir: &Path, id: &str) -> serde_json::Value {
    let text = fs::read_to_string(dir.join("scenes.json")).unwrap();
    let data: serde_json::Value = serde_json::from_str(&text).unwrap();
    data["shots"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == id)
        .cloned()
        .unwrap_or(serde_json::Value::Null)
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_files() {
    let tmp = init_dir();
    assert!(tmp.path().join("scenes.toml").is_file());
    assert!(tmp.path().join("scenes.json").is_file());
}

#[test]
fn test_init_twice_needs_force() {
    let tmp = init_dir();
    let (_, stderr, success) = run_scenes(tmp.path(), &["init"]);
    assert!(!success);
    assert!(stderr.starts_with("error: "));
    assert!(stderr.contains("--force"));
    run_scenes_ok(tmp.path(), &["init", "--force"]);
}

#[test]
fn test_commands_need_a_data_dir() {
    let tmp = tempfile::TempDir::new().unwrap();
    let nested = tmp.path().join("empty");
    fs::create_dir(&nested).unwrap();
    let (_, stderr, success) = run_scenes(&nested, &["tree", "-C", "."]);
    assert!(!success);
    assert!(stderr.contains("not a scenes directory"));
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_tree() {
    let tmp = init_dir();
    let out = run_scenes_ok(tmp.path(), &["tree"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Northwind Kitchens (EAV001) proj-1");
    assert_eq!(lines[1], "  Brand Film vid-1");
    assert_eq!(lines[2], "    Script [approved] script-1");
    assert_eq!(
        lines[3],
        "      C1 Every great meal starts in a kitchen that works. comp-1"
    );
}

#[test]
fn test_tree_json() {
    let tmp = init_dir();
    let out = run_scenes_ok(tmp.path(), &["tree", "--json"]);
    let tree: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(tree[0]["videos"].as_array().unwrap().len(), 2);
    assert_eq!(tree[0]["videos"][0]["scripts"][0]["components"][2]["id"], "comp-3");
}

#[test]
fn test_options_for_one_field() {
    let tmp = init_dir();
    let out = run_scenes_ok(tmp.path(), &["options", "--field", "subject"]);
    assert_eq!(out, "subject: Presenter, Product, Hands, Screen, Other\n");
}

#[test]
fn test_options_unknown_field() {
    let tmp = init_dir();
    let (_, stderr, success) = run_scenes(tmp.path(), &["options", "--field", "lens"]);
    assert!(!success);
    assert!(stderr.contains("unknown field: lens"));
}

#[test]
fn test_shots() {
    let tmp = init_dir();
    let out = run_scenes_ok(tmp.path(), &["shots", "comp-1"]);
    assert_eq!(
        out,
        "[ ] 1. shot-1  WS / Kitchen / Dolly / Presenter  action: Walks to the island\n\
         [ ] 2. shot-2  CU / Other: Garden window / - / Hands\n"
    );
}

#[test]
fn test_shots_empty_component() {
    let tmp = init_dir();
    let out = run_scenes_ok(tmp.path(), &["shots", "comp-3"]);
    assert_eq!(out, "no shots for comp-3\n");
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[test]
fn test_add_appends_numbered_shot() {
    let tmp = init_dir();
    let out = run_scenes_ok(tmp.path(), &["add", "comp-1"]);
    assert_eq!(out.trim(), "shot-5");
    let shot = stored_shot(tmp.path(), "shot-5");
    assert_eq!(shot["shot_number"], 3);
    assert_eq!(shot["script_component_id"], "comp-1");
}

#[test]
fn test_add_unknown_component() {
    let tmp = init_dir();
    let (_, stderr, success) = run_scenes(tmp.path(), &["add", "comp-99"]);
    assert!(!success);
    assert!(stderr.contains("script component not found: comp-99"));
}

#[test]
fn test_set_canonical_option() {
    let tmp = init_dir();
    run_scenes_ok(tmp.path(), &["set", "shot-1", "shot_type", "  ecu "]);
    assert_eq!(stored_shot(tmp.path(), "shot-1")["shot_type"], "ECU");
}

#[test]
fn test_set_leaving_other_clears_custom_text() {
    let tmp = init_dir();
    run_scenes_ok(tmp.path(), &["set", "shot-2", "location", "Kitchen"]);
    let shot = stored_shot(tmp.path(), "shot-2");
    assert_eq!(shot["location_start_point"], "Kitchen");
    assert_eq!(shot["location_other"], serde_json::Value::Null);
}

#[test]
fn test_set_custom_value() {
    let tmp = init_dir();
    let (_, stderr, success) = run_scenes(tmp.path(), &["set", "shot-1", "location", "Roof"]);
    assert!(!success);
    assert!(stderr.contains("--other"));

    run_scenes_ok(tmp.path(), &["set", "shot-1", "location", "Roof", "--other"]);
    let shot = stored_shot(tmp.path(), "shot-1");
    assert_eq!(shot["location_start_point"], "Other");
    assert_eq!(shot["location_other"], "Roof");
}

#[test]
fn test_set_suggests_near_matches() {
    let tmp = init_dir();
    let (_, stderr, success) = run_scenes(tmp.path(), &["set", "shot-1", "location", "stan"]);
    assert!(!success);
    assert!(stderr.contains("did you mean: Standard, Stand-in?"));
}

#[test]
fn test_set_text_and_done() {
    let tmp = init_dir();
    run_scenes_ok(tmp.path(), &["set", "shot-2", "variant", "B-cam"]);
    run_scenes_ok(tmp.path(), &["set", "shot-2", "done", "yes"]);
    let out = run_scenes_ok(tmp.path(), &["shots", "comp-1", "--json"]);
    let shots: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(shots[1]["variant"], "B-cam");
    assert_eq!(shots[1]["done"], true);
}

#[test]
fn test_set_empty_value_clears() {
    let tmp = init_dir();
    run_scenes_ok(tmp.path(), &["set", "shot-1", "movement", ""]);
    assert_eq!(stored_shot(tmp.path(), "shot-1")["movement_type"], serde_json::Value::Null);
}

#[test]
fn test_delete() {
    let tmp = init_dir();
    let out = run_scenes_ok(tmp.path(), &["delete", "shot-2"]);
    assert_eq!(out, "deleted shot-2\n");
    assert_eq!(stored_shot(tmp.path(), "shot-2"), serde_json::Value::Null);

    let (_, stderr, success) = run_scenes(tmp.path(), &["delete", "shot-2"]);
    assert!(!success);
    assert_eq!(stderr, "error: shot not found: shot-2\n");
}

#[test]
fn test_data_dir_flag() {
    let tmp = init_dir();
    let other = tempfile::TempDir::new().unwrap();
    let dir = tmp.path().to_str().unwrap();
    let out = run_scenes_ok(other.path(), &["-C", dir, "shots", "comp-2"]);
    assert!(out.contains("shot-3"));
}
