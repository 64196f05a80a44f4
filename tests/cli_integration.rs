//! Integration tests for the `crib` CLI.
//!
//! Each test creates a temp data directory, runs `crib` as a subprocess
//! with `--data-dir`, and checks stdout, stderr and the files left behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Path to the built `crib` binary.
fn crib_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_crib"))
}

/// Run `crib` against `data_dir`, returning (stdout, stderr, success).
fn run_crib(data_dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(crib_bin())
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env_remove("TOOLCRIB_LOG")
        .output()
        .expect("failed to run crib");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `crib` expecting success, return stdout.
fn run_crib_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_crib(data_dir, args);
    if !success {
        panic!(
            "crib {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `crib` expecting failure, return stderr.
fn run_crib_err(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_crib(data_dir, args);
    if success {
        panic!("crib {:?} should have failed:\nstdout: {}", args, stdout);
    }
    stderr
}

fn show_json(data_dir: &Path) -> serde_json::Value {
    let out = run_crib_ok(data_dir, &["show", "--json"]);
    serde_json::from_str(&out).unwrap()
}

fn today_key() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

// ---------------------------------------------------------------------------
// init / config
// ---------------------------------------------------------------------------

#[test]
fn init_writes_commented_config() {
    let tmp = TempDir::new().unwrap();
    let out = run_crib_ok(tmp.path(), &["init"]);
    assert!(out.contains("config.toml"));

    let text = fs::read_to_string(tmp.path().join("config.toml")).unwrap();
    assert!(text.starts_with("# toolcrib configuration"));

    let err = run_crib_err(tmp.path(), &["init"]);
    assert!(err.starts_with("error: "));
    assert!(err.contains("already exists"));

    run_crib_ok(tmp.path(), &["init", "--force"]);
}

#[test]
fn config_set_changes_crew_count() {
    let tmp = TempDir::new().unwrap();
    run_crib_ok(tmp.path(), &["init"]);
    run_crib_ok(tmp.path(), &["config", "set", "crews.count", "3"]);

    let board = show_json(tmp.path());
    assert_eq!(board["crews"].as_array().unwrap().len(), 3);

    let text = fs::read_to_string(tmp.path().join("config.toml")).unwrap();
    assert!(text.contains("# Number of crew slots shown on the board"));
}

#[test]
fn config_set_rejects_bad_values() {
    let tmp = TempDir::new().unwrap();
    let err = run_crib_err(tmp.path(), &["config", "set", "crews.count", "0"]);
    assert!(err.contains("invalid value for crews.count"));
    let err = run_crib_err(tmp.path(), &["config", "set", "ui.theme", "dark"]);
    assert!(err.contains("unknown config key"));
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn fresh_data_dir_is_empty_board() {
    let tmp = TempDir::new().unwrap();
    let out = run_crib_ok(tmp.path(), &["show"]);
    assert!(out.contains("No tools checked out."));

    let out = run_crib_ok(tmp.path(), &["history"]);
    assert_eq!(out.trim(), "No saved history.");

    let board = show_json(tmp.path());
    assert_eq!(board["date"], today_key());
    assert_eq!(board["crews"].as_array().unwrap().len(), 8);
    let claw = board["available"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == "Claw Hammer")
        .unwrap();
    assert_eq!(claw["available"], 8);
}

#[test]
fn report_prints_and_saves() {
    let tmp = TempDir::new().unwrap();
    let out = run_crib_ok(tmp.path(), &["report"]);
    assert!(out.starts_with("TOOL CHECKOUT SHEET"));
    assert!(out.contains("Hammers: Claw Hammer 8/8"));

    let (stdout, stderr, success) = run_crib(tmp.path(), &["report", "--save"]);
    assert!(success);
    assert!(stderr.contains("Saved"));
    let path = tmp
        .path()
        .join("reports")
        .join(format!("{}.txt", today_key()));
    assert_eq!(fs::read_to_string(path).unwrap(), stdout);
}

#[test]
fn unknown_days_are_errors() {
    let tmp = TempDir::new().unwrap();
    let err = run_crib_err(tmp.path(), &["show", "2001-01-01"]);
    assert!(err.contains("no saved schedule for 2001-01-01"));
    let err = run_crib_err(tmp.path(), &["report", "yesterday"]);
    assert!(err.contains("invalid date"));
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[test]
fn add_tool_persists_and_archives() {
    let tmp = TempDir::new().unwrap();
    let out = run_crib_ok(tmp.path(), &["add", "Pry Bar", "4", "--category", "hammers"]);
    assert_eq!(out.trim(), "Added Pry Bar (4) to Hammers");

    let board = show_json(tmp.path());
    let pry = board["available"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == "Pry Bar")
        .unwrap();
    assert_eq!(pry["quantity"], 4);
    assert_eq!(pry["category"], "hammers");

    let history: serde_json::Value =
        serde_json::from_str(&run_crib_ok(tmp.path(), &["history", "--json"])).unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["date"], today_key());
}

#[test]
fn add_tool_validation() {
    let tmp = TempDir::new().unwrap();
    let err = run_crib_err(tmp.path(), &["add", "claw hammer", "2", "-c", "hammers"]);
    assert!(err.contains("already exists"));

    let err = run_crib_err(tmp.path(), &["add", "Shovel", "0", "-c", "hammers"]);
    assert!(err.contains("Quantity must be between 1 and 999"));

    let err = run_crib_err(tmp.path(), &["add", "Shovel", "2", "-c", "digging"]);
    assert!(err.contains("unknown category"));

    run_crib_ok(tmp.path(), &["add", "Shovel", "999", "-c", "safety"]);
}

/// Write a store value the way the file backend does: `<key>.json`.
fn seed(data_dir: &Path, key: &str, value: serde_json::Value) {
    fs::write(data_dir.join(format!("{}.json", key)), value.to_string()).unwrap();
}

#[test]
fn return_all_restores_seeded_checkouts() {
    let tmp = TempDir::new().unwrap();
    let today = today_key();
    seed(
        tmp.path(),
        "toolCheckoutSchedule",
        serde_json::json!({
            "date": today,
            "lastUpdateTimestamp": "",
            "checkouts": [{
                "crewId": 2,
                "tools": [
                    {"tool": "Claw Hammer", "number": 3, "time": "07:05"},
                    {"tool": "Tape Measure", "number": 1, "time": "07:10"}
                ]
            }],
            "broken": []
        }),
    );
    seed(tmp.path(), "toolCheckoutDate", serde_json::json!(today));

    let board = show_json(tmp.path());
    assert_eq!(board["crews"][1]["tools"].as_array().unwrap().len(), 2);

    let out = run_crib_ok(tmp.path(), &["return-all"]);
    assert_eq!(out.trim(), "Returned 2 tools to the crib");

    let board = show_json(tmp.path());
    assert!(board["crews"][1]["tools"].as_array().unwrap().is_empty());
    let claw = board["available"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == "Claw Hammer")
        .unwrap();
    assert_eq!(claw["available"], 8);

    let history: serde_json::Value =
        serde_json::from_str(&run_crib_ok(tmp.path(), &["history", "--json"])).unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["date"], today);
    assert_eq!(history[0]["tools_out"], 0);
}

#[test]
fn show_reads_a_saved_day() {
    let tmp = TempDir::new().unwrap();
    seed(
        tmp.path(),
        "toolHistory_2001-02-03",
        serde_json::json!({
            "date": "2001-02-03",
            "checkouts": [{
                "crewId": 5,
                "tools": [{"tool": "Tape Measure", "number": 2, "time": "09:30"}]
            }],
            "broken": [{"name": "Claw Hammer", "number": 8}],
            "savedAt": "2001-02-03T17:00:00Z",
            "dateKey": "2001-02-03"
        }),
    );
    seed(tmp.path(), "toolHistoryIndex", serde_json::json!(["2001-02-03"]));

    let out = run_crib_ok(tmp.path(), &["show", "2001-02-03"]);
    assert!(out.starts_with("Saturday, February 3, 2001"));
    assert!(out.contains("Crew 5 (1)"));
    assert!(out.contains("Tape Measure #2  9:30 AM"));
    assert!(out.contains("Broken (1)"));

    let out = run_crib_ok(tmp.path(), &["history"]);
    assert!(out.starts_with("2001-02-03"));
    assert!(out.contains("1 out, 1 crews, 1 broken"));
}

#[test]
fn return_all_with_nothing_out() {
    let tmp = TempDir::new().unwrap();
    let out = run_crib_ok(tmp.path(), &["return-all"]);
    assert_eq!(out.trim(), "No tools to return.");
}

#[test]
fn ephemeral_runs_leave_nothing_behind() {
    let tmp = TempDir::new().unwrap();
    run_crib_ok(
        tmp.path(),
        &["--ephemeral", "add", "Pry Bar", "2", "-c", "hammers"],
    );
    let board = show_json(tmp.path());
    assert!(
        board["available"]
            .as_array()
            .unwrap()
            .iter()
            .all(|s| s["name"] != "Pry Bar")
    );
    let history = run_crib_ok(tmp.path(), &["history"]);
    assert_eq!(history.trim(), "No saved history.");
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[test]
fn recovery_log_starts_empty() {
    let tmp = TempDir::new().unwrap();
    let out = run_crib_ok(tmp.path(), &["recovery"]);
    assert_eq!(out.trim(), "Recovery log is empty.");
    let out = run_crib_ok(tmp.path(), &["recovery", "--prune"]);
    assert_eq!(out.trim(), "Pruned 0 entries");
    let out = run_crib_ok(tmp.path(), &["recovery", "--json"]);
    assert_eq!(out.trim(), "[]");
}
