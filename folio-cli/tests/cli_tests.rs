//! Integration tests for the Folio CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// CLI command with the mock source latency disabled
fn folio() -> Command {
    let mut cmd = Command::cargo_bin("folio-cli").unwrap();
    cmd.env("FOLIO_LATENCY_MS", "0");
    cmd
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

fn stdout_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout is JSON")
}

#[test]
fn test_help() {
    folio()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("catalog"))
        .stdout(predicate::str::contains("read"))
        .stdout(predicate::str::contains("script"));
}

#[test]
fn test_version() {
    folio()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("folio"));
}

#[test]
fn test_read_help() {
    folio()
        .args(["read", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Open a chapter"))
        .stdout(predicate::str::contains("--quality"))
        .stdout(predicate::str::contains("--auto-scroll"));
}

// =============================================================================
// catalog
// =============================================================================

#[test]
fn test_catalog_lists_builtin_works() {
    folio()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Solo Leveling"))
        .stdout(predicate::str::contains("Shadow Slave"))
        .stdout(predicate::str::contains("6 works"));
}

#[test]
fn test_catalog_filter_by_kind() {
    folio()
        .args(["catalog", "--kind", "novel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reverend Insanity"))
        .stdout(predicate::str::contains("Omniscient Reader").not())
        .stdout(predicate::str::contains("3 works"));
}

#[test]
fn test_catalog_json() {
    let output = folio().args(["catalog", "--json"]).output().unwrap();
    assert!(output.status.success());

    let works = stdout_json(&output.stdout);
    let works = works.as_array().unwrap();
    assert_eq!(works.len(), 6);
    assert_eq!(works[0]["id"], "m1");
    assert_eq!(works[0]["total_chapters"], 189);
}

#[test]
fn test_catalog_json_filtered_by_kind() {
    let output = folio()
        .args(["catalog", "--kind", "manga", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let works = stdout_json(&output.stdout);
    let ids: Vec<&str> = works
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["m1", "m2", "m3"]);
}

#[test]
fn test_catalog_bad_kind() {
    folio()
        .args(["catalog", "--kind", "comic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a work kind"));
}

// =============================================================================
// read
// =============================================================================

#[test]
fn test_read_manga_chapter() {
    folio()
        .args(["read", "manga", "m1", "3", "--quality", "low"])
        .assert()
        .success()
        .stdout(predicate::str::contains("images.weserv.nl"))
        .stdout(predicate::str::contains("q=50"))
        .stdout(predicate::str::contains("Chapter:     3 (ready)"))
        .stdout(predicate::str::contains("Units:       14"));
}

#[test]
fn test_read_manga_json() {
    let output = folio()
        .args(["read", "manga", "m2", "7", "--zoom", "500", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output.stdout);
    assert_eq!(json["snapshot"]["phase"], "ready");
    assert_eq!(json["snapshot"]["units"], 14);
    assert_eq!(json["snapshot"]["settings"]["zoom"], 200);
    assert_eq!(json["frame"]["chapter"]["chapter_number"], 7);
    assert_eq!(json["frame"]["content"]["type"], "pages");
}

#[test]
fn test_read_novel_with_theme() {
    let output = folio()
        .args(["read", "novel", "n1", "--theme", "sepia", "--font-size", "8", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output.stdout);
    assert_eq!(json["frame"]["content"]["type"], "text");
    assert_eq!(json["snapshot"]["chapter"]["chapter_number"], 1);
    assert_eq!(json["snapshot"]["settings"]["theme"], "sepia");
    assert_eq!(json["snapshot"]["settings"]["font_size"], 14);
}

#[test]
fn test_read_novel_text_output() {
    folio()
        .args(["read", "novel", "n2", "4", "--theme", "midnight"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lord of the Mysteries, chapter 4"))
        .stdout(predicate::str::contains("#94a3b8 on #0f172a"))
        .stdout(predicate::str::contains("<p>").not());
}

#[test]
fn test_read_missing_chapter() {
    folio()
        .args(["read", "manga", "m1", "999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load chapter 999"))
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_read_unknown_work() {
    folio()
        .args(["read", "novel", "n9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown work"));
}

#[test]
fn test_read_chapter_zero_rejected() {
    folio()
        .args(["read", "manga", "m1", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("numbered from 1"));
}

#[test]
fn test_read_invalid_setting() {
    folio()
        .args(["read", "manga", "m1", "--layout", "triple"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--layout"));
}

#[test]
fn test_read_auto_scroll_runs_to_end() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "config.json", r#"{ "scroll_extent_px": 20 }"#);

    let output = folio()
        .args(["--config", config.to_str().unwrap()])
        .args(["read", "novel", "n1", "2", "--auto-scroll", "10", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output.stdout);
    assert_eq!(json["snapshot"]["progress"], 100.0);
    assert_eq!(json["snapshot"]["auto_scroll_speed"], 0);
    assert_eq!(json["snapshot"]["chapter"]["chapter_number"], 2);
}

// =============================================================================
// config
// =============================================================================

#[test]
fn test_config_sets_initial_settings() {
    let dir = TempDir::new().unwrap();
    let config = write_file(
        &dir,
        "config.json",
        r#"{ "novel": { "theme": "dark", "font_size": 22 } }"#,
    );

    let output = folio()
        .args(["--config", config.to_str().unwrap()])
        .args(["read", "novel", "n3", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output.stdout);
    assert_eq!(json["snapshot"]["settings"]["theme"], "dark");
    assert_eq!(json["snapshot"]["settings"]["font_size"], 22);
}

#[test]
fn test_config_invalid() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "config.json", r#"{ "scroll_extent_px": -5 }"#);

    folio()
        .args(["--config", config.to_str().unwrap(), "catalog"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_latency_env_invalid() {
    Command::cargo_bin("folio-cli")
        .unwrap()
        .env("FOLIO_LATENCY_MS", "fast")
        .arg("catalog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("FOLIO_LATENCY_MS"));
}

// =============================================================================
// script
// =============================================================================

#[test]
fn test_script_missing_chapter_then_previous() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "nav.folio",
        "work manga m1\n\
         open 190\n\
         prev\n\
         progress 42\n\
         set quality=low zoom=500\n",
    );

    let output = folio()
        .args(["script", script.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output.stdout);
    assert_eq!(json["phase"], "ready");
    assert_eq!(json["chapter"]["chapter_number"], 189);
    assert_eq!(json["progress"], 42.0);
    assert_eq!(json["settings"]["quality"], "low");
    assert_eq!(json["settings"]["zoom"], 200);
}

#[test]
fn test_script_reports_failed_loads() {
    let dir = TempDir::new().unwrap();
    let script = write_file(&dir, "fail.folio", "work novel n2\nopen 5000\n");

    folio()
        .args(["script", script.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("line 2:"))
        .stdout(predicate::str::contains("(error)"))
        .stdout(predicate::str::contains("1 failed load(s)"));
}

#[test]
fn test_script_previous_at_first_chapter() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "first.folio",
        "# going back from chapter 1 stays put\n\
         work novel n1\n\
         open 1\n\
         prev\n\
         prev\n",
    );

    let output = folio()
        .args(["script", script.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output.stdout);
    assert_eq!(json["chapter"]["chapter_number"], 1);
    assert_eq!(json["phase"], "ready");
}

#[test]
fn test_script_timers_and_player() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "ambient.folio",
        "work novel n1\n\
         open 3\n\
         play\n\
         track next\n\
         volume 140\n\
         sleep 30\n\
         autoscroll 4\n\
         wait 50ms\n\
         next\n",
    );

    let output = folio()
        .args(["script", script.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output.stdout);
    assert_eq!(json["chapter"]["chapter_number"], 4);
    assert_eq!(json["progress"], 0.0);
    assert_eq!(json["auto_scroll_speed"], 0);
    assert_eq!(json["sleep_timer"], 30);
    assert_eq!(json["sleep_minutes_remaining"], 30);
    assert_eq!(json["player"]["playing"], true);
    assert_eq!(json["player"]["volume"], 100);
    assert_eq!(json["player"]["current"], 1);
}

#[test]
fn test_script_font_buttons() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "font.folio",
        "work novel n1\n\
         open 1\n\
         font +\n\
         font +\n\
         font +\n\
         font +\n\
         font +\n\
         font +\n\
         font +\n\
         font -\n",
    );

    let output = folio()
        .args(["script", script.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    // 18 + 7 steps of 2 stops at 30, then one step down
    let json = stdout_json(&output.stdout);
    assert_eq!(json["settings"]["font_size"], 28);
}

#[test]
fn test_script_huge_wait_is_an_error() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        &dir,
        "wait.folio",
        "work manga m1\nwait 999999999999999999m\n",
    );

    folio()
        .args(["script", script.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too large"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_script_syntax_error() {
    let dir = TempDir::new().unwrap();
    let script = write_file(&dir, "bad.folio", "work manga m1\nopen 1\njump 4\n");

    folio()
        .args(["script", script.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"))
        .stderr(predicate::str::contains("unknown command"));
}

#[test]
fn test_script_missing_file() {
    folio()
        .args(["script", "/nonexistent/path/script.folio"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read script"));
}
