//! Integration tests for the ta-crosscheck CLI.
//!
//! These tests run the built binary end to end against the bundled price
//! file and check its report and exit status.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Path to the bundled price file.
fn data_file() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/2006-day-001.txt")
}

/// Run the CLI against the bundled data with extra arguments.
fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ta-crosscheck"))
        .arg("--data")
        .arg(data_file())
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn temp_suite(name: &str, json: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ta-crosscheck-{}-{name}.json", std::process::id()));
    fs::write(&path, json).unwrap();
    path
}

// =============================================================================
// Default Suite
// =============================================================================

#[test]
fn test_default_suite_passes() {
    let output = run_cli(&[]);
    let out = stdout(&output);
    assert_eq!(output.status.code(), Some(0), "{out}");

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "");
    assert_eq!(lines[1], "[+] From main        : true");
    for name in ["sma", "simple_moving_average", "ema", "wma", "rsi", "atr", "bollinger", "macd"] {
        assert!(out.contains(&format!("[+] Running test for : {name}\n")), "missing {name}");
    }
    assert!(out.contains("[+] Test completed with : sma"));
    assert!(!out.contains("[+] Result: false"));
    assert_eq!(lines.last(), Some(&"[+] Global Result: true"));
}

#[test]
fn test_list_names_runs_nothing() {
    let output = run_cli(&["--list-names"]);
    let out = stdout(&output);
    assert!(output.status.success());
    assert!(out.contains("sma, simple_moving_average, ema, wma, rsi, atr, bollinger, macd"));
    assert!(!out.contains("Running test"));
}

#[test]
fn test_list_names_needs_no_data() {
    let output = Command::new(env!("CARGO_BIN_EXE_ta-crosscheck"))
        .args(["--data", "no/such/file.txt", "--list-names"])
        .output()
        .unwrap();
    assert!(output.status.success());
}

#[test]
fn test_name_filter_with_verbose_report() {
    let output = run_cli(&["--name", "bollinger", "-v"]);
    let out = stdout(&output);
    assert!(output.status.success(), "{out}");
    assert!(!out.contains("Running test for : sma"));
    assert!(out.contains("Indicator      : bollinger"));
    assert!(out.contains("Reference      : BBANDS"));
    assert!(out.contains("Chk Minperiods : matched"));
    assert!(out.contains("Decimals       : 6"));
    assert!(out.contains("Period Check   : 0 (global)"));
    let header = out
        .lines()
        .find(|l| l.trim_start().starts_with("count"))
        .expect("value table header");
    for column in ["cand_top", "ref_top", "eq_top", "cand_mid", "cand_bot"] {
        assert!(header.contains(column), "missing {column} in {header}");
    }
}

// =============================================================================
// Failing Runs
// =============================================================================

#[test]
fn test_candidate_override_fails_test() {
    let output = run_cli(&["--name", "ema", "--ck", "period=10"]);
    let out = stdout(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("[+] Result: false"));
    assert!(out.contains("[+] Global Result: false"));
}

#[test]
fn test_matching_overrides_on_both_sides_pass() {
    let output = run_cli(&["--name", "ema", "--ck", "period=10", "--rk", "timeperiod=10"]);
    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
}

#[test]
fn test_no_trimming_exposes_masked_macd_line() {
    let output = run_cli(&["--name", "macd", "-m", "-1"]);
    let out = stdout(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("[-] Output macd vs macd:"));
}

#[test]
fn test_unresolvable_reference_continues() {
    let suite = temp_suite(
        "orphan",
        r#"{"tests": [
            {"name": "smooth", "indicator": {"candidate": "sma"}},
            {"name": "sma", "indicator": {"decimals": 6}}
        ]}"#,
    );
    let output = run_cli(&["--suite", suite.to_str().unwrap()]);
    let out = stdout(&output);
    fs::remove_file(&suite).ok();

    assert_eq!(output.status.code(), Some(1));
    let diagnostics: Vec<&str> = out.lines().filter(|l| l.starts_with("[-] no reference")).collect();
    assert_eq!(diagnostics, vec!["[-] no reference indicator found for: smooth (tried: SMOOTH)"]);
    assert!(out.contains("[+] Running test for : sma"));
}

// =============================================================================
// Input Errors
// =============================================================================

#[test]
fn test_malformed_override_exits_2() {
    let output = run_cli(&["--rk", "timeperiod=__import__('os')"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid argument"));
    assert!(!stdout(&output).contains("Running test"));
}

#[test]
fn test_missing_data_exits_2() {
    let output = Command::new(env!("CARGO_BIN_EXE_ta-crosscheck"))
        .args(["--data", "no/such/file.txt"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("no/such/file.txt"));
}

#[test]
fn test_invalid_suite_exits_2() {
    let suite = temp_suite("dup", r#"{"tests": [{"name": "a", "same_as": "b"}, {"name": "a", "same_as": "b"}]}"#);
    let output = run_cli(&["--suite", suite.to_str().unwrap()]);
    fs::remove_file(&suite).ok();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("duplicate test name 'a'"));
}

#[test]
fn test_quiet_and_verbose_conflict() {
    let output = run_cli(&["-q", "-v"]);
    assert_eq!(output.status.code(), Some(2));
}

// =============================================================================
// Log Destination and Level
// =============================================================================

#[test]
fn test_stderr_target() {
    let output = run_cli(&["--stderr", "--name", "sma"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("[+] Global Result: true"));
}

#[test]
fn test_quiet_passing_run_is_silent() {
    let output = run_cli(&["-q"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}
