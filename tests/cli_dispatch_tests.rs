use std::fs;
use std::process::{Command, Output};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_bracket_odds")
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env_remove("BRACKET_ODDS_PASSES")
        .env_remove("BRACKET_ODDS_SEED")
        .env_remove("BRACKET_ODDS_WORKERS")
        .env("RUST_LOG", "warn")
        .output()
        .expect("binary should run")
}

#[test]
fn unknown_command_prints_usage() {
    let output = run(&["serve"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: bracket_odds"));
}

#[test]
fn simulate_command_emits_json_report() {
    let output = run(&["simulate", "200", "11"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("simulate should emit json");
    assert_eq!(payload["seed"], 11);
    assert_eq!(payload["passes_completed"], 200);
    let teams = payload["teams"].as_object().expect("teams should be an object");
    assert_eq!(teams.len(), 20);
    for key in [
        "group_winner",
        "group_runner_up",
        "super_8",
        "semi_final",
        "final",
        "derived_final",
        "champion",
    ] {
        assert!(teams["India"][key].is_number(), "missing {key}");
    }
}

#[test]
fn simulate_is_reproducible_across_worker_counts() {
    let first = run(&["simulate", "150", "5", "--workers", "1"]);
    let second = run(&["simulate", "150", "5", "--sequential"]);
    let teams = |output: &Output| {
        let payload: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("simulate should emit json");
        payload["teams"].clone()
    };
    assert_eq!(teams(&first), teams(&second));
}

#[test]
fn simulate_writes_requested_files_and_table() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("out").join("report.json");
    let csv = dir.path().join("report.csv");

    let output = run(&[
        "simulate",
        "100",
        "3",
        "--out",
        json.to_string_lossy().as_ref(),
        "--csv",
        csv.to_string_lossy().as_ref(),
        "--table",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("rank"));
    assert!(stdout.contains("passes=100/100 seed=3"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(report["passes_requested"], 100);
    let rows = fs::read_to_string(&csv).unwrap();
    assert_eq!(rows.lines().count(), 21);
}

#[test]
fn simulate_rejects_unknown_flags() {
    let output = run(&["simulate", "10", "--turbo"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown option '--turbo'"));
}

#[test]
fn simulate_fails_on_invalid_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"teams\": []}").unwrap();

    let output = run(&["simulate", "10", "--catalog", path.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("simulation failed"));
}

#[test]
fn pass_command_prints_named_bracket() {
    let output = run(&["pass", "42"]);
    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("pass should emit json");
    assert_eq!(payload["groups"].as_array().map(Vec::len), Some(4));
    assert_eq!(payload["qualifiers"].as_array().map(Vec::len), Some(8));
    assert_eq!(payload["semi_finalists"].as_array().map(Vec::len), Some(4));
    assert!(payload["champion"].is_string());
}

#[test]
fn match_command_summarises_head_to_head() {
    let output = run(&["match", "India", "Oman", "India", "200", "9"]);
    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("match should emit json");
    assert_eq!(payload["matches"], 200);
    let win_rate = payload["win_rate_a"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&win_rate));
    let analytic = payload["analytic_win_probability_a"].as_f64().unwrap();
    assert!(analytic > 0.5 && analytic <= 0.99);
}

#[test]
fn match_command_needs_two_teams() {
    let output = run(&["match", "India"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage: bracket_odds match"));

    let output = run(&["match", "India", "Atlantis"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown team 'Atlantis'"));
}

#[test]
fn validate_command_accepts_builtin_catalog() {
    let output = run(&["validate"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("validation passed"));
}

#[test]
fn validate_command_returns_non_zero_on_invalid_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("invalid.yaml");
    fs::write(
        &path,
        "teams:\n  - { name: '', group: A, ranking: 1, rating: 1000, avg_runs_scored: 150, avg_runs_conceded: 150, recent_win_rate: 0.5, player_strength: 0.5, spin_strength: 0.5, pace_strength: 0.5 }\n",
    )
    .unwrap();

    let output = run(&["validate", path.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));
}
