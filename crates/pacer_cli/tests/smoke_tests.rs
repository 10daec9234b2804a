//! CLI smoke tests — verify basic binary behavior.

use std::io::Write;
use std::process::Command;

fn cli_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pacer"))
}

#[test]
fn test_help_flag() {
    let output = cli_bin().arg("--help").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "Expected usage info in --help output");
}

#[test]
fn test_version_flag() {
    let output = cli_bin().arg("--version").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pacer"), "Expected binary name in --version output");
}

#[test]
fn test_classify_prints_json() {
    let output = cli_bin()
        .args(["--config", "/tmp/nonexistent_pacer_config_12345.toml"])
        .args(["classify", "Sorry about the outage, we are fixing the bug"])
        .args(["--seed", "3"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["category"], "empathy");
    assert!(value["sentiment"].as_i64().unwrap() < 0);
    assert_ne!(value["reaction"], "Angry");
}

#[test]
fn test_classify_rejects_angry_override() {
    let output = cli_bin()
        .args(["classify", "hello world", "--reaction", "angry"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
}

#[test]
fn test_run_over_small_feed() {
    let dir = tempfile::tempdir().unwrap();

    let config_path = dir.path().join("pacer.toml");
    std::fs::write(
        &config_path,
        r#"
[limits]
author_repeat_cap = 1

[pacing]
delay_min_secs = 0
delay_max_secs = 0
max_read_secs = 0
"#,
    )
    .unwrap();

    let templates_path = dir.path().join("templates.json");
    std::fs::write(&templates_path, r#"{"general": ["Nice {EMOJI}"]}"#).unwrap();

    let feed_path = dir.path().join("feed.jsonl");
    let mut feed = std::fs::File::create(&feed_path).unwrap();
    writeln!(feed, r#"{{"id":"1","text":"Congrats on the launch, amazing work","author":"a","page":"feed"}}"#).unwrap();
    writeln!(feed, r#"{{"id":"2","text":"Another one from the same author","author":"a","page":"feed"}}"#).unwrap();
    writeln!(feed, r#"{{"id":"3","text":"We are hiring engineers, apply today","author":"b","page":"feed"}}"#).unwrap();
    drop(feed);

    let output = cli_bin()
        .arg("--config")
        .arg(&config_path)
        .arg("run")
        .arg("--feed")
        .arg(&feed_path)
        .arg("--templates")
        .arg(&templates_path)
        .args(["--seed", "1"])
        .output()
        .expect("failed to run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(summary["performed"], 2);
    assert_eq!(summary["skipped"], 1);
    assert_eq!(summary["failures"], 0);
}

#[test]
fn test_invalid_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("pacer.toml");
    std::fs::write(
        &config_path,
        "[limits]\nshort_window_cap = 1\nauthor_repeat_cap = 0\n",
    )
    .unwrap();

    let feed_path = dir.path().join("feed.jsonl");
    std::fs::write(
        &feed_path,
        r#"{"id":"1","text":"Congrats on the launch, amazing work","author":"a","page":"feed"}"#,
    )
    .unwrap();

    let output = cli_bin()
        .arg("--config")
        .arg(&config_path)
        .arg("run")
        .arg("--feed")
        .arg(&feed_path)
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "no summary on a rejected config");
}
