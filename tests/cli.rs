use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// End-to-end tests for the agui-ctl binary against recorded streams.

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/streams")
        .join(name)
}

/// Runs in an empty directory with an empty home so no stray config applies.
fn agui_ctl(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("agui-ctl").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_replay_minimal_chat() {
    let home = TempDir::new().unwrap();
    agui_ctl(&home)
        .arg("replay")
        .arg(fixture("chat.sse"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Replayed 6 events (sse)"))
        .stdout(predicate::str::contains("assistant m1: Hi there"));
}

#[test]
fn test_replay_json_report() {
    let home = TempDir::new().unwrap();
    let output = agui_ctl(&home)
        .args(["--json", "replay"])
        .arg(fixture("weather.ndjson"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["format"], "ndjson");
    assert_eq!(report["events"], 9);

    let thread = &report["threads"][0];
    assert_eq!(thread["thread_id"], "t1");
    assert_eq!(thread["status"], "finished");
    assert_eq!(thread["state"], serde_json::json!({"b": 2}));
    assert_eq!(thread["tool_calls"][0]["function"]["name"], "get_weather");
    assert_eq!(thread["tool_calls"][0]["function"]["arguments"], r#"{"loc":"NYC"}"#);
    assert_eq!(thread["messages"][1]["role"], "tool");
    assert_eq!(thread["violations"], serde_json::json!([]));
}

#[test]
fn test_replay_reports_violations_and_continues() {
    let home = TempDir::new().unwrap();
    agui_ctl(&home)
        .arg("replay")
        .arg(fixture("out_of_order.sse"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "violation: TEXT_MESSAGE_CONTENT: message m1 was never started",
        ))
        .stdout(predicate::str::contains("finished"));
}

#[test]
fn test_replay_strict_fails_on_violation() {
    let home = TempDir::new().unwrap();
    agui_ctl(&home)
        .args(["replay", "--strict"])
        .arg(fixture("out_of_order.sse"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Protocol violation"));
}

#[test]
fn test_replay_unknown_type_needs_passthrough() {
    let home = TempDir::new().unwrap();
    agui_ctl(&home)
        .args(["replay", "--strict"])
        .arg(fixture("unknown_type.ndjson"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown event type: VENDOR_PING"));

    agui_ctl(&home)
        .args(["replay", "--strict", "--passthrough"])
        .arg(fixture("unknown_type.ndjson"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Replayed 3 events"));
}

#[test]
fn test_replay_thread_filter() {
    let home = TempDir::new().unwrap();
    agui_ctl(&home)
        .args(["replay", "--thread", "nope"])
        .arg(fixture("chat.sse"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Thread").not());
}

#[test]
fn test_validate_accepts_well_formed_stream() {
    let home = TempDir::new().unwrap();
    agui_ctl(&home)
        .arg("validate")
        .arg(fixture("weather.ndjson"))
        .assert()
        .success()
        .stdout(predicate::str::contains("9 events, ndjson"));
}

#[test]
fn test_validate_rejects_out_of_order_stream() {
    let home = TempDir::new().unwrap();
    agui_ctl(&home)
        .arg("validate")
        .arg(fixture("out_of_order.sse"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid sequence: event 1 (TEXT_MESSAGE_CONTENT)"));
}

#[test]
fn test_encode_negotiates_ndjson() {
    let home = TempDir::new().unwrap();
    let output = agui_ctl(&home)
        .args(["encode", "--accept", "application/x-ndjson"])
        .arg(fixture("chat.sse"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 6);
    for line in &lines {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value["type"].is_string());
    }
    assert!(lines[2].contains(r#""delta":"Hi""#));
}

#[test]
fn test_encode_defaults_to_event_stream() {
    let home = TempDir::new().unwrap();
    agui_ctl(&home)
        .args(["encode", "--accept", "text/html"])
        .arg(fixture("weather.ndjson"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("data: {\"type\":\"RUN_STARTED\""))
        .stdout(predicate::str::contains("\n\ndata: "));
}

#[test]
fn test_encode_round_trip_through_file() {
    let home = TempDir::new().unwrap();
    let encoded = home.path().join("chat.ndjson");
    agui_ctl(&home)
        .args(["encode", "--accept", "application/x-ndjson", "-o"])
        .arg(&encoded)
        .arg(fixture("chat.sse"))
        .assert()
        .success();

    agui_ctl(&home)
        .arg("replay")
        .arg(&encoded)
        .assert()
        .success()
        .stdout(predicate::str::contains("Replayed 6 events (ndjson)"))
        .stdout(predicate::str::contains("assistant m1: Hi there"));
}

#[test]
fn test_config_file_sets_output_format() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.toml");
    fs::write(&config, "[output]\nformat = \"json\"\n").unwrap();

    agui_ctl(&home)
        .arg("--config")
        .arg(&config)
        .arg("validate")
        .arg(fixture("chat.sse"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\": true"));
}

#[test]
fn test_local_config_is_picked_up() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join(".agui.toml"),
        "[stream]\naccept = \"application/x-ndjson\"\n",
    )
    .unwrap();

    agui_ctl(&home)
        .arg("encode")
        .arg(fixture("chat.sse"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\"type\":\"RUN_STARTED\""));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let home = TempDir::new().unwrap();
    agui_ctl(&home)
        .args(["--config", "does-not-exist.toml", "validate"])
        .arg(fixture("chat.sse"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Configuration error: cannot read"));
}
