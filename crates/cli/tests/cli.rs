use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const STUB_TRANSCRIPT: &str = "本日は落ち着いて過ごされました。昼食は全量摂取されました。";

fn stub_cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("carelog");
    cmd.current_dir(dir.path())
        .env("CARELOG__AI__PROVIDER", "stub")
        .env("CARELOG__AI__TRANSCRIPTION_PROVIDER", "stub");
    cmd
}

#[test]
fn config_init_writes_example_file() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");

    let mut cmd = cargo_bin_cmd!("carelog");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).expect("read config");
    assert!(content.contains("[ai.sakura]"));
    assert!(content.contains("strict_validation = true"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "# existing").expect("write config");

    let mut cmd = cargo_bin_cmd!("carelog");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    assert_eq!(fs::read_to_string(&config_path).unwrap(), "# existing");
}

#[test]
fn summarize_outputs_valid_json() {
    let dir = TempDir::new().expect("temp dir");

    let output = stub_cmd(&dir)
        .args(["summarize", "--text", "「本日の様子は安定していました。」", "--json"])
        .output()
        .expect("run summarize");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["summary"], "本日の様子は安定していました。");
}

#[test]
fn summarize_reads_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("note.txt");
    fs::write(&path, "要約: 夜間に2回起きた。朝食は完食。午後は散歩。").expect("write note");

    stub_cmd(&dir)
        .args(["summarize", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout("夜間に2回起きた。朝食は完食。\n");
}

#[test]
fn summarize_rejects_empty_input() {
    let dir = TempDir::new().expect("temp dir");

    stub_cmd(&dir)
        .args(["summarize", "--text", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No text provided"));
}

#[test]
fn openai_cannot_be_used_for_summaries() {
    let dir = TempDir::new().expect("temp dir");

    stub_cmd(&dir)
        .env("CARELOG__AI__PROVIDER", "openai")
        .args(["summarize", "--text", "本日は穏やか。"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported summarization provider"));
}

#[test]
fn assess_accepts_wrapped_logs() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("logs.json");
    fs::write(
        &path,
        r#"{"careLogs": [{"id": 1, "content": "夜間にふらつきあり"}]}"#,
    )
    .expect("write logs");

    let output = stub_cmd(&dir)
        .args(["assess", "--json", "--file"])
        .arg(&path)
        .output()
        .expect("run assess");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["riskLevel"], "medium");
    assert_eq!(value["findings"], serde_json::json!([]));
}

#[test]
fn assess_plans_outputs_array() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("logs.json");
    fs::write(&path, r#"[{"content": "食欲が落ちている"}]"#).expect("write logs");

    let output = stub_cmd(&dir)
        .args(["assess", "--plans", "--json", "--file"])
        .arg(&path)
        .output()
        .expect("run assess");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert!(value.as_array().is_some_and(|items| items.is_empty()));
}

#[test]
fn assess_rejects_unknown_shape() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("logs.json");
    fs::write(&path, r#"{"logs": []}"#).expect("write logs");

    stub_cmd(&dir)
        .args(["assess", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("careLogs"));
}

#[test]
fn transcribe_with_stub() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("memo.wav");
    fs::write(&path, b"RIFF-fake").expect("write audio");

    stub_cmd(&dir)
        .args(["transcribe", "--audio"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(STUB_TRANSCRIPT));
}

#[test]
fn preview_outputs_transcript_and_summary() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("memo.webm");
    fs::write(&path, b"fake-webm").expect("write audio");

    let output = stub_cmd(&dir)
        .args(["preview", "--json", "--audio"])
        .arg(&path)
        .output()
        .expect("run preview");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["transcript"], STUB_TRANSCRIPT);
    assert_eq!(value["summary"], STUB_TRANSCRIPT);
}

#[test]
fn preview_reports_failed_step() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("empty.mp3");
    fs::write(&path, b"").expect("write audio");

    stub_cmd(&dir)
        .args(["preview", "--audio"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("step: validation"));
}

#[test]
fn preview_rejects_unsupported_type() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("notes.bin");
    fs::write(&path, b"not audio").expect("write file");

    stub_cmd(&dir)
        .args(["preview", "--mime", "text/plain", "--audio"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("step: validation"))
        .stderr(predicate::str::contains("text/plain"));
}

#[test]
fn transcribe_rejects_unsupported_type() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("notes.bin");
    fs::write(&path, b"not audio").expect("write file");

    stub_cmd(&dir)
        .args(["transcribe", "--mime", "image/png", "--audio"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported audio type"));
}

#[test]
fn doctor_reports_ok_with_stub() {
    let dir = TempDir::new().expect("temp dir");

    let output = stub_cmd(&dir)
        .args(["doctor", "--json"])
        .output()
        .expect("run doctor");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["overall"], "ok");
    assert_eq!(value["chat"]["status"], "ok");
}

#[test]
fn doctor_flags_unsupported_provider() {
    let dir = TempDir::new().expect("temp dir");

    stub_cmd(&dir)
        .env("CARELOG__AI__TRANSCRIPTION_PROVIDER", "gemini")
        .args(["doctor"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("does not support transcription"));
}
