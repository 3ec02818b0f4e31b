#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vigil(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vigil").unwrap();
    cmd.current_dir(dir.path()).env("VIGIL_ROOT", dir.path());
    cmd
}

fn init_project(dir: &TempDir) {
    vigil(dir).arg("init").assert().success();
}

fn create_session(dir: &TempDir, id: &str) {
    vigil(dir)
        .args(["session", "create", id])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// vigil init
// ---------------------------------------------------------------------------

#[test]
fn init_scaffolds_the_vigil_dir() {
    let dir = TempDir::new().unwrap();
    vigil(&dir).arg("init").assert().success();

    assert!(dir.path().join(".vigil").is_dir());
    assert!(dir.path().join(".vigil/config.yaml").exists());
    assert!(dir.path().join(".vigil/lexicon.yaml").exists());
    assert!(dir.path().join(".vigil/state.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    vigil(&dir).arg("init").assert().success();
    vigil(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:"));
}

#[test]
fn commands_fail_before_init() {
    let dir = TempDir::new().unwrap();
    vigil(&dir)
        .args(["session", "create", "s1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ---------------------------------------------------------------------------
// vigil session create / list / retire
// ---------------------------------------------------------------------------

#[test]
fn session_create_and_list() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_session(&dir, "intake-7");

    vigil(&dir)
        .args(["session", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("intake-7"))
        .stdout(predicate::str::contains("active"));
}

#[test]
fn session_create_rejects_bad_ids() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vigil(&dir)
        .args(["session", "create", "has spaces"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid session id"));
}

#[test]
fn session_create_duplicate_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_session(&dir, "s1");

    vigil(&dir)
        .args(["session", "create", "s1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn retired_session_rejects_turns() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_session(&dir, "s1");

    vigil(&dir)
        .args(["session", "retire", "s1"])
        .assert()
        .success();
    vigil(&dir)
        .args(["turn", "s1", "hello again"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("retired"));

    // Retired state stays readable.
    vigil(&dir)
        .args(["session", "show", "s1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("retired"));
}

// ---------------------------------------------------------------------------
// vigil turn
// ---------------------------------------------------------------------------

#[test]
fn benign_turn_scores_low() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_session(&dir, "s1");

    vigil(&dir)
        .args(["turn", "s1", "thanks, see you next week"])
        .assert()
        .success()
        .stdout(predicate::str::contains("level low"));
}

#[test]
fn crisis_turn_forces_critical_and_raises_alert() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_session(&dir, "s1");

    vigil(&dir)
        .args(["turn", "s1", "I want to kill myself"])
        .assert()
        .success()
        .stdout(predicate::str::contains("level critical"))
        .stdout(predicate::str::contains("ALERT"));

    // Both the session state and the alert survive the process boundary.
    vigil(&dir)
        .args(["session", "show", "s1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("critical"));
    vigil(&dir)
        .args(["alert", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s1"))
        .stdout(predicate::str::contains("critical"));
}

#[test]
fn sequence_continues_across_invocations() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_session(&dir, "s1");

    vigil(&dir)
        .args(["turn", "s1", "first turn"])
        .assert()
        .success();
    vigil(&dir)
        .args(["turn", "s1", "second turn"])
        .assert()
        .success();

    let output = vigil(&dir)
        .args(["session", "show", "s1", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["state"]["last_sequence"].as_u64(), Some(2));
}

#[test]
fn explicit_sequence_gap_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_session(&dir, "s1");

    vigil(&dir)
        .args(["turn", "s1", "first turn"])
        .assert()
        .success();
    vigil(&dir)
        .args(["turn", "s1", "out of order", "--seq", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 2, got 5"));
}

#[test]
fn turn_json_has_expected_fields() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_session(&dir, "s1");

    let output = vigil(&dir)
        .args(["turn", "s1", "feeling hopeless", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(json.get("score").is_some());
    assert!(json.get("level").is_some());
    assert_eq!(json["score"]["sequence"].as_u64(), Some(1));
    assert!(json["score"]["matches"].as_array().is_some());
}

// ---------------------------------------------------------------------------
// vigil ingest
// ---------------------------------------------------------------------------

#[test]
fn ingest_replays_a_transcript() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_session(&dir, "s1");

    let path = dir.path().join("transcript.txt");
    std::fs::write(
        &path,
        "had an ok day\n\nfeeling hopeless and alone\nI want to end it all\n",
    )
    .unwrap();

    vigil(&dir)
        .args(["ingest", "s1", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("ingested 3 turns"));

    let output = vigil(&dir)
        .args(["session", "show", "s1", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["state"]["last_sequence"].as_u64(), Some(3));
    assert_eq!(json["state"]["level"].as_str(), Some("critical"));
}

// ---------------------------------------------------------------------------
// vigil alert ack / dismiss
// ---------------------------------------------------------------------------

#[test]
fn alert_ack_is_idempotent_per_identity() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_session(&dir, "s1");

    let output = vigil(&dir)
        .args(["turn", "s1", "I have a suicide plan", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let id = json["alert"]["id"].as_str().unwrap().to_string();

    vigil(&dir)
        .args(["alert", "ack", &id, "--by", "dr-lee"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acknowledged"));

    // Same identity again: fine. Different identity: refused.
    vigil(&dir)
        .args(["alert", "ack", &id, "--by", "dr-lee"])
        .assert()
        .success();
    vigil(&dir)
        .args(["alert", "ack", &id, "--by", "dr-osei"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already acknowledged"));

    vigil(&dir)
        .args(["alert", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no alerts"));
    vigil(&dir)
        .args(["alert", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acknowledged"));
    vigil(&dir)
        .args(["alert", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("dr-lee"));
}

#[test]
fn alert_dismiss_after_ack_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_session(&dir, "s1");

    let output = vigil(&dir)
        .args(["turn", "s1", "no reason to live", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let id = json["alert"]["id"].as_str().unwrap().to_string();

    vigil(&dir)
        .args(["alert", "ack", &id, "--by", "dr-lee"])
        .assert()
        .success();
    vigil(&dir)
        .args(["alert", "dismiss", &id, "--by", "dr-lee"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already acknowledged"));
}

// ---------------------------------------------------------------------------
// vigil session flagged
// ---------------------------------------------------------------------------

#[test]
fn flagged_lists_only_sessions_needing_attention() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_session(&dir, "calm-1");
    create_session(&dir, "urgent-1");

    vigil(&dir)
        .args(["turn", "calm-1", "doing alright this week"])
        .assert()
        .success();
    vigil(&dir)
        .args(["turn", "urgent-1", "I want to kill myself"])
        .assert()
        .success();

    vigil(&dir)
        .args(["session", "flagged"])
        .assert()
        .success()
        .stdout(predicate::str::contains("urgent-1"))
        .stdout(predicate::str::contains("calm-1").not());
}

// ---------------------------------------------------------------------------
// vigil config validate
// ---------------------------------------------------------------------------

#[test]
fn config_validate_accepts_defaults() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    vigil(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no warnings"));
}

#[test]
fn config_validate_flags_unordered_thresholds() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let path = dir.path().join(".vigil/config.yaml");
    let raw = std::fs::read_to_string(&path).unwrap();
    let edited = raw.replace("critical_at: 0.8", "critical_at: 0.1");
    assert_ne!(raw, edited, "expected default critical_at in config");
    std::fs::write(&path, edited).unwrap();

    vigil(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"));
}
