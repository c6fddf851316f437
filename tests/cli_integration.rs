#![allow(deprecated)]

//! End-to-end tests for the `unichat` binary
//!
//! Non-interactive commands are run against a `wiremock` server with a
//! temporary state file and a config path that does not exist, so the
//! defaults plus CLI overrides are what the binary sees.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

async fn history_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/chat/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::record_json(1, "aaaa1111-x", "Library hours", Some("8 to 5."), "2024-09-01T08:00:00Z"),
            common::record_json(2, "bbbb2222-y", "Exam schedule", Some("See the **registrar**."), "2024-09-05T09:00:00Z"),
            common::record_json(3, "aaaa1111-x", "Weekends?", None, "2024-09-06T10:00:00Z"),
        ])))
        .mount(&server)
        .await;

    server
}

fn unichat(server: &MockServer, tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("unichat").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("UNICHAT_BASE_URL")
        .env_remove("UNICHAT_MODEL")
        .arg("--config")
        .arg(tmp.path().join("missing.yaml"))
        .arg("--base-url")
        .arg(server.uri())
        .arg("--state-file")
        .arg(tmp.path().join("state.json"));
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sessions_list_json_is_ordered_by_activity() {
    let server = history_server().await;
    let tmp = TempDir::new().unwrap();

    let output = unichat(&server, &tmp)
        .args(["sessions", "list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["session_id"], "aaaa1111-x");
    assert_eq!(rows[0]["title"], "Library hours");
    assert_eq!(rows[1]["session_id"], "bbbb2222-y");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sessions_list_respects_limit() {
    let server = history_server().await;
    let tmp = TempDir::new().unwrap();

    let output = unichat(&server, &tmp)
        .args(["sessions", "list", "--json", "--limit", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_history_show_by_prefix_renders_markup() {
    let server = history_server().await;
    let tmp = TempDir::new().unwrap();

    let output = unichat(&server, &tmp)
        .args(["history", "show", "bbbb", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let transcript: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(transcript["session_id"], "bbbb2222-y");
    assert_eq!(transcript["title"], "Exam schedule");
    assert_eq!(
        transcript["messages"][1]["content"],
        "See the <strong>registrar</strong>."
    );
    assert_eq!(transcript["messages"][1]["sender"], "bot");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_history_show_without_current_session() {
    let server = history_server().await;
    let tmp = TempDir::new().unwrap();

    unichat(&server, &tmp)
        .args(["history", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No current session"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_history_show_unknown_session_fails() {
    let server = history_server().await;
    let tmp = TempDir::new().unwrap();

    unichat(&server, &tmp)
        .args(["history", "show", "zzzz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session not found: zzzz"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sessions_delete_calls_backend() {
    let server = history_server().await;
    Mock::given(method("DELETE"))
        .and(path("/api/chat/history"))
        .and(query_param("session_id", "bbbb2222-y"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let tmp = TempDir::new().unwrap();

    unichat(&server, &tmp)
        .args(["sessions", "delete", "bbbb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted conversation bbbb2222-y"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_temp_dir, config_path) =
        common::temp_config_file("server:\n  base_url: http://localhost:8000\n  timeout_seconds: 0\n");

    let mut cmd = Command::cargo_bin("unichat").unwrap();
    cmd.env_remove("UNICHAT_TIMEOUT_SECONDS")
        .arg("--config")
        .arg(config_path)
        .args(["sessions", "list"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("timeout_seconds must be between 1 and 600"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sessions_delete_blank_id_is_rejected() {
    let server = history_server().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let tmp = TempDir::new().unwrap();

    unichat(&server, &tmp)
        .args(["sessions", "delete", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session not found"));
}
