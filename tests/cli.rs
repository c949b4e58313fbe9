//! Smoke tests for the `giftchat` binary.

use assert_cmd::prelude::*;
use assert_cmd::Command;
use std::path::PathBuf;
use std::process::Output;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A command isolated from the user's settings and environment.
fn giftchat(config_dir: &TempDir) -> Command {
    command_in(config_dir.path().to_path_buf())
}

fn command_in(config_home: PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("giftchat").unwrap();
    cmd.env_remove("GIFTCHAT_ENDPOINT")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", config_home);
    cmd
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_blocking(config_dir: &TempDir, args: Vec<String>) -> Output {
    let config_home = config_dir.path().to_path_buf();
    tokio::task::spawn_blocking(move || command_in(config_home).args(args).output())
        .await
        .unwrap()
        .unwrap()
}

#[test]
fn test_help_lists_flags() {
    let dir = TempDir::new().unwrap();
    giftchat(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--endpoint"))
        .stdout(predicate::str::contains("--prompt"))
        .stdout(predicate::str::contains("--timeout"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    giftchat(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("giftchat"));
}

#[test]
fn test_invalid_endpoint_is_rejected() {
    let dir = TempDir::new().unwrap();
    giftchat(&dir)
        .args(["--endpoint", "not a url", "--prompt", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot use endpoint"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_single_prompt_prints_reply_and_gifts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "How about a telescope?",
            "gifts": [
                { "gift": "Telescope", "reason": "matches astronomy interest", "price_range": "$50-$100" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = format!("{}/api/chat", server.uri());
    let dir = TempDir::new().unwrap();
    let output = run_blocking(
        &dir,
        vec![
            "--endpoint".into(),
            endpoint,
            "--prompt".into(),
            "gift for my nephew".into(),
        ],
    )
    .await;
    output
        .assert()
        .success()
        .stdout(predicate::str::contains("How about a telescope?"))
        .stdout(predicate::str::contains("- Telescope ($50-$100): matches astronomy interest"))
        // No suggestions in the reply, so the fallback chips are offered.
        .stdout(predicate::str::contains("[1] Birthday gifts"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_single_prompt_failure_shows_apology() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let endpoint = format!("{}/api/chat", server.uri());
    let dir = TempDir::new().unwrap();
    let output = run_blocking(
        &dir,
        vec!["--endpoint".into(), endpoint, "--prompt".into(), "hello".into()],
    )
    .await;
    output
        .assert()
        .failure()
        .stdout(predicate::str::contains("Sorry, I encountered an error."))
        .stdout(predicate::str::contains("500").not())
        .stderr(predicate::str::contains("did not reply"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_endpoint_from_settings_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/custom"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "from settings" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let settings_dir = dir.path().join("giftchat");
    std::fs::create_dir_all(&settings_dir).unwrap();
    std::fs::write(
        settings_dir.join("settings.json"),
        json!({ "endpoint": format!("{}/custom", server.uri()) }).to_string(),
    )
    .unwrap();

    let output = run_blocking(&dir, vec!["--prompt".into(), "hi".into()]).await;
    output
        .assert()
        .success()
        .stdout(predicate::str::contains("from settings"));
}

#[test]
fn test_empty_prompt_is_an_error() {
    let dir = TempDir::new().unwrap();
    giftchat(&dir)
        .args(["--endpoint", "http://127.0.0.1:9/api/chat", "--prompt", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to send"));
}
