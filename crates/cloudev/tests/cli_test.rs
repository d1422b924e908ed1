//! Integration tests for the `cloudev` CLI binary.
//!
//! Argument parsing, help output, completions, config handling and error
//! exit codes run without a service. Commands that talk to the service run
//! against a wiremock server passed via `--endpoint`.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `cloudev` binary with env isolation.
///
/// Clears all `CLOUDEV_*` env vars and points config directories at `home`
/// so tests never touch the user's real configuration.
fn cloudev_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("cloudev");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("CLOUDEV_PROFILE")
        .env_remove("CLOUDEV_ENDPOINT")
        .env_remove("CLOUDEV_REGION")
        .env_remove("CLOUDEV_TOKEN")
        .env_remove("CLOUDEV_OUTPUT")
        .env_remove("CLOUDEV_TIMEOUT")
        .env_remove("CLOUDEV_DEFAULT_PROFILE")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary against `server` off the async runtime and return its output.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let home = tempfile::tempdir().unwrap();
    let mut argv = vec![
        "--endpoint".to_owned(),
        server.uri(),
        "--token".to_owned(),
        "tok".to_owned(),
    ];
    argv.extend(args.iter().map(|a| (*a).to_owned()));

    tokio::task::spawn_blocking(move || {
        let output = cloudev_cmd(home.path()).args(&argv).write_stdin("").output();
        drop(home);
        output.unwrap()
    })
    .await
    .unwrap()
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", combined_output(output)))
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = cloudev_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    cloudev_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("whoami")
                .and(predicate::str::contains("list"))
                .and(predicate::str::contains("env"))
                .and(predicate::str::contains("branches")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    cloudev_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cloudev"));
}

#[test]
fn test_env_subcommands_exist() {
    let home = tempfile::tempdir().unwrap();
    cloudev_cmd(home.path())
        .args(["env", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("start")
                .and(predicate::str::contains("stop"))
                .and(predicate::str::contains("delete"))
                .and(predicate::str::contains("create"))
                .and(predicate::str::contains("update")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    cloudev_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    cloudev_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_resource_kind() {
    let home = tempfile::tempdir().unwrap();
    let output = cloudev_cmd(home.path()).args(["list", "widgets"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("possible values") || text.contains("invalid value"),
        "Expected error about valid kinds:\n{text}"
    );
}

#[test]
fn test_missing_token_exits_with_auth_code() {
    let home = tempfile::tempdir().unwrap();
    cloudev_cmd(home.path())
        .args(["list", "org"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No token configured"));
}

#[test]
fn test_listing_all_branches_is_unsupported() {
    let home = tempfile::tempdir().unwrap();
    cloudev_cmd(home.path())
        .args(["--token", "tok", "--endpoint", "http://127.0.0.1:9", "list", "branch"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("branches list"));
}

#[test]
fn test_delete_requires_yes_when_not_interactive() {
    let home = tempfile::tempdir().unwrap();
    cloudev_cmd(home.path())
        .args([
            "--token",
            "tok",
            "--endpoint",
            "http://127.0.0.1:9",
            "env",
            "delete",
            "acme",
            "rocket",
            "env-1",
        ])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_without_file() {
    let home = tempfile::tempdir().unwrap();
    cloudev_cmd(home.path()).args(["config", "show"]).assert().success();
}

#[test]
fn test_config_set_then_show_redacts_token() {
    let home = tempfile::tempdir().unwrap();
    cloudev_cmd(home.path())
        .args(["config", "set", "endpoint", "https://devenv.example.com"])
        .assert()
        .success();
    cloudev_cmd(home.path())
        .args(["config", "set", "token", "s3cret-value"])
        .assert()
        .success();

    cloudev_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://devenv.example.com")
                .and(predicate::str::contains("****"))
                .and(predicate::str::contains("s3cret-value").not()),
        );
}

#[test]
fn test_config_set_rejects_invalid_values() {
    let home = tempfile::tempdir().unwrap();
    cloudev_cmd(home.path())
        .args(["config", "set", "poll_interval", "0"])
        .assert()
        .code(2);
    cloudev_cmd(home.path())
        .args(["config", "set", "colour", "red"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn test_config_use_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    cloudev_cmd(home.path())
        .args(["config", "use", "nowhere"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn test_config_path_mentions_cloudev() {
    let home = tempfile::tempdir().unwrap();
    cloudev_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cloudev").and(predicate::str::contains("config.toml")));
}

// ── Against a mock service ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_whoami_prints_user_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/VerifySession"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "identity": "u1" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/GetUserDetails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": "u1",
            "userName": "ada",
            "displayName": "Ada Lovelace",
            "version": "1"
        })))
        .mount(&server)
        .await;

    let output = run_against(&server, &["-o", "json", "whoami"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let user = stdout_json(&output);
    assert_eq!(user["user_name"], "ada");
    assert_eq!(user["user_id"], "u1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_token_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/VerifySession"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "UnauthorizedException",
            "message": "token expired"
        })))
        .mount(&server)
        .await;

    let output = run_against(&server, &["whoami"]).await;
    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_envs_walks_orgs_and_projects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/ListOrganizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "name": "acme" }, { "name": "globex" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/ListProjects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "name": "rocket" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/ListDevEnvironments"))
        .and(body_partial_json(json!({ "organizationName": "acme" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": "env-1", "status": "RUNNING" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/ListDevEnvironments"))
        .and(body_partial_json(json!({ "organizationName": "globex" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": "env-2", "status": "STOPPED" }]
        })))
        .mount(&server)
        .await;

    let output = run_against(&server, &["-o", "plain", "list", "envs"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["acme/rocket/env-1", "globex/rocket/env-2"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_env_start_no_wait_sends_one_command() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/StartDevEnvironment"))
        .and(body_partial_json(json!({
            "organizationName": "acme",
            "projectName": "rocket",
            "id": "env-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "env-1",
            "status": "STARTING"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["env", "start", "acme", "rocket", "env-1", "--no-wait"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("STARTING"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_env_get_missing_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/GetDevEnvironment"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "ResourceNotFoundException",
            "message": "no such dev environment"
        })))
        .mount(&server)
        .await;

    let output = run_against(&server, &["env", "get", "acme", "rocket", "env-9"]).await;
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}
