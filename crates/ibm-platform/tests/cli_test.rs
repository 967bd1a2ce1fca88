//! Integration tests for the `ibm-platform` CLI binary.
//!
//! Argument parsing, help output, completions and error exit codes run
//! without any service; the end-to-end cases talk to a local mock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const SERVICE_PREFIXES: [&str; 4] = [
    "CONTEXT_BASED_RESTRICTIONS",
    "IAM_IDENTITY",
    "PLATFORM_NOTIFICATIONS",
    "RESOURCE_MANAGER",
];

/// Build a [`Command`] for the binary with env isolation.
///
/// Points settings at a nonexistent home, runs inside an empty directory
/// so no `ibm-credentials.env` is picked up, and clears every variable
/// the CLI reads.
fn cli_cmd(workdir: &tempfile::TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ibm-platform");
    cmd.current_dir(workdir.path())
        .env("HOME", "/tmp/ibm-platform-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/ibm-platform-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("IBM_CREDENTIALS_FILE")
        .env_remove("IBMCLOUD_API_KEY")
        .env_remove("IBM_PLATFORM_ACCOUNT_ID")
        .env_remove("IBM_PLATFORM_OUTPUT")
        .env_remove("IBM_PLATFORM_TIMEOUT");
    for prefix in SERVICE_PREFIXES {
        for key in [
            "URL",
            "AUTH_TYPE",
            "APIKEY",
            "BEARER_TOKEN",
            "USERNAME",
            "PASSWORD",
            "CA_FILE",
        ] {
            cmd.env_remove(format!("{prefix}_{key}"));
        }
    }
    cmd
}

fn workdir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = workdir();
    let output = cli_cmd(&dir).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let dir = workdir();
    cli_cmd(&dir).arg("--help").assert().success().stdout(
        predicate::str::contains("zones")
            .and(predicate::str::contains("api-keys"))
            .and(predicate::str::contains("destinations"))
            .and(predicate::str::contains("resource-groups")),
    );
}

#[test]
fn test_version_flag() {
    let dir = workdir();
    cli_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ibm-platform"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let dir = workdir();
    cli_cmd(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let dir = workdir();
    cli_cmd(&dir)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let dir = workdir();
    cli_cmd(&dir).arg("frobnicate").assert().failure().code(2);
}

#[test]
fn test_invalid_output_format() {
    let dir = workdir();
    cli_cmd(&dir)
        .args(["--output", "xml", "quotas", "list"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_missing_credentials_is_auth_error() {
    let dir = workdir();
    cli_cmd(&dir)
        .args(["api-keys", "list"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("iam_identity"));
}

#[test]
fn test_zones_require_account() {
    let dir = workdir();
    cli_cmd(&dir)
        .args(["--apikey", "not-used", "zones", "list"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("account ID"));
}

#[test]
fn test_destination_id_must_be_uuid() {
    let dir = workdir();
    cli_cmd(&dir)
        .args([
            "--apikey",
            "not-used",
            "--account-id",
            "acct",
            "destinations",
            "add",
            "not-a-uuid",
        ])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_delete_without_tty_requires_yes() {
    let dir = workdir();
    cli_cmd(&dir)
        .args(["--apikey", "not-used", "resource-groups", "delete", "rg1"])
        .write_stdin("")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_masks_secrets() {
    let dir = workdir();
    std::fs::write(
        dir.path().join("ibm-credentials.env"),
        "IAM_IDENTITY_APIKEY=super-secret-key\n",
    )
    .unwrap();
    cli_cmd(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("iam_identity")
                .and(predicate::str::contains("****"))
                .and(predicate::str::contains("super-secret-key").not()),
        );
}

// ── Against a mock service ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_resource_groups_list_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resource_groups"))
        .and(query_param("account_id", "acct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [
                {"id": "rg1", "name": "Default", "state": "ACTIVE", "default": true},
                {"id": "rg2", "name": "staging", "state": "ACTIVE", "default": false}
            ]
        })))
        .mount(&server)
        .await;

    let dir = workdir();
    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        cli_cmd(&dir)
            .env("RESOURCE_MANAGER_AUTH_TYPE", "noauth")
            .args(["--url", uri.as_str(), "--account-id", "acct", "-o", "plain"])
            .args(["resource-groups", "list"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "rg1\nrg2");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_quota_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quota_definitions/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"code": "not_found", "message": "Quota definition not found"}],
            "trace": "abc123"
        })))
        .mount(&server)
        .await;

    let dir = workdir();
    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        cli_cmd(&dir)
            .env("RESOURCE_MANAGER_AUTH_TYPE", "noauth")
            .args(["--url", uri.as_str(), "quotas", "get", "nope"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("quotas list"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resource_quota_for_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quota_definitions/accounts/acct/resource_types/cloudant"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "rq1",
            "resource_id": "cloudant",
            "limit": 3
        })))
        .mount(&server)
        .await;

    let dir = workdir();
    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        cli_cmd(&dir)
            .env("RESOURCE_MANAGER_AUTH_TYPE", "noauth")
            .args(["--url", uri.as_str(), "--account-id", "acct", "-o", "json"])
            .args(["quotas", "resource", "cloudant"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["_id"], "rq1");
    assert_eq!(body["limit"], 3.0);
}
