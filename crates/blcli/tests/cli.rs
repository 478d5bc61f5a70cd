use std::fs;

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

/// Port 9 (discard) is not expected to accept connections.
const UNROUTABLE_API: &str = "http://127.0.0.1:9/api/";

/// Binary with an empty HOME and no credentials inherited from the caller.
fn blcli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("blcli").expect("binary built");
    cmd.env("HOME", home.path())
        .env("USERPROFILE", home.path())
        .env_remove("BL_API_TOKEN")
        .env_remove("BL_API_URL")
        .env_remove("BL_HTTP_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

fn home() -> TempDir {
    tempfile::tempdir().expect("temp home")
}

#[test]
fn version_flag_succeeds() {
    let home = home();
    blcli(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("blcli"));
}

#[test]
fn version_command_needs_no_token() {
    let home = home();
    blcli(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "blcli {}\n",
            env!("CARGO_PKG_VERSION")
        )))
        .stderr(predicate::str::is_empty());
}

#[test]
fn version_command_rejects_arguments() {
    let home = home();
    blcli(&home)
        .args(["version", "now"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("Error: \"version\" accepts 0 argument(s)"));
}

#[test]
fn no_command_prints_root_usage() {
    let home = home();
    blcli(&home)
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("transaction"));
}

#[test]
fn group_help_needs_no_token() {
    let home = home();
    blcli(&home)
        .args(["account", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: blcli account <command>"))
        .stdout(predicate::str::contains("history"));
}

#[test]
fn missing_token_is_reported_on_one_line() {
    let home = home();
    blcli(&home)
        .args(["server", "list"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with(
            "Error: You must specify your API token",
        ))
        .stderr(predicate::function(|text: &str| text.lines().count() == 1));
}

#[test]
fn server_create_without_credentials_fails_before_network() {
    let home = home();
    blcli(&home)
        .args(["--token", "abc", "--api-url", UNROUTABLE_API])
        .args([
            "server", "create", "--name", "foo", "--host", "do", "--image", "x", "--size", "y",
            "--region", "z",
        ])
        .assert()
        .code(1)
        .stderr("Error: You must provide either --sshkey or --password\n");
}

#[test]
fn missing_positional_is_a_validation_error() {
    let home = home();
    blcli(&home)
        .args(["--token", "abc", "--api-url", UNROUTABLE_API, "server", "get"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("<server-id>"));
}

#[test]
fn unknown_output_format_fails_at_startup() {
    let home = home();
    blcli(&home)
        .args(["--token", "abc", "--api-url", UNROUTABLE_API, "--output", "yaml"])
        .args(["server", "list"])
        .assert()
        .code(1)
        .stderr("Error: unknown output format 'yaml'\n");
}

#[test]
fn explicit_config_must_exist() {
    let home = home();
    let missing = home.path().join("missing.yaml");
    blcli(&home)
        .arg("--config")
        .arg(&missing)
        .args(["server", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error: failed to read config file"));
}

#[test]
fn token_from_home_config_reaches_the_api() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/servers/srv-1")
            .header("authorization", "Bearer yaml-token");
        then.status(200).json_body(json!({
            "id": "srv-1",
            "name": "web-1",
            "host": 1,
            "status": "ok"
        }));
    });

    let home = home();
    fs::write(
        home.path().join(".blcli.yaml"),
        format!("token: yaml-token\napi_url: {}\n", server.url("/")),
    )
    .expect("write config");

    blcli(&home)
        .args(["server", "get", "srv-1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\n  \"id\": \"srv-1\",\n  \"name\": \"web-1\""));
    mock.assert();
}

#[test]
fn remote_errors_name_the_action() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/ssh-keys/key-9");
        then.status(404).json_body(json!({ "error": "ssh key not found" }));
    });

    let home = home();
    blcli(&home)
        .args(["--token", "abc", "--api-url", &server.url("/")])
        .args(["sshkey", "rm", "key-9"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr("Error deleting ssh key: not found: ssh key not found\n");
    mock.assert();
}

#[test]
fn confirmation_is_printed_on_success() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/servers/srv-1/restart");
        then.status(200);
    });

    let home = home();
    blcli(&home)
        .args(["--token", "abc", "--api-url", &server.url("/")])
        .args(["server", "reboot", "srv-1"])
        .assert()
        .success()
        .stdout("Restarted server\n");
    mock.assert();
}

#[test]
fn null_payment_address_cannot_render_a_qr_code() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/transactions/tx-7");
        then.status(200).json_body(json!({
            "id": "tx-7",
            "address": null,
            "cryptoSymbol": "PAYPAL",
            "amountCrypto": null
        }));
    });

    let home = home();
    blcli(&home)
        .args(["--token", "abc", "--api-url", &server.url("/")])
        .args(["transaction", "qr", "tx-7"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr("Error: Unable to generate a QR Code for this type of transaction.\n");
    mock.assert();
}
