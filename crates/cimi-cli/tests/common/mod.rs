use std::path::Path;
use std::process::Output;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the CLI binary with an isolated HOME and no CIMI_* environment.
pub async fn run_cli(args: &[&str], home: &Path) -> Output {
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_cimi"));
    cmd.args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("NO_COLOR", "1")
        .env_remove("CIMI_ENDPOINT_URL")
        .env_remove("CIMI_USERNAME")
        .env_remove("CIMI_PASSWORD")
        .env_remove("RUST_LOG");
    cmd.output().await.expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub async fn run_cli_success(args: &[&str], home: &Path) -> String {
    let output = run_cli(args, home).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub async fn run_cli_failure(args: &[&str], home: &Path) -> String {
    let output = run_cli(args, home).await;
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn endpoint(server: &MockServer) -> String {
    format!("{}/cimi", server.uri())
}

pub fn href(server: &MockServer, rest: &str) -> String {
    format!("{}/cimi/{}", server.uri(), rest)
}

pub fn job(server: &MockServer, status: &str, target: &str) -> Value {
    json!({
        "resourceURI": "http://schemas.dmtf.org/cimi/1/Job",
        "id": href(server, "jobs/5"),
        "status": status,
        "targetResource": {"href": href(server, target)},
        "action": "delete"
    })
}

/// Mount an entry point advertising the usual collections.
pub async fn mount_entry_point(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/cimi/cloudEntryPoint"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": href(server, "cloudEntryPoint"),
            "name": "mock cloud",
            "systems": {"href": href(server, "systems")},
            "machines": {"href": href(server, "machines")},
            "jobs": {"href": href(server, "jobs")}
        })))
        .mount(server)
        .await;
}
