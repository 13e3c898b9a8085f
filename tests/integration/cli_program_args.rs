use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::common::{fixture, launcher_command, run, InstallTree};

fn stdout_json(output: &std::process::Output) -> Result<Value> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).with_context(|| format!("stdout is not JSON: {stdout}"))
}

#[test]
fn program_args_prints_gateway_arguments() -> Result<()> {
    let tree = InstallTree::new();
    let entry = tree.file("usr/lib/node_modules/openclaw/dist/index.js");

    let output = run(launcher_command(tree.root())
        .args(["program-args", "--config"])
        .arg(fixture("tests/fixtures/config_minimal.toml"))
        .arg("--invoked")
        .arg(&entry)
        .args(["--runtime-path", "/opt/node/bin/node", "--port", "19001"])
        .args(["--tailscale", "serve", "--bind", "lan"]));

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        stdout_json(&output)?,
        json!({
            "programArguments": [
                "/opt/node/bin/node",
                entry.display().to_string(),
                "gateway",
                "--port",
                "19001",
                "--bind",
                "lan",
                "--tailscale",
                "serve"
            ]
        })
    );
    Ok(())
}

#[test]
fn program_args_reads_config_and_environment() -> Result<()> {
    let tree = InstallTree::new();
    tree.file("npx/9a1/node_modules/openclaw/dist/index.js");
    let shim = tree.link(
        "npx/9a1/node_modules/.bin/openclaw",
        "../openclaw/dist/index.js",
    );

    let output = run(launcher_command(tree.root())
        .env(
            "OPENCLAW_LAUNCHER_CONFIG",
            fixture("tests/fixtures/config_valid.toml"),
        )
        .env("OPENCLAW_LAUNCHER_INVOKED_PATH", &shim)
        .arg("program-args"));

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let payload = stdout_json(&output)?;
    assert_eq!(
        payload["programArguments"],
        json!([
            "/usr/local/bin/node",
            tree.path("npx/9a1/node_modules/openclaw/dist/index.js")
                .display()
                .to_string(),
            "gateway",
            "--port",
            "19001",
            "--bind",
            "loopback",
            "--auth",
            "token"
        ])
    );
    Ok(())
}

#[test]
fn runtime_is_looked_up_when_not_given() -> Result<()> {
    let tree = InstallTree::new();
    let entry = tree.file("g/node_modules/openclaw/dist/index.js");

    let output = run(launcher_command(tree.root())
        .env("OPENCLAW_LAUNCHER_LOOKUP_NODE", "/usr/bin/node")
        .args(["program-args", "--config"])
        .arg(fixture("tests/fixtures/config_minimal.toml"))
        .arg("--invoked")
        .arg(&entry));

    assert!(output.status.success());
    let payload = stdout_json(&output)?;
    assert_eq!(payload["programArguments"][0], "/usr/bin/node");
    assert_eq!(payload["programArguments"][4], "18789");
    Ok(())
}

#[test]
fn unbuilt_checkout_exits_with_entrypoint_error() {
    let tree = InstallTree::new();
    let wrapper = tree.file("src/openclaw/openclaw.mjs");
    let global = tree.file("usr/lib/node_modules/openclaw/dist/index.js");

    let output = run(launcher_command(tree.root())
        .env("OPENCLAW_LAUNCHER_LOOKUP_OPENCLAW", &global)
        .args(["program-args", "--config"])
        .arg(fixture("tests/fixtures/config_minimal.toml"))
        .arg("--invoked")
        .arg(&wrapper)
        .args(["--runtime-path", "/usr/bin/node"]));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(3), "stderr: {stderr}");
    assert!(stderr.contains("Cannot find built CLI"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_invoked_path_is_a_usage_failure() {
    let tree = InstallTree::new();

    let output = run(launcher_command(tree.root())
        .args(["program-args", "--config"])
        .arg(fixture("tests/fixtures/config_minimal.toml")));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1), "stderr: {stderr}");
    assert!(stderr.contains("OPENCLAW_LAUNCHER_INVOKED_PATH"), "stderr: {stderr}");
}

#[test]
fn invalid_config_is_reported() {
    let tree = InstallTree::new();
    let entry = tree.file("g/node_modules/openclaw/dist/index.js");

    let output = run(launcher_command(tree.root())
        .args(["program-args", "--config"])
        .arg(fixture("tests/fixtures/config_invalid_port.toml"))
        .arg("--invoked")
        .arg(&entry));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1), "stderr: {stderr}");
    assert!(stderr.contains("gateway.port"), "stderr: {stderr}");
}

#[test]
fn resolve_entrypoint_reports_origin_and_rule() -> Result<()> {
    let tree = InstallTree::new();
    let wrapper = tree.file("g/node_modules/openclaw/openclaw.mjs");
    let entry = tree.file("g/node_modules/openclaw/dist/entry.js");

    let output = run(launcher_command(tree.root())
        .args(["resolve-entrypoint", "--config"])
        .arg(fixture("tests/fixtures/config_minimal.toml"))
        .arg("--invoked")
        .arg(&wrapper));

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output)?,
        json!({
            "path": entry.display().to_string(),
            "origin": "derived_sibling",
            "rule": "derived_sibling"
        })
    );
    Ok(())
}
