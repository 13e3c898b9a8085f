//! Telemetry initialization and resolution event helpers.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize `tracing` and format developer logs.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Payload for logging a completed entrypoint resolution.
#[derive(Debug, Serialize)]
pub struct ResolutionTelemetry<'a> {
    pub invoked: &'a Path,
    pub entrypoint: &'a Path,
    pub origin: &'a str,
    pub rule: &'a str,
}

/// Emit the resolution outcome to `tracing`.
pub fn emit_resolution(telemetry: &ResolutionTelemetry<'_>) {
    info!(
        target: "openclaw_launcher::resolve",
        invoked = %telemetry.invoked.display(),
        entrypoint = %telemetry.entrypoint.display(),
        origin = telemetry.origin,
        rule = telemetry.rule,
        "Resolved CLI entrypoint"
    );
}

/// Payload for logging the program arguments handed to the service manager.
#[derive(Debug, Serialize)]
pub struct LaunchTelemetry<'a> {
    pub runtime: &'a Path,
    pub port: u16,
    pub forwarded_flags: usize,
    pub program_arguments: &'a [String],
}

/// Emit the final argument vector to `tracing`.
pub fn emit_launch(telemetry: &LaunchTelemetry<'_>) {
    info!(
        target: "openclaw_launcher::launch",
        runtime = %telemetry.runtime.display(),
        port = telemetry.port,
        forwarded_flags = telemetry.forwarded_flags,
        program_arguments = ?telemetry.program_arguments,
        "Built gateway program arguments"
    );
}
