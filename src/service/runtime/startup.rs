use std::{env, process::ExitCode};

use anyhow::{Context, Error};

use crate::{
    cli::{LaunchProfile, ParsedCommand},
    entrypoint::{resolve_cli_entrypoint, EnvLookupProbe, LookupProbe, SystemLookupProbe},
    launch::resolve_gateway_program_args,
    lib::errors::LaunchError,
    service::config::LauncherConfig,
};

/// Selects the lookup probe: `env` answers from environment variables.
pub const LOOKUP_PROBE_ENV: &str = "OPENCLAW_LAUNCHER_LOOKUP_PROBE";
/// Exit code reported when no built entrypoint could be resolved.
pub const EXIT_ENTRYPOINT_NOT_FOUND: u8 = 3;

/// Bundles a runtime error message with an exit code.
#[derive(Debug)]
pub struct RuntimeExit {
    message: String,
    exit_code: ExitCode,
}

impl RuntimeExit {
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: format!("{err:?}"),
            exit_code: ExitCode::FAILURE,
        }
    }

    /// Like [`RuntimeExit::from_error`], with a dedicated code for a missing entrypoint.
    pub fn from_launch_error(err: LaunchError) -> Self {
        let exit_code = if err.is_entrypoint_not_found() {
            ExitCode::from(EXIT_ENTRYPOINT_NOT_FOUND)
        } else {
            ExitCode::FAILURE
        };
        Self {
            message: err.to_string(),
            exit_code,
        }
    }

    pub fn report(self) -> ExitCode {
        eprintln!("{}", self.message);
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }
}

/// Run a parsed command and return the JSON payload to print.
pub async fn run_command(command: ParsedCommand) -> Result<String, RuntimeExit> {
    if uses_env_probe(env::var(LOOKUP_PROBE_ENV).ok().as_deref()) {
        run_command_with_probe(command, &EnvLookupProbe).await
    } else {
        run_command_with_probe(command, &SystemLookupProbe).await
    }
}

fn uses_env_probe(selector: Option<&str>) -> bool {
    selector == Some("env")
}

/// Version that allows injecting a test double.
pub async fn run_command_with_probe<P: LookupProbe>(
    command: ParsedCommand,
    probe: &P,
) -> Result<String, RuntimeExit> {
    match command {
        ParsedCommand::ProgramArgs(profile) => program_args(profile, probe).await,
        ParsedCommand::ResolveEntrypoint(profile) => resolve_entrypoint(profile, probe).await,
    }
}

async fn program_args<P: LookupProbe>(
    profile: LaunchProfile,
    probe: &P,
) -> Result<String, RuntimeExit> {
    let config = load_config(&profile)?;
    let options = profile.overrides.apply(config.launch_options());
    let args = resolve_gateway_program_args(
        &profile.invocation,
        &options,
        &config.launcher.binary_name,
        probe,
    )
    .await
    .map_err(RuntimeExit::from_launch_error)?;

    serde_json::to_string_pretty(&args)
        .context("failed to serialize program arguments")
        .map_err(RuntimeExit::from_error)
}

async fn resolve_entrypoint<P: LookupProbe>(
    profile: LaunchProfile,
    probe: &P,
) -> Result<String, RuntimeExit> {
    let config = load_config(&profile)?;
    let resolved = resolve_cli_entrypoint(&profile.invocation, &config.launcher.binary_name, probe)
        .await
        .map_err(|err| RuntimeExit::from_launch_error(err.into()))?;

    serde_json::to_string_pretty(&resolved)
        .context("failed to serialize resolved entrypoint")
        .map_err(RuntimeExit::from_error)
}

fn load_config(profile: &LaunchProfile) -> Result<LauncherConfig, RuntimeExit> {
    LauncherConfig::load(profile.config_path.clone())
        .map_err(|err| RuntimeExit::from_error(Error::new(err)))
}
