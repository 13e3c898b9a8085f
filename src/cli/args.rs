//! CLI argument definitions and `LaunchProfile` construction.
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use super::{resolve_config_path, resolve_invocation, LaunchOverrides, LaunchProfile};
use crate::launch::RuntimePreference;

/// Parsed command intent from CLI.
#[derive(Debug, Clone)]
pub enum ParsedCommand {
    ProgramArgs(LaunchProfile),
    ResolveEntrypoint(LaunchProfile),
}

/// Launcher subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum LauncherCommand {
    /// Print the gateway service program arguments as JSON.
    #[command(
        about = "Print the gateway service program arguments as JSON",
        after_help = "Hint: set OPENCLAW_LAUNCHER_INVOKED_PATH instead of --invoked when a service installer calls this command."
    )]
    ProgramArgs(ProgramArgsArgs),
    /// Print the resolved CLI entrypoint with its origin and selection rule.
    ResolveEntrypoint(ResolveEntrypointArgs),
}

/// Where the CLI was invoked from.
#[derive(Debug, Clone, Args)]
pub struct InvocationArgs {
    /// Script path the CLI was invoked with (overrides OPENCLAW_LAUNCHER_INVOKED_PATH).
    #[arg(long = "invoked")]
    pub invoked_path: Option<PathBuf>,
    /// Runtime executable that ran the CLI (overrides OPENCLAW_LAUNCHER_INVOKED_RUNTIME).
    #[arg(long = "invoked-runtime")]
    pub invoked_runtime: Option<PathBuf>,
}

/// Arguments for `program-args`.
#[derive(Debug, Clone, Args)]
pub struct ProgramArgsArgs {
    #[command(flatten)]
    pub invocation: InvocationArgs,
    /// Gateway port (defaults to the configured port).
    #[arg(long)]
    pub port: Option<u16>,
    /// Runtime used to relaunch the CLI.
    #[arg(long, value_enum)]
    pub runtime: Option<RuntimePreference>,
    /// Explicit runtime executable (overrides OPENCLAW_LAUNCHER_RUNTIME_PATH).
    #[arg(long = "runtime-path")]
    pub runtime_path: Option<PathBuf>,
    /// Value forwarded as `--bind`.
    #[arg(long)]
    pub bind: Option<String>,
    /// Value forwarded as `--auth`.
    #[arg(long)]
    pub auth: Option<String>,
    /// Value forwarded as `--tailscale`.
    #[arg(long)]
    pub tailscale: Option<String>,
}

/// Arguments for `resolve-entrypoint`.
#[derive(Debug, Clone, Args)]
pub struct ResolveEntrypointArgs {
    #[command(flatten)]
    pub invocation: InvocationArgs,
}

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openclaw-launcher",
    author,
    version,
    about = "Resolve the OpenClaw CLI entrypoint for gateway service installs",
    long_about = None
)]
pub struct LauncherArgs {
    /// Path to openclaw-launcher.toml (overrides OPENCLAW_LAUNCHER_CONFIG).
    #[arg(long = "config", global = true)]
    pub config_override: Option<PathBuf>,
    #[command(subcommand)]
    pub command: LauncherCommand,
}

impl LauncherArgs {
    /// Resolve paths from CLI args and environment variables.
    pub fn into_command(self) -> Result<ParsedCommand> {
        let config_path = resolve_config_path(self.config_override)?;
        match self.command {
            LauncherCommand::ProgramArgs(args) => {
                let invocation = resolve_invocation(
                    args.invocation.invoked_path,
                    args.invocation.invoked_runtime,
                )?;
                let overrides = LaunchOverrides::resolve(
                    args.port,
                    args.runtime,
                    args.runtime_path,
                    args.bind,
                    args.auth,
                    args.tailscale,
                )?;
                Ok(ParsedCommand::ProgramArgs(LaunchProfile {
                    config_path,
                    invocation,
                    overrides,
                }))
            }
            LauncherCommand::ResolveEntrypoint(args) => {
                let invocation = resolve_invocation(
                    args.invocation.invoked_path,
                    args.invocation.invoked_runtime,
                )?;
                Ok(ParsedCommand::ResolveEntrypoint(LaunchProfile {
                    config_path,
                    invocation,
                    overrides: LaunchOverrides::default(),
                }))
            }
        }
    }
}
