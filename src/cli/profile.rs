//! LaunchProfile and invocation/config path resolution.
use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};

use crate::{
    entrypoint::{invocation::current_dir, Invocation},
    launch::{GatewayFlag, LaunchOptions, RuntimePreference},
    lib::fs::absolutize,
};

pub const INVOKED_PATH_ENV: &str = "OPENCLAW_LAUNCHER_INVOKED_PATH";
pub const INVOKED_RUNTIME_ENV: &str = "OPENCLAW_LAUNCHER_INVOKED_RUNTIME";
pub const RUNTIME_PATH_ENV: &str = "OPENCLAW_LAUNCHER_RUNTIME_PATH";

/// Resolved launch profile.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    /// Explicit config file; `None` defers to the environment and defaults.
    pub config_path: Option<PathBuf>,
    pub invocation: Invocation,
    pub overrides: LaunchOverrides,
}

/// CLI values layered over the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOverrides {
    pub port: Option<u16>,
    pub runtime: Option<RuntimePreference>,
    pub runtime_path: Option<PathBuf>,
    pub flags: Vec<(GatewayFlag, String)>,
}

impl LaunchOverrides {
    /// Collect overrides, reading the runtime path from the environment when absent.
    pub fn resolve(
        port: Option<u16>,
        runtime: Option<RuntimePreference>,
        runtime_path: Option<PathBuf>,
        bind: Option<String>,
        auth: Option<String>,
        tailscale: Option<String>,
    ) -> Result<Self> {
        let runtime_path = match non_empty_path(runtime_path, RUNTIME_PATH_ENV) {
            Some(path) => Some(absolute_from_cwd(&path)?),
            None => None,
        };
        let flags = [
            (GatewayFlag::Bind, bind),
            (GatewayFlag::Auth, auth),
            (GatewayFlag::Tailscale, tailscale),
        ]
        .into_iter()
        .filter_map(|(flag, value)| value.map(|value| (flag, value)))
        .collect();

        Ok(Self {
            port,
            runtime,
            runtime_path,
            flags,
        })
    }

    /// Layer these overrides on top of `options`.
    pub fn apply(&self, mut options: LaunchOptions) -> LaunchOptions {
        if let Some(port) = self.port {
            options.port = port;
        }
        if let Some(runtime) = self.runtime {
            options.runtime = runtime;
        }
        if let Some(runtime_path) = &self.runtime_path {
            options.runtime_path = Some(runtime_path.clone());
        }
        for (flag, value) in &self.flags {
            options = options.with_flag(*flag, value.clone());
        }
        options
    }
}

/// Make an explicit `--config` path absolute; `None` stays `None`.
pub fn resolve_config_path(override_path: Option<PathBuf>) -> Result<Option<PathBuf>> {
    override_path
        .map(|path| absolute_from_cwd(&path))
        .transpose()
}

/// Resolve the invocation in the order: CLI flag → env var.
pub fn resolve_invocation(
    invoked_path: Option<PathBuf>,
    invoked_runtime: Option<PathBuf>,
) -> Result<Invocation> {
    let entrypoint = non_empty_path(invoked_path, INVOKED_PATH_ENV).ok_or_else(|| {
        anyhow!("no invoked CLI path: pass --invoked or set {INVOKED_PATH_ENV}")
    })?;
    let runtime = non_empty_path(invoked_runtime, INVOKED_RUNTIME_ENV);
    let cwd = current_dir().context("failed to resolve the invoked CLI path")?;
    Ok(Invocation::new(runtime, entrypoint, &cwd))
}

fn non_empty_path(value: Option<PathBuf>, env_key: &str) -> Option<PathBuf> {
    value
        .or_else(|| env::var_os(env_key).map(PathBuf::from))
        .filter(|path| !path.as_os_str().is_empty())
}

fn absolute_from_cwd(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir().context("failed to obtain current directory")?;
    Ok(absolutize(path, &cwd))
}
