//! Assembly of the gateway program argument vector.
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::debug;

use super::options::{LaunchOptions, RuntimePreference};
use crate::{entrypoint::LookupProbe, lib::errors::LaunchError};

/// Subcommand token that starts the gateway.
pub const GATEWAY_SUBCOMMAND: &str = "gateway";
/// Flag preceding the gateway port.
pub const PORT_FLAG: &str = "--port";

/// Argument vector handed to a service manager, runtime first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayProgramArgs {
    pub program_arguments: Vec<String>,
}

impl GatewayProgramArgs {
    pub fn runtime(&self) -> Option<&str> {
        self.program_arguments.first().map(String::as_str)
    }

    pub fn entrypoint(&self) -> Option<&str> {
        self.program_arguments.get(1).map(String::as_str)
    }
}

/// `[runtime, entrypoint, "gateway", "--port", <port>, ...forwarded flags]`.
///
/// Paths are emitted verbatim; one that is not valid UTF-8 is rejected.
pub fn build_program_arguments(
    runtime: &Path,
    entrypoint: &Path,
    options: &LaunchOptions,
) -> Result<GatewayProgramArgs, LaunchError> {
    let mut program_arguments = vec![
        path_argument(runtime)?,
        path_argument(entrypoint)?,
        GATEWAY_SUBCOMMAND.to_string(),
        PORT_FLAG.to_string(),
        options.port.to_string(),
    ];
    for (flag, value) in options.forwarded_flags() {
        program_arguments.push(flag.flag().to_string());
        program_arguments.push(value.to_string());
    }
    Ok(GatewayProgramArgs { program_arguments })
}

/// Pick the runtime executable that will run the entrypoint.
///
/// An explicit path wins. `auto` reuses the current runtime; `node` and `bun`
/// reuse it only when its file name matches, otherwise they are looked up.
pub fn select_runtime<P: LookupProbe>(
    preference: RuntimePreference,
    explicit: Option<&Path>,
    current: Option<&Path>,
    probe: &P,
) -> Result<PathBuf, LaunchError> {
    if let Some(explicit) = explicit {
        return Ok(explicit.to_path_buf());
    }

    let reusable = current.filter(|path| match preference {
        RuntimePreference::Auto => true,
        RuntimePreference::Node | RuntimePreference::Bun => {
            runtime_stem(path) == Some(preference.binary_name())
        }
    });
    if let Some(current) = reusable {
        return Ok(current.to_path_buf());
    }

    debug!(
        target: "openclaw_launcher::launch",
        runtime = preference.as_str(),
        "Looking up runtime executable on search path"
    );
    probe
        .lookup(preference.binary_name())
        .ok_or(LaunchError::RuntimeNotFound {
            runtime: preference.binary_name(),
        })
}

fn runtime_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(OsStr::to_str)
}

fn path_argument(path: &Path) -> Result<String, LaunchError> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| LaunchError::NonUtf8Path {
            path: path.to_path_buf(),
        })
}
