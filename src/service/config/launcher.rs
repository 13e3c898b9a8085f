use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{launch::RuntimePreference, lib::errors::ConfigError};

/// Name the CLI is published and installed under.
pub const DEFAULT_BINARY_NAME: &str = "openclaw";

/// Launcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherSection {
    pub binary_name: String,
    pub runtime: RuntimePreference,
    pub runtime_path: Option<PathBuf>,
}

impl Default for LauncherSection {
    fn default() -> Self {
        Self {
            binary_name: DEFAULT_BINARY_NAME.to_string(),
            runtime: RuntimePreference::Auto,
            runtime_path: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawLauncherSection {
    pub binary_name: Option<String>,
    pub runtime: Option<String>,
    pub runtime_path: Option<PathBuf>,
}

pub fn parse_launcher_section(
    raw: Option<RawLauncherSection>,
    path: &Path,
) -> Result<LauncherSection, ConfigError> {
    let launcher_raw = raw.unwrap_or_default();

    let binary_name = launcher_raw
        .binary_name
        .unwrap_or_else(|| DEFAULT_BINARY_NAME.to_string());
    validate_binary_name(path, &binary_name)?;

    let runtime = match launcher_raw.runtime {
        Some(value) => {
            RuntimePreference::parse(&value).ok_or_else(|| ConfigError::InvalidField {
                path: path.to_path_buf(),
                field: "launcher.runtime",
                message: format!("Use one of auto, node, bun (got `{value}`)"),
            })?
        }
        None => RuntimePreference::Auto,
    };

    if let Some(runtime_path) = &launcher_raw.runtime_path {
        validate_runtime_path(path, runtime_path)?;
    }

    Ok(LauncherSection {
        binary_name,
        runtime,
        runtime_path: launcher_raw.runtime_path,
    })
}

fn validate_binary_name(path: &Path, binary_name: &str) -> Result<(), ConfigError> {
    let trimmed = binary_name.trim();
    if trimmed.is_empty() || trimmed != binary_name {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "launcher.binary_name",
            message: "Binary name cannot be empty or padded with whitespace".into(),
        });
    }
    if binary_name.contains(['/', '\\']) {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "launcher.binary_name",
            message: format!("Use a bare executable name, not a path: {binary_name}"),
        });
    }
    Ok(())
}

fn validate_runtime_path(path: &Path, runtime_path: &Path) -> Result<(), ConfigError> {
    if runtime_path.as_os_str().is_empty() || !runtime_path.is_absolute() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "launcher.runtime_path",
            message: format!(
                "Only absolute paths are allowed: {}",
                runtime_path.display()
            ),
        });
    }
    Ok(())
}
