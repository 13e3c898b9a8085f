use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Errors that can occur while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to build (read) the configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize TOML into a struct.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Field failed validation.
    #[error("Configuration file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }
}

/// Terminal failure of entrypoint resolution.
#[derive(Debug, Error)]
pub enum EntrypointError {
    /// No candidate from the invoking path's lineage exists on disk.
    #[error(
        "Cannot find built CLI entrypoint for {invoked} (tried: {}). Build the package or reinstall it before installing the gateway service.",
        format_attempted(.attempted)
    )]
    NotFound {
        invoked: PathBuf,
        attempted: Vec<PathBuf>,
    },
}

impl EntrypointError {
    /// Paths that were checked before giving up.
    pub fn attempted(&self) -> &[PathBuf] {
        match self {
            EntrypointError::NotFound { attempted, .. } => attempted,
        }
    }
}

fn format_attempted(attempted: &[PathBuf]) -> String {
    if attempted.is_empty() {
        return "no candidates".into();
    }
    attempted
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failures reading the current invocation.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("Process argument vector has no entrypoint path at index 1")]
    MissingEntrypointArgument,
    #[error("Failed to obtain current directory: {source}")]
    CurrentDir {
        #[source]
        source: io::Error,
    },
}

/// High-level failure types returned while building gateway program arguments.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Gateway port must be between 1 and 65535 (got {port})")]
    InvalidPort { port: u16 },
    #[error("Could not locate the `{runtime}` runtime executable; pass --runtime-path")]
    RuntimeNotFound { runtime: &'static str },
    #[error(transparent)]
    Entrypoint(#[from] EntrypointError),
    #[error("Path is not valid UTF-8 and cannot be written to a service definition: {}", .path.display())]
    NonUtf8Path { path: PathBuf },
}

impl LaunchError {
    /// True when the failure is the unresolvable-entrypoint condition.
    pub fn is_entrypoint_not_found(&self) -> bool {
        matches!(self, LaunchError::Entrypoint(EntrypointError::NotFound { .. }))
    }
}
