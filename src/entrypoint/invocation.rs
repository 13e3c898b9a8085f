//! Reads the path the current process was told to execute.
use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::lib::{errors::InvocationError, fs::absolutize};

/// Runtime executable and script path of a process invocation.
///
/// Mirrors `argv[0]`/`argv[1]` of a script runtime. Both paths are stored
/// absolute and lexically normalized; nothing here touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    runtime_path: Option<PathBuf>,
    entrypoint_path: PathBuf,
}

impl Invocation {
    /// Build an invocation from explicit paths, resolving relative ones against `cwd`.
    pub fn new(runtime_path: Option<PathBuf>, entrypoint_path: PathBuf, cwd: &Path) -> Self {
        Self {
            runtime_path: runtime_path.map(|path| absolutize(&path, cwd)),
            entrypoint_path: absolutize(&entrypoint_path, cwd),
        }
    }

    /// Build an invocation from an argument vector (`[runtime, script, ...]`).
    ///
    /// A bare runtime name such as `node` carries no location and is dropped.
    pub fn from_argv<I>(argv: I, cwd: &Path) -> Result<Self, InvocationError>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut argv = argv.into_iter();
        let runtime = argv
            .next()
            .map(PathBuf::from)
            .filter(|path| path.is_absolute() || path.components().count() > 1);
        let entrypoint = argv
            .next()
            .filter(|arg| !arg.is_empty())
            .map(PathBuf::from)
            .ok_or(InvocationError::MissingEntrypointArgument)?;
        Ok(Self::new(runtime, entrypoint, cwd))
    }

    /// Absolute path of the script being executed.
    pub fn entrypoint_path(&self) -> &Path {
        &self.entrypoint_path
    }

    /// Absolute path of the runtime executing the script, when known.
    pub fn runtime_path(&self) -> Option<&Path> {
        self.runtime_path.as_deref()
    }
}

/// Current working directory as a typed error.
pub fn current_dir() -> Result<PathBuf, InvocationError> {
    env::current_dir().map_err(|source| InvocationError::CurrentDir { source })
}
