use std::{
    collections::HashMap,
    env,
    path::PathBuf,
    process::Command,
    sync::Mutex,
};

use tracing::debug;

use crate::lib::paths::is_nonempty_absolute;

#[cfg(windows)]
const LOOKUP_COMMAND: &str = "where";
#[cfg(not(windows))]
const LOOKUP_COMMAND: &str = "which";

/// Prefix for per-binary overrides read by [`EnvLookupProbe`].
pub const LOOKUP_ENV_PREFIX: &str = "OPENCLAW_LAUNCHER_LOOKUP_";

/// Abstraction for search-path lookups during entrypoint resolution.
///
/// Lookups are best-effort: every failure is reported as `None`.
pub trait LookupProbe {
    fn lookup(&self, binary_name: &str) -> Option<PathBuf>;
}

/// Probe that runs `which` (`where` on Windows) against the real environment.
pub struct SystemLookupProbe;

impl LookupProbe for SystemLookupProbe {
    fn lookup(&self, binary_name: &str) -> Option<PathBuf> {
        let output = match Command::new(LOOKUP_COMMAND).arg(binary_name).output() {
            Ok(output) => output,
            Err(err) => {
                debug!(
                    target: "openclaw_launcher::probe",
                    command = LOOKUP_COMMAND,
                    binary = binary_name,
                    reason = %err,
                    "Lookup command unavailable"
                );
                return None;
            }
        };
        if !output.status.success() {
            debug!(
                target: "openclaw_launcher::probe",
                command = LOOKUP_COMMAND,
                binary = binary_name,
                exit_code = ?output.status.code(),
                "Binary not found on search path"
            );
            return None;
        }
        parse_lookup_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Probe that answers from `OPENCLAW_LAUNCHER_LOOKUP_<NAME>` variables.
///
/// `<NAME>` is the binary name upper-cased with `-` and `.` replaced by `_`.
pub struct EnvLookupProbe;

impl EnvLookupProbe {
    /// Environment variable consulted for `binary_name`.
    pub fn variable_for(binary_name: &str) -> String {
        let suffix: String = binary_name
            .chars()
            .map(|ch| match ch {
                '-' | '.' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        format!("{LOOKUP_ENV_PREFIX}{suffix}")
    }
}

impl LookupProbe for EnvLookupProbe {
    fn lookup(&self, binary_name: &str) -> Option<PathBuf> {
        let value = env::var(Self::variable_for(binary_name)).ok()?;
        parse_lookup_output(&value)
    }
}

/// Probe with fixed answers that records every lookup it receives.
#[derive(Debug, Default)]
pub struct StaticLookupProbe {
    answers: HashMap<String, PathBuf>,
    calls: Mutex<Vec<String>>,
}

impl StaticLookupProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer lookups of `binary_name` with `path`.
    pub fn with_answer(mut self, binary_name: &str, path: impl Into<PathBuf>) -> Self {
        self.answers.insert(binary_name.to_string(), path.into());
        self
    }

    /// Binary names looked up so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        match self.calls.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether `binary_name` has been looked up.
    pub fn was_called_for(&self, binary_name: &str) -> bool {
        self.calls().iter().any(|name| name == binary_name)
    }
}

impl LookupProbe for StaticLookupProbe {
    fn lookup(&self, binary_name: &str) -> Option<PathBuf> {
        match self.calls.lock() {
            Ok(mut guard) => guard.push(binary_name.to_string()),
            Err(poisoned) => poisoned.into_inner().push(binary_name.to_string()),
        }
        self.answers.get(binary_name).cloned()
    }
}

/// First non-empty trimmed line, accepted only when it is an absolute path.
pub fn parse_lookup_output(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
        .filter(|path| is_nonempty_absolute(path))
}
