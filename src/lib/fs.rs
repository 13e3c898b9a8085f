//! Tolerant filesystem probes used by entrypoint resolution.
//!
//! Every probe here downgrades I/O failures to an absent result. Callers decide
//! whether an absent result drops a candidate or keeps the raw path.

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::debug;

/// Resolve every symlink in `path`; `None` when the path cannot be dereferenced.
pub async fn realpath_or_none(path: &Path) -> Option<PathBuf> {
    match fs::canonicalize(path).await {
        Ok(resolved) => Some(resolved),
        Err(err) => {
            debug!(
                target: "openclaw_launcher::fs",
                path = %path.display(),
                reason = %err,
                "Real path resolution failed"
            );
            None
        }
    }
}

/// True when `path` is a regular file that can be opened for reading.
pub async fn is_readable_file(path: &Path) -> bool {
    let metadata = match fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(_) => return false,
    };
    if !metadata.is_file() {
        return false;
    }
    fs::File::open(path).await.is_ok()
}

/// Join `path` onto `cwd` when relative and fold `.`/`..` without touching the disk.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    normalize_lexically(&joined)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
