//! Origin-tagged entrypoint candidates and the paths derived from them.
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::lib::{fs::realpath_or_none, paths};

/// Where a candidate path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrigin {
    /// The path the process was invoked with.
    Invoked,
    /// Real-path form of the invoked path.
    InvokedRealPath,
    /// Binary found by the search-path lookup.
    PathBinary,
    /// Real-path form of the search-path binary.
    PathBinaryRealPath,
    /// Built output synthesized next to a package root.
    DerivedSibling,
    /// Hoisted symlink path standing in for a version-pinned store path.
    StableEquivalent,
}

impl CandidateOrigin {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CandidateOrigin::Invoked => "invoked",
            CandidateOrigin::InvokedRealPath => "invoked_real_path",
            CandidateOrigin::PathBinary => "path_binary",
            CandidateOrigin::PathBinaryRealPath => "path_binary_real_path",
            CandidateOrigin::DerivedSibling => "derived_sibling",
            CandidateOrigin::StableEquivalent => "stable_equivalent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub origin: CandidateOrigin,
}

impl Candidate {
    pub fn new(path: impl Into<PathBuf>, origin: CandidateOrigin) -> Self {
        Self {
            path: path.into(),
            origin,
        }
    }
}

/// A raw path together with its real-path form, when resolvable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineage {
    pub raw: PathBuf,
    pub real: Option<PathBuf>,
}

impl Lineage {
    /// Resolve `raw` through the symlink resolver; failures leave `real` empty.
    pub async fn resolve(raw: PathBuf) -> Self {
        let real = realpath_or_none(&raw).await;
        Self { raw, real }
    }

    /// Best-known canonical form: the real path, or the raw path when unresolvable.
    pub fn identity(&self) -> &Path {
        self.real.as_deref().unwrap_or(&self.raw)
    }

    /// True when either form lives inside a `node_modules` tree.
    pub fn is_package_managed(&self) -> bool {
        paths::is_inside_node_modules(&self.raw)
            || self
                .real
                .as_deref()
                .is_some_and(paths::is_inside_node_modules)
    }

    /// Install-identity heuristic: real paths match, or one side's real path
    /// equals the other's raw path.
    pub fn shares_resolution_with(&self, other: &Lineage) -> bool {
        if self.raw == other.raw {
            return true;
        }
        match (&self.real, &other.real) {
            (Some(mine), Some(theirs)) if mine == theirs => return true,
            _ => {}
        }
        self.real.as_ref() == Some(&other.raw) || other.real.as_ref() == Some(&self.raw)
    }

    /// Package-root siblings of the raw form, then of the real form, de-duplicated.
    pub fn package_siblings(&self) -> Vec<PathBuf> {
        let mut siblings = Vec::new();
        for path in self.forms() {
            for sibling in package_siblings(path) {
                push_unique(&mut siblings, sibling);
            }
        }
        siblings
    }

    /// Siblings for a path outside any package tree, e.g. a source checkout's
    /// `openclaw.mjs` next to its `dist/` directory.
    pub fn checkout_siblings(&self) -> Vec<PathBuf> {
        let mut siblings = Vec::new();
        if self.is_package_managed() {
            return siblings;
        }
        for path in self.forms() {
            if let Some(dir) = path.parent() {
                for sibling in paths::built_entry_paths(dir) {
                    push_unique(&mut siblings, sibling);
                }
            }
        }
        siblings
    }

    fn forms(&self) -> impl Iterator<Item = &Path> + '_ {
        std::iter::once(self.raw.as_path()).chain(self.real.as_deref())
    }
}

/// `dist/entry.js` and `dist/index.js` under the package root of `path`.
pub fn package_siblings(path: &Path) -> Vec<PathBuf> {
    paths::package_root(path)
        .map(|root| paths::built_entry_paths(&root))
        .unwrap_or_default()
}

pub(crate) fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}
