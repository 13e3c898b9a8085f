//! Precedence rules choosing one entrypoint from the invoked path's lineage.
//!
//! Order of evaluation, first existing candidate wins:
//!
//! 1. The invoked path itself when it is stable built output.
//! 2. A stable form shared with the search-path binary when both belong to
//!    the same install. An unrelated search-path binary contributes nothing.
//! 3. The invoked path's real-path form when it is built output.
//! 4. `dist/entry.js` / `dist/index.js` derived from the invoked path.
//!
//! Winners inside a pnpm virtual store are swapped for their hoisted symlink
//! path when that path dereferences to the same file.
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use super::{
    candidates::{push_unique, Candidate, CandidateOrigin, Lineage},
    probe::LookupProbe,
    ResolvedEntrypoint,
};
use crate::lib::{
    errors::EntrypointError,
    fs::{is_readable_file, realpath_or_none},
    paths::{has_version_pinned_segment, hoisted_equivalent, is_built_output},
};

/// Precedence rule that selected the winning candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionRule {
    StableInvocation,
    SameInstall,
    InvokedRealPath,
    DerivedSibling,
}

impl SelectionRule {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SelectionRule::StableInvocation => "stable_invocation",
            SelectionRule::SameInstall => "same_install",
            SelectionRule::InvokedRealPath => "invoked_real_path",
            SelectionRule::DerivedSibling => "derived_sibling",
        }
    }
}

/// How the search-path binary relates to the invoked path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallRelation {
    /// The invoked path is outside any package tree; no lookup ran.
    NotProbed,
    /// The lookup found nothing.
    Absent,
    SameInstall(Lineage),
    Unrelated(Lineage),
}

/// Single-use ranker recording every path it checks.
pub struct CandidateRanker<'a, P: LookupProbe> {
    probe: &'a P,
    binary_name: &'a str,
    attempted: Vec<PathBuf>,
}

impl<'a, P: LookupProbe> CandidateRanker<'a, P> {
    pub fn new(probe: &'a P, binary_name: &'a str) -> Self {
        Self {
            probe,
            binary_name,
            attempted: Vec::new(),
        }
    }

    /// Pick the winning entrypoint for `invoked`.
    pub async fn rank(mut self, invoked: &Lineage) -> Result<ResolvedEntrypoint, EntrypointError> {
        if let Some(hit) = self.stable_invocation(invoked).await {
            return Ok(hit);
        }

        let relation = self.relation_to_path_binary(invoked).await;
        if let InstallRelation::SameInstall(binary) = &relation {
            if let Some(hit) = self.same_install(invoked, binary).await {
                return Ok(self.stabilize(hit).await);
            }
        }

        if let Some(hit) = self.invoked_real_path(invoked).await {
            return Ok(self.stabilize(hit).await);
        }

        if let Some(hit) = self.derived_sibling(invoked).await {
            return Ok(self.stabilize(hit).await);
        }

        Err(EntrypointError::NotFound {
            invoked: invoked.raw.clone(),
            attempted: self.attempted,
        })
    }

    /// Classify the search-path binary; only package-managed invocations are probed.
    pub async fn relation_to_path_binary(&self, invoked: &Lineage) -> InstallRelation {
        if !invoked.is_package_managed() {
            debug!(
                target: "openclaw_launcher::resolve",
                invoked = %invoked.raw.display(),
                "Invoked path is outside any package tree; skipping search-path lookup"
            );
            return InstallRelation::NotProbed;
        }

        let Some(raw) = self.probe.lookup(self.binary_name) else {
            return InstallRelation::Absent;
        };
        let binary = Lineage::resolve(raw).await;

        if invoked.shares_resolution_with(&binary) || sibling_shares_target(invoked, &binary).await
        {
            debug!(
                target: "openclaw_launcher::resolve",
                binary = %binary.raw.display(),
                "Search-path binary belongs to the invoked install"
            );
            return InstallRelation::SameInstall(binary);
        }

        info!(
            target: "openclaw_launcher::resolve",
            binary = %binary.raw.display(),
            binary_real = ?binary.real,
            invoked = %invoked.raw.display(),
            "Ignoring search-path binary from a different install"
        );
        InstallRelation::Unrelated(binary)
    }

    async fn stable_invocation(&mut self, invoked: &Lineage) -> Option<ResolvedEntrypoint> {
        if !is_built_output(&invoked.raw) || has_version_pinned_segment(&invoked.raw) {
            return None;
        }
        let candidate = Candidate::new(invoked.raw.clone(), CandidateOrigin::Invoked);
        self.accept(candidate, SelectionRule::StableInvocation).await
    }

    async fn same_install(
        &mut self,
        invoked: &Lineage,
        binary: &Lineage,
    ) -> Option<ResolvedEntrypoint> {
        let target = invoked.identity().to_path_buf();
        let mut candidates: Vec<Candidate> = binary
            .package_siblings()
            .into_iter()
            .map(|path| Candidate::new(path, CandidateOrigin::DerivedSibling))
            .collect();
        if is_built_output(&binary.raw) {
            candidates.push(Candidate::new(binary.raw.clone(), CandidateOrigin::PathBinary));
        }
        if let Some(real) = binary.real.as_ref().filter(|real| is_built_output(real)) {
            candidates.push(Candidate::new(
                real.clone(),
                CandidateOrigin::PathBinaryRealPath,
            ));
        }

        for candidate in candidates {
            if !self.check(&candidate.path).await {
                continue;
            }
            let resolved = realpath_or_none(&candidate.path).await;
            if resolved.as_deref() != Some(target.as_path()) && candidate.path != target {
                debug!(
                    target: "openclaw_launcher::resolve",
                    candidate = %candidate.path.display(),
                    "Candidate exists but is not the invoked file"
                );
                continue;
            }
            return Some(ResolvedEntrypoint::new(candidate, SelectionRule::SameInstall));
        }
        None
    }

    async fn invoked_real_path(&mut self, invoked: &Lineage) -> Option<ResolvedEntrypoint> {
        let mut candidates = Vec::new();
        if let Some(real) = invoked.real.as_ref().filter(|real| is_built_output(real)) {
            candidates.push(Candidate::new(
                real.clone(),
                CandidateOrigin::InvokedRealPath,
            ));
        }
        if is_built_output(&invoked.raw) && invoked.real.as_ref() != Some(&invoked.raw) {
            candidates.push(Candidate::new(invoked.raw.clone(), CandidateOrigin::Invoked));
        }

        for candidate in candidates {
            if let Some(hit) = self.accept(candidate, SelectionRule::InvokedRealPath).await {
                return Some(hit);
            }
        }
        None
    }

    async fn derived_sibling(&mut self, invoked: &Lineage) -> Option<ResolvedEntrypoint> {
        let mut siblings = invoked.package_siblings();
        for sibling in invoked.checkout_siblings() {
            push_unique(&mut siblings, sibling);
        }

        for sibling in siblings {
            let candidate = Candidate::new(sibling, CandidateOrigin::DerivedSibling);
            if let Some(hit) = self.accept(candidate, SelectionRule::DerivedSibling).await {
                return Some(hit);
            }
        }
        None
    }

    /// Swap a version-pinned store path for its hoisted symlink when both name the same file.
    async fn stabilize(&mut self, hit: ResolvedEntrypoint) -> ResolvedEntrypoint {
        if !has_version_pinned_segment(&hit.path) {
            return hit;
        }
        let Some(stable) = hoisted_equivalent(&hit.path) else {
            return hit;
        };
        if has_version_pinned_segment(&stable) || !self.check(&stable).await {
            return hit;
        }

        let stable_real = realpath_or_none(&stable).await;
        if stable_real.is_none() || stable_real != realpath_or_none(&hit.path).await {
            return hit;
        }
        debug!(
            target: "openclaw_launcher::resolve",
            pinned = %hit.path.display(),
            stable = %stable.display(),
            "Preferring hoisted path over version-pinned store path"
        );
        ResolvedEntrypoint {
            path: stable,
            origin: CandidateOrigin::StableEquivalent,
            rule: hit.rule,
        }
    }

    async fn accept(
        &mut self,
        candidate: Candidate,
        rule: SelectionRule,
    ) -> Option<ResolvedEntrypoint> {
        if self.check(&candidate.path).await {
            Some(ResolvedEntrypoint::new(candidate, rule))
        } else {
            None
        }
    }

    async fn check(&mut self, path: &Path) -> bool {
        push_unique(&mut self.attempted, path.to_path_buf());
        is_readable_file(path).await
    }
}

async fn sibling_shares_target(invoked: &Lineage, binary: &Lineage) -> bool {
    let target = invoked.identity();
    for sibling in binary.package_siblings() {
        if realpath_or_none(&sibling).await.as_deref() == Some(target) {
            return true;
        }
    }
    false
}
