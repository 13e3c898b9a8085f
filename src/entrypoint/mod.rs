//! Resolution of the durable CLI entrypoint used to relaunch the gateway.
//!
//! Candidates come from the invoked path, its real path, the search-path
//! binary and package-root siblings; [`ranker`] decides between them.
pub mod candidates;
pub mod invocation;
pub mod probe;
pub mod ranker;

use std::path::PathBuf;

use serde::Serialize;

use crate::lib::{
    errors::EntrypointError,
    telemetry::{emit_resolution, ResolutionTelemetry},
};

pub use candidates::{Candidate, CandidateOrigin, Lineage};
pub use invocation::Invocation;
pub use probe::{EnvLookupProbe, LookupProbe, StaticLookupProbe, SystemLookupProbe};
pub use ranker::{CandidateRanker, InstallRelation, SelectionRule};

/// Winning entrypoint; the path passed an existence check during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntrypoint {
    pub path: PathBuf,
    pub origin: CandidateOrigin,
    pub rule: SelectionRule,
}

impl ResolvedEntrypoint {
    pub fn new(candidate: Candidate, rule: SelectionRule) -> Self {
        Self {
            path: candidate.path,
            origin: candidate.origin,
            rule,
        }
    }
}

/// Resolve the built CLI entrypoint for `invocation`.
///
/// `binary_name` is the name the tool is published under; it is only looked
/// up when the invoked path lives inside a package tree.
pub async fn resolve_cli_entrypoint<P: LookupProbe>(
    invocation: &Invocation,
    binary_name: &str,
    probe: &P,
) -> Result<ResolvedEntrypoint, EntrypointError> {
    let invoked = Lineage::resolve(invocation.entrypoint_path().to_path_buf()).await;
    let resolved = CandidateRanker::new(probe, binary_name)
        .rank(&invoked)
        .await?;

    emit_resolution(&ResolutionTelemetry {
        invoked: &invoked.raw,
        entrypoint: &resolved.path,
        origin: resolved.origin.as_str(),
        rule: resolved.rule.as_str(),
    });
    Ok(resolved)
}
