//! Reconciliation decision
//!
//! Combines the drift-hash comparison with the structural verdict.

use serde::Serialize;

use crate::dto::PipelineConfig;
use crate::equality::Equivalent;
use crate::hashing::EnvironmentHashes;

/// Outcome of comparing desired against observed state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Recorded and fresh hashes are both non-empty and identical
    pub hashes_match: bool,
    pub structurally_equal: bool,
    /// Neither the recorded nor the fresh map holds any hash
    pub untracked: bool,
}

impl Verdict {
    /// Without tracked variables the structural check decides alone.
    pub fn up_to_date(&self) -> bool {
        self.structurally_equal && (self.hashes_match || self.untracked)
    }
}

/// Hash half of the decision
///
/// Two empty maps never match; [`Verdict::up_to_date`] handles that case.
pub fn hashes_match(recorded: &EnvironmentHashes, fresh: &EnvironmentHashes) -> bool {
    !recorded.is_empty() && !fresh.is_empty() && recorded == fresh
}

/// Decide whether the external document is up to date
///
/// # Arguments
/// * `recorded` - Hashes persisted after the last successful write
/// * `fresh` - Hashes computed from the desired document just now
/// * `desired` - Desired document mapped to the external shape
/// * `external` - Document the server currently holds
pub fn decide(
    recorded: &EnvironmentHashes,
    fresh: &EnvironmentHashes,
    desired: &PipelineConfig,
    external: &PipelineConfig,
) -> Verdict {
    let verdict = Verdict {
        hashes_match: hashes_match(recorded, fresh),
        structurally_equal: desired.equivalent(external),
        untracked: recorded.is_empty() && fresh.is_empty(),
    };

    if !verdict.hashes_match && !verdict.untracked {
        tracing::debug!(
            "Environment hashes differ at {:?}",
            recorded.changed_keys(fresh)
        );
    }
    verdict
}
