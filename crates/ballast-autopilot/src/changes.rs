//! The engine's output: a declarative description of desired mutations.

use serde::{Deserialize, Serialize};

use crate::raft::ServerId;

/// Cluster mutations the engine wants applied this tick.
///
/// The engine never applies anything itself; the caller feeds promotions,
/// demotions, and the optional leadership transfer to the consensus
/// library. Ordering within each list is not significant, but it is
/// deterministic (canonical id order) for a given input snapshot.
///
/// Invariant: a server id never appears in both `promotions` and
/// `demotions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Non-voters to promote to voters.
    pub promotions: Vec<ServerId>,
    /// Voters to demote to non-voters.
    pub demotions: Vec<ServerId>,
    /// Voter to transfer leadership to, if any.
    pub leader: Option<ServerId>,
}

impl ChangeSet {
    /// True when applying this change set would alter nothing.
    pub fn is_empty(&self) -> bool {
        self.promotions.is_empty() && self.demotions.is_empty() && self.leader.is_none()
    }
}
