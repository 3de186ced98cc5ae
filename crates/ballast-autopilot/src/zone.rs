//! Zone-aware voter balancing.
//!
//! Target shape: at most one live voter per non-empty redundancy zone.
//! Coverage is computed from the full record table, candidates are walked
//! in canonical order, and a zone claimed by a promotion this tick blocks
//! later candidates in the same zone.

use std::collections::{BTreeMap, BTreeSet};

use crate::changes::ChangeSet;
use crate::raft::ServerId;
use crate::server::ServerRecord;

/// Picks candidates to promote so every non-empty zone regains a live
/// voter.
///
/// A zone whose only voter is failed or departed counts as uncovered, so a
/// standby non-voter in that zone is promoted without operator action.
/// Candidates with no zone never compete for coverage and always promote.
pub(crate) fn balance_zones(
    records: &BTreeMap<ServerId, ServerRecord>,
    candidates: &[&ServerRecord],
) -> ChangeSet {
    let mut covered: BTreeSet<&str> = records
        .values()
        .filter(|r| r.covers_zone())
        .map(|r| r.zone.as_str())
        .collect();

    let mut changes = ChangeSet::default();
    for candidate in candidates {
        // wildcard zone always promotes; otherwise first claim wins
        if candidate.zone.is_empty() || covered.insert(candidate.zone.as_str()) {
            changes.promotions.push(candidate.id.clone());
        }
    }
    changes
}
