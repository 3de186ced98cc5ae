//! The per-tick decision pipeline.
//!
//! One tick is one pure call: normalize the two input snapshots into the
//! record table, filter stable promotion candidates, then hand the tick to
//! the first policy that claims it — upgrade orchestration, zone
//! balancing, or plain promote-everything. No state survives between
//! ticks, so the driver can call this from anywhere at any cadence.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use tracing::debug;

use crate::changes::ChangeSet;
use crate::config::AutopilotConfig;
use crate::health::HealthSummary;
use crate::member::MemberSnapshot;
use crate::raft::{RaftServer, ServerId, Suffrage};
use crate::server::{build_records, ServerRecord};
use crate::upgrade::{plan_upgrade, UpgradeOutcome};
use crate::zone::balance_zones;

/// Runs one control-loop tick over raw collaborator snapshots.
///
/// `health` entries are keyed by server id; a server with no entry is
/// treated as not yet stable. `now` is injected so tests (and replaying
/// drivers) control the clock.
pub fn decide(
    config: &AutopilotConfig,
    now: Instant,
    raft_servers: &[RaftServer],
    members: &[MemberSnapshot],
    health: &HashMap<ServerId, HealthSummary>,
    leader: Option<&ServerId>,
) -> ChangeSet {
    let records = build_records(config, raft_servers, members, leader);
    plan(config, now, &records, health)
}

/// The policy half of a tick, over an already-normalized record table.
pub fn plan(
    config: &AutopilotConfig,
    now: Instant,
    records: &BTreeMap<ServerId, ServerRecord>,
    health: &HashMap<ServerId, HealthSummary>,
) -> ChangeSet {
    let mut candidates = stable_candidates(config, now, records, health);

    // the orchestrator runs even with no candidates: its leadership and
    // drain steps act on voters alone
    if !config.disable_upgrade_migration {
        match plan_upgrade(config, records, &candidates) {
            UpgradeOutcome::Done(changes) => {
                debug!(branch = "upgrade", ?changes, "tick decided");
                return changes;
            }
            UpgradeOutcome::Finished { version } => {
                // stragglers below the finished version stay demoted until
                // they upgrade; promoting one would only be drained again
                candidates.retain(|r| r.version == version);
            }
            UpgradeOutcome::NotInFlight => {}
        }
    }

    if candidates.is_empty() {
        debug!(branch = "no-candidates", "no raft changes");
        return ChangeSet::default();
    }

    if config.zones_enabled() {
        let changes = balance_zones(records, &candidates);
        debug!(branch = "zone", ?changes, "tick decided");
        return changes;
    }

    let changes = ChangeSet {
        promotions: candidates.iter().map(|r| r.id.clone()).collect(),
        ..ChangeSet::default()
    };
    debug!(branch = "promote-all", ?changes, "tick decided");
    changes
}

/// Non-voters that are stable, opted in, and therefore promotable.
///
/// Staging servers are mid-transition and never candidates. Walks the
/// record table in id order, so the returned slice is canonically ordered.
fn stable_candidates<'a>(
    config: &AutopilotConfig,
    now: Instant,
    records: &'a BTreeMap<ServerId, ServerRecord>,
    health: &HashMap<ServerId, HealthSummary>,
) -> Vec<&'a ServerRecord> {
    records
        .values()
        .filter(|r| r.suffrage == Suffrage::NonVoter && !r.voter_opt_out)
        .filter(|r| {
            health
                .get(&r.id)
                .is_some_and(|h| h.is_stable(now, config.server_stabilization_time))
        })
        .collect()
}
