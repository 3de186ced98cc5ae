//! Rolling version-upgrade orchestration.
//!
//! When the voting-eligible set spans exactly two software versions, the
//! engine walks the cluster through a quorum-safe swap:
//!
//! 1. promote enough new-version standbys that they alone outnumber the
//!    current voters,
//! 2. transfer leadership onto a new-version voter,
//! 3. demote every old-version voter.
//!
//! The phase is recomputed from scratch each tick — nothing is stored, so
//! a crashed or restarted driver resumes mid-upgrade without help.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::changes::ChangeSet;
use crate::config::AutopilotConfig;
use crate::raft::{ServerId, Suffrage};
use crate::server::ServerRecord;
use crate::version::BuildVersion;

/// What the orchestrator decided for this tick.
#[derive(Debug)]
pub(crate) enum UpgradeOutcome {
    /// No upgrade is in flight; every candidate stays promotable.
    NotInFlight,
    /// The voter set is fully on `version` but older stragglers remain as
    /// non-voters. The tick is free for zone rebalancing, yet only
    /// candidates already on `version` may promote — re-promoting a
    /// drained old-version server would oscillate.
    Finished { version: BuildVersion },
    /// An upgrade owns this tick; apply these changes and stop.
    Done(ChangeSet),
}

/// The phase of an in-flight upgrade, derived from current voters, stable
/// candidates, and the leader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpgradePhase {
    /// Every voter already runs the newer version.
    AllNew,
    /// No voter runs the newer version yet.
    NoNewYet,
    /// Mixed voters and the leader is still on the older version.
    LeaderStillOld,
    /// Mixed voters with a new-version leader; old voters can drain.
    ReadyToDrainOld,
}

/// Runs one tick of upgrade orchestration.
///
/// `candidates` are the stable, opt-in non-voters produced by the
/// stability filter; versions are read across them plus every current
/// voter.
pub(crate) fn plan_upgrade(
    config: &AutopilotConfig,
    records: &BTreeMap<ServerId, ServerRecord>,
    candidates: &[&ServerRecord],
) -> UpgradeOutcome {
    let voters: Vec<&ServerRecord> = records
        .values()
        .filter(|r| r.suffrage == Suffrage::Voter)
        .collect();

    let mut versions: BTreeSet<&BuildVersion> = voters.iter().map(|r| &r.version).collect();
    versions.extend(candidates.iter().map(|r| &r.version));

    match versions.len() {
        0 | 1 => UpgradeOutcome::NotInFlight,
        2 => {
            let mut it = versions.into_iter();
            let lv = it.next().expect("two versions present");
            let hv = it.next().expect("two versions present");
            step_upgrade(config, &voters, candidates, hv, lv)
        }
        n => {
            // TODO: collapse everything below the highest version into one
            // upgrade source instead of stalling; needs operator sign-off
            // on the demotion order before it can ship.
            debug!(versions = n, "upgrade state ambiguous, holding position");
            UpgradeOutcome::Done(ChangeSet::default())
        }
    }
}

fn phase(
    voters: &[&ServerRecord],
    hv: &BuildVersion,
    lv: &BuildVersion,
    leader: Option<&ServerRecord>,
) -> Option<UpgradePhase> {
    let any_hv = voters.iter().any(|r| r.version == *hv);
    let any_lv = voters.iter().any(|r| r.version == *lv);

    match (any_lv, any_hv) {
        (false, _) => Some(UpgradePhase::AllNew),
        (true, false) => Some(UpgradePhase::NoNewYet),
        (true, true) => {
            let leader = leader?;
            if leader.version == *hv {
                Some(UpgradePhase::ReadyToDrainOld)
            } else {
                Some(UpgradePhase::LeaderStillOld)
            }
        }
    }
}

fn step_upgrade(
    config: &AutopilotConfig,
    voters: &[&ServerRecord],
    candidates: &[&ServerRecord],
    hv: &BuildVersion,
    lv: &BuildVersion,
) -> UpgradeOutcome {
    let leader = voters.iter().find(|r| r.is_leader).copied();

    let Some(phase) = phase(voters, hv, lv, leader) else {
        // mixed voters but no identifiable leader: hold until the
        // snapshot can prove which side leads
        debug!("mixed-version voters with unknown leader, holding position");
        return UpgradeOutcome::Done(ChangeSet::default());
    };
    debug!(?phase, %hv, %lv, "upgrade tick");

    let changes = match phase {
        UpgradePhase::AllNew => {
            return UpgradeOutcome::Finished {
                version: hv.clone(),
            }
        }

        UpgradePhase::NoNewYet => {
            let useful = useful_new_candidates(config, candidates, hv);
            // strict majority over the existing voters: once applied, the
            // new version alone forms a quorum of the enlarged voter set
            if useful.len() > voters.len() {
                ChangeSet {
                    promotions: useful.iter().map(|r| r.id.clone()).collect(),
                    ..ChangeSet::default()
                }
            } else {
                debug!(
                    useful = useful.len(),
                    voters = voters.len(),
                    "not enough new-version standbys to upgrade safely"
                );
                ChangeSet::default()
            }
        }

        UpgradePhase::LeaderStillOld => {
            // canonical id order; voters come from the sorted record table
            let target = voters
                .iter()
                .find(|r| r.version == *hv)
                .expect("phase requires a new-version voter");
            ChangeSet {
                leader: Some(target.id.clone()),
                ..ChangeSet::default()
            }
        }

        UpgradePhase::ReadyToDrainOld => ChangeSet {
            demotions: voters
                .iter()
                .filter(|r| r.version == *lv)
                .map(|r| r.id.clone())
                .collect(),
            ..ChangeSet::default()
        },
    };
    UpgradeOutcome::Done(changes)
}

/// Filters the candidate list down to new-version standbys that each add
/// voting capacity.
///
/// With zones enabled, two standbys in the same zone would collapse into
/// one surviving voter after rebalancing, so only the first per zone
/// counts. Wildcard (empty-zone) standbys never collide.
fn useful_new_candidates<'a>(
    config: &AutopilotConfig,
    candidates: &[&'a ServerRecord],
    hv: &BuildVersion,
) -> Vec<&'a ServerRecord> {
    let mut claimed_zones = BTreeSet::new();
    let mut useful = Vec::new();
    for candidate in candidates {
        if candidate.version != *hv {
            continue;
        }
        if config.zones_enabled()
            && !candidate.zone.is_empty()
            && !claimed_zones.insert(candidate.zone.as_str())
        {
            continue;
        }
        useful.push(*candidate);
    }
    useful
}
