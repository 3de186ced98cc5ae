//! Normalized per-server records.
//!
//! Each tick folds the raft configuration and the gossip member table into
//! one table of [`ServerRecord`]s keyed by server id. Raft is authoritative
//! for suffrage; gossip for liveness and the operator tags. A server listed
//! by only one of the two sources cannot be evaluated and is dropped.
//!
//! Per-server attributes stay in this engine-owned sidecar; they are never
//! pushed into the consensus library's own types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::AutopilotConfig;
use crate::member::{MemberSnapshot, MemberStatus};
use crate::raft::{RaftServer, ServerId, Suffrage};
use crate::version::BuildVersion;

/// One cluster member retained past ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRecord {
    pub id: ServerId,
    pub suffrage: Suffrage,
    /// Redundancy zone; empty is a wildcard that never constrains
    /// placement.
    pub zone: String,
    /// Always well-formed after normalization (sentinel on bad input).
    pub version: BuildVersion,
    pub voter_opt_out: bool,
    pub status: MemberStatus,
    pub is_leader: bool,
}

impl ServerRecord {
    /// True when this record satisfies its zone's voter coverage: a live
    /// potential voter in a non-empty zone. Failed, leaving, and departed
    /// members do not hold their zone, which is what lets a dead voter be
    /// replaced automatically.
    pub fn covers_zone(&self) -> bool {
        !self.zone.is_empty()
            && self.suffrage.is_potential_voter()
            && self.status == MemberStatus::Alive
    }
}

/// The tag reduction applied to one gossip member.
///
/// Exposed separately so a driver can show per-server attributes without
/// running a full tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDetails {
    pub zone: String,
    pub version: BuildVersion,
    pub voter_opt_out: bool,
}

/// Derives zone, version, and opt-out from a member's tags.
///
/// Version resolution: with an upgrade tag configured, a missing or
/// unparseable tag value yields the sentinel so the member still
/// participates (as the oldest version) instead of failing the tick. With
/// no upgrade tag, the member's internal build string is used the same way.
pub fn server_details(config: &AutopilotConfig, member: &MemberSnapshot) -> ServerDetails {
    let zone = if config.redundancy_zone_tag.is_empty() {
        String::new()
    } else {
        member
            .tags
            .get(&config.redundancy_zone_tag)
            .cloned()
            .unwrap_or_default()
    };

    let raw_version = if config.upgrade_version_tag.is_empty() {
        Some(member.build.as_str())
    } else {
        member
            .tags
            .get(&config.upgrade_version_tag)
            .map(String::as_str)
    };
    let version = raw_version
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_else(BuildVersion::sentinel);

    ServerDetails {
        zone,
        version,
        voter_opt_out: member.voter_opt_out(),
    }
}

/// Left-joins the raft configuration with the gossip member table.
///
/// The result is keyed by id in a `BTreeMap`, so every iteration over it is
/// already in canonical id order.
pub fn build_records(
    config: &AutopilotConfig,
    raft_servers: &[RaftServer],
    members: &[MemberSnapshot],
    leader: Option<&ServerId>,
) -> BTreeMap<ServerId, ServerRecord> {
    let by_id: BTreeMap<&ServerId, &MemberSnapshot> =
        members.iter().map(|m| (&m.id, m)).collect();

    let mut records = BTreeMap::new();
    for server in raft_servers {
        let Some(&member) = by_id.get(&server.id) else {
            // no gossip view of this server; zone/version/liveness unknown
            continue;
        };
        let details = server_details(config, member);
        records.insert(
            server.id.clone(),
            ServerRecord {
                id: server.id.clone(),
                suffrage: server.suffrage,
                zone: details.zone,
                version: details.version,
                voter_opt_out: details.voter_opt_out,
                status: member.status,
                is_leader: leader == Some(&server.id),
            },
        );
    }
    records
}

/// Node classification assigned by this policy.
///
/// This implementation treats every known server as a potential voter; the
/// type exists so a future policy can introduce read replicas or other
/// permanent non-voter classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    Voter,
}

/// Assigns a [`NodeType`] to every record in the working set.
pub fn node_types(records: &BTreeMap<ServerId, ServerRecord>) -> BTreeMap<ServerId, NodeType> {
    records
        .keys()
        .map(|id| (id.clone(), NodeType::Voter))
        .collect()
}
