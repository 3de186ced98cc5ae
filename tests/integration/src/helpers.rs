//! Declarative cluster fixtures for end-to-end tests.
//!
//! Tests describe a cluster as a list of servers with their suffrage,
//! tags, liveness, and stability, then tick the engine against it. The
//! fixture can also apply a returned change set back onto itself so
//! convergence across ticks is testable.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use ballast_autopilot::{
    decide, AutopilotConfig, ChangeSet, HealthSummary, MemberSnapshot, MemberStatus, RaftServer,
    ServerId, Suffrage, NONVOTER_TAG,
};

/// Zone tag name used by every fixture config.
pub const ZONE_TAG: &str = "az";
/// Version tag name used by every fixture config.
pub const VERSION_TAG: &str = "build";

/// No zones, no upgrade orchestration.
pub fn plain_config() -> AutopilotConfig {
    AutopilotConfig {
        disable_upgrade_migration: true,
        ..AutopilotConfig::default()
    }
}

/// Zone balancing enabled; version logic unconfigured.
pub fn zoned_config() -> AutopilotConfig {
    AutopilotConfig {
        redundancy_zone_tag: ZONE_TAG.into(),
        ..AutopilotConfig::default()
    }
}

/// Upgrade orchestration enabled; zones unconfigured.
pub fn upgrade_config() -> AutopilotConfig {
    AutopilotConfig {
        upgrade_version_tag: VERSION_TAG.into(),
        ..AutopilotConfig::default()
    }
}

/// Both policy axes enabled.
pub fn full_config() -> AutopilotConfig {
    AutopilotConfig {
        redundancy_zone_tag: ZONE_TAG.into(),
        upgrade_version_tag: VERSION_TAG.into(),
        ..AutopilotConfig::default()
    }
}

/// One declaratively-specified server. Alive and long-stable by default.
#[derive(Debug, Clone)]
pub struct Server {
    id: String,
    suffrage: Suffrage,
    zone: Option<String>,
    version: Option<String>,
    status: MemberStatus,
    stable: bool,
    opt_out: bool,
}

impl Server {
    fn new(id: &str, suffrage: Suffrage) -> Self {
        Self {
            id: id.into(),
            suffrage,
            zone: None,
            version: None,
            status: MemberStatus::Alive,
            stable: true,
            opt_out: false,
        }
    }

    pub fn voter(id: &str) -> Self {
        Self::new(id, Suffrage::Voter)
    }

    pub fn nonvoter(id: &str) -> Self {
        Self::new(id, Suffrage::NonVoter)
    }

    pub fn staging(id: &str) -> Self {
        Self::new(id, Suffrage::Staging)
    }

    pub fn zone(mut self, zone: &str) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn failed(mut self) -> Self {
        self.status = MemberStatus::Failed;
        self
    }

    pub fn left(mut self) -> Self {
        self.status = MemberStatus::Left;
        self
    }

    pub fn unstable(mut self) -> Self {
        self.stable = false;
        self
    }

    pub fn opt_out(mut self) -> Self {
        self.opt_out = true;
        self
    }
}

/// A whole-cluster snapshot the tests tick against.
pub struct Cluster {
    config: AutopilotConfig,
    /// Process start; long-stable servers report this as `stable_since`.
    epoch: Instant,
    /// The injected tick time, an hour past `epoch`. Shifting forward
    /// instead of subtracting keeps the fixture safe on hosts with short
    /// monotonic uptime.
    now: Instant,
    servers: Vec<Server>,
    leader: Option<ServerId>,
}

impl Cluster {
    pub fn new(config: AutopilotConfig) -> Self {
        let epoch = Instant::now();
        Self {
            config,
            epoch,
            now: epoch + Duration::from_secs(3600),
            servers: Vec::new(),
            leader: None,
        }
    }

    pub fn add(mut self, server: Server) -> Self {
        self.servers.push(server);
        self
    }

    pub fn leader(mut self, id: &str) -> Self {
        self.leader = Some(ServerId::from(id));
        self
    }

    /// Runs one engine tick over the current snapshot.
    pub fn tick(&self) -> ChangeSet {
        let raft: Vec<RaftServer> = self
            .servers
            .iter()
            .map(|s| RaftServer::new(s.id.as_str(), s.suffrage))
            .collect();

        let members: Vec<MemberSnapshot> = self
            .servers
            .iter()
            .map(|s| {
                let mut member = MemberSnapshot::new(s.id.as_str(), s.status);
                if let Some(zone) = &s.zone {
                    member = member.with_tag(ZONE_TAG, zone.as_str());
                }
                if let Some(version) = &s.version {
                    member = member.with_tag(VERSION_TAG, version.as_str());
                }
                if s.opt_out {
                    member = member.with_tag(NONVOTER_TAG, "1");
                }
                member
            })
            .collect();

        let health: HashMap<ServerId, HealthSummary> = self
            .servers
            .iter()
            .map(|s| {
                let stable_since = if s.stable { self.epoch } else { self.now };
                (
                    ServerId::from(s.id.as_str()),
                    HealthSummary::stable(stable_since),
                )
            })
            .collect();

        decide(
            &self.config,
            self.now,
            &raft,
            &members,
            &health,
            self.leader.as_ref(),
        )
    }

    /// Applies a change set back onto the snapshot, as the driver would.
    pub fn apply(&mut self, changes: &ChangeSet) {
        for server in &mut self.servers {
            let id = ServerId::from(server.id.as_str());
            if changes.promotions.contains(&id) {
                server.suffrage = Suffrage::Voter;
            }
            if changes.demotions.contains(&id) {
                server.suffrage = Suffrage::NonVoter;
            }
        }
        if let Some(leader) = &changes.leader {
            self.leader = Some(leader.clone());
        }
    }

    /// Suffrage of one server, for post-apply assertions.
    pub fn suffrage(&self, id: &str) -> Suffrage {
        self.servers
            .iter()
            .find(|s| s.id == id)
            .unwrap_or_else(|| panic!("unknown server {id}"))
            .suffrage
    }

    pub fn is_voter(&self, id: &ServerId) -> bool {
        self.find(id).is_some_and(|s| s.suffrage == Suffrage::Voter)
    }

    pub fn is_nonvoter(&self, id: &ServerId) -> bool {
        self.find(id).is_some_and(|s| s.suffrage == Suffrage::NonVoter)
    }

    pub fn is_opted_out(&self, id: &ServerId) -> bool {
        self.find(id).is_some_and(|s| s.opt_out)
    }

    fn find(&self, id: &ServerId) -> Option<&Server> {
        self.servers.iter().find(|s| s.id == id.as_str())
    }
}

/// Renders server ids as plain strings for terse assertions.
pub fn ids(list: &[ServerId]) -> Vec<&str> {
    list.iter().map(|id| id.as_str()).collect()
}
