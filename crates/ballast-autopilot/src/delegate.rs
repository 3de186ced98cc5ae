//! Collaborator seams and the tick-driving adapter.
//!
//! The engine itself is a pure function; this module is the thin layer a
//! driver loop actually holds. It owns handles to the three external
//! collaborators — the consensus library, the gossip layer, and the health
//! feed — fetches their snapshots, and runs one tick. Collaborator
//! failures are the only errors a tick can produce; a failed tick emits no
//! changes and the loop retries next period.

use std::collections::HashMap;
use std::time::Instant;

use crate::changes::ChangeSet;
use crate::config::AutopilotConfig;
use crate::error::{AutopilotError, SourceError};
use crate::health::HealthSummary;
use crate::member::MemberSnapshot;
use crate::promoter::decide;
use crate::raft::{RaftServer, ServerId};

/// Read access to the consensus library's view of the cluster.
pub trait ConfigurationSource {
    /// The current raft configuration (every server and its suffrage).
    fn configuration(&self) -> Result<Vec<RaftServer>, SourceError>;

    /// The current leader, if one is known.
    fn leader(&self) -> Option<ServerId>;
}

/// Read access to the gossip membership table.
pub trait MembershipSource {
    fn members(&self) -> Result<Vec<MemberSnapshot>, SourceError>;
}

/// Read access to the caller's per-server health summaries.
pub trait HealthSource {
    /// Health for one server; `None` means the server has no health
    /// history yet and is treated as not stable.
    fn health(&self, id: &ServerId) -> Option<HealthSummary>;
}

/// Binds the three collaborator handles into a tick runner.
pub struct AutopilotDelegate<C, M, H> {
    raft: C,
    membership: M,
    health: H,
}

impl<C, M, H> AutopilotDelegate<C, M, H>
where
    C: ConfigurationSource,
    M: MembershipSource,
    H: HealthSource,
{
    pub fn new(raft: C, membership: M, health: H) -> Self {
        Self {
            raft,
            membership,
            health,
        }
    }

    /// Runs one full tick: snapshot both collaborators, join, decide.
    pub fn promote_non_voters(
        &self,
        config: &AutopilotConfig,
        now: Instant,
    ) -> Result<ChangeSet, AutopilotError> {
        let servers = self
            .raft
            .configuration()
            .map_err(AutopilotError::Configuration)?;
        let members = self
            .membership
            .members()
            .map_err(AutopilotError::Membership)?;
        let leader = self.raft.leader();

        let health: HashMap<ServerId, HealthSummary> = servers
            .iter()
            .filter_map(|s| self.health.health(&s.id).map(|h| (s.id.clone(), h)))
            .collect();

        Ok(decide(
            config,
            now,
            &servers,
            &members,
            &health,
            leader.as_ref(),
        ))
    }
}
