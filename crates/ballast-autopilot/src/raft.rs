//! Raft-side input types.
//!
//! The consensus library is an external collaborator; the engine only needs
//! its view of the membership roll — which servers exist and what suffrage
//! each holds. Nothing here talks to a live raft instance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque server identifier, unique within a cluster.
///
/// Ids are compared and sorted as plain strings; that ordering is the
/// canonical server ordering used for deterministic tie-breaks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(String);

impl ServerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ServerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Voting rights of a server as recorded in the raft configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Suffrage {
    /// Full voting member; counts toward quorum.
    Voter,
    /// Replicates the log without voting.
    NonVoter,
    /// Transitional state while catching up to become a voter.
    Staging,
}

impl Suffrage {
    /// True for servers that count toward (or are about to count toward)
    /// quorum. Staging servers are included: they will be voters shortly,
    /// so their zone is already spoken for.
    pub fn is_potential_voter(self) -> bool {
        matches!(self, Suffrage::Voter | Suffrage::Staging)
    }
}

impl fmt::Display for Suffrage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suffrage::Voter => f.write_str("voter"),
            Suffrage::NonVoter => f.write_str("nonvoter"),
            Suffrage::Staging => f.write_str("staging"),
        }
    }
}

/// One entry of the raft configuration: a server and its suffrage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaftServer {
    pub id: ServerId,
    pub suffrage: Suffrage,
}

impl RaftServer {
    pub fn new(id: impl Into<ServerId>, suffrage: Suffrage) -> Self {
        Self {
            id: id.into(),
            suffrage,
        }
    }
}
