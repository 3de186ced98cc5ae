//! Gossip-side input types.
//!
//! The membership layer is the second eventually-consistent source the
//! engine folds in each tick. It is authoritative for liveness and for the
//! operator-assigned tags (redundancy zone, upgrade version, voter opt-out);
//! raft remains authoritative for suffrage.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::raft::ServerId;

/// Tag key members set to opt out of ever becoming a voter.
///
/// The key is fixed (not configurable); only the literal value `"1"` opts
/// out, any other value is ignored.
pub const NONVOTER_TAG: &str = "nonvoter";

/// Liveness of a member as reported by the gossip layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    Alive,
    Failed,
    Leaving,
    Left,
}

/// A point-in-time snapshot of one gossip member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    pub id: ServerId,
    /// The agent's own advertised version, used when no upgrade tag is
    /// configured. May be empty.
    pub build: String,
    pub tags: HashMap<String, String>,
    pub status: MemberStatus,
}

impl MemberSnapshot {
    pub fn new(id: impl Into<ServerId>, status: MemberStatus) -> Self {
        Self {
            id: id.into(),
            build: String::new(),
            tags: HashMap::new(),
            status,
        }
    }

    /// Sets the internally advertised build version.
    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = build.into();
        self
    }

    /// Adds one tag, replacing any previous value for the key.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// True when the member carries the voter opt-out tag.
    pub fn voter_opt_out(&self) -> bool {
        self.tags.get(NONVOTER_TAG).map(String::as_str) == Some("1")
    }
}
