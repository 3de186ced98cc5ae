//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long a server must stay healthy before it is promotion-eligible.
const DEFAULT_STABILIZATION_TIME: Duration = Duration::from_secs(10);

/// Read-only policy knobs, supplied by the driver once per tick.
///
/// Tag names refer to keys in each gossip member's tag map. An empty tag
/// name disables the corresponding policy axis entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    /// Gossip tag naming each member's redundancy zone. Empty disables
    /// zone-aware balancing.
    pub redundancy_zone_tag: String,
    /// Gossip tag naming each member's software version. Empty means the
    /// member's internally advertised build version is used instead.
    pub upgrade_version_tag: String,
    /// Master switch for the version-upgrade orchestrator.
    pub disable_upgrade_migration: bool,
    /// Minimum continuous healthy time before a non-voter may be promoted.
    pub server_stabilization_time: Duration,
}

impl AutopilotConfig {
    /// True when zone-aware balancing is configured.
    pub fn zones_enabled(&self) -> bool {
        !self.redundancy_zone_tag.is_empty()
    }
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            redundancy_zone_tag: String::new(),
            upgrade_version_tag: String::new(),
            disable_upgrade_migration: false,
            server_stabilization_time: DEFAULT_STABILIZATION_TIME,
        }
    }
}
