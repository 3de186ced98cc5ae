//! ballast-autopilot: promotion policy for raft cluster autopiloting.
//!
//! Decides, once per control-loop tick, which non-voting servers should
//! become voters, which voters should step down, and where leadership
//! should move during a rolling version upgrade. The engine never touches
//! the cluster: it folds two read-only snapshots — the raft configuration
//! and the gossip member table — into a decision and hands the caller a
//! declarative [`ChangeSet`] to apply.
//!
//! # Architecture
//!
//! One tick is one pure function call through a fixed pipeline:
//!
//! - **Normalization**: join raft (suffrage) with gossip (liveness, zone,
//!   version, opt-out tags) into per-server records
//! - **Stability filter**: only non-voters that have been healthy past the
//!   configured interval are promotion candidates
//! - **Policy dispatch**: an in-flight version upgrade claims the tick
//!   first; otherwise zones are balanced (one live voter per zone);
//!   otherwise every candidate promotes
//!
//! # Quick Start
//!
//! ```
//! use std::collections::HashMap;
//! use std::time::{Duration, Instant};
//!
//! use ballast_autopilot::{
//!     decide, AutopilotConfig, HealthSummary, MemberSnapshot, MemberStatus, RaftServer,
//!     ServerId, Suffrage,
//! };
//!
//! let start = Instant::now();
//! let now = start + Duration::from_secs(60);
//! let raft = vec![
//!     RaftServer::new("core-0", Suffrage::Voter),
//!     RaftServer::new("core-1", Suffrage::NonVoter),
//! ];
//! let members = vec![
//!     MemberSnapshot::new("core-0", MemberStatus::Alive),
//!     MemberSnapshot::new("core-1", MemberStatus::Alive),
//! ];
//! let health: HashMap<ServerId, HealthSummary> =
//!     [(ServerId::from("core-1"), HealthSummary::stable(start))].into();
//!
//! let changes = decide(&AutopilotConfig::default(), now, &raft, &members, &health, None);
//! assert_eq!(changes.promotions, vec![ServerId::from("core-1")]);
//! ```

mod changes;
mod config;
mod delegate;
mod error;
mod health;
mod member;
mod promoter;
mod raft;
mod server;
mod upgrade;
mod version;
mod zone;

pub use changes::ChangeSet;
pub use config::AutopilotConfig;
pub use delegate::{AutopilotDelegate, ConfigurationSource, HealthSource, MembershipSource};
pub use error::{AutopilotError, SourceError};
pub use health::HealthSummary;
pub use member::{MemberSnapshot, MemberStatus, NONVOTER_TAG};
pub use promoter::{decide, plan};
pub use raft::{RaftServer, ServerId, Suffrage};
pub use server::{build_records, node_types, server_details, NodeType, ServerDetails, ServerRecord};
pub use version::{BuildVersion, VersionParseError};
