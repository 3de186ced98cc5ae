//! Error types for tick execution.
//!
//! The decision pipeline itself never fails — malformed input degrades to
//! documented defaults. The only errors a tick can surface come from the
//! external collaborators that produce its input snapshots.

/// Error produced by an external collaborator (raft or gossip).
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort a tick before any decision is made.
///
/// A failed tick emits no [`ChangeSet`](crate::ChangeSet); the driver loop
/// simply retries on its next period.
#[derive(Debug, thiserror::Error)]
pub enum AutopilotError {
    /// The consensus library could not report its configuration.
    #[error("failed to fetch raft configuration: {0}")]
    Configuration(SourceError),

    /// The gossip layer could not produce a membership snapshot.
    #[error("failed to snapshot gossip membership: {0}")]
    Membership(SourceError),
}
