//! Framework error type.
//!
//! Sub-crates define narrower error enums of their own and convert them into
//! [`EdgesimError`] via `From` impls; callers that only care about the
//! top-level kind can match directly against [`EdgesimError`] without pulling
//! in every sub-crate's error type.

use thiserror::Error;

use crate::{ApplicationId, BaseStationId, EdgeServerId, Step, UserId};

/// The top-level error type shared across `edgesim-*` crates.
///
/// Kinds map directly onto the error taxonomy of the simulator: the first
/// two are fatal and abort a run; [`EdgesimError::CapacityExhausted`] and
/// [`EdgesimError::NoCandidateRegistryHost`] are recoverable conditions that
/// callers are expected to catch and fold into per-step metrics rather than
/// propagate; [`EdgesimError::SnapshotMissing`] indicates a kernel bug.
#[derive(Debug, Error)]
pub enum EdgesimError {
    /// A scenario references an id that does not exist, uses an unknown type
    /// tag, or forms a cyclic/malformed link. Fatal at load time.
    #[error("dataset invalid: {0}")]
    DatasetInvalid(String),

    /// Dijkstra found no path between two topology nodes. Fatal at the step
    /// in which it occurred.
    #[error("no path from {from} to {to} (step {step})")]
    PathNotFound {
        from: BaseStationId,
        to: BaseStationId,
        step: Step,
    },

    /// No server in the candidate list had enough free capacity to host a
    /// service or registry. Non-fatal: the caller skips the migration and
    /// records the server as overloaded.
    #[error("no server with capacity {needed} available for server {server} (step {step})")]
    CapacityExhausted {
        server: EdgeServerId,
        needed: i64,
        step: Step,
    },

    /// The registry-expansion loop ran out of eligible edge servers before
    /// `U_slow` emptied. Non-fatal: registry expansion halts early.
    #[error("no candidate registry host remains for user {user}, application {application} (step {step})")]
    NoCandidateRegistryHost {
        user: UserId,
        application: ApplicationId,
        step: Step,
    },

    /// `restoreSnapshot` was called before `snapshot` — a kernel bug, not a
    /// data or policy error.
    #[error("snapshot missing: no snapshot has been taken for this run")]
    SnapshotMissing,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `edgesim-*` crates.
pub type EdgesimResult<T> = Result<T, EdgesimError>;
