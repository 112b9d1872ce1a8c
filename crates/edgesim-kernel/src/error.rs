//! Kernel-level error type.

use edgesim_core::Step;
use edgesim_policy::PolicyError;
use edgesim_routing::RoutingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("routing error at step {step}: {source}")]
    Routing {
        step: Step,
        #[source]
        source: RoutingError,
    },

    #[error("policy error at step {step}: {source}")]
    Policy {
        step: Step,
        #[source]
        source: PolicyError,
    },

    #[error("no topology registered for this run")]
    NoTopology,

    #[error("restoreOriginalState called before storeOriginalState")]
    SnapshotMissing,
}

pub type SimResult<T> = Result<T, SimError>;
