//! Policy-subsystem error type.

use edgesim_routing::RoutingError;
use edgesim_topology::TopologyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("path-finding failed: {0}")]
    Topology(#[from] TopologyError),
}

pub type PolicyResult<T> = Result<T, PolicyError>;
