//! Routing/migration/registry-subsystem error type.

use edgesim_core::{ApplicationId, EdgeServerId, ServiceId, UserId};
use edgesim_topology::TopologyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("user {0} not found")]
    UserNotFound(UserId),

    #[error("application {0} not found")]
    ApplicationNotFound(ApplicationId),

    #[error("service {0} not found")]
    ServiceNotFound(ServiceId),

    #[error("edge server {0} not found")]
    ServerNotFound(EdgeServerId),

    #[error("service {0} has not been placed on any server")]
    ServiceNotPlaced(ServiceId),

    #[error("no base station found for coordinates lookup")]
    NoBaseStations,

    #[error("path-finding failed: {0}")]
    Topology(#[from] TopologyError),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
