//! Topology-subsystem error type.

use thiserror::Error;

use edgesim_core::BaseStationId;

/// Errors produced by `edgesim-topology`.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("no path from {from} to {to}")]
    PathNotFound {
        from: BaseStationId,
        to: BaseStationId,
    },

    #[error("base station {0} not found in topology")]
    NodeNotFound(BaseStationId),
}

pub type TopologyResult<T> = Result<T, TopologyError>;
