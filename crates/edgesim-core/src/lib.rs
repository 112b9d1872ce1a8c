//! `edgesim-core` — foundational types for the `edgesim` edge-computing simulator.
//!
//! This crate is a dependency of every other `edgesim-*` crate.  It
//! intentionally has no `edgesim-*` dependencies and minimal external ones
//! (only `rand` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|-----------------------------------------------------------|
//! | [`ids`]       | Typed ids for every entity kind plus `LinkId`             |
//! | [`geo`]       | `Coordinates`, planar Euclidean distance                  |
//! | [`time`]      | `Step`, `SimConfig`                                       |
//! | [`rng`]       | `SimRng` (global, deterministic)                           |
//! | [`error`]     | `EdgesimError`, `EdgesimResult`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by `edgesim-io`.                                   |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{EdgesimError, EdgesimResult};
pub use geo::Coordinates;
pub use ids::{
    ApplicationId, BaseStationId, ContainerImageId, ContainerRegistryId, EdgeServerId, LinkId,
    ServiceId, UserId,
};
pub use rng::SimRng;
pub use time::{SimConfig, Step};
