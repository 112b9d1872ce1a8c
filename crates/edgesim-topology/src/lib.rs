//! `edgesim-topology` — the undirected weighted graph over base stations and
//! its shortest-path service.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                    |
//! |-----------|--------------------------------------------------------------|
//! | [`graph`] | `Topology`, `TopologyBuilder`, `Link`, `Weight`             |
//! | [`error`] | `TopologyError`, `TopologyResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Link`.                |

pub mod error;
pub mod graph;

#[cfg(test)]
mod tests;

pub use error::{TopologyError, TopologyResult};
pub use graph::{Link, Topology, TopologyBuilder, Weight};
