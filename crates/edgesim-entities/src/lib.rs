//! `edgesim-entities` — entity types and per-type registries for the
//! `edgesim` edge-computing simulator.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|-------------------------------------------------------------|
//! | [`registry`] | `Entity` trait, `Registry<T>` (the `all`/`findBy`/… store) |
//! | [`entities`] | `BaseStation`, `EdgeServer`, `ContainerImage`, …            |
//! | [`power`]    | Power-consumption models bound by name from scenario data   |
//! | [`world`]    | `World` — the aggregate of every registry for one run        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod entities;
pub mod power;
pub mod registry;
pub mod world;

#[cfg(test)]
mod tests;

pub use entities::{
    Application, BaseStation, ContainerImage, ContainerRegistry, EdgeServer, ImageLayer,
    MigrationRecord, PowerModelKind, Service, User, distinct_image_names,
};
pub use registry::{Entity, Registry};
pub use world::World;
