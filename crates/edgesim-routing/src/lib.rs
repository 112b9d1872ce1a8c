//! `edgesim-routing` — the Routing & Delay Engine, Migration Engine, and
//! Registry Manager.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|-------------------------------------------------------------|
//! | [`routing`]  | `set_communication_path`, `compute_delay`, `closest_base_station` |
//! | [`migration`]| `migrate`, `get_migration_time`                             |
//! | [`registry`] | `replicate_registry`, `remove_farthest_registries`           |
//! | [`error`]    | `RoutingError`, `RoutingResult<T>`                           |

pub mod error;
pub mod migration;
pub mod registry;
pub mod routing;


pub use error::{RoutingError, RoutingResult};
pub use migration::{get_migration_time, migrate};
pub use registry::{remove_farthest_registries, replicate_registry};
pub use routing::{closest_base_station, compute_delay, set_communication_path, DelayMetric};
