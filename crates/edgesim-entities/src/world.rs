//! `World` — the aggregate of every entity registry for one simulation run.
//!
//! One struct, owned by the kernel, holding every [`Registry`](crate::Registry)
//! for the run, in place of scattered process-wide entity state. Resetting
//! between runs is just dropping the `World` and building a new one from the
//! loader.

use crate::{
    Application, BaseStation, ContainerImage, ContainerRegistry, EdgeServer, Registry, Service,
    User,
};

/// All entity registries for one scenario, constructed once by the loader
/// and owned by the simulation kernel for the lifetime of a run.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct World {
    pub base_stations: Registry<BaseStation>,
    pub edge_servers: Registry<EdgeServer>,
    pub container_images: Registry<ContainerImage>,
    pub container_registries: Registry<ContainerRegistry>,
    pub applications: Registry<Application>,
    pub services: Registry<Service>,
    pub users: Registry<User>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total image size currently registered under `registry_id`.
    pub fn registry_demand(&self, registry_id: edgesim_core::ContainerRegistryId) -> i64 {
        let Some(registry) = self.container_registries.find_by_id(registry_id) else {
            return 0;
        };
        let image_total: i64 = registry
            .images
            .iter()
            .filter_map(|id| self.container_images.find_by_id(*id))
            .map(|img| img.size)
            .sum();
        registry.demand(image_total)
    }
}
