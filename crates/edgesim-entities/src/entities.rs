//! Domain entity types.
//!
//! Cyclic relationships (`Service` ↔ `EdgeServer`, `ContainerRegistry` ↔
//! `EdgeServer`, `User` ↔ `BaseStation`) are modeled as relation-plus-id
//! lookups through the owning [`Registry`](crate::Registry) rather than
//! `Rc`/`RefCell` cycles: every cross-link below is a non-owning typed id,
//! resolved at use sites via `registry.find_by_id(..)`.

use std::collections::{HashMap, HashSet};

use edgesim_core::{
    ApplicationId, BaseStationId, ContainerImageId, ContainerRegistryId, Coordinates,
    EdgeServerId, ServiceId, Step, UserId,
};

use crate::registry::Entity;

/// Container image layer kind.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageLayer {
    OperatingSystem,
    Runtime,
    Application,
}

/// A wireless access point; a node of the topology graph.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStation {
    pub id: BaseStationId,
    pub coordinates: Coordinates,
    pub wireless_delay: i64,
    pub users: Vec<UserId>,
    pub edge_servers: Vec<EdgeServerId>,
    pub chassis_power: Option<f64>,
    pub power_model: Option<PowerModelKind>,
}

impl Entity for BaseStation {
    type Id = BaseStationId;
    fn id(&self) -> BaseStationId {
        self.id
    }
    fn set_id(&mut self, id: BaseStationId) {
        self.id = id;
    }
}

/// Compute node co-located with a base station.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeServer {
    pub id: EdgeServerId,
    pub coordinates: Coordinates,
    pub capacity: i64,
    /// Derived quantity maintained in sync with occupants; invariant:
    /// `demand == Σ service.demand + Σ registry.demand()` for hosted entities.
    pub demand: i64,
    pub base_station: BaseStationId,
    pub services: Vec<ServiceId>,
    pub container_registries: Vec<ContainerRegistryId>,
    pub max_power: f64,
    pub static_power_percentage: f64,
    pub power_model: Option<PowerModelKind>,
}

impl Entity for EdgeServer {
    type Id = EdgeServerId;
    fn id(&self) -> EdgeServerId {
        self.id
    }
    fn set_id(&mut self, id: EdgeServerId) {
        self.id = id;
    }
}

impl EdgeServer {
    /// Free capacity available to host another occupant.
    #[inline]
    pub fn free_capacity(&self) -> i64 {
        self.capacity - self.demand
    }

    /// `true` when `demand` exceeds `capacity` — counted as an overloaded
    /// server in the kernel's per-step metrics.
    #[inline]
    pub fn is_overloaded(&self) -> bool {
        self.demand > self.capacity
    }
}

/// A concrete container image held by a registry. Images with identical
/// `name` are interchangeable across registries.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerImage {
    pub id: ContainerImageId,
    pub size: i64,
    pub name: String,
    pub layer: ImageLayer,
    pub container_registry: Option<ContainerRegistryId>,
}

impl Entity for ContainerImage {
    type Id = ContainerImageId;
    fn id(&self) -> ContainerImageId {
        self.id
    }
    fn set_id(&mut self, id: ContainerImageId) {
        self.id = id;
    }
}

/// Holds a set of container images on an edge server; source of image
/// transfers during migration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerRegistry {
    pub id: ContainerRegistryId,
    pub server: Option<EdgeServerId>,
    pub images: Vec<ContainerImageId>,
    pub base_footprint: i64,
    pub provisioning_time: i64,
    pub migrations: Vec<MigrationRecord>,
}

impl Entity for ContainerRegistry {
    type Id = ContainerRegistryId;
    fn id(&self) -> ContainerRegistryId {
        self.id
    }
    fn set_id(&mut self, id: ContainerRegistryId) {
        self.id = id;
    }
}

impl ContainerRegistry {
    /// `base_footprint + Σ image.size`. The image sizes are summed by the
    /// caller (the registry only stores ids), so this takes the precomputed
    /// total rather than resolving images itself.
    pub fn demand(&self, image_size_sum: i64) -> i64 {
        self.base_footprint + image_size_sum
    }
}

/// Ordered chain of services consumed by a user.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Application {
    pub id: ApplicationId,
    pub services: Vec<ServiceId>,
    pub users: Vec<UserId>,
}

impl Entity for Application {
    type Id = ApplicationId;
    fn id(&self) -> ApplicationId {
        self.id
    }
    fn set_id(&mut self, id: ApplicationId) {
        self.id = id;
    }
}

/// A record of one migration event, kept on the service that moved.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MigrationRecord {
    pub step: Step,
    pub duration: f64,
    pub origin: Option<EdgeServerId>,
    pub destination: EdgeServerId,
}

/// Unit of placement: a capacity demand plus a list of image-layer names.
///
/// A service's `demand` is independent of its layers' sizes — layer sizes
/// only enter migration-time calculation, never placement capacity checks.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Service {
    pub id: ServiceId,
    pub demand: i64,
    pub layers: Vec<String>,
    pub server: Option<EdgeServerId>,
    pub application: ApplicationId,
    pub migrations: Vec<MigrationRecord>,
}

impl Entity for Service {
    type Id = ServiceId;
    fn id(&self) -> ServiceId {
        self.id
    }
    fn set_id(&mut self, id: ServiceId) {
        self.id = id;
    }
}

/// A mobile client following a precomputed coordinate trace.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    pub id: UserId,
    pub coordinates: Coordinates,
    pub coordinates_trace: Vec<Coordinates>,
    pub base_station: BaseStationId,
    pub applications: Vec<ApplicationId>,
    pub communication_paths: HashMap<ApplicationId, Vec<BaseStationId>>,
    pub delays: HashMap<ApplicationId, f64>,
    pub delay_slas: HashMap<ApplicationId, f64>,
    pub provisioning_time_slas: HashMap<ApplicationId, f64>,
}

impl Entity for User {
    type Id = UserId;
    fn id(&self) -> UserId {
        self.id
    }
    fn set_id(&mut self, id: UserId) {
        self.id = id;
    }
}

impl User {
    /// Applications whose latest delay breached `delay_sla * threshold`.
    pub fn delay_degraded_applications(&self, threshold: f64) -> Vec<ApplicationId> {
        self.applications
            .iter()
            .copied()
            .filter(|app| {
                let delay = self.delays.get(app).copied().unwrap_or(0.0);
                let sla = self.delay_slas.get(app).copied().unwrap_or(f64::MAX);
                delay > sla * threshold
            })
            .collect()
    }
}

/// Capability interface bound by name from scenario data. Concrete
/// behaviors live in [`crate::power`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerModelKind {
    LinearServerPower,
    SwitchPower,
}

/// The set of distinct image names hosted anywhere in the scenario. Used by
/// the registry manager to compute the footprint required for a new
/// registry (one representative image per name).
pub fn distinct_image_names(images: &[ContainerImage]) -> HashSet<&str> {
    images.iter().map(|img| img.name.as_str()).collect()
}
