//! Per-step measurements collected by [`crate::Simulator::run`].

use std::collections::HashMap;

use edgesim_core::{
    ApplicationId, BaseStationId, Coordinates, EdgeServerId, LinkId, ServiceId, Step, UserId,
};
use edgesim_entities::{MigrationRecord, World};
use edgesim_topology::Topology;

/// Snapshot of one edge server at one step.
#[derive(Clone, Debug)]
pub struct EdgeServerMetrics {
    pub id: EdgeServerId,
    pub demand: i64,
    pub capacity: i64,
    pub service_count: usize,
    pub power: f64,
    pub overloaded: bool,
}

/// Snapshot of one base station at one step.
#[derive(Clone, Debug)]
pub struct BaseStationMetrics {
    pub id: BaseStationId,
    pub power: f64,
}

/// Snapshot of one user at one step.
#[derive(Clone, Debug)]
pub struct UserMetrics {
    pub id: UserId,
    pub coordinates: Coordinates,
    pub base_station: BaseStationId,
    pub communication_paths: HashMap<ApplicationId, Vec<BaseStationId>>,
    pub delays: HashMap<ApplicationId, f64>,
}

/// Snapshot of one service at one step.
#[derive(Clone, Debug)]
pub struct ServiceMetrics {
    pub id: ServiceId,
    pub server: Option<EdgeServerId>,
    /// Migrations recorded at `step - 1` — the step before this snapshot was
    /// taken.
    pub migrations_last_step: Vec<MigrationRecord>,
}

/// Snapshot of one link at one step.
#[derive(Clone, Debug)]
pub struct LinkMetrics {
    pub id: LinkId,
    pub bandwidth_demand: i64,
}

/// Aggregate registry statistics for one step.
#[derive(Clone, Debug, Default)]
pub struct RegistryAggregate {
    pub count: usize,
    pub total_demand: i64,
    pub image_count: usize,
}

/// Everything measured for one step of the run.
#[derive(Clone, Debug)]
pub struct StepMetrics {
    pub step: Step,
    pub edge_servers: Vec<EdgeServerMetrics>,
    pub base_stations: Vec<BaseStationMetrics>,
    pub users: Vec<UserMetrics>,
    pub services: Vec<ServiceMetrics>,
    pub links: Vec<LinkMetrics>,
    pub registries: RegistryAggregate,
}

impl StepMetrics {
    pub fn overloaded_server_count(&self) -> usize {
        self.edge_servers.iter().filter(|s| s.overloaded).count()
    }

    pub fn total_power(&self) -> f64 {
        let server_power: f64 = self.edge_servers.iter().map(|s| s.power).sum();
        let station_power: f64 = self.base_stations.iter().map(|b| b.power).sum();
        server_power + station_power
    }
}

/// Sum of a base station's incident links' switch-port power under their
/// bound power model, plus the station's own chassis floor if configured.
fn base_station_power(bs: &edgesim_entities::BaseStation, topology: &Topology) -> f64 {
    let link_power: f64 = topology
        .links_incident(bs.id)
        .map(|link| {
            edgesim_entities::power::switch_port_power(
                link.active_power.unwrap_or(0.0),
                link.low_power_percentage.unwrap_or(0.0),
                link.bandwidth_demand,
                link.bandwidth,
            )
        })
        .sum();
    bs.chassis_power.unwrap_or(0.0) + link_power
}

/// Collect one step's worth of metrics from `world`/`topology`.
///
/// `step` is the step just advanced through (the snapshot is taken after
/// mobility/routing update but before the policy runs for this step).
pub fn collect(world: &World, topology: &Topology, step: Step) -> StepMetrics {
    let edge_servers = world
        .edge_servers
        .all()
        .iter()
        .map(|s| EdgeServerMetrics {
            id: s.id,
            demand: s.demand,
            capacity: s.capacity,
            service_count: s.services.len(),
            power: edgesim_entities::power::server_power_consumption(s),
            overloaded: s.is_overloaded(),
        })
        .collect();

    let base_stations = world
        .base_stations
        .all()
        .iter()
        .map(|bs| BaseStationMetrics {
            id: bs.id,
            power: base_station_power(bs, topology),
        })
        .collect();

    let users = world
        .users
        .all()
        .iter()
        .map(|u| UserMetrics {
            id: u.id,
            coordinates: u.coordinates,
            base_station: u.base_station,
            communication_paths: u.communication_paths.clone(),
            delays: u.delays.clone(),
        })
        .collect();

    let prior_step = Step(step.0.saturating_sub(1));
    let services = world
        .services
        .all()
        .iter()
        .map(|s| ServiceMetrics {
            id: s.id,
            server: s.server,
            migrations_last_step: s
                .migrations
                .iter()
                .filter(|m| m.step == prior_step)
                .cloned()
                .collect(),
        })
        .collect();

    let links = topology
        .links()
        .map(|link| LinkMetrics {
            id: link.id,
            bandwidth_demand: link.bandwidth_demand,
        })
        .collect();

    let image_count: usize = world
        .container_registries
        .all()
        .iter()
        .map(|r| r.images.len())
        .sum();
    let total_demand: i64 = world
        .container_registries
        .all()
        .iter()
        .map(|r| world.registry_demand(r.id))
        .sum();
    let registries = RegistryAggregate {
        count: world.container_registries.count(),
        total_demand,
        image_count,
    };

    StepMetrics {
        step,
        edge_servers,
        base_stations,
        users,
        services,
        links,
        registries,
    }
}
