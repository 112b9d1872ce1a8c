//! Scenario file loading — JSON on disk to [`World`] + [`Topology`] +
//! [`SimConfig`].
//!
//! The on-disk shape mirrors the entity graph closely but tags cross-entity
//! references with an explicit `type` discriminator (`{"type": "BaseStation",
//! "id": 3}`) rather than a bare integer. [`load`] resolves every reference
//! while building the registries, so a scenario with a dangling id fails
//! fast as [`IoError::DatasetInvalid`] instead of surfacing as a
//! [`PathNotFound`] hours into a run.
//!
//! [`PathNotFound`]: edgesim_routing::RoutingError

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use edgesim_core::{
    ApplicationId, BaseStationId, ContainerImageId, ContainerRegistryId, Coordinates,
    EdgeServerId, LinkId, ServiceId, SimConfig, UserId,
};
use edgesim_entities::{
    Application, BaseStation, ContainerImage, ContainerRegistry, EdgeServer, ImageLayer,
    PowerModelKind, Service, User, World,
};
use edgesim_topology::{Link, Topology, TopologyBuilder};

use crate::error::{IoError, IoResult};

#[derive(Deserialize)]
struct RawRelationRef {
    #[serde(rename = "type")]
    kind: String,
    id: u32,
}

#[derive(Deserialize)]
struct RawBaseStation {
    id: u32,
    coordinates: (f64, f64),
    wireless_delay: i64,
    #[serde(default)]
    users: Vec<u32>,
    #[serde(default)]
    edge_servers: Vec<u32>,
    chassis_power: Option<f64>,
    power_model: Option<String>,
}

#[derive(Deserialize)]
struct RawEdgeServer {
    id: u32,
    capacity: i64,
    base_station: u32,
    coordinates: (f64, f64),
    #[serde(default)]
    services: Vec<u32>,
    static_power_percentage: f64,
    max_power: f64,
    power_model: Option<String>,
    #[serde(default)]
    container_registries: Vec<u32>,
}

#[derive(Deserialize)]
struct RawContainerImage {
    id: u32,
    size: i64,
    name: String,
    layer: String,
}

#[derive(Deserialize)]
struct RawContainerRegistry {
    id: u32,
    #[serde(default)]
    base_footprint: i64,
    #[serde(default)]
    provisioning_time: i64,
    server: u32,
    #[serde(default)]
    images: Vec<u32>,
}

#[derive(Deserialize)]
struct RawApplication {
    id: u32,
    #[serde(default)]
    services: Vec<u32>,
    #[serde(default)]
    users: Vec<u32>,
}

#[derive(Deserialize)]
struct RawService {
    id: u32,
    demand: i64,
    #[serde(default)]
    layers: Vec<String>,
    server: Option<RawRelationRef>,
    application: u32,
}

#[derive(Deserialize)]
struct RawUserApplication {
    id: u32,
    delay_sla: f64,
    #[serde(default)]
    provisioning_time_sla: f64,
    #[serde(default)]
    communication_path: Vec<RawRelationRef>,
}

#[derive(Deserialize)]
struct RawUser {
    id: u32,
    coordinates_trace: Vec<(f64, f64)>,
    base_station: RawRelationRef,
    applications: Vec<RawUserApplication>,
}

#[derive(Deserialize)]
struct RawLink {
    id: u32,
    nodes: (RawRelationRef, RawRelationRef),
    delay: i64,
    bandwidth: i64,
    #[serde(default)]
    bandwidth_demand: i64,
    active_power: Option<f64>,
    low_power_percentage: Option<f64>,
}

#[derive(Deserialize, Default)]
struct RawNetwork {
    #[serde(default)]
    links: Vec<RawLink>,
}

#[derive(Deserialize)]
struct RawScenario {
    simulation_steps: u64,
    #[serde(default)]
    base_stations: Vec<RawBaseStation>,
    #[serde(default)]
    edge_servers: Vec<RawEdgeServer>,
    #[serde(default)]
    container_images: Vec<RawContainerImage>,
    #[serde(default)]
    container_registries: Vec<RawContainerRegistry>,
    #[serde(default)]
    applications: Vec<RawApplication>,
    #[serde(default)]
    services: Vec<RawService>,
    #[serde(default)]
    users: Vec<RawUser>,
    #[serde(default)]
    network: RawNetwork,
}

fn power_model(raw: &Option<String>) -> IoResult<Option<PowerModelKind>> {
    match raw.as_deref() {
        None => Ok(None),
        Some("LinearServerPower") => Ok(Some(PowerModelKind::LinearServerPower)),
        Some("SwitchPower") => Ok(Some(PowerModelKind::SwitchPower)),
        Some(other) => Err(IoError::DatasetInvalid(format!(
            "unknown power_model \"{other}\""
        ))),
    }
}

fn image_layer(raw: &str) -> IoResult<ImageLayer> {
    match raw {
        "OperatingSystem" => Ok(ImageLayer::OperatingSystem),
        "Runtime" => Ok(ImageLayer::Runtime),
        "Application" => Ok(ImageLayer::Application),
        other => Err(IoError::DatasetInvalid(format!(
            "unknown image layer \"{other}\""
        ))),
    }
}

fn expect_base_station(r: &RawRelationRef) -> IoResult<BaseStationId> {
    if r.kind != "BaseStation" {
        return Err(IoError::DatasetInvalid(format!(
            "expected a BaseStation reference, got type \"{}\"",
            r.kind
        )));
    }
    Ok(BaseStationId(r.id))
}

fn expect_edge_server(r: &RawRelationRef) -> IoResult<EdgeServerId> {
    if r.kind != "EdgeServer" {
        return Err(IoError::DatasetInvalid(format!(
            "expected an EdgeServer reference, got type \"{}\"",
            r.kind
        )));
    }
    Ok(EdgeServerId(r.id))
}

/// Load a scenario file from `path`, returning the populated [`World`],
/// [`Topology`], and the run-level [`SimConfig`] (the scenario's step count,
/// plus caller-supplied threshold/seed fields defaulted to `0`/`1.0`; the CLI
/// overwrites those after loading).
pub fn load(path: &Path) -> IoResult<(World, Topology, SimConfig)> {
    let text = fs::read_to_string(path)?;
    let raw: RawScenario = serde_json::from_str(&text)?;

    let mut world = World::new();
    let mut known_base_stations = HashSet::new();
    let mut known_edge_servers = HashSet::new();

    for bs in &raw.base_stations {
        known_base_stations.insert(bs.id);
        world.base_stations.insert(BaseStation {
            id: BaseStationId(bs.id),
            coordinates: Coordinates::new(bs.coordinates.0, bs.coordinates.1),
            wireless_delay: bs.wireless_delay,
            users: bs.users.iter().map(|&id| UserId(id)).collect(),
            edge_servers: bs.edge_servers.iter().map(|&id| EdgeServerId(id)).collect(),
            chassis_power: bs.chassis_power,
            power_model: power_model(&bs.power_model)?,
        });
    }

    for es in &raw.edge_servers {
        if !known_base_stations.contains(&es.base_station) {
            return Err(IoError::DatasetInvalid(format!(
                "edge_server {} references unknown base_station {}",
                es.id, es.base_station
            )));
        }
        known_edge_servers.insert(es.id);
        world.edge_servers.insert(EdgeServer {
            id: EdgeServerId(es.id),
            coordinates: Coordinates::new(es.coordinates.0, es.coordinates.1),
            capacity: es.capacity,
            demand: 0,
            base_station: BaseStationId(es.base_station),
            services: es.services.iter().map(|&id| ServiceId(id)).collect(),
            container_registries: es
                .container_registries
                .iter()
                .map(|&id| ContainerRegistryId(id))
                .collect(),
            max_power: es.max_power,
            static_power_percentage: es.static_power_percentage,
            power_model: power_model(&es.power_model)?,
        });
    }

    for img in &raw.container_images {
        world.container_images.insert(ContainerImage {
            id: ContainerImageId(img.id),
            size: img.size,
            name: img.name.clone(),
            layer: image_layer(&img.layer)?,
            container_registry: None,
        });
    }

    for reg in &raw.container_registries {
        if !known_edge_servers.contains(&reg.server) {
            return Err(IoError::DatasetInvalid(format!(
                "container_registry {} references unknown edge_server {}",
                reg.id, reg.server
            )));
        }
        let registry_id = ContainerRegistryId(reg.id);
        for &image_id in &reg.images {
            if let Some(image) = world.container_images.find_by_id_mut(ContainerImageId(image_id))
            {
                image.container_registry = Some(registry_id);
            } else {
                return Err(IoError::DatasetInvalid(format!(
                    "container_registry {} references unknown image {}",
                    reg.id, image_id
                )));
            }
        }
        world.container_registries.insert(ContainerRegistry {
            id: registry_id,
            server: Some(EdgeServerId(reg.server)),
            images: reg.images.iter().map(|&id| ContainerImageId(id)).collect(),
            base_footprint: reg.base_footprint,
            provisioning_time: reg.provisioning_time,
            migrations: vec![],
        });
    }

    for app in &raw.applications {
        world.applications.insert(Application {
            id: ApplicationId(app.id),
            services: app.services.iter().map(|&id| ServiceId(id)).collect(),
            users: app.users.iter().map(|&id| UserId(id)).collect(),
        });
    }

    for svc in &raw.services {
        let server = match &svc.server {
            None => None,
            Some(r) => Some(expect_edge_server(r)?),
        };
        world.services.insert(Service {
            id: ServiceId(svc.id),
            demand: svc.demand,
            layers: svc.layers.clone(),
            server,
            application: ApplicationId(svc.application),
            migrations: vec![],
        });
    }

    for user in &raw.users {
        let base_station = expect_base_station(&user.base_station)?;
        if !known_base_stations.contains(&base_station.0) {
            return Err(IoError::DatasetInvalid(format!(
                "user {} references unknown base_station {}",
                user.id, base_station.0
            )));
        }

        let mut delay_slas = std::collections::HashMap::new();
        let mut provisioning_time_slas = std::collections::HashMap::new();
        let mut communication_paths = std::collections::HashMap::new();
        let mut applications = Vec::with_capacity(user.applications.len());

        for app in &user.applications {
            let app_id = ApplicationId(app.id);
            applications.push(app_id);
            delay_slas.insert(app_id, app.delay_sla);
            provisioning_time_slas.insert(app_id, app.provisioning_time_sla);
            if !app.communication_path.is_empty() {
                let path = app
                    .communication_path
                    .iter()
                    .map(expect_base_station)
                    .collect::<IoResult<Vec<_>>>()?;
                communication_paths.insert(app_id, path);
            }
        }

        world.users.insert(User {
            id: UserId(user.id),
            coordinates: user
                .coordinates_trace
                .first()
                .map(|&(x, y)| Coordinates::new(x, y))
                .unwrap_or(Coordinates::new(0.0, 0.0)),
            coordinates_trace: user
                .coordinates_trace
                .iter()
                .map(|&(x, y)| Coordinates::new(x, y))
                .collect(),
            base_station,
            applications,
            communication_paths,
            delays: std::collections::HashMap::new(),
            delay_slas,
            provisioning_time_slas,
        });
    }

    // `EdgeServer.demand` is derived, not stored in the scenario file — sum
    // each server's hosted services' demand plus its registries' footprints
    // now that both collections are fully populated.
    let server_ids: Vec<EdgeServerId> = world.edge_servers.all().iter().map(|s| s.id).collect();
    for server_id in server_ids {
        let service_demand: i64 = world
            .services
            .all()
            .iter()
            .filter(|s| s.server == Some(server_id))
            .map(|s| s.demand)
            .sum();
        let registry_demand: i64 = world
            .edge_servers
            .find_by_id(server_id)
            .map(|s| s.container_registries.clone())
            .unwrap_or_default()
            .iter()
            .map(|&rid| world.registry_demand(rid))
            .sum();
        if let Some(server) = world.edge_servers.find_by_id_mut(server_id) {
            server.demand = service_demand + registry_demand;
        }
    }

    let mut builder = TopologyBuilder::new();
    for &id in &known_base_stations {
        builder.add_node(BaseStationId(id));
    }
    for link in &raw.network.links {
        let a = expect_base_station(&link.nodes.0)?;
        let b = expect_base_station(&link.nodes.1)?;
        if !known_base_stations.contains(&a.0) || !known_base_stations.contains(&b.0) {
            return Err(IoError::DatasetInvalid(format!(
                "network link {} references an unknown base station",
                link.id
            )));
        }
        builder.add_link(Link {
            id: LinkId(link.id),
            a,
            b,
            delay: link.delay,
            bandwidth: link.bandwidth,
            bandwidth_demand: link.bandwidth_demand,
            applications: HashSet::new(),
            services_being_migrated: vec![],
            active_power: link.active_power,
            low_power_percentage: link.low_power_percentage,
        });
    }
    let topology = builder.build();

    // Recompute each user's seeded delay from its seeded communication path
    // (if any) now that the topology and per-link wireless delays exist.
    let seeded_paths: Vec<(UserId, ApplicationId)> = world
        .users
        .all()
        .iter()
        .flat_map(|user| {
            user.applications
                .iter()
                .filter(|app_id| user.communication_paths.contains_key(app_id))
                .map(move |&app_id| (user.id, app_id))
        })
        .collect();
    for (user_id, app_id) in seeded_paths {
        let _ = edgesim_routing::compute_delay(
            &mut world,
            &topology,
            user_id,
            app_id,
            edgesim_routing::DelayMetric::Latency,
        );
    }

    let config = SimConfig {
        total_steps: raw.simulation_steps,
        seed: 0,
        delay_threshold: 1.0,
        prov_time_threshold: 1.0,
        corrected_migration_formula: false,
    };

    Ok((world, topology, config))
}
