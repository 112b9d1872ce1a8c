//! Migration Engine — moves a service to a target server and accounts for
//! the time that migration would take over the network.

use edgesim_core::{EdgeServerId, ServiceId, Step};
use edgesim_entities::{MigrationRecord, World};
use edgesim_topology::{Topology, Weight};

use crate::error::{RoutingError, RoutingResult};

/// Estimated wall-clock time to pull `service`'s image layers onto
/// `target_server`.
///
/// For each layer name in the service, every container image with a
/// matching name is a migration candidate; images already co-located with
/// the target (same base station) cost nothing, and otherwise the cost is
/// `(image.size / minBandwidth(path)) * hopCount` — the path's minimum
/// bandwidth divides the size, then the result is *multiplied* by the hop
/// count rather than divided. Kept exactly as observed for reproducibility;
/// `corrected_formula` switches to the alternative that divides instead.
pub fn get_migration_time(
    world: &World,
    topology: &Topology,
    service: ServiceId,
    target_server: EdgeServerId,
    corrected_formula: bool,
) -> RoutingResult<f64> {
    let service = world
        .services
        .find_by_id(service)
        .ok_or(RoutingError::ServiceNotFound(service))?;
    let target = world
        .edge_servers
        .find_by_id(target_server)
        .ok_or(RoutingError::ServerNotFound(target_server))?;

    let mut total = 0.0;

    for layer_name in &service.layers {
        let mut best: Option<f64> = None;

        for image in world.container_images.find_by(|img| &img.name == layer_name) {
            let Some(registry_id) = image.container_registry else {
                continue;
            };
            let Some(registry) = world.container_registries.find_by_id(registry_id) else {
                continue;
            };
            let Some(origin_server_id) = registry.server else {
                continue;
            };
            let Some(origin_server) = world.edge_servers.find_by_id(origin_server_id) else {
                continue;
            };

            let candidate_time = if origin_server.base_station == target.base_station {
                0.0
            } else {
                let path = topology.shortest_path(
                    origin_server.base_station,
                    target.base_station,
                    Weight::BandwidthRaw,
                )?;
                let min_bandwidth = topology.path_min_bandwidth(&path);
                let hops = (path.len() - 1) as f64;
                let per_hop = image.size as f64 / min_bandwidth;
                if corrected_formula {
                    per_hop / hops.max(1.0)
                } else {
                    per_hop * hops
                }
            };

            best = Some(best.map_or(candidate_time, |b: f64| b.min(candidate_time)));
        }

        total += best.unwrap_or(0.0);
    }

    Ok(total)
}

/// Move `service` onto `target_server`, updating both servers' occupant
/// lists and demand and appending a [`MigrationRecord`]. Returns the
/// migration time computed by [`get_migration_time`].
pub fn migrate(
    world: &mut World,
    topology: &Topology,
    service_id: ServiceId,
    target_server: EdgeServerId,
    step: Step,
    corrected_formula: bool,
) -> RoutingResult<f64> {
    let migration_time =
        get_migration_time(world, topology, service_id, target_server, corrected_formula)?;

    let demand = world
        .services
        .find_by_id(service_id)
        .ok_or(RoutingError::ServiceNotFound(service_id))?
        .demand;
    let origin = world
        .services
        .find_by_id(service_id)
        .ok_or(RoutingError::ServiceNotFound(service_id))?
        .server;

    if let Some(origin_id) = origin {
        if let Some(origin_server) = world.edge_servers.find_by_id_mut(origin_id) {
            origin_server.demand -= demand;
            origin_server.services.retain(|id| *id != service_id);
        }
    }

    let target = world
        .edge_servers
        .find_by_id_mut(target_server)
        .ok_or(RoutingError::ServerNotFound(target_server))?;
    target.demand += demand;
    target.services.push(service_id);

    let service = world
        .services
        .find_by_id_mut(service_id)
        .ok_or(RoutingError::ServiceNotFound(service_id))?;
    service.server = Some(target_server);
    service.migrations.push(MigrationRecord {
        step,
        duration: migration_time,
        origin,
        destination: target_server,
    });

    Ok(migration_time)
}
