//! Shared greedy placement rule used by `follow_user` and, for its Phase A
//! migration step, `proposed_heuristic`.

use edgesim_core::{BaseStationId, EdgeServerId, ServiceId, Step};
use edgesim_entities::World;
use edgesim_topology::{Topology, Weight};

use crate::PolicyResult;

/// Every edge server's id paired with the delay of the shortest
/// delay-weighted path from `from` to that server's base station, sorted
/// ascending.
pub fn candidates_by_delay(
    world: &World,
    topology: &Topology,
    from: BaseStationId,
) -> PolicyResult<Vec<(EdgeServerId, i64)>> {
    let mut candidates = Vec::with_capacity(world.edge_servers.count());
    for server in world.edge_servers.all() {
        let path = topology.shortest_path(from, server.base_station, Weight::Delay)?;
        candidates.push((server.id, topology.path_delay(&path)));
    }
    candidates.sort_by_key(|(_, delay)| *delay);
    Ok(candidates)
}

/// Walk `candidates` in order: stop doing nothing if the service is already
/// on the first one that would be chosen; otherwise migrate to the first
/// candidate with enough free capacity. Returns the migration duration if a
/// migration happened, `None` if the service was already correctly placed
/// or no candidate had room (a silently-skipped `CapacityExhausted` case).
pub fn place_service(
    world: &mut World,
    topology: &Topology,
    candidates: &[(EdgeServerId, i64)],
    service_id: ServiceId,
    step: Step,
    corrected_formula: bool,
) -> PolicyResult<Option<f64>> {
    let Some(service) = world.services.find_by_id(service_id) else {
        return Ok(None);
    };
    let current_server = service.server;
    let service_demand = service.demand;

    for &(candidate_id, _delay) in candidates {
        if current_server == Some(candidate_id) {
            return Ok(None);
        }
        let Some(candidate) = world.edge_servers.find_by_id(candidate_id) else {
            continue;
        };
        if candidate.free_capacity() >= service_demand {
            let duration = edgesim_routing::migrate(
                world,
                topology,
                service_id,
                candidate_id,
                step,
                corrected_formula,
            )?;
            return Ok(Some(duration));
        }
    }

    Ok(None)
}
