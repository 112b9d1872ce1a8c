//! Routing & Delay Engine — maintains each user's per-application
//! communication path and keeps delay measurements in sync with it.

use edgesim_core::{ApplicationId, BaseStationId, UserId};
use edgesim_entities::World;
use edgesim_topology::{Topology, Weight};

use crate::error::{RoutingError, RoutingResult};

/// Which delay figure [`compute_delay`] returns.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DelayMetric {
    /// `wirelessDelay + pathDelay(path)`.
    Latency,
    /// Twice the latency figure — a round-trip approximation.
    ResponseTime,
}

/// Recompute and store `user.communicationPaths[app]`, updating the
/// traversed links' application membership and `user.delays[app]`.
///
/// When `path` is `None`, the path is derived by concatenating
/// delay-weighted shortest paths from the user's base station through each
/// service of `app`'s chain, in order, deduplicated end to end.
pub fn set_communication_path(
    world: &mut World,
    topology: &mut Topology,
    user: UserId,
    app: ApplicationId,
    path: Option<Vec<BaseStationId>>,
) -> RoutingResult<()> {
    if let Some(existing) = world
        .users
        .find_by_id(user)
        .ok_or(RoutingError::UserNotFound(user))?
        .communication_paths
        .get(&app)
        .cloned()
    {
        untrack_path(topology, &existing, app);
    }

    let new_path = match path {
        Some(p) => Topology::deduplicate(&p),
        None => compute_chain_path(world, topology, user, app)?,
    };

    track_path(topology, &new_path, app);

    world
        .users
        .find_by_id_mut(user)
        .ok_or(RoutingError::UserNotFound(user))?
        .communication_paths
        .insert(app, new_path);

    compute_delay(world, topology, user, app, DelayMetric::Latency)?;
    Ok(())
}

fn compute_chain_path(
    world: &World,
    topology: &Topology,
    user: UserId,
    app: ApplicationId,
) -> RoutingResult<Vec<BaseStationId>> {
    let u = world.users.find_by_id(user).ok_or(RoutingError::UserNotFound(user))?;
    let application = world
        .applications
        .find_by_id(app)
        .ok_or(RoutingError::ApplicationNotFound(app))?;

    let mut full_path = vec![u.base_station];
    let mut current = u.base_station;

    for service_id in &application.services {
        let service = world
            .services
            .find_by_id(*service_id)
            .ok_or(RoutingError::ServiceNotFound(*service_id))?;
        let server_id = service
            .server
            .ok_or(RoutingError::ServiceNotPlaced(*service_id))?;
        let server = world
            .edge_servers
            .find_by_id(server_id)
            .ok_or(RoutingError::ServerNotFound(server_id))?;
        let target = server.base_station;

        let segment = topology.shortest_path(current, target, Weight::Delay)?;
        full_path.extend_from_slice(&segment[1..]);
        current = target;
    }

    Ok(Topology::deduplicate(&full_path))
}

fn untrack_path(topology: &mut Topology, path: &[BaseStationId], app: ApplicationId) {
    let deduped = Topology::deduplicate(path);
    for pair in deduped.windows(2) {
        if let Some(link_id) = topology.link_between(pair[0], pair[1]).map(|l| l.id) {
            if let Some(link) = topology.link_mut(link_id) {
                link.applications.remove(&app);
            }
        }
    }
}

fn track_path(topology: &mut Topology, path: &[BaseStationId], app: ApplicationId) {
    for pair in path.windows(2) {
        if let Some(link_id) = topology.link_between(pair[0], pair[1]).map(|l| l.id) {
            if let Some(link) = topology.link_mut(link_id) {
                link.applications.insert(app);
            }
        }
    }
}

/// Recompute `user.delays[app]` from the currently stored communication
/// path and return the requested [`DelayMetric`]'s figure.
///
/// The stored value is always the latency figure regardless of `metric`, so
/// that the delay-SLA invariant (`delays[a] == wirelessDelay + pathDelay`)
/// holds no matter which metric callers have been asking for.
pub fn compute_delay(
    world: &mut World,
    topology: &Topology,
    user: UserId,
    app: ApplicationId,
    metric: DelayMetric,
) -> RoutingResult<f64> {
    let u = world.users.find_by_id(user).ok_or(RoutingError::UserNotFound(user))?;
    let path = u.communication_paths.get(&app).cloned().unwrap_or_default();
    let wireless_delay = world
        .base_stations
        .find_by_id(u.base_station)
        .map(|bs| bs.wireless_delay)
        .unwrap_or(0);

    let latency = wireless_delay as f64 + topology.path_delay(&path) as f64;

    if let Some(u) = world.users.find_by_id_mut(user) {
        u.delays.insert(app, latency);
    }

    Ok(match metric {
        DelayMetric::Latency => latency,
        DelayMetric::ResponseTime => latency * 2.0,
    })
}

/// The base station matching the user's current coordinates exactly, or
/// else the Euclidean-nearest one.
pub fn closest_base_station(world: &World, user: UserId) -> RoutingResult<BaseStationId> {
    let u = world.users.find_by_id(user).ok_or(RoutingError::UserNotFound(user))?;

    let stations = world.base_stations.all();
    if stations.is_empty() {
        return Err(RoutingError::NoBaseStations);
    }

    if let Some(exact) = stations.iter().find(|bs| bs.coordinates == u.coordinates) {
        return Ok(exact.id);
    }

    stations
        .iter()
        .min_by(|a, b| {
            a.coordinates
                .distance(u.coordinates)
                .total_cmp(&b.coordinates.distance(u.coordinates))
        })
        .map(|bs| bs.id)
        .ok_or(RoutingError::NoBaseStations)
}
