//! Registry Manager — provisions and retires container-image registries.

use std::collections::HashMap;

use edgesim_core::{ContainerImageId, ContainerRegistryId, EdgeServerId, Step};
use edgesim_entities::{ContainerImage, ContainerRegistry, MigrationRecord, World};
use edgesim_topology::{Topology, Weight};

use crate::error::RoutingResult;

/// Create a new registry on `target_server` holding copies of
/// `images_to_replicate`, sourced from `source`'s base station. `source` is
/// `None` when the images being replicated aren't all drawn from one
/// existing registry (the set-cover expansion pass provisions from
/// representative images that may originate anywhere in the system); in
/// that case the transfer contributes no bandwidth-bound delay and the
/// migration's duration is `provisioning_time` alone.
///
/// The new registry's migration duration is `provisioning_time +
/// Σ(image.size / minBandwidth(path)) * hopCount`, computed over the same
/// bandwidth-weighted path used by [`crate::migration::get_migration_time`].
pub fn replicate_registry(
    world: &mut World,
    topology: &Topology,
    source: Option<ContainerRegistryId>,
    target_server: EdgeServerId,
    images_to_replicate: &[ContainerImageId],
    base_footprint: i64,
    provisioning_time: i64,
    step: Step,
) -> RoutingResult<ContainerRegistryId> {
    let source_server = source
        .and_then(|id| world.container_registries.find_by_id(id))
        .and_then(|r| r.server);
    let source_base_station = source_server
        .and_then(|sid| world.edge_servers.find_by_id(sid))
        .map(|s| s.base_station);

    let target_base_station = world
        .edge_servers
        .find_by_id(target_server)
        .map(|s| s.base_station);

    let images: Vec<ContainerImage> = images_to_replicate
        .iter()
        .filter_map(|id| world.container_images.find_by_id(*id))
        .cloned()
        .collect();

    let (min_bandwidth, hops) = match (source_base_station, target_base_station) {
        (Some(from), Some(to)) if from != to => {
            let path = topology.shortest_path(from, to, Weight::BandwidthRaw)?;
            (topology.path_min_bandwidth(&path), (path.len() - 1) as f64)
        }
        _ => (f64::INFINITY, 0.0),
    };

    let transfer_time: f64 = images
        .iter()
        .map(|img| img.size as f64 / min_bandwidth * hops)
        .sum();
    let duration = provisioning_time as f64 + transfer_time;

    let new_registry_id = ContainerRegistryId((world.container_registries.count() as u32) + 1);
    let mut first_image_id = (world.container_images.count() as u32) + 1;

    let mut new_image_ids = Vec::with_capacity(images.len());
    for mut image in images {
        let new_id = ContainerImageId(first_image_id);
        first_image_id += 1;
        image.id = new_id;
        image.container_registry = Some(new_registry_id);
        new_image_ids.push(new_id);
        world.container_images.insert(image);
    }

    let image_size_sum: i64 = new_image_ids
        .iter()
        .filter_map(|id| world.container_images.find_by_id(*id))
        .map(|img| img.size)
        .sum();

    world.container_registries.insert(ContainerRegistry {
        id: new_registry_id,
        server: Some(target_server),
        images: new_image_ids,
        base_footprint,
        provisioning_time,
        migrations: vec![MigrationRecord {
            step,
            duration,
            origin: source_server,
            destination: target_server,
        }],
    });

    if let Some(target) = world.edge_servers.find_by_id_mut(target_server) {
        target.container_registries.push(new_registry_id);
        target.demand += base_footprint + image_size_sum;
    }

    Ok(new_registry_id)
}

/// For every user, find the registry whose path to the user's base station
/// has the highest minimum bandwidth (ties broken by first encountered in
/// registry order). Any registry not the closest for any user is removed:
/// dropped from its server's list, its demand subtracted, its images
/// removed from the image collection, then registries and images are
/// renumbered contiguously from 1.
pub fn remove_farthest_registries(world: &mut World, topology: &Topology) -> RoutingResult<()> {
    let hosted: Vec<(ContainerRegistryId, edgesim_core::BaseStationId)> = world
        .container_registries
        .all()
        .iter()
        .filter_map(|r| {
            r.server
                .and_then(|sid| world.edge_servers.find_by_id(sid))
                .map(|s| (r.id, s.base_station))
        })
        .collect();

    let mut closest: std::collections::HashSet<ContainerRegistryId> = std::collections::HashSet::new();

    for user in world.users.all() {
        let mut best: Option<(ContainerRegistryId, f64)> = None;
        for &(registry_id, registry_bs) in &hosted {
            let path = topology.shortest_path(registry_bs, user.base_station, Weight::InverseBandwidth)?;
            let min_bw = topology.path_min_bandwidth(&path);
            match best {
                Some((_, current_best)) if min_bw <= current_best => {}
                _ => best = Some((registry_id, min_bw)),
            }
        }
        if let Some((registry_id, _)) = best {
            closest.insert(registry_id);
        }
    }

    let to_remove: Vec<ContainerRegistryId> = hosted
        .iter()
        .map(|(id, _)| *id)
        .filter(|id| !closest.contains(id))
        .collect();

    for registry_id in to_remove {
        deprovision(world, registry_id);
    }

    let registry_mapping = world.container_registries.renumber_from_one();
    let image_mapping = world.container_images.renumber_from_one();
    remap_registry_ids(world, &registry_mapping);
    remap_image_ids(world, &image_mapping);

    Ok(())
}

fn deprovision(world: &mut World, registry_id: ContainerRegistryId) {
    let demand = world.registry_demand(registry_id);
    let Some(registry) = world.container_registries.find_by_id(registry_id).cloned() else {
        return;
    };

    if let Some(server_id) = registry.server {
        if let Some(server) = world.edge_servers.find_by_id_mut(server_id) {
            server.container_registries.retain(|id| *id != registry_id);
            server.demand -= demand;
        }
    }

    for image_id in &registry.images {
        world.container_images.remove_by_id(*image_id);
    }
    world.container_registries.remove_by_id(registry_id);
}

fn remap_registry_ids(world: &mut World, mapping: &[(ContainerRegistryId, ContainerRegistryId)]) {
    if mapping.is_empty() {
        return;
    }
    let map: HashMap<_, _> = mapping.iter().copied().collect();
    for server in world.edge_servers.all_mut() {
        for id in server.container_registries.iter_mut() {
            if let Some(&new_id) = map.get(id) {
                *id = new_id;
            }
        }
    }
    for image in world.container_images.all_mut() {
        if let Some(old) = image.container_registry {
            if let Some(&new_id) = map.get(&old) {
                image.container_registry = Some(new_id);
            }
        }
    }
}

fn remap_image_ids(world: &mut World, mapping: &[(ContainerImageId, ContainerImageId)]) {
    if mapping.is_empty() {
        return;
    }
    let map: HashMap<_, _> = mapping.iter().copied().collect();
    for registry in world.container_registries.all_mut() {
        for id in registry.images.iter_mut() {
            if let Some(&new_id) = map.get(id) {
                *id = new_id;
            }
        }
    }
}
