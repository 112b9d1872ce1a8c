//! `proposed_heuristic` — delay-SLA-gated migration plus a greedy
//! set-cover registry (de)provisioning loop.

use std::collections::{HashMap, HashSet};

use edgesim_core::{ApplicationId, EdgeServerId, Step, UserId};
use edgesim_entities::{distinct_image_names, ContainerImage, World};
use edgesim_routing::{replicate_registry, set_communication_path};
use edgesim_topology::{Topology, Weight};

use crate::placement::{candidates_by_delay, place_service};
use crate::{Policy, PolicyParams, PolicyResult};

/// A [`Policy`] that only migrates applications whose delay has breached a
/// fraction of their SLA, then runs a registry culling and greedy
/// set-cover expansion pass keyed on the users left with an unacceptably
/// slow migration.
///
/// # U_slow representation
///
/// The wording "add the user to U_slow" assumes one service per user; a
/// user with several applications can have some meet their delay SLA and
/// others not, so U_slow here is tracked as `(UserId, ApplicationId)`
/// pairs rather than bare user ids, and Phase C's "single service's
/// layers" is generalized to the full chain of services backing that
/// application.
pub struct ProposedHeuristic {
    pub corrected_formula: bool,
}

impl Policy for ProposedHeuristic {
    fn name(&self) -> &'static str {
        "proposed_heuristic"
    }

    fn apply(
        &self,
        world: &mut World,
        topology: &mut Topology,
        params: &PolicyParams,
        step: Step,
    ) -> PolicyResult<()> {
        let u_slow = self.phase_a_migration(world, topology, params, step)?;
        edgesim_routing::remove_farthest_registries(world, topology)?;
        self.phase_c_expansion(world, topology, params, u_slow, step)?;
        Ok(())
    }
}

impl ProposedHeuristic {
    fn phase_a_migration(
        &self,
        world: &mut World,
        topology: &mut Topology,
        params: &PolicyParams,
        step: Step,
    ) -> PolicyResult<HashSet<(UserId, ApplicationId)>> {
        let mut pressure: Vec<(UserId, ApplicationId, f64)> = Vec::new();
        for user in world.users.all() {
            for app in user.delay_degraded_applications(params.delay_threshold) {
                let sla = user.delay_slas.get(&app).copied().unwrap_or(f64::MAX);
                let delay = user.delays.get(&app).copied().unwrap_or(0.0);
                pressure.push((user.id, app, sla - delay));
            }
        }
        pressure.sort_by(|a, b| a.2.total_cmp(&b.2));

        let mut u_slow = HashSet::new();

        for (user_id, app_id, _) in pressure {
            let Some(user) = world.users.find_by_id(user_id) else {
                continue;
            };
            let prov_sla = user
                .provisioning_time_slas
                .get(&app_id)
                .copied()
                .unwrap_or(f64::MAX);
            let base_station = user.base_station;
            let p_a = prov_sla * params.prov_time_threshold;

            let candidates = candidates_by_delay(world, topology, base_station)?;
            let Some(application) = world.applications.find_by_id(app_id) else {
                continue;
            };
            let service_ids = application.services.clone();

            let mut slow = false;
            for service_id in service_ids {
                if let Some(duration) = place_service(
                    world,
                    topology,
                    &candidates,
                    service_id,
                    step,
                    self.corrected_formula,
                )? {
                    if duration > p_a {
                        slow = true;
                    }
                }
            }
            if slow {
                u_slow.insert((user_id, app_id));
            }

            set_communication_path(world, topology, user_id, app_id, None)?;
        }

        Ok(u_slow)
    }

    fn phase_c_expansion(
        &self,
        world: &mut World,
        topology: &Topology,
        params: &PolicyParams,
        mut u_slow: HashSet<(UserId, ApplicationId)>,
        step: Step,
    ) -> PolicyResult<()> {
        let representatives = representative_images(world);
        let required_footprint: i64 = representatives.values().map(|img| img.size).sum();
        if required_footprint == 0 {
            return Ok(());
        }

        let mut candidates: Vec<EdgeServerId> = world
            .edge_servers
            .all()
            .iter()
            .filter(|s| s.free_capacity() >= required_footprint && s.container_registries.is_empty())
            .map(|s| s.id)
            .collect();

        while !u_slow.is_empty() && !candidates.is_empty() {
            let mut best: Option<(usize, EdgeServerId, Vec<(UserId, ApplicationId)>)> = None;

            for (idx, &candidate_id) in candidates.iter().enumerate() {
                let Some(candidate) = world.edge_servers.find_by_id(candidate_id) else {
                    continue;
                };
                let candidate_base_station = candidate.base_station;

                let mut supported = Vec::new();
                for &(user_id, app_id) in &u_slow {
                    let Some(user) = world.users.find_by_id(user_id) else {
                        continue;
                    };
                    if user.base_station == candidate_base_station {
                        supported.push((user_id, app_id));
                        continue;
                    }
                    let Some(application) = world.applications.find_by_id(app_id) else {
                        continue;
                    };
                    let layer_size_sum: i64 = application
                        .services
                        .iter()
                        .filter_map(|sid| world.services.find_by_id(*sid))
                        .flat_map(|s| s.layers.iter())
                        .filter_map(|name| representatives.get(name))
                        .map(|img| img.size)
                        .sum();

                    let path = topology.shortest_path(
                        candidate_base_station,
                        user.base_station,
                        Weight::InverseBandwidth,
                    )?;
                    let min_bandwidth = topology.path_min_bandwidth(&path);
                    let prov_sla = user
                        .provisioning_time_slas
                        .get(&app_id)
                        .copied()
                        .unwrap_or(f64::MAX);

                    if layer_size_sum as f64 / min_bandwidth <= prov_sla * params.prov_time_threshold {
                        supported.push((user_id, app_id));
                    }
                }

                let is_better = match &best {
                    None => true,
                    Some((_, _, best_supported)) => supported.len() > best_supported.len(),
                };
                if is_better {
                    best = Some((idx, candidate_id, supported));
                }
            }

            let Some((idx, winner, supported)) = best else {
                break;
            };
            if supported.is_empty() {
                break;
            }

            provision_registry(world, topology, winner, &representatives, step)?;
            for pair in &supported {
                u_slow.remove(pair);
            }
            candidates.remove(idx);
        }

        Ok(())
    }
}

/// One image per distinct name, using [`distinct_image_names`] to find the
/// set that needs representing and the first matching image in registry
/// order as its representative.
fn representative_images(world: &World) -> HashMap<String, ContainerImage> {
    let images = world.container_images.all();
    distinct_image_names(images)
        .into_iter()
        .filter_map(|name| {
            world
                .container_images
                .find_by(|img| img.name == name)
                .next()
                .map(|img| (name.to_string(), img.clone()))
        })
        .collect()
}

/// Provision a new registry on `target_server` holding a copy of every
/// representative image, through the same [`replicate_registry`] primitive
/// used elsewhere for registry provisioning. The representatives may come
/// from different source registries, so there is no single originating
/// registry to pass as `source` — the migration's recorded duration is
/// therefore `provisioning_time` alone, with no bandwidth-bound transfer
/// term.
fn provision_registry(
    world: &mut World,
    topology: &Topology,
    target_server: EdgeServerId,
    representatives: &HashMap<String, ContainerImage>,
    step: Step,
) -> PolicyResult<()> {
    let image_ids: Vec<_> = representatives.values().map(|img| img.id).collect();
    replicate_registry(world, topology, None, target_server, &image_ids, 0, 0, step)?;
    Ok(())
}
