//! `follow_user` — registry-free, purely reactive migration policy.

use edgesim_core::Step;
use edgesim_entities::World;
use edgesim_routing::set_communication_path;
use edgesim_topology::Topology;

use crate::placement::{candidates_by_delay, place_service};
use crate::{Policy, PolicyParams, PolicyResult};

/// A [`Policy`] that migrates every service of every application to the
/// nearest edge server with room, every step, ignoring SLA thresholds and
/// never touching a registry.
///
/// Grounded on the proposed heuristic's Phase A migration step, minus the
/// delay-SLA gate and the registry phases B/C.
pub struct FollowUser {
    pub corrected_formula: bool,
}

impl Policy for FollowUser {
    fn name(&self) -> &'static str {
        "follow_user"
    }

    fn apply(
        &self,
        world: &mut World,
        topology: &mut Topology,
        _params: &PolicyParams,
        step: Step,
    ) -> PolicyResult<()> {
        let user_ids: Vec<_> = world.users.all().iter().map(|u| u.id).collect();

        for user_id in user_ids {
            let Some(user) = world.users.find_by_id(user_id) else {
                continue;
            };
            let base_station = user.base_station;
            let applications = user.applications.clone();
            let candidates = candidates_by_delay(world, topology, base_station)?;

            for app_id in applications {
                let Some(application) = world.applications.find_by_id(app_id) else {
                    continue;
                };
                let service_ids = application.services.clone();

                for service_id in service_ids {
                    place_service(
                        world,
                        topology,
                        &candidates,
                        service_id,
                        step,
                        self.corrected_formula,
                    )?;
                }

                set_communication_path(world, topology, user_id, app_id, None)?;
            }
        }

        Ok(())
    }
}
