//! Fluent builder for constructing a [`Simulator`].

use edgesim_entities::World;
use edgesim_policy::{Policy, PolicyParams};
use edgesim_topology::Topology;

use crate::sim::Simulator;

/// Builds a [`Simulator`] from a world, a topology, a policy, and the
/// SLA-threshold parameters that policy reads.
///
/// `world` and `topology` are required; `params` defaults to
/// `delay_threshold: 1.0, prov_time_threshold: 1.0` (no slack) when unset.
pub struct SimulatorBuilder<P: Policy> {
    world: Option<World>,
    topology: Option<Topology>,
    policy: Option<P>,
    params: PolicyParams,
}

impl<P: Policy> Default for SimulatorBuilder<P> {
    fn default() -> Self {
        Self {
            world: None,
            topology: None,
            policy: None,
            params: PolicyParams {
                delay_threshold: 1.0,
                prov_time_threshold: 1.0,
            },
        }
    }
}

impl<P: Policy> SimulatorBuilder<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn world(mut self, world: World) -> Self {
        self.world = Some(world);
        self
    }

    pub fn topology(mut self, topology: Topology) -> Self {
        self.topology = Some(topology);
        self
    }

    pub fn policy(mut self, policy: P) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn params(mut self, params: PolicyParams) -> Self {
        self.params = params;
        self
    }

    /// Build the [`Simulator`]. Panics if `world`, `topology`, or `policy`
    /// was never set — a wiring bug in the caller, not a runtime condition.
    pub fn build(self) -> Simulator<P> {
        let world = self.world.expect("SimulatorBuilder: world not set");
        let topology = self.topology.expect("SimulatorBuilder: topology not set");
        let policy = self.policy.expect("SimulatorBuilder: policy not set");
        Simulator::new(world, topology, policy, self.params)
    }
}
