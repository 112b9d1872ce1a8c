//! `never_follow` — the no-op policy.

use edgesim_core::Step;
use edgesim_entities::World;
use edgesim_topology::Topology;

use crate::{Policy, PolicyParams, PolicyResult};

/// A [`Policy`] that never migrates a service or touches a registry.
///
/// Used as the baseline in comparative runs: with no policy intervention,
/// users' delays degrade purely as a function of their mobility trace.
pub struct NeverFollow;

impl Policy for NeverFollow {
    fn name(&self) -> &'static str {
        "never_follow"
    }

    fn apply(
        &self,
        _world: &mut World,
        _topology: &mut Topology,
        _params: &PolicyParams,
        _step: Step,
    ) -> PolicyResult<()> {
        Ok(())
    }
}
