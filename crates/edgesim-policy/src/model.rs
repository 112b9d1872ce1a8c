//! The `Policy` trait — the main extension point for placement strategies.

use edgesim_core::Step;
use edgesim_entities::World;
use edgesim_topology::Topology;

use crate::PolicyResult;

/// Tunable thresholds shared by policies that react to SLA pressure.
///
/// `never_follow` and `follow_user` ignore these; `proposed_heuristic` uses
/// both.
#[derive(Copy, Clone, Debug)]
pub struct PolicyParams {
    /// Fraction of a user's delay SLA that must be exceeded before a
    /// migration is attempted, in `(0, 1]`.
    pub delay_threshold: f64,
    /// Fraction of a user's provisioning-time SLA used to judge whether a
    /// migration was fast enough, in `(0, 1]`.
    pub prov_time_threshold: f64,
}

/// Pluggable placement/migration policy.
///
/// Implement this trait to decide, once per step, how services should be
/// migrated and how registries should be (de)provisioned. The kernel calls
/// [`apply`][Self::apply] after mobility and routing have been refreshed for
/// the step and before metrics are collected for it.
///
/// # Mutation
///
/// A policy is the only code, besides the mobility update and the routing
/// engine it calls into, permitted to mutate `world`/`topology` during a
/// step. Implementations should route every placement change through
/// `edgesim-routing` rather than poking entity fields directly, so the
/// shared invariants (server demand, link application sets) stay correct.
pub trait Policy: Send + Sync {
    /// A short, stable name for this policy — used in CLI output and logs.
    fn name(&self) -> &'static str;

    /// Run one step's worth of placement decisions.
    fn apply(
        &self,
        world: &mut World,
        topology: &mut Topology,
        params: &PolicyParams,
        step: Step,
    ) -> PolicyResult<()>;
}
