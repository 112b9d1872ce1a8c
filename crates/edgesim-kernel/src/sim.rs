//! The [`Simulator`] struct and its step loop.

use edgesim_core::Step;
use edgesim_entities::World;
use edgesim_policy::{Policy, PolicyParams};
use edgesim_topology::Topology;

use crate::error::{SimError, SimResult};
use crate::metrics::{self, StepMetrics};
use crate::observer::SimObserver;

/// Predicate polled before each step; `true` ends the run.
///
/// Implemented for any `FnMut(&World, Step) -> bool` closure, and for
/// [`StepLimit`] for the common "run for N steps" case.
pub trait StoppingCriterion {
    fn should_stop(&mut self, world: &World, step: Step) -> bool;
}

impl<F> StoppingCriterion for F
where
    F: FnMut(&World, Step) -> bool,
{
    fn should_stop(&mut self, world: &World, step: Step) -> bool {
        self(world, step)
    }
}

/// Stop once `step` exceeds a fixed step count, taken from the scenario's
/// `simulation_steps`.
pub struct StepLimit(pub u64);

impl StoppingCriterion for StepLimit {
    fn should_stop(&mut self, _world: &World, step: Step) -> bool {
        step.0 > self.0
    }
}

/// Full entity-graph state captured by [`Simulator::store_original_state`]
/// and restored by [`Simulator::restore_original_state`].
///
/// A whole-`World`/`Topology` clone, rather than tracking individual
/// ledgers (link demand, service→server assignment, …) separately —
/// entity graphs compare byte-identical after restore at the cost of
/// copying more than strictly necessary at this scale (tens to low
/// hundreds of entities per run).
struct Snapshot {
    world: World,
    topology: Topology,
}

/// The main simulation runner.
///
/// `Simulator<P>` holds all simulation state and drives the step loop: a
/// mobility/routing update, one metrics collection, then one policy
/// invocation, per step.
///
/// Create via [`crate::SimulatorBuilder`].
pub struct Simulator<P: Policy> {
    pub world: World,
    pub topology: Topology,
    pub policy: P,
    pub params: PolicyParams,
    pub current_step: Step,
    pub metrics: Vec<StepMetrics>,
    snapshot: Option<Snapshot>,
}

impl<P: Policy> Simulator<P> {
    pub(crate) fn new(world: World, topology: Topology, policy: P, params: PolicyParams) -> Self {
        Self {
            world,
            topology,
            policy,
            params,
            current_step: Step::FIRST,
            metrics: Vec::new(),
            snapshot: None,
        }
    }

    /// Snapshot the full entity graph so [`Self::restore_original_state`]
    /// can undo everything the run is about to do.
    pub fn store_original_state(&mut self) {
        self.snapshot = Some(Snapshot {
            world: self.world.clone(),
            topology: self.topology.clone(),
        });
    }

    /// Restore the entity graph captured by [`Self::store_original_state`].
    pub fn restore_original_state(&mut self) -> SimResult<()> {
        let snapshot = self.snapshot.take().ok_or(SimError::SnapshotMissing)?;
        self.world = snapshot.world;
        self.topology = snapshot.topology;
        Ok(())
    }

    /// Run from `current_step` until `stopping_criterion` returns `true`:
    ///
    /// 1. snapshot original state,
    /// 2. while not stopped: update mobility/routing, collect metrics,
    ///    invoke the policy, advance the step counter,
    /// 3. collect one final metrics snapshot,
    /// 4. restore original state.
    pub fn run<S, O>(&mut self, mut stopping_criterion: S, observer: &mut O) -> SimResult<()>
    where
        S: StoppingCriterion,
        O: SimObserver,
    {
        self.store_original_state();

        while !stopping_criterion.should_stop(&self.world, self.current_step) {
            observer.on_step_start(self.current_step);

            self.update_state(self.current_step)?;

            let step_metrics = metrics::collect(&self.world, &self.topology, self.current_step);
            observer.on_metrics_collected(self.current_step, &step_metrics);
            self.metrics.push(step_metrics);

            self.policy
                .apply(
                    &mut self.world,
                    &mut self.topology,
                    &self.params,
                    self.current_step,
                )
                .map_err(|source| SimError::Policy {
                    step: self.current_step,
                    source,
                })?;

            observer.on_step_end(self.current_step, &self.world);
            self.current_step = self.current_step.offset(1);
        }

        let final_metrics = metrics::collect(&self.world, &self.topology, self.current_step);
        observer.on_metrics_collected(self.current_step, &final_metrics);
        self.metrics.push(final_metrics);
        observer.on_sim_end(self.current_step);

        self.restore_original_state()
    }

    /// Re-bind every user's coordinates/base station to their mobility
    /// trace's entry for `step`, then refresh routing for each of their
    /// applications.
    fn update_state(&mut self, step: Step) -> SimResult<()> {
        let user_ids: Vec<_> = self.world.users.all().iter().map(|u| u.id).collect();

        for user_id in user_ids {
            let Some(user) = self.world.users.find_by_id(user_id) else {
                continue;
            };
            let trace_index = step.0.checked_sub(1).map(|i| i as usize);
            let new_coordinates =
                trace_index.and_then(|i| user.coordinates_trace.get(i).copied());
            let old_base_station = user.base_station;
            let applications = user.applications.clone();

            if let Some(coordinates) = new_coordinates {
                if let Some(u) = self.world.users.find_by_id_mut(user_id) {
                    u.coordinates = coordinates;
                }
                let new_base_station = edgesim_routing::closest_base_station(&self.world, user_id)
                    .map_err(|source| SimError::Routing { step, source })?;

                if new_base_station != old_base_station {
                    if let Some(old) = self.world.base_stations.find_by_id_mut(old_base_station) {
                        old.users.retain(|&id| id != user_id);
                    }
                    if let Some(new) = self.world.base_stations.find_by_id_mut(new_base_station) {
                        new.users.push(user_id);
                    }
                    if let Some(u) = self.world.users.find_by_id_mut(user_id) {
                        u.base_station = new_base_station;
                    }
                }
            }

            for app_id in applications {
                edgesim_routing::set_communication_path(
                    &mut self.world,
                    &mut self.topology,
                    user_id,
                    app_id,
                    None,
                )
                .map_err(|source| SimError::Routing { step, source })?;
            }
        }

        Ok(())
    }
}
