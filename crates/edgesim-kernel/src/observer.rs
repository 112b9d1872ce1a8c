//! Simulation observer trait for progress reporting and data collection.

use edgesim_core::Step;
use edgesim_entities::World;

use crate::metrics::StepMetrics;

/// Callbacks invoked by [`Simulator::run`][crate::Simulator::run] at key
/// points in the step loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SimObserver {
    /// Called at the very start of each step, before mobility is updated.
    fn on_step_start(&mut self, _step: Step) {}

    /// Called once this step's metrics have been collected, after mobility
    /// and routing are refreshed but before the policy runs.
    fn on_metrics_collected(&mut self, _step: Step, _metrics: &StepMetrics) {}

    /// Called at the end of each step, after the policy has run.
    fn on_step_end(&mut self, _step: Step, _world: &World) {}

    /// Called once after the final step completes, before the snapshot is
    /// restored.
    fn on_sim_end(&mut self, _final_step: Step) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
