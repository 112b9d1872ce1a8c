//! `edgesim-kernel` — the simulation kernel: snapshot/restore, the step
//! loop, and per-step metric collection for the edgesim edge-computing
//! simulator.
//!
//! # Step loop
//!
//! ```text
//! store_original_state()
//! while !stopping_criterion(world, step):
//!   ① update_state  — advance each user's position along its mobility
//!                      trace, re-bind base stations, refresh every
//!                      application's communication path and delay.
//!   ② collect       — snapshot edge-server/base-station/user/service/link
//!                      state for this step.
//!   ③ policy.apply  — the one point in the loop allowed to migrate
//!                      services or (de)provision registries.
//!   step += 1
//! collect()          — one final snapshot after the last step
//! restore_original_state()
//! ```
//!
//! # Crate layout
//!
//! | Module      | Contents                                               |
//! |-------------|---------------------------------------------------------|
//! | `sim`       | [`Simulator`], [`StoppingCriterion`], [`StepLimit`].     |
//! | `builder`   | [`SimulatorBuilder`], the fluent constructor.            |
//! | `metrics`   | [`StepMetrics`] and the per-entity-kind snapshots it holds. |
//! | `observer`  | [`SimObserver`], the progress/data-collection hook.      |
//! | `error`     | [`SimError`], wrapping routing/policy failures with the step they occurred at. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use edgesim_kernel::{NoopObserver, SimulatorBuilder, StepLimit};
//! use edgesim_policy::{FollowUser, PolicyParams};
//!
//! let mut sim = SimulatorBuilder::new()
//!     .world(world)
//!     .topology(topology)
//!     .policy(FollowUser { corrected_formula: false })
//!     .params(PolicyParams { delay_threshold: 1.0, prov_time_threshold: 1.0 })
//!     .build();
//! sim.run(StepLimit(100), &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimulatorBuilder;
pub use error::{SimError, SimResult};
pub use metrics::{
    BaseStationMetrics, EdgeServerMetrics, LinkMetrics, RegistryAggregate, ServiceMetrics,
    StepMetrics, UserMetrics,
};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Simulator, StepLimit, StoppingCriterion};
