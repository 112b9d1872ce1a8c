//! Simulation time model.
//!
//! Time is a monotonically increasing `Step` counter — there is no
//! continuous-time event queue and no wall-clock mapping. Using an integer
//! step as the canonical time unit keeps schedule arithmetic exact and
//! comparisons O(1).

use std::fmt;

// ── Step ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter, 1-based once the run starts
/// (`currentStep` begins at 1 per the kernel's loop contract).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);
    pub const FIRST: Step = Step(1);

    /// Return the step `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Step {
        Step(self.0 + n)
    }

    /// Steps elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: Step) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl std::ops::Sub for Step {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Step) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}", self.0)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration, typically assembled by the CLI from
/// flags and the loaded scenario.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Total steps to simulate, taken from the scenario's `simulation_steps`.
    pub total_steps: u64,

    /// Master RNG seed, passed through for reproducibility of any
    /// randomized tie-breaking a policy may perform.
    pub seed: u64,

    /// Fraction of a delay SLA that must be exceeded before `proposed_heuristic`
    /// considers a user's delay degraded enough to migrate (`--delay-threshold`).
    pub delay_threshold: f64,

    /// Fraction of a provisioning-time SLA that must be exceeded before a
    /// migration is counted against `U_slow` (`--prov-time-threshold`).
    pub prov_time_threshold: f64,

    /// When `true`, `getMigrationTime` divides by hop count instead of
    /// multiplying by it. Off by default to preserve the source behavior
    /// documented as a probable bug.
    pub corrected_migration_formula: bool,
}

impl SimConfig {
    /// The step at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_step(&self) -> Step {
        Step(self.total_steps)
    }
}
