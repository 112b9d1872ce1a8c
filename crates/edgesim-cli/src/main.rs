//! `edgesim` — command-line runner for the edgesim simulator.
//!
//! ```text
//! edgesim --seed 42 --dataset campus --algorithm follow_user \
//!     --delay-threshold 0.9 --prov-time-threshold 0.9
//! ```
//!
//! Loads `datasets/<name>.json`, runs the requested policy for the
//! scenario's full step count, and prints a results summary followed by a
//! tab-separated CSV line. Exits non-zero on a malformed dataset or an
//! unresolved entity reference.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use edgesim_io::AlgorithmReport;
use edgesim_kernel::{NoopObserver, SimulatorBuilder, StepLimit};
use edgesim_policy::{FollowUser, NeverFollow, Policy, PolicyParams, PolicyResult, ProposedHeuristic};

/// Run one edgesim migration/placement policy against a scenario dataset.
#[derive(Parser, Debug)]
#[command(name = "edgesim", version, about)]
struct Args {
    /// RNG seed recorded alongside the run's results; the shipped policies
    /// are deterministic and do not currently consume it.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Scenario name; resolved to `datasets/<name>.json`.
    #[arg(long)]
    dataset: String,

    /// One of `never_follow`, `follow_user`, `proposed_heuristic`.
    #[arg(long)]
    algorithm: String,

    /// Fraction of a user's delay SLA that must be exceeded before
    /// `proposed_heuristic` attempts a migration.
    #[arg(long, default_value_t = 1.0)]
    delay_threshold: f64,

    /// Fraction of a user's provisioning-time SLA used to judge whether a
    /// migration was fast enough.
    #[arg(long, default_value_t = 1.0)]
    prov_time_threshold: f64,

    /// Gate the corrected (divide-by-hop-count) migration-time formula
    /// instead of the source-faithful multiply-by-hop-count one.
    #[arg(long, default_value_t = false)]
    corrected_migration_formula: bool,
}

/// The three shipped policies, picked at runtime from `--algorithm`.
enum SelectedPolicy {
    NeverFollow(NeverFollow),
    FollowUser(FollowUser),
    ProposedHeuristic(ProposedHeuristic),
}

impl SelectedPolicy {
    fn from_name(name: &str, corrected_formula: bool) -> Result<Self> {
        match name {
            "never_follow" => Ok(Self::NeverFollow(NeverFollow)),
            "follow_user" => Ok(Self::FollowUser(FollowUser { corrected_formula })),
            "proposed_heuristic" => {
                Ok(Self::ProposedHeuristic(ProposedHeuristic { corrected_formula }))
            }
            other => anyhow::bail!(
                "unknown algorithm \"{other}\" (expected never_follow, follow_user, or proposed_heuristic)"
            ),
        }
    }
}

impl Policy for SelectedPolicy {
    fn name(&self) -> &'static str {
        match self {
            Self::NeverFollow(p) => p.name(),
            Self::FollowUser(p) => p.name(),
            Self::ProposedHeuristic(p) => p.name(),
        }
    }

    fn apply(
        &self,
        world: &mut edgesim_entities::World,
        topology: &mut edgesim_topology::Topology,
        params: &PolicyParams,
        step: edgesim_core::Step,
    ) -> PolicyResult<()> {
        match self {
            Self::NeverFollow(p) => p.apply(world, topology, params, step),
            Self::FollowUser(p) => p.apply(world, topology, params, step),
            Self::ProposedHeuristic(p) => p.apply(world, topology, params, step),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let dataset_path = PathBuf::from("datasets").join(format!("{}.json", args.dataset));
    let (world, topology, config) = edgesim_io::load(&dataset_path)
        .with_context(|| format!("loading dataset {}", dataset_path.display()))?;

    let policy = SelectedPolicy::from_name(&args.algorithm, args.corrected_migration_formula)?;
    let params = PolicyParams {
        delay_threshold: args.delay_threshold,
        prov_time_threshold: args.prov_time_threshold,
    };

    log::info!(
        "running {} for {} steps (seed {})",
        policy.name(),
        config.total_steps,
        args.seed
    );

    let mut sim = SimulatorBuilder::new()
        .world(world)
        .topology(topology)
        .policy(policy)
        .params(params)
        .build();

    let t0 = Instant::now();
    sim.run(StepLimit(config.total_steps), &mut NoopObserver)
        .with_context(|| format!("running {}", args.algorithm))?;
    let elapsed = t0.elapsed();

    let report = AlgorithmReport::build(&args.algorithm, &sim.metrics, &sim.world);
    println!("{report}");
    println!("{}", report.to_csv_line()?);
    log::info!("completed in {:.3}s", elapsed.as_secs_f64());

    Ok(())
}
