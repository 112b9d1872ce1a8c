//! Builds the printed/CSV results summary for one algorithm's run.

use std::fmt;

use edgesim_entities::World;
use edgesim_kernel::StepMetrics;

use crate::error::IoResult;
use crate::row::RegistryStepRow;

/// Aggregate duration statistics over every migration recorded during a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationStats {
    pub count: usize,
    pub sum: f64,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

impl MigrationStats {
    fn from_durations(durations: &[f64]) -> Self {
        if durations.is_empty() {
            return Self::default();
        }
        let count = durations.len();
        let sum: f64 = durations.iter().sum();
        let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
        let max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            count,
            sum,
            avg: sum / count as f64,
            min,
            max,
        }
    }
}

/// Everything printed for one algorithm's run.
pub struct AlgorithmReport {
    pub algorithm: String,
    pub step_count: u64,
    pub overloaded_server_count: usize,
    pub delay_sla_violations: usize,
    pub provisioning_sla_violations: usize,
    pub migrations: MigrationStats,
    /// Mean `demand / capacity` across edge servers at the final step.
    pub edge_server_occupation_rate: f64,
    /// `1 - (servers hosting >=1 service / total servers)` at the final
    /// step — higher means services are packed onto fewer servers.
    pub consolidation_rate: f64,
    pub aggregate_power: f64,
    pub registry_steps: Vec<RegistryStepRow>,
}

impl AlgorithmReport {
    /// Summarize `metrics` (one entry per step, as collected by
    /// [`edgesim_kernel::Simulator::run`]) against `world`'s post-run state,
    /// under `algorithm`'s name.
    pub fn build(algorithm: &str, metrics: &[StepMetrics], world: &World) -> Self {
        let step_count = metrics.last().map(|m| m.step.0).unwrap_or(0);

        let overloaded_server_count = metrics
            .iter()
            .map(StepMetrics::overloaded_server_count)
            .max()
            .unwrap_or(0);

        let mut delay_sla_violations = 0usize;
        for step_metrics in metrics {
            for user_metrics in &step_metrics.users {
                let Some(user) = world.users.find_by_id(user_metrics.id) else {
                    continue;
                };
                for (app_id, &delay) in &user_metrics.delays {
                    let sla = user.delay_slas.get(app_id).copied().unwrap_or(f64::MAX);
                    if delay > sla {
                        delay_sla_violations += 1;
                    }
                }
            }
        }

        let mut provisioning_sla_violations = 0usize;
        let mut all_durations = Vec::new();
        for step_metrics in metrics {
            for service_metrics in &step_metrics.services {
                let Some(service) = world.services.find_by_id(service_metrics.id) else {
                    continue;
                };
                let Some(application) = world.applications.find_by_id(service.application) else {
                    continue;
                };
                for migration in &service_metrics.migrations_last_step {
                    all_durations.push(migration.duration);
                    let breached = application.users.iter().any(|user_id| {
                        world
                            .users
                            .find_by_id(*user_id)
                            .and_then(|u| u.provisioning_time_slas.get(&service.application))
                            .is_some_and(|&sla| migration.duration > sla)
                    });
                    if breached {
                        provisioning_sla_violations += 1;
                    }
                }
            }
        }
        let migrations = MigrationStats::from_durations(&all_durations);

        let (edge_server_occupation_rate, consolidation_rate) = metrics
            .last()
            .map(|last| {
                let total = last.edge_servers.len().max(1) as f64;
                let occupation: f64 = last
                    .edge_servers
                    .iter()
                    .map(|s| {
                        if s.capacity == 0 {
                            0.0
                        } else {
                            s.demand as f64 / s.capacity as f64
                        }
                    })
                    .sum::<f64>()
                    / total;
                let active = last
                    .edge_servers
                    .iter()
                    .filter(|s| s.service_count > 0)
                    .count() as f64;
                (occupation, 1.0 - active / total)
            })
            .unwrap_or((0.0, 0.0));

        let aggregate_power = metrics.last().map(StepMetrics::total_power).unwrap_or(0.0);

        let registry_steps = metrics
            .iter()
            .map(|m| RegistryStepRow {
                step: m.step,
                count: m.registries.count,
                total_demand: m.registries.total_demand,
                image_count: m.registries.image_count,
            })
            .collect();

        Self {
            algorithm: algorithm.to_string(),
            step_count,
            overloaded_server_count,
            delay_sla_violations,
            provisioning_sla_violations,
            migrations,
            edge_server_occupation_rate,
            consolidation_rate,
            aggregate_power,
            registry_steps,
        }
    }

    /// One tab-separated summary line, in the field order printed by
    /// [`fmt::Display`]'s header.
    pub fn to_csv_line(&self) -> IoResult<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record([
            self.algorithm.as_str(),
            &self.step_count.to_string(),
            &self.overloaded_server_count.to_string(),
            &self.delay_sla_violations.to_string(),
            &self.provisioning_sla_violations.to_string(),
            &self.migrations.count.to_string(),
            &self.migrations.sum.to_string(),
            &self.migrations.avg.to_string(),
            &self.migrations.min.to_string(),
            &self.migrations.max.to_string(),
            &self.edge_server_occupation_rate.to_string(),
            &self.consolidation_rate.to_string(),
            &self.aggregate_power.to_string(),
        ])?;
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
    }
}

impl fmt::Display for AlgorithmReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "algorithm: {}", self.algorithm)?;
        writeln!(f, "steps: {}", self.step_count)?;
        writeln!(f, "overloaded servers (peak): {}", self.overloaded_server_count)?;
        writeln!(f, "delay SLA violations: {}", self.delay_sla_violations)?;
        writeln!(
            f,
            "provisioning-time SLA violations: {}",
            self.provisioning_sla_violations
        )?;
        writeln!(
            f,
            "migrations: count={} sum={:.3} avg={:.3} min={:.3} max={:.3}",
            self.migrations.count,
            self.migrations.sum,
            self.migrations.avg,
            self.migrations.min,
            self.migrations.max
        )?;
        writeln!(
            f,
            "edge server occupation rate: {:.3}",
            self.edge_server_occupation_rate
        )?;
        writeln!(f, "consolidation rate: {:.3}", self.consolidation_rate)?;
        writeln!(f, "aggregate power: {:.3}", self.aggregate_power)?;
        writeln!(f, "registries per step:")?;
        for row in &self.registry_steps {
            writeln!(
                f,
                "  step {}: count={} demand={} images={}",
                row.step, row.count, row.total_demand, row.image_count
            )?;
        }
        Ok(())
    }
}
