//! Batch replication of simulated experiments
//!
//! Runs many independent simulate→analyze replicates to estimate how often a
//! design reaches significance: empirical power when the true rates differ,
//! empirical false-positive rate when they are equal.
//!
//! Replicate `i` always uses `StdRng::seed_from_u64(seed + i)`, so the summary
//! does not depend on how many worker threads ran the batch. Workers pull
//! replicate indices from a shared lock-free queue and push results into a
//! second one; results are ordered by index before aggregation.

use crate::analysis::{analyze_with_config, AnalysisResult, ExperimentConfig, Recommendation};
use crate::error::{ExperimentError, Result};
use crate::simulation::{simulate_seeded, validate_inputs};
use crossbeam::queue::ArrayQueue;
use serde::{Deserialize, Serialize};

/// Parameters of a replication batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplicationPlan {
    pub n_users: u64,
    pub cr_control: f64,
    pub cr_treatment: f64,
    pub replicates: u64,
    pub seed: u64,
    pub threads: usize,
}

/// Aggregate outcome of a replication batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationSummary {
    pub replicates: u64,

    /// Replicates with `p_value < significance_level`
    pub significant: u64,

    /// `significant / replicates`
    pub rejection_rate: f64,

    /// Mean p-value, accumulated in single precision (f32)
    pub mean_p_value: f64,

    /// Mean lift over replicates where lift is defined, accumulated in
    /// single precision (f32)
    pub mean_lift: Option<f64>,

    pub rollout_positive: u64,
    pub rollout_negative: u64,
    pub inconclusive: u64,

    pub significance_level: f64,
}

impl ReplicationSummary {
    fn from_results(results: &[AnalysisResult], significance_level: f64) -> Self {
        let replicates = results.len() as u64;

        let mut significant = 0;
        let mut rollout_positive = 0;
        let mut rollout_negative = 0;
        let mut inconclusive = 0;
        for result in results {
            if result.is_significant() {
                significant += 1;
            }
            match result.recommendation() {
                Recommendation::RolloutPositive => rollout_positive += 1,
                Recommendation::RolloutNegative => rollout_negative += 1,
                Recommendation::Inconclusive => inconclusive += 1,
            }
        }

        let p_values: Vec<f32> = results.iter().map(|r| r.p_value as f32).collect();
        let lifts: Vec<f32> = results
            .iter()
            .filter_map(|r| r.lift)
            .map(|l| l as f32)
            .collect();

        let mean_p_value = trueno::Vector::from_slice(&p_values)
            .mean()
            .unwrap_or(0.0) as f64;
        let mean_lift = if lifts.is_empty() {
            None
        } else {
            trueno::Vector::from_slice(&lifts)
                .mean()
                .ok()
                .map(|m| m as f64)
        };

        Self {
            replicates,
            significant,
            rejection_rate: if replicates == 0 {
                0.0
            } else {
                significant as f64 / replicates as f64
            },
            mean_p_value,
            mean_lift,
            rollout_positive,
            rollout_negative,
            inconclusive,
            significance_level,
        }
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        report.push_str("=== Replication Summary ===\n");
        report.push_str(&format!("Replicates: {}\n", self.replicates));
        report.push_str(&format!(
            "Significant (p < {}): {} ({:.2}%)\n",
            self.significance_level,
            self.significant,
            self.rejection_rate * 100.0
        ));
        report.push_str(&format!("Mean p-value: {:.4}\n", self.mean_p_value));
        match self.mean_lift {
            Some(lift) => report.push_str(&format!("Mean lift: {:.2}%\n", lift * 100.0)),
            None => report.push_str("Mean lift: undefined\n"),
        }
        report.push_str(&format!(
            "Recommendations: {} roll out, {} do not roll out, {} hold\n",
            self.rollout_positive, self.rollout_negative, self.inconclusive
        ));
        report
    }
}

/// Run a batch of independent replicates
///
/// # Example
/// ```
/// use splitcheck::analysis::ExperimentConfig;
/// use splitcheck::replication::{replicate, ReplicationPlan};
///
/// let plan = ReplicationPlan {
///     n_users: 1000,
///     cr_control: 0.10,
///     cr_treatment: 0.10,
///     replicates: 20,
///     seed: 1,
///     threads: 2,
/// };
/// let summary = replicate(&plan, &ExperimentConfig::default()).unwrap();
/// assert_eq!(summary.replicates, 20);
/// ```
pub fn replicate(plan: &ReplicationPlan, config: &ExperimentConfig) -> Result<ReplicationSummary> {
    config.validate()?;
    if plan.replicates == 0 {
        return Err(ExperimentError::invalid("replicates must be >= 1, got 0"));
    }
    if plan.threads == 0 {
        return Err(ExperimentError::invalid("threads must be >= 1, got 0"));
    }
    let capacity = usize::try_from(plan.replicates).map_err(|_| {
        ExperimentError::invalid(format!("replicates too large: {}", plan.replicates))
    })?;

    validate_inputs(plan.n_users, plan.cr_control, plan.cr_treatment)?;

    let pending = ArrayQueue::new(capacity);
    for index in 0..plan.replicates {
        // Capacity equals the replicate count
        let _ = pending.push(index);
    }
    let finished: ArrayQueue<(u64, Result<AnalysisResult>)> = ArrayQueue::new(capacity);
    let workers = plan.threads.min(capacity);

    tracing::info!(
        replicates = plan.replicates,
        workers,
        n_users = plan.n_users,
        "starting replication batch"
    );

    let scope_result = crossbeam::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|_| {
                while let Some(index) = pending.pop() {
                    let outcome = simulate_seeded(
                        plan.n_users,
                        plan.cr_control,
                        plan.cr_treatment,
                        plan.seed.wrapping_add(index),
                    )
                    .and_then(|outcomes| analyze_with_config(&outcomes, plan.n_users, config));
                    let _ = finished.push((index, outcome));
                }
            });
        }
    });
    if let Err(panic) = scope_result {
        std::panic::resume_unwind(panic);
    }

    let mut ordered: Vec<(u64, Result<AnalysisResult>)> =
        std::iter::from_fn(|| finished.pop()).collect();
    ordered.sort_by_key(|(index, _)| *index);

    let results = ordered
        .into_iter()
        .map(|(_, outcome)| outcome)
        .collect::<Result<Vec<_>>>()?;

    let summary = ReplicationSummary::from_results(&results, config.significance_level);
    tracing::info!(
        rejection_rate = summary.rejection_rate,
        mean_p_value = summary.mean_p_value,
        "replication batch complete"
    );
    Ok(summary)
}
