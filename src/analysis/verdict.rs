// Experiment analysis and rollout recommendation
//
// This module integrates:
// - Per-group aggregation (one pass over the outcome set)
// - The pooled two-proportion z-test
// - Wald confidence intervals per group
//
// to produce an immutable result record and a rollout recommendation.

use crate::analysis::config::ExperimentConfig;
use crate::analysis::statistics::{proportion_confint, two_proportion_ztest, ConfidenceInterval};
use crate::analysis::summary::GroupSummaries;
use crate::error::{ExperimentError, Result};
use crate::simulation::TrialOutcomeSet;
use serde::{Deserialize, Serialize};

/// Rollout decision derived from an analysis result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    /// Statistically significant improvement
    RolloutPositive,

    /// Statistically significant decline (or significant with zero lift)
    RolloutNegative,

    /// No statistically significant difference
    Inconclusive,
}

impl Recommendation {
    /// Derive a recommendation from a p-value and the direction of the effect
    ///
    /// `direction` is the lift, or any quantity with the same sign.
    pub fn derive(p_value: f64, direction: f64, significance_level: f64) -> Self {
        if p_value < significance_level {
            if direction > 0.0 {
                Recommendation::RolloutPositive
            } else {
                Recommendation::RolloutNegative
            }
        } else {
            Recommendation::Inconclusive
        }
    }

    /// Short action string for reports
    pub fn action(&self) -> &'static str {
        match self {
            Recommendation::RolloutPositive => "Roll out new feature",
            Recommendation::RolloutNegative => "Do NOT roll out",
            Recommendation::Inconclusive => "Hold / Retest",
        }
    }

    /// One-line explanation of the decision
    pub fn explanation(&self) -> &'static str {
        match self {
            Recommendation::RolloutPositive => "Statistically significant improvement.",
            Recommendation::RolloutNegative => "Statistically significant decline.",
            Recommendation::Inconclusive => {
                "No statistically significant difference. Keep testing."
            }
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.action())
    }
}

/// Outcome of analyzing one experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Users per group
    pub n_users: u64,

    pub success_control: u64,
    pub success_treatment: u64,

    pub control_rate: f64,
    pub treatment_rate: f64,

    /// Relative change `(treatment - control) / control`
    ///
    /// `None` when the control rate is zero; see [`AnalysisResult::lift`].
    pub lift: Option<f64>,

    /// z statistic, positive when treatment converts better
    pub z_statistic: f64,

    /// Two-sided p-value of the pooled z-test
    pub p_value: f64,

    pub confidence_interval_control: ConfidenceInterval,
    pub confidence_interval_treatment: ConfidenceInterval,

    /// Coverage the intervals were computed at
    pub confidence_level: f64,

    /// Alpha used when deriving the recommendation
    pub significance_level: f64,
}

impl AnalysisResult {
    /// Lift, or `DivisionUndefined` when the control rate is zero
    pub fn lift(&self) -> Result<f64> {
        self.lift.ok_or(ExperimentError::DivisionUndefined)
    }

    /// Absolute difference `treatment_rate - control_rate`
    pub fn rate_difference(&self) -> f64 {
        self.treatment_rate - self.control_rate
    }

    pub fn is_significant(&self) -> bool {
        self.p_value < self.significance_level
    }

    /// Recommendation at the configured significance level
    ///
    /// An undefined lift takes the sign of the rate difference, which matches
    /// the sign of lift whenever lift is defined.
    pub fn recommendation(&self) -> Recommendation {
        let direction = self.lift.unwrap_or_else(|| self.rate_difference());
        Recommendation::derive(self.p_value, direction, self.significance_level)
    }
}

/// Analyze an outcome set with the default configuration
///
/// # Example
/// ```
/// use splitcheck::analysis::{analyze, Recommendation};
/// use splitcheck::simulation::simulate_seeded;
///
/// let outcomes = simulate_seeded(10_000, 0.10, 0.10, 42).unwrap();
/// let result = analyze(&outcomes, 10_000).unwrap();
/// assert!(result.control_rate > 0.0);
/// let _decision: Recommendation = result.recommendation();
/// ```
pub fn analyze(outcomes: &TrialOutcomeSet, n_users: u64) -> Result<AnalysisResult> {
    analyze_with_config(outcomes, n_users, &ExperimentConfig::default())
}

/// Analyze an outcome set
///
/// Fails with `InvalidInput` when `n_users` is zero or disagrees with the
/// group sizes of `outcomes`.
pub fn analyze_with_config(
    outcomes: &TrialOutcomeSet,
    n_users: u64,
    config: &ExperimentConfig,
) -> Result<AnalysisResult> {
    let summaries = GroupSummaries::from_outcomes(outcomes);

    for summary in [&summaries.control, &summaries.treatment] {
        if summary.users != n_users {
            return Err(ExperimentError::invalid(format!(
                "outcome set has {} users in a group, expected n_users={}",
                summary.users, n_users
            )));
        }
    }

    analyze_counts_with_config(
        summaries.control.conversions,
        summaries.treatment.conversions,
        n_users,
        config,
    )
}

/// Analyze aggregate conversion counts with the default configuration
pub fn analyze_counts(
    success_control: u64,
    success_treatment: u64,
    n_users: u64,
) -> Result<AnalysisResult> {
    analyze_counts_with_config(
        success_control,
        success_treatment,
        n_users,
        &ExperimentConfig::default(),
    )
}

/// Analyze aggregate conversion counts
pub fn analyze_counts_with_config(
    success_control: u64,
    success_treatment: u64,
    n_users: u64,
    config: &ExperimentConfig,
) -> Result<AnalysisResult> {
    config.validate()?;

    let test = two_proportion_ztest(success_control, success_treatment, n_users)?;
    let confidence_interval_control =
        proportion_confint(success_control, n_users, config.confidence_level)?;
    let confidence_interval_treatment =
        proportion_confint(success_treatment, n_users, config.confidence_level)?;

    let n = n_users as f64;
    let control_rate = success_control as f64 / n;
    let treatment_rate = success_treatment as f64 / n;
    let lift = if control_rate == 0.0 {
        tracing::debug!("control rate is zero, lift undefined");
        None
    } else {
        Some((treatment_rate - control_rate) / control_rate)
    };

    let result = AnalysisResult {
        n_users,
        success_control,
        success_treatment,
        control_rate,
        treatment_rate,
        lift,
        z_statistic: test.statistic,
        p_value: test.p_value,
        confidence_interval_control,
        confidence_interval_treatment,
        confidence_level: config.confidence_level,
        significance_level: config.significance_level,
    };

    tracing::info!(
        n_users,
        control_rate,
        treatment_rate,
        p_value = result.p_value,
        recommendation = ?result.recommendation(),
        "analyzed experiment"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_positive() {
        assert_eq!(
            Recommendation::derive(0.01, 0.2, 0.05),
            Recommendation::RolloutPositive
        );
    }

    #[test]
    fn test_derive_negative() {
        assert_eq!(
            Recommendation::derive(0.01, -0.2, 0.05),
            Recommendation::RolloutNegative
        );
        // Zero lift with a significant p-value counts as negative
        assert_eq!(
            Recommendation::derive(0.01, 0.0, 0.05),
            Recommendation::RolloutNegative
        );
    }

    #[test]
    fn test_derive_inconclusive_at_threshold() {
        assert_eq!(
            Recommendation::derive(0.05, 0.5, 0.05),
            Recommendation::Inconclusive
        );
        assert_eq!(
            Recommendation::derive(0.8, -0.5, 0.05),
            Recommendation::Inconclusive
        );
    }

    #[test]
    fn test_action_strings() {
        assert_eq!(
            Recommendation::RolloutPositive.to_string(),
            "Roll out new feature"
        );
        assert_eq!(Recommendation::RolloutNegative.action(), "Do NOT roll out");
        assert_eq!(Recommendation::Inconclusive.action(), "Hold / Retest");
    }

    #[test]
    fn test_lift_accessor_undefined() {
        let result = analyze_counts(0, 5, 100).unwrap();
        assert_eq!(result.lift, None);
        assert_eq!(result.lift(), Err(ExperimentError::DivisionUndefined));
    }

    #[test]
    fn test_undefined_lift_uses_rate_difference() {
        // 0/1000 vs 40/1000 is significant and treatment is better
        let result = analyze_counts(0, 40, 1000).unwrap();
        assert!(result.lift.is_none());
        assert!(result.is_significant());
        assert_eq!(result.recommendation(), Recommendation::RolloutPositive);
    }

    #[test]
    fn test_config_carried_into_result() {
        let config = ExperimentConfig::strict();
        let result = analyze_counts_with_config(100, 120, 1000, &config).unwrap();
        assert_eq!(result.confidence_level, 0.99);
        assert_eq!(result.significance_level, 0.01);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExperimentConfig {
            significance_level: 2.0,
            confidence_level: 0.95,
        };
        assert!(analyze_counts_with_config(1, 1, 10, &config).is_err());
    }
}
