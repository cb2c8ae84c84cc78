// Statistical analysis of two-group conversion experiments
//
// Pipeline: aggregate outcomes per group, run a pooled two-proportion z-test,
// compute Wald intervals per group, and derive a rollout recommendation.
//
// Scope: two independent groups of equal size, Bernoulli outcomes, a
// two-sided test. No sequential testing or multiple-comparison correction.

mod config;
mod statistics;
mod summary;
mod verdict;

pub use config::ExperimentConfig;
pub use statistics::{
    critical_value, proportion_confint, two_proportion_ztest, ConfidenceInterval, ZTest,
};
pub use summary::{GroupSummaries, GroupSummary};
pub use verdict::{
    analyze, analyze_counts, analyze_counts_with_config, analyze_with_config, AnalysisResult,
    Recommendation,
};
