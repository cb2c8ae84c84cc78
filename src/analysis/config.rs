// Configuration for experiment analysis
//
// Controls the decision threshold of the z-test and the coverage of the
// per-group confidence intervals. Loadable from a TOML file so a team can pin
// its thresholds next to the experiment definition.

use crate::error::{ExperimentError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for two-proportion experiment analysis
///
/// # Example
/// ```
/// use splitcheck::analysis::ExperimentConfig;
///
/// let config = ExperimentConfig::default();
/// assert_eq!(config.significance_level, 0.05); // 95% confidence
/// assert_eq!(config.confidence_level, 0.95);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Significance level (alpha) for the two-sided z-test
    ///
    /// - 0.05 (default): a difference is called significant when p < 0.05
    /// - 0.01: stricter, fewer false rollouts, more inconclusive results
    /// - 0.10: looser, detects smaller effects at a higher false-positive rate
    pub significance_level: f64,

    /// Coverage of the normal-approximation confidence intervals
    ///
    /// Default: 0.95, giving `rate ± 1.96 * se`
    pub confidence_level: f64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            confidence_level: 0.95,
        }
    }
}

impl ExperimentConfig {
    /// Strict configuration (99% confidence)
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01,
            confidence_level: 0.99,
        }
    }

    /// Permissive configuration (90% confidence)
    pub fn permissive() -> Self {
        Self {
            significance_level: 0.10,
            confidence_level: 0.90,
        }
    }

    /// Load a configuration from a TOML file
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// ```toml
    /// significance_level = 0.01
    /// confidence_level = 0.99
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid experiment config in {}", path.display()))
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(ExperimentError::invalid(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            )));
        }

        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ExperimentError::invalid(format!(
                "confidence_level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }

        Ok(())
    }
}
