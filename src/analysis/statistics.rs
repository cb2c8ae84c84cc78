// Two-proportion hypothesis testing and normal-approximation intervals
//
// - Pooled-variance z-test, two-sided: under H0 both groups share one
//   conversion probability, estimated from the pooled counts
// - Wald interval per group: rate ± z_{1-(1-level)/2} * sqrt(rate(1-rate)/n)
// - Uses statrs' standard normal for the survival function and quantiles

use crate::error::{ExperimentError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Result of a two-proportion z-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZTest {
    /// z statistic, positive when treatment converts better than control
    pub statistic: f64,

    /// Two-sided p-value
    pub p_value: f64,
}

/// Lower and upper bound of a confidence interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| ExperimentError::invalid(e.to_string()))
}

fn check_counts(successes: u64, nobs: u64, label: &str) -> Result<()> {
    if nobs == 0 {
        return Err(ExperimentError::invalid("n_users must be >= 1, got 0"));
    }
    if successes > nobs {
        return Err(ExperimentError::invalid(format!(
            "{} conversions ({}) exceed group size ({})",
            label, successes, nobs
        )));
    }
    Ok(())
}

/// Pooled two-proportion z-test with equal group sizes
///
/// When the pooled proportion is 0 or 1 both groups are identical (all users
/// converted, or none did), the standard error is zero, and the test reports
/// `statistic = 0` and `p_value = 1`.
///
/// # Example
/// ```
/// use splitcheck::analysis::two_proportion_ztest;
///
/// let test = two_proportion_ztest(1000, 1200, 10_000).unwrap();
/// assert!(test.statistic > 0.0);
/// assert!(test.p_value < 0.001);
/// ```
pub fn two_proportion_ztest(
    success_control: u64,
    success_treatment: u64,
    n_users: u64,
) -> Result<ZTest> {
    check_counts(success_control, n_users, "control")?;
    check_counts(success_treatment, n_users, "treatment")?;

    let n = n_users as f64;
    let control_rate = success_control as f64 / n;
    let treatment_rate = success_treatment as f64 / n;
    // Summed in f64: both counts may be close to u64::MAX
    let pooled = (success_control as f64 + success_treatment as f64) / (2.0 * n);

    let std_error = (pooled * (1.0 - pooled) * (2.0 / n)).sqrt();
    if std_error == 0.0 {
        return Ok(ZTest {
            statistic: 0.0,
            p_value: 1.0,
        });
    }

    let statistic = (treatment_rate - control_rate) / std_error;
    let p_value = (2.0 * standard_normal()?.sf(statistic.abs())).min(1.0);

    Ok(ZTest { statistic, p_value })
}

/// Two-sided critical value of the standard normal at `confidence_level`
///
/// 0.95 gives ~1.959964.
pub fn critical_value(confidence_level: f64) -> Result<f64> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(ExperimentError::invalid(format!(
            "confidence_level must be in (0, 1), got {}",
            confidence_level
        )));
    }
    let tail = (1.0 - confidence_level) / 2.0;
    Ok(standard_normal()?.inverse_cdf(1.0 - tail))
}

/// Normal-approximation (Wald) interval for one proportion, clipped to [0, 1]
pub fn proportion_confint(
    successes: u64,
    nobs: u64,
    confidence_level: f64,
) -> Result<ConfidenceInterval> {
    check_counts(successes, nobs, "group")?;

    let z = critical_value(confidence_level)?;
    let n = nobs as f64;
    let rate = successes as f64 / n;
    let margin = z * (rate * (1.0 - rate) / n).sqrt();

    Ok(ConfidenceInterval {
        lower: (rate - margin).clamp(0.0, 1.0),
        upper: (rate + margin).clamp(0.0, 1.0),
    })
}
