//! Text and JSON rendering of analysis results
//!
//! Rates and p-values are shown to 4 decimals, lift as a percentage to 2.

use crate::analysis::{AnalysisResult, ConfidenceInterval, Recommendation};
use crate::replication::ReplicationSummary;
use serde::{Deserialize, Serialize};

fn format_interval(ci: &ConfidenceInterval) -> String {
    format!("[{:.4}, {:.4}]", ci.lower, ci.upper)
}

/// Lift as a signed percentage, or "undefined" when control never converted
pub fn format_lift(lift: Option<f64>) -> String {
    match lift {
        Some(lift) => format!("{:.2}%", lift * 100.0),
        None => "undefined (control rate is 0)".to_string(),
    }
}

/// Render the summary report for one experiment
pub fn render_text(result: &AnalysisResult) -> String {
    let recommendation = result.recommendation();
    let confidence_pct = (result.confidence_level * 1000.0).round() / 10.0;

    let mut report = String::new();
    report.push_str("=== A/B Test Summary Report ===\n");
    report.push_str(&format!("Users per group: {}\n", result.n_users));
    report.push_str(&format!(
        "Control Conversion Rate: {:.4} ({} conversions)\n",
        result.control_rate, result.success_control
    ));
    report.push_str(&format!(
        "Treatment Conversion Rate: {:.4} ({} conversions)\n",
        result.treatment_rate, result.success_treatment
    ));
    report.push_str(&format!("Lift: {}\n", format_lift(result.lift)));
    report.push_str(&format!("z-statistic: {:.4}\n", result.z_statistic));
    report.push_str(&format!("p-value: {:.4}\n", result.p_value));
    report.push_str(&format!(
        "{}% Confidence Intervals: control {}, treatment {}\n",
        confidence_pct,
        format_interval(&result.confidence_interval_control),
        format_interval(&result.confidence_interval_treatment)
    ));
    report.push('\n');
    report.push_str(&format!("{}\n", recommendation.explanation()));
    report.push_str(&format!("Recommendation: {}\n", recommendation.action()));
    report
}

/// JSON document emitted by `--format json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub result: AnalysisResult,
    pub recommendation: Recommendation,
    pub recommendation_text: String,
}

impl JsonReport {
    pub fn new(result: &AnalysisResult) -> Self {
        let recommendation = result.recommendation();
        Self {
            result: result.clone(),
            recommendation,
            recommendation_text: recommendation.action().to_string(),
        }
    }
}

/// Render one experiment as pretty-printed JSON
pub fn render_json(result: &AnalysisResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::new(result))
}

/// Render a replication batch as pretty-printed JSON
pub fn render_replication_json(summary: &ReplicationSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_counts;

    #[test]
    fn test_text_report_fields() {
        let result = analyze_counts(1000, 1200, 10_000).unwrap();
        let report = render_text(&result);

        assert!(report.contains("A/B Test Summary Report"));
        assert!(report.contains("Control Conversion Rate: 0.1000"));
        assert!(report.contains("Treatment Conversion Rate: 0.1200"));
        assert!(report.contains("Lift: 20.00%"));
        assert!(report.contains("p-value: 0.0000"));
        assert!(report.contains("95% Confidence Intervals"));
        assert!(report.contains("Recommendation: Roll out new feature"));
    }

    #[test]
    fn test_text_report_undefined_lift() {
        let result = analyze_counts(0, 0, 100).unwrap();
        let report = render_text(&result);
        assert!(report.contains("Lift: undefined"));
        assert!(report.contains("Recommendation: Hold / Retest"));
    }

    #[test]
    fn test_text_report_decline() {
        let result = analyze_counts(1000, 800, 10_000).unwrap();
        let report = render_text(&result);
        assert!(report.contains("Lift: -20.00%"));
        assert!(report.contains("Recommendation: Do NOT roll out"));
    }

    #[test]
    fn test_json_report_round_trip_fields() {
        let result = analyze_counts(1000, 1200, 10_000).unwrap();
        let json = render_json(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["recommendation"], "RolloutPositive");
        assert_eq!(value["recommendation_text"], "Roll out new feature");
        assert_eq!(value["result"]["success_control"], 1000);
        assert!(value["result"]["confidence_interval_control"]["lower"].is_number());
    }

    #[test]
    fn test_json_undefined_lift_is_null() {
        let result = analyze_counts(0, 3, 100).unwrap();
        let json = render_json(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["result"]["lift"].is_null());
    }
}
