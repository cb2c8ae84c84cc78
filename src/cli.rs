//! CLI argument parsing for splitcheck

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary report (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "splitcheck")]
#[command(version)]
#[command(about = "Simulate and analyze A/B tests for conversion metrics", long_about = None)]
pub struct Cli {
    /// Number of users per group
    #[arg(short = 'n', long = "users", value_name = "N", default_value = "10000")]
    pub users: u64,

    /// True conversion rate of the control group (simulation)
    #[arg(
        long = "control-rate",
        value_name = "P",
        default_value = "0.10",
        conflicts_with = "control_conversions"
    )]
    pub control_rate: f64,

    /// True conversion rate of the treatment group (simulation)
    #[arg(
        long = "treatment-rate",
        value_name = "P",
        default_value = "0.12",
        conflicts_with = "control_conversions"
    )]
    pub treatment_rate: f64,

    /// Seed for the random generator (random if omitted)
    #[arg(
        short = 's',
        long = "seed",
        value_name = "SEED",
        conflicts_with = "control_conversions"
    )]
    pub seed: Option<u64>,

    /// Observed control conversions; analyze these counts instead of simulating
    #[arg(
        long = "control-conversions",
        value_name = "COUNT",
        requires = "treatment_conversions"
    )]
    pub control_conversions: Option<u64>,

    /// Observed treatment conversions (requires --control-conversions)
    #[arg(
        long = "treatment-conversions",
        value_name = "COUNT",
        requires = "control_conversions"
    )]
    pub treatment_conversions: Option<u64>,

    /// Run this many simulated replicates and report power / false-positive rate
    #[arg(
        short = 'r',
        long = "replicates",
        value_name = "COUNT",
        conflicts_with = "control_conversions"
    )]
    pub replicates: Option<u64>,

    /// Worker threads for --replicates
    #[arg(
        long = "threads",
        value_name = "N",
        default_value = "1",
        requires = "replicates"
    )]
    pub threads: usize,

    /// TOML file with significance_level / confidence_level
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Significance level (overrides config file)
    #[arg(long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Confidence level for intervals (overrides config file)
    #[arg(long = "confidence", value_name = "LEVEL")]
    pub confidence: Option<f64>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
