use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use splitcheck::analysis::{self, AnalysisResult, ExperimentConfig};
use splitcheck::cli::{Cli, OutputFormat};
use splitcheck::replication::{self, ReplicationPlan};
use splitcheck::{report, simulation};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Resolve the analysis configuration: file first, then flag overrides
fn load_config(args: &Cli) -> Result<ExperimentConfig> {
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::from_file(path)?,
        None => ExperimentConfig::default(),
    };
    if let Some(alpha) = args.alpha {
        config.significance_level = alpha;
    }
    if let Some(confidence) = args.confidence {
        config.confidence_level = confidence;
    }
    config.validate().context("Invalid analysis settings")?;
    Ok(config)
}

fn print_result(result: &AnalysisResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", report::render_text(result)),
        OutputFormat::Json => println!("{}", report::render_json(result)?),
    }
    Ok(())
}

/// Simulate (or take observed counts) and analyze a single experiment
fn run_single(args: &Cli, config: &ExperimentConfig) -> Result<()> {
    let result = match (args.control_conversions, args.treatment_conversions) {
        (Some(control), Some(treatment)) => {
            analysis::analyze_counts_with_config(control, treatment, args.users, config)
                .context("Failed to analyze observed conversions")?
        }
        (None, None) => {
            let outcomes = match args.seed {
                Some(seed) => {
                    tracing::info!(seed, "simulating with fixed seed");
                    let mut rng = StdRng::seed_from_u64(seed);
                    simulation::simulate(
                        args.users,
                        args.control_rate,
                        args.treatment_rate,
                        &mut rng,
                    )
                }
                None => simulation::simulate(
                    args.users,
                    args.control_rate,
                    args.treatment_rate,
                    &mut rand::thread_rng(),
                ),
            }
            .context("Failed to simulate experiment")?;

            analysis::analyze_with_config(&outcomes, args.users, config)
                .context("Failed to analyze simulated experiment")?
        }
        _ => anyhow::bail!(
            "--control-conversions and --treatment-conversions must be given together"
        ),
    };

    print_result(&result, args.format)
}

/// Run a replication batch and report the rejection rate
fn run_replicates(args: &Cli, replicates: u64, config: &ExperimentConfig) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let plan = ReplicationPlan {
        n_users: args.users,
        cr_control: args.control_rate,
        cr_treatment: args.treatment_rate,
        replicates,
        seed,
        threads: args.threads,
    };

    let summary =
        replication::replicate(&plan, config).context("Failed to run replication batch")?;

    match args.format {
        OutputFormat::Text => print!("{}", summary.to_report_string()),
        OutputFormat::Json => println!("{}", report::render_replication_json(&summary)?),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = load_config(&args)?;

    match args.replicates {
        Some(replicates) => run_replicates(&args, replicates, &config),
        None => run_single(&args, &config),
    }
}
