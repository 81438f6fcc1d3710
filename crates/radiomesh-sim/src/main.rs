//! CLI binary entry point for the RadioMesh simulation host.
//!
//! Usage:
//!   radiomesh-sim [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>   Path to configuration TOML file
//!   -n, --nodes <N>       Node count (overrides config)
//!   -s, --seed <SEED>     Random seed (overrides config)
//!   -t, --ticks <N>       Tick budget (overrides config)
//!   -f, --fast            Run unpaced, as fast as possible
//!   -o, --report <FILE>   Write the JSON run report to a file
//!   -v, --verbose         Increase logging verbosity

use std::path::PathBuf;

use clap::Parser;

use radiomesh_sim::config::SimConfig;
use radiomesh_sim::runner;

/// RadioMesh simulation host - decentralized cluster election over a
/// radius-limited broadcast medium.
#[derive(Parser, Debug)]
#[command(name = "radiomesh-sim")]
#[command(about = "Headless RadioMesh cluster election simulation")]
#[command(version)]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of nodes to scatter over the arena.
    #[arg(short, long, value_name = "N")]
    nodes: Option<usize>,

    /// Seed for the simulation's random source.
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,

    /// Tick budget for the run.
    #[arg(short, long, value_name = "N")]
    ticks: Option<u64>,

    /// Run unpaced instead of at the configured tick rate.
    #[arg(short, long)]
    fast: bool,

    /// Write the JSON run report to this file instead of stdout.
    #[arg(short = 'o', long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Increase logging verbosity (can be repeated: -v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration.
    let mut config = SimConfig::load(cli.config.as_deref())?;

    // Apply CLI overrides.
    if let Some(nodes) = cli.nodes {
        config.simulation.nodes = nodes;
    }
    if let Some(seed) = cli.seed {
        config.simulation.seed = seed;
    }
    if let Some(ticks) = cli.ticks {
        config.simulation.ticks = ticks;
    }

    config.validate()?;

    // Adjust log level based on verbosity.
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    // Initialize logging.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    if config.logging.json_format {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    let report = runner::run(config, cli.fast).await?;

    match cli.report {
        Some(path) => report.write_to(&path)?,
        None => println!("{}", report.to_json()?),
    }

    Ok(())
}
