//! powersim CLI - Simulated Datasets for Statistical-Power Studies
//!
//! Drives the powersim_core generators over a registry of test families and
//! persists every round as a JSON record.
//!
//! # Commands
//!
//! - `powersim run` - Simulate every (or the selected) family and persist records
//! - `powersim list` - List the families of the active registry
//! - `powersim check` - Validate configuration and registry
//! - `powersim inspect --family <name> --round <n>` - Show one persisted record
//!
//! # Configuration
//!
//! Settings come from `powersim.toml` (see `--config`), then `POWERSIM_*`
//! environment variables, then command-line flags.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod store;

pub use error::{CliError, Result};

use config::SimConfig;

/// Synthetic data generation for statistical power analysis
#[derive(Parser)]
#[command(name = "powersim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "powersim.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate families and persist one record per round
    Run {
        /// Family to run (repeatable; default: all)
        #[arg(short, long = "family")]
        family: Vec<String>,

        /// Rounds per family
        #[arg(short, long)]
        rounds: Option<usize>,

        /// Random stream seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output directory for records
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// List the families of the active registry
    List,

    /// Check configuration and registry
    Check,

    /// Show one persisted record and its effect size
    Inspect {
        /// Family name
        #[arg(short, long)]
        family: String,

        /// Zero-based round index
        #[arg(short, long)]
        round: usize,

        /// Reference mean for one-sample effect sizes
        #[arg(long, default_value = "0.0")]
        x0: f64,

        /// Directory the records were written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

fn init_tracing(log_level: &str, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { log_level })
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let config = SimConfig::load_or_default(&cli.config)?.with_env_override()?;
    let config = match &cli.command {
        Commands::Run {
            rounds,
            seed,
            output_dir,
            ..
        } => config.with_flags(*seed, *rounds, output_dir.clone()),
        Commands::Inspect { output_dir, .. } => config.with_flags(None, None, output_dir.clone()),
        Commands::List | Commands::Check => config,
    };

    init_tracing(&config.log_level, cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }
    if !config_found {
        info!(
            "Configuration file {} not found; using defaults",
            cli.config.display()
        );
    }

    match cli.command {
        Commands::Run { family, .. } => commands::run::run(&config, &family).map(|_| ()),
        Commands::List => commands::list::run(&config),
        Commands::Check => commands::check::run(&config),
        Commands::Inspect {
            family, round, x0, ..
        } => commands::inspect::run(&config, &family, round, x0),
    }
}
