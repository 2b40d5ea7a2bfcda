use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use podgrid_core::AllocatorConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "podgrid",
    about = "podgrid — NUMA-aware CPU set and network allocation for one node",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Allocator config (podgrid.toml). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Propose flat and NUMA-local CPU sets for the scenario's pod
    Cpuset {
        /// Scenario file (TOML: [node], [pod], [[existing]])
        #[arg(short, long)]
        scenario: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Pick a dedicated network endpoint for the scenario's pod
    Network {
        #[arg(short, long)]
        scenario: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Run both CPU set and network allocation
    Allocate {
        #[arg(short, long)]
        scenario: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AllocatorConfig::load(cli.config.as_deref())?;

    // Logs go to stderr so JSON output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Cpuset { scenario, format } => {
            commands::allocate::cpuset(&scenario, &config, format)
        }
        Commands::Network { scenario, format } => {
            commands::allocate::network(&scenario, format)
        }
        Commands::Allocate { scenario, format } => {
            commands::allocate::allocate(&scenario, &config, format)
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}
