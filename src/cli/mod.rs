use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod config;
pub mod escape;
pub mod utility;

#[derive(Parser)]
#[command(name = "sybilgauge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Random-walk Sybil-defense measurements on social graphs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sweep the escape rate of bounded walks under injected attacker clusters
    Escape {
        /// Edge-list graph file (two node ids per line)
        #[arg(long)]
        graph: PathBuf,

        /// Settings file (TOML; a commented default is written if missing)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report output path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Random generator seed (entropy-seeded if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Sweep the served suspect/verifier rate from walk-tail intersections
    Utility {
        /// Edge-list graph file (two node ids per line)
        #[arg(long)]
        graph: PathBuf,

        /// Settings file (TOML; a commented default is written if missing)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report output path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Random generator seed (entropy-seeded if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write a default settings file
    InitConfig {
        /// Destination path
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Escape {
            graph,
            config,
            output,
            seed,
        } => escape::execute(graph, config, output, seed),
        Commands::Utility {
            graph,
            config,
            output,
            seed,
        } => utility::execute(graph, config, output, seed),
        Commands::InitConfig { path } => {
            let path = path.unwrap_or_else(config::default_config_path);
            config::ExperimentConfig::create_default(&path)?;
            println!("Wrote default settings to {}", path.display());
            Ok(())
        }
    }
}
