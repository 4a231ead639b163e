//! Forage CLI - Command-line interface for arena distribution and cache selection.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "forage")]
#[command(author, version, about = "Forage - Block clusters and cache selection for robot foraging", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: forage.toml in the current or a parent directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default forage.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing forage.toml
        #[arg(long)]
        force: bool,
    },

    /// Map block clusters and distribute blocks over a fresh arena
    Distribute {
        /// Override the configured seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the layout as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank caches, new caches, cache sites and blocks for a scenario
    Select {
        /// Scenario JSON file (robot position, known blocks and caches)
        scenario: PathBuf,

        /// Override the configured seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the choices as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { path, force } => commands::init::run(path, force),
        Commands::Distribute { seed, json } => {
            commands::distribute::run(cli.config.as_deref(), seed, json)
        }
        Commands::Select { scenario, seed, json } => {
            commands::select::run(cli.config.as_deref(), &scenario, seed, json)
        }
    }
}
