//! Lay out a fresh arena.

use anyhow::{Context, Result};
use colored::Colorize;
use forage::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::config::Config;

/// Arena layout produced by one distribution run.
#[derive(Debug, Serialize)]
pub struct DistributionReport {
    pub seed: u64,
    pub strategy: &'static str,
    pub grid: (usize, usize),
    pub clusters: Vec<BlockCluster>,
    pub blocks: Vec<Block>,
}

/// Map clusters (if configured) and drop every block.
pub fn distribute(config: &Config, seed: u64) -> Result<DistributionReport> {
    let arena = &config.arena;
    let mut grid = ArenaGrid::from_dimensions(arena.xsize, arena.ysize, arena.resolution)
        .context("Failed to build arena grid")?;
    let mut dist = ArenaDistributor::build(&config.distribution, &grid, ChaCha8Rng::seed_from_u64(seed))
        .context("Failed to configure block distribution")?;

    let mut blocks = make_blocks(&config.distribution);
    dist.distribute_blocks(&mut grid, &mut blocks, &[])
        .context("Failed to distribute blocks")?;
    info!("Distributed {} blocks with {}", blocks.len(), dist.name());

    Ok(DistributionReport {
        seed,
        strategy: dist.name(),
        grid: (grid.xdsize(), grid.ydsize()),
        clusters: dist.block_clusters().to_vec(),
        blocks,
    })
}

pub fn run(config_path: Option<&Path>, seed: Option<u64>, json: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    let seed = seed.unwrap_or(config.seed);
    let report = distribute(&config, seed)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}x{} arena, {} strategy, seed {}",
        "→".blue(),
        report.grid.0,
        report.grid.1,
        report.strategy.cyan().bold(),
        seed
    );
    println!();

    if report.clusters.is_empty() {
        println!("  {} No clusters (blocks placed over the whole arena)", "•".yellow());
    }
    for cluster in &report.clusters {
        println!(
            "  {} {} {}",
            format!("cluster {}", cluster.id).white().bold(),
            cluster.rect,
            format!("({}/{} blocks)", cluster.n_blocks(), cluster.capacity).dimmed()
        );
    }

    println!();
    println!(
        "{} {} blocks placed",
        "✓".green(),
        report.blocks.iter().filter(|b| b.is_placed()).count().to_string().cyan()
    );

    Ok(())
}
