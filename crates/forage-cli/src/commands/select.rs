//! Run every selector against a scenario.
//!
//! A scenario is a JSON snapshot of what one robot believes:
//!
//! ```json
//! {
//!   "robot": { "x": 30.0, "y": 12.5 },
//!   "timestep": 120,
//!   "blocks": [{ "id": 1, "kind": "cube", "dloc": { "x": 20, "y": 8 }, "location": { "x": 20.0, "y": 8.0 } }],
//!   "caches": [],
//!   "pickup_exceptions": [],
//!   "drop_exceptions": [],
//!   "block_exceptions": []
//! }
//! ```

use anyhow::{Context, Result};
use colored::Colorize;
use forage::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::Config;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub robot: Vec2,
    #[serde(default)]
    pub timestep: Tick,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub caches: Vec<Cache>,
    #[serde(default)]
    pub pickup_exceptions: Vec<u64>,
    #[serde(default)]
    pub drop_exceptions: Vec<u64>,
    #[serde(default)]
    pub block_exceptions: Vec<u64>,
}

impl Scenario {
    /// Every object in the scenario, observed at the scenario timestep.
    fn store(&self, pheromone: PheromoneConfig) -> Result<DpoStore> {
        let mut store = DpoStore::new(pheromone)?;
        for block in &self.blocks {
            store.observe_block(block.clone(), self.timestep);
        }
        for cache in &self.caches {
            store.observe_cache(cache.clone(), self.timestep);
        }
        Ok(store)
    }
}

/// The choice of each selector; `None` when nothing qualified.
#[derive(Debug, Serialize)]
pub struct SelectionReport {
    pub pickup_cache: Option<Selection<CacheId>>,
    pub drop_cache: Option<Selection<CacheId>>,
    pub new_cache: Option<Selection<BlockId>>,
    pub cache_site: Option<SiteChoice>,
    pub block: Option<Selection<BlockId>>,
}

pub fn select(config: &Config, scenario: &Scenario, seed: u64) -> Result<SelectionReport> {
    let store = scenario.store(config.pheromone)?;

    let mut cache_matrix = CacheSelMatrix::new(&config.cache_sel)?;
    for &id in &scenario.pickup_exceptions {
        cache_matrix.add_exception(id, UsageKind::Pickup);
    }
    for &id in &scenario.drop_exceptions {
        cache_matrix.add_exception(id, UsageKind::Drop);
    }
    let mut block_matrix = BlockSelMatrix::new(&config.block_sel)?;
    for &id in &scenario.block_exceptions {
        block_matrix.add_exception(BlockId(id));
    }

    let robot = scenario.robot;
    let existing = ExistingCacheSelector::new(&cache_matrix);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    Ok(SelectionReport {
        pickup_cache: existing.select(&store, robot, scenario.timestep, UsageKind::Pickup)?,
        drop_cache: existing.select(&store, robot, scenario.timestep, UsageKind::Drop)?,
        new_cache: NewCacheSelector::new(&cache_matrix).select(&store, robot)?,
        cache_site: CacheSiteSelector::new(&cache_matrix, config.cache_sel.site_samples)
            .select(&store, robot, &mut rng)?,
        block: BlockSelector::new(&block_matrix).select(&store, robot)?,
    })
}

fn print_choice<K: std::fmt::Display>(label: &str, choice: &Option<Selection<K>>) {
    match choice {
        Some(s) => println!(
            "  {:<13} {} at {} {}",
            label,
            s.id.to_string().white().bold(),
            s.location,
            format!("(utility {:.6})", s.utility).dimmed()
        ),
        None => println!("  {:<13} {}", label, "none".yellow()),
    }
}

pub fn run(config_path: Option<&Path>, scenario_path: &Path, seed: Option<u64>, json: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    let content = std::fs::read_to_string(scenario_path)
        .with_context(|| format!("Failed to read scenario: {}", scenario_path.display()))?;
    let scenario: Scenario = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scenario: {}", scenario_path.display()))?;

    let report = select(&config, &scenario, seed.unwrap_or(config.seed))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Robot at {}, {} blocks and {} caches known",
        "→".blue(),
        scenario.robot,
        scenario.blocks.len().to_string().cyan(),
        scenario.caches.len().to_string().cyan()
    );
    println!();
    print_choice("pickup cache", &report.pickup_cache);
    print_choice("drop cache", &report.drop_cache);
    print_choice("new cache", &report.new_cache);
    match &report.cache_site {
        Some(site) => println!(
            "  {:<13} {} {}{}",
            "cache site",
            site.location.to_string().white().bold(),
            format!("(utility {:.6})", site.utility).dimmed(),
            if site.feasible { "" } else { " relaxed" }
        ),
        None => println!("  {:<13} {}", "cache site", "none".yellow()),
    }
    print_choice("block", &report.block);

    Ok(())
}
