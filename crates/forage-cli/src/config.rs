//! Configuration management for Forage CLI.

use anyhow::{Context, Result};
use forage::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "forage.toml";

/// Forage project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seed for every stochastic operation of a run.
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default)]
    pub distribution: DistributionConfig,
    #[serde(default)]
    pub pheromone: PheromoneConfig,
    #[serde(default)]
    pub cache_sel: CacheSelConfig,
    #[serde(default)]
    pub block_sel: BlockSelConfig,
}

// Default value functions
fn default_seed() -> u64 { 42 }

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            arena: ArenaConfig::default(),
            distribution: DistributionConfig::default(),
            pheromone: PheromoneConfig::default(),
            cache_sel: CacheSelConfig::default(),
            block_sel: BlockSelConfig::default(),
        }
    }
}

impl Config {
    /// Load config from `path`, or from forage.toml in the current or parent
    /// directories, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let found = match path {
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };
        let config = match found {
            Some(path) => Self::read(&path)?,
            None => Config::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.arena.validate().context("Invalid [arena] section")?;
        self.distribution
            .validate()
            .context("Invalid [distribution] section")?;
        self.pheromone
            .validate()
            .context("Invalid [pheromone] section")?;
        self.cache_sel
            .validate()
            .context("Invalid [cache_sel] section")?;
        self.block_sel
            .validate()
            .context("Invalid [block_sel] section")?;
        Ok(())
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find forage.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = Config::default();
        config.seed = 7;
        config.distribution.powerlaw.n_clusters = 5;
        config.cache_sel.pickup_policy = PickupPolicy::Time(40);
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.seed, 7);
        assert_eq!(loaded.distribution.powerlaw.n_clusters, 5);
        assert_eq!(loaded.cache_sel.pickup_policy, PickupPolicy::Time(40));
    }

    #[test]
    fn missing_sections_take_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "seed = 3\n").unwrap();
        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.seed, 3);
        assert_eq!(loaded.arena.xsize, 50.0);
        assert_eq!(loaded.distribution.powerlaw.max_power, 4);
    }

    #[test]
    fn invalid_section_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[distribution.powerlaw]\nmin_power = 5\nmax_power = 2\n").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("distribution"));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
