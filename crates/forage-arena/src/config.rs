//! Arena and block-distribution configuration.
//!
//! These structs arrive already parsed (from TOML in the CLI, or built in
//! code by a host). `validate()` catches the static errors that would
//! otherwise surface mid-placement.

use forage_core::error::{ForageError, Result};
use forage_core::grid::{discretize, grid_cells};
use serde::{Deserialize, Serialize};

/// Arena dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Arena width in meters.
    #[serde(default = "default_xsize")]
    pub xsize: f64,
    /// Arena height in meters.
    #[serde(default = "default_ysize")]
    pub ysize: f64,
    /// Meters per grid cell.
    #[serde(default = "default_resolution")]
    pub resolution: f64,
}

/// Which strategy places blocks at arena (re)initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionStrategy {
    /// Uniformly random over the whole arena.
    Random,
    /// Power-law sized clusters, falling back to `Random` on placement failure.
    Powerlaw,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerLawConfig {
    /// Smallest cluster holds 2^min_power blocks.
    #[serde(default = "default_min_power")]
    pub min_power: u32,
    /// Largest cluster holds 2^max_power blocks.
    #[serde(default = "default_max_power")]
    pub max_power: u32,
    #[serde(default = "default_n_clusters")]
    pub n_clusters: usize,
    /// Exponent of the continuous power law the sizes are binned from.
    #[serde(default = "default_exponent")]
    pub exponent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionConfig {
    #[serde(default = "default_strategy")]
    pub strategy: DistributionStrategy,
    /// Number of blocks to drop at initialization.
    #[serde(default = "default_n_blocks")]
    pub n_blocks: usize,
    /// Fraction of blocks that are ramps rather than cubes.
    #[serde(default)]
    pub ramp_fraction: f64,
    #[serde(default)]
    pub powerlaw: PowerLawConfig,
}

// Default value functions
fn default_xsize() -> f64 { 50.0 }
fn default_ysize() -> f64 { 50.0 }
fn default_resolution() -> f64 { 1.0 }
fn default_min_power() -> u32 { 2 }
fn default_max_power() -> u32 { 4 }
fn default_n_clusters() -> usize { 3 }
fn default_exponent() -> f64 { 2.0 }
fn default_strategy() -> DistributionStrategy { DistributionStrategy::Powerlaw }
fn default_n_blocks() -> usize { 12 }

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            xsize: default_xsize(),
            ysize: default_ysize(),
            resolution: default_resolution(),
        }
    }
}

impl Default for PowerLawConfig {
    fn default() -> Self {
        Self {
            min_power: default_min_power(),
            max_power: default_max_power(),
            n_clusters: default_n_clusters(),
            exponent: default_exponent(),
        }
    }
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            n_blocks: default_n_blocks(),
            ramp_fraction: 0.0,
            powerlaw: PowerLawConfig::default(),
        }
    }
}

/// Largest exponent whose capacity still fits a `u32`.
pub const MAX_POWER_LIMIT: u32 = 31;

impl ArenaConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.resolution > 0.0) || !self.resolution.is_finite() {
            return Err(ForageError::invalid_config(
                "arena.resolution",
                self.resolution.to_string(),
                "must be positive and finite",
            ));
        }
        if self.xsize < self.resolution || self.ysize < self.resolution {
            return Err(ForageError::invalid_config(
                "arena.size",
                format!("{}x{}", self.xsize, self.ysize),
                "arena must be at least one cell in each dimension",
            ));
        }
        let (xdsize, ydsize) = discretize(self.xsize, self.ysize, self.resolution)?;
        grid_cells(xdsize, ydsize)?;
        Ok(())
    }
}

impl PowerLawConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(ForageError::invalid_config(
                "powerlaw.n_clusters",
                "0",
                "at least one cluster is required",
            ));
        }
        if self.min_power > self.max_power {
            return Err(ForageError::invalid_config(
                "powerlaw.min_power",
                self.min_power.to_string(),
                format!("greater than max_power ({})", self.max_power),
            ));
        }
        if self.max_power > MAX_POWER_LIMIT {
            return Err(ForageError::out_of_range(
                "powerlaw.max_power",
                0.0,
                MAX_POWER_LIMIT as f64,
                self.max_power as f64,
            ));
        }
        if !(self.exponent > 0.0) || !self.exponent.is_finite() {
            return Err(ForageError::invalid_config(
                "powerlaw.exponent",
                self.exponent.to_string(),
                "must be positive and finite",
            ));
        }
        Ok(())
    }
}

impl DistributionConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.ramp_fraction) {
            return Err(ForageError::out_of_range(
                "distribution.ramp_fraction",
                0.0,
                1.0,
                self.ramp_fraction,
            ));
        }
        if self.strategy == DistributionStrategy::Powerlaw {
            self.powerlaw.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ArenaConfig::default().validate().is_ok());
        assert!(DistributionConfig::default().validate().is_ok());
    }

    #[test]
    fn absurd_arena_size_rejected() {
        let cfg = ArenaConfig {
            xsize: 1e12,
            ysize: 1e12,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ForageError::Config(_))));
    }

    #[test]
    fn zero_clusters_rejected() {
        let cfg = PowerLawConfig {
            n_clusters: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ForageError::Config(_))));
    }

    #[test]
    fn inverted_powers_rejected() {
        let cfg = PowerLawConfig {
            min_power: 5,
            max_power: 3,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn random_strategy_skips_powerlaw_checks() {
        let cfg = DistributionConfig {
            strategy: DistributionStrategy::Random,
            powerlaw: PowerLawConfig {
                n_clusters: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: DistributionConfig =
            serde_json::from_str(r#"{"strategy":"random","n_blocks":5}"#).unwrap();
        assert_eq!(cfg.strategy, DistributionStrategy::Random);
        assert_eq!(cfg.n_blocks, 5);
        assert_eq!(cfg.powerlaw.max_power, 4);
    }
}
