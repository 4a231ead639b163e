//! Selection configuration, parsed once at controller init.

use crate::matrix::PickupPolicy;
use forage_core::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSelConfig {
    #[serde(default = "default_nest")]
    pub nest: Vec2,
    /// New caches/sites must be farther than this from any known cache.
    #[serde(default = "default_cache_prox_dist")]
    pub cache_prox_dist: f64,
    /// New caches/sites must be farther than this from other known blocks.
    #[serde(default = "default_cluster_prox_dist")]
    pub cluster_prox_dist: f64,
    /// Cache sites must be farther than this from the nest.
    #[serde(default = "default_nest_prox_dist")]
    pub nest_prox_dist: f64,
    #[serde(default = "default_site_range")]
    pub site_xrange: IntRange,
    #[serde(default = "default_site_range")]
    pub site_yrange: IntRange,
    /// Reject cache sites that violate a proximity constraint instead of
    /// settling for the least-bad one.
    #[serde(default = "default_strict_constraints")]
    pub strict_constraints: bool,
    #[serde(default)]
    pub pickup_policy: PickupPolicy,
    /// Candidate sites sampled per cache-site selection.
    #[serde(default = "default_site_samples")]
    pub site_samples: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockSelConfig {
    #[serde(default = "default_nest")]
    pub nest: Vec2,
    #[serde(default = "default_priority")]
    pub cube_priority: f64,
    #[serde(default = "default_priority")]
    pub ramp_priority: f64,
}

// Default value functions
fn default_nest() -> Vec2 { Vec2::new(2.0, 25.0) }
fn default_cache_prox_dist() -> f64 { 4.0 }
fn default_cluster_prox_dist() -> f64 { 2.0 }
fn default_nest_prox_dist() -> f64 { 6.0 }
fn default_site_range() -> IntRange { IntRange::new(1, 49) }
fn default_strict_constraints() -> bool { true }
fn default_site_samples() -> usize { 64 }
fn default_priority() -> f64 { 1.0 }

impl Default for CacheSelConfig {
    fn default() -> Self {
        Self {
            nest: default_nest(),
            cache_prox_dist: default_cache_prox_dist(),
            cluster_prox_dist: default_cluster_prox_dist(),
            nest_prox_dist: default_nest_prox_dist(),
            site_xrange: default_site_range(),
            site_yrange: default_site_range(),
            strict_constraints: default_strict_constraints(),
            pickup_policy: PickupPolicy::default(),
            site_samples: default_site_samples(),
        }
    }
}

impl Default for BlockSelConfig {
    fn default() -> Self {
        Self {
            nest: default_nest(),
            cube_priority: default_priority(),
            ramp_priority: default_priority(),
        }
    }
}

fn check_distance(field: &str, value: f64) -> Result<()> {
    if value < 0.0 || !value.is_finite() {
        return Err(ForageError::invalid_config(
            field,
            value.to_string(),
            "must be a non-negative finite distance",
        ));
    }
    Ok(())
}

fn check_range(field: &str, range: &IntRange) -> Result<()> {
    if range.is_empty() {
        return Err(ForageError::invalid_config(
            field,
            range.to_string(),
            "lower bound exceeds upper bound",
        ));
    }
    Ok(())
}

impl CacheSelConfig {
    pub fn validate(&self) -> Result<()> {
        check_distance("cache_sel.cache_prox_dist", self.cache_prox_dist)?;
        check_distance("cache_sel.cluster_prox_dist", self.cluster_prox_dist)?;
        check_distance("cache_sel.nest_prox_dist", self.nest_prox_dist)?;
        check_range("cache_sel.site_xrange", &self.site_xrange)?;
        check_range("cache_sel.site_yrange", &self.site_yrange)?;
        if self.site_samples == 0 {
            return Err(ForageError::invalid_config(
                "cache_sel.site_samples",
                "0",
                "at least one candidate site is required",
            ));
        }
        Ok(())
    }
}

impl BlockSelConfig {
    pub fn validate(&self) -> Result<()> {
        for (field, p) in [
            ("block_sel.cube_priority", self.cube_priority),
            ("block_sel.ramp_priority", self.ramp_priority),
        ] {
            if !(p > 0.0) || !p.is_finite() {
                return Err(ForageError::invalid_config(field, p.to_string(), "must be positive"));
            }
        }
        Ok(())
    }
}
