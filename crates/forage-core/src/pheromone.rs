//! Pheromone-decaying object records.
//!
//! A robot's memory of a block or cache is only as good as how recently it
//! saw the object. Each record carries a [`PheromoneDensity`] that decays
//! every timestep and snaps back to full strength when the robot observes
//! the object again. Between observations the density never increases.

use crate::entity::{Block, Cache};
use crate::error::{ForageError, Result};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Upper bound of a pheromone density.
pub const MAX_DENSITY: f64 = 1.0;

/// Decay parameters shared by every record in a store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PheromoneConfig {
    /// Fraction of density lost per timestep (0.0-1.0).
    #[serde(default = "default_rho")]
    pub rho: f64,
    /// Records at or below this density are forgotten.
    #[serde(default = "default_removal_threshold")]
    pub removal_threshold: f64,
}

fn default_rho() -> f64 { 0.001 }
fn default_removal_threshold() -> f64 { 0.0001 }

impl Default for PheromoneConfig {
    fn default() -> Self {
        Self {
            rho: default_rho(),
            removal_threshold: default_removal_threshold(),
        }
    }
}

impl PheromoneConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.rho) {
            return Err(ForageError::out_of_range("pheromone.rho", 0.0, 1.0, self.rho));
        }
        if !(0.0..MAX_DENSITY).contains(&self.removal_threshold) {
            return Err(ForageError::out_of_range(
                "pheromone.removal_threshold",
                0.0,
                MAX_DENSITY,
                self.removal_threshold,
            ));
        }
        Ok(())
    }
}

/// Scalar confidence in [0, 1] that decays multiplicatively.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PheromoneDensity {
    value: f64,
    rho: f64,
}

impl PheromoneDensity {
    /// A fresh density at full strength.
    pub fn new(rho: f64) -> Self {
        Self::with_value(MAX_DENSITY, rho)
    }

    pub fn with_value(value: f64, rho: f64) -> Self {
        Self {
            value: value.clamp(0.0, MAX_DENSITY),
            rho: rho.clamp(0.0, 1.0),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// One timestep of evaporation.
    pub fn decay(&mut self) -> f64 {
        self.value *= 1.0 - self.rho;
        self.value
    }

    /// Deposit additional pheromone, saturating at [`MAX_DENSITY`].
    pub fn add(&mut self, amount: f64) -> f64 {
        self.value = (self.value + amount.max(0.0)).min(MAX_DENSITY);
        self.value
    }

    /// Direct observation: confidence is restored in full.
    pub fn reset_to_max(&mut self) {
        self.value = MAX_DENSITY;
    }
}

/// Objects a store can track.
pub trait Tracked: Clone {
    type Id: Copy + Ord + std::fmt::Debug + std::fmt::Display;

    fn id(&self) -> Self::Id;
}

impl Tracked for Block {
    type Id = BlockId;

    fn id(&self) -> BlockId {
        self.id
    }
}

impl Tracked for Cache {
    type Id = CacheId;

    fn id(&self) -> CacheId {
        self.id
    }
}

/// An entity paired with the robot's confidence that it still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayingObject<T> {
    pub entity: T,
    pub density: PheromoneDensity,
    /// Timestep of the last direct observation.
    pub observed_at: Tick,
}

impl<T: Tracked> DecayingObject<T> {
    pub fn new(entity: T, density: PheromoneDensity, observed_at: Tick) -> Self {
        Self {
            entity,
            density,
            observed_at,
        }
    }

    pub fn id(&self) -> T::Id {
        self.entity.id()
    }
}

/// Decaying records of one entity kind, iterated in ascending id order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize, T::Id: Serialize",
    deserialize = "T: Deserialize<'de>, T::Id: Deserialize<'de>"
))]
pub struct DecayingMap<T: Tracked> {
    records: BTreeMap<T::Id, DecayingObject<T>>,
}

impl<T: Tracked> Default for DecayingMap<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<T: Tracked> DecayingMap<T> {
    /// Record a direct observation. Existing records are refreshed in place.
    pub fn observe(&mut self, entity: T, rho: f64, now: Tick) {
        let id = entity.id();
        match self.records.get_mut(&id) {
            Some(rec) => {
                rec.entity = entity;
                rec.density.reset_to_max();
                rec.observed_at = now;
            }
            None => {
                self.records
                    .insert(id, DecayingObject::new(entity, PheromoneDensity::new(rho), now));
            }
        }
    }

    pub fn get(&self, id: &T::Id) -> Option<&DecayingObject<T>> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.records.contains_key(id)
    }

    pub fn remove(&mut self, id: &T::Id) -> Option<DecayingObject<T>> {
        self.records.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecayingObject<T>> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Decay every record; forget those at or below `threshold`.
    fn decay_all(&mut self, threshold: f64) -> Vec<T::Id> {
        let mut forgotten = Vec::new();
        self.records.retain(|id, rec| {
            let keep = rec.density.decay() > threshold;
            if !keep {
                forgotten.push(*id);
            }
            keep
        });
        forgotten
    }
}

/// A robot's perceived arena: the blocks and caches it knows about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DpoStore {
    #[serde(default)]
    pub config: PheromoneConfig,
    #[serde(default)]
    pub blocks: DecayingMap<Block>,
    #[serde(default)]
    pub caches: DecayingMap<Cache>,
}

impl DpoStore {
    pub fn new(config: PheromoneConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            blocks: DecayingMap::default(),
            caches: DecayingMap::default(),
        })
    }

    pub fn observe_block(&mut self, block: Block, now: Tick) {
        self.blocks.observe(block, self.config.rho, now);
    }

    /// Record a cache sighting. Blocks the cache now holds are no longer
    /// free-standing and are dropped from the block records.
    pub fn observe_cache(&mut self, cache: Cache, now: Tick) {
        for id in &cache.blocks {
            self.blocks.remove(id);
        }
        self.caches.observe(cache, self.config.rho, now);
    }

    /// One timestep of decay across every record.
    pub fn decay_all(&mut self) {
        let threshold = self.config.removal_threshold;
        let blocks = self.blocks.decay_all(threshold);
        let caches = self.caches.decay_all(threshold);
        if !blocks.is_empty() || !caches.is_empty() {
            debug!(
                "Forgot {} blocks and {} caches below density {}",
                blocks.len(),
                caches.len(),
                threshold
            );
        }
    }

    pub fn clear(&mut self) {
        self.blocks = DecayingMap::default();
        self.caches = DecayingMap::default();
    }
}
