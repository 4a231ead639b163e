//! Power-law cluster distributor.
//!
//! Partitions the arena's blocks into clusters whose capacities follow a
//! binned power law, then places those clusters without overlap:
//!
//! 1. Draw one capacity per cluster from the [`PowerLawSampler`]
//! 2. Guess an origin for every cluster so it lies fully inside the grid
//! 3. Check every pair of guesses with the edge-inclusive overlap test;
//!    any overlap throws the whole round away
//! 4. Give up after [`MAX_PLACEMENT_ATTEMPTS`] rounds
//! 5. Turn each accepted guess into a [`ClusterDistributor`]
//!
//! Blocks are then dropped through the sub-distributor of the cluster they
//! are assigned to.

use crate::cluster::{cluster_extent, BlockCluster, ClusterDistributor, ClusterPlacement};
use crate::config::PowerLawConfig;
use crate::distributor::BlockDistributor;
use crate::powerlaw::PowerLawSampler;
use forage_core::prelude::*;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Placement rounds tried before `map_clusters` gives up.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

#[derive(Debug, Clone)]
pub struct PowerLawDistributor<R> {
    sampler: PowerLawSampler,
    n_clusters: usize,
    resolution: f64,
    rng: R,
    distributors: Vec<ClusterDistributor>,
    /// Cached copy of the sub-distributors' clusters for `block_clusters()`.
    clusters: Vec<BlockCluster>,
    assignments: BTreeMap<BlockId, usize>,
}

impl<R: Rng> PowerLawDistributor<R> {
    /// Validate parameters and take ownership of the generator.
    pub fn configure(
        min_power: u32,
        max_power: u32,
        n_clusters: usize,
        resolution: f64,
        rng: R,
    ) -> Result<Self> {
        if n_clusters == 0 {
            return Err(ForageError::invalid_config(
                "n_clusters",
                "0",
                "at least one cluster is required",
            ));
        }
        if !(resolution > 0.0) || !resolution.is_finite() {
            return Err(ForageError::invalid_config(
                "resolution",
                resolution.to_string(),
                "must be positive and finite",
            ));
        }
        let sampler = PowerLawSampler::new(min_power, max_power, 2.0)?;
        Ok(Self::with_sampler(sampler, n_clusters, resolution, rng))
    }

    pub fn from_config(config: &PowerLawConfig, resolution: f64, rng: R) -> Result<Self> {
        config.validate()?;
        let mut dist = Self::configure(
            config.min_power,
            config.max_power,
            config.n_clusters,
            resolution,
            rng,
        )?;
        dist.sampler = PowerLawSampler::from_config(config)?;
        Ok(dist)
    }

    fn with_sampler(sampler: PowerLawSampler, n_clusters: usize, resolution: f64, rng: R) -> Self {
        Self {
            sampler,
            n_clusters,
            resolution,
            rng,
            distributors: Vec::new(),
            clusters: Vec::new(),
            assignments: BTreeMap::new(),
        }
    }

    pub fn sampler(&self) -> &PowerLawSampler {
        &self.sampler
    }

    pub fn into_rng(self) -> R {
        self.rng
    }

    /// Place the clusters in `grid`. Any previous mapping is discarded.
    ///
    /// Fails with a placement error when no overlap-free arrangement is
    /// found within [`MAX_PLACEMENT_ATTEMPTS`] rounds; callers are expected
    /// to fall back to a simpler strategy.
    pub fn map_clusters(&mut self, grid: &ArenaGrid) -> Result<()> {
        if (grid.resolution() - self.resolution).abs() > f64::EPSILON {
            return Err(ForageError::invalid_config(
                "resolution",
                self.resolution.to_string(),
                format!("does not match grid resolution {}", grid.resolution()),
            ));
        }
        self.distributors.clear();
        self.clusters.clear();
        self.assignments.clear();

        let capacities = self.sampler.sample_n(self.n_clusters, &mut self.rng);
        let extents: Vec<DiscreteSize> = capacities.iter().map(|&c| cluster_extent(c)).collect();
        debug!("Cluster capacities {:?}", capacities);

        if let Some(too_big) = extents
            .iter()
            .find(|e| e.width > grid.xdsize() || e.height > grid.ydsize())
        {
            return Err(ForageError::placement(
                0,
                format!(
                    "{}x{} cluster cannot fit in {}x{} grid",
                    too_big.width,
                    too_big.height,
                    grid.xdsize(),
                    grid.ydsize()
                ),
            ));
        }

        for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
            let guesses = self.guess_placements(grid, &capacities, &extents);
            if !any_overlap(&guesses) {
                info!(
                    "Mapped {} clusters ({} blocks capacity) after {} attempts",
                    guesses.len(),
                    capacities.iter().map(|&c| c as u64).sum::<u64>(),
                    attempt
                );
                self.distributors = guesses
                    .iter()
                    .enumerate()
                    .map(|(i, p)| ClusterDistributor::new(BlockCluster::new(i, p)))
                    .collect();
                self.sync_clusters();
                return Ok(());
            }
        }

        warn!(
            "Failed to place {} clusters in {}x{} grid after {} attempts",
            self.n_clusters,
            grid.xdsize(),
            grid.ydsize(),
            MAX_PLACEMENT_ATTEMPTS
        );
        Err(ForageError::placement(
            MAX_PLACEMENT_ATTEMPTS,
            "no overlap-free arrangement found",
        ))
    }

    fn guess_placements(
        &mut self,
        grid: &ArenaGrid,
        capacities: &[u32],
        extents: &[DiscreteSize],
    ) -> Vec<ClusterPlacement> {
        capacities
            .iter()
            .zip(extents)
            .map(|(&capacity, &extent)| {
                let x = self.rng.gen_range(0..=grid.xdsize() - extent.width);
                let y = self.rng.gen_range(0..=grid.ydsize() - extent.height);
                ClusterPlacement {
                    origin: DiscreteCoord::new(x, y),
                    extent,
                    capacity,
                }
            })
            .collect()
    }

    fn sync_clusters(&mut self) {
        self.clusters = self.distributors.iter().map(|d| d.cluster().clone()).collect();
    }

    /// Clusters to try for `id`: its own cluster once assigned, otherwise
    /// every cluster with room left, in order.
    fn candidate_clusters(&self, id: BlockId) -> Vec<usize> {
        match self.assignments.get(&id) {
            Some(&idx) => vec![idx],
            None => self
                .distributors
                .iter()
                .enumerate()
                .filter(|(_, d)| !d.cluster().is_full())
                .map(|(i, _)| i)
                .collect(),
        }
    }

    /// A block was picked up; its cluster regains the slot.
    pub fn block_picked_up(&mut self, id: BlockId) {
        if let Some(idx) = self.assignments.remove(&id) {
            self.distributors[idx].remove_block(id);
            self.sync_clusters();
        }
    }

    /// Total blocks all clusters can hold.
    pub fn capacity(&self) -> u64 {
        self.clusters.iter().map(|c| c.capacity as u64).sum()
    }
}

fn any_overlap(placements: &[ClusterPlacement]) -> bool {
    placements.iter().enumerate().any(|(i, a)| {
        placements[i + 1..]
            .iter()
            .any(|b| a.rect().overlaps_inclusive(&b.rect()))
    })
}

impl<R: Rng> BlockDistributor for PowerLawDistributor<R> {
    fn distribute_block(
        &mut self,
        grid: &mut ArenaGrid,
        block: &mut Block,
        exclude: &[EntityRef<'_>],
    ) -> Result<DiscreteCoord> {
        if self.distributors.is_empty() {
            return Err(ForageError::no_free_cell("power-law distributor (no clusters mapped)"));
        }
        let candidates = self.candidate_clusters(block.id);
        let mut last_err = ForageError::no_free_cell("all clusters full");
        for idx in candidates {
            match self.distributors[idx].distribute_block(grid, block, exclude, &mut self.rng) {
                Ok(cell) => {
                    self.assignments.insert(block.id, idx);
                    self.sync_clusters();
                    return Ok(cell);
                }
                Err(e @ ForageError::NoFreeCell { .. }) => {
                    debug!("{}; trying the next cluster", e);
                    last_err = e;
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err)
    }

    fn block_clusters(&self) -> &[BlockCluster] {
        &self.clusters
    }

    fn name(&self) -> &'static str {
        "powerlaw"
    }
}
