//! Strategy dispatch with fallback.
//!
//! Arena initialization asks for the configured strategy. A power-law
//! placement that runs out of attempts, or whose clusters cannot hold every
//! configured block, is recoverable: the arena falls back to the random
//! distributor, handing it the same generator so the run stays replayable.
//! Configuration errors are not recovered.

use crate::cluster::BlockCluster;
use crate::config::{DistributionConfig, DistributionStrategy};
use crate::distributor::BlockDistributor;
use crate::powerlaw_distributor::PowerLawDistributor;
use crate::random::RandomDistributor;
use forage_core::prelude::*;
use rand::Rng;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub enum ArenaDistributor<R> {
    PowerLaw(PowerLawDistributor<R>),
    Random(RandomDistributor<R>),
}

impl<R: Rng> ArenaDistributor<R> {
    /// Build the configured distributor for `grid`, mapping clusters if needed.
    pub fn build(config: &DistributionConfig, grid: &ArenaGrid, rng: R) -> Result<Self> {
        config.validate()?;
        match config.strategy {
            DistributionStrategy::Random => {
                info!("Using random block distribution");
                Ok(ArenaDistributor::Random(RandomDistributor::new(rng)))
            }
            DistributionStrategy::Powerlaw => {
                let mut dist =
                    PowerLawDistributor::from_config(&config.powerlaw, grid.resolution(), rng)?;
                match dist.map_clusters(grid) {
                    Ok(()) if (dist.capacity() as usize) < config.n_blocks => {
                        warn!(
                            "Power-law clusters hold {} blocks but {} are configured; falling back to random",
                            dist.capacity(),
                            config.n_blocks
                        );
                        Ok(ArenaDistributor::Random(RandomDistributor::new(dist.into_rng())))
                    }
                    Ok(()) => Ok(ArenaDistributor::PowerLaw(dist)),
                    Err(e @ ForageError::Placement { .. }) => {
                        warn!("Power-law placement failed ({}); falling back to random", e);
                        Ok(ArenaDistributor::Random(RandomDistributor::new(dist.into_rng())))
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Whether blocks are confined to power-law clusters.
    pub fn is_clustered(&self) -> bool {
        matches!(self, ArenaDistributor::PowerLaw(_))
    }
}

/// Build `config.n_blocks` blocks, the first `ramp_fraction` of them ramps.
pub fn make_blocks(config: &DistributionConfig) -> Vec<Block> {
    let n_ramps = (config.n_blocks as f64 * config.ramp_fraction).round() as usize;
    (0..config.n_blocks)
        .map(|i| {
            if i < n_ramps {
                Block::ramp(i as u64)
            } else {
                Block::cube(i as u64)
            }
        })
        .collect()
}

impl<R: Rng> BlockDistributor for ArenaDistributor<R> {
    fn distribute_block(
        &mut self,
        grid: &mut ArenaGrid,
        block: &mut Block,
        exclude: &[EntityRef<'_>],
    ) -> Result<DiscreteCoord> {
        match self {
            ArenaDistributor::PowerLaw(d) => d.distribute_block(grid, block, exclude),
            ArenaDistributor::Random(d) => d.distribute_block(grid, block, exclude),
        }
    }

    fn block_clusters(&self) -> &[BlockCluster] {
        match self {
            ArenaDistributor::PowerLaw(d) => d.block_clusters(),
            ArenaDistributor::Random(d) => d.block_clusters(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ArenaDistributor::PowerLaw(d) => d.name(),
            ArenaDistributor::Random(d) => d.name(),
        }
    }
}
