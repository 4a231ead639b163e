//! Whole-arena random distribution, the fallback when clusters can't be placed.

use crate::cluster::BlockCluster;
use crate::distributor::{choose_cell, move_block, BlockDistributor};
use forage_core::prelude::*;
use rand::Rng;

/// Drops each block on a uniformly random free cell anywhere in the arena.
#[derive(Debug, Clone)]
pub struct RandomDistributor<R> {
    rng: R,
}

impl<R: Rng> RandomDistributor<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_rng(self) -> R {
        self.rng
    }
}

impl<R: Rng> BlockDistributor for RandomDistributor<R> {
    fn distribute_block(
        &mut self,
        grid: &mut ArenaGrid,
        block: &mut Block,
        exclude: &[EntityRef<'_>],
    ) -> Result<DiscreteCoord> {
        let bounds = grid.bounds();
        let cell = choose_cell(&grid.view_mut(), block, exclude, &mut self.rng, "arena")?;
        move_block(grid, block, bounds, cell, "arena")
    }

    fn block_clusters(&self) -> &[BlockCluster] {
        &[]
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
