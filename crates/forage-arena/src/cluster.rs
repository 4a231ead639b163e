//! Block clusters and the sub-distributors that own them.

use crate::distributor::{choose_cell, move_block};
use forage_core::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A candidate cluster during placement search. Discarded once the
/// placement round is accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterPlacement {
    pub origin: DiscreteCoord,
    pub extent: DiscreteSize,
    pub capacity: u32,
}

impl ClusterPlacement {
    pub fn rect(&self) -> Rect {
        Rect::new(self.origin, self.extent)
    }
}

/// Smallest near-square region holding `capacity` cells.
///
/// `width = ceil(sqrt(capacity))`, `height = ceil(capacity / width)`.
pub fn cluster_extent(capacity: u32) -> DiscreteSize {
    let capacity = capacity.max(1) as usize;
    let mut width = (capacity as f64).sqrt().ceil() as usize;
    // guard against sqrt rounding below the true root
    while width * width < capacity {
        width += 1;
    }
    let height = capacity.div_ceil(width);
    DiscreteSize::new(width, height)
}

/// A validated rectangular region of the arena plus the blocks dropped in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockCluster {
    pub id: usize,
    pub rect: Rect,
    pub capacity: u32,
    pub blocks: Vec<BlockId>,
}

impl BlockCluster {
    pub fn new(id: usize, placement: &ClusterPlacement) -> Self {
        Self {
            id,
            rect: placement.rect(),
            capacity: placement.capacity,
            blocks: Vec::new(),
        }
    }

    pub fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_full(&self) -> bool {
        self.blocks.len() >= self.capacity as usize
    }

    pub fn contains_block(&self, id: BlockId) -> bool {
        self.blocks.contains(&id)
    }

    pub fn contains_cell(&self, c: &DiscreteCoord) -> bool {
        self.rect.contains(c)
    }
}

/// Drops blocks inside one cluster's bounds.
#[derive(Debug, Clone)]
pub struct ClusterDistributor {
    cluster: BlockCluster,
}

impl ClusterDistributor {
    pub fn new(cluster: BlockCluster) -> Self {
        Self { cluster }
    }

    pub fn cluster(&self) -> &BlockCluster {
        &self.cluster
    }

    /// Place `block` on a random free cell of the cluster.
    ///
    /// A block already counted in this cluster is moved rather than counted
    /// twice. On failure the grid, the block and the cluster are untouched.
    pub fn distribute_block<R: Rng + ?Sized>(
        &mut self,
        grid: &mut ArenaGrid,
        block: &mut Block,
        exclude: &[EntityRef<'_>],
        rng: &mut R,
    ) -> Result<DiscreteCoord> {
        let region = format!("cluster {}", self.cluster.id);
        let was_member = self.cluster.contains_block(block.id);
        if !was_member && self.cluster.is_full() {
            return Err(ForageError::no_free_cell(format!("{} (full)", region)));
        }
        let view = grid.subgrid_mut(self.cluster.rect)?;
        let cell = choose_cell(&view, block, exclude, rng, &region)?;
        move_block(grid, block, self.cluster.rect, cell, &region)?;
        if !was_member {
            self.cluster.blocks.push(block.id);
        }
        Ok(cell)
    }

    /// Forget a block that was picked up out of the cluster.
    pub fn remove_block(&mut self, id: BlockId) -> bool {
        let before = self.cluster.blocks.len();
        self.cluster.blocks.retain(|b| *b != id);
        before != self.cluster.blocks.len()
    }
}
