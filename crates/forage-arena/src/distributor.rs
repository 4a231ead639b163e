//! The block distributor seam shared by every placement strategy.

use crate::cluster::BlockCluster;
use forage_core::prelude::*;
use rand::Rng;
use tracing::debug;

/// Places blocks on the arena floor.
pub trait BlockDistributor {
    /// Drop `block` on a free cell, skipping cells covered by any entity in
    /// `exclude`. Returns the chosen cell.
    fn distribute_block(
        &mut self,
        grid: &mut ArenaGrid,
        block: &mut Block,
        exclude: &[EntityRef<'_>],
    ) -> Result<DiscreteCoord>;

    /// Clusters blocks are confined to. Empty for unclustered strategies.
    fn block_clusters(&self) -> &[BlockCluster];

    /// Human-readable strategy name, for logs and summaries.
    fn name(&self) -> &'static str;

    /// Distribute every block in turn, stopping at the first failure.
    fn distribute_blocks(
        &mut self,
        grid: &mut ArenaGrid,
        blocks: &mut [Block],
        exclude: &[EntityRef<'_>],
    ) -> Result<Vec<DiscreteCoord>> {
        blocks
            .iter_mut()
            .map(|b| self.distribute_block(grid, b, exclude))
            .collect()
    }
}

/// Take a block off whatever cell it currently rests on.
fn lift_from_grid(grid: &mut ArenaGrid, block: &mut Block) -> Result<()> {
    if let Some(old) = block.dloc {
        if grid.access(&old)?.entity() == Some(CellEntity::Block(block.id)) {
            grid.clear(&old)?;
        }
        block.lift();
    }
    Ok(())
}

/// Pick a uniformly random cell of `view` that is empty, or already holds
/// `block`, and is not covered by anything in `exclude`.
///
/// Nothing is modified, so a failure leaves the grid and the block as they were.
pub(crate) fn choose_cell<R: Rng + ?Sized>(
    view: &GridViewMut<'_>,
    block: &Block,
    exclude: &[EntityRef<'_>],
    rng: &mut R,
    region: &str,
) -> Result<DiscreteCoord> {
    let free: Vec<DiscreteCoord> = view
        .available_cells(CellEntity::Block(block.id))
        .into_iter()
        .filter(|c| !exclude.iter().any(|e| e.covers(c)))
        .collect();
    if free.is_empty() {
        return Err(ForageError::no_free_cell(region));
    }
    Ok(free[rng.gen_range(0..free.len())])
}

/// Move `block` from its current cell (if any) onto `cell` inside `rect`.
pub(crate) fn move_block(
    grid: &mut ArenaGrid,
    block: &mut Block,
    rect: Rect,
    cell: DiscreteCoord,
    region: &str,
) -> Result<DiscreteCoord> {
    lift_from_grid(grid, block)?;
    let mut view = grid.subgrid_mut(rect)?;
    view.place(&cell, CellEntity::Block(block.id))?;
    block.place_at(cell, view.resolution());
    debug!("Dropped {} at {} in {}", block.id, cell, region);
    Ok(cell)
}
