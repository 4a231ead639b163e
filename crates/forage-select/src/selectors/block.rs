//! Choosing a free block to pick up.

use super::{is_degenerate, Selection};
use crate::matrix::BlockSelMatrix;
use crate::utility::{best_by_utility, BlockUtility};
use forage_core::prelude::*;
use tracing::debug;

/// Picks the best known free block, weighting each kind by its priority.
#[derive(Debug, Clone, Copy)]
pub struct BlockSelector<'a> {
    matrix: &'a BlockSelMatrix,
}

impl<'a> BlockSelector<'a> {
    pub fn new(matrix: &'a BlockSelMatrix) -> Self {
        Self { matrix }
    }

    pub fn select(&self, store: &DpoStore, robot: Vec2) -> Result<Option<Selection<BlockId>>> {
        let nest = self.matrix.nest_loc()?;

        let mut scored = Vec::new();
        for rec in store.blocks.iter() {
            let block = &rec.entity;
            let Some(loc) = block.location else {
                continue;
            };
            if self.matrix.is_excepted(block.id) {
                debug!("Skipping {}: excepted", block.id);
                continue;
            }
            if is_degenerate(loc, robot, nest) {
                continue;
            }
            let priority = self.matrix.priority(block.kind)?;
            let u = BlockUtility::new(loc, nest).calc(robot, rec.density.value(), priority);
            scored.push((block.id, loc, u));
        }

        let best = best_by_utility(scored.iter().map(|&(id, _, u)| (id, u))).and_then(|(id, utility)| {
            scored
                .iter()
                .find(|(sid, _, _)| *sid == id)
                .map(|&(id, location, _)| Selection {
                    id,
                    location,
                    utility,
                })
        });
        if let Some(s) = &best {
            debug!("Selected {} at {} (utility {:.6})", s.id, s.location, s.utility);
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlockSelConfig;

    fn placed(mut b: Block, x: usize, y: usize) -> Block {
        b.place_at(DiscreteCoord::new(x, y), 1.0);
        b
    }

    fn matrix(cube: f64, ramp: f64) -> BlockSelMatrix {
        BlockSelMatrix::new(&BlockSelConfig {
            nest: Vec2::new(0.0, 0.0),
            cube_priority: cube,
            ramp_priority: ramp,
        })
        .unwrap()
    }

    #[test]
    fn priority_breaks_a_distance_tie() {
        let m = matrix(1.0, 3.0);
        let mut store = DpoStore::default();
        store.observe_block(placed(Block::cube(1), 10, 0), 0);
        store.observe_block(placed(Block::ramp(2), 0, 10), 0);
        let sel = BlockSelector::new(&m)
            .select(&store, Vec2::new(10.0, 10.0))
            .unwrap()
            .unwrap();
        assert_eq!(sel.id, BlockId(2));
    }

    #[test]
    fn closer_block_wins_at_equal_priority() {
        let m = matrix(1.0, 1.0);
        let mut store = DpoStore::default();
        store.observe_block(placed(Block::cube(1), 30, 30), 0);
        store.observe_block(placed(Block::cube(2), 6, 5), 0);
        let sel = BlockSelector::new(&m)
            .select(&store, Vec2::new(5.0, 5.0))
            .unwrap()
            .unwrap();
        assert_eq!(sel.id, BlockId(2));
    }

    #[test]
    fn excepted_and_carried_blocks_are_skipped() {
        let mut m = matrix(1.0, 1.0);
        let mut store = DpoStore::default();
        store.observe_block(placed(Block::cube(1), 6, 5), 0);
        store.observe_block(Block::cube(2), 0);
        m.add_exception(BlockId(1));
        assert!(BlockSelector::new(&m)
            .select(&store, Vec2::new(5.0, 5.0))
            .unwrap()
            .is_none());
    }
}
