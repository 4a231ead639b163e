//! Choosing a known free block to grow into a new cache.

use super::{block_within, cache_within, is_degenerate, Selection};
use crate::matrix::{CacheSelKey, CacheSelMatrix, UsageKind};
use crate::utility::{best_by_utility, Candidate};
use forage_core::prelude::*;
use tracing::debug;

/// Why a new-cache candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    NearCache(CacheId),
    NearBlock(BlockId),
    Excepted,
}

/// Picks the best known block at which to start a new cache.
#[derive(Debug, Clone, Copy)]
pub struct NewCacheSelector<'a> {
    matrix: &'a CacheSelMatrix,
}

impl<'a> NewCacheSelector<'a> {
    pub fn new(matrix: &'a CacheSelMatrix) -> Self {
        Self { matrix }
    }

    /// First rule that rules out `candidate`, checked in order: nearby
    /// cache, nearby block, drop exception.
    pub fn exclusion(&self, store: &DpoStore, candidate: &Block) -> Result<Option<Exclusion>> {
        let Some(loc) = candidate.location else {
            return Ok(None);
        };
        let cache_prox = self.matrix.distance(CacheSelKey::CacheProxDist)?;
        if let Some(id) = cache_within(store, loc, cache_prox) {
            return Ok(Some(Exclusion::NearCache(id)));
        }
        let cluster_prox = self.matrix.distance(CacheSelKey::ClusterProxDist)?;
        if let Some(id) = block_within(store, loc, cluster_prox, Some(candidate.id)) {
            return Ok(Some(Exclusion::NearBlock(id)));
        }
        if self.matrix.is_excepted(candidate.id.0, UsageKind::Drop) {
            return Ok(Some(Exclusion::Excepted));
        }
        Ok(None)
    }

    /// Best new-cache location, or `None` when every known block is
    /// excluded.
    pub fn select(&self, store: &DpoStore, robot: Vec2) -> Result<Option<Selection<BlockId>>> {
        let nest = self.matrix.nest_loc()?;

        let mut scored = Vec::new();
        for rec in store.blocks.iter() {
            let block = &rec.entity;
            let Some(loc) = block.location else {
                continue;
            };
            if let Some(why) = self.exclusion(store, block)? {
                debug!("Excluding {} as new cache: {:?}", block.id, why);
                continue;
            }
            if is_degenerate(loc, robot, nest) {
                continue;
            }
            let candidate = Candidate::NewCache {
                id: block.id,
                location: loc,
                density: rec.density.value(),
            };
            scored.push((block.id, loc, candidate.utility(robot, nest)));
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
        match &best {
            Some(s) => debug!("Selected new cache at {} from {} (utility {:.6})", s.location, s.id, s.utility),
            None => debug!("All {} new cache candidates excluded", store.blocks.len()),
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheSelConfig;

    fn block_at(id: u64, x: usize, y: usize) -> Block {
        let mut b = Block::cube(id);
        b.place_at(DiscreteCoord::new(x, y), 1.0);
        b
    }

    fn matrix() -> CacheSelMatrix {
        CacheSelMatrix::new(&CacheSelConfig {
            nest: Vec2::new(0.0, 0.0),
            cache_prox_dist: 4.0,
            cluster_prox_dist: 2.0,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn block_near_a_cache_is_excluded() {
        let m = matrix();
        let mut store = DpoStore::default();
        store.observe_cache(
            Cache::new(CacheId(1), DiscreteCoord::new(20, 20), 3, 1.0, vec![], 0),
            0,
        );
        store.observe_block(block_at(1, 22, 22), 0);
        assert_eq!(
            NewCacheSelector::new(&m).exclusion(&store, &block_at(1, 22, 22)).unwrap(),
            Some(Exclusion::NearCache(CacheId(1)))
        );
        assert!(NewCacheSelector::new(&m)
            .select(&store, Vec2::new(10.0, 10.0))
            .unwrap()
            .is_none());
    }

    #[test]
    fn neighbouring_blocks_exclude_each_other() {
        let m = matrix();
        let mut store = DpoStore::default();
        store.observe_block(block_at(1, 10, 10), 0);
        store.observe_block(block_at(2, 11, 10), 0);
        store.observe_block(block_at(3, 30, 5), 0);
        let sel = NewCacheSelector::new(&m)
            .select(&store, Vec2::new(20.0, 20.0))
            .unwrap()
            .unwrap();
        assert_eq!(sel.id, BlockId(3));
    }

    #[test]
    fn drop_exception_excludes_candidate() {
        let mut m = matrix();
        let mut store = DpoStore::default();
        store.observe_block(block_at(5, 10, 10), 0);
        m.add_exception(5, UsageKind::Drop);
        let sel = NewCacheSelector::new(&m);
        assert_eq!(
            sel.exclusion(&store, &block_at(5, 10, 10)).unwrap(),
            Some(Exclusion::Excepted)
        );
        assert!(sel.select(&store, Vec2::new(3.0, 3.0)).unwrap().is_none());
    }

    #[test]
    fn isolated_block_is_selected() {
        let m = matrix();
        let mut store = DpoStore::default();
        store.observe_block(block_at(8, 12, 4), 0);
        let sel = NewCacheSelector::new(&m)
            .select(&store, Vec2::new(3.0, 3.0))
            .unwrap()
            .unwrap();
        assert_eq!(sel.id, BlockId(8));
        assert_eq!(sel.location, Vec2::new(12.0, 4.0));
        assert!(sel.utility > 0.0);
    }
}
