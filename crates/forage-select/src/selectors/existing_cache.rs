//! Choosing among known caches.

use super::{is_degenerate, Selection};
use crate::matrix::{CacheSelKey, CacheSelMatrix, SelValue, UsageKind};
use crate::utility::{best_by_utility, Candidate};
use forage_core::prelude::*;
use tracing::debug;

/// Picks the best known cache to pick up from or drop into.
#[derive(Debug, Clone, Copy)]
pub struct ExistingCacheSelector<'a> {
    matrix: &'a CacheSelMatrix,
}

impl<'a> ExistingCacheSelector<'a> {
    pub fn new(matrix: &'a CacheSelMatrix) -> Self {
        Self { matrix }
    }

    /// Best cache for `usage`, or `None` when no known cache qualifies.
    ///
    /// Caches that are excepted, fail the pickup policy, hold no blocks, or
    /// sit on the robot or the nest are skipped.
    pub fn select(
        &self,
        store: &DpoStore,
        robot: Vec2,
        now: Tick,
        usage: UsageKind,
    ) -> Result<Option<Selection<CacheId>>> {
        let nest = self.matrix.nest_loc()?;
        let policy = self
            .matrix
            .lookup_as(CacheSelKey::PickupPolicy, SelValue::as_policy)?;

        let scored = store.caches.iter().filter_map(|rec| {
            let cache = &rec.entity;
            if self.matrix.is_excepted(cache.id.0, usage) {
                debug!("Skipping {}: {:?} exception", cache.id, usage);
                return None;
            }
            if usage == UsageKind::Pickup && !policy.allows(cache, now) {
                debug!("Skipping {}: pickup policy {:?}", cache.id, policy);
                return None;
            }
            if cache.n_blocks() == 0 {
                debug!("Skipping {}: no blocks", cache.id);
                return None;
            }
            if is_degenerate(cache.location, robot, nest) {
                return None;
            }
            let candidate = Candidate::ExistingCache {
                id: cache.id,
                location: cache.location,
                density: rec.density.value(),
                block_count: cache.n_blocks(),
            };
            Some((cache.id, candidate.utility(robot, nest)))
        });

        let best = best_by_utility(scored).and_then(|(id, utility)| {
            store.caches.get(&id).map(|rec| Selection {
                id,
                location: rec.entity.location,
                utility,
            })
        });
        match &best {
            Some(s) => debug!("Selected {} at {} (utility {:.6})", s.id, s.location, s.utility),
            None => debug!("No existing cache eligible for {:?}", usage),
        }
        Ok(best)
    }
}
