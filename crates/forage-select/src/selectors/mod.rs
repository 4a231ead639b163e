//! Selectors: rank every known candidate of one kind and pick the best.
//!
//! Each selector filters candidates through its matrix's exclusion rules,
//! scores the survivors with the matching utility, and returns the
//! maximum. Candidates are visited in ascending id order and equal
//! utilities resolve to the lowest id, so a selection is a pure function
//! of its inputs.

pub mod block;
pub mod cache_site;
pub mod existing_cache;
pub mod new_cache;

pub use block::BlockSelector;
pub use cache_site::CacheSiteSelector;
pub use existing_cache::ExistingCacheSelector;
pub use new_cache::NewCacheSelector;

use forage_core::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection<K> {
    pub id: K,
    pub location: Vec2,
    pub utility: f64,
}

/// A candidate whose utility would be unbounded: the robot or the nest sits
/// exactly on it.
pub(crate) fn is_degenerate(location: Vec2, robot: Vec2, nest: Vec2) -> bool {
    location.distance_to(&robot) == 0.0 || location.distance_to(&nest) == 0.0
}

/// First known cache within `dist` of `loc`.
pub(crate) fn cache_within(store: &DpoStore, loc: Vec2, dist: f64) -> Option<CacheId> {
    store
        .caches
        .iter()
        .find(|rec| rec.entity.location.distance_to(&loc) <= dist)
        .map(|rec| rec.id())
}

/// First known block other than `skip` within `dist` of `loc`.
pub(crate) fn block_within(
    store: &DpoStore,
    loc: Vec2,
    dist: f64,
    skip: Option<BlockId>,
) -> Option<BlockId> {
    store
        .blocks
        .iter()
        .filter(|rec| Some(rec.id()) != skip)
        .find(|rec| {
            rec.entity
                .location
                .is_some_and(|b| b.distance_to(&loc) <= dist)
        })
        .map(|rec| rec.id())
}
