//! Utility scorers.
//!
//! Each scorer maps one candidate to a strictly positive scalar combining
//! confidence the object still exists (pheromone density), what it holds,
//! and how convenient it is relative to the robot and the nest. Larger is
//! better.
//!
//! | Candidate      | Utility                                                  |
//! |----------------|----------------------------------------------------------|
//! | Existing cache | `exp(ρ) · blocks / (d(cache, robot) · d(cache, nest))`   |
//! | New cache      | `exp(ρ) / (d(block, robot) · d(block, nest))`            |
//! | Cache site     | `1 / (d(site, robot) · d(site, nest) · exp(deviation))`  |
//! | Block          | `exp(ρ) · priority / (d(block, robot) · d(block, nest))` |
//!
//! A non-positive or non-finite utility means a geometric precondition was
//! violated (most often a robot standing on the candidate). Debug builds
//! panic; release builds log it and return the value unchanged.

use forage_core::prelude::*;
use tracing::error;

fn eval(kind: &str, utility: f64) -> f64 {
    debug_assert!(
        utility > 0.0 && utility.is_finite(),
        "{} utility must be positive and finite, got {}",
        kind,
        utility
    );
    if !(utility > 0.0) || !utility.is_finite() {
        error!("Non-positive {} utility {}", kind, utility);
    }
    utility
}

/// Utility of an existing cache with known contents.
#[derive(Debug, Clone, Copy)]
pub struct ExistingCacheUtility {
    cache_loc: Vec2,
    nest_loc: Vec2,
}

impl ExistingCacheUtility {
    pub fn new(cache_loc: Vec2, nest_loc: Vec2) -> Self {
        Self { cache_loc, nest_loc }
    }

    pub fn calc(&self, robot_loc: Vec2, density: f64, block_count: usize) -> f64 {
        let robot_dist = self.cache_loc.distance_to(&robot_loc);
        let nest_dist = self.cache_loc.distance_to(&self.nest_loc);
        eval(
            "existing cache",
            density.exp() * block_count as f64 / (robot_dist * nest_dist),
        )
    }
}

/// Utility of starting a new cache at a known block.
#[derive(Debug, Clone, Copy)]
pub struct NewCacheUtility {
    cache_loc: Vec2,
    nest_loc: Vec2,
}

impl NewCacheUtility {
    pub fn new(cache_loc: Vec2, nest_loc: Vec2) -> Self {
        Self { cache_loc, nest_loc }
    }

    /// `density` is the confidence that a block still sits at the candidate.
    pub fn calc(&self, robot_loc: Vec2, density: f64) -> f64 {
        let robot_dist = self.cache_loc.distance_to(&robot_loc);
        let nest_dist = self.cache_loc.distance_to(&self.nest_loc);
        eval("new cache", density.exp() / (robot_dist * nest_dist))
    }
}

/// Utility of an empty location as the site of a future cache.
///
/// Sites close to both the robot and the nest, and close to the straight
/// line between them, score highest.
#[derive(Debug, Clone, Copy)]
pub struct CacheSiteUtility {
    robot_loc: Vec2,
    nest_loc: Vec2,
}

impl CacheSiteUtility {
    pub fn new(robot_loc: Vec2, nest_loc: Vec2) -> Self {
        Self { robot_loc, nest_loc }
    }

    pub fn calc(&self, site_loc: Vec2) -> f64 {
        let robot_dist = site_loc.distance_to(&self.robot_loc);
        let nest_dist = site_loc.distance_to(&self.nest_loc);
        let deviation = site_loc.distance_to(&self.robot_loc.midpoint(&self.nest_loc));
        eval(
            "cache site",
            1.0 / (robot_dist * nest_dist * deviation.exp()),
        )
    }
}

/// Utility of a free block for a robot that wants to pick one up.
#[derive(Debug, Clone, Copy)]
pub struct BlockUtility {
    block_loc: Vec2,
    nest_loc: Vec2,
}

impl BlockUtility {
    pub fn new(block_loc: Vec2, nest_loc: Vec2) -> Self {
        Self { block_loc, nest_loc }
    }

    pub fn calc(&self, robot_loc: Vec2, density: f64, priority: f64) -> f64 {
        let robot_dist = self.block_loc.distance_to(&robot_loc);
        let nest_dist = self.block_loc.distance_to(&self.nest_loc);
        eval("block", density.exp() * priority / (robot_dist * nest_dist))
    }
}

/// The closed set of things a robot ranks when choosing where to go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Candidate {
    ExistingCache {
        id: CacheId,
        location: Vec2,
        density: f64,
        block_count: usize,
    },
    NewCache {
        id: BlockId,
        location: Vec2,
        density: f64,
    },
    Site {
        location: Vec2,
    },
}

impl Candidate {
    pub fn location(&self) -> Vec2 {
        match *self {
            Candidate::ExistingCache { location, .. }
            | Candidate::NewCache { location, .. }
            | Candidate::Site { location } => location,
        }
    }

    pub fn utility(&self, robot_loc: Vec2, nest_loc: Vec2) -> f64 {
        match *self {
            Candidate::ExistingCache {
                location,
                density,
                block_count,
                ..
            } => ExistingCacheUtility::new(location, nest_loc).calc(robot_loc, density, block_count),
            Candidate::NewCache {
                location, density, ..
            } => NewCacheUtility::new(location, nest_loc).calc(robot_loc, density),
            Candidate::Site { location } => CacheSiteUtility::new(robot_loc, nest_loc).calc(location),
        }
    }
}

/// Highest-utility entry; equal utilities go to the lowest key.
pub fn best_by_utility<K: Ord + Copy>(scored: impl IntoIterator<Item = (K, f64)>) -> Option<(K, f64)> {
    scored.into_iter().fold(None, |best, (key, u)| match best {
        None => Some((key, u)),
        Some((best_key, best_u)) => {
            if u > best_u || (u == best_u && key < best_key) {
                Some((key, u))
            } else {
                Some((best_key, best_u))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEST: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[test]
    fn existing_cache_regression_value() {
        let u = ExistingCacheUtility::new(Vec2::new(5.0, 5.0), NEST);
        let a = u.calc(Vec2::new(10.0, 10.0), 1.0, 3);
        let b = u.calc(Vec2::new(10.0, 10.0), 1.0, 3);
        assert_eq!(a.to_bits(), b.to_bits());
        assert!((a - 0.1630969097075427).abs() < 1e-15, "got {}", a);
    }

    #[test]
    fn more_blocks_more_utility() {
        let u = ExistingCacheUtility::new(Vec2::new(5.0, 5.0), NEST);
        let robot = Vec2::new(8.0, 2.0);
        assert!(u.calc(robot, 0.5, 4) > u.calc(robot, 0.5, 3));
        assert!(u.calc(robot, 0.6, 3) > u.calc(robot, 0.5, 3));
    }

    #[test]
    fn farther_is_worse() {
        let u = ExistingCacheUtility::new(Vec2::new(5.0, 5.0), NEST);
        assert!(u.calc(Vec2::new(6.0, 6.0), 0.5, 3) > u.calc(Vec2::new(9.0, 9.0), 0.5, 3));
        let near = ExistingCacheUtility::new(Vec2::new(2.0, 2.0), NEST);
        let robot = Vec2::new(3.0, 3.0);
        let far = ExistingCacheUtility::new(Vec2::new(4.0, 4.0), NEST);
        // both one diagonal cell from the robot
        assert!(near.calc(robot, 0.5, 3) > far.calc(robot, 0.5, 3));
    }

    #[test]
    fn new_cache_has_single_block_shape() {
        let loc = Vec2::new(3.0, 4.0);
        let robot = Vec2::new(6.0, 8.0);
        let existing = ExistingCacheUtility::new(loc, NEST).calc(robot, 0.7, 1);
        let fresh = NewCacheUtility::new(loc, NEST).calc(robot, 0.7);
        assert_eq!(existing, fresh);
    }

    #[test]
    fn site_on_the_robot_nest_line_wins() {
        let u = CacheSiteUtility::new(Vec2::new(20.0, 0.0), NEST);
        let on_line = u.calc(Vec2::new(10.0, 1.0));
        let off_line = u.calc(Vec2::new(10.0, 6.0));
        assert!(on_line > off_line);
        assert!(on_line > 0.0);
    }

    #[test]
    fn block_priority_scales_utility() {
        let u = BlockUtility::new(Vec2::new(4.0, 4.0), NEST);
        let robot = Vec2::new(1.0, 7.0);
        assert!(u.calc(robot, 0.5, 2.0) > u.calc(robot, 0.5, 1.0));
    }

    #[test]
    fn candidate_dispatch_matches_scorers() {
        let robot = Vec2::new(9.0, 1.0);
        let c = Candidate::ExistingCache {
            id: CacheId(1),
            location: Vec2::new(4.0, 4.0),
            density: 0.3,
            block_count: 5,
        };
        assert_eq!(
            c.utility(robot, NEST),
            ExistingCacheUtility::new(Vec2::new(4.0, 4.0), NEST).calc(robot, 0.3, 5)
        );
        let s = Candidate::Site {
            location: Vec2::new(3.0, 3.0),
        };
        assert_eq!(s.location(), Vec2::new(3.0, 3.0));
        assert!(s.utility(robot, NEST) > 0.0);
    }

    #[test]
    fn ties_go_to_lowest_key() {
        let best = best_by_utility([(3u64, 1.0), (1, 2.0), (2, 2.0), (0, 0.5)]);
        assert_eq!(best, Some((1, 2.0)));
        let reversed = best_by_utility([(2u64, 2.0), (1, 2.0)]);
        assert_eq!(reversed, Some((1, 2.0)));
        assert_eq!(best_by_utility(Vec::<(u64, f64)>::new()), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "utility must be positive")]
    fn coincident_robot_and_cache_asserts() {
        let loc = Vec2::new(5.0, 5.0);
        ExistingCacheUtility::new(loc, NEST).calc(loc, 1.0, 3);
    }
}
