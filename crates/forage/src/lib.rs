//! # Forage
//!
//! Arena setup and decision making for multi-robot foraging.
//!
//! Robots gather blocks scattered across a rectangular arena and bring them
//! back to a nest, optionally routing them through caches. Forage covers two
//! halves of that problem:
//!
//! - laying out blocks at (re)initialization, clustered with sizes drawn from
//!   a power law
//! - choosing, from what a robot believes about the arena, the best cache,
//!   new cache, cache site or block to head for
//!
//! ## Quick Start
//!
//! ```rust
//! use forage::prelude::*;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! // Lay out three power-law clusters and fill them
//! let mut grid = ArenaGrid::new(50, 50, 1.0).unwrap();
//! let mut dist = PowerLawDistributor::configure(2, 4, 3, 1.0, ChaCha8Rng::seed_from_u64(7)).unwrap();
//! dist.map_clusters(&grid).unwrap();
//!
//! let mut blocks: Vec<Block> = (0..8).map(Block::cube).collect();
//! dist.distribute_blocks(&mut grid, &mut blocks, &[]).unwrap();
//!
//! // A robot that has seen every block picks a spot for a new cache
//! let mut store = DpoStore::default();
//! for b in &blocks {
//!     store.observe_block(b.clone(), 0);
//! }
//! let matrix = CacheSelMatrix::new(&CacheSelConfig::default()).unwrap();
//! let choice = NewCacheSelector::new(&matrix)
//!     .select(&store, Vec2::new(40.5, 40.5))
//!     .unwrap();
//!
//! if let Some(sel) = choice {
//!     println!("start a cache at {} (utility {:.4})", sel.location, sel.utility);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`forage_core`] - Geometry, blocks and caches, the arena grid, decaying
//!   object records, errors
//! - [`forage_arena`] - Power-law sampler, cluster placement, block
//!   distributors
//! - [`forage_select`] - Selection matrices, utility scorers, selectors
//!
//! ## Key Concepts
//!
//! ### Power-law clusters
//!
//! Cluster capacities are powers of two `2^k`, `k ∈ [min_power, max_power]`,
//! drawn so small clusters are common and large ones rare. Clusters are placed
//! with at least one empty cell between any two of them.
//!
//! ### Utilities
//!
//! | Candidate | Rewards | Penalizes |
//! |-----------|---------|-----------|
//! | Existing cache | pheromone density, block count | distance to robot and nest |
//! | New cache | pheromone density | distance to robot and nest |
//! | Cache site | - | distance to robot, nest, and the path between them |
//! | Block | pheromone density, kind priority | distance to robot and nest |
//!
//! ### Exceptions
//!
//! After a failed pickup or drop, the robot excepts that object so the next
//! selection skips it. Exceptions last until the matrix is cleared.

// Re-export all subcrates
pub use forage_core as core;
pub use forage_arena as arena;
pub use forage_select as select;

/// Prelude module for convenient imports.
///
/// ```rust
/// use forage::prelude::*;
/// ```
pub mod prelude {
    pub use forage_core::prelude::*;
    pub use forage_arena::prelude::*;
    pub use forage_select::prelude::*;
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
