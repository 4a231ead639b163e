//! # Forage Arena
//!
//! Block distribution for arena (re)initialization.
//!
//! The centerpiece is the [`PowerLawDistributor`](powerlaw_distributor::PowerLawDistributor):
//! it draws cluster capacities from a binned power law, places the clusters
//! in the grid by rejection sampling with an edge-inclusive overlap test, and
//! then drops blocks through one sub-distributor per cluster. When placement
//! runs out of attempts, [`ArenaDistributor`](dispatch::ArenaDistributor)
//! falls back to uniformly random distribution.
//!
//! ```rust
//! use forage_arena::prelude::*;
//! use forage_core::prelude::*;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut grid = ArenaGrid::new(50, 50, 1.0).unwrap();
//! let mut dist = PowerLawDistributor::configure(2, 4, 3, 1.0, ChaCha8Rng::seed_from_u64(1)).unwrap();
//! dist.map_clusters(&grid).unwrap();
//!
//! let mut block = Block::cube(0);
//! dist.distribute_block(&mut grid, &mut block, &[]).unwrap();
//! assert!(block.is_placed());
//! ```

pub mod config;
pub mod powerlaw;
pub mod cluster;
pub mod distributor;
pub mod random;
pub mod powerlaw_distributor;
pub mod dispatch;
pub mod prelude;
