//! # Forage Core
//!
//! Shared types for the Forage foraging-support workspace:
//!
//! - **Geometry**: continuous [`Vec2`](types::Vec2) positions, discrete
//!   cell coordinates, rectangles with an edge-inclusive overlap test
//! - **Arena grid**: fixed-shape cell array plus mutable sub-views that
//!   distributors populate
//! - **Entities**: blocks, caches, and what a cell holds
//! - **Pheromone records**: a robot's decaying memory of blocks and caches
//! - **Errors**: one error enum for the whole workspace
//!
//! ## Quick Start
//!
//! ```rust
//! use forage_core::prelude::*;
//!
//! let grid = ArenaGrid::new(50, 50, 1.0).unwrap();
//! assert_eq!(grid.bounds().extent.area(), 2500);
//!
//! let mut store = DpoStore::default();
//! store.observe_block(Block::cube(1), 0);
//! store.decay_all();
//! assert!(store.blocks.get(&BlockId(1)).unwrap().density.value() < 1.0);
//! ```

pub mod types;
pub mod entity;
pub mod grid;
pub mod pheromone;
pub mod error;
pub mod prelude;
