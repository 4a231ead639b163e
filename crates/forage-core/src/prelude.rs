//! Forage Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use forage_core::prelude::*;
//! ```

pub use crate::types::{
    BlockId, CacheId, Tick,
    Vec2, DiscreteCoord, DiscreteSize, Rect, IntRange,
};

pub use crate::entity::{Block, BlockKind, Cache, CellEntity, EntityRef};

pub use crate::grid::{discretize, grid_cells, ArenaGrid, Cell, GridViewMut, MAX_GRID_CELLS};

pub use crate::pheromone::{
    DecayingMap, DecayingObject, DpoStore,
    PheromoneConfig, PheromoneDensity, Tracked,
};

pub use crate::error::{ConfigError, ForageError, Result};
