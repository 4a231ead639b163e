//! Blocks and caches: the task objects robots collect, and the depots
//! that aggregate them.

use crate::types::*;
use serde::{Deserialize, Serialize};

/// Shape of a block. Kinds carry different selection priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Cube,
    Ramp,
}

/// A discrete task object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    /// Cell the block rests on; `None` while carried or not yet distributed.
    pub dloc: Option<DiscreteCoord>,
    pub location: Option<Vec2>,
}

impl Block {
    pub fn new(id: BlockId, kind: BlockKind) -> Self {
        Self {
            id,
            kind,
            dloc: None,
            location: None,
        }
    }

    pub fn cube(id: u64) -> Self {
        Self::new(BlockId(id), BlockKind::Cube)
    }

    pub fn ramp(id: u64) -> Self {
        Self::new(BlockId(id), BlockKind::Ramp)
    }

    /// Put the block down on a cell.
    pub fn place_at(&mut self, dloc: DiscreteCoord, resolution: f64) {
        self.dloc = Some(dloc);
        self.location = Some(dloc.to_real(resolution));
    }

    /// Lift the block out of the arena (pickup).
    pub fn lift(&mut self) {
        self.dloc = None;
        self.location = None;
    }

    pub fn is_placed(&self) -> bool {
        self.dloc.is_some()
    }

    pub fn footprint(&self) -> Option<Rect> {
        self.dloc.map(|d| Rect::new(d, DiscreteSize::new(1, 1)))
    }
}

/// A depot aggregating several blocks at one arena location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cache {
    pub id: CacheId,
    /// Center cell.
    pub dloc: DiscreteCoord,
    pub location: Vec2,
    /// Side length of the square footprint, in cells.
    pub extent: usize,
    pub blocks: Vec<BlockId>,
    pub creation_tick: Tick,
}

impl Cache {
    pub fn new(
        id: CacheId,
        dloc: DiscreteCoord,
        extent: usize,
        resolution: f64,
        blocks: Vec<BlockId>,
        creation_tick: Tick,
    ) -> Self {
        Self {
            id,
            dloc,
            location: dloc.to_real(resolution),
            extent: extent.max(1),
            blocks,
            creation_tick,
        }
    }

    pub fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Timesteps since the cache was created.
    pub fn age(&self, now: Tick) -> Tick {
        now.saturating_sub(self.creation_tick)
    }

    pub fn contains_block(&self, id: BlockId) -> bool {
        self.blocks.contains(&id)
    }

    /// Square of cells centered on `dloc`, clipped at the grid origin.
    pub fn footprint(&self) -> Rect {
        let half = self.extent / 2;
        Rect::new(
            DiscreteCoord::new(self.dloc.x.saturating_sub(half), self.dloc.y.saturating_sub(half)),
            DiscreteSize::new(self.extent, self.extent),
        )
    }
}

/// What a grid cell currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellEntity {
    Block(BlockId),
    Cache(CacheId),
}

/// Borrowed view of an arena entity, used to mark cells as unavailable.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Block(&'a Block),
    Cache(&'a Cache),
}

impl EntityRef<'_> {
    /// Cells the entity occupies; `None` for a block that is not on the floor.
    pub fn footprint(&self) -> Option<Rect> {
        match self {
            EntityRef::Block(b) => b.footprint(),
            EntityRef::Cache(c) => Some(c.footprint()),
        }
    }

    /// Whether the entity covers `cell`.
    pub fn covers(&self, cell: &DiscreteCoord) -> bool {
        self.footprint().is_some_and(|r| r.contains(cell))
    }
}
