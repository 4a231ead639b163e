//! Arena grid: the discretized floor blocks and caches live on.
//!
//! The grid's shape is fixed at construction. Cells are mutable so the
//! arena can record which entity occupies them. Distributors receive a
//! [`GridViewMut`] restricted to the region they own.

use crate::entity::CellEntity;
use crate::error::{ForageError, Result};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// A single grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    entity: Option<CellEntity>,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        self.entity.is_none()
    }

    pub fn entity(&self) -> Option<CellEntity> {
        self.entity
    }
}

/// Largest grid, in cells, that [`ArenaGrid::new`] will allocate.
pub const MAX_GRID_CELLS: usize = 1 << 26;

/// Cell count of an `xdsize` by `ydsize` grid, rejecting empty or oversized
/// shapes.
pub fn grid_cells(xdsize: usize, ydsize: usize) -> Result<usize> {
    if xdsize == 0 || ydsize == 0 {
        return Err(ForageError::invalid_config(
            "grid_size",
            format!("{}x{}", xdsize, ydsize),
            "grid must have at least one cell",
        ));
    }
    match xdsize.checked_mul(ydsize) {
        Some(n) if n <= MAX_GRID_CELLS => Ok(n),
        _ => Err(ForageError::invalid_config(
            "grid_size",
            format!("{}x{}", xdsize, ydsize),
            format!("grid must have at most {} cells", MAX_GRID_CELLS),
        )),
    }
}

/// Cells needed to cover `xsize` by `ysize` meters at `resolution`.
///
/// Sizes too large to count in a `usize` are rejected rather than saturated.
pub fn discretize(xsize: f64, ysize: f64, resolution: f64) -> Result<(usize, usize)> {
    if !(resolution > 0.0) || !resolution.is_finite() {
        return Err(ForageError::invalid_config(
            "resolution",
            resolution.to_string(),
            "must be positive and finite",
        ));
    }
    let cells = |meters: f64| {
        let n = (meters / resolution).round();
        if n.is_finite() && n >= 0.0 && n <= MAX_GRID_CELLS as f64 {
            Ok(n as usize)
        } else {
            Err(ForageError::invalid_config(
                "arena_size",
                format!("{}x{}", xsize, ysize),
                format!("grid must have at most {} cells", MAX_GRID_CELLS),
            ))
        }
    };
    Ok((cells(xsize)?, cells(ysize)?))
}

/// Fixed-shape 2D array of cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaGrid {
    xdsize: usize,
    ydsize: usize,
    resolution: f64,
    cells: Vec<Cell>,
}

impl ArenaGrid {
    /// Create an empty grid of `xdsize` by `ydsize` cells.
    pub fn new(xdsize: usize, ydsize: usize, resolution: f64) -> Result<Self> {
        let n_cells = grid_cells(xdsize, ydsize)?;
        if !(resolution > 0.0) || !resolution.is_finite() {
            return Err(ForageError::invalid_config(
                "resolution",
                resolution.to_string(),
                "must be positive and finite",
            ));
        }
        Ok(Self {
            xdsize,
            ydsize,
            resolution,
            cells: vec![Cell::default(); n_cells],
        })
    }

    /// Create a grid covering an arena of `xsize` by `ysize` meters.
    pub fn from_dimensions(xsize: f64, ysize: f64, resolution: f64) -> Result<Self> {
        let (xdsize, ydsize) = discretize(xsize, ysize, resolution)?;
        Self::new(xdsize, ydsize, resolution)
    }

    pub fn xdsize(&self) -> usize {
        self.xdsize
    }

    pub fn ydsize(&self) -> usize {
        self.ydsize
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// The whole grid as a rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            DiscreteCoord::new(0, 0),
            DiscreteSize::new(self.xdsize, self.ydsize),
        )
    }

    fn index(&self, c: &DiscreteCoord) -> Result<usize> {
        if c.x >= self.xdsize || c.y >= self.ydsize {
            return Err(ForageError::OutOfBounds {
                x: c.x,
                y: c.y,
                xsize: self.xdsize,
                ysize: self.ydsize,
            });
        }
        Ok(c.y * self.xdsize + c.x)
    }

    pub fn access(&self, c: &DiscreteCoord) -> Result<&Cell> {
        let i = self.index(c)?;
        Ok(&self.cells[i])
    }

    /// Record `entity` as occupying `c`, replacing whatever was there.
    pub fn place(&mut self, c: &DiscreteCoord, entity: CellEntity) -> Result<()> {
        let i = self.index(c)?;
        self.cells[i].entity = Some(entity);
        Ok(())
    }

    /// Empty a cell, returning its previous occupant.
    pub fn clear(&mut self, c: &DiscreteCoord) -> Result<Option<CellEntity>> {
        let i = self.index(c)?;
        Ok(self.cells[i].entity.take())
    }

    /// Empty every cell. Used on arena reset.
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(|c| c.entity = None);
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Mutable view restricted to `rect`.
    pub fn subgrid_mut(&mut self, rect: Rect) -> Result<GridViewMut<'_>> {
        if !self.bounds().contains_rect(&rect) {
            return Err(ForageError::OutOfBounds {
                x: rect.xend().saturating_sub(1),
                y: rect.yend().saturating_sub(1),
                xsize: self.xdsize,
                ysize: self.ydsize,
            });
        }
        Ok(GridViewMut { grid: self, rect })
    }

    /// Mutable view of the whole grid.
    pub fn view_mut(&mut self) -> GridViewMut<'_> {
        let rect = self.bounds();
        GridViewMut { grid: self, rect }
    }
}

/// Mutable rectangular window into an [`ArenaGrid`].
///
/// Coordinates are absolute grid coordinates; accesses outside the window
/// are rejected.
#[derive(Debug)]
pub struct GridViewMut<'a> {
    grid: &'a mut ArenaGrid,
    rect: Rect,
}

impl GridViewMut<'_> {
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn resolution(&self) -> f64 {
        self.grid.resolution
    }

    fn check(&self, c: &DiscreteCoord) -> Result<()> {
        if self.rect.contains(c) {
            Ok(())
        } else {
            Err(ForageError::OutOfBounds {
                x: c.x,
                y: c.y,
                xsize: self.rect.xend(),
                ysize: self.rect.yend(),
            })
        }
    }

    pub fn place(&mut self, c: &DiscreteCoord, entity: CellEntity) -> Result<()> {
        self.check(c)?;
        self.grid.place(c, entity)
    }

    /// Cells in the window that are empty or already hold `occupant`,
    /// row-major.
    pub fn available_cells(&self, occupant: CellEntity) -> Vec<DiscreteCoord> {
        self.rect
            .cells()
            .filter(|c| {
                self.grid
                    .access(c)
                    .map(|cell| cell.is_empty() || cell.entity == Some(occupant))
                    .unwrap_or(false)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockId;

    #[test]
    fn rejects_degenerate_grids() {
        assert!(ArenaGrid::new(0, 5, 1.0).is_err());
        assert!(ArenaGrid::new(5, 5, 0.0).is_err());
        assert!(ArenaGrid::new(5, 5, f64::NAN).is_err());
    }

    #[test]
    fn oversized_grids_are_config_errors() {
        assert!(matches!(
            ArenaGrid::new(usize::MAX, 2, 1.0),
            Err(ForageError::Config(_))
        ));
        assert!(matches!(
            ArenaGrid::new(MAX_GRID_CELLS, 2, 1.0),
            Err(ForageError::Config(_))
        ));
        assert!(ArenaGrid::from_dimensions(1e300, 1e300, 1.0).is_err());
        assert!(ArenaGrid::from_dimensions(f64::INFINITY, 5.0, 1.0).is_err());
        assert_eq!(grid_cells(100, 100).unwrap(), 10_000);
    }

    #[test]
    fn from_dimensions_divides_by_resolution() {
        let g = ArenaGrid::from_dimensions(10.0, 6.0, 0.2).unwrap();
        assert_eq!((g.xdsize(), g.ydsize()), (50, 30));
    }

    #[test]
    fn place_and_clear() {
        let mut g = ArenaGrid::new(4, 4, 1.0).unwrap();
        let c = DiscreteCoord::new(2, 3);
        g.place(&c, CellEntity::Block(BlockId(1))).unwrap();
        assert_eq!(g.occupied_count(), 1);
        assert_eq!(g.clear(&c).unwrap(), Some(CellEntity::Block(BlockId(1))));
        assert!(g.access(&c).unwrap().is_empty());
        assert!(g.place(&DiscreteCoord::new(4, 0), CellEntity::Block(BlockId(2))).is_err());
    }

    #[test]
    fn subgrid_is_confined_to_its_window() {
        let mut g = ArenaGrid::new(10, 10, 1.0).unwrap();
        let rect = Rect::new(DiscreteCoord::new(2, 2), DiscreteSize::new(3, 3));
        let mut view = g.subgrid_mut(rect).unwrap();
        let seven = CellEntity::Block(BlockId(7));
        assert_eq!(view.available_cells(seven).len(), 9);
        view.place(&DiscreteCoord::new(3, 3), seven).unwrap();
        assert!(view
            .place(&DiscreteCoord::new(0, 0), CellEntity::Block(BlockId(8)))
            .is_err());
        // a block's own cell stays available to it
        assert_eq!(view.available_cells(seven).len(), 9);
        assert_eq!(view.available_cells(CellEntity::Block(BlockId(8))).len(), 8);
        assert_eq!(g.occupied_count(), 1);
    }

    #[test]
    fn subgrid_outside_bounds_is_rejected() {
        let mut g = ArenaGrid::new(5, 5, 1.0).unwrap();
        let rect = Rect::new(DiscreteCoord::new(3, 3), DiscreteSize::new(3, 3));
        assert!(g.subgrid_mut(rect).is_err());
    }

    #[test]
    fn reset_empties_every_cell() {
        let mut g = ArenaGrid::new(3, 3, 1.0).unwrap();
        g.place(&DiscreteCoord::new(0, 0), CellEntity::Block(BlockId(1)))
            .unwrap();
        g.reset();
        assert_eq!(g.occupied_count(), 0);
    }
}
