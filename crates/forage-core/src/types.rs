//! Shared types used across all Forage crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Unique identifier for a block in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block-{}", self.0)
    }
}

/// Unique identifier for a cache in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheId(pub u64);

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cache-{}", self.0)
    }
}

/// The current timestep of the simulation.
pub type Tick = u64;

/// A continuous position in the arena, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x.powi(2) + self.y.powi(2)).sqrt()
    }

    pub fn distance_to(&self, other: &Vec2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(&self, other: &Vec2) -> Vec2 {
        (*self + *other) / 2.0
    }

    /// The grid cell containing this position.
    ///
    /// Negative coordinates clamp to the first row/column.
    pub fn to_discrete(&self, resolution: f64) -> DiscreteCoord {
        DiscreteCoord::new(
            (self.x / resolution).floor().max(0.0) as usize,
            (self.y / resolution).floor().max(0.0) as usize,
        )
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// A cell coordinate in the arena grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct DiscreteCoord {
    pub x: usize,
    pub y: usize,
}

impl DiscreteCoord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Real-valued position of this cell's origin corner.
    pub fn to_real(&self, resolution: f64) -> Vec2 {
        Vec2::new(self.x as f64 * resolution, self.y as f64 * resolution)
    }
}

impl fmt::Display for DiscreteCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Width and height of a rectangular region, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DiscreteSize {
    pub width: usize,
    pub height: usize,
}

impl DiscreteSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// An axis-aligned rectangle of grid cells.
///
/// Covers cells `origin.x..origin.x + width` by `origin.y..origin.y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub origin: DiscreteCoord,
    pub extent: DiscreteSize,
}

impl Rect {
    pub fn new(origin: DiscreteCoord, extent: DiscreteSize) -> Self {
        Self { origin, extent }
    }

    /// One past the last covered column.
    pub fn xend(&self) -> usize {
        self.origin.x + self.extent.width
    }

    /// One past the last covered row.
    pub fn yend(&self) -> usize {
        self.origin.y + self.extent.height
    }

    pub fn contains(&self, c: &DiscreteCoord) -> bool {
        c.x >= self.origin.x && c.x < self.xend() && c.y >= self.origin.y && c.y < self.yend()
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.origin.x >= self.origin.x
            && other.origin.y >= self.origin.y
            && other.xend() <= self.xend()
            && other.yend() <= self.yend()
    }

    /// Intersection test that counts shared edges as overlap.
    ///
    /// Two rectangles that pass this test as disjoint are separated by at
    /// least one empty row or column of cells.
    pub fn overlaps_inclusive(&self, other: &Rect) -> bool {
        self.origin.x <= other.xend()
            && other.origin.x <= self.xend()
            && self.origin.y <= other.yend()
            && other.origin.y <= self.yend()
    }

    /// All covered cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = DiscreteCoord> + '_ {
        (self.origin.y..self.yend())
            .flat_map(move |y| (self.origin.x..self.xend()).map(move |x| DiscreteCoord::new(x, y)))
    }

    /// Real-valued center of the rectangle.
    pub fn center(&self, resolution: f64) -> Vec2 {
        Vec2::new(
            (self.origin.x as f64 + self.extent.width as f64 / 2.0) * resolution,
            (self.origin.y as f64 + self.extent.height as f64 / 2.0) * resolution,
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..[{}, {}]",
            self.origin,
            self.xend(),
            self.yend()
        )
    }
}

/// Inclusive integer range `[lb, ub]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntRange {
    pub lb: i64,
    pub ub: i64,
}

impl IntRange {
    pub fn new(lb: i64, ub: i64) -> Self {
        Self { lb, ub }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.lb as f64 && v <= self.ub as f64
    }

    pub fn span(&self) -> i64 {
        self.ub - self.lb
    }

    pub fn is_empty(&self) -> bool {
        self.ub < self.lb
    }
}

impl fmt::Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lb, self.ub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: usize, y: usize, w: usize, h: usize) -> Rect {
        Rect::new(DiscreteCoord::new(x, y), DiscreteSize::new(w, h))
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!((b - a).length(), 5.0);
    }

    #[test]
    fn midpoint_halves_the_segment() {
        let m = Vec2::new(0.0, 0.0).midpoint(&Vec2::new(10.0, 4.0));
        assert_eq!(m, Vec2::new(5.0, 2.0));
    }

    #[test]
    fn discrete_conversion_round_trips_on_cell_origins() {
        let c = DiscreteCoord::new(7, 3);
        assert_eq!(c.to_real(0.5).to_discrete(0.5), c);
        assert_eq!(Vec2::new(-1.0, 2.2).to_discrete(1.0), DiscreteCoord::new(0, 2));
    }

    #[test]
    fn touching_rectangles_overlap() {
        // a covers columns 0..=1, b starts at column 2
        let a = rect(0, 0, 2, 2);
        let b = rect(2, 0, 2, 2);
        assert!(a.overlaps_inclusive(&b));
        assert!(b.overlaps_inclusive(&a));
    }

    #[test]
    fn one_cell_gap_is_disjoint() {
        let a = rect(0, 0, 2, 2);
        let b = rect(3, 0, 2, 2);
        assert!(!a.overlaps_inclusive(&b));
        let c = rect(0, 3, 2, 2);
        assert!(!a.overlaps_inclusive(&c));
    }

    #[test]
    fn rect_cells_and_containment() {
        let r = rect(1, 1, 3, 2);
        assert_eq!(r.cells().count(), 6);
        assert!(r.cells().all(|c| r.contains(&c)));
        assert!(!r.contains(&DiscreteCoord::new(4, 1)));
        assert!(rect(0, 0, 10, 10).contains_rect(&r));
        assert!(!r.contains_rect(&rect(0, 0, 10, 10)));
    }

    #[test]
    fn int_range_contains_bounds() {
        let r = IntRange::new(2, 8);
        assert!(r.contains(2.0));
        assert!(r.contains(8.0));
        assert!(!r.contains(8.5));
        assert_eq!(r.span(), 6);
        assert!(IntRange::new(3, 1).is_empty());
    }
}
