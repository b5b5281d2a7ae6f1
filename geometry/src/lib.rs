#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Planar geometry for mine descriptions.
//!
//! Polygons carry integer vertices, so every lattice cell center `(x + 0.5,
//! y + 0.5)` and every vertex is exactly representable in `f64`. The
//! [`Region`] type composes polygons and unit-square cell sets through union
//! and difference without materialising new outlines; membership queries walk
//! the composition instead.

mod polygon;
mod region;

use mine_wrap_core::Cell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use polygon::{Polygon, Vertex};
pub use region::{difference, union, Region};

/// Errors reported by region queries.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// The region contains no lattice cell.
    #[error("region contains no lattice cell")]
    EmptyRegion,
}

/// Point in the continuous plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Center of the provided lattice cell.
    #[must_use]
    pub fn center_of(cell: Cell) -> Self {
        Self {
            x: f64::from(cell.x()) + 0.5,
            y: f64::from(cell.y()) + 0.5,
        }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Lattice cell containing the point, snapping down on both axes.
    #[must_use]
    pub fn cell(&self) -> Cell {
        Cell::new(self.x.floor() as i32, self.y.floor() as i32)
    }
}

/// Relation between a point and a closed region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    /// The point lies in the interior.
    Inside,
    /// The point lies on an edge.
    Boundary,
    /// The point lies outside.
    Outside,
}

impl Location {
    /// Reports whether the point belongs to the closed region.
    #[must_use]
    pub const fn is_contained(self) -> bool {
        !matches!(self, Self::Outside)
    }
}

/// Integer axis-aligned bounding box, `min` inclusive and `max` exclusive in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl Bounds {
    /// Creates bounds from corner coordinates, ordering each axis.
    #[must_use]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Smallest covered `x` coordinate.
    #[must_use]
    pub const fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Smallest covered `y` coordinate.
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Largest covered `x` coordinate.
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.max_x
    }

    /// Largest covered `y` coordinate.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Number of cell columns spanned by the bounds.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.max_x.abs_diff(self.min_x)
    }

    /// Number of cell rows spanned by the bounds.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.max_y.abs_diff(self.min_y)
    }

    /// Smallest bounds enclosing both operands.
    #[must_use]
    pub fn merge(self, other: Bounds) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Reports whether the cell lies within the bounds.
    #[must_use]
    pub const fn contains_cell(&self, cell: Cell) -> bool {
        cell.x() >= self.min_x
            && cell.x() < self.max_x
            && cell.y() >= self.min_y
            && cell.y() < self.max_y
    }

    /// Cells within the bounds in row-major order, bottom row first.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (min_x, max_x) = (self.min_x, self.max_x);
        (self.min_y..self.max_y).flat_map(move |y| (min_x..max_x).map(move |x| Cell::new(x, y)))
    }
}
