//! Boolean compositions of polygons and cell sets.

use std::collections::BTreeSet;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::sync::Arc;

use mine_wrap_core::Cell;

use crate::{Bounds, GeometryError, Location, Point, Polygon};

/// Distance from a boundary point at which its surrounding sectors are sampled.
///
/// Far below the spacing between a half-integer cell center and any edge with
/// integer vertices that misses it.
const SECTOR_RADIUS: f64 = 1e-6;
const ANGLE_TOLERANCE: f64 = 1e-12;

/// Closed planar point set built from polygons through union and difference.
///
/// Regions are immutable values; clones share their operands. Emptiness,
/// cell enumeration and representative points are resolved on the lattice:
/// a region is empty when no cell center lies inside it.
#[derive(Clone, Debug, Default)]
pub struct Region {
    shape: Shape,
}

#[derive(Clone, Debug, Default)]
enum Shape {
    #[default]
    Empty,
    Polygon(Arc<Polygon>),
    Cells(Arc<BTreeSet<Cell>>),
    Union(Arc<[Region]>),
    Difference(Arc<Region>, Arc<Region>),
}

/// Union of the provided polygons.
#[must_use]
pub fn union(polygons: impl IntoIterator<Item = Polygon>) -> Region {
    Region::union(polygons.into_iter().map(Region::from))
}

/// Points of `a` that are not interior to `b`.
#[must_use]
pub fn difference(a: &Region, b: &Region) -> Region {
    a.difference(b)
}

impl Region {
    /// Region containing no points.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Union of the unit squares of the provided cells.
    #[must_use]
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self::from_cell_set(Arc::new(cells.into_iter().collect()))
    }

    /// Union of unit squares backed by a shared cell set.
    #[must_use]
    pub fn from_cell_set(cells: Arc<BTreeSet<Cell>>) -> Self {
        if cells.is_empty() {
            return Self::empty();
        }
        Self {
            shape: Shape::Cells(cells),
        }
    }

    /// Union of the provided regions. Empty operands are dropped.
    #[must_use]
    pub fn union(regions: impl IntoIterator<Item = Region>) -> Self {
        let mut members: Vec<Region> = regions
            .into_iter()
            .filter(|region| !matches!(region.shape, Shape::Empty))
            .collect();

        match members.len() {
            0 => Self::empty(),
            1 => members.swap_remove(0),
            _ => Self {
                shape: Shape::Union(members.into()),
            },
        }
    }

    /// Points of `self` that are not interior to `other`.
    #[must_use]
    pub fn difference(&self, other: &Region) -> Self {
        match (&self.shape, &other.shape) {
            (Shape::Empty, _) => Self::empty(),
            (_, Shape::Empty) => self.clone(),
            _ => Self {
                shape: Shape::Difference(Arc::new(self.clone()), Arc::new(other.clone())),
            },
        }
    }

    /// Classifies the point against the region.
    ///
    /// A point on an operand's edge is settled by the sectors around it that
    /// the edges through the point carve out. Edges shared by touching
    /// operands are interior when every sector is covered, and an edge whose
    /// every sector is removed is outside.
    #[must_use]
    pub fn locate(&self, point: Point) -> Location {
        self.classify(point, true)
    }

    fn classify(&self, point: Point, settle: bool) -> Location {
        let location = match &self.shape {
            Shape::Empty => return Location::Outside,
            Shape::Polygon(polygon) => return polygon.locate(point),
            Shape::Cells(cells) => return locate_in_cells(cells, point),
            Shape::Union(members) => {
                let mut location = Location::Outside;
                for member in members.iter() {
                    match member.classify(point, settle) {
                        Location::Inside => return Location::Inside,
                        Location::Boundary => location = Location::Boundary,
                        Location::Outside => {}
                    }
                }
                location
            }
            Shape::Difference(kept, removed) => {
                match (kept.classify(point, settle), removed.classify(point, settle)) {
                    (Location::Outside, _) | (_, Location::Inside) => Location::Outside,
                    (Location::Inside, Location::Outside) => Location::Inside,
                    _ => Location::Boundary,
                }
            }
        };

        if settle && location == Location::Boundary {
            self.settle_boundary(point)
        } else {
            location
        }
    }

    fn settle_boundary(&self, point: Point) -> Location {
        let mut angles = Vec::new();
        self.collect_edge_angles(point, &mut angles);

        let samples = sector_samples(point, angles);
        let covered = samples
            .iter()
            .filter(|sample| self.classify(**sample, false).is_contained())
            .count();

        if covered == samples.len() {
            Location::Inside
        } else if covered == 0 {
            Location::Outside
        } else {
            Location::Boundary
        }
    }

    fn collect_edge_angles(&self, point: Point, angles: &mut Vec<f64>) {
        match &self.shape {
            Shape::Empty => {}
            Shape::Polygon(polygon) => polygon.edge_angles_at(point, angles),
            Shape::Cells(_) => {
                if point.x().fract() == 0.0 {
                    angles.extend([FRAC_PI_2, -FRAC_PI_2]);
                }
                if point.y().fract() == 0.0 {
                    angles.extend([0.0, PI]);
                }
            }
            Shape::Union(members) => {
                for member in members.iter() {
                    member.collect_edge_angles(point, angles);
                }
            }
            Shape::Difference(kept, removed) => {
                kept.collect_edge_angles(point, angles);
                removed.collect_edge_angles(point, angles);
            }
        }
    }

    /// Reports whether the point lies in the interior or on the boundary.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.locate(point).is_contained()
    }

    /// Reports whether the center of the cell lies in the region.
    #[must_use]
    pub fn contains_cell(&self, cell: Cell) -> bool {
        self.contains(Point::center_of(cell))
    }

    /// Integer bounds enclosing the region, `None` when trivially empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        match &self.shape {
            Shape::Empty => None,
            Shape::Polygon(polygon) => polygon.bounds(),
            Shape::Cells(cells) => {
                let mut iter = cells.iter();
                let first = iter.next()?;
                let seed = Bounds::new(first.x(), first.y(), first.x() + 1, first.y() + 1);
                Some(iter.fold(seed, |bounds, cell| {
                    bounds.merge(Bounds::new(cell.x(), cell.y(), cell.x() + 1, cell.y() + 1))
                }))
            }
            Shape::Union(members) => members
                .iter()
                .filter_map(Region::bounds)
                .reduce(Bounds::merge),
            Shape::Difference(kept, _) => kept.bounds(),
        }
    }

    /// Cells whose centers lie in the region, bottom row first.
    #[must_use]
    pub fn cells(&self) -> Vec<Cell> {
        self.bounds().map_or_else(Vec::new, |bounds| {
            bounds.cells().filter(|cell| self.contains_cell(*cell)).collect()
        })
    }

    /// Number of cells whose centers lie in the region.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.bounds().map_or(0, |bounds| {
            bounds.cells().filter(|cell| self.contains_cell(*cell)).count()
        })
    }

    /// Reports whether no cell center lies in the region.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds()
            .map_or(true, |bounds| !bounds.cells().any(|cell| self.contains_cell(cell)))
    }

    /// Cell center guaranteed to lie in the region.
    ///
    /// Scans rows outward from the middle of the bounding box; in the first
    /// row holding a cell center strictly inside the region, returns the
    /// center of the middle cell of the widest contiguous run of such cells.
    /// Centers on the boundary are only chosen when no center lies inside.
    pub fn representative_point(&self) -> Result<Point, GeometryError> {
        let bounds = self.bounds().ok_or(GeometryError::EmptyRegion)?;
        let doubled_middle = i64::from(bounds.min_y()) + i64::from(bounds.max_y());

        let mut rows: Vec<i32> = (bounds.min_y()..bounds.max_y()).collect();
        rows.sort_by_key(|row| ((2 * i64::from(*row) + 1 - doubled_middle).abs(), *row));

        for strict in [true, false] {
            for &row in &rows {
                if let Some(cell) =
                    widest_run_middle(self, row, bounds.min_x(), bounds.max_x(), strict)
                {
                    return Ok(Point::center_of(cell));
                }
            }
        }

        Err(GeometryError::EmptyRegion)
    }
}

impl From<Polygon> for Region {
    fn from(polygon: Polygon) -> Self {
        if polygon.is_degenerate() {
            return Self::empty();
        }
        Self {
            shape: Shape::Polygon(Arc::new(polygon)),
        }
    }
}

fn widest_run_middle(
    region: &Region,
    row: i32,
    min_x: i32,
    max_x: i32,
    strict: bool,
) -> Option<Cell> {
    let mut best: Option<(i32, u32)> = None;
    let mut run_start: Option<i32> = None;

    for x in min_x..=max_x {
        let inside = x < max_x && {
            let location = region.locate(Point::center_of(Cell::new(x, row)));
            if strict {
                location == Location::Inside
            } else {
                location.is_contained()
            }
        };
        match (inside, run_start) {
            (true, None) => run_start = Some(x),
            (false, Some(start)) => {
                let length = x.abs_diff(start);
                if best.map_or(true, |(_, best_length)| length > best_length) {
                    best = Some((start, length));
                }
                run_start = None;
            }
            _ => {}
        }
    }

    best.map(|(start, length)| Cell::new(start + ((length - 1) / 2) as i32, row))
}

/// Points just off `point` in the middle of each sector between consecutive
/// edge directions.
fn sector_samples(point: Point, mut angles: Vec<f64>) -> Vec<Point> {
    angles.sort_by(f64::total_cmp);
    angles.dedup_by(|later, earlier| (*later - *earlier).abs() < ANGLE_TOLERANCE);
    let wraps = match (angles.first(), angles.last()) {
        (Some(first), Some(last)) => {
            angles.len() > 1 && (first + TAU - last).abs() < ANGLE_TOLERANCE
        }
        _ => false,
    };
    if wraps {
        let _ = angles.pop();
    }
    if angles.is_empty() {
        angles.push(0.0);
    }

    let count = angles.len();
    (0..count)
        .map(|index| {
            let start = angles[index];
            let end = if index + 1 < count {
                angles[index + 1]
            } else {
                angles[0] + TAU
            };
            let middle = (start + end) / 2.0;
            Point::new(
                point.x() + SECTOR_RADIUS * middle.cos(),
                point.y() + SECTOR_RADIUS * middle.sin(),
            )
        })
        .collect()
}

fn locate_in_cells(cells: &BTreeSet<Cell>, point: Point) -> Location {
    let columns = touching_indices(point.x());
    let rows = touching_indices(point.y());

    let mut total = 0;
    let mut present = 0;
    for &y in rows.iter().flatten() {
        for &x in columns.iter().flatten() {
            total += 1;
            if cells.contains(&Cell::new(x, y)) {
                present += 1;
            }
        }
    }

    if present == 0 {
        Location::Outside
    } else if present == total {
        Location::Inside
    } else {
        Location::Boundary
    }
}

/// Unit intervals whose closure holds the coordinate: one, or two on a grid line.
fn touching_indices(coordinate: f64) -> [Option<i32>; 2] {
    let floor = coordinate.floor();
    let index = floor as i32;
    if floor == coordinate {
        [Some(index - 1), Some(index)]
    } else {
        [Some(index), None]
    }
}
