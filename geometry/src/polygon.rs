//! Simple polygons with integer vertices.

use mine_wrap_core::Cell;
use serde::{Deserialize, Serialize};

use crate::{Bounds, Location, Point};

/// Lattice point used as a polygon corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
    x: i32,
    y: i32,
}

impl Vertex {
    /// Creates a vertex from integer coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

/// Ordered ring of integer vertices describing a simple polygon.
///
/// The ring is implicitly closed; a trailing vertex equal to the first one is
/// dropped on construction. Rings with fewer than three vertices or zero area
/// are degenerate and contain no points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Vertex>,
}

impl Polygon {
    /// Creates a polygon from its ring of vertices.
    #[must_use]
    pub fn new(mut vertices: Vec<Vertex>) -> Self {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            let _ = vertices.pop();
        }
        Self { vertices }
    }

    /// Axis-aligned rectangle spanning the two corners.
    #[must_use]
    pub fn rectangle(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let bounds = Bounds::new(x0, y0, x1, y1);
        Self::new(vec![
            Vertex::new(bounds.min_x(), bounds.min_y()),
            Vertex::new(bounds.max_x(), bounds.min_y()),
            Vertex::new(bounds.max_x(), bounds.max_y()),
            Vertex::new(bounds.min_x(), bounds.max_y()),
        ])
    }

    /// Unit square covering a single lattice cell.
    #[must_use]
    pub fn unit_square(cell: Cell) -> Self {
        Self::rectangle(cell.x(), cell.y(), cell.x() + 1, cell.y() + 1)
    }

    /// Vertices in ring order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Twice the signed area; positive for counter-clockwise rings.
    #[must_use]
    pub fn doubled_signed_area(&self) -> i64 {
        self.edges()
            .map(|(a, b)| i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y))
            .sum()
    }

    /// Reports whether the ring encloses no area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3 || self.doubled_signed_area() == 0
    }

    /// Bounding box of the vertices, `None` for an empty ring.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.vertices.first()?;
        let mut bounds = Bounds::new(first.x, first.y, first.x, first.y);
        for vertex in &self.vertices[1..] {
            bounds = bounds.merge(Bounds::new(vertex.x, vertex.y, vertex.x, vertex.y));
        }
        Some(bounds)
    }

    /// Classifies the point against the closed polygon using the even-odd rule.
    #[must_use]
    pub fn locate(&self, point: Point) -> Location {
        if self.is_degenerate() {
            return Location::Outside;
        }

        let (px, py) = (point.x(), point.y());
        let mut inside = false;
        for (a, b) in self.edges() {
            let (ax, ay) = (f64::from(a.x), f64::from(a.y));
            let (bx, by) = (f64::from(b.x), f64::from(b.y));

            if on_segment((ax, ay), (bx, by), (px, py)) {
                return Location::Boundary;
            }

            if (ay > py) != (by > py) {
                let crossing = ax + (py - ay) * (bx - ax) / (by - ay);
                if px < crossing {
                    inside = !inside;
                }
            }
        }

        if inside {
            Location::Inside
        } else {
            Location::Outside
        }
    }

    /// Pushes the angles of every edge direction leaving `point` along the ring.
    ///
    /// A point inside an edge contributes both directions of that edge; a
    /// vertex contributes the direction of each incident edge.
    pub(crate) fn edge_angles_at(&self, point: Point, angles: &mut Vec<f64>) {
        if self.is_degenerate() {
            return;
        }

        let (px, py) = (point.x(), point.y());
        for (a, b) in self.edges() {
            let (ax, ay) = (f64::from(a.x), f64::from(a.y));
            let (bx, by) = (f64::from(b.x), f64::from(b.y));
            if !on_segment((ax, ay), (bx, by), (px, py)) {
                continue;
            }
            for (ex, ey) in [(ax, ay), (bx, by)] {
                if (ex, ey) != (px, py) {
                    angles.push((ey - py).atan2(ex - px));
                }
            }
        }
    }

    fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        let count = self.vertices.len();
        (0..count).map(move |index| (self.vertices[index], self.vertices[(index + 1) % count]))
    }
}

fn on_segment(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    let cross = (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
    if cross != 0.0 {
        return false;
    }
    p.0 >= a.0.min(b.0) && p.0 <= a.0.max(b.0) && p.1 >= a.1.min(b.1) && p.1 <= a.1.max(b.1)
}
