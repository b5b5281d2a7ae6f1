//! Static cell adjacency graph built from the situable region.

use std::collections::VecDeque;

use mine_wrap_core::{Cell, Direction};
use mine_wrap_geometry::{Bounds, Region};

/// Undirected unit-cell adjacency over the region's bounding box.
///
/// Nodes are addressed by a flat row-major index,
/// `(y - min_y) * width + (x - min_x)`, so no node storage exists beyond one
/// link mask per cell. Two axis-adjacent cells are linked when both of their
/// centers lie inside the region; cells outside the region carry no links.
#[derive(Clone, Debug, Default)]
pub struct GridGraph {
    bounds: Option<Bounds>,
    links: Vec<u8>,
}

impl GridGraph {
    /// Builds the adjacency for the provided region.
    #[must_use]
    pub fn build(region: &Region) -> Self {
        let Some(bounds) = region.bounds() else {
            return Self::default();
        };

        let width = usize::try_from(bounds.width()).unwrap_or(0);
        let height = usize::try_from(bounds.height()).unwrap_or(0);
        let node_count = width.checked_mul(height).unwrap_or(0);
        if node_count == 0 {
            return Self::default();
        }

        let inside: Vec<bool> = bounds.cells().map(|cell| region.contains_cell(cell)).collect();
        let mut graph = Self {
            bounds: Some(bounds),
            links: vec![0; node_count],
        };

        for cell in bounds.cells() {
            let Some(index) = graph.index(cell) else {
                continue;
            };
            if !inside[index] {
                continue;
            }

            for direction in Direction::SEARCH_ORDER {
                let Some(neighbor_index) = graph.index(cell.step(direction)) else {
                    continue;
                };
                if !inside[neighbor_index] {
                    continue;
                }

                graph.links[index] |= link_bit(direction);
                graph.links[neighbor_index] |= link_bit(direction.opposite());
            }
        }

        graph
    }

    /// Bounding box covered by the node indices, `None` for an empty graph.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Number of addressable nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.links.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        let endpoints: u32 = self.links.iter().map(|mask| mask.count_ones()).sum();
        usize::try_from(endpoints / 2).unwrap_or(0)
    }

    /// Reports whether the graph has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.iter().all(|mask| *mask == 0)
    }

    /// Flat node index of the cell, `None` outside the bounding box.
    #[must_use]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        let bounds = self.bounds?;
        if !bounds.contains_cell(cell) {
            return None;
        }

        let width = usize::try_from(bounds.width()).ok()?;
        let column = usize::try_from(cell.x().abs_diff(bounds.min_x())).ok()?;
        let row = usize::try_from(cell.y().abs_diff(bounds.min_y())).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Cell addressed by the flat node index.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        let bounds = self.bounds?;
        if index >= self.links.len() {
            return None;
        }

        let width = usize::try_from(bounds.width()).ok()?;
        let column = i32::try_from(index % width).ok()?;
        let row = i32::try_from(index / width).ok()?;
        Some(Cell::new(bounds.min_x() + column, bounds.min_y() + row))
    }

    /// Reports whether an edge links the two cells.
    #[must_use]
    pub fn has_edge(&self, from: Cell, to: Cell) -> bool {
        Direction::SEARCH_ORDER
            .into_iter()
            .find(|direction| from.step(*direction) == to)
            .map_or(false, |direction| self.mask(from) & link_bit(direction) != 0)
    }

    /// Cells linked to the provided cell, in the fixed search order.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> {
        let mask = self.mask(cell);
        Direction::SEARCH_ORDER
            .into_iter()
            .filter(move |direction| mask & link_bit(*direction) != 0)
            .map(move |direction| cell.step(direction))
    }

    /// Number of edges incident to the cell.
    #[must_use]
    pub fn degree(&self, cell: Cell) -> u32 {
        self.mask(cell).count_ones()
    }

    /// Every cell reachable from `origin`, including `origin` itself when addressable.
    #[must_use]
    pub fn component(&self, origin: Cell) -> Vec<Cell> {
        let Some(origin_index) = self.index(origin) else {
            return Vec::new();
        };

        let mut visited = vec![false; self.links.len()];
        visited[origin_index] = true;
        let mut queue = VecDeque::from([origin]);
        let mut reached = Vec::new();

        while let Some(cell) = queue.pop_front() {
            reached.push(cell);
            for neighbor in self.neighbors(cell) {
                let Some(index) = self.index(neighbor) else {
                    continue;
                };
                if visited[index] {
                    continue;
                }
                visited[index] = true;
                queue.push_back(neighbor);
            }
        }

        reached
    }

    fn mask(&self, cell: Cell) -> u8 {
        self.index(cell)
            .and_then(|index| self.links.get(index).copied())
            .unwrap_or(0)
    }
}

const fn link_bit(direction: Direction) -> u8 {
    match direction {
        Direction::Up => 0b0001,
        Direction::Down => 0b0010,
        Direction::Left => 0b0100,
        Direction::Right => 0b1000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mine_wrap_geometry::{union, Polygon};

    #[test]
    fn open_square_links_every_axis_neighbor() {
        let graph = GridGraph::build(&Region::from(Polygon::rectangle(0, 0, 3, 3)));

        assert_eq!(graph.node_count(), 9);
        assert_eq!(graph.edge_count(), 12);
        assert!(graph.has_edge(Cell::new(0, 0), Cell::new(1, 0)));
        assert!(graph.has_edge(Cell::new(1, 0), Cell::new(0, 0)));
        assert!(!graph.has_edge(Cell::new(0, 0), Cell::new(1, 1)));
        assert_eq!(graph.degree(Cell::new(1, 1)), 4);
        assert_eq!(graph.degree(Cell::new(0, 0)), 2);
    }

    #[test]
    fn index_is_row_major_and_bounds_checked() {
        let graph = GridGraph::build(&Region::from(Polygon::rectangle(2, 1, 5, 3)));

        assert_eq!(graph.index(Cell::new(2, 1)), Some(0));
        assert_eq!(graph.index(Cell::new(4, 1)), Some(2));
        assert_eq!(graph.index(Cell::new(2, 2)), Some(3));
        assert_eq!(graph.index(Cell::new(5, 1)), None);
        assert_eq!(graph.index(Cell::new(1, 1)), None);
        assert_eq!(graph.cell_at(4), Some(Cell::new(3, 2)));
        assert_eq!(graph.cell_at(6), None);
    }

    #[test]
    fn obstacle_cells_carry_no_links() {
        let mine = Region::from(Polygon::rectangle(0, 0, 3, 3));
        let hole = Cell::new(1, 1);
        let situable = mine.difference(&union([Polygon::unit_square(hole)]));
        let graph = GridGraph::build(&situable);

        assert_eq!(graph.degree(hole), 0);
        assert_eq!(graph.edge_count(), 8);
        for cell in situable.cells() {
            assert!(graph.neighbors(cell).all(|neighbor| neighbor != hole));
        }
    }

    #[test]
    fn empty_region_yields_empty_graph() {
        let graph = GridGraph::build(&Region::empty());
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.index(Cell::new(0, 0)), None);
        assert!(graph.component(Cell::new(0, 0)).is_empty());
    }

    #[test]
    fn component_stops_at_disconnected_cells() {
        let region = union([Polygon::rectangle(0, 0, 2, 1), Polygon::rectangle(3, 0, 4, 1)]);
        let graph = GridGraph::build(&region);

        let mut left = graph.component(Cell::new(0, 0));
        left.sort();
        assert_eq!(left, vec![Cell::new(0, 0), Cell::new(1, 0)]);
        assert_eq!(graph.component(Cell::new(3, 0)), vec![Cell::new(3, 0)]);
    }
}
