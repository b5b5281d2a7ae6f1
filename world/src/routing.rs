//! Breadth-first shortest paths over the cell adjacency graph.

use std::collections::VecDeque;

use mine_wrap_core::Cell;
use thiserror::Error;

use crate::graph::GridGraph;

const UNVISITED: usize = usize::MAX;

/// Reasons a route could not be produced.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// The graph has no edges, so nothing can be routed.
    #[error("adjacency graph is empty")]
    EmptyGraph,
    /// The start cell lies outside the graph's bounding box.
    #[error("start cell {cell} lies outside the adjacency graph")]
    StartOutsideGraph {
        /// Offending start cell.
        cell: Cell,
    },
    /// The target cell lies outside the graph's bounding box.
    #[error("target cell {cell} lies outside the adjacency graph")]
    TargetOutsideGraph {
        /// Offending target cell.
        cell: Cell,
    },
    /// No sequence of edges connects start and target.
    #[error("no path from {start} to {target}")]
    NoPathFound {
        /// Cell the path should begin at.
        start: Cell,
        /// Cell the path should end at.
        target: Cell,
    },
}

/// Computes a shortest path from `start` to `target`.
///
/// The search expands from `target` and records each node's predecessor, then
/// walks the predecessors back from `start`. The returned cells exclude
/// `start` and end with `target`; equal endpoints yield an empty path.
pub fn route(graph: &GridGraph, target: Cell, start: Cell) -> Result<Vec<Cell>, RouteError> {
    if graph.is_empty() {
        return Err(RouteError::EmptyGraph);
    }

    let start_index = graph
        .index(start)
        .ok_or(RouteError::StartOutsideGraph { cell: start })?;
    let target_index = graph
        .index(target)
        .ok_or(RouteError::TargetOutsideGraph { cell: target })?;

    if start_index == target_index {
        return Ok(Vec::new());
    }

    let mut predecessors = vec![UNVISITED; graph.node_count()];
    predecessors[target_index] = target_index;
    let mut queue = VecDeque::from([target]);

    'search: while let Some(cell) = queue.pop_front() {
        let Some(current_index) = graph.index(cell) else {
            continue;
        };

        for neighbor in graph.neighbors(cell) {
            let Some(neighbor_index) = graph.index(neighbor) else {
                continue;
            };
            if predecessors[neighbor_index] != UNVISITED {
                continue;
            }

            predecessors[neighbor_index] = current_index;
            if neighbor_index == start_index {
                break 'search;
            }
            queue.push_back(neighbor);
        }
    }

    if predecessors[start_index] == UNVISITED {
        return Err(RouteError::NoPathFound { start, target });
    }

    let mut path = Vec::new();
    let mut index = start_index;
    while index != target_index {
        index = predecessors[index];
        let cell = graph
            .cell_at(index)
            .ok_or(RouteError::NoPathFound { start, target })?;
        path.push(cell);
    }

    Ok(path)
}
