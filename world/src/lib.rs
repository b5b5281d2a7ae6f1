#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative coverage state for a mine wrapping run.
//!
//! The world owns the worker, the wrapped area and the planner mode. The
//! situable region (mine minus obstacles) and its adjacency graph are fixed at
//! construction and shared read-only by every clone of the world.

mod graph;
mod routing;

use std::collections::BTreeSet;
use std::sync::Arc;

use mine_wrap_core::{Action, Cell, Command, Direction, Event, Orientation, PlannerMode};
use mine_wrap_geometry::{difference, union, Polygon, Region};

pub use graph::GridGraph;
pub use routing::{route, RouteError};

/// Position and heading of the worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Worker {
    cell: Cell,
    orientation: Orientation,
    last_move: Direction,
}

impl Worker {
    /// Cell the worker currently occupies.
    #[must_use]
    pub const fn cell(&self) -> Cell {
        self.cell
    }

    /// Facing carried through the run.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Direction of the most recent move, or the configured initial direction.
    #[must_use]
    pub const fn last_move(&self) -> Direction {
        self.last_move
    }
}

/// Cells the worker has occupied. Grows monotonically.
///
/// The set is shared copy-on-write with regions derived from it, so handing
/// out a region view each turn does not copy the cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrappedArea {
    cells: Arc<BTreeSet<Cell>>,
}

impl WrappedArea {
    /// Reports whether the cell was wrapped.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Number of wrapped cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether nothing was wrapped yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Wrapped cells in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// Union of the wrapped unit squares.
    #[must_use]
    pub fn region(&self) -> Region {
        Region::from_cell_set(Arc::clone(&self.cells))
    }

    fn insert(&mut self, cell: Cell) -> bool {
        Arc::make_mut(&mut self.cells).insert(cell)
    }
}

/// Represents the authoritative simulation state.
#[derive(Clone, Debug)]
pub struct World {
    situable: Region,
    graph: Arc<GridGraph>,
    situable_cells: usize,
    worker: Worker,
    wrapped: WrappedArea,
    wrapped_situable: usize,
    mode: PlannerMode,
    turn: u64,
}

impl World {
    /// Creates a world for the mine minus its obstacles.
    #[must_use]
    pub fn new(
        mine: Polygon,
        obstacles: Vec<Polygon>,
        start: Cell,
        initial_direction: Direction,
    ) -> Self {
        let situable = difference(&Region::from(mine), &union(obstacles));
        Self::from_region(situable, start, initial_direction)
    }

    /// Creates a world over an already composed situable region.
    #[must_use]
    pub fn from_region(situable: Region, start: Cell, initial_direction: Direction) -> Self {
        let graph = GridGraph::build(&situable);
        let situable_cells = situable.cell_count();
        Self {
            situable,
            graph: Arc::new(graph),
            situable_cells,
            worker: Worker {
                cell: start,
                orientation: Orientation::default(),
                last_move: initial_direction,
            },
            wrapped: WrappedArea::default(),
            wrapped_situable: 0,
            mode: PlannerMode::Local,
            turn: 0,
        }
    }

    fn perform(&mut self, action: Action, out_events: &mut Vec<Event>) {
        let from = self.worker.cell;
        if self.wrapped.insert(from) {
            out_events.push(Event::CellWrapped { cell: from });
            if self.situable.contains_cell(from) {
                self.wrapped_situable += 1;
                if self.wrapped_situable == self.situable_cells {
                    out_events.push(Event::CoverageCompleted);
                }
            }
        }

        match action {
            Action::Move(direction) => {
                let to = from.step(direction);
                self.worker.cell = to;
                self.worker.last_move = direction;
                out_events.push(Event::WorkerMoved { from, to, direction });
            }
            Action::Idle => out_events.push(Event::WorkerIdled { cell: from }),
        }

        let completed = match &mut self.mode {
            PlannerMode::Routing(plan) => {
                let _ = plan.pop_head();
                plan.is_empty().then(|| plan.target())
            }
            PlannerMode::Local => None,
        };
        if let Some(target) = completed {
            self.mode = PlannerMode::Local;
            out_events.push(Event::RouteCompleted { target });
        }

        self.turn = self.turn.saturating_add(1);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// `Perform` wraps the pre-move cell before moving; wrapping an already
/// wrapped cell changes nothing. Moves are not checked against the region.
/// While routing, every `Perform` consumes the plan head.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Perform { action } => world.perform(action, out_events),
        Command::BeginRoute { plan } => {
            if plan.is_empty() {
                return;
            }
            out_events.push(Event::RouteStarted {
                target: plan.target(),
                length: plan.len(),
            });
            world.mode = PlannerMode::Routing(plan);
        }
        Command::ClearRoute => {
            if let PlannerMode::Routing(plan) = std::mem::take(&mut world.mode) {
                out_events.push(Event::RouteCleared {
                    target: plan.target(),
                });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use mine_wrap_core::PlannerMode;
    use mine_wrap_geometry::Region;

    use super::{GridGraph, Worker, World, WrappedArea};

    /// Mine minus obstacles.
    #[must_use]
    pub fn situable(world: &World) -> &Region {
        &world.situable
    }

    /// Situable region minus the wrapped area, recomputed on every call.
    #[must_use]
    pub fn not_wrapped(world: &World) -> Region {
        world.situable.difference(&world.wrapped.region())
    }

    /// Cells wrapped so far.
    #[must_use]
    pub fn wrapped(world: &World) -> &WrappedArea {
        &world.wrapped
    }

    /// Worker position and heading.
    #[must_use]
    pub fn worker(world: &World) -> &Worker {
        &world.worker
    }

    /// Current planner mode, carrying the active plan while routing.
    #[must_use]
    pub fn mode(world: &World) -> &PlannerMode {
        &world.mode
    }

    /// Adjacency graph of the situable region, built once per world.
    #[must_use]
    pub fn graph(world: &World) -> &GridGraph {
        &world.graph
    }

    /// Number of lattice cells inside the situable region.
    #[must_use]
    pub fn situable_cell_count(world: &World) -> usize {
        world.situable_cells
    }

    /// Number of situable cells not wrapped yet.
    #[must_use]
    pub fn remaining_cells(world: &World) -> usize {
        world.situable_cells.saturating_sub(world.wrapped_situable)
    }

    /// Reports whether every situable cell is wrapped.
    #[must_use]
    pub fn coverage_complete(world: &World) -> bool {
        remaining_cells(world) == 0
    }

    /// Number of actions applied so far.
    #[must_use]
    pub fn turn(world: &World) -> u64 {
        world.turn
    }
}
