#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy-then-route coverage planner.
//!
//! Every turn the planner first looks for a unit move into an unwrapped cell,
//! trying the last successful direction before `W`, `S`, `A`, `D`. When no
//! such move exists it follows the active reroute plan, or computes a new one
//! toward a representative point of the unwrapped area. Geometry and routing
//! failures degrade to a no-op for the turn; only a worker standing outside
//! the adjacency graph is reported as an error.

use std::collections::BTreeSet;

use mine_wrap_core::{Action, Cell, Command, Direction, PathPlan};
use mine_wrap_geometry::Region;
use mine_wrap_world::{query, route, RouteError, World};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Unrecoverable planning failures.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The worker left the bounding box the adjacency graph was built for.
    #[error("worker cell {cell} lies outside the adjacency graph")]
    WorkerOutsideGraph {
        /// Cell the worker occupies.
        cell: Cell,
    },
}

/// Pure system that reads the world and emits the turn's commands.
///
/// The planner remembers cells it failed to route to so later reroutes pick a
/// different representative point.
#[derive(Debug, Default)]
pub struct Planner {
    unreachable: BTreeSet<Cell>,
    excluded: Region,
    stalled: bool,
}

impl Planner {
    /// Emits the commands for one turn, always ending with a single `Perform`.
    pub fn handle(&mut self, world: &World, out: &mut Vec<Command>) -> Result<(), PlanError> {
        let worker = query::worker(world);
        let position = worker.cell();
        let mode = query::mode(world);

        if query::coverage_complete(world) {
            if mode.is_routing() {
                out.push(Command::ClearRoute);
            }
            out.push(idle());
            return Ok(());
        }

        let not_wrapped = query::not_wrapped(world);
        if let Some(direction) = local_move(&not_wrapped, position, worker.last_move()) {
            if mode.is_routing() {
                out.push(Command::ClearRoute);
            }
            out.push(Command::Perform {
                action: Action::Move(direction),
            });
            return Ok(());
        }

        if let Some(plan) = mode.plan() {
            out.push(Command::Perform {
                action: step_toward(position, plan.head()),
            });
            return Ok(());
        }

        self.reroute(world, &not_wrapped, position, out)
    }

    /// Reports whether every unwrapped cell left is known to be unreachable.
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Cells excluded from reroute targets after routing to them failed.
    pub fn unreachable_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.unreachable.iter().copied()
    }

    fn reroute(
        &mut self,
        world: &World,
        not_wrapped: &Region,
        position: Cell,
        out: &mut Vec<Command>,
    ) -> Result<(), PlanError> {
        let candidates = not_wrapped.difference(&self.excluded);
        let target = match candidates.representative_point() {
            Ok(point) => point.cell(),
            Err(error) => {
                if !self.stalled {
                    warn!(%position, %error, "no reachable unwrapped cell remains");
                }
                self.stalled = true;
                out.push(idle());
                return Ok(());
            }
        };

        if target == position {
            debug!(%position, "worker stands on the last unwrapped cell nearby");
            out.push(idle());
            return Ok(());
        }

        let graph = query::graph(world);
        match route(graph, target, position) {
            Ok(path) => {
                let plan = PathPlan::new(target, path);
                let action = step_toward(position, plan.head());
                info!(%position, %target, length = plan.len(), "rerouting toward unwrapped area");
                out.push(Command::BeginRoute { plan });
                out.push(Command::Perform { action });
            }
            Err(RouteError::StartOutsideGraph { cell }) => {
                return Err(PlanError::WorkerOutsideGraph { cell });
            }
            Err(error) => {
                warn!(%position, %target, %error, "routing failed; excluding target area");
                self.exclude(graph.component(target), target);
                out.push(idle());
            }
        }

        Ok(())
    }

    fn exclude(&mut self, component: Vec<Cell>, target: Cell) {
        let before = self.unreachable.len();
        self.unreachable.extend(component);
        let _ = self.unreachable.insert(target);
        if self.unreachable.len() != before {
            self.excluded = Region::from_cells(self.unreachable.iter().copied());
        }
    }
}

/// First direction, last move first, whose destination cell is still unwrapped.
fn local_move(not_wrapped: &Region, position: Cell, last_move: Direction) -> Option<Direction> {
    std::iter::once(last_move)
        .chain(Direction::SEARCH_ORDER)
        .find(|direction| not_wrapped.contains_cell(position.step(*direction)))
}

/// Single-axis move toward the plan head, correcting `y` before `x`.
fn step_toward(position: Cell, head: Option<Cell>) -> Action {
    let Some(head) = head else {
        return Action::Idle;
    };

    let direction = if head.y() > position.y() {
        Direction::Up
    } else if head.y() < position.y() {
        Direction::Down
    } else if head.x() < position.x() {
        Direction::Left
    } else if head.x() > position.x() {
        Direction::Right
    } else {
        return Action::Idle;
    };

    Action::Move(direction)
}

fn idle() -> Command {
    Command::Perform {
        action: Action::Idle,
    }
}
