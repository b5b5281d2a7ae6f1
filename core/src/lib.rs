#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the mine wrapping engine.
//!
//! This crate defines the vocabulary that connects the adapters, the
//! authoritative world, and the pure systems. Systems read the world through
//! immutable queries and respond with [`Command`] values; the world executes
//! those commands via its `apply` entry point and reports what changed as
//! [`Event`] values. Every turn the planner emits exactly one
//! [`Command::Perform`] carrying an [`Action`] from the `W/A/S/D/Z` alphabet.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a single unit lattice square, identified by its lower-left corner.
///
/// The square spans `(x, y)` to `(x + 1, y + 1)`. North is increasing `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    /// Creates a new lattice cell.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the cell's lower-left corner.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the cell's lower-left corner.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Cell one step away in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Axis-aligned unit moves available to the worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing `y`.
    Up,
    /// Movement toward decreasing `y`.
    Down,
    /// Movement toward decreasing `x`.
    Left,
    /// Movement toward increasing `x`.
    Right,
}

impl Direction {
    /// Fixed local search order used after the last successful direction.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Coordinate offset applied by a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Single-turn worker action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Move one cell in the provided direction.
    Move(Direction),
    /// Stay in place for the turn.
    Idle,
}

impl Action {
    /// Single character encoding used by solution strings.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Move(Direction::Up) => 'W',
            Self::Move(Direction::Down) => 'S',
            Self::Move(Direction::Left) => 'A',
            Self::Move(Direction::Right) => 'D',
            Self::Idle => 'Z',
        }
    }

    /// Parses a single solution character, returning `None` for unknown codes.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'W' => Some(Self::Move(Direction::Up)),
            'S' => Some(Self::Move(Direction::Down)),
            'A' => Some(Self::Move(Direction::Left)),
            'D' => Some(Self::Move(Direction::Right)),
            'Z' => Some(Self::Idle),
            _ => None,
        }
    }

    /// Direction of travel, if the action moves the worker.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Move(direction) => Some(direction),
            Self::Idle => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Facing carried on the worker. Planning never consults it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Facing toward increasing `y`.
    Up,
    /// Facing toward decreasing `y`.
    Down,
    /// Facing toward decreasing `x`.
    Left,
    /// Facing toward increasing `x`.
    #[default]
    Right,
}

/// Remaining cells of an in-progress reroute toward an unwrapped target.
///
/// The worker's own cell is never part of the plan: the head is the next cell
/// to enter and the tail is the target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPlan {
    target: Cell,
    cells: VecDeque<Cell>,
}

impl PathPlan {
    /// Creates a plan heading for `target` through the ordered `cells`.
    #[must_use]
    pub fn new(target: Cell, cells: Vec<Cell>) -> Self {
        Self {
            target,
            cells: cells.into(),
        }
    }

    /// Cell the plan was computed toward.
    #[must_use]
    pub const fn target(&self) -> Cell {
        self.target
    }

    /// Next cell the worker should enter, if any remain.
    #[must_use]
    pub fn head(&self) -> Option<Cell> {
        self.cells.front().copied()
    }

    /// Number of cells still to traverse.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether every planned cell was consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterator over the remaining cells from head to target.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// Removes and returns the head cell.
    pub fn pop_head(&mut self) -> Option<Cell> {
        self.cells.pop_front()
    }
}

/// Two-state planner mode: greedy local moves, or consuming a reroute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlannerMode {
    /// No reroute is active; the planner tries local moves first.
    #[default]
    Local,
    /// A reroute is active and consumed one cell per turn.
    Routing(PathPlan),
}

impl PlannerMode {
    /// Active plan, if the planner is routing.
    #[must_use]
    pub const fn plan(&self) -> Option<&PathPlan> {
        match self {
            Self::Local => None,
            Self::Routing(plan) => Some(plan),
        }
    }

    /// Reports whether a reroute is in progress.
    #[must_use]
    pub const fn is_routing(&self) -> bool {
        matches!(self, Self::Routing(_))
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Wraps the worker's current cell and applies the action.
    Perform {
        /// Action chosen for this turn.
        action: Action,
    },
    /// Installs a reroute plan, switching the planner into routing mode.
    BeginRoute {
        /// Plan computed toward an unwrapped target.
        plan: PathPlan,
    },
    /// Drops any active reroute, returning the planner to local mode.
    ClearRoute,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A cell joined the wrapped area for the first time.
    CellWrapped {
        /// Cell that was wrapped.
        cell: Cell,
    },
    /// The worker moved between two adjacent cells.
    WorkerMoved {
        /// Cell occupied before the move.
        from: Cell,
        /// Cell occupied after the move.
        to: Cell,
        /// Direction of travel.
        direction: Direction,
    },
    /// The worker performed a no-op.
    WorkerIdled {
        /// Cell the worker stayed in.
        cell: Cell,
    },
    /// A reroute plan was installed.
    RouteStarted {
        /// Cell the plan heads for.
        target: Cell,
        /// Number of cells in the plan.
        length: usize,
    },
    /// An active reroute was abandoned in favour of a local move.
    RouteCleared {
        /// Cell the abandoned plan was heading for.
        target: Cell,
    },
    /// Every cell of the active plan was consumed.
    RouteCompleted {
        /// Cell the finished plan was heading for.
        target: Cell,
    },
    /// Every situable cell is wrapped.
    CoverageCompleted,
}

#[cfg(test)]
mod tests {
    use super::{Action, Cell, Direction, Orientation, PathPlan, PlannerMode};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn action_codes_follow_the_solution_alphabet() {
        let codes: String = [
            Action::Move(Direction::Up),
            Action::Move(Direction::Left),
            Action::Move(Direction::Down),
            Action::Move(Direction::Right),
            Action::Idle,
        ]
        .iter()
        .map(|action| action.code())
        .collect();
        assert_eq!(codes, "WASDZ");

        for code in codes.chars() {
            let action = Action::from_code(code).expect("known code");
            assert_eq!(action.code(), code);
        }
        assert_eq!(Action::from_code('Q'), None);
    }

    #[test]
    fn step_applies_unit_deltas() {
        let origin = Cell::new(4, 4);
        assert_eq!(origin.step(Direction::Up), Cell::new(4, 5));
        assert_eq!(origin.step(Direction::Down), Cell::new(4, 3));
        assert_eq!(origin.step(Direction::Left), Cell::new(3, 4));
        assert_eq!(origin.step(Direction::Right), Cell::new(5, 4));
    }

    #[test]
    fn opposite_directions_cancel_out() {
        let origin = Cell::new(2, 7);
        for direction in Direction::SEARCH_ORDER {
            assert_eq!(origin.step(direction).step(direction.opposite()), origin);
        }
    }

    #[test]
    fn path_plan_pops_in_order() {
        let mut plan = PathPlan::new(Cell::new(2, 0), vec![Cell::new(1, 0), Cell::new(2, 0)]);
        assert_eq!(plan.head(), Some(Cell::new(1, 0)));
        assert_eq!(plan.pop_head(), Some(Cell::new(1, 0)));
        assert_eq!(plan.head(), Some(Cell::new(2, 0)));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.pop_head(), Some(Cell::new(2, 0)));
        assert!(plan.is_empty());
        assert_eq!(plan.target(), Cell::new(2, 0));
    }

    #[test]
    fn planner_mode_defaults_to_local() {
        let mode = PlannerMode::default();
        assert!(!mode.is_routing());
        assert!(mode.plan().is_none());
        assert_eq!(Orientation::default(), Orientation::Right);
    }

    #[test]
    fn routing_mode_round_trips_through_bincode() {
        let plan = PathPlan::new(Cell::new(3, 1), vec![Cell::new(3, 0), Cell::new(3, 1)]);
        assert_round_trip(&PlannerMode::Routing(plan));
    }

    #[test]
    fn action_round_trips_through_bincode() {
        assert_round_trip(&Action::Move(Direction::Left));
        assert_round_trip(&Action::Idle);
    }
}
