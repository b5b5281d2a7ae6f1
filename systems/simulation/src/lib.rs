#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-by-turn driver that alternates the planner and the world.
//!
//! Each turn the planner reads the current world and emits its commands, the
//! world applies them, and the resulting events are logged and handed to an
//! observer. Turns are strictly sequential; the run ends at the turn limit or,
//! when early stopping is enabled, as soon as coverage completes or the
//! planner reports that no reachable unwrapped cell remains.

use mine_wrap_core::{Action, Cell, Command, Event};
use mine_wrap_system_planner::{PlanError, Planner};
use mine_wrap_world::{self as world, query, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Failures that abort a run.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    /// The planner hit an unrecoverable contract violation.
    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Bounds applied to a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunLimits {
    /// Maximum number of turns to play.
    pub max_turns: u64,
    /// Stop once coverage completes or the planner stalls.
    pub stop_early: bool,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            max_turns: 10_000,
            stop_early: true,
        }
    }
}

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopReason {
    /// Every situable cell is wrapped.
    Covered,
    /// Unwrapped cells remain but none can be reached.
    Stalled,
    /// The turn limit was reached first.
    TurnLimit,
}

/// Summary of a single played turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Zero-based turn index.
    pub turn: u64,
    /// Action performed during the turn.
    pub action: Action,
    /// Worker cell after the action.
    pub worker: Cell,
    /// Number of wrapped cells after the action.
    pub wrapped: usize,
    /// Cells left in the active reroute plan, if routing.
    pub route_remaining: Option<usize>,
}

/// Result of a complete run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Every action performed, in order.
    pub actions: Vec<Action>,
    /// Number of situable cells wrapped at the end of the run.
    pub wrapped_cells: usize,
    /// Number of situable cells in the mine.
    pub situable_cells: usize,
    /// Why the run ended.
    pub stop_reason: StopReason,
}

impl Outcome {
    /// Actions encoded as a `W/A/S/D/Z` solution string.
    #[must_use]
    pub fn solution(&self) -> String {
        self.actions.iter().map(|action| action.code()).collect()
    }

    /// Number of turns played.
    #[must_use]
    pub fn turns(&self) -> usize {
        self.actions.len()
    }
}

/// Owns the world and planner for one run.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    planner: Planner,
}

impl Simulation {
    /// Creates a simulation starting from the provided world.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self {
            world,
            planner: Planner::default(),
        }
    }

    /// Current world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Planner driving the worker.
    #[must_use]
    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Plays a single turn and returns what happened.
    pub fn step(&mut self) -> Result<(TurnRecord, Vec<Event>), SimulationError> {
        let turn = query::turn(&self.world);
        let mut commands = Vec::new();
        self.planner.handle(&self.world, &mut commands)?;

        let mut action = Action::Idle;
        let mut events = Vec::new();
        for command in commands {
            if let Command::Perform { action: performed } = command {
                action = performed;
            }
            world::apply(&mut self.world, command, &mut events);
        }

        log_events(turn, &events);

        let record = TurnRecord {
            turn,
            action,
            worker: query::worker(&self.world).cell(),
            wrapped: query::wrapped(&self.world).len(),
            route_remaining: query::mode(&self.world).plan().map(|plan| plan.len()),
        };
        Ok((record, events))
    }

    /// Plays turns until a stop condition holds, reporting each turn to `observer`.
    pub fn run<F>(&mut self, limits: RunLimits, mut observer: F) -> Result<Outcome, SimulationError>
    where
        F: FnMut(&TurnRecord, &World),
    {
        let mut actions = Vec::new();
        let mut stop_reason = StopReason::TurnLimit;

        for _ in 0..limits.max_turns {
            if limits.stop_early {
                if query::coverage_complete(&self.world) {
                    stop_reason = StopReason::Covered;
                    break;
                }
                if self.planner.is_stalled() {
                    stop_reason = StopReason::Stalled;
                    break;
                }
            }

            let (record, _) = self.step()?;
            actions.push(record.action);
            observer(&record, &self.world);
        }

        if stop_reason == StopReason::TurnLimit && query::coverage_complete(&self.world) {
            stop_reason = StopReason::Covered;
        }

        let situable_cells = query::situable_cell_count(&self.world);
        let wrapped_cells = situable_cells.saturating_sub(query::remaining_cells(&self.world));
        info!(
            turns = actions.len(),
            wrapped_cells,
            situable_cells,
            ?stop_reason,
            "run finished"
        );

        Ok(Outcome {
            actions,
            wrapped_cells,
            situable_cells,
            stop_reason,
        })
    }
}

fn log_events(turn: u64, events: &[Event]) {
    for event in events {
        match event {
            Event::RouteStarted { target, length } => {
                debug!(turn, %target, length, "route started");
            }
            Event::RouteCleared { target } => debug!(turn, %target, "route cleared"),
            Event::RouteCompleted { target } => debug!(turn, %target, "route completed"),
            Event::CoverageCompleted => info!(turn, "coverage completed"),
            Event::WorkerIdled { cell } => debug!(turn, %cell, "worker idled"),
            Event::CellWrapped { .. } | Event::WorkerMoved { .. } => {}
        }
    }
}
