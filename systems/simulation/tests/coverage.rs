use std::collections::BTreeSet;

use mine_wrap_core::{Cell, Direction, Event};
use mine_wrap_geometry::{Polygon, Vertex};
use mine_wrap_system_simulation::{RunLimits, Simulation, StopReason};
use mine_wrap_world::{query, World};

fn polygon(points: &[(i32, i32)]) -> Polygon {
    Polygon::new(points.iter().map(|&(x, y)| Vertex::new(x, y)).collect())
}

/// Two 2x2 rooms joined by a one-cell-wide corridor along the bottom row.
fn twin_rooms() -> Polygon {
    polygon(&[
        (0, 0),
        (6, 0),
        (6, 2),
        (4, 2),
        (4, 1),
        (2, 1),
        (2, 2),
        (0, 2),
    ])
}

fn wrapped_set(world: &World) -> BTreeSet<Cell> {
    query::wrapped(world).iter().collect()
}

#[test]
fn open_square_is_wrapped_by_local_moves_alone() {
    let world = World::new(
        Polygon::rectangle(0, 0, 3, 3),
        Vec::new(),
        Cell::new(0, 0),
        Direction::Up,
    );
    let mut simulation = Simulation::new(world);
    let mut solution = String::new();

    for _ in 0..9 {
        let (record, events) = simulation.step().expect("turn plays");
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, Event::RouteStarted { .. })),
            "turn {} entered routing",
            record.turn
        );
        assert!(!query::mode(simulation.world()).is_routing());
        solution.push(record.action.code());
    }

    assert_eq!(solution, "WWDDSSAWZ");
    assert_eq!(query::wrapped(simulation.world()).len(), 9);
    assert!(query::coverage_complete(simulation.world()));
}

#[test]
fn corridor_forces_a_reroute_into_the_second_room() {
    let world = World::new(twin_rooms(), Vec::new(), Cell::new(1, 0), Direction::Up);
    let starting_room = [
        Cell::new(0, 0),
        Cell::new(1, 0),
        Cell::new(0, 1),
        Cell::new(1, 1),
    ];
    let mut simulation = Simulation::new(world);
    let mut rerouted = false;

    for _ in 0..50 {
        if query::coverage_complete(simulation.world()) {
            break;
        }
        let (_, events) = simulation.step().expect("turn plays");
        let started = events
            .iter()
            .find(|event| matches!(event, Event::RouteStarted { .. }));
        if let Some(Event::RouteStarted { length, .. }) = started {
            rerouted = true;
            assert!(*length > 0);
            let wrapped = wrapped_set(simulation.world());
            assert!(
                starting_room.iter().all(|cell| wrapped.contains(cell)),
                "reroute should only start once the first room is wrapped"
            );
            let plan = query::mode(simulation.world())
                .plan()
                .expect("plan installed");
            assert!(plan.cells().any(|cell| cell == Cell::new(2, 0)));
        }
    }

    assert!(rerouted, "expected the planner to enter routing");
    assert!(query::coverage_complete(simulation.world()));
    for cell in [Cell::new(4, 0), Cell::new(5, 0), Cell::new(4, 1), Cell::new(5, 1)] {
        assert!(query::wrapped(simulation.world()).contains(cell));
    }
}

#[test]
fn obstacle_cell_is_never_wrapped_or_linked() {
    let hole = Cell::new(1, 1);
    let world = World::new(
        Polygon::rectangle(0, 0, 4, 4),
        vec![Polygon::unit_square(hole)],
        Cell::new(0, 0),
        Direction::Up,
    );
    let graph = query::graph(&world);
    assert_eq!(graph.degree(hole), 0);
    for cell in query::situable(&world).cells() {
        assert!(!graph.has_edge(cell, hole));
        assert!(graph.neighbors(cell).all(|neighbor| neighbor != hole));
    }

    let mut simulation = Simulation::new(world);
    let outcome = simulation
        .run(RunLimits::default(), |_, world| {
            assert!(!query::wrapped(world).contains(hole));
        })
        .expect("run completes");

    assert_eq!(outcome.stop_reason, StopReason::Covered);
    assert_eq!(outcome.situable_cells, 15);
    assert_eq!(outcome.wrapped_cells, 15);
}

#[test]
fn cell_split_between_two_touching_obstacles_is_blocked() {
    let split = Cell::new(1, 1);
    let world = World::new(
        Polygon::rectangle(0, 0, 3, 3),
        vec![
            polygon(&[(1, 1), (2, 1), (2, 2)]),
            polygon(&[(1, 1), (2, 2), (1, 2)]),
        ],
        Cell::new(0, 0),
        Direction::Up,
    );
    assert!(!query::situable(&world).contains_cell(split));
    assert_eq!(query::situable_cell_count(&world), 8);
    assert_eq!(query::graph(&world).degree(split), 0);

    let mut simulation = Simulation::new(world);
    let outcome = simulation
        .run(RunLimits::default(), |_, world| {
            assert!(!query::wrapped(world).contains(split));
        })
        .expect("run completes");

    assert_eq!(outcome.stop_reason, StopReason::Covered);
    assert_eq!(outcome.wrapped_cells, 8);
}

#[test]
fn wrapped_area_grows_monotonically_inside_the_situable_region() {
    let mine = polygon(&[
        (0, 0),
        (9, 0),
        (9, 3),
        (7, 3),
        (7, 6),
        (3, 6),
        (3, 4),
        (0, 4),
    ]);
    let obstacles = vec![
        Polygon::rectangle(2, 1, 4, 2),
        Polygon::rectangle(5, 2, 6, 5),
    ];
    let world = World::new(mine, obstacles, Cell::new(0, 0), Direction::Right);
    let situable = query::situable(&world).clone();
    let reachable: BTreeSet<Cell> = query::graph(&world)
        .component(Cell::new(0, 0))
        .into_iter()
        .collect();
    let mut simulation = Simulation::new(world);
    let mut previous = BTreeSet::new();

    let outcome = simulation
        .run(RunLimits::default(), |_, world| {
            let current = wrapped_set(world);
            assert!(previous.is_subset(&current), "wrapped area shrank");
            assert!(
                current.iter().all(|cell| situable.contains_cell(*cell)),
                "wrapped a cell outside the situable region"
            );
            previous = current;
        })
        .expect("run completes");

    assert_eq!(outcome.stop_reason, StopReason::Covered);
    assert!(reachable.is_subset(&previous));
}

#[test]
fn isolated_pocket_stalls_after_reachable_cells_are_wrapped() {
    let mine = Polygon::rectangle(0, 0, 5, 3);
    let walls = vec![Polygon::rectangle(3, 0, 4, 3)];
    let world = World::new(mine, walls, Cell::new(0, 0), Direction::Up);
    let mut simulation = Simulation::new(world);

    let outcome = simulation
        .run(RunLimits::default(), |_, _| {})
        .expect("run completes");

    assert_eq!(outcome.stop_reason, StopReason::Stalled);
    assert_eq!(outcome.situable_cells, 12);
    assert_eq!(outcome.wrapped_cells, 9);
    let unreachable: BTreeSet<Cell> = simulation.planner().unreachable_cells().collect();
    assert!(unreachable.contains(&Cell::new(4, 1)));
}
