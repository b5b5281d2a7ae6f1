use mine_wrap_core::{Action, Cell, Command, Direction, PathPlan};
use mine_wrap_geometry::{union, Polygon, Region};
use mine_wrap_system_planner::{PlanError, Planner};
use mine_wrap_world::{self as world, query, World};

fn strip(length: i32, start: Cell) -> World {
    World::new(
        Polygon::rectangle(0, 0, length, 1),
        Vec::new(),
        start,
        Direction::Right,
    )
}

fn perform(world: &mut World, direction: Direction) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::Perform {
            action: Action::Move(direction),
        },
        &mut events,
    );
}

fn plan_turn(planner: &mut Planner, world: &World) -> Vec<Command> {
    let mut commands = Vec::new();
    planner
        .handle(world, &mut commands)
        .expect("planning succeeds");
    commands
}

fn apply_all(world: &mut World, commands: Vec<Command>) {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
}

#[test]
fn last_move_direction_wins_over_fixed_order() {
    let world = World::new(
        Polygon::rectangle(0, 0, 3, 3),
        Vec::new(),
        Cell::new(1, 1),
        Direction::Left,
    );
    let mut planner = Planner::default();

    assert_eq!(
        plan_turn(&mut planner, &world),
        vec![Command::Perform {
            action: Action::Move(Direction::Left),
        }],
        "an unwrapped neighbor in the last direction should be taken without routing",
    );
}

#[test]
fn stuck_worker_reroutes_toward_widest_unwrapped_run() {
    let mut world = strip(5, Cell::new(0, 0));
    perform(&mut world, Direction::Right);
    perform(&mut world, Direction::Left);
    let mut planner = Planner::default();

    let commands = plan_turn(&mut planner, &world);

    assert_eq!(
        commands,
        vec![
            Command::BeginRoute {
                plan: PathPlan::new(
                    Cell::new(3, 0),
                    vec![Cell::new(1, 0), Cell::new(2, 0), Cell::new(3, 0)],
                ),
            },
            Command::Perform {
                action: Action::Move(Direction::Right),
            },
        ]
    );
}

#[test]
fn available_local_move_clears_active_route() {
    let mut world = strip(5, Cell::new(0, 0));
    perform(&mut world, Direction::Right);
    perform(&mut world, Direction::Left);
    let mut planner = Planner::default();
    let commands = plan_turn(&mut planner, &world);
    apply_all(&mut world, commands);
    assert!(query::mode(&world).is_routing());

    let commands = plan_turn(&mut planner, &world);

    assert_eq!(
        commands,
        vec![
            Command::ClearRoute,
            Command::Perform {
                action: Action::Move(Direction::Right),
            },
        ]
    );
}

#[test]
fn routing_consumes_plan_through_wrapped_cells() {
    let mut world = strip(6, Cell::new(3, 0));
    for _ in 0..3 {
        perform(&mut world, Direction::Left);
    }
    let mut planner = Planner::default();

    let commands = plan_turn(&mut planner, &world);
    assert!(matches!(
        commands.first(),
        Some(Command::BeginRoute { plan }) if plan.target() == Cell::new(4, 0) && plan.len() == 4
    ));
    apply_all(&mut world, commands);

    let commands = plan_turn(&mut planner, &world);
    assert_eq!(
        commands,
        vec![Command::Perform {
            action: Action::Move(Direction::Right),
        }],
        "routing should continue without re-planning",
    );
    apply_all(&mut world, commands);

    let plan = query::mode(&world).plan().expect("still routing");
    assert_eq!(plan.head(), Some(Cell::new(3, 0)));
    assert_eq!(query::worker(&world).cell(), Cell::new(2, 0));
}

#[test]
fn unreachable_target_degrades_to_idle_then_stalls() {
    let region = union([
        Polygon::rectangle(0, 0, 2, 1),
        Polygon::rectangle(3, 0, 6, 1),
    ]);
    let mut world = World::from_region(region, Cell::new(0, 0), Direction::Right);
    perform(&mut world, Direction::Right);
    let mut planner = Planner::default();

    let commands = plan_turn(&mut planner, &world);
    assert_eq!(
        commands,
        vec![Command::Perform {
            action: Action::Idle,
        }]
    );
    let unreachable: Vec<_> = planner.unreachable_cells().collect();
    assert_eq!(
        unreachable,
        vec![Cell::new(3, 0), Cell::new(4, 0), Cell::new(5, 0)]
    );
    assert!(!planner.is_stalled());
    apply_all(&mut world, commands);

    let commands = plan_turn(&mut planner, &world);
    assert_eq!(
        commands,
        vec![Command::Perform {
            action: Action::Idle,
        }]
    );
    assert!(planner.is_stalled());
    assert_eq!(query::remaining_cells(&world), 3);
}

#[test]
fn worker_outside_graph_is_fatal() {
    let world = World::new(
        Polygon::rectangle(0, 0, 3, 3),
        Vec::new(),
        Cell::new(7, 7),
        Direction::Up,
    );
    let mut planner = Planner::default();
    let mut commands = Vec::new();

    assert_eq!(
        planner.handle(&world, &mut commands),
        Err(PlanError::WorkerOutsideGraph {
            cell: Cell::new(7, 7)
        })
    );
}

#[test]
fn full_coverage_idles_indefinitely() {
    let mut world = World::from_region(
        Region::from(Polygon::unit_square(Cell::new(0, 0))),
        Cell::new(0, 0),
        Direction::Up,
    );
    let mut planner = Planner::default();

    for _ in 0..3 {
        let commands = plan_turn(&mut planner, &world);
        assert_eq!(
            commands,
            vec![Command::Perform {
                action: Action::Idle,
            }]
        );
        apply_all(&mut world, commands);
    }
    assert!(query::coverage_complete(&world));
}
