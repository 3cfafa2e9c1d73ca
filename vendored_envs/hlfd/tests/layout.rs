use hlfd_rs::layout::{GRID_HEIGHT, OBSTACLE_MAX_GAP, OBSTACLE_MIN_GAP};
use hlfd_rs::{Cell, Grid, HlfdConfig, HlfdEnv, HlfdError, ObstacleKind, ObstacleLine, Strategy, MISSION};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn assert_line_passable(grid: &Grid, line: &ObstacleLine) {
    let ObstacleLine { x, strategy, gap_y } = *line;
    let at = |x: i32, y: i32| grid.get(x, y).unwrap();
    for y in 1..grid.height() - 1 {
        if y != gap_y {
            assert!(at(x, y).is_some_and(|c| c.is_obstacle()), "line {x} row {y} should be solid");
        }
    }
    match strategy {
        Strategy::Avoid => assert_eq!(at(x, gap_y), None),
        Strategy::Door => assert!(matches!(at(x, gap_y), Some(Cell::Door { .. }))),
        Strategy::Ball => {
            assert_eq!(at(x, gap_y), None);
            assert!(matches!(at(x - 1, gap_y), Some(Cell::Ball { .. })));
        }
        Strategy::MoveAway => {
            assert_eq!(at(x, gap_y), None);
            assert!(matches!(at(x - 1, gap_y), Some(Cell::MovableBlock { .. })));
            assert!((2..GRID_HEIGHT - 2).contains(&gap_y));
        }
        Strategy::MoveInto => {
            assert!(at(x, gap_y).is_some_and(|c| c.is_obstacle()));
            assert!(matches!(at(x - 1, gap_y), Some(Cell::MovableBlock { .. })));
        }
    }
}

#[test]
fn generated_corridor_has_three_passable_lines() {
    for seed in 0..64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let env = HlfdEnv::new(HlfdConfig::default(), &mut rng).unwrap();
        let params = env.layout_params();
        let [x1, x2, x3] = params.obstacle_xs;
        assert!(x1 < x2 && x2 < x3);
        let gap = OBSTACLE_MIN_GAP..=OBSTACLE_MAX_GAP;
        assert!(gap.contains(&x1) && gap.contains(&(x2 - x1)) && gap.contains(&(x3 - x2)));
        assert!(gap.contains(&(params.width - x3)));
        assert_eq!(env.grid().width(), params.width);
        assert_eq!(env.grid().height(), GRID_HEIGHT);

        let lines = env.obstacle_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.iter().map(|l| l.x).collect::<Vec<_>>(), vec![x1, x2, x3]);
        let mut strategies: Vec<_> = lines.iter().map(|l| l.strategy).collect();
        strategies.sort_by_key(|s| *s as u8);
        assert_eq!(strategies, vec![Strategy::Avoid, Strategy::MoveAway, Strategy::MoveInto]);
        for line in lines {
            assert_line_passable(env.grid(), line);
        }
    }
}

#[test]
fn border_agent_and_goal_placement() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let env = HlfdEnv::new(HlfdConfig::default(), &mut rng).unwrap();
    let grid = env.grid();
    let (w, h) = (grid.width(), grid.height());
    for x in 0..w {
        assert_eq!(grid.get(x, 0).unwrap(), Some(Cell::Wall));
        assert_eq!(grid.get(x, h - 1).unwrap(), Some(Cell::Wall));
    }
    let agent = env.agent();
    assert_eq!(agent.pos.0, 1);
    assert!((1..h - 1).contains(&agent.pos.1));
    assert_eq!(grid.get(agent.pos.0, agent.pos.1).unwrap(), None);
    assert!(agent.carrying.is_none());

    let goal = env.goal_pos();
    assert_eq!(goal.0, w - 2);
    assert_eq!(grid.get(goal.0, goal.1).unwrap(), Some(Cell::Goal));
    assert_eq!(env.mission(), MISSION);
    assert_eq!(env.step_count(), 0);
}

#[test]
fn every_strategy_can_be_configured() {
    let cfg = HlfdConfig {
        strategies: vec![Strategy::Door, Strategy::Ball, Strategy::Avoid],
        obstacle_type: ObstacleKind::Wall,
        obstacle_see_behind: true,
        ..HlfdConfig::default()
    };
    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let env = HlfdEnv::new(cfg.clone(), &mut rng).unwrap();
        for line in env.obstacle_lines() {
            assert_line_passable(env.grid(), line);
            let solid_row = if line.gap_y == 1 { 2 } else { 1 };
            assert_eq!(
                env.grid().get(line.x, solid_row).unwrap(),
                Some(Cell::obstacle(ObstacleKind::Wall, true))
            );
        }
    }
}

#[test]
fn fixed_agent_and_goal_positions() {
    let cfg = HlfdConfig { agent_pos: Some((2, 4)), goal_pos: Some((12, 4)), ..HlfdConfig::default() };
    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let env = HlfdEnv::new(cfg.clone(), &mut rng).unwrap();
        assert_eq!(env.agent().pos, (2, 4));
        assert_eq!(env.goal_pos(), (12, 4));
        assert_eq!(env.grid().get(12, 4).unwrap(), Some(Cell::Goal));
        assert_eq!(env.grid().get(2, 4).unwrap(), None);
    }
}

#[test]
fn fixed_agent_on_an_obstacle_line_is_cleared() {
    // x=4 is an obstacle line whenever the first gap draws 4.
    let cfg = HlfdConfig { agent_pos: Some((4, 1)), ..HlfdConfig::default() };
    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let env = HlfdEnv::new(cfg.clone(), &mut rng).unwrap();
        assert_eq!(env.grid().get(4, 1).unwrap(), None);
    }
}

#[test]
fn invalid_configuration_is_rejected() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let short = HlfdConfig { strategies: vec![Strategy::Avoid], ..HlfdConfig::default() };
    assert!(matches!(HlfdEnv::new(short, &mut rng), Err(HlfdError::Config(_))));

    let even = HlfdConfig { view_size: 4, ..HlfdConfig::default() };
    assert!(matches!(HlfdEnv::new(even, &mut rng), Err(HlfdError::Config(_))));

    let on_border = HlfdConfig { agent_pos: Some((0, 3)), ..HlfdConfig::default() };
    assert!(matches!(HlfdEnv::new(on_border, &mut rng), Err(HlfdError::InvalidStart { x: 0, y: 3 })));

    let outside = HlfdConfig { goal_pos: Some((40, 3)), ..HlfdConfig::default() };
    assert!(matches!(HlfdEnv::new(outside, &mut rng), Err(HlfdError::OutOfBounds { .. })));

    let same = HlfdConfig { agent_pos: Some((2, 2)), goal_pos: Some((2, 2)), ..HlfdConfig::default() };
    assert!(matches!(HlfdEnv::new(same, &mut rng), Err(HlfdError::InvalidStart { .. })));
}

#[test]
fn same_seed_same_layout() {
    let a = HlfdEnv::new(HlfdConfig::default(), &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
    let b = HlfdEnv::new(HlfdConfig::default(), &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
    assert_eq!(a.grid(), b.grid());
    assert_eq!(a.agent(), b.agent());
    assert_eq!(a.observation(), b.observation());
}

#[test]
fn reset_does_not_reseed() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut env = HlfdEnv::new(HlfdConfig::default(), &mut rng).unwrap();
    let first = env.grid().clone();
    let mut grids = vec![first.clone()];
    for _ in 0..10 {
        env.reset(&mut rng).unwrap();
        grids.push(env.grid().clone());
    }
    assert!(grids.iter().any(|g| *g != first), "successive resets should draw fresh layouts");

    // Explicit reseeding replays the first layout.
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    env.reset(&mut rng).unwrap();
    assert_eq!(*env.grid(), first);
}
