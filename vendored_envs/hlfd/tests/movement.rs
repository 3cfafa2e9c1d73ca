use hlfd_rs::types::{Action, Direction, ObstacleKind};
use hlfd_rs::{AgentState, Cell, Grid, HlfdConfig, HlfdEnv, HlfdError};

// 7x5 room: agent (1,2) facing east, goal (5,2).
fn corridor_7x5() -> HlfdEnv {
    let mut grid = Grid::new(7, 5).unwrap();
    grid.wall_rect(0, 0, 7, 5).unwrap();
    grid.set(5, 2, Some(Cell::Goal)).unwrap();
    let agent = AgentState { pos: (1, 2), dir: Direction::Right, carrying: None };
    HlfdEnv::from_parts(HlfdConfig::default(), grid, agent, (5, 2)).unwrap()
}

#[test]
fn basic_forward_movement() {
    let mut env = corridor_7x5();
    let r = env.step(Action::Forward).unwrap();
    assert_eq!(r.observation.agent_pos, (2, 2));
    assert_eq!(r.observation.direction, Direction::Right as u8);
    assert_eq!(r.reward, 0);
    assert!(!r.done);
    assert!(r.info.is_empty());
    assert_eq!(env.step_count(), 1);
}

#[test]
fn turning_cycles_without_moving() {
    let mut env = corridor_7x5();
    let r = env.step(Action::Right).unwrap();
    assert_eq!(r.observation.direction, Direction::Down as u8);
    let r = env.step(Action::Right).unwrap();
    assert_eq!(r.observation.direction, Direction::Left as u8);
    let r = env.step(Action::Left).unwrap();
    assert_eq!(r.observation.direction, Direction::Down as u8);
    for _ in 0..3 {
        env.step(Action::Left).unwrap();
    }
    let r = env.step(Action::Left).unwrap();
    assert_eq!(r.observation.direction, Direction::Down as u8);
    assert_eq!(r.observation.agent_pos, (1, 2));
    assert!(!r.done);
    assert_eq!(r.reward, 0);
}

#[test]
fn walls_block_forward() {
    let mut env = corridor_7x5();
    env.step(Action::Left).unwrap(); // face north
    env.step(Action::Forward).unwrap(); // (1,1)
    let r = env.step(Action::Forward).unwrap();
    assert_eq!(r.observation.agent_pos, (1, 1));
    assert_eq!(r.observation.direction, Direction::Up as u8);
    assert!(!r.done);
}

#[test]
fn reaching_goal_rewards_and_terminates() {
    let mut env = corridor_7x5();
    for expected_x in 2..=4 {
        let r = env.step(Action::Forward).unwrap();
        assert_eq!(r.observation.agent_pos, (expected_x, 2));
        assert!(!r.done);
    }
    let r = env.step(Action::Forward).unwrap();
    assert!(r.done);
    assert_eq!(r.reward, 1);
    assert_eq!(r.observation.agent_pos, (5, 2));
}

#[test]
fn lava_contact_terminates_without_reward() {
    let mut env = corridor_7x5();
    let mut grid = env.grid().clone();
    grid.set(2, 2, Some(Cell::obstacle(ObstacleKind::Lava, false))).unwrap();
    env = HlfdEnv::from_parts(HlfdConfig::default(), grid, *env.agent(), env.goal_pos()).unwrap();
    let r = env.step(Action::Forward).unwrap();
    assert!(r.done);
    assert_eq!(r.reward, 0);
    assert!(r.info.is_empty());
    assert_eq!(env.agent().pos, (2, 2), "lava can be stood on");
}

#[test]
fn goal_on_last_step_is_not_truncation() {
    let mut grid = Grid::new(5, 5).unwrap();
    grid.wall_rect(0, 0, 5, 5).unwrap();
    grid.set(2, 2, Some(Cell::Goal)).unwrap();
    let agent = AgentState { pos: (1, 2), dir: Direction::Right, carrying: None };
    let cfg = HlfdConfig { max_steps: Some(1), ..HlfdConfig::default() };
    let mut env = HlfdEnv::from_parts(cfg, grid, agent, (2, 2)).unwrap();
    let r = env.step(Action::Forward).unwrap();
    assert!(r.done);
    assert_eq!(r.reward, 1);
    assert!(r.info.is_empty());
}

#[test]
fn wall_obstacle_contact_terminates_in_place() {
    let mut grid = Grid::new(7, 5).unwrap();
    grid.wall_rect(0, 0, 7, 5).unwrap();
    grid.set(2, 2, Some(Cell::obstacle(ObstacleKind::Wall, false))).unwrap();
    let agent = AgentState { pos: (1, 2), dir: Direction::Right, carrying: None };
    let cfg = HlfdConfig { obstacle_type: ObstacleKind::Wall, ..HlfdConfig::default() };
    let mut env = HlfdEnv::from_parts(cfg, grid, agent, (5, 3)).unwrap();
    let r = env.step(Action::Forward).unwrap();
    assert!(r.done);
    assert_eq!(r.reward, 0);
    assert_eq!(r.observation.agent_pos, (1, 2));
}

#[test]
fn done_action_is_a_noop() {
    let mut env = corridor_7x5();
    let before = env.observation();
    let r = env.step(Action::Done).unwrap();
    assert!(!r.done);
    assert_eq!(r.observation, before);
}

#[test]
fn step_limit_forces_termination() {
    let mut grid = Grid::new(7, 5).unwrap();
    grid.wall_rect(0, 0, 7, 5).unwrap();
    let agent = AgentState { pos: (1, 2), dir: Direction::Right, carrying: None };
    let cfg = HlfdConfig { max_steps: Some(3), ..HlfdConfig::default() };
    let mut env = HlfdEnv::from_parts(cfg, grid, agent, (5, 2)).unwrap();
    assert!(!env.step(Action::Left).unwrap().done);
    assert!(!env.step(Action::Left).unwrap().done);
    let r = env.step(Action::Left).unwrap();
    assert!(r.done);
    assert_eq!(r.reward, 0);
    assert_eq!(r.info.get("truncated"), Some(&serde_json::Value::Bool(true)));
}

#[test]
fn unbounded_by_default() {
    let mut env = corridor_7x5();
    for _ in 0..1000 {
        assert!(!env.step(Action::Left).unwrap().done);
    }
    assert_eq!(env.step_count(), 1000);
}

#[test]
fn unknown_action_index_is_fatal() {
    let mut env = corridor_7x5();
    assert_eq!(env.step_index(9).unwrap_err(), HlfdError::UnknownAction(9));
    assert!(env.step_index(Action::Forward as u8).is_ok());
}

#[test]
fn front_positions_follow_heading() {
    let mut env = corridor_7x5();
    assert_eq!(env.front_pos(), (2, 2));
    assert_eq!(env.front_front_pos(), (3, 2));
    env.step(Action::Right).unwrap();
    assert_eq!(env.front_pos(), (1, 3));
    assert_eq!(env.front_front_pos(), (1, 4));
}
