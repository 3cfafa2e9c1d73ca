//! Corridor layout: a walled strip crossed by three obstacle lines, each
//! made passable by its own traversal strategy.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::HlfdError;
use crate::grid::Grid;
use crate::place::{Placer, Region};
use crate::types::{Color, Direction, ObstacleKind, Pos};

pub const NUM_OBSTACLES: usize = 3;
pub const OBSTACLE_MIN_GAP: i32 = 4;
pub const OBSTACLE_MAX_GAP: i32 = 6;
pub const GRID_HEIGHT: i32 = 9;

/// How an obstacle line is made traversable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Plain hole in the line.
    Avoid,
    /// Closed door in the line.
    Door,
    /// Hole with a ball parked just before it.
    Ball,
    /// Hole with a movable block parked just before it.
    MoveAway,
    /// No hole; a movable block to push into the line.
    MoveInto,
}

impl Strategy {
    pub fn default_set() -> Vec<Strategy> {
        vec![Strategy::Avoid, Strategy::MoveAway, Strategy::MoveInto]
    }
}

/// Obstacle x-coordinates and the resulting grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub obstacle_xs: [i32; NUM_OBSTACLES],
    pub width: i32,
    pub height: i32,
}

fn draw_gap(rng: &mut dyn RngCore) -> i32 {
    rng.gen_range(OBSTACLE_MIN_GAP..=OBSTACLE_MAX_GAP)
}

impl LayoutParams {
    /// Each gap, including the one after the last line, is drawn on its own.
    pub fn sample(rng: &mut dyn RngCore) -> Self {
        let mut obstacle_xs = [0; NUM_OBSTACLES];
        let mut x = 0;
        for slot in obstacle_xs.iter_mut() {
            x += draw_gap(rng);
            *slot = x;
        }
        let width = x + draw_gap(rng);
        Self { obstacle_xs, width, height: GRID_HEIGHT }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleLine {
    pub x: i32,
    pub strategy: Strategy,
    /// Row where the strategy's mechanism sits.
    pub gap_y: i32,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub params: LayoutParams,
    pub grid: Grid,
    pub lines: Vec<ObstacleLine>,
    pub agent_pos: Pos,
    pub agent_dir: Direction,
    pub goal_pos: Pos,
}

#[derive(Debug, Clone)]
pub struct LayoutGenerator<'a> {
    pub obstacle: Cell,
    pub strategies: &'a [Strategy],
    pub agent_pos: Option<Pos>,
    pub goal_pos: Option<Pos>,
    pub placer: &'a dyn Placer,
}

impl<'a> LayoutGenerator<'a> {
    pub fn new(kind: ObstacleKind, see_behind: bool, strategies: &'a [Strategy], placer: &'a dyn Placer) -> Self {
        Self { obstacle: Cell::obstacle(kind, see_behind), strategies, agent_pos: None, goal_pos: None, placer }
    }

    pub fn generate(&self, rng: &mut dyn RngCore) -> Result<Layout, HlfdError> {
        if self.strategies.len() != NUM_OBSTACLES {
            return Err(HlfdError::Config(format!(
                "{} strategies for {NUM_OBSTACLES} obstacle lines",
                self.strategies.len()
            )));
        }
        let params = LayoutParams::sample(rng);
        let (width, height) = (params.width, params.height);
        let mut grid = Grid::new(width, height)?;
        grid.wall_rect(0, 0, width, height)?;

        // Two independent permutations, paired by index.
        let mut xs = params.obstacle_xs;
        xs.shuffle(rng);
        let mut strategies = self.strategies.to_vec();
        strategies.shuffle(rng);

        let mut lines = Vec::with_capacity(NUM_OBSTACLES);
        for (&x, &strategy) in xs.iter().zip(strategies.iter()) {
            let gap_y = self.draw_line(&mut grid, x, strategy, rng)?;
            lines.push(ObstacleLine { x, strategy, gap_y });
        }
        lines.sort_by_key(|l| l.x);

        let (agent_pos, agent_dir) = match self.agent_pos {
            Some(pos) => {
                grid.set(pos.0, pos.1, None)?;
                (pos, Direction::ALL[rng.gen_range(0..Direction::ALL.len())])
            }
            None => self.placer.place_agent(&grid, Region::interior_column(1, height), rng)?,
        };

        let goal_pos = match self.goal_pos {
            Some(pos) => pos,
            None => self.placer.place(
                &grid,
                Region::interior_column(width - 2, height),
                &|p| p == agent_pos,
                rng,
            )?,
        };
        grid.set(goal_pos.0, goal_pos.1, Some(Cell::Goal))?;

        tracing::debug!(
            obstacle_xs = ?params.obstacle_xs,
            width,
            ?lines,
            ?agent_pos,
            ?goal_pos,
            "generated layout"
        );
        Ok(Layout { params, grid, lines, agent_pos, agent_dir, goal_pos })
    }

    /// Draws the solid line at `x`, then carves the strategy's mechanism.
    /// Returns the mechanism's row.
    fn draw_line(&self, grid: &mut Grid, x: i32, strategy: Strategy, rng: &mut dyn RngCore) -> Result<i32, HlfdError> {
        let height = grid.height();
        grid.vert_wall(x, 1, Some(height - 2), self.obstacle)?;
        let y = match strategy {
            Strategy::MoveAway => rng.gen_range(2..height - 2),
            _ => rng.gen_range(1..height - 1),
        };
        match strategy {
            Strategy::Avoid => grid.set(x, y, None)?,
            Strategy::Door => grid.set(x, y, Some(Cell::closed_door(random_color(rng))))?,
            Strategy::Ball => {
                grid.set(x, y, None)?;
                grid.set(x - 1, y, Some(Cell::Ball { color: random_color(rng) }))?;
            }
            Strategy::MoveAway => {
                let block = Cell::MovableBlock { color: random_color(rng) };
                grid.set(x, y, None)?;
                grid.set(x - 1, y, Some(block))?;
            }
            Strategy::MoveInto => {
                grid.set(x - 1, y, Some(Cell::MovableBlock { color: random_color(rng) }))?;
            }
        }
        Ok(y)
    }
}

fn random_color(rng: &mut dyn RngCore) -> Color {
    Color::ALL[rng.gen_range(0..Color::ALL.len())]
}
