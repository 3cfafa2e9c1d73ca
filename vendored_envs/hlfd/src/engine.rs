use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::cell::Cell;
use crate::error::HlfdError;
use crate::grid::Grid;
use crate::layout::{LayoutGenerator, LayoutParams, ObstacleLine, Strategy, NUM_OBSTACLES};
use crate::observation::{Encoder, Observation};
use crate::place::{Placer, RejectionPlacer};
use crate::types::{Action, Direction, ObjectKind, ObstacleKind, Pos};

pub const MISSION: &str = "Reach the goal";
pub const GOAL_REWARD: i32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HlfdConfig {
    pub agent_pos: Option<Pos>,
    pub goal_pos: Option<Pos>,
    pub obstacle_type: ObstacleKind,
    pub obstacle_see_behind: bool,
    pub view_size: usize,
    /// `None` never truncates.
    pub max_steps: Option<u32>,
    pub see_through_walls: bool,
    pub strategies: Vec<Strategy>,
}

impl Default for HlfdConfig {
    fn default() -> Self {
        Self {
            agent_pos: None,
            goal_pos: None,
            obstacle_type: ObstacleKind::Lava,
            obstacle_see_behind: false,
            view_size: 5,
            max_steps: None,
            see_through_walls: false,
            strategies: Strategy::default_set(),
        }
    }
}

impl HlfdConfig {
    pub fn validate(&self) -> Result<(), HlfdError> {
        if self.view_size < 3 || self.view_size % 2 == 0 {
            return Err(HlfdError::Config(format!("view_size must be odd and >= 3, got {}", self.view_size)));
        }
        if self.strategies.len() != NUM_OBSTACLES {
            return Err(HlfdError::Config(format!(
                "expected {NUM_OBSTACLES} strategies, got {}",
                self.strategies.len()
            )));
        }
        Ok(())
    }

    fn encoder(&self) -> Encoder {
        Encoder { view_size: self.view_size, see_through_walls: self.see_through_walls }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentState {
    pub pos: Pos,
    pub dir: Direction,
    /// The carried object has no grid position while it sits here.
    pub carrying: Option<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: i32,
    pub done: bool,
    /// `"truncated": true` when the step limit, not the action, ended the episode.
    pub info: Map<String, Json>,
}

/// Full-grid view of the episode, agent included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicState {
    pub grid_array: Vec<Vec<[u8; 3]>>, // [h][w][3] (object,color,state)
    pub agent_pos: Pos,
    pub agent_dir: u8,
    pub goal_pos: Pos,
    pub step_count: u32,
    pub max_steps: Option<u32>,
    pub mission: String,
    pub carrying: Option<Cell>,
}

/// One episode of the obstacle corridor.
///
/// Randomness is only drawn in [`HlfdEnv::new`] and [`HlfdEnv::reset`], from
/// the handle the caller passes in. Reset never reseeds: to replay a layout,
/// reseed the handle yourself before calling it.
#[derive(Debug, Clone)]
pub struct HlfdEnv {
    config: HlfdConfig,
    placer: Arc<dyn Placer>,
    params: LayoutParams,
    lines: Vec<ObstacleLine>,
    grid: Grid,
    agent: AgentState,
    goal_pos: Pos,
    step_count: u32,
    mission: String,
}

impl HlfdEnv {
    pub fn new(config: HlfdConfig, rng: &mut dyn RngCore) -> Result<Self, HlfdError> {
        Self::with_placer(config, Arc::new(RejectionPlacer::default()), rng)
    }

    /// Builds the env and generates its first episode.
    pub fn with_placer(config: HlfdConfig, placer: Arc<dyn Placer>, rng: &mut dyn RngCore) -> Result<Self, HlfdError> {
        config.validate()?;
        let mut env = Self {
            config,
            placer,
            params: LayoutParams { obstacle_xs: [0; NUM_OBSTACLES], width: 0, height: 0 },
            lines: Vec::new(),
            grid: Grid::new(3, 3)?,
            agent: AgentState { pos: (1, 1), dir: Direction::Right, carrying: None },
            goal_pos: (1, 1),
            step_count: 0,
            mission: MISSION.to_string(),
        };
        env.reset(rng)?;
        Ok(env)
    }

    /// Wraps a hand-built grid, skipping layout generation. The goal cell is
    /// whatever `goal_pos` points at.
    pub fn from_parts(config: HlfdConfig, grid: Grid, agent: AgentState, goal_pos: Pos) -> Result<Self, HlfdError> {
        config.validate()?;
        let params = LayoutParams { obstacle_xs: [0; NUM_OBSTACLES], width: grid.width(), height: grid.height() };
        let env = Self {
            config,
            placer: Arc::new(RejectionPlacer::default()),
            params,
            lines: Vec::new(),
            grid,
            agent,
            goal_pos,
            step_count: 0,
            mission: MISSION.to_string(),
        };
        env.check_start()?;
        Ok(env)
    }

    pub fn reset(&mut self, rng: &mut dyn RngCore) -> Result<Observation, HlfdError> {
        let generator = LayoutGenerator {
            agent_pos: self.config.agent_pos,
            goal_pos: self.config.goal_pos,
            ..LayoutGenerator::new(
                self.config.obstacle_type,
                self.config.obstacle_see_behind,
                &self.config.strategies,
                self.placer.as_ref(),
            )
        };
        let layout = generator.generate(rng)?;
        self.params = layout.params;
        self.lines = layout.lines;
        self.grid = layout.grid;
        self.agent = AgentState { pos: layout.agent_pos, dir: layout.agent_dir, carrying: None };
        self.goal_pos = layout.goal_pos;
        self.mission = MISSION.to_string();
        self.step_count = 0;
        self.check_start()?;
        Ok(self.observation())
    }

    fn check_start(&self) -> Result<(), HlfdError> {
        let (x, y) = self.agent.pos;
        if !self.grid.is_interior(self.agent.pos) || self.agent.pos == self.goal_pos {
            return Err(HlfdError::InvalidStart { x, y });
        }
        if let Some(cell) = self.grid.get(x, y)? {
            if !cell.can_overlap() {
                return Err(HlfdError::InvalidStart { x, y });
            }
        }
        if !self.grid.is_interior(self.goal_pos) {
            let (gx, gy) = self.goal_pos;
            return Err(HlfdError::Config(format!("goal ({gx}, {gy}) is not an interior cell")));
        }
        Ok(())
    }

    pub fn front_pos(&self) -> Pos {
        let (dx, dy) = self.agent.dir.delta();
        (self.agent.pos.0 + dx, self.agent.pos.1 + dy)
    }

    pub fn front_front_pos(&self) -> Pos {
        let (dx, dy) = self.agent.dir.delta();
        (self.agent.pos.0 + 2 * dx, self.agent.pos.1 + 2 * dy)
    }

    /// Parses a raw action index before stepping.
    pub fn step_index(&mut self, action: u8) -> Result<StepResult, HlfdError> {
        self.step(Action::try_from(action)?)
    }

    pub fn step(&mut self, action: Action) -> Result<StepResult, HlfdError> {
        let fwd_pos = self.front_pos();
        let fwd_cell = self.grid.get(fwd_pos.0, fwd_pos.1)?;

        self.step_count = self.step_count.saturating_add(1);
        let mut reward = 0;
        let mut done = false;

        match action {
            Action::Left => self.agent.dir = self.agent.dir.left(),
            Action::Right => self.agent.dir = self.agent.dir.right(),
            Action::Forward => {
                if fwd_cell.map_or(true, |c| c.can_overlap()) {
                    self.agent.pos = fwd_pos;
                }
                match fwd_cell {
                    Some(block @ Cell::MovableBlock { .. }) => self.push_block(block, fwd_pos)?,
                    Some(Cell::Goal) => {
                        done = true;
                        reward = GOAL_REWARD;
                    }
                    Some(Cell::Obstacle { .. }) => done = true,
                    _ => {}
                }
            }
            Action::Pickup => {
                if let Some(cell) = fwd_cell {
                    if cell.can_pickup() && self.agent.carrying.is_none() {
                        self.agent.carrying = Some(cell);
                        self.grid.set(fwd_pos.0, fwd_pos.1, None)?;
                    }
                }
            }
            Action::Drop => {
                if fwd_cell.is_none() {
                    if let Some(cell) = self.agent.carrying.take() {
                        self.grid.set(fwd_pos.0, fwd_pos.1, Some(cell))?;
                    }
                }
            }
            Action::Toggle => {
                if let Some(mut cell) = fwd_cell {
                    if cell.toggle() {
                        self.grid.set(fwd_pos.0, fwd_pos.1, Some(cell))?;
                    }
                }
            }
            Action::Done => {}
        }

        let mut info = Map::new();
        if !done && self.config.max_steps.is_some_and(|max| self.step_count >= max) {
            done = true;
            info.insert("truncated".into(), Json::Bool(true));
        }

        tracing::trace!(?action, reward, done, agent_pos = ?self.agent.pos, step = self.step_count, "step");
        Ok(StepResult { observation: self.observation(), reward, done, info })
    }

    /// Slides the block ahead one cell further. A block pushed into an
    /// obstacle destroys both; any other occupant stops the push.
    fn push_block(&mut self, block: Cell, fwd_pos: Pos) -> Result<(), HlfdError> {
        let ff_pos = self.front_front_pos();
        match self.grid.get(ff_pos.0, ff_pos.1)? {
            None => {
                self.grid.set(fwd_pos.0, fwd_pos.1, None)?;
                self.grid.set(ff_pos.0, ff_pos.1, Some(block))?;
                self.agent.pos = fwd_pos;
            }
            Some(Cell::Obstacle { .. }) => {
                self.grid.set(fwd_pos.0, fwd_pos.1, None)?;
                self.grid.set(ff_pos.0, ff_pos.1, None)?;
                self.agent.pos = fwd_pos;
            }
            Some(_) => {}
        }
        Ok(())
    }

    pub fn observation(&self) -> Observation {
        self.config.encoder().encode(&self.grid, self.agent.pos, self.agent.dir, self.agent.carrying, self.goal_pos)
    }

    pub fn public_state(&self) -> PublicState {
        let mut grid_array = self.grid.encode();
        let (ax, ay) = self.agent.pos;
        grid_array[ay as usize][ax as usize] = [ObjectKind::Agent as u8, 0, self.agent.dir as u8];
        PublicState {
            grid_array,
            agent_pos: self.agent.pos,
            agent_dir: self.agent.dir as u8,
            goal_pos: self.goal_pos,
            step_count: self.step_count,
            max_steps: self.config.max_steps,
            mission: self.mission.clone(),
            carrying: self.agent.carrying,
        }
    }

    pub fn config(&self) -> &HlfdConfig { &self.config }
    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn agent(&self) -> &AgentState { &self.agent }
    pub fn goal_pos(&self) -> Pos { self.goal_pos }
    pub fn step_count(&self) -> u32 { self.step_count }
    pub fn mission(&self) -> &str { &self.mission }
    pub fn layout_params(&self) -> &LayoutParams { &self.params }
    /// Obstacle lines of the current layout, left to right. Empty for
    /// hand-built grids.
    pub fn obstacle_lines(&self) -> &[ObstacleLine] { &self.lines }
}
