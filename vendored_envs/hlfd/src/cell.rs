use serde::{Deserialize, Serialize};

use crate::types::{Color, DoorState, ObjectKind, ObstacleKind};

/// A grid occupant. Empty cells are `None` in the grid, never a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cell {
    Wall,
    Obstacle { kind: ObstacleKind, see_behind: bool },
    Goal,
    Door { color: Color, state: DoorState },
    Ball { color: Color },
    MovableBlock { color: Color },
}

impl Cell {
    pub fn obstacle(kind: ObstacleKind, see_behind: bool) -> Self {
        Cell::Obstacle { kind, see_behind }
    }

    pub fn closed_door(color: Color) -> Self {
        Cell::Door { color, state: DoorState::Closed }
    }

    /// Whether the agent may stand on this cell.
    pub fn can_overlap(&self) -> bool {
        match *self {
            Cell::Goal => true,
            Cell::Obstacle { kind, .. } => kind == ObstacleKind::Lava,
            Cell::Door { state, .. } => state == DoorState::Open,
            Cell::Wall | Cell::Ball { .. } | Cell::MovableBlock { .. } => false,
        }
    }

    pub fn can_pickup(&self) -> bool {
        matches!(self, Cell::Ball { .. })
    }

    pub fn see_behind(&self) -> bool {
        match *self {
            Cell::Wall => false,
            Cell::Obstacle { see_behind, .. } => see_behind,
            Cell::Door { state, .. } => state == DoorState::Open,
            Cell::Goal | Cell::Ball { .. } | Cell::MovableBlock { .. } => true,
        }
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self, Cell::Obstacle { .. })
    }

    /// Runs the occupant's toggle behaviour in place. Returns true if the
    /// cell changed. A locked door needs a key, and no key exists in this
    /// world, so it stays locked.
    pub fn toggle(&mut self) -> bool {
        match self {
            Cell::Door { state, .. } => match *state {
                DoorState::Open => {
                    *state = DoorState::Closed;
                    true
                }
                DoorState::Closed => {
                    *state = DoorState::Open;
                    true
                }
                DoorState::Locked => false,
            },
            _ => false,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match *self {
            Cell::Wall => ObjectKind::Wall,
            Cell::Obstacle { kind, .. } => kind.object_kind(),
            Cell::Goal => ObjectKind::Goal,
            Cell::Door { .. } => ObjectKind::Door,
            Cell::Ball { .. } => ObjectKind::Ball,
            Cell::MovableBlock { .. } => ObjectKind::MovableBlock,
        }
    }

    pub fn color(&self) -> Color {
        match *self {
            Cell::Wall => Color::Grey,
            Cell::Obstacle { kind, .. } => kind.color(),
            Cell::Goal => Color::Green,
            Cell::Door { color, .. } | Cell::Ball { color } | Cell::MovableBlock { color } => color,
        }
    }

    /// `[object, color, state]` triple.
    pub fn encode(&self) -> [u8; 3] {
        let state = match *self {
            Cell::Door { state, .. } => state as u8,
            _ => 0,
        };
        [self.kind() as u8, self.color() as u8, state]
    }
}
