use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HlfdError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Action {
    Left = 0,
    Right = 1,
    Forward = 2,
    Pickup = 3,
    Drop = 4,
    Toggle = 5,
    Done = 6,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Left,
        Action::Right,
        Action::Forward,
        Action::Pickup,
        Action::Drop,
        Action::Toggle,
        Action::Done,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Forward => "forward",
            Action::Pickup => "pickup",
            Action::Drop => "drop",
            Action::Toggle => "toggle",
            Action::Done => "done",
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = HlfdError;
    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Action::ALL
            .get(v as usize)
            .copied()
            .ok_or(HlfdError::UnknownAction(v))
    }
}

impl FromStr for Action {
    type Err = HlfdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Action::ALL
            .into_iter()
            .find(|a| a.name() == lower)
            .ok_or_else(|| HlfdError::Config(format!("invalid action '{s}'")))
    }
}

/// Compass heading. `Right` is east and the discriminants match the
/// observation's `direction` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];

    pub fn right(self) -> Self {
        match self {
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::Up => Direction::Right,
        }
    }
    pub fn left(self) -> Self {
        match self {
            Direction::Right => Direction::Up,
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
        }
    }
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }
    /// Unit vector pointing to the agent's right-hand side.
    pub fn right_vec(self) -> (i32, i32) {
        let (dx, dy) = self.delta();
        (-dy, dx)
    }
}

impl TryFrom<u8> for Direction {
    type Error = HlfdError;
    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(v as usize)
            .copied()
            .ok_or(HlfdError::UnknownDirection(v))
    }
}

/// Object ids used in the first channel of an encoded cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ObjectKind {
    Unseen = 0,
    Empty = 1,
    Wall = 2,
    Door = 4,
    Ball = 6,
    Goal = 8,
    Lava = 9,
    Agent = 10,
    MovableBlock = 11,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    Red = 0,
    Green = 1,
    Blue = 2,
    Purple = 3,
    Yellow = 4,
    Grey = 5,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Purple,
        Color::Yellow,
        Color::Grey,
    ];
}

/// Door state channel: 0=open, 1=closed, 2=locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum DoorState {
    Open = 0,
    Closed = 1,
    Locked = 2,
}

/// Occupant used for the three obstacle lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    #[default]
    Lava,
    Wall,
}

impl ObstacleKind {
    pub fn object_kind(self) -> ObjectKind {
        match self {
            ObstacleKind::Lava => ObjectKind::Lava,
            ObstacleKind::Wall => ObjectKind::Wall,
        }
    }

    pub fn color(self) -> Color {
        match self {
            ObstacleKind::Lava => Color::Red,
            ObstacleKind::Wall => Color::Grey,
        }
    }
}

/// Grid position, `(x, y)` with `y` growing downwards.
pub type Pos = (i32, i32);
