//! Pure HLfD gridworld engine (no host traits).
//! - Cell and grid model with bounds-checked access
//! - Corridor layout generator with three obstacle lines
//! - Action state machine: movement, pickup/drop/toggle, block pushing
//! - Forward-facing partial observation with occlusion

pub mod cell;
pub mod engine;
pub mod error;
pub mod grid;
pub mod layout;
pub mod observation;
pub mod place;
pub mod types;

pub use cell::Cell;
pub use engine::{AgentState, HlfdConfig, HlfdEnv, PublicState, StepResult, GOAL_REWARD, MISSION};
pub use error::HlfdError;
pub use grid::Grid;
pub use layout::{Layout, LayoutGenerator, LayoutParams, ObstacleLine, Strategy};
pub use observation::{Encoder, Observation};
pub use place::{Placer, Region, RejectionPlacer};
pub use types::{Action, Color, Direction, DoorState, ObjectKind, ObstacleKind, Pos};
