use thiserror::Error;

/// Every error here aborts the current call; the episode should be reset
/// before it is stepped again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HlfdError {
    #[error("position ({x}, {y}) outside {width}x{height} grid")]
    OutOfBounds { x: i32, y: i32, width: i32, height: i32 },
    #[error("invalid action index {0} (expected 0..6)")]
    UnknownAction(u8),
    #[error("invalid direction index {0} (expected 0..3)")]
    UnknownDirection(u8),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("rejection sampling failed after {tries} tries")]
    PlacementFailed { tries: u32 },
    #[error("agent start ({x}, {y}) is not a free interior cell")]
    InvalidStart { x: i32, y: i32 },
}
