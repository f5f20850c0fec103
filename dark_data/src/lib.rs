//! Value types for the Dark Engine game-state model.

pub mod flags;
pub mod geometry;
pub mod kinds;

pub use flags::{Difficulty, FlagError, StatusCondition};
pub use geometry::{Colour, Point, Rectangle, WorldAngle, snap_angle_to_world};
pub use kinds::{
    CardinalDirection, DoorLockState, Material, MoveCategory, MoveType, Nature, StairDirection, TileType,
    WindowTileType,
};
