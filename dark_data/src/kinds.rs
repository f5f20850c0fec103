//! Enumerations stored in the property tree as integer tags.
//!
//! Every enum here has a stable integer tag (`tag`/`from_tag`) used by the tree
//! encoding and a canonical display name via `Display`.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A compass heading for entities that face a direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardinalDirection {
    NotApplicable,
    Omnidirectional,
    #[default]
    North,
    East,
    South,
    West,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 6] = [
        Self::NotApplicable,
        Self::Omnidirectional,
        Self::North,
        Self::East,
        Self::South,
        Self::West,
    ];

    pub const fn tag(self) -> i64 {
        self as i64
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.tag() == tag)
    }

    /// Heading in degrees, clockwise from north.
    pub const fn to_degrees(self) -> f64 {
        match self {
            Self::NotApplicable | Self::Omnidirectional | Self::North => 0.0,
            Self::East => 90.0,
            Self::South => 180.0,
            Self::West => 270.0,
        }
    }

    /// The compass direction matching an angle, if the angle sits on one after snapping.
    pub fn from_degrees(degrees: f64) -> Option<Self> {
        let snapped = crate::snap_angle_to_world(degrees).rem_euclid(360.0);
        [Self::North, Self::East, Self::South, Self::West]
            .into_iter()
            .find(|d| (d.to_degrees() - snapped).abs() < f64::EPSILON)
    }

    /// Parse a typed direction word ("n", "north", ...).
    pub fn parse(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "n" | "north" | "up" => Some(Self::North),
            "e" | "east" | "right" => Some(Self::East),
            "s" | "south" | "down" => Some(Self::South),
            "w" | "west" | "left" => Some(Self::West),
            _ => None,
        }
    }

    /// Unit grid offset for one step in this direction. North is negative y.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::NotApplicable | Self::Omnidirectional => (0, 0),
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

impl Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApplicable => write!(f, "(N/A)"),
            Self::Omnidirectional => write!(f, "omnidirectional"),
            Self::North => write!(f, "north"),
            Self::East => write!(f, "east"),
            Self::South => write!(f, "south"),
            Self::West => write!(f, "west"),
        }
    }
}

/// What a wall, floor or object is made of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Material {
    #[default]
    Tile,
    Dirt,
    Grass,
    Brick,
    Glass,
    Wood,
    Metal,
    Vinyl,
    Stone,
    Marble,
    Concrete,
    Plastic,
}

impl Material {
    pub const ALL: [Material; 12] = [
        Self::Tile,
        Self::Dirt,
        Self::Grass,
        Self::Brick,
        Self::Glass,
        Self::Wood,
        Self::Metal,
        Self::Vinyl,
        Self::Stone,
        Self::Marble,
        Self::Concrete,
        Self::Plastic,
    ];

    pub const fn tag(self) -> i64 {
        self as i64
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.tag() == tag)
    }

    /// Noun form ("wood") or adjective form ("wooden").
    pub const fn name(self, as_adjective: bool) -> &'static str {
        match (self, as_adjective) {
            (Self::Tile, false) => "tile",
            (Self::Tile, true) => "tiled",
            (Self::Dirt, false) => "dirt",
            (Self::Dirt, true) => "dirt",
            (Self::Grass, false) => "grass",
            (Self::Grass, true) => "grassy",
            (Self::Brick, _) => "brick",
            (Self::Glass, _) => "glass",
            (Self::Wood, false) => "wood",
            (Self::Wood, true) => "wooden",
            (Self::Metal, false) => "metal",
            (Self::Metal, true) => "metallic",
            (Self::Vinyl, _) => "vinyl",
            (Self::Stone, _) => "stone",
            (Self::Marble, false) => "marble",
            (Self::Marble, true) => "marbled",
            (Self::Concrete, _) => "concrete",
            (Self::Plastic, _) => "plastic",
        }
    }
}

impl Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name(false))
    }
}

/// Elemental type of a fighting move, also used for what an entity is weak against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveType {
    #[default]
    Normal,
    Earth,
    Wind,
    Water,
    Fire,
}

impl MoveType {
    pub const ALL: [MoveType; 5] = [Self::Normal, Self::Earth, Self::Wind, Self::Water, Self::Fire];

    pub const fn tag(self) -> i64 {
        self as i64
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.tag() == tag)
    }
}

impl Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Earth => write!(f, "Earth"),
            Self::Wind => write!(f, "Wind"),
            Self::Water => write!(f, "Water"),
            Self::Fire => write!(f, "Fire"),
        }
    }
}

/// How a fighting move deals its effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveCategory {
    #[default]
    Physical,
    Special,
    Status,
}

impl MoveCategory {
    pub const ALL: [MoveCategory; 3] = [Self::Physical, Self::Special, Self::Status];

    pub const fn tag(self) -> i64 {
        self as i64
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.tag() == tag)
    }
}

impl Display for MoveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Physical => write!(f, "Physical"),
            Self::Special => write!(f, "Special"),
            Self::Status => write!(f, "Status"),
        }
    }
}

/// Temperament of a fightable entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Nature {
    #[default]
    Neutral,
    Brave,
    Calm,
    Timid,
    Hasty,
    Careful,
    Reckless,
    Cunning,
}

impl Nature {
    pub const ALL: [Nature; 8] = [
        Self::Neutral,
        Self::Brave,
        Self::Calm,
        Self::Timid,
        Self::Hasty,
        Self::Careful,
        Self::Reckless,
        Self::Cunning,
    ];

    pub const fn tag(self) -> i64 {
        self as i64
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.tag() == tag)
    }
}

impl Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neutral => write!(f, "Neutral"),
            Self::Brave => write!(f, "Brave"),
            Self::Calm => write!(f, "Calm"),
            Self::Timid => write!(f, "Timid"),
            Self::Hasty => write!(f, "Hasty"),
            Self::Careful => write!(f, "Careful"),
            Self::Reckless => write!(f, "Reckless"),
            Self::Cunning => write!(f, "Cunning"),
        }
    }
}

/// Lock state of a door tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DoorLockState {
    #[default]
    Unlocked,
    NeedsKey,
    NeedsSpell,
    Impassable,
}

impl DoorLockState {
    pub const ALL: [DoorLockState; 4] = [Self::Unlocked, Self::NeedsKey, Self::NeedsSpell, Self::Impassable];

    pub const fn tag(self) -> i64 {
        self as i64
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.tag() == tag)
    }
}

impl Display for DoorLockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlocked => write!(f, "Unlocked"),
            Self::NeedsKey => write!(f, "Needs Key"),
            Self::NeedsSpell => write!(f, "Needs Spell"),
            Self::Impassable => write!(f, "Impassable"),
        }
    }
}

/// Behaviour of a window tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowTileType {
    PermanentlyOpen,
    #[default]
    PermanentlyClosed,
    Openable,
    OpenableWithUnlockableId,
}

impl WindowTileType {
    pub const ALL: [WindowTileType; 4] = [
        Self::PermanentlyOpen,
        Self::PermanentlyClosed,
        Self::Openable,
        Self::OpenableWithUnlockableId,
    ];

    pub const fn tag(self) -> i64 {
        self as i64
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }
}

impl Display for WindowTileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermanentlyOpen => write!(f, "Permanently Open"),
            Self::PermanentlyClosed => write!(f, "Permanently Closed"),
            Self::Openable => write!(f, "Openable"),
            Self::OpenableWithUnlockableId => write!(f, "Openable With Unlockable ID"),
        }
    }
}

/// Where a staircase leads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StairDirection {
    #[default]
    Blocked,
    Down,
    Up,
}

impl StairDirection {
    pub const ALL: [StairDirection; 3] = [Self::Blocked, Self::Down, Self::Up];

    pub const fn tag(self) -> i64 {
        self as i64
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.tag() == tag)
    }
}

impl Display for StairDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocked => write!(f, "blocked"),
            Self::Down => write!(f, "down"),
            Self::Up => write!(f, "up"),
        }
    }
}

/// The kind of a map tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TileType {
    #[default]
    Floor,
    Wall,
    Door,
    Stairs,
    Elevator,
    Rope,
    Window,
}

impl TileType {
    pub const ALL: [TileType; 7] = [
        Self::Floor,
        Self::Wall,
        Self::Door,
        Self::Stairs,
        Self::Elevator,
        Self::Rope,
        Self::Window,
    ];

    pub const fn tag(self) -> i64 {
        self as i64
    }

    pub fn from_tag(tag: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// Floors and walls are scenery; every other tile can be interacted with.
    pub const fn is_interactable(self) -> bool {
        !matches!(self, Self::Floor | Self::Wall)
    }
}

impl Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Floor => write!(f, "floor"),
            Self::Wall => write!(f, "wall"),
            Self::Door => write!(f, "door"),
            Self::Stairs => write!(f, "stairs"),
            Self::Elevator => write!(f, "elevator"),
            Self::Rope => write!(f, "rope"),
            Self::Window => write!(f, "window"),
        }
    }
}
