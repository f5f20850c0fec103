//! Typed entities and the capabilities they share.
//!
//! Each concrete entity owns one [`EngineObject`] and opts into the capability
//! traits that apply to its kind. The traits carry all accessor logic as default
//! methods over the schema fields, so a kind is just a struct plus a list of
//! `impl Capability for Kind {}` lines.

pub mod combat;
pub mod player;
pub mod tile;
pub mod world_object;

use dark_data::{
    CardinalDirection, Colour, Difficulty, MoveType, Nature, Point, Rectangle, StatusCondition, snap_angle_to_world,
};
use variantly::Variantly;

pub use combat::{FightingMove, Weapon};
pub use player::Player;
pub use tile::{DoorTile, EngineTile, StairTile, WallTile, WindowTile};
pub use world_object::{FightableEntity, WorldEntity, WorldObject};

use crate::collection::ChildList;
use crate::error::EngineError;
use crate::object::{EngineObject, Entity, Named};
use crate::schema::EntityKind;
use crate::schema::fields::{
    ATTACK, DEFENSE, DIFFICULTY, DIMENSIONS, DIRECTION, EXPERIENCE, HIT_POINTS, INTERACTION_ID, INVENTORY_ICON,
    IS_NPC, LEVEL, LIGHT_COLOUR, LIGHT_RADIUS, MAP_ICON, MAX_HIT_POINTS, NATURE, SCREEN_ICON, SPECIAL_ATTACK,
    SPECIAL_DEFENSE, SPEED, STATUS_CONDITION, SUBTYPE, UNLOCKABLE_IDS, WEAK_AGAINST_TYPE, WEIGHT,
};
use crate::tree::{Node, UndoManager};

pub const INVENTORY: &str = "inventory";
pub const FIGHTING_MOVES: &str = "fightingMoves";

/// Declares a concrete entity struct with its adopt/journal plumbing and
/// capability impls.
macro_rules! entity_kind {
    ($(#[$meta:meta])* $name:ident, $expected:literal, $accepts:pat, [$($capability:ident),* $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            object: $crate::object::EngineObject,
        }

        impl $name {
            /// Wrap an existing node, seeding fields it lacks.
            ///
            /// # Errors
            /// `TypeMismatch` if the node is a different kind, `Validation` if
            /// stored values break the schema.
            pub fn adopt(node: $crate::tree::Node) -> Result<Self, $crate::error::EngineError> {
                $crate::object::EngineObject::adopt(node, $expected, |kind| matches!(kind, $accepts))
                    .map(|object| Self { object })
            }

            /// Route every write through `undo`.
            #[must_use]
            pub fn with_undo_manager(mut self, undo: $crate::tree::UndoManager) -> Self {
                self.object.set_undo_manager(Some(undo));
                self
            }

            pub(crate) fn from_object(object: $crate::object::EngineObject) -> Self {
                Self { object }
            }

            pub fn into_node(self) -> $crate::tree::Node {
                self.object.into_node()
            }
        }

        impl $crate::object::Entity for $name {
            fn object(&self) -> &$crate::object::EngineObject {
                &self.object
            }

            fn object_mut(&mut self) -> &mut $crate::object::EngineObject {
                &mut self.object
            }
        }

        $(impl $capability for $name {})*
    };
}

pub(crate) use entity_kind;

/// Placement on the map grid, icons and light.
pub trait Placed: Entity {
    fn dimensions(&self) -> Rectangle {
        self.object().get(&DIMENSIONS)
    }

    fn set_dimensions(&mut self, dimensions: Rectangle) -> &mut Self {
        self.object_mut().set(&DIMENSIONS, dimensions);
        self
    }

    fn position(&self) -> Point {
        self.dimensions().position()
    }

    fn set_position(&mut self, position: Point) -> &mut Self {
        let moved = self.dimensions().with_position(position);
        self.set_dimensions(moved)
    }

    fn width(&self) -> i32 {
        self.dimensions().w
    }

    fn height(&self) -> i32 {
        self.dimensions().h
    }

    fn set_size(&mut self, width: i32, height: i32) -> &mut Self {
        let resized = self.dimensions().with_size(width, height);
        self.set_dimensions(resized)
    }

    fn map_icon(&self) -> String {
        self.object().get(&MAP_ICON)
    }

    fn set_map_icon(&mut self, icon: &str) -> &mut Self {
        self.object_mut().set(&MAP_ICON, icon.to_string());
        self
    }

    fn screen_icon(&self) -> String {
        self.object().get(&SCREEN_ICON)
    }

    fn set_screen_icon(&mut self, icon: &str) -> &mut Self {
        self.object_mut().set(&SCREEN_ICON, icon.to_string());
        self
    }

    fn inventory_icon(&self) -> String {
        self.object().get(&INVENTORY_ICON)
    }

    fn set_inventory_icon(&mut self, icon: &str) -> &mut Self {
        self.object_mut().set(&INVENTORY_ICON, icon.to_string());
        self
    }

    fn light_colour(&self) -> Colour {
        self.object().get(&LIGHT_COLOUR)
    }

    fn set_light_colour(&mut self, colour: Colour) -> &mut Self {
        self.object_mut().set(&LIGHT_COLOUR, colour);
        self
    }

    fn casts_light(&self) -> bool {
        !self.light_colour().is_transparent()
    }

    fn light_radius(&self) -> i32 {
        self.object().get(&LIGHT_RADIUS)
    }

    fn set_light_radius(&mut self, radius: i32) -> &mut Self {
        self.object_mut().set(&LIGHT_RADIUS, radius);
        self
    }
}

/// An id linking the entity to scripted interactions. Empty means none.
pub trait Interactable: Entity {
    fn interaction_id(&self) -> String {
        self.object().get(&INTERACTION_ID)
    }

    fn set_interaction_id(&mut self, id: &str) -> &mut Self {
        self.object_mut().set(&INTERACTION_ID, id.to_string());
        self
    }

    fn is_interactable(&self) -> bool {
        !self.interaction_id().is_empty()
    }
}

/// Subtype tag, NPC flag and the difficulties an entity appears on.
pub trait Classified: Entity {
    fn subtype(&self) -> String {
        self.object().get(&SUBTYPE)
    }

    /// # Errors
    /// `InvalidArgument` if `subtype` is blank; the stored value is left alone.
    fn set_subtype(&mut self, subtype: &str) -> Result<&mut Self, EngineError> {
        if subtype.trim().is_empty() {
            return Err(EngineError::InvalidArgument("subtype can't be blank".into()));
        }
        self.object_mut().set(&SUBTYPE, subtype.to_string());
        Ok(self)
    }

    fn is_npc(&self) -> bool {
        self.object().get(&IS_NPC)
    }

    fn set_npc(&mut self, is_npc: bool) -> &mut Self {
        self.object_mut().set(&IS_NPC, is_npc);
        self
    }

    fn difficulty(&self) -> Difficulty {
        self.object().get(&DIFFICULTY)
    }

    fn set_difficulty(&mut self, difficulty: Difficulty) -> &mut Self {
        self.object_mut().set(&DIFFICULTY, difficulty);
        self
    }
}

/// Facing and weight.
pub trait Oriented: Entity {
    /// Facing in degrees, always a multiple of 90.
    fn direction(&self) -> f64 {
        snap_angle_to_world(self.object().get(&DIRECTION))
    }

    /// Non-finite angles are ignored.
    fn set_direction(&mut self, degrees: f64) -> &mut Self {
        self.object_mut().set(&DIRECTION, degrees);
        self
    }

    fn facing(&self) -> CardinalDirection {
        CardinalDirection::from_degrees(self.direction()).unwrap_or_default()
    }

    fn face(&mut self, direction: CardinalDirection) -> &mut Self {
        self.set_direction(direction.to_degrees())
    }

    /// Weight in kilograms.
    fn weight(&self) -> f64 {
        self.object().get(&WEIGHT)
    }

    fn set_weight(&mut self, kilograms: f64) -> &mut Self {
        self.object_mut().set(&WEIGHT, kilograms);
        self
    }
}

/// Carries other world objects.
pub trait Inventoried: Entity {
    fn inventory(&self) -> ChildList {
        self.object().child_list(INVENTORY)
    }

    fn num_inventory_items(&self) -> usize {
        self.inventory().len()
    }

    fn inventory_item(&self, index: usize) -> Option<WorldItem> {
        self.inventory()
            .get(index)
            .and_then(|node| WorldItem::classify(node, self.object().undo_manager().cloned()))
    }

    fn add_to_inventory<E: Placed>(&mut self, item: &E) -> &mut Self
    where
        Self: Sized,
    {
        self.inventory().add(item);
        self
    }

    /// Remove the first inventory entry equal to `item`; false if there was none.
    fn remove_from_inventory<E: Placed>(&mut self, item: &E) -> bool
    where
        Self: Sized,
    {
        self.inventory().remove(item)
    }
}

macro_rules! clamped_stat {
    ($get:ident, $set:ident, $field:ident) => {
        fn $get(&self) -> i32 {
            self.object().get(&$field)
        }

        /// Negative values are stored as 0.
        fn $set(&mut self, value: i32) -> &mut Self {
            self.object_mut().set(&$field, value);
            self
        }
    };
}

/// Combat statistics and known fighting moves.
pub trait Combatant: Entity {
    clamped_stat!(level, set_level, LEVEL);
    clamped_stat!(experience, set_experience, EXPERIENCE);
    clamped_stat!(hit_points, set_hit_points, HIT_POINTS);
    clamped_stat!(max_hit_points, set_max_hit_points, MAX_HIT_POINTS);
    clamped_stat!(attack, set_attack, ATTACK);
    clamped_stat!(defense, set_defense, DEFENSE);
    clamped_stat!(special_attack, set_special_attack, SPECIAL_ATTACK);
    clamped_stat!(special_defense, set_special_defense, SPECIAL_DEFENSE);
    clamped_stat!(speed, set_speed, SPEED);

    fn nature(&self) -> Nature {
        self.object().get(&NATURE)
    }

    fn set_nature(&mut self, nature: Nature) -> &mut Self {
        self.object_mut().set(&NATURE, nature);
        self
    }

    fn status_condition(&self) -> StatusCondition {
        self.object().get(&STATUS_CONDITION)
    }

    fn set_status_condition(&mut self, condition: StatusCondition) -> &mut Self {
        self.object_mut().set(&STATUS_CONDITION, condition);
        self
    }

    fn weak_against_type(&self) -> MoveType {
        self.object().get(&WEAK_AGAINST_TYPE)
    }

    fn set_weak_against_type(&mut self, move_type: MoveType) -> &mut Self {
        self.object_mut().set(&WEAK_AGAINST_TYPE, move_type);
        self
    }

    fn is_alive(&self) -> bool {
        self.hit_points() > 0
    }

    fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    fn fighting_moves(&self) -> ChildList {
        self.object().child_list(FIGHTING_MOVES)
    }

    fn num_fighting_moves(&self) -> usize {
        self.fighting_moves().len()
    }

    fn fighting_move(&self, index: usize) -> Option<FightingMove> {
        let node = self.fighting_moves().get(index)?;
        let undo = self.object().undo_manager().cloned();
        Some(FightingMove::from_object(EngineObject::wrap(node, undo)))
    }

    fn add_fighting_move(&mut self, fighting_move: &FightingMove) -> &mut Self
    where
        Self: Sized,
    {
        self.fighting_moves().add(fighting_move);
        self
    }

    fn remove_fighting_move(&mut self, fighting_move: &FightingMove) -> bool {
        self.fighting_moves().remove(fighting_move)
    }
}

/// Needs one of a set of item ids to open.
pub trait Unlockable: Entity {
    /// Stored ids, deduplicated and sorted ascending.
    fn unlockable_item_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = Vec::new();
        for id in self.object().get(&UNLOCKABLE_IDS) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        ids
    }

    /// Store `ids` exactly as given; duplicates are dropped on read.
    fn set_unlockable_ids(&mut self, ids: &[i32]) -> &mut Self {
        self.object_mut().set(&UNLOCKABLE_IDS, ids.to_vec());
        self
    }

    /// Replace the whole set with a single id.
    fn set_unlockable_id(&mut self, id: i32) -> &mut Self {
        self.set_unlockable_ids(&[id])
    }

    fn can_be_unlocked_by(&self, id: i32) -> bool {
        self.unlockable_item_ids().contains(&id)
    }
}

/// Any node found in the world (or an inventory), classified by kind.
#[derive(Debug, Clone, PartialEq, Variantly)]
pub enum WorldItem {
    WorldObject(WorldObject),
    WorldEntity(WorldEntity),
    Fightable(FightableEntity),
    Player(Player),
    Weapon(Weapon),
    FightingMove(FightingMove),
    Tile(EngineTile),
    Stair(StairTile),
    Door(DoorTile),
    Wall(WallTile),
    Window(WindowTile),
}

macro_rules! each_item {
    ($item:expr, $e:ident => $body:expr) => {
        match $item {
            WorldItem::WorldObject($e) => $body,
            WorldItem::WorldEntity($e) => $body,
            WorldItem::Fightable($e) => $body,
            WorldItem::Player($e) => $body,
            WorldItem::Weapon($e) => $body,
            WorldItem::FightingMove($e) => $body,
            WorldItem::Tile($e) => $body,
            WorldItem::Stair($e) => $body,
            WorldItem::Door($e) => $body,
            WorldItem::Wall($e) => $body,
            WorldItem::Window($e) => $body,
        }
    };
}

impl Entity for WorldItem {
    fn object(&self) -> &EngineObject {
        each_item!(self, e => e.object())
    }

    fn object_mut(&mut self) -> &mut EngineObject {
        each_item!(self, e => e.object_mut())
    }
}

impl WorldItem {
    /// Wrap `node` as the entity its type (and tile type) says it is.
    pub fn classify(node: Node, undo: Option<UndoManager>) -> Option<WorldItem> {
        use dark_data::TileType;

        let kind = EntityKind::of(&node)?;
        let object = EngineObject::wrap(node, undo);
        let item = match kind {
            EntityKind::WorldObject => WorldItem::WorldObject(WorldObject::from_object(object)),
            EntityKind::WorldEntity => WorldItem::WorldEntity(WorldEntity::from_object(object)),
            EntityKind::FightableEntity => WorldItem::Fightable(FightableEntity::from_object(object)),
            EntityKind::Player => WorldItem::Player(Player::from_object(object)),
            EntityKind::Weapon => WorldItem::Weapon(Weapon::from_object(object)),
            EntityKind::FightingMove => WorldItem::FightingMove(FightingMove::from_object(object)),
            EntityKind::Tile(TileType::Stairs) => WorldItem::Stair(StairTile::from_object(object)),
            EntityKind::Tile(TileType::Door) => WorldItem::Door(DoorTile::from_object(object)),
            EntityKind::Tile(TileType::Wall) => WorldItem::Wall(WallTile::from_object(object)),
            EntityKind::Tile(TileType::Window) => WorldItem::Window(WindowTile::from_object(object)),
            EntityKind::Tile(_) => WorldItem::Tile(EngineTile::from_object(object)),
            EntityKind::GameMap => return None,
        };
        Some(item)
    }

    /// Footprint on the map, if the kind is placed at all.
    pub fn dimensions(&self) -> Option<Rectangle> {
        let object = self.object();
        object
            .kind()
            .filter(|kind| kind.is_placed())
            .map(|_| object.get(&DIMENSIONS))
    }

    /// Move a placed item's footprint to `position`. False for unplaced kinds.
    pub fn move_to(&mut self, position: Point) -> bool {
        let Some(area) = self.dimensions() else {
            return false;
        };
        self.object_mut().set(&DIMENSIONS, area.with_position(position));
        true
    }

    /// Name for messages; unnamed items fall back to their kind.
    pub fn label(&self) -> String {
        let name = self.name();
        if !name.trim().is_empty() {
            return name;
        }
        self.object()
            .kind()
            .map_or_else(|| self.id(), |kind| kind.to_string())
    }

    /// Current hit points for kinds that fight.
    pub fn hit_points(&self) -> Option<i32> {
        match self {
            WorldItem::Fightable(e) => Some(e.hit_points()),
            WorldItem::Player(e) => Some(e.hit_points()),
            _ => None,
        }
    }

    /// True for things that stop movement onto their tile.
    pub fn blocks_movement(&self) -> bool {
        match self {
            WorldItem::Wall(_) => true,
            WorldItem::Window(window) => !window.is_passable(),
            WorldItem::Door(door) => !door.is_passable(),
            WorldItem::Stair(stair) => stair.is_blocked(),
            WorldItem::Fightable(enemy) => enemy.is_alive(),
            _ => false,
        }
    }
}
