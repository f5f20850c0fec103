//! Map tiles. All share the `tile` node type and are told apart by `tileType`.

use dark_data::{Colour, DoorLockState, Material, StairDirection, TileType, WindowTileType};

use super::{Interactable, Inventoried, Placed, Unlockable, entity_kind};
use crate::object::EngineObject;
use crate::schema::EntityKind;
use crate::schema::fields::{COLOUR, LOCK_STATE, MATERIAL, OPENED, SECRET, STAIR_DIRECTION, TILE_TYPE, WINDOW_SUBTYPE};

entity_kind!(
    /// Any tile; the specialised kinds below add their own fields.
    EngineTile,
    "tile",
    EntityKind::Tile(_),
    [Placed, Interactable, Inventoried]
);

entity_kind!(StairTile, "stairs tile", EntityKind::Tile(TileType::Stairs), [Placed, Interactable, Inventoried]);

entity_kind!(
    DoorTile,
    "door tile",
    EntityKind::Tile(TileType::Door),
    [Placed, Interactable, Inventoried, Unlockable]
);

entity_kind!(WallTile, "wall tile", EntityKind::Tile(TileType::Wall), [Placed, Interactable, Inventoried]);

entity_kind!(
    WindowTile,
    "window tile",
    EntityKind::Tile(TileType::Window),
    [Placed, Interactable, Inventoried, Unlockable]
);

impl EngineTile {
    pub fn new(tile_type: TileType) -> Self {
        Self::from_object(EngineObject::create(EntityKind::Tile(tile_type)))
    }

    pub fn tile_type(&self) -> TileType {
        self.object.get(&TILE_TYPE)
    }
}

impl StairTile {
    pub fn new(direction: StairDirection) -> Self {
        let mut stairs = Self::from_object(EngineObject::create(EntityKind::Tile(TileType::Stairs)));
        stairs.set_stair_direction(direction);
        stairs
    }

    pub fn stair_direction(&self) -> StairDirection {
        self.object.get(&STAIR_DIRECTION)
    }

    pub fn set_stair_direction(&mut self, direction: StairDirection) -> &mut Self {
        self.object.set(&STAIR_DIRECTION, direction);
        self
    }

    pub fn is_blocked(&self) -> bool {
        self.stair_direction() == StairDirection::Blocked
    }
}

impl DoorTile {
    pub fn new(lock_state: DoorLockState) -> Self {
        let mut door = Self::from_object(EngineObject::create(EntityKind::Tile(TileType::Door)));
        door.set_lock_state(lock_state);
        door
    }

    pub fn lock_state(&self) -> DoorLockState {
        self.object.get(&LOCK_STATE)
    }

    pub fn set_lock_state(&mut self, lock_state: DoorLockState) -> &mut Self {
        self.object.set(&LOCK_STATE, lock_state);
        self
    }

    pub fn is_secret(&self) -> bool {
        self.object.get(&SECRET)
    }

    pub fn set_secret(&mut self, secret: bool) -> &mut Self {
        self.object.set(&SECRET, secret);
        self
    }

    pub fn is_passable(&self) -> bool {
        self.lock_state() == DoorLockState::Unlocked
    }

    /// Unlock the door if it needs a key and `key_id` is one of its ids.
    /// Returns whether the door is now open.
    pub fn try_unlock_with(&mut self, key_id: i32) -> bool {
        if self.lock_state() == DoorLockState::NeedsKey && self.can_be_unlocked_by(key_id) {
            self.set_lock_state(DoorLockState::Unlocked);
        }
        self.is_passable()
    }
}

impl WallTile {
    pub fn new(material: Material) -> Self {
        let mut wall = Self::from_object(EngineObject::create(EntityKind::Tile(TileType::Wall)));
        wall.set_material(material);
        wall
    }

    pub fn material(&self) -> Material {
        self.object.get(&MATERIAL)
    }

    pub fn set_material(&mut self, material: Material) -> &mut Self {
        self.object.set(&MATERIAL, material);
        self
    }

    pub fn colour(&self) -> Colour {
        self.object.get(&COLOUR)
    }

    pub fn set_colour(&mut self, colour: Colour) -> &mut Self {
        self.object.set(&COLOUR, colour);
        self
    }
}

impl WindowTile {
    pub fn new(subtype: WindowTileType) -> Self {
        let mut window = Self::from_object(EngineObject::create(EntityKind::Tile(TileType::Window)));
        window.set_window_type(subtype);
        window
    }

    pub fn window_type(&self) -> WindowTileType {
        self.object.get(&WINDOW_SUBTYPE)
    }

    pub fn set_window_type(&mut self, subtype: WindowTileType) -> &mut Self {
        self.object.set(&WINDOW_SUBTYPE, subtype);
        self
    }

    pub fn is_opened(&self) -> bool {
        self.object.get(&OPENED)
    }

    pub fn set_opened(&mut self, opened: bool) -> &mut Self {
        self.object.set(&OPENED, opened);
        self
    }

    /// Permanently open windows always let you through; openable ones only while open.
    pub fn is_passable(&self) -> bool {
        match self.window_type() {
            WindowTileType::PermanentlyOpen => true,
            WindowTileType::PermanentlyClosed => false,
            WindowTileType::Openable | WindowTileType::OpenableWithUnlockableId => self.is_opened(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::object::Entity;
    use crate::tree::Node;

    #[test]
    fn unlockable_ids_dedup_and_sort_on_read() {
        let mut door = DoorTile::new(DoorLockState::NeedsKey);
        door.set_unlockable_ids(&[3, 1, 3, 2]);
        assert_eq!(door.unlockable_item_ids(), vec![1, 2, 3]);
        door.set_unlockable_id(9);
        assert_eq!(door.unlockable_item_ids(), vec![9]);
    }

    #[test]
    fn ids_are_stored_verbatim() {
        let mut window = WindowTile::new(WindowTileType::OpenableWithUnlockableId);
        window.set_unlockable_ids(&[5, 5]);
        assert_eq!(
            window.node().property("unlockableIDs").and_then(|v| v.as_array().map(<[_]>::len)),
            Some(2)
        );
        assert_eq!(window.unlockable_item_ids(), vec![5]);
    }

    #[test]
    fn keyed_door_opens_only_for_its_key() {
        let mut door = DoorTile::new(DoorLockState::NeedsKey);
        door.set_unlockable_ids(&[7]);
        assert!(!door.try_unlock_with(8));
        assert!(door.try_unlock_with(7));
        assert_eq!(door.lock_state(), DoorLockState::Unlocked);

        let mut spell_door = DoorTile::new(DoorLockState::NeedsSpell);
        spell_door.set_unlockable_ids(&[7]);
        assert!(!spell_door.try_unlock_with(7));
    }

    #[test]
    fn window_passability() {
        let mut window = WindowTile::new(WindowTileType::Openable);
        assert!(!window.is_passable());
        window.set_opened(true);
        assert!(window.is_passable());
        assert!(WindowTile::new(WindowTileType::PermanentlyOpen).is_passable());
    }

    #[test]
    fn wall_defaults_to_grey() {
        let wall = WallTile::new(Material::Brick);
        assert_eq!(wall.material(), Material::Brick);
        assert_eq!(wall.colour(), Colour::rgb(0x80, 0x80, 0x80));
        assert!(!wall.node().has_property("lockState"));
    }

    #[test]
    fn adopt_checks_the_tile_type() {
        let node = WallTile::new(Material::Stone).into_node();
        assert!(EngineTile::adopt(node.clone()).is_ok());
        assert!(matches!(DoorTile::adopt(node), Err(EngineError::TypeMismatch { .. })));
        let stairs = StairTile::adopt(Node::new("tile"));
        assert!(matches!(stairs, Err(EngineError::TypeMismatch { ref found, .. }) if found == "floor tile"));
    }

    #[test]
    fn plain_tiles_report_their_type() {
        let rope = EngineTile::new(TileType::Rope);
        assert_eq!(rope.tile_type(), TileType::Rope);
        assert!(StairTile::new(StairDirection::Blocked).is_blocked());
        assert!(!StairTile::new(StairDirection::Up).is_blocked());
    }
}
