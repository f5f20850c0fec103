//! The game map document: definition catalogs, the placed world and the player.

use std::fmt;
use std::fs;
use std::path::Path;

use dark_data::{Point, Rectangle};
use log::{error, info, warn};

use crate::collection::ChildList;
use crate::entity::{Placed, Player, WorldItem};
use crate::error::EngineError;
use crate::object::{EngineObject, Entity, Named};
use crate::persist::{DocumentFormat, write_text_atomic};
use crate::schema::{EntityKind, validate_tree};
use crate::tree::{Node, UndoManager};

pub const DEFINITIONS: &str = "definitions";
pub const WORLD: &str = "world";

/// Template lists under `definitions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Catalog {
    Enemies,
    Weapons,
    Npcs,
    Moves,
    InanimateObjects,
}

impl Catalog {
    pub const ALL: [Catalog; 5] = [
        Catalog::Enemies,
        Catalog::Weapons,
        Catalog::Npcs,
        Catalog::Moves,
        Catalog::InanimateObjects,
    ];

    pub const fn node_type(self) -> &'static str {
        match self {
            Catalog::Enemies => "enemies",
            Catalog::Weapons => "weapons",
            Catalog::Npcs => "npcs",
            Catalog::Moves => "moves",
            Catalog::InanimateObjects => "inanimateObjects",
        }
    }

    /// Accepts the node type or a loose spelling ("enemy", "inanimate objects", "objects").
    pub fn parse(word: &str) -> Option<Catalog> {
        let key = word.trim().to_lowercase().replace([' ', '_', '-'], "");
        match key.as_str() {
            "enemies" | "enemy" => Some(Catalog::Enemies),
            "weapons" | "weapon" => Some(Catalog::Weapons),
            "npcs" | "npc" => Some(Catalog::Npcs),
            "moves" | "move" => Some(Catalog::Moves),
            "inanimateobjects" | "inanimateobject" | "objects" | "object" => Some(Catalog::InanimateObjects),
            _ => None,
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Catalog::Enemies => write!(f, "Enemies"),
            Catalog::Weapons => write!(f, "Weapons"),
            Catalog::Npcs => write!(f, "NPCs"),
            Catalog::Moves => write!(f, "Moves"),
            Catalog::InanimateObjects => write!(f, "Inanimate Objects"),
        }
    }
}

/// One `gameMap` document.
///
/// The player lives in `world` like any other placed object; the map keeps a
/// handle to it that is refreshed whenever the world is replaced.
#[derive(Debug, Clone)]
pub struct GameMap {
    object: EngineObject,
    player: Option<Player>,
}

impl Entity for GameMap {
    fn object(&self) -> &EngineObject {
        &self.object
    }

    fn object_mut(&mut self) -> &mut EngineObject {
        &mut self.object
    }
}

impl Default for GameMap {
    fn default() -> Self {
        GameMap::new("")
    }
}

impl GameMap {
    pub fn new(name: &str) -> Self {
        let mut map = Self {
            object: EngineObject::create(EntityKind::GameMap),
            player: None,
        };
        map.set_name(name);
        map.ensure_catalogs();
        info!("created map '{name}'");
        map
    }

    /// Route every later edit through `undo`.
    #[must_use]
    pub fn with_undo_manager(mut self, undo: UndoManager) -> Self {
        self.object.set_undo_manager(Some(undo));
        self.refresh_player();
        self
    }

    pub fn undo_manager(&self) -> Option<&UndoManager> {
        self.object.undo_manager()
    }

    fn ensure_catalogs(&self) {
        let definitions = self.node().get_or_create_child_with_type(DEFINITIONS);
        for catalog in Catalog::ALL {
            definitions.get_or_create_child_with_type(catalog.node_type());
        }
        self.node().get_or_create_child_with_type(WORLD);
    }

    // --- definitions --------------------------------------------------------

    pub fn catalog(&self, catalog: Catalog) -> ChildList {
        let definitions = self.node().get_or_create_child_with_type(DEFINITIONS);
        ChildList::new(&definitions, catalog.node_type(), self.undo_manager().cloned())
    }

    /// Store a copy of `template` in `catalog`.
    pub fn add_definition(&mut self, catalog: Catalog, template: &impl Entity) -> Node {
        self.catalog(catalog).add(template)
    }

    pub fn definitions(&self, catalog: Catalog) -> Vec<WorldItem> {
        self.classify_all(&self.catalog(catalog))
    }

    /// First template with this name in any catalog, ignoring case.
    pub fn find_definition(&self, name: &str) -> Option<(Catalog, WorldItem)> {
        Catalog::ALL.into_iter().find_map(|catalog| {
            let node = self.catalog(catalog).find_by_name(name)?;
            WorldItem::classify(node, self.undo_manager().cloned()).map(|item| (catalog, item))
        })
    }

    // --- world --------------------------------------------------------------

    pub fn world(&self) -> ChildList {
        self.object.child_list(WORLD)
    }

    /// Move `object` to `position`, then append a copy of it to the world.
    ///
    /// This always appends: placing the same object twice gives two entries.
    pub fn set_world_object<P: Placed>(&mut self, object: &mut P, position: Point) -> Node {
        object.set_position(position);
        let stored = self.world().add(&*object);
        if stored.has_type(EntityKind::Player.node_type()) {
            self.refresh_player();
        }
        stored
    }

    /// Every world node that maps to a known entity kind.
    pub fn world_items(&self) -> Vec<WorldItem> {
        self.classify_all(&self.world())
    }

    /// World items whose footprint covers `point`, in world order.
    pub fn objects_at(&self, point: Point) -> Vec<WorldItem> {
        self.world_items()
            .into_iter()
            .filter(|item| item.dimensions().is_some_and(|area| area.contains(point)))
            .collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<WorldItem> {
        let node = self.world().find_by_name(name)?;
        WorldItem::classify(node, self.undo_manager().cloned())
    }

    /// Remove this exact world entry. False if it isn't in the world.
    pub fn remove_world_item(&mut self, item: &WorldItem) -> bool {
        let world = self.world();
        let removed = world
            .node()
            .index_of(item.node())
            .is_some_and(|index| world.remove_at(index));
        if removed && item.is_player() {
            self.refresh_player();
        }
        removed
    }

    /// Smallest rectangle covering every placed world item.
    pub fn bounds(&self) -> Option<Rectangle> {
        self.world_items()
            .iter()
            .filter_map(WorldItem::dimensions)
            .reduce(Rectangle::union)
    }

    fn classify_all(&self, list: &ChildList) -> Vec<WorldItem> {
        list.iter()
            .filter_map(|node| WorldItem::classify(node, self.undo_manager().cloned()))
            .collect()
    }

    // --- player -------------------------------------------------------------

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    /// Put `player` into the world, replacing any player already there.
    pub fn set_player(&mut self, mut player: Player) {
        let world = self.world();
        while let Some(index) = world.iter().position(|node| node.has_type(EntityKind::Player.node_type())) {
            world.remove_at(index);
        }
        let position = player.position();
        self.set_world_object(&mut player, position);
    }

    /// Re-bind the player handle to the first `player` node in the world.
    pub fn refresh_player(&mut self) {
        let undo = self.undo_manager().cloned();
        self.player = self
            .world()
            .iter()
            .find(|node| node.has_type(EntityKind::Player.node_type()))
            .map(|node| Player::from_object(EngineObject::wrap(node, undo.clone())));
    }

    // --- persistence --------------------------------------------------------

    /// # Errors
    /// JSON serialisation failures.
    pub fn render(&self, format: DocumentFormat) -> Result<String, EngineError> {
        format.render(self.node()).map_err(|e| EngineError::Internal(e.to_string()))
    }

    pub fn to_xml_string(&self) -> String {
        crate::tree::xml::to_xml_string(self.node())
    }

    /// # Errors
    /// JSON serialisation failures.
    pub fn to_json_string(&self) -> Result<String, EngineError> {
        self.render(DocumentFormat::Json)
    }

    /// Save in the format the extension names.
    ///
    /// # Errors
    /// `SaveFailed` if the document can't be written.
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        self.save_as(path, DocumentFormat::from_path(path))
    }

    /// # Errors
    /// `SaveFailed` if the document can't be written.
    pub fn save_xml(&self, path: &Path) -> Result<(), EngineError> {
        self.save_as(path, DocumentFormat::Xml)
    }

    /// # Errors
    /// `SaveFailed` if the document can't be written.
    pub fn save_json(&self, path: &Path) -> Result<(), EngineError> {
        self.save_as(path, DocumentFormat::Json)
    }

    fn save_as(&self, path: &Path, format: DocumentFormat) -> Result<(), EngineError> {
        let text = self
            .render(format)
            .map_err(|e| EngineError::save_failed(path.display(), e))?;
        write_text_atomic(path, &text).map_err(|e| {
            error!("saving map to {} failed: {e}", path.display());
            EngineError::save_failed(path.display(), e)
        })?;
        info!("saved map '{}' as {format} to {}", self.name(), path.display());
        Ok(())
    }

    /// Load in the format the extension names.
    ///
    /// # Errors
    /// `LoadFailed` if the file can't be read, doesn't parse, isn't a `gameMap`
    /// or breaks the schema. The map is unchanged on failure.
    pub fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        self.load_as(path, DocumentFormat::from_path(path))
    }

    /// # Errors
    /// See [`GameMap::load`].
    pub fn load_xml(&mut self, path: &Path) -> Result<(), EngineError> {
        self.load_as(path, DocumentFormat::Xml)
    }

    /// # Errors
    /// See [`GameMap::load`].
    pub fn load_json(&mut self, path: &Path) -> Result<(), EngineError> {
        self.load_as(path, DocumentFormat::Json)
    }

    fn load_as(&mut self, path: &Path, format: DocumentFormat) -> Result<(), EngineError> {
        let outcome = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| self.load_str(&text, format).map_err(|e| e.to_string()));
        match outcome {
            Ok(()) => {
                info!("loaded map '{}' from {}", self.name(), path.display());
                Ok(())
            },
            Err(reason) => {
                error!("loading map from {} failed: {reason}", path.display());
                Err(EngineError::load_failed(path.display(), reason))
            },
        }
    }

    /// Replace this map's contents with a parsed document.
    ///
    /// The root must be a `gameMap` and the whole tree must pass schema
    /// validation before anything is touched. Undo history is cleared.
    ///
    /// # Errors
    /// - `Internal` if the text doesn't parse
    /// - `TypeMismatch` if the root is not a `gameMap`
    /// - `Validation` if any node breaks the schema
    pub fn load_str(&mut self, text: &str, format: DocumentFormat) -> Result<(), EngineError> {
        let loaded = format
            .parse(text)
            .map_err(|e| EngineError::Internal(format!("{format} document: {e}")))?;
        if !loaded.has_type(EntityKind::GameMap.node_type()) {
            return Err(EngineError::TypeMismatch {
                expected: EntityKind::GameMap.node_type().to_string(),
                found: loaded.node_type(),
            });
        }
        let problems = validate_tree(&loaded);
        if !problems.is_empty() {
            warn!("rejected {format} document with {} schema problem(s)", problems.len());
            return Err(EngineError::Validation(problems));
        }
        self.node().copy_from(&loaded);
        self.ensure_catalogs();
        if let Some(undo) = self.undo_manager() {
            undo.clear_history();
        }
        self.refresh_player();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Combatant, DoorTile, FightableEntity, Interactable, WallTile, WorldObject};
    use dark_data::{DoorLockState, Material};

    fn crypt() -> GameMap {
        let mut map = GameMap::new("Crypt");
        let mut wall = WallTile::new(Material::Stone);
        map.set_world_object(&mut wall, Point::new(0, 0));
        let mut door = DoorTile::new(DoorLockState::NeedsKey);
        map.set_world_object(&mut door, Point::new(1, 0));
        map.set_player(Player::new("Ash"));
        map.add_definition(Catalog::Enemies, &FightableEntity::new("Ghoul", 20));
        map
    }

    #[test]
    fn new_map_has_every_catalog() {
        let map = GameMap::new("Empty");
        let definitions = map.node().child_with_type(DEFINITIONS).expect("definitions");
        assert_eq!(definitions.num_children(), Catalog::ALL.len());
        assert!(map.world().is_empty());
        assert!(map.player().is_none());
        assert!(map.bounds().is_none());
    }

    #[test]
    fn catalog_names_parse_loosely() {
        assert_eq!(Catalog::parse("Inanimate Objects"), Some(Catalog::InanimateObjects));
        assert_eq!(Catalog::parse("enemy"), Some(Catalog::Enemies));
        assert_eq!(Catalog::parse("spells"), None);
    }

    #[test]
    fn placing_twice_appends_twice() {
        let mut map = GameMap::new("Hall");
        let mut statue = WorldObject::new("Statue");
        map.set_world_object(&mut statue, Point::new(2, 3));
        map.set_world_object(&mut statue, Point::new(2, 3));
        assert_eq!(map.world().len(), 2);
        assert_eq!(statue.position(), Point::new(2, 3));
        assert_eq!(map.objects_at(Point::new(2, 3)).len(), 2);
        assert!(map.objects_at(Point::new(0, 0)).is_empty());
    }

    #[test]
    fn player_handle_tracks_the_world() {
        let mut map = crypt();
        map.player_mut().expect("player").set_hit_points(30);
        let stored = map.find_by_name("Ash").expect("in world");
        assert_eq!(stored.hit_points(), Some(30));
        map.set_player(Player::new("Rowan"));
        assert_eq!(map.player().map(Named::name).as_deref(), Some("Rowan"));
        assert!(map.find_by_name("Ash").is_none());
    }

    #[test]
    fn finds_definitions_in_any_catalog() {
        let map = crypt();
        let (catalog, ghoul) = map.find_definition("ghoul").expect("ghoul");
        assert_eq!(catalog, Catalog::Enemies);
        assert!(ghoul.is_fightable());
        assert!(map.find_definition("dragon").is_none());
        assert_eq!(map.definitions(Catalog::Enemies).len(), 1);
    }

    #[test]
    fn bounds_cover_every_placed_item() {
        let map = crypt();
        assert_eq!(map.bounds(), Some(Rectangle::new(0, 0, 2, 1)));
    }

    #[test]
    fn loading_another_kind_leaves_the_map_alone() {
        let mut map = crypt();
        let before = map.node().deep_copy();
        let weapon = r#"<?xml version="1.0" encoding="UTF-8"?><weapon name="Club"/>"#;
        let err = map.load_str(weapon, DocumentFormat::Xml).unwrap_err();
        assert!(matches!(err, EngineError::TypeMismatch { ref found, .. } if found == "weapon"));
        assert!(map.node().is_equivalent_to(&before));
    }

    #[test]
    fn loading_a_bad_tag_is_rejected() {
        let mut map = crypt();
        let before = map.node().deep_copy();
        let text = r#"<gameMap name="Bad"><world><tile tileType="2" lockState="42"/></world></gameMap>"#;
        let err = map.load_str(text, DocumentFormat::Xml).unwrap_err();
        assert!(matches!(err, EngineError::Validation(ref problems) if problems.len() == 1));
        assert!(map.node().is_equivalent_to(&before));
    }

    #[test]
    fn string_round_trip_rebinds_the_player() {
        let map = crypt();
        let xml = map.to_xml_string();
        let mut copy = GameMap::new("");
        copy.load_str(&xml, DocumentFormat::Xml).expect("load");
        assert!(copy.node().is_equivalent_to(map.node()));
        assert_eq!(copy.player().map(Named::name).as_deref(), Some("Ash"));
        let door = copy.world_items().into_iter().find(WorldItem::is_door).expect("door");
        let door = DoorTile::adopt(door.node().clone()).expect("door");
        assert!(!door.is_interactable());
        assert_eq!(door.lock_state(), DoorLockState::NeedsKey);
    }
}
