use std::cell::RefCell;
use std::rc::Rc;

use dark_data::{Difficulty, DoorLockState, Point, Rectangle, StatusCondition, snap_angle_to_world};
use dark_engine::entity::{
    Classified, Combatant, DoorTile, FightableEntity, Interactable, Inventoried, Player, Unlockable, WorldObject,
};
use dark_engine::tree::{TreeEvent, TreeListener};
use dark_engine::{EngineError, Entity, GameMap, Named, Node, UndoManager, Var, WorldItem};

#[test]
fn snapping_is_idempotent_and_rounds_to_right_angles() {
    for x in [-725.3_f64, -90.0, -44.9, 0.0, 12.5, 44.9, 45.1, 134.0, 359.9, 1000.0] {
        let once = snap_angle_to_world(x);
        assert!((snap_angle_to_world(once) - once).abs() < f64::EPSILON, "{x}");
    }
    assert!((snap_angle_to_world(44.9_f64) - 0.0).abs() < f64::EPSILON);
    assert!((snap_angle_to_world(45.1_f64) - 90.0).abs() < f64::EPSILON);
}

#[test]
fn status_condition_rendering() {
    assert_eq!(StatusCondition::new(0).to_string(), "Normal");
    let both = StatusCondition::new(StatusCondition::BURNED | StatusCondition::FROZEN);
    let listed = both.render(true);
    let burned = listed.find("Burned").expect("burned listed");
    let frozen = listed.find("Frozen").expect("frozen listed");
    assert!(burned < frozen);
    // Single-value rendering shows only the first set flag even though both are stored.
    assert_eq!(both.render(false), "Burned");
    assert!(both.is_burned() && both.is_frozen());
}

#[test]
fn difficulty_zero_means_any() {
    assert_eq!(Difficulty::all().render(true), "Any");
}

#[test]
fn negative_attack_clamps_to_zero() {
    let mut enemy = FightableEntity::new("Bat", 4);
    enemy.set_attack(-5);
    assert_eq!(enemy.attack(), 0);
}

#[test]
fn same_item_twice_gives_two_inventory_entries() {
    let coin = WorldObject::new("Coin");
    let mut player = Player::new("Ash");
    player.add_to_inventory(&coin).add_to_inventory(&coin);
    assert_eq!(player.num_inventory_items(), 2);
}

#[test]
fn unlockable_ids_dedup_on_read() {
    let mut door = DoorTile::new(DoorLockState::NeedsKey);
    door.set_unlockable_ids(&[3, 1, 3, 2]);
    assert_eq!(door.unlockable_item_ids(), vec![1, 2, 3]);
}

#[test]
fn fresh_player_has_no_classification_properties() {
    let player = Player::new("Ash");
    for id in ["interactionId", "isNPC", "subtype", "difficulty"] {
        assert!(!player.node().has_property(id), "{id}");
    }
}

#[derive(Default)]
struct Recorder(RefCell<Vec<String>>);

impl TreeListener for Recorder {
    fn tree_changed(&self, event: &TreeEvent) {
        let line = match event {
            TreeEvent::PropertyChanged { property, .. } => format!("set {property}"),
            TreeEvent::ChildAdded { child, .. } => format!("add {}", child.node_type()),
            TreeEvent::ChildRemoved { index, .. } => format!("remove {index}"),
            TreeEvent::Redirected { node } => format!("redirect {}", node.node_type()),
        };
        self.0.borrow_mut().push(line);
    }
}

#[test]
fn map_listeners_hear_world_edits() {
    let mut map = GameMap::new("Watched");
    let recorder = Rc::new(Recorder::default());
    map.node().add_listener(recorder.clone());

    let mut rock = WorldObject::new("Rock");
    let stored = map.set_world_object(&mut rock, Point::new(2, 2));
    stored.set_property("name", "Boulder".into());
    let events = recorder.0.borrow().clone();
    assert_eq!(events, vec!["add worldObject".to_string(), "set name".to_string()]);
}

#[test]
fn undo_rolls_back_a_whole_edit_session() {
    let undo = UndoManager::new();
    let mut map = GameMap::new("Journal").with_undo_manager(undo.clone());
    undo.begin_transaction("furnish");
    let mut lamp = WorldObject::new("Lamp");
    lamp.set_interaction_id("3");
    map.set_world_object(&mut lamp, Point::new(1, 1));
    assert_eq!(map.world_items().len(), 1);

    assert!(undo.undo());
    assert!(map.world_items().is_empty());
    assert!(undo.redo());
    let Some(WorldItem::WorldObject(restored)) = map.find_by_name("lamp") else {
        panic!("lamp should be back as a world object");
    };
    assert_eq!(restored.interaction_id(), "3");
}

#[test]
fn blank_subtype_is_refused() {
    let mut enemy = FightableEntity::new("Wisp", 1);
    assert!(enemy.set_subtype("  ").is_err());
    assert!(enemy.set_subtype("spirit").is_ok());
    assert_eq!(enemy.name(), "Wisp");
}

#[test]
fn bounds_survive_coordinates_at_the_integer_limits() {
    let mut map = GameMap::new("Edges");
    map.set_world_object(&mut WorldObject::new("West Marker"), Point::new(i32::MIN, 0));
    map.set_world_object(&mut WorldObject::new("East Marker"), Point::new(10, 0));
    assert_eq!(map.bounds(), Some(Rectangle::new(i32::MIN, 0, i32::MAX, 1)));

    map.set_world_object(&mut WorldObject::new("Far Corner"), Point::new(i32::MAX, i32::MAX));
    assert_eq!(map.bounds(), Some(Rectangle::new(i32::MIN, 0, i32::MAX, i32::MAX)));
}

#[test]
fn rejected_player_node_keeps_its_properties() {
    let node = Node::new("player");
    node.set_property("isNPC", Var::Bool(true));
    node.set_property("level", Var::String("high".into()));
    let before = node.deep_copy();

    let err = Player::adopt(node.clone()).expect_err("bad level");
    assert!(matches!(err, EngineError::Validation(_)), "{err}");
    assert!(node.has_property("isNPC"));
    assert!(node.is_equivalent_to(&before));

    node.set_property("level", Var::Int(3));
    let player = Player::adopt(node.clone()).expect("valid player");
    assert!(!player.node().has_property("isNPC"));
    assert_eq!(player.level(), 3);
}
