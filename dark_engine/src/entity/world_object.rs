//! Scenery, characters and enemies.

use super::{Classified, Combatant, Interactable, Inventoried, Oriented, Placed, entity_kind};
use crate::object::{EngineObject, Named};
use crate::schema::EntityKind;

entity_kind!(
    /// Anything placed on the map: furniture, items, decoration.
    WorldObject,
    "worldObject",
    EntityKind::WorldObject,
    [Placed, Interactable]
);

entity_kind!(
    /// A world object with a subtype, facing, weight and an inventory.
    WorldEntity,
    "worldEntity",
    EntityKind::WorldEntity,
    [Placed, Interactable, Classified, Oriented, Inventoried]
);

entity_kind!(
    /// An entity that can be fought.
    FightableEntity,
    "fightableEntity",
    EntityKind::FightableEntity,
    [Placed, Interactable, Classified, Oriented, Inventoried, Combatant]
);

impl WorldObject {
    pub fn new(name: &str) -> Self {
        let mut object = Self::from_object(EngineObject::create(EntityKind::WorldObject));
        object.set_name(name);
        object
    }
}

impl WorldEntity {
    pub fn new(name: &str) -> Self {
        let mut entity = Self::from_object(EngineObject::create(EntityKind::WorldEntity));
        entity.set_name(name);
        entity
    }
}

impl FightableEntity {
    /// A fresh enemy at full health.
    pub fn new(name: &str, hit_points: i32) -> Self {
        let mut enemy = Self::from_object(EngineObject::create(EntityKind::FightableEntity));
        enemy.set_name(name).set_max_hit_points(hit_points).set_hit_points(hit_points);
        enemy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::object::Entity;
    use crate::tree::{Node, UndoManager, Var};
    use dark_data::{CardinalDirection, Colour, Difficulty, Point, Rectangle, StatusCondition};

    #[test]
    fn world_object_defaults() {
        let rug = WorldObject::new("Rug");
        assert_eq!(rug.dimensions(), Rectangle::new(0, 0, 1, 1));
        assert!(!rug.is_interactable());
        assert!(!rug.casts_light());
        assert_eq!(rug.id(), "worldObject");
    }

    #[test]
    fn placement_and_light() {
        let mut torch = WorldObject::new("Torch");
        torch
            .set_position(Point::new(4, 7))
            .set_size(2, 3)
            .set_light_colour(Colour::rgb(255, 200, 80))
            .set_light_radius(-2)
            .set_interaction_id("torch-1");
        assert_eq!(torch.position(), Point::new(4, 7));
        assert_eq!((torch.width(), torch.height()), (2, 3));
        assert!(torch.casts_light());
        assert_eq!(torch.light_radius(), 0);
        assert!(torch.is_interactable());
    }

    #[test]
    fn direction_snaps_on_write() {
        let mut guard = WorldEntity::new("Guard");
        guard.set_direction(134.0);
        assert!((guard.direction() - 90.0).abs() < f64::EPSILON);
        assert_eq!(guard.node().property("direction"), Some(Var::Double(90.0)));
        assert_eq!(guard.facing(), CardinalDirection::East);
        guard.face(CardinalDirection::West);
        assert!((guard.direction() - 270.0).abs() < f64::EPSILON);
        assert!((guard.weight() - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn blank_subtype_is_rejected() {
        let mut guard = WorldEntity::new("Guard");
        guard.set_subtype("sentry").expect("subtype");
        let err = guard.set_subtype("   ").unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
        assert_eq!(guard.subtype(), "sentry");
    }

    #[test]
    fn difficulty_defaults_to_any() {
        let mut guard = WorldEntity::new("Guard");
        assert!(guard.difficulty().applies_to_all());
        guard.set_difficulty(Difficulty::hard());
        assert!(guard.difficulty().applies_to_hard());
        assert!(!guard.difficulty().applies_to_multiple_difficulties());
    }

    #[test]
    fn stats_clamp_negatives() {
        let mut goblin = FightableEntity::new("Goblin", 12);
        goblin.set_attack(-5).set_speed(-1).set_level(-3);
        assert_eq!(goblin.attack(), 0);
        assert_eq!(goblin.speed(), 0);
        assert_eq!(goblin.level(), 0);
        assert_eq!(goblin.hit_points(), 12);
        assert_eq!(goblin.max_hit_points(), 12);
        assert!(goblin.is_alive());
        goblin.set_hit_points(-40);
        assert!(goblin.is_dead());
    }

    #[test]
    fn same_item_twice_fills_two_slots() {
        let mut chest = WorldEntity::new("Chest");
        let coin = WorldObject::new("Coin");
        chest.add_to_inventory(&coin).add_to_inventory(&coin);
        assert_eq!(chest.num_inventory_items(), 2);
        assert!(chest.remove_from_inventory(&coin));
        assert_eq!(chest.num_inventory_items(), 1);
        let item = chest.inventory_item(0).expect("coin");
        assert!(item.is_world_object());
        assert!(chest.inventory_item(3).is_none());
    }

    #[test]
    fn status_condition_keeps_every_flag() {
        let mut goblin = FightableEntity::new("Goblin", 3);
        let both = StatusCondition::normal()
            .with(StatusCondition::BURNED, true)
            .with(StatusCondition::POISONED, true);
        goblin.set_status_condition(both);
        assert!(goblin.status_condition().has_multiple_conditions());
        assert_eq!(goblin.status_condition().render(true), "Burned, Poisoned");
    }

    #[test]
    fn adopt_seeds_without_clobbering() {
        let node = Node::new("fightableEntity");
        node.set_property("attack", Var::Int(9));
        let goblin = FightableEntity::adopt(node).expect("adopt");
        assert_eq!(goblin.attack(), 9);
        assert_eq!(goblin.level(), 1);
        assert!(goblin.node().child_with_type("fightingMoves").is_some());
        assert!(matches!(
            WorldEntity::adopt(Node::new("worldObject")),
            Err(EngineError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn journaled_entity_undoes_a_whole_command() {
        let undo = UndoManager::new();
        let mut goblin = FightableEntity::new("Goblin", 10).with_undo_manager(undo.clone());
        undo.begin_transaction("hit");
        goblin.set_hit_points(4).set_status_condition(StatusCondition::new(StatusCondition::FROZEN));
        assert!(undo.undo());
        assert_eq!(goblin.hit_points(), 10);
        assert!(goblin.status_condition().is_normal());
        assert!(undo.redo());
        assert_eq!(goblin.hit_points(), 4);
    }
}
