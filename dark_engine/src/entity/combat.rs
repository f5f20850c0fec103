//! Weapons and fighting moves.

use dark_data::{MoveCategory, MoveType};

use super::{Classified, Interactable, Inventoried, Oriented, Placed, entity_kind};
use crate::object::{EngineObject, Named};
use crate::schema::EntityKind;
use crate::schema::fields::{
    ACCURACY, FIRE_DAMAGE, ICE_DAMAGE, MAKES_CONTACT, MAX_POWER_POINTS, MOVE_CATEGORY, MOVE_TYPE, NORMAL_DAMAGE,
    POISON_DAMAGE, POWER, POWER_POINTS, PRIORITY,
};

entity_kind!(
    /// A carried weapon; a world entity with damage per element.
    Weapon,
    "weapon",
    EntityKind::Weapon,
    [Placed, Interactable, Classified, Oriented, Inventoried]
);

entity_kind!(
    /// A move a combatant knows.
    FightingMove,
    "fightingMove",
    EntityKind::FightingMove,
    []
);

macro_rules! int_field {
    ($get:ident, $set:ident, $field:ident) => {
        pub fn $get(&self) -> i32 {
            self.object.get(&$field)
        }

        pub fn $set(&mut self, value: i32) -> &mut Self {
            self.object.set(&$field, value);
            self
        }
    };
}

impl Weapon {
    pub fn new(name: &str) -> Self {
        let mut weapon = Self::from_object(EngineObject::create(EntityKind::Weapon));
        weapon.set_name(name);
        weapon
    }

    int_field!(normal_damage, set_normal_damage, NORMAL_DAMAGE);
    int_field!(fire_damage, set_fire_damage, FIRE_DAMAGE);
    int_field!(ice_damage, set_ice_damage, ICE_DAMAGE);
    int_field!(poison_damage, set_poison_damage, POISON_DAMAGE);

    pub fn total_damage(&self) -> i32 {
        [
            self.normal_damage(),
            self.fire_damage(),
            self.ice_damage(),
            self.poison_damage(),
        ]
        .into_iter()
        .fold(0, i32::saturating_add)
    }
}

impl FightingMove {
    pub fn new(name: &str, move_type: MoveType) -> Self {
        let mut fighting_move = Self::from_object(EngineObject::create(EntityKind::FightingMove));
        fighting_move.set_name(name).set_move_type(move_type);
        fighting_move
    }

    pub fn move_type(&self) -> MoveType {
        self.object.get(&MOVE_TYPE)
    }

    pub fn set_move_type(&mut self, move_type: MoveType) -> &mut Self {
        self.object.set(&MOVE_TYPE, move_type);
        self
    }

    pub fn move_category(&self) -> MoveCategory {
        self.object.get(&MOVE_CATEGORY)
    }

    pub fn set_move_category(&mut self, category: MoveCategory) -> &mut Self {
        self.object.set(&MOVE_CATEGORY, category);
        self
    }

    int_field!(priority, set_priority, PRIORITY);
    int_field!(power, set_power, POWER);
    int_field!(accuracy, set_accuracy, ACCURACY);
    int_field!(power_points, set_power_points, POWER_POINTS);
    int_field!(max_power_points, set_max_power_points, MAX_POWER_POINTS);

    pub fn makes_contact(&self) -> bool {
        self.object.get(&MAKES_CONTACT)
    }

    pub fn set_makes_contact(&mut self, makes_contact: bool) -> &mut Self {
        self.object.set(&MAKES_CONTACT, makes_contact);
        self
    }

    /// Whether the move has any uses left.
    pub fn is_usable(&self) -> bool {
        self.power_points() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Entity;

    #[test]
    fn move_defaults() {
        let ember = FightingMove::new("Ember", MoveType::Fire);
        assert_eq!(ember.move_type(), MoveType::Fire);
        assert_eq!(ember.move_category(), MoveCategory::default());
        assert_eq!(
            (ember.power(), ember.accuracy(), ember.power_points(), ember.max_power_points()),
            (40, 100, 5, 10)
        );
        assert_eq!(ember.priority(), 0);
        assert!(!ember.makes_contact());
        assert!(ember.is_usable());
        assert!(!ember.node().has_property("dimensions"));
    }

    #[test]
    fn priority_may_go_negative_but_power_may_not() {
        let mut slam = FightingMove::new("Slam", MoveType::Normal);
        slam.set_priority(-1).set_power(-30).set_power_points(0);
        assert_eq!(slam.priority(), -1);
        assert_eq!(slam.power(), 0);
        assert!(!slam.is_usable());
    }

    #[test]
    fn weapon_damage_clamps_and_sums() {
        let mut sword = Weapon::new("Flame Sword");
        sword.set_normal_damage(6).set_fire_damage(4).set_ice_damage(-2);
        assert_eq!(sword.ice_damage(), 0);
        assert_eq!(sword.total_damage(), 10);
        assert_eq!(sword.id(), "weapon");
        assert!((sword.weight() - 80.0).abs() < f64::EPSILON);
    }
}
