//! The player character.

use super::{Combatant, Inventoried, Oriented, Placed, entity_kind};
use crate::object::{EngineObject, Named};
use crate::schema::EntityKind;

entity_kind!(
    /// The one character the processor drives.
    ///
    /// Carries combat stats and an inventory but none of the classification
    /// fields: a player has no interaction id, NPC flag, subtype or difficulty.
    Player,
    "player",
    EntityKind::Player,
    [Placed, Oriented, Inventoried, Combatant]
);

impl Player {
    pub const STARTING_HIT_POINTS: i32 = 100;

    pub fn new(name: &str) -> Self {
        let mut player = Self::from_object(EngineObject::create(EntityKind::Player));
        player
            .set_name(name)
            .set_max_hit_points(Self::STARTING_HIT_POINTS)
            .set_hit_points(Self::STARTING_HIT_POINTS);
        player
    }
}
