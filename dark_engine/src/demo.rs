//! The built-in crypt used when no map file is configured.

use dark_data::{
    CardinalDirection, DoorLockState, Material, MoveCategory, MoveType, Nature, Point, StairDirection, WindowTileType,
};

use log::warn;

use crate::entity::{
    Classified, Combatant, DoorTile, FightableEntity, FightingMove, Interactable, Oriented, Placed, Player, StairTile,
    Unlockable, WallTile, Weapon, WindowTile, WorldObject,
};
use crate::map::{Catalog, GameMap};
use crate::object::Named;

pub const CRYPT_KEY_ID: i32 = 7;
const WIDTH: i32 = 7;
const HEIGHT: i32 = 5;

/// A 7x5 walled crypt: the player in the middle, a key on the floor, a locked
/// door on the east wall, a shut window to the north and stairs down.
pub fn crypt() -> GameMap {
    let mut map = GameMap::new("The Crypt");
    map.set_description("A low vault that smells of old candles.");
    add_definitions(&mut map);

    for x in 0..WIDTH {
        for y in 0..HEIGHT {
            let edge = x == 0 || y == 0 || x == WIDTH - 1 || y == HEIGHT - 1;
            let opening = (x, y) == (WIDTH - 1, 2) || (x, y) == (3, 0);
            if edge && !opening {
                map.set_world_object(&mut WallTile::new(Material::Stone), Point::new(x, y));
            }
        }
    }

    let mut door = DoorTile::new(DoorLockState::NeedsKey);
    door.set_name("Crypt Door").set_unlockable_id(CRYPT_KEY_ID);
    map.set_world_object(&mut door, Point::new(WIDTH - 1, 2));

    let mut window = WindowTile::new(WindowTileType::Openable);
    window.set_name("Barred Window");
    map.set_world_object(&mut window, Point::new(3, 0));

    let mut stairs = StairTile::new(StairDirection::Down);
    stairs.set_name("Worn Stairs");
    map.set_world_object(&mut stairs, Point::new(1, 3));

    let mut key = crypt_key();
    map.set_world_object(&mut key, Point::new(4, 3));

    let mut ghoul = ghoul();
    ghoul.face(CardinalDirection::West);
    map.set_world_object(&mut ghoul, Point::new(4, 1));

    let mut player = Player::new("Wanderer");
    player
        .set_description("A lantern-bearer with more courage than sense.")
        .set_position(Point::new(2, 2))
        .face(CardinalDirection::East);
    player.set_attack(8).set_defense(6).set_level(1);
    map.set_player(player);
    map
}

fn add_definitions(map: &mut GameMap) {
    map.add_definition(Catalog::Enemies, &ghoul());
    let mut skeleton = FightableEntity::new("Skeleton", 15);
    skeleton.set_attack(6).set_defense(2).set_nature(Nature::Reckless);
    map.add_definition(Catalog::Enemies, &skeleton);

    let mut sword = Weapon::new("Rusty Sword");
    sword.set_normal_damage(5).set_poison_damage(1);
    map.add_definition(Catalog::Weapons, &sword);

    map.add_definition(Catalog::Moves, &claw());

    map.add_definition(Catalog::InanimateObjects, &crypt_key());
    let mut torch = WorldObject::new("Torch");
    torch.set_light_radius(3);
    map.add_definition(Catalog::InanimateObjects, &torch);
}

fn crypt_key() -> WorldObject {
    let mut key = WorldObject::new("Crypt Key");
    key.set_interaction_id(&CRYPT_KEY_ID.to_string());
    key
}

fn claw() -> FightingMove {
    let mut claw = FightingMove::new("Claw", MoveType::Normal);
    claw.set_move_category(MoveCategory::Physical)
        .set_power(30)
        .set_accuracy(90)
        .set_max_power_points(20)
        .set_power_points(20)
        .set_makes_contact(true);
    claw
}

fn ghoul() -> FightableEntity {
    let mut ghoul = FightableEntity::new("Ghoul", 20);
    ghoul.set_attack(7).set_defense(3).set_nature(Nature::Cunning);
    ghoul.add_fighting_move(&claw());
    if let Err(e) = ghoul.set_subtype("undead") {
        warn!("ghoul subtype: {e}");
    }
    ghoul
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Inventoried, WorldItem};
    use crate::object::Entity;
    use crate::processor::GameProcessor;

    #[test]
    fn crypt_is_walled_with_two_openings() {
        let map = crypt();
        let walls = map.world_items().iter().filter(|item| item.is_wall()).count();
        assert_eq!(walls, 18);
        assert_eq!(map.bounds().map(|b| (b.w, b.h)), Some((WIDTH, HEIGHT)));
        assert!(map.objects_at(Point::new(WIDTH - 1, 2)).iter().any(WorldItem::is_door));
    }

    #[test]
    fn player_starts_in_the_middle_empty_handed() {
        let map = crypt();
        let player = map.player().expect("player");
        assert_eq!(player.position(), Point::new(2, 2));
        assert_eq!(player.num_inventory_items(), 0);
        assert_eq!(player.hit_points(), Player::STARTING_HIT_POINTS);
    }

    #[test]
    fn definitions_cover_every_catalog_but_npcs() {
        let map = crypt();
        assert_eq!(map.definitions(Catalog::Enemies).len(), 2);
        assert_eq!(map.definitions(Catalog::Weapons).len(), 1);
        assert_eq!(map.definitions(Catalog::Moves).len(), 1);
        assert_eq!(map.definitions(Catalog::InanimateObjects).len(), 2);
        assert!(map.definitions(Catalog::Npcs).is_empty());
    }

    #[test]
    fn key_opens_the_crypt_door() {
        let mut game = GameProcessor::new(crypt(), true);
        game.process_message(r#"player add "crypt key""#).expect("key");
        for step in ["east", "east", "east", "east"] {
            game.process_message(step).expect("move");
        }
        assert_eq!(game.player().map(Placed::position), Some(Point::new(WIDTH - 1, 2)));
    }

    #[test]
    fn crypt_validates_after_a_round_trip() {
        let map = crypt();
        let mut copy = GameMap::new("copy");
        copy.load_str(&map.to_xml_string(), crate::persist::DocumentFormat::Xml)
            .expect("load");
        assert!(copy.node().is_equivalent_to(map.node()));
    }
}
