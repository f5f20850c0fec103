//! Field descriptors for every stored property, grouped by capability.

use dark_data::{
    Colour, Difficulty, DoorLockState, Material, MoveCategory, MoveType, Nature, Rectangle, StairDirection,
    StatusCondition, TileType, WindowTileType, snap_angle_to_world,
};

use super::{Field, FieldSpec};

fn at_least_zero(value: i32) -> i32 {
    value.max(0)
}

fn at_least_zero_f64(value: f64) -> f64 {
    value.max(0.0)
}

fn grey() -> Colour {
    Colour::rgb(0x80, 0x80, 0x80)
}

// Named
pub static NAME: Field<String> = Field::new("name", "Name", String::new);
pub static DESCRIPTION: Field<String> = Field::new("description", "Description", String::new);

// Placed
pub static DIMENSIONS: Field<Rectangle> = Field::new("dimensions", "Dimensions", || Rectangle::new(0, 0, 1, 1));
pub static MAP_ICON: Field<String> = Field::new("mapIcon", "Map Icon", String::new);
pub static SCREEN_ICON: Field<String> = Field::new("screenIcon", "Screen Icon", String::new);
pub static INVENTORY_ICON: Field<String> = Field::new("inventoryIcon", "Inventory Icon", String::new);
pub static LIGHT_COLOUR: Field<Colour> = Field::new("lightColour", "Light Colour", || Colour::TRANSPARENT);
pub static LIGHT_RADIUS: Field<i32> = Field::new("lightRadius", "Light Radius", || 0).normalized(at_least_zero);

// Interactable
pub static INTERACTION_ID: Field<String> = Field::new("interactionId", "Interaction ID", String::new);

// Classified
pub static SUBTYPE: Field<String> = Field::new("subtype", "Subtype", String::new);
pub static IS_NPC: Field<bool> = Field::new("isNPC", "Is NPC", || false);
pub static DIFFICULTY: Field<Difficulty> = Field::new("difficulty", "Difficulty", Difficulty::all);

// Oriented
pub static DIRECTION: Field<f64> = Field::new("direction", "Direction", || 0.0).normalized(snap_angle_to_world);
pub static WEIGHT: Field<f64> = Field::new("weight", "Weight", || 80.0).normalized(at_least_zero_f64);

// Combatant
pub static LEVEL: Field<i32> = Field::new("level", "Level", || 1).normalized(at_least_zero);
pub static EXPERIENCE: Field<i32> = Field::new("experience", "Experience", || 0).normalized(at_least_zero);
pub static HIT_POINTS: Field<i32> = Field::new("hitPoints", "Hit Points", || 0).normalized(at_least_zero);
pub static MAX_HIT_POINTS: Field<i32> = Field::new("maxHitPoints", "Max Hit Points", || 0).normalized(at_least_zero);
pub static ATTACK: Field<i32> = Field::new("attack", "Attack", || 0).normalized(at_least_zero);
pub static DEFENSE: Field<i32> = Field::new("defense", "Defense", || 0).normalized(at_least_zero);
pub static SPECIAL_ATTACK: Field<i32> =
    Field::new("specialAttack", "Special Attack", || 0).normalized(at_least_zero);
pub static SPECIAL_DEFENSE: Field<i32> =
    Field::new("specialDefense", "Special Defense", || 0).normalized(at_least_zero);
pub static SPEED: Field<i32> = Field::new("speed", "Speed", || 0).normalized(at_least_zero);
pub static NATURE: Field<Nature> = Field::new("nature", "Nature", Nature::default);
pub static STATUS_CONDITION: Field<StatusCondition> =
    Field::new("statusCondition", "Status Condition", StatusCondition::normal);
pub static WEAK_AGAINST_TYPE: Field<MoveType> = Field::new("weakAgainstType", "Weak Against", MoveType::default);

// Weapon
pub static NORMAL_DAMAGE: Field<i32> = Field::new("normalDamage", "Normal Damage", || 0).normalized(at_least_zero);
pub static FIRE_DAMAGE: Field<i32> = Field::new("fireDamage", "Fire Damage", || 0).normalized(at_least_zero);
pub static ICE_DAMAGE: Field<i32> = Field::new("iceDamage", "Ice Damage", || 0).normalized(at_least_zero);
pub static POISON_DAMAGE: Field<i32> = Field::new("poisonDamage", "Poison Damage", || 0).normalized(at_least_zero);

// FightingMove
pub static MOVE_TYPE: Field<MoveType> = Field::new("moveType", "Move Type", MoveType::default);
pub static MOVE_CATEGORY: Field<MoveCategory> = Field::new("moveCategory", "Category", MoveCategory::default);
pub static PRIORITY: Field<i32> = Field::new("priority", "Priority", || 0);
pub static POWER: Field<i32> = Field::new("power", "Power", || 40).normalized(at_least_zero);
pub static ACCURACY: Field<i32> = Field::new("accuracy", "Accuracy", || 100).normalized(at_least_zero);
pub static POWER_POINTS: Field<i32> = Field::new("powerPoints", "Power Points", || 5).normalized(at_least_zero);
pub static MAX_POWER_POINTS: Field<i32> =
    Field::new("maxPowerPoints", "Max Power Points", || 10).normalized(at_least_zero);
pub static MAKES_CONTACT: Field<bool> = Field::new("makesContact", "Makes Contact", || false);

// Tiles
pub static TILE_TYPE: Field<TileType> = Field::new("tileType", "Tile Type", TileType::default);
pub static STAIR_DIRECTION: Field<StairDirection> =
    Field::new("stairDirection", "Stair Direction", StairDirection::default);
pub static LOCK_STATE: Field<DoorLockState> = Field::new("lockState", "Lock State", DoorLockState::default);
pub static SECRET: Field<bool> = Field::new("secret", "Secret", || false);
pub static UNLOCKABLE_IDS: Field<Vec<i32>> = Field::new("unlockableIDs", "Unlockable IDs", Vec::new);
pub static MATERIAL: Field<Material> = Field::new("material", "Material", Material::default);
pub static COLOUR: Field<Colour> = Field::new("colour", "Colour", grey);
pub static WINDOW_SUBTYPE: Field<WindowTileType> =
    Field::new("windowTileSubtype", "Window Type", WindowTileType::default);
pub static OPENED: Field<bool> = Field::new("opened", "Opened", || false);

/// A capability's fields, in the order they are seeded.
pub type FieldGroup = &'static [&'static dyn FieldSpec];

pub static NAMED: FieldGroup = &[&NAME, &DESCRIPTION];
pub static PLACED: FieldGroup = &[
    &DIMENSIONS,
    &MAP_ICON,
    &SCREEN_ICON,
    &INVENTORY_ICON,
    &LIGHT_COLOUR,
    &LIGHT_RADIUS,
];
pub static INTERACTABLE: FieldGroup = &[&INTERACTION_ID];
pub static CLASSIFIED: FieldGroup = &[&SUBTYPE, &IS_NPC, &DIFFICULTY];
pub static ORIENTED: FieldGroup = &[&DIRECTION, &WEIGHT];
pub static COMBATANT: FieldGroup = &[
    &LEVEL,
    &EXPERIENCE,
    &HIT_POINTS,
    &MAX_HIT_POINTS,
    &ATTACK,
    &DEFENSE,
    &SPECIAL_ATTACK,
    &SPECIAL_DEFENSE,
    &SPEED,
    &NATURE,
    &STATUS_CONDITION,
    &WEAK_AGAINST_TYPE,
];
pub static WEAPON: FieldGroup = &[&NORMAL_DAMAGE, &FIRE_DAMAGE, &ICE_DAMAGE, &POISON_DAMAGE];
pub static FIGHTING_MOVE: FieldGroup = &[
    &MOVE_TYPE,
    &MOVE_CATEGORY,
    &PRIORITY,
    &POWER,
    &ACCURACY,
    &POWER_POINTS,
    &MAX_POWER_POINTS,
    &MAKES_CONTACT,
];
pub static TILE: FieldGroup = &[&TILE_TYPE];
pub static STAIRS: FieldGroup = &[&STAIR_DIRECTION];
pub static DOOR: FieldGroup = &[&LOCK_STATE, &SECRET, &UNLOCKABLE_IDS];
pub static WALL: FieldGroup = &[&MATERIAL, &COLOUR];
pub static WINDOW: FieldGroup = &[&WINDOW_SUBTYPE, &OPENED, &UNLOCKABLE_IDS];

/// Every group, for id lookups that don't know the owning kind.
pub fn all_groups() -> [FieldGroup; 13] {
    [
        NAMED,
        PLACED,
        INTERACTABLE,
        CLASSIFIED,
        ORIENTED,
        COMBATANT,
        WEAPON,
        FIGHTING_MOVE,
        TILE,
        STAIRS,
        DOOR,
        WALL,
        WINDOW,
    ]
}
