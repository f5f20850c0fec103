//! Explicit schema for every entity kind.
//!
//! Each stored property is described once by a [`Field`]: its id, display label,
//! default and normalisation rule. Fields are grouped by capability in
//! [`fields`], and [`EntityKind::fields`] assembles the groups that apply to a
//! kind. The same tables seed defaults on construction, decode XML attribute
//! text and validate documents on load.

pub mod codec;
pub mod fields;

use std::fmt;

use dark_data::TileType;
use log::warn;

pub use codec::VarCodec;
pub use fields::FieldGroup;

use crate::tree::{Node, Var, VarKind};

/// Declarative descriptor for one typed property.
pub struct Field<T> {
    pub id: &'static str,
    pub label: &'static str,
    default: fn() -> T,
    normalize: fn(T) -> T,
}

fn unchanged<T>(value: T) -> T {
    value
}

impl<T: VarCodec> Field<T> {
    pub const fn new(id: &'static str, label: &'static str, default: fn() -> T) -> Self {
        Self {
            id,
            label,
            default,
            normalize: unchanged::<T>,
        }
    }

    /// Apply `rule` to every value written through this field.
    #[must_use]
    pub const fn normalized(self, rule: fn(T) -> T) -> Self {
        Self {
            normalize: rule,
            ..self
        }
    }

    pub fn default_value(&self) -> T {
        (self.default)()
    }

    pub fn normalize(&self, value: T) -> T {
        (self.normalize)(value)
    }

    /// Read the field from `node`, falling back to the default when it is absent or
    /// can't be decoded.
    pub fn read(&self, node: &Node) -> T {
        match node.property(self.id) {
            None => self.default_value(),
            Some(stored) => T::from_var(&stored).unwrap_or_else(|| {
                warn!(
                    "'{}' on '{}' holds undecodable value {stored}; using default",
                    self.id,
                    node.node_type()
                );
                self.default_value()
            }),
        }
    }

    /// Normalise `value` and encode it for storage.
    pub fn encode(&self, value: T) -> Var {
        self.normalize(value).to_var()
    }

    /// Like [`Field::encode`], but `None` when the stored form wouldn't decode
    /// again (a non-finite double, for one).
    pub fn encode_storable(&self, value: T) -> Option<Var> {
        let encoded = self.encode(value);
        T::from_var(&encoded).is_some().then_some(encoded)
    }
}

/// Type-erased view of a [`Field`], used by schema tables.
pub trait FieldSpec: Sync {
    fn id(&self) -> &'static str;
    fn label(&self) -> &'static str;
    fn kind(&self) -> VarKind;
    fn default_var(&self) -> Var;
    /// Why `value` can't be stored in this field, if it can't.
    fn check(&self, value: &Var) -> Result<(), Problem>;
    /// Parse user text into a normalised, storable value.
    fn parse_text(&self, text: &str) -> Option<Var>;
    /// Render a stored value for people.
    fn describe(&self, value: &Var) -> String;
}

/// Reason a stored value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    WrongKind,
    OutOfRange,
}

impl<T: VarCodec> FieldSpec for Field<T> {
    fn id(&self) -> &'static str {
        self.id
    }

    fn label(&self) -> &'static str {
        self.label
    }

    fn kind(&self) -> VarKind {
        T::KIND
    }

    fn default_var(&self) -> Var {
        self.encode(self.default_value())
    }

    fn check(&self, value: &Var) -> Result<(), Problem> {
        if !value.is_kind(T::KIND) {
            Err(Problem::WrongKind)
        } else if T::from_var(value).is_none() {
            Err(Problem::OutOfRange)
        } else {
            Ok(())
        }
    }

    fn parse_text(&self, text: &str) -> Option<Var> {
        T::parse_text(text).and_then(|v| self.encode_storable(v))
    }

    fn describe(&self, value: &Var) -> String {
        T::from_var(value).map_or_else(|| value.to_string(), |v| v.describe())
    }
}

/// Child lists that hold other nodes rather than being entities themselves.
pub const CONTAINERS: &[&str] = &[
    "inventory",
    "fightingMoves",
    "definitions",
    "world",
    "enemies",
    "weapons",
    "npcs",
    "moves",
    "inanimateObjects",
];

/// Every kind of entity the model knows how to store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    WorldObject,
    WorldEntity,
    FightableEntity,
    Player,
    Weapon,
    FightingMove,
    Tile(TileType),
    GameMap,
}

impl EntityKind {
    pub const fn node_type(self) -> &'static str {
        match self {
            EntityKind::WorldObject => "worldObject",
            EntityKind::WorldEntity => "worldEntity",
            EntityKind::FightableEntity => "fightableEntity",
            EntityKind::Player => "player",
            EntityKind::Weapon => "weapon",
            EntityKind::FightingMove => "fightingMove",
            EntityKind::Tile(_) => "tile",
            EntityKind::GameMap => "gameMap",
        }
    }

    /// Kind of an existing node. Tiles are told apart by their `tileType`.
    pub fn of(node: &Node) -> Option<EntityKind> {
        let kind = match node.node_type().as_str() {
            "worldObject" => EntityKind::WorldObject,
            "worldEntity" => EntityKind::WorldEntity,
            "fightableEntity" => EntityKind::FightableEntity,
            "player" => EntityKind::Player,
            "weapon" => EntityKind::Weapon,
            "fightingMove" => EntityKind::FightingMove,
            "tile" => EntityKind::Tile(fields::TILE_TYPE.read(node)),
            "gameMap" => EntityKind::GameMap,
            _ => return None,
        };
        Some(kind)
    }

    /// Capability groups stored on this kind, in seeding order.
    pub fn groups(self) -> Vec<FieldGroup> {
        use fields::{
            CLASSIFIED, COMBATANT, DOOR, FIGHTING_MOVE, INTERACTABLE, NAMED, ORIENTED, PLACED, STAIRS, TILE, WALL,
            WEAPON, WINDOW,
        };
        match self {
            EntityKind::WorldObject => vec![NAMED, PLACED, INTERACTABLE],
            EntityKind::WorldEntity => vec![NAMED, PLACED, INTERACTABLE, CLASSIFIED, ORIENTED],
            EntityKind::FightableEntity => vec![NAMED, PLACED, INTERACTABLE, CLASSIFIED, ORIENTED, COMBATANT],
            EntityKind::Player => vec![NAMED, PLACED, ORIENTED, COMBATANT],
            EntityKind::Weapon => vec![NAMED, PLACED, INTERACTABLE, CLASSIFIED, ORIENTED, WEAPON],
            EntityKind::FightingMove => vec![NAMED, FIGHTING_MOVE],
            EntityKind::Tile(tile_type) => {
                let mut groups = vec![NAMED, PLACED, INTERACTABLE, TILE];
                match tile_type {
                    TileType::Stairs => groups.push(STAIRS),
                    TileType::Door => groups.push(DOOR),
                    TileType::Wall => groups.push(WALL),
                    TileType::Window => groups.push(WINDOW),
                    TileType::Floor | TileType::Elevator | TileType::Rope => {},
                }
                groups
            },
            EntityKind::GameMap => vec![NAMED],
        }
    }

    /// Every field of this kind.
    pub fn fields(self) -> Vec<&'static dyn FieldSpec> {
        self.groups().into_iter().flatten().copied().collect()
    }

    /// Child lists every node of this kind carries.
    pub fn containers(self) -> &'static [&'static str] {
        match self {
            EntityKind::WorldEntity | EntityKind::Weapon | EntityKind::Tile(_) => &["inventory"],
            EntityKind::FightableEntity | EntityKind::Player => &["inventory", "fightingMoves"],
            EntityKind::GameMap => &["definitions", "world"],
            EntityKind::WorldObject | EntityKind::FightingMove => &[],
        }
    }

    /// Properties inherited by convention that this kind never carries.
    /// Adopting a node of the kind drops them.
    pub fn suppressed(self) -> &'static [&'static str] {
        match self {
            EntityKind::Player => &["interactionId", "isNPC", "subtype", "difficulty"],
            _ => &[],
        }
    }

    /// True if the kind is drawn on the map grid.
    pub fn is_placed(self) -> bool {
        !matches!(self, EntityKind::FightingMove | EntityKind::GameMap)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Tile(tile_type) => write!(f, "{tile_type} tile"),
            other => write!(f, "{}", other.node_type()),
        }
    }
}

/// Fields of `kind`, or `None` for node types outside the model.
pub fn for_kind(node_type: &str) -> Option<Vec<&'static dyn FieldSpec>> {
    let probe = Node::new(node_type);
    EntityKind::of(&probe).map(EntityKind::fields)
}

/// Look a field up by property id or display label, ignoring case.
pub fn find_field(fields: &[&'static dyn FieldSpec], name: &str) -> Option<&'static dyn FieldSpec> {
    let wanted = name.trim();
    fields
        .iter()
        .find(|f| f.id().eq_ignore_ascii_case(wanted) || f.label().eq_ignore_ascii_case(wanted))
        .copied()
}

/// The field with property id `id`, whichever kind owns it.
pub fn field_by_id(id: &str) -> Option<&'static dyn FieldSpec> {
    fields::all_groups()
        .into_iter()
        .flatten()
        .find(|f| f.id() == id)
        .copied()
}

/// Turn XML attribute text back into a typed value. Unknown ids and text that
/// doesn't parse are kept as strings for validation to report.
pub fn decode_attribute(id: &str, text: &str) -> Var {
    field_by_id(id)
        .and_then(|field| Var::from_attribute(text, field.kind()))
        .unwrap_or_else(|| Var::String(text.to_string()))
}

/// A problem found while validating a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    UnknownNodeType { path: String, node_type: String },
    UnknownProperty { path: String, id: String },
    WrongKind { path: String, id: String, expected: VarKind, found: String },
    OutOfRange { path: String, id: String, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownNodeType { path, node_type } => {
                write!(f, "unknown node type '{node_type}' at {path}")
            },
            ValidationError::UnknownProperty { path, id } => {
                write!(f, "unknown property '{id}' at {path}")
            },
            ValidationError::WrongKind {
                path,
                id,
                expected,
                found,
            } => {
                write!(f, "'{id}' at {path} should be a {expected}, found '{found}'")
            },
            ValidationError::OutOfRange { path, id, value } => {
                write!(f, "'{id}' at {path} has out of range value '{value}'")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check one node's own properties against its kind's schema.
pub fn validate_node(node: &Node, path: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let Some(kind) = EntityKind::of(node) else {
        if !CONTAINERS.contains(&node.node_type().as_str()) {
            errors.push(ValidationError::UnknownNodeType {
                path: path.to_string(),
                node_type: node.node_type(),
            });
        }
        return errors;
    };
    let fields = kind.fields();
    for (id, value) in node.properties() {
        let Some(field) = fields.iter().find(|f| f.id() == id) else {
            errors.push(ValidationError::UnknownProperty {
                path: path.to_string(),
                id,
            });
            continue;
        };
        match field.check(&value) {
            Ok(()) => {},
            Err(Problem::WrongKind) => errors.push(ValidationError::WrongKind {
                path: path.to_string(),
                id,
                expected: field.kind(),
                found: value.to_string(),
            }),
            Err(Problem::OutOfRange) => errors.push(ValidationError::OutOfRange {
                path: path.to_string(),
                id,
                value: value.to_string(),
            }),
        }
    }
    errors
}

/// Validate a whole document against the schema.
///
/// Missing properties are fine (they read as their defaults); unknown node types,
/// unknown properties and values of the wrong shape or range are reported.
///
/// ```
/// use dark_engine::schema::{ValidationError, validate_tree};
/// use dark_engine::tree::{Node, Var};
///
/// let weapon = Node::new("weapon");
/// weapon.set_property("name", Var::from("Rusty Sword"));
/// weapon.set_property("fireDamage", Var::from("scorching"));
/// let errors = validate_tree(&weapon);
/// assert_eq!(errors.len(), 1);
/// assert!(matches!(errors[0], ValidationError::WrongKind { .. }));
/// ```
pub fn validate_tree(root: &Node) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    validate_into(root, &root.node_type(), &mut errors);
    errors
}

fn validate_into(node: &Node, path: &str, errors: &mut Vec<ValidationError>) {
    errors.extend(validate_node(node, path));
    for (index, child) in node.children().iter().enumerate() {
        let child_path = format!("{path}/{}[{index}]", child.node_type());
        validate_into(child, &child_path, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dark_data::Difficulty;

    #[test]
    fn defaults_are_normalised_values() {
        assert_eq!(fields::WEIGHT.default_value(), 80.0);
        assert_eq!(fields::DIMENSIONS.default_var(), Var::from("0 0 1 1"));
        assert_eq!(fields::POWER.default_value(), 40);
        assert_eq!(fields::DIFFICULTY.default_value(), Difficulty::all());
    }

    #[test]
    fn fields_normalise_on_encode() {
        assert_eq!(fields::ATTACK.encode(-5), Var::Int(0));
        assert_eq!(fields::PRIORITY.encode(-5), Var::Int(-5));
        assert_eq!(fields::DIRECTION.encode(44.9), Var::Double(0.0));
        assert_eq!(fields::DIRECTION.encode(100.0), Var::Double(90.0));
    }

    #[test]
    fn undecodable_values_read_as_default() {
        let node = Node::new("fightableEntity");
        node.set_property("level", Var::from("high"));
        assert_eq!(fields::LEVEL.read(&node), 1);
    }

    #[test]
    fn player_schema_has_no_classification() {
        let fields = EntityKind::Player.fields();
        for absent in ["interactionId", "isNPC", "subtype", "difficulty"] {
            assert!(fields.iter().all(|f| f.id() != absent), "{absent}");
        }
        assert!(fields.iter().any(|f| f.id() == "hitPoints"));
    }

    #[test]
    fn tile_kinds_follow_tile_type() {
        let door = Node::new("tile");
        door.set_property("tileType", Var::Int(TileType::Door.tag()));
        let kind = EntityKind::of(&door).expect("tile");
        assert_eq!(kind, EntityKind::Tile(TileType::Door));
        assert!(kind.fields().iter().any(|f| f.id() == "lockState"));
        assert!(!kind.fields().iter().any(|f| f.id() == "material"));
    }

    #[test]
    fn attribute_decoding_uses_field_kinds() {
        assert_eq!(decode_attribute("weight", "80.0"), Var::Double(80.0));
        assert_eq!(decode_attribute("level", "3"), Var::Int(3));
        assert_eq!(decode_attribute("secret", "true"), Var::Bool(true));
        assert_eq!(decode_attribute("name", "42"), Var::from("42"));
        assert_eq!(decode_attribute("level", "three"), Var::from("three"));
        assert_eq!(decode_attribute("mystery", "x"), Var::from("x"));
    }

    #[test]
    fn validation_reports_bad_tags_and_unknowns() {
        let root = Node::new("gameMap");
        let world = Node::new("world");
        root.append_child(&world);
        let door = Node::new("tile");
        door.set_property("tileType", Var::Int(TileType::Door.tag()));
        door.set_property("lockState", Var::Int(42));
        door.set_property("colour", Var::from("ff000000"));
        world.append_child(&door);
        world.append_child(&Node::new("dragon"));

        let errors = validate_tree(&root);
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors.contains(&ValidationError::OutOfRange {
            path: "gameMap/world[0]/tile[0]".into(),
            id: "lockState".into(),
            value: "42".into(),
        }));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::UnknownProperty { id, .. } if id == "colour")));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::UnknownNodeType { .. })));
    }

    #[test]
    fn lookup_by_label_or_id() {
        let fields = EntityKind::FightableEntity.fields();
        assert_eq!(find_field(&fields, "hp").map(|f| f.id()), None);
        assert_eq!(find_field(&fields, "hitpoints").map(|f| f.id()), Some("hitPoints"));
        assert_eq!(find_field(&fields, "Special Attack").map(|f| f.id()), Some("specialAttack"));
        assert!(for_kind("tile").is_some());
        assert!(for_kind("dragon").is_none());
    }
}
