//! The node-backed base every entity is built on.

use log::{debug, warn};

use crate::collection::ChildList;
use crate::error::EngineError;
use crate::schema::fields::{DESCRIPTION, NAME, SUBTYPE, TILE_TYPE};
use crate::schema::{EntityKind, Field, VarCodec, find_field, validate_node};
use crate::tree::{Node, UndoManager, Var};

/// One property node plus the optional undo journal its writes go through.
#[derive(Debug, Clone)]
pub struct EngineObject {
    node: Node,
    undo: Option<UndoManager>,
}

impl EngineObject {
    /// Create a fresh node of `kind` with every field and child list seeded.
    pub fn create(kind: EntityKind) -> Self {
        let node = Node::new(kind.node_type());
        if let EntityKind::Tile(tile_type) = kind {
            node.set_property(TILE_TYPE.id, TILE_TYPE.encode(tile_type));
        }
        let object = Self { node, undo: None };
        object.seed(kind);
        debug!("created {kind}");
        object
    }

    /// Wrap an existing node whose kind satisfies `accepts`.
    ///
    /// Fields and child lists the node lacks are seeded with defaults; values
    /// already present are left alone.
    ///
    /// # Errors
    /// - `TypeMismatch` if the node is not of an accepted kind
    /// - `Validation` if any stored property breaks the kind's schema
    pub fn adopt(node: Node, expected: &str, accepts: impl FnOnce(EntityKind) -> bool) -> Result<Self, EngineError> {
        let kind = EntityKind::of(&node)
            .filter(|kind| accepts(*kind))
            .ok_or_else(|| EngineError::TypeMismatch {
                expected: expected.to_string(),
                found: EntityKind::of(&node).map_or_else(|| node.node_type(), |k| k.to_string()),
            })?;
        let suppressed: Vec<&str> = kind.suppressed().iter().copied().filter(|id| node.has_property(id)).collect();
        let errors = if suppressed.is_empty() {
            validate_node(&node, &node.node_type())
        } else {
            let candidate = node.deep_copy();
            for id in &suppressed {
                candidate.remove_property(id);
            }
            validate_node(&candidate, &node.node_type())
        };
        if !errors.is_empty() {
            return Err(EngineError::Validation(errors));
        }
        for id in suppressed {
            node.remove_property(id);
        }
        let object = Self { node, undo: None };
        object.seed(kind);
        Ok(object)
    }

    /// Wrap without checks. Only for nodes already classified by [`EntityKind::of`].
    pub(crate) fn wrap(node: Node, undo: Option<UndoManager>) -> Self {
        Self { node, undo }
    }

    fn seed(&self, kind: EntityKind) {
        for field in kind.fields() {
            if !self.node.has_property(field.id()) {
                self.node.set_property(field.id(), field.default_var());
            }
        }
        for container in kind.containers() {
            self.node.get_or_create_child_with_type(container);
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn into_node(self) -> Node {
        self.node
    }

    /// The kind this node is stored as.
    pub fn kind(&self) -> Option<EntityKind> {
        EntityKind::of(&self.node)
    }

    pub fn undo_manager(&self) -> Option<&UndoManager> {
        self.undo.as_ref()
    }

    pub fn set_undo_manager(&mut self, undo: Option<UndoManager>) {
        self.undo = undo;
    }

    pub fn get<T: VarCodec>(&self, field: &Field<T>) -> T {
        field.read(&self.node)
    }

    /// Store `value`. A value that couldn't be read back is dropped with a
    /// warning and the old one kept.
    pub fn set<T: VarCodec>(&mut self, field: &Field<T>, value: T) {
        match field.encode_storable(value) {
            Some(encoded) => self.write(field.id, encoded),
            None => warn!(
                "ignoring unstorable value for '{}' on '{}'",
                field.id,
                self.node.node_type()
            ),
        }
    }

    /// Write a raw property, through the journal when one is attached.
    pub fn write(&self, id: &str, value: Var) {
        match &self.undo {
            Some(undo) => undo.set_property(&self.node, id, value),
            None => {
                self.node.set_property(id, value);
            },
        }
    }

    /// Remove a property, through the journal when one is attached.
    pub fn erase(&self, id: &str) {
        match &self.undo {
            Some(undo) => undo.remove_property(&self.node, id),
            None => {
                self.node.remove_property(id);
            },
        }
    }

    /// The named child list under this node, sharing this object's journal.
    pub fn child_list(&self, name: &str) -> ChildList {
        ChildList::new(&self.node, name, self.undo.clone())
    }

    /// Set a field from user text, matching the field by id or label.
    ///
    /// # Errors
    /// `InvalidArgument` if the kind has no such field, the text doesn't parse as
    /// the field's type, or a subtype would be blank.
    pub fn set_from_text(&mut self, field_name: &str, text: &str) -> Result<String, EngineError> {
        let kind = self
            .kind()
            .ok_or_else(|| EngineError::Internal(format!("'{}' is not an entity", self.node.node_type())))?;
        let fields = kind.fields();
        let field = find_field(&fields, field_name)
            .ok_or_else(|| EngineError::InvalidArgument(format!("a {kind} has no field '{field_name}'")))?;
        if field.id() == SUBTYPE.id && text.trim().is_empty() {
            return Err(EngineError::InvalidArgument("subtype can't be blank".into()));
        }
        let value = field
            .parse_text(text)
            .ok_or_else(|| EngineError::InvalidArgument(format!("'{text}' is not a valid {}", field.label())))?;
        let shown = field.describe(&value);
        self.write(field.id(), value);
        Ok(format!("{} = {shown}", field.label()))
    }
}

/// Structural equality: same kind, same property values, same children.
impl PartialEq for EngineObject {
    fn eq(&self, other: &Self) -> bool {
        self.node.is_equivalent_to(&other.node)
    }
}

/// Anything backed by an [`EngineObject`].
pub trait Entity {
    fn object(&self) -> &EngineObject;
    fn object_mut(&mut self) -> &mut EngineObject;

    fn node(&self) -> &Node {
        self.object().node()
    }

    /// The node type tag, fixed at construction.
    fn id(&self) -> String {
        self.node().node_type()
    }
}

impl Entity for EngineObject {
    fn object(&self) -> &EngineObject {
        self
    }

    fn object_mut(&mut self) -> &mut EngineObject {
        self
    }
}

/// Name and description, carried by every entity.
pub trait Named: Entity {
    fn name(&self) -> String {
        self.object().get(&NAME)
    }

    fn set_name(&mut self, name: &str) -> &mut Self {
        self.object_mut().set(&NAME, name.to_string());
        self
    }

    fn description(&self) -> String {
        self.object().get(&DESCRIPTION)
    }

    fn set_description(&mut self, description: &str) -> &mut Self {
        self.object_mut().set(&DESCRIPTION, description.to_string());
        self
    }
}

impl<E: Entity + ?Sized> Named for E {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fields::{DIRECTION, LEVEL, WEIGHT};

    #[test]
    fn create_seeds_every_field() {
        let object = EngineObject::create(EntityKind::FightableEntity);
        for field in EntityKind::FightableEntity.fields() {
            assert!(object.node().has_property(field.id()), "{}", field.id());
        }
        assert!(object.node().child_with_type("inventory").is_some());
        assert!(object.node().child_with_type("fightingMoves").is_some());
        assert_eq!(object.get(&LEVEL), 1);
    }

    #[test]
    fn adopt_keeps_existing_values() {
        let node = Node::new("worldEntity");
        node.set_property("weight", Var::Double(12.5));
        let object = EngineObject::adopt(node, "worldEntity", |k| k == EntityKind::WorldEntity).expect("adopt");
        assert!((object.get(&WEIGHT) - 12.5).abs() < f64::EPSILON);
        assert_eq!(object.get(&NAME), "");
    }

    #[test]
    fn adopt_rejects_other_kinds() {
        let err = EngineObject::adopt(Node::new("weapon"), "player", |k| k == EntityKind::Player).unwrap_err();
        assert!(matches!(err, EngineError::TypeMismatch { ref found, .. } if found == "weapon"));
    }

    #[test]
    fn adopt_rejects_bad_values() {
        let node = Node::new("fightingMove");
        node.set_property("moveType", Var::Int(77));
        let err = EngineObject::adopt(node, "fightingMove", |k| k == EntityKind::FightingMove).unwrap_err();
        assert!(matches!(err, EngineError::Validation(ref errors) if errors.len() == 1));
    }

    #[test]
    fn failed_adopt_leaves_the_node_alone() {
        let node = Node::new("player");
        node.set_property("isNPC", Var::Bool(true));
        node.set_property("level", Var::String("high".into()));
        let before = node.deep_copy();
        let err = EngineObject::adopt(node.clone(), "player", |k| k == EntityKind::Player).unwrap_err();
        assert!(matches!(err, EngineError::Validation(ref errors) if errors.len() == 1));
        assert!(node.has_property("isNPC"));
        assert!(node.is_equivalent_to(&before));
    }

    #[test]
    fn non_finite_values_are_not_stored() {
        let mut object = EngineObject::create(EntityKind::WorldEntity);
        object.set(&DIRECTION, 90.0);
        object.set(&DIRECTION, f64::NAN);
        object.set(&WEIGHT, f64::INFINITY);
        assert_eq!(object.node().property("direction"), Some(Var::Double(90.0)));
        assert_eq!(object.node().property("weight"), Some(Var::Double(80.0)));
        assert!(object.set_from_text("direction", "inf").is_err());
    }

    #[test]
    fn writes_go_through_the_journal() {
        let undo = UndoManager::new();
        let mut object = EngineObject::create(EntityKind::WorldObject);
        object.set_undo_manager(Some(undo.clone()));
        object.set_name("lantern");
        assert!(undo.can_undo());
        undo.undo();
        assert_eq!(object.name(), "");
    }

    #[test]
    fn text_setter_parses_by_label() {
        let mut object = EngineObject::create(EntityKind::FightableEntity);
        let shown = object.set_from_text("special attack", "-4").expect("set");
        assert_eq!(shown, "Special Attack = 0");
        assert!(object.set_from_text("wings", "2").is_err());
        assert!(object.set_from_text("level", "lots").is_err());
        assert!(object.set_from_text("subtype", "  ").is_err());
        object.set_from_text("status condition", "burned,frozen").expect("flags");
        assert_eq!(object.node().property("statusCondition"), Some(Var::Int(6)));
    }
}
