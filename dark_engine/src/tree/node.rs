//! Shared, observable tree nodes.
//!
//! A [`Node`] is a handle: cloning it yields another reference to the same record,
//! so every view over a node sees the same data. Use [`Node::deep_copy`] for an
//! independent copy.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use log::warn;

use super::var::Var;

/// Handle returned by [`Node::add_listener`], used to unregister it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

thread_local! {
    static NEXT_LISTENER: Cell<u64> = const { Cell::new(1) };
}

/// A committed change to a tree. Delivered to listeners on the changed node and
/// on each of its ancestors.
#[derive(Debug, Clone)]
pub enum TreeEvent {
    PropertyChanged { node: Node, property: String },
    ChildAdded { parent: Node, child: Node },
    ChildRemoved { parent: Node, child: Node, index: usize },
    /// Properties and children were replaced wholesale (document load).
    Redirected { node: Node },
}

/// Receives [`TreeEvent`]s after each committed mutation.
pub trait TreeListener {
    fn tree_changed(&self, event: &TreeEvent);
}

struct NodeData {
    node_type: String,
    properties: Vec<(String, Var)>,
    children: Vec<Node>,
    parent: Weak<RefCell<NodeData>>,
    listeners: Vec<(ListenerId, Rc<dyn TreeListener>)>,
}

/// A typed record with ordered properties and ordered children.
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

impl Node {
    /// Create a detached node with the given type tag.
    pub fn new(node_type: &str) -> Node {
        Node(Rc::new(RefCell::new(NodeData {
            node_type: node_type.to_string(),
            properties: Vec::new(),
            children: Vec::new(),
            parent: Weak::new(),
            listeners: Vec::new(),
        })))
    }

    pub fn node_type(&self) -> String {
        self.0.borrow().node_type.clone()
    }

    pub fn has_type(&self, node_type: &str) -> bool {
        self.0.borrow().node_type == node_type
    }

    /// True if both handles refer to the same record.
    pub fn same_node(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // --- properties ---------------------------------------------------------

    pub fn property(&self, id: &str) -> Option<Var> {
        self.0
            .borrow()
            .properties
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, value)| value.clone())
    }

    pub fn property_or(&self, id: &str, default: Var) -> Var {
        self.property(id).unwrap_or(default)
    }

    pub fn has_property(&self, id: &str) -> bool {
        self.0.borrow().properties.iter().any(|(name, _)| name == id)
    }

    pub fn num_properties(&self) -> usize {
        self.0.borrow().properties.len()
    }

    /// Property names in insertion order.
    pub fn property_names(&self) -> Vec<String> {
        self.0.borrow().properties.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn properties(&self) -> Vec<(String, Var)> {
        self.0.borrow().properties.clone()
    }

    /// Set a property, returning the previous value. Listeners are only told about
    /// actual changes.
    pub fn set_property(&self, id: &str, value: Var) -> Option<Var> {
        let previous = {
            let mut data = self.0.borrow_mut();
            if let Some(slot) = data.properties.iter_mut().find(|(name, _)| name == id) {
                if slot.1 == value {
                    return Some(value);
                }
                Some(std::mem::replace(&mut slot.1, value))
            } else {
                data.properties.push((id.to_string(), value));
                None
            }
        };
        self.notify(&TreeEvent::PropertyChanged {
            node: self.clone(),
            property: id.to_string(),
        });
        previous
    }

    /// Remove a property, returning its value if it was present.
    pub fn remove_property(&self, id: &str) -> Option<Var> {
        let removed = {
            let mut data = self.0.borrow_mut();
            let index = data.properties.iter().position(|(name, _)| name == id)?;
            data.properties.remove(index).1
        };
        self.notify(&TreeEvent::PropertyChanged {
            node: self.clone(),
            property: id.to_string(),
        });
        Some(removed)
    }

    pub fn remove_all_properties(&self) {
        for id in self.property_names() {
            self.remove_property(&id);
        }
    }

    // --- children -----------------------------------------------------------

    pub fn num_children(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn child(&self, index: usize) -> Option<Node> {
        self.0.borrow().children.get(index).cloned()
    }

    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    pub fn child_with_type(&self, node_type: &str) -> Option<Node> {
        self.0
            .borrow()
            .children
            .iter()
            .find(|c| c.has_type(node_type))
            .cloned()
    }

    /// Find the named child, appending an empty one if it doesn't exist yet.
    /// The append bypasses any undo journal.
    pub fn get_or_create_child_with_type(&self, node_type: &str) -> Node {
        if let Some(existing) = self.child_with_type(node_type) {
            return existing;
        }
        let child = Node::new(node_type);
        self.append_child(&child);
        child
    }

    /// Position of a child by identity.
    pub fn index_of(&self, child: &Node) -> Option<usize> {
        self.0.borrow().children.iter().position(|c| c.same_node(child))
    }

    pub fn parent(&self) -> Option<Node> {
        self.0.borrow().parent.upgrade().map(Node)
    }

    /// True if `other` is this node or one of its ancestors.
    pub fn is_self_or_descendant_of(&self, other: &Node) -> bool {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node.same_node(other) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    pub fn append_child(&self, child: &Node) {
        self.insert_child(child, None);
    }

    /// Insert `child` at `index` (or at the end). A child that already has a parent
    /// is detached from it first. Inserting a node into itself or its own subtree is
    /// refused.
    pub fn insert_child(&self, child: &Node, index: Option<usize>) {
        if self.is_self_or_descendant_of(child) {
            warn!(
                "refusing to insert '{}' node into its own subtree",
                child.node_type()
            );
            return;
        }
        if let Some(old_parent) = child.parent()
            && let Some(old_index) = old_parent.index_of(child)
        {
            old_parent.remove_child_at(old_index);
        }
        {
            let mut data = self.0.borrow_mut();
            let at = index.unwrap_or(data.children.len()).min(data.children.len());
            data.children.insert(at, child.clone());
        }
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.notify(&TreeEvent::ChildAdded {
            parent: self.clone(),
            child: child.clone(),
        });
    }

    /// Remove the child at `index`. Out-of-range indices are ignored.
    pub fn remove_child_at(&self, index: usize) -> Option<Node> {
        let removed = {
            let mut data = self.0.borrow_mut();
            if index >= data.children.len() {
                return None;
            }
            data.children.remove(index)
        };
        removed.0.borrow_mut().parent = Weak::new();
        self.notify(&TreeEvent::ChildRemoved {
            parent: self.clone(),
            child: removed.clone(),
            index,
        });
        Some(removed)
    }

    /// Remove `child` if present: the same node if it is a child, otherwise the first
    /// structurally equivalent child. Missing children are ignored.
    pub fn remove_child(&self, child: &Node) -> Option<Node> {
        let index = self.index_of(child).or_else(|| self.index_of_equivalent(child))?;
        self.remove_child_at(index)
    }

    pub fn index_of_equivalent(&self, other: &Node) -> Option<usize> {
        self.0.borrow().children.iter().position(|c| c.is_equivalent_to(other))
    }

    pub fn remove_all_children(&self) {
        while self.num_children() > 0 {
            self.remove_child_at(self.num_children() - 1);
        }
    }

    // --- structure ----------------------------------------------------------

    /// Structural equality: same type, same property set (order ignored) and
    /// equivalent children in the same order.
    pub fn is_equivalent_to(&self, other: &Node) -> bool {
        if self.same_node(other) {
            return true;
        }
        let a = self.0.borrow();
        let b = other.0.borrow();
        a.node_type == b.node_type
            && a.properties.len() == b.properties.len()
            && a.properties
                .iter()
                .all(|(name, value)| b.properties.iter().any(|(n, v)| n == name && v == value))
            && a.children.len() == b.children.len()
            && a.children
                .iter()
                .zip(b.children.iter())
                .all(|(x, y)| x.is_equivalent_to(y))
    }

    /// An independent copy of this node and its whole subtree, without listeners.
    pub fn deep_copy(&self) -> Node {
        let data = self.0.borrow();
        let copy = Node::new(&data.node_type);
        {
            let mut target = copy.0.borrow_mut();
            target.properties = data.properties.clone();
        }
        for child in &data.children {
            let child_copy = child.deep_copy();
            child_copy.0.borrow_mut().parent = Rc::downgrade(&copy.0);
            copy.0.borrow_mut().children.push(child_copy);
        }
        copy
    }

    /// Replace this node's properties and children with those of `source`, keeping
    /// this node's identity, parent and listeners. `source`'s children are moved.
    pub fn copy_from(&self, source: &Node) {
        if self.same_node(source) {
            return;
        }
        let (properties, children) = {
            let mut src = source.0.borrow_mut();
            (src.properties.clone(), std::mem::take(&mut src.children))
        };
        let old_children = {
            let mut data = self.0.borrow_mut();
            data.properties = properties;
            std::mem::replace(&mut data.children, children)
        };
        for old in old_children {
            old.0.borrow_mut().parent = Weak::new();
        }
        for child in self.children() {
            child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        }
        self.notify(&TreeEvent::Redirected { node: self.clone() });
    }

    // --- listeners ----------------------------------------------------------

    pub fn add_listener(&self, listener: Rc<dyn TreeListener>) -> ListenerId {
        let id = NEXT_LISTENER.with(|next| {
            let id = next.get();
            next.set(id + 1);
            ListenerId(id)
        });
        self.0.borrow_mut().listeners.push((id, listener));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) {
        self.0.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
    }

    fn notify(&self, event: &TreeEvent) {
        // gather first so listeners are free to read or mutate the tree
        let mut listeners = Vec::new();
        let mut current = Some(self.clone());
        while let Some(node) = current {
            listeners.extend(node.0.borrow().listeners.iter().map(|(_, l)| Rc::clone(l)));
            current = node.parent();
        }
        for listener in listeners {
            listener.tree_changed(event);
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Node")
            .field("type", &data.node_type)
            .field("properties", &data.properties)
            .field("children", &data.children)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl TreeListener for Recorder {
        fn tree_changed(&self, event: &TreeEvent) {
            let line = match event {
                TreeEvent::PropertyChanged { property, .. } => format!("prop:{property}"),
                TreeEvent::ChildAdded { child, .. } => format!("add:{}", child.node_type()),
                TreeEvent::ChildRemoved { child, index, .. } => format!("remove:{}@{index}", child.node_type()),
                TreeEvent::Redirected { node } => format!("redirect:{}", node.node_type()),
            };
            self.events.borrow_mut().push(line);
        }
    }

    #[test]
    fn properties_keep_insertion_order() {
        let n = Node::new("thing");
        n.set_property("b", Var::Int(1));
        n.set_property("a", Var::Int(2));
        n.set_property("b", Var::Int(3));
        assert_eq!(n.property_names(), vec!["b", "a"]);
        assert_eq!(n.property("b"), Some(Var::Int(3)));
        assert_eq!(n.remove_property("b"), Some(Var::Int(3)));
        assert!(!n.has_property("b"));
    }

    #[test]
    fn handles_share_state_but_deep_copies_do_not() {
        let n = Node::new("thing");
        let alias = n.clone();
        let copy = n.deep_copy();
        alias.set_property("x", Var::Int(5));
        assert_eq!(n.property("x"), Some(Var::Int(5)));
        assert!(!copy.has_property("x"));
        assert!(!copy.same_node(&n));
    }

    #[test]
    fn equivalence_ignores_property_order_but_not_child_order() {
        let a = Node::new("t");
        a.set_property("x", Var::Int(1));
        a.set_property("y", Var::Int(2));
        let b = Node::new("t");
        b.set_property("y", Var::Int(2));
        b.set_property("x", Var::Int(1));
        assert!(a.is_equivalent_to(&b));

        a.append_child(&Node::new("c1"));
        a.append_child(&Node::new("c2"));
        b.append_child(&Node::new("c2"));
        b.append_child(&Node::new("c1"));
        assert!(!a.is_equivalent_to(&b));
    }

    #[test]
    fn removal_is_tolerant() {
        let parent = Node::new("p");
        assert!(parent.remove_child_at(3).is_none());
        assert!(parent.remove_child(&Node::new("nope")).is_none());
    }

    #[test]
    fn appending_reparents() {
        let a = Node::new("a");
        let b = Node::new("b");
        let child = Node::new("c");
        a.append_child(&child);
        b.append_child(&child);
        assert_eq!(a.num_children(), 0);
        assert_eq!(b.num_children(), 1);
        assert!(child.parent().is_some_and(|p| p.same_node(&b)));
    }

    #[test]
    fn refuses_cycles() {
        let a = Node::new("a");
        let b = Node::new("b");
        a.append_child(&b);
        b.append_child(&a);
        assert_eq!(b.num_children(), 0);
        a.append_child(&a);
        assert_eq!(a.num_children(), 1);
    }

    #[test]
    fn listeners_see_changes_below_them() {
        let root = Node::new("root");
        let recorder = Rc::new(Recorder::default());
        let id = root.add_listener(recorder.clone());
        let child = Node::new("kid");
        root.append_child(&child);
        child.set_property("hp", Var::Int(3));
        // unchanged value: no event
        child.set_property("hp", Var::Int(3));
        root.remove_child_at(0);
        root.remove_listener(id);
        root.set_property("ignored", Var::Bool(true));
        assert_eq!(
            *recorder.events.borrow(),
            vec!["add:kid", "prop:hp", "remove:kid@0"]
        );
    }

    #[test]
    fn copy_from_keeps_identity_and_listeners() {
        let target = Node::new("doc");
        let recorder = Rc::new(Recorder::default());
        target.add_listener(recorder.clone());
        let source = Node::new("doc");
        source.set_property("name", Var::from("loaded"));
        source.append_child(&Node::new("world"));
        target.copy_from(&source);
        assert_eq!(target.property("name"), Some(Var::from("loaded")));
        assert!(target.child(0).and_then(|c| c.parent()).is_some_and(|p| p.same_node(&target)));
        assert_eq!(*recorder.events.borrow(), vec!["redirect:doc"]);
    }
}
