//! Ordered child lists (inventories, move lists, catalogs, the world).

use log::debug;

use crate::object::Entity;
use crate::schema::fields::NAME;
use crate::tree::{Node, UndoManager};

/// A view over the child node named `name` under some owner.
///
/// Items are value-like: [`ChildList::add`] stores a copy, so adding the same
/// item twice yields two equal entries. Removal matches by content and ignores
/// items that aren't there.
#[derive(Debug, Clone)]
pub struct ChildList {
    list: Node,
    undo: Option<UndoManager>,
}

impl ChildList {
    /// View the `name` child of `owner`, creating it if missing.
    ///
    /// A list created here is appended through `undo` when one is given, so it
    /// goes away again with the transaction that first used it.
    pub fn new(owner: &Node, name: &str, undo: Option<UndoManager>) -> Self {
        let list = match (owner.child_with_type(name), &undo) {
            (Some(existing), _) => existing,
            (None, Some(journal)) => {
                let created = Node::new(name);
                journal.append_child(owner, &created);
                created
            },
            (None, None) => owner.get_or_create_child_with_type(name),
        };
        Self { list, undo }
    }

    /// The list node itself.
    pub fn node(&self) -> &Node {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.num_children()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Node> {
        self.list.child(index)
    }

    pub fn iter(&self) -> std::vec::IntoIter<Node> {
        self.list.children().into_iter()
    }

    /// Append a copy of `item`.
    pub fn add(&self, item: &impl Entity) -> Node {
        self.add_node(item.node())
    }

    /// Append a copy of `node`, returning the stored copy.
    pub fn add_node(&self, node: &Node) -> Node {
        let copy = node.deep_copy();
        match &self.undo {
            Some(undo) => undo.append_child(&self.list, &copy),
            None => self.list.append_child(&copy),
        }
        debug!("added '{}' to {}", node.node_type(), self.list.node_type());
        copy
    }

    /// Remove the first entry equal in content to `item`. Returns false if none matched.
    pub fn remove(&self, item: &impl Entity) -> bool {
        self.remove_node(item.node())
    }

    pub fn remove_node(&self, node: &Node) -> bool {
        match self.list.index_of(node).or_else(|| self.list.index_of_equivalent(node)) {
            Some(index) => self.remove_at(index),
            None => false,
        }
    }

    /// Remove by position. Out-of-range indices are ignored.
    pub fn remove_at(&self, index: usize) -> bool {
        if index >= self.len() {
            return false;
        }
        match &self.undo {
            Some(undo) => undo.remove_child_at(&self.list, index),
            None => {
                self.list.remove_child_at(index);
            },
        }
        true
    }

    pub fn clear(&self) {
        while !self.is_empty() {
            self.remove_at(self.len() - 1);
        }
    }

    /// Position of the first entry whose name matches, ignoring case.
    pub fn position_by_name(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.iter().position(|node| NAME.read(&node).eq_ignore_ascii_case(wanted))
    }

    pub fn find_by_name(&self, name: &str) -> Option<Node> {
        self.position_by_name(name).and_then(|index| self.get(index))
    }

    /// Names of every entry, in order.
    pub fn names(&self) -> Vec<String> {
        self.iter().map(|node| NAME.read(&node)).collect()
    }
}
