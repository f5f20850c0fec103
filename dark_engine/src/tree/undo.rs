//! Undo journal for property tree edits.
//!
//! An [`UndoManager`] is an explicit journal: edits routed through it are applied to
//! the tree and recorded into the current transaction. Undo reverts a whole
//! transaction; redo replays it. Edits made directly on a [`Node`] bypass the
//! journal and can't be undone.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};

use super::node::Node;
use super::var::Var;

/// A single reversible tree edit.
#[derive(Debug, Clone)]
pub enum TreeEdit {
    SetProperty {
        node: Node,
        id: String,
        old: Option<Var>,
        new: Option<Var>,
    },
    InsertChild {
        parent: Node,
        child: Node,
        index: usize,
    },
    RemoveChild {
        parent: Node,
        child: Node,
        index: usize,
    },
}

impl TreeEdit {
    fn apply(&self) {
        match self {
            TreeEdit::SetProperty { node, id, new, .. } => write_property(node, id, new.as_ref()),
            TreeEdit::InsertChild { parent, child, index } => parent.insert_child(child, Some(*index)),
            TreeEdit::RemoveChild { parent, index, .. } => {
                parent.remove_child_at(*index);
            },
        }
    }

    fn revert(&self) {
        match self {
            TreeEdit::SetProperty { node, id, old, .. } => write_property(node, id, old.as_ref()),
            TreeEdit::InsertChild { parent, index, .. } => {
                parent.remove_child_at(*index);
            },
            TreeEdit::RemoveChild { parent, child, index } => parent.insert_child(child, Some(*index)),
        }
    }
}

fn write_property(node: &Node, id: &str, value: Option<&Var>) {
    match value {
        Some(v) => {
            node.set_property(id, v.clone());
        },
        None => {
            node.remove_property(id);
        },
    }
}

#[derive(Debug, Default, Clone)]
struct Transaction {
    name: String,
    edits: Vec<TreeEdit>,
}

#[derive(Debug)]
struct Journal {
    transactions: Vec<Transaction>,
    /// Number of transactions currently applied; everything past it is the redo tail.
    applied: usize,
    start_new: bool,
    pending_name: String,
    max_transactions: usize,
}

/// Shared handle to an undo journal. Clones refer to the same journal.
#[derive(Debug, Clone)]
pub struct UndoManager(Rc<RefCell<Journal>>);

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoManager {
    pub const DEFAULT_MAX_TRANSACTIONS: usize = 100;

    pub fn new() -> UndoManager {
        Self::with_limit(Self::DEFAULT_MAX_TRANSACTIONS)
    }

    /// Create a journal that keeps at most `max_transactions` undoable steps.
    pub fn with_limit(max_transactions: usize) -> UndoManager {
        UndoManager(Rc::new(RefCell::new(Journal {
            transactions: Vec::new(),
            applied: 0,
            start_new: true,
            pending_name: String::new(),
            max_transactions: max_transactions.max(1),
        })))
    }

    /// Start a new transaction; edits from here on are undone together.
    pub fn begin_transaction(&self, name: &str) {
        let mut journal = self.0.borrow_mut();
        journal.start_new = true;
        journal.pending_name = name.to_string();
    }

    /// Record an already-applied edit.
    fn record(&self, edit: TreeEdit) {
        let mut journal = self.0.borrow_mut();
        let applied = journal.applied;
        journal.transactions.truncate(applied);
        if journal.start_new || journal.transactions.is_empty() {
            let name = std::mem::take(&mut journal.pending_name);
            journal.transactions.push(Transaction { name, edits: Vec::new() });
            journal.applied = journal.transactions.len();
            journal.start_new = false;
            if journal.transactions.len() > journal.max_transactions {
                journal.transactions.remove(0);
                journal.applied -= 1;
            }
        }
        if let Some(current) = journal.transactions.last_mut() {
            current.edits.push(edit);
        }
    }

    /// Apply `edit` to the tree and record it.
    pub fn perform(&self, edit: TreeEdit) {
        edit.apply();
        self.record(edit);
    }

    pub fn set_property(&self, node: &Node, id: &str, value: Var) {
        let old = node.property(id);
        if old.as_ref() == Some(&value) {
            return;
        }
        self.perform(TreeEdit::SetProperty {
            node: node.clone(),
            id: id.to_string(),
            old,
            new: Some(value),
        });
    }

    pub fn remove_property(&self, node: &Node, id: &str) {
        if let Some(old) = node.property(id) {
            self.perform(TreeEdit::SetProperty {
                node: node.clone(),
                id: id.to_string(),
                old: Some(old),
                new: None,
            });
        }
    }

    pub fn append_child(&self, parent: &Node, child: &Node) {
        self.insert_child(parent, child, parent.num_children());
    }

    /// Insert `child`, journaling its removal from any previous parent as well.
    pub fn insert_child(&self, parent: &Node, child: &Node, index: usize) {
        if parent.is_self_or_descendant_of(child) {
            parent.insert_child(child, Some(index)); // refused and logged by the node
            return;
        }
        let mut index = index.min(parent.num_children());
        if let Some(old_parent) = child.parent()
            && let Some(old_index) = old_parent.index_of(child)
        {
            if old_parent.same_node(parent) && old_index < index {
                index -= 1;
            }
            self.perform(TreeEdit::RemoveChild {
                parent: old_parent,
                child: child.clone(),
                index: old_index,
            });
        }
        self.perform(TreeEdit::InsertChild {
            parent: parent.clone(),
            child: child.clone(),
            index,
        });
    }

    pub fn remove_child_at(&self, parent: &Node, index: usize) {
        if let Some(child) = parent.child(index) {
            self.perform(TreeEdit::RemoveChild {
                parent: parent.clone(),
                child,
                index,
            });
        }
    }

    /// Remove `child` (by identity, else first equivalent child). Missing children are ignored.
    pub fn remove_child(&self, parent: &Node, child: &Node) {
        if let Some(index) = parent.index_of(child).or_else(|| parent.index_of_equivalent(child)) {
            self.remove_child_at(parent, index);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.0.borrow().applied > 0
    }

    pub fn can_redo(&self) -> bool {
        let journal = self.0.borrow();
        journal.applied < journal.transactions.len()
    }

    pub fn undo_description(&self) -> Option<String> {
        let journal = self.0.borrow();
        journal
            .applied
            .checked_sub(1)
            .and_then(|i| journal.transactions.get(i))
            .map(|t| t.name.clone())
    }

    pub fn redo_description(&self) -> Option<String> {
        let journal = self.0.borrow();
        journal.transactions.get(journal.applied).map(|t| t.name.clone())
    }

    pub fn num_transactions(&self) -> usize {
        self.0.borrow().transactions.len()
    }

    /// Revert the most recent transaction. Returns false if there was nothing to undo.
    pub fn undo(&self) -> bool {
        let transaction = {
            let mut journal = self.0.borrow_mut();
            if journal.applied == 0 {
                return false;
            }
            journal.applied -= 1;
            journal.start_new = true;
            journal.transactions[journal.applied].clone()
        };
        debug!("undoing '{}' ({} edits)", transaction.name, transaction.edits.len());
        for edit in transaction.edits.iter().rev() {
            edit.revert();
        }
        true
    }

    /// Replay the next undone transaction. Returns false if there was nothing to redo.
    pub fn redo(&self) -> bool {
        let transaction = {
            let mut journal = self.0.borrow_mut();
            if journal.applied >= journal.transactions.len() {
                return false;
            }
            journal.applied += 1;
            journal.start_new = true;
            journal.transactions[journal.applied - 1].clone()
        };
        debug!("redoing '{}' ({} edits)", transaction.name, transaction.edits.len());
        for edit in &transaction.edits {
            edit.apply();
        }
        true
    }

    pub fn clear_history(&self) {
        let mut journal = self.0.borrow_mut();
        journal.transactions.clear();
        journal.applied = 0;
        journal.start_new = true;
        info!("undo history cleared");
    }
}
