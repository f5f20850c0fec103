//! Observable, undoable property tree.
//!
//! Every entity in the game-state model is a typed view over one [`Node`]. The
//! tree knows nothing about entities; it stores [`Var`] values, keeps child order,
//! tells [`TreeListener`]s about committed changes and reads/writes XML and JSON.

pub mod json;
mod node;
pub mod undo;
mod var;
pub mod xml;

pub use node::{ListenerId, Node, TreeEvent, TreeListener};
pub use undo::{TreeEdit, UndoManager};
pub use var::{Var, VarKind};

use thiserror::Error;

/// Failure to turn document text into a tree.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected document shape: {0}")]
    Shape(String),
}
