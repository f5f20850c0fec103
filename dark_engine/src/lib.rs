#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Dark Engine **
//! Game-state model for tile-based dungeon maps: an undoable property tree,
//! typed entity views over it, XML/JSON persistence and a command processor.

pub const DARK_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod collection;
pub mod command;
pub mod config;
pub mod data_paths;
pub mod demo;
pub mod entity;
pub mod error;
pub mod map;
pub mod object;
pub mod persist;
pub mod processor;
pub mod repl;
pub mod schema;
pub mod style;
pub mod tree;

pub use collection::ChildList;
pub use config::{EngineConfig, load_config};
pub use entity::{Player, WorldItem};
pub use error::EngineError;
pub use map::{Catalog, GameMap};
pub use object::{EngineObject, Entity, Named};
pub use persist::DocumentFormat;
pub use processor::{GameProcessor, Outcome};
pub use repl::run_repl;
pub use tree::{Node, UndoManager, Var};
