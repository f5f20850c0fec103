//! The game session: one map (holding the player) and the command dispatcher.

use std::path::Path;

use dark_data::{CardinalDirection, DoorLockState, Point};
use log::{info, warn};
use variantly::Variantly;

use crate::command::{CheatCommand, Command, parse_cheat, parse_command, tokenize};
use crate::config::EngineConfig;
use crate::entity::{Combatant, Inventoried, Oriented, Placed, Player, Unlockable, WorldItem};
use crate::error::EngineError;
use crate::map::GameMap;
use crate::object::{Entity, Named};
use crate::schema::fields::INTERACTION_ID;
use crate::tree::UndoManager;

pub const CANT_DO_THAT: &str = "You can't do that here...";

/// What a processed command produced for the player.
#[derive(Debug, Clone, PartialEq, Eq, Variantly)]
pub enum Outcome {
    Message(String),
    /// The command was understood but refused by the game.
    Failure(String),
    Quit,
}

/// Dispatches player commands against one [`GameMap`].
///
/// Every command that edits the map runs in its own undo transaction named
/// after the command text.
#[derive(Debug)]
pub struct GameProcessor {
    map: GameMap,
    undo: UndoManager,
    allow_cheats: bool,
    god_mode: bool,
}

impl GameProcessor {
    pub fn new(map: GameMap, allow_cheats: bool) -> Self {
        Self::with_undo_limit(map, allow_cheats, UndoManager::DEFAULT_MAX_TRANSACTIONS)
    }

    pub fn from_config(map: GameMap, config: &EngineConfig) -> Self {
        Self::with_undo_limit(map, config.allow_cheats, config.undo_limit)
    }

    fn with_undo_limit(map: GameMap, allow_cheats: bool, undo_limit: usize) -> Self {
        let undo = UndoManager::with_limit(undo_limit);
        Self {
            map: map.with_undo_manager(undo.clone()),
            undo,
            allow_cheats,
            god_mode: false,
        }
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut GameMap {
        &mut self.map
    }

    pub fn player(&self) -> Option<&Player> {
        self.map.player()
    }

    pub fn undo_manager(&self) -> &UndoManager {
        &self.undo
    }

    pub fn allow_cheats(&self) -> bool {
        self.allow_cheats
    }

    pub fn set_allow_cheats(&mut self, allow: bool) {
        self.allow_cheats = allow;
    }

    pub fn is_god_mode(&self) -> bool {
        self.god_mode
    }

    /// Run one line of player input.
    ///
    /// # Errors
    /// - `Internal` if the line has no words
    /// - `NotImplemented` for combat
    /// - `InvalidArgument` for cheats naming things that don't exist or bad field values
    /// - `SaveFailed` / `LoadFailed` from `save` and `load`
    pub fn process_message(&mut self, text: &str) -> Result<Outcome, EngineError> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(EngineError::Internal("no command words to dispatch".into()));
        }
        let line = tokens.join(" ");
        info!("dispatching '{line}'");
        match parse_command(&tokens) {
            Command::Help => Ok(Outcome::Message(help_text(self.allow_cheats))),
            Command::Quit => Ok(Outcome::Quit),
            Command::Look => Ok(self.look()),
            Command::Inventory => Ok(self.inventory()),
            Command::Status => Ok(self.status()),
            Command::MoveTo(word) => Ok(self.move_player(&word, &line)),
            Command::Turn(word) => Ok(self.turn_player(&word, &line)),
            Command::Attack(_) => Err(EngineError::NotImplemented("combat".into())),
            Command::Undo => Ok(self.undo()),
            Command::Redo => Ok(self.redo()),
            Command::Save(file) => {
                self.map.save(Path::new(&file))?;
                Ok(Outcome::Message(format!("Saved to {file}.")))
            },
            Command::Load(file) => {
                self.map.load(Path::new(&file))?;
                Ok(Outcome::Message(format!("Loaded '{}'.", self.map.name())))
            },
            Command::Unknown => {
                if self.allow_cheats
                    && let Some(cheat) = parse_cheat(&tokens)
                {
                    return self.cheat(cheat, &line);
                }
                Ok(Outcome::Failure(CANT_DO_THAT.into()))
            },
        }
    }

    fn no_player() -> Outcome {
        Outcome::Failure("There is no player on this map.".into())
    }

    fn look(&self) -> Outcome {
        let Some(player) = self.map.player() else {
            return Self::no_player();
        };
        let here = player.position();
        let facing = player.facing();
        let mut lines = vec![format!("You are at {here}, facing {facing}.")];
        let around = self.names_at(here, player);
        if !around.is_empty() {
            lines.push(format!("Here: {}.", around.join(", ")));
        }
        if let Some(ahead) = step(here, facing) {
            let seen = self.names_at(ahead, player);
            lines.push(if seen.is_empty() {
                "Nothing ahead.".to_string()
            } else {
                format!("Ahead: {}.", seen.join(", "))
            });
        }
        Outcome::Message(lines.join("\n"))
    }

    fn names_at(&self, point: Point, player: &Player) -> Vec<String> {
        self.map
            .objects_at(point)
            .iter()
            .filter(|item| !item.node().same_node(player.node()))
            .map(WorldItem::label)
            .collect()
    }

    fn inventory(&self) -> Outcome {
        let Some(player) = self.map.player() else {
            return Self::no_player();
        };
        let items = player.inventory().names();
        if items.is_empty() {
            Outcome::Message("You are carrying nothing.".into())
        } else {
            Outcome::Message(format!("You are carrying: {}.", items.join(", ")))
        }
    }

    fn status(&self) -> Outcome {
        let Some(player) = self.map.player() else {
            return Self::no_player();
        };
        let mut text = format!(
            "{}: HP {}/{}, level {}, {}",
            player.name(),
            player.hit_points(),
            player.max_hit_points(),
            player.level(),
            player.status_condition().render(true)
        );
        if self.god_mode {
            text.push_str(" (god mode)");
        }
        Outcome::Message(text)
    }

    fn move_player(&mut self, word: &str, line: &str) -> Outcome {
        let Some(direction) = CardinalDirection::parse(word) else {
            return Outcome::Failure(format!("Which way is '{word}'?"));
        };
        let Some(mut player) = self.map.player().cloned() else {
            return Self::no_player();
        };
        let Some(target) = step(player.position(), direction) else {
            return Outcome::Failure(CANT_DO_THAT.into());
        };
        let keys = key_ids(&player);
        let mut items = self.map.objects_at(target);
        let blockers: Vec<String> = items
            .iter()
            .filter(|item| item.blocks_movement() && !opens_with(item, &keys))
            .map(WorldItem::label)
            .collect();
        if !blockers.is_empty() && !self.god_mode {
            self.undo.begin_transaction(&format!("face {direction}"));
            player.face(direction);
            return Outcome::Failure(format!("The {} blocks your way {direction}.", blockers.join(" and ")));
        }

        self.undo.begin_transaction(line);
        player.face(direction);
        let mut messages = Vec::new();
        for item in &mut items {
            let label = item.label();
            if let WorldItem::Door(door) = item
                && door.lock_state() == DoorLockState::NeedsKey
                && keys.iter().any(|key| door.try_unlock_with(*key))
            {
                messages.push(format!("You unlock the {label}."));
            }
        }
        player.set_position(target);
        messages.push(format!("You move {direction} to {target}."));
        Outcome::Message(messages.join("\n"))
    }

    fn turn_player(&mut self, word: &str, line: &str) -> Outcome {
        let Some(direction) = CardinalDirection::parse(word) else {
            return Outcome::Failure(format!("Which way is '{word}'?"));
        };
        let Some(player) = self.map.player_mut() else {
            return Self::no_player();
        };
        self.undo.begin_transaction(line);
        player.face(direction);
        Outcome::Message(format!("You turn to face {direction}."))
    }

    fn undo(&mut self) -> Outcome {
        let Some(name) = self.undo.undo_description() else {
            return Outcome::Failure("Nothing to undo.".into());
        };
        self.undo.undo();
        self.map.refresh_player();
        Outcome::Message(format!("Undid '{name}'."))
    }

    fn redo(&mut self) -> Outcome {
        let Some(name) = self.undo.redo_description() else {
            return Outcome::Failure("Nothing to redo.".into());
        };
        self.undo.redo();
        self.map.refresh_player();
        Outcome::Message(format!("Redid '{name}'."))
    }

    // --- cheats -------------------------------------------------------------

    fn cheat(&mut self, cheat: CheatCommand, line: &str) -> Result<Outcome, EngineError> {
        info!("cheat: {cheat:?}");
        if !cheat.is_god_mode() {
            self.undo.begin_transaction(line);
        }
        match cheat {
            CheatCommand::Kill(name) => self.kill(&name),
            CheatCommand::Add { definition, at } => self.add_to_world(&definition, at),
            CheatCommand::Remove(name) => self.remove_from_world(&name),
            CheatCommand::Set { target, field, value } => {
                let mut item = self.world_item(&target)?;
                let shown = item.object_mut().set_from_text(&field, &value)?;
                self.map.refresh_player();
                Ok(Outcome::Message(format!("{}: {shown}", item.label())))
            },
            CheatCommand::GodMode => {
                self.god_mode = !self.god_mode;
                warn!("god mode {}", if self.god_mode { "enabled" } else { "disabled" });
                Ok(Outcome::Message(format!(
                    "God mode {}.",
                    if self.god_mode { "on" } else { "off" }
                )))
            },
            CheatCommand::PlayerAdd(definition) => {
                let (player, item) = (self.require_player()?, self.definition(&definition)?);
                if item.is_fighting_move() {
                    return Err(EngineError::InvalidArgument(format!("'{}' can't be carried", item.label())));
                }
                player.inventory().add(&item);
                Ok(Outcome::Message(format!("Added {} to your inventory.", item.label())))
            },
            CheatCommand::PlayerRemove(name) => {
                let player = self.require_player()?;
                let inventory = player.inventory();
                let index = inventory
                    .position_by_name(&name)
                    .ok_or_else(|| EngineError::InvalidArgument(format!("you aren't carrying '{name}'")))?;
                inventory.remove_at(index);
                Ok(Outcome::Message(format!("Removed {name} from your inventory.")))
            },
            CheatCommand::PlayerSet { field, value } => {
                let mut player = self.require_player()?;
                let shown = player.object_mut().set_from_text(&field, &value)?;
                Ok(Outcome::Message(format!("You: {shown}")))
            },
        }
    }

    fn kill(&mut self, name: &str) -> Result<Outcome, EngineError> {
        let mut target = self.world_item(name)?;
        let label = target.label();
        match &mut target {
            WorldItem::Player(_) if self.god_mode => Ok(Outcome::Failure("You can't die in god mode.".into())),
            WorldItem::Player(player) => {
                player.set_hit_points(0);
                Ok(Outcome::Message("You die.".into()))
            },
            WorldItem::Fightable(enemy) => {
                enemy.set_hit_points(0);
                Ok(Outcome::Message(format!("The {label} is dead.")))
            },
            _ => Err(EngineError::InvalidArgument(format!("'{label}' can't be killed"))),
        }
    }

    fn add_to_world(&mut self, definition: &str, at: Option<Point>) -> Result<Outcome, EngineError> {
        let template = self.definition(definition)?;
        let position = match at {
            Some(point) => point,
            None => self.require_player()?.position(),
        };
        let stored = self.map.world().add(&template);
        let mut placed = WorldItem::classify(stored, Some(self.undo.clone()))
            .ok_or_else(|| EngineError::Internal(format!("'{definition}' lost its kind on copy")))?;
        if !placed.move_to(position) {
            self.map.remove_world_item(&placed);
            return Err(EngineError::InvalidArgument(format!(
                "'{}' can't be placed in the world",
                placed.label()
            )));
        }
        Ok(Outcome::Message(format!("Added {} at {position}.", placed.label())))
    }

    fn remove_from_world(&mut self, name: &str) -> Result<Outcome, EngineError> {
        let item = self.world_item(name)?;
        if item.is_player() {
            return Ok(Outcome::Failure("You can't remove yourself.".into()));
        }
        self.map.remove_world_item(&item);
        Ok(Outcome::Message(format!("Removed {}.", item.label())))
    }

    fn world_item(&self, name: &str) -> Result<WorldItem, EngineError> {
        self.map
            .find_by_name(name)
            .ok_or_else(|| EngineError::InvalidArgument(format!("nothing called '{name}' in the world")))
    }

    fn definition(&self, name: &str) -> Result<WorldItem, EngineError> {
        self.map
            .find_definition(name)
            .map(|(_, item)| item)
            .ok_or_else(|| EngineError::InvalidArgument(format!("no definition called '{name}'")))
    }

    fn require_player(&self) -> Result<Player, EngineError> {
        self.map
            .player()
            .cloned()
            .ok_or_else(|| EngineError::InvalidArgument("there is no player on this map".into()))
    }
}

/// One grid step from `from`, or `None` for directions that don't move.
fn step(from: Point, direction: CardinalDirection) -> Option<Point> {
    let (dx, dy) = direction.offset();
    (dx != 0 || dy != 0).then(|| from.translated(dx, dy))
}

/// True for a locked door one of `keys` opens.
fn opens_with(item: &WorldItem, keys: &[i32]) -> bool {
    matches!(item, WorldItem::Door(door)
        if door.lock_state() == DoorLockState::NeedsKey && keys.iter().any(|key| door.can_be_unlocked_by(*key)))
}

/// Numeric interaction ids of everything the player carries.
fn key_ids(player: &Player) -> Vec<i32> {
    player
        .inventory()
        .iter()
        .filter_map(|node| INTERACTION_ID.read(&node).trim().parse().ok())
        .collect()
}

fn help_text(allow_cheats: bool) -> String {
    let mut text = String::from(
        "Commands:\n  look | inventory | status\n  move <direction> | turn <direction>\n  attack [target]\n  undo | \
         redo\n  save <file> | load <file>\n  help | quit",
    );
    if allow_cheats {
        text.push_str(
            "\nCheats:\n  kill <name> | remove <name>\n  add <definition> [x y]\n  set <name> <field> <value>\n  \
             player tgm | player add <definition> | player remove <name> | player set <field> <value>",
        );
    }
    text
}
