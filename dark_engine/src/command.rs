//! Command module
//!
//! Turns a line of player input into tokens and then into a [`Command`].
use dark_data::Point;
use variantly::Variantly;

/// Commands the processor understands.
#[derive(Debug, Clone, PartialEq, Variantly)]
pub enum Command {
    Attack(Option<String>),
    Help,
    Inventory,
    Load(String),
    Look,
    MoveTo(String),
    Quit,
    Redo,
    Save(String),
    Status,
    Turn(String),
    Undo,
    /// Anything else; handed to the cheat parser when cheats are allowed.
    Unknown,
}

/// Debug commands, only honoured when cheats are allowed.
#[derive(Debug, Clone, PartialEq, Variantly)]
pub enum CheatCommand {
    /// Drop a world entity's hit points to zero.
    Kill(String),
    /// Copy a definition into the world, at `at` or the player's position.
    Add { definition: String, at: Option<Point> },
    Remove(String),
    Set { target: String, field: String, value: String },
    /// Toggle god mode.
    GodMode,
    PlayerAdd(String),
    PlayerRemove(String),
    PlayerSet { field: String, value: String },
}

/// Split on whitespace, lowercasing bare words. Double-quoted stretches stay one
/// token, without the quotes and with their case kept; empty tokens are dropped.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in input.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                if !quoted {
                    if !current.trim().is_empty() {
                        tokens.push(current.trim().to_string());
                    }
                    current.clear();
                }
            },
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            },
            c if quoted => current.push(c),
            c => current.extend(c.to_lowercase()),
        }
    }
    if !current.trim().is_empty() {
        tokens.push(current.trim().to_string());
    }
    tokens
}

/// Match gameplay verbs.
pub fn parse_command(tokens: &[String]) -> Command {
    let words: Vec<&str> = tokens.iter().map(String::as_str).collect();
    match words.as_slice() {
        ["help" | "?"] => Command::Help,
        ["quit" | "exit"] => Command::Quit,
        ["look" | "l"] => Command::Look,
        ["inventory" | "inv" | "i"] => Command::Inventory,
        ["status" | "stats"] => Command::Status,
        ["move" | "go" | "walk", dir] | ["move" | "go" | "walk", "to", dir] => Command::MoveTo((*dir).to_string()),
        [dir @ ("north" | "east" | "south" | "west" | "n" | "e" | "s" | "w")] => Command::MoveTo((*dir).to_string()),
        ["turn" | "face", dir] => Command::Turn((*dir).to_string()),
        ["attack" | "fight"] => Command::Attack(None),
        ["attack" | "fight", target] => Command::Attack(Some((*target).to_string())),
        ["undo"] => Command::Undo,
        ["redo"] => Command::Redo,
        ["save", file] => Command::Save((*file).to_string()),
        ["load", file] => Command::Load((*file).to_string()),
        _ => Command::Unknown,
    }
}

/// Match cheat verbs. `None` if the words aren't a cheat either.
pub fn parse_cheat(tokens: &[String]) -> Option<CheatCommand> {
    let words: Vec<&str> = tokens.iter().map(String::as_str).collect();
    let cheat = match words.as_slice() {
        ["kill", name] => CheatCommand::Kill((*name).to_string()),
        ["add", definition] => CheatCommand::Add {
            definition: (*definition).to_string(),
            at: None,
        },
        ["add", definition, x, y] => CheatCommand::Add {
            definition: (*definition).to_string(),
            at: Some(Point::new(x.parse().ok()?, y.parse().ok()?)),
        },
        ["remove", name] => CheatCommand::Remove((*name).to_string()),
        ["set", target, field, value] => CheatCommand::Set {
            target: (*target).to_string(),
            field: (*field).to_string(),
            value: (*value).to_string(),
        },
        ["player", "tgm"] => CheatCommand::GodMode,
        ["player", "add", definition] => CheatCommand::PlayerAdd((*definition).to_string()),
        ["player", "remove", name] => CheatCommand::PlayerRemove((*name).to_string()),
        ["player", "set", field, value] => CheatCommand::PlayerSet {
            field: (*field).to_string(),
            value: (*value).to_string(),
        },
        _ => return None,
    };
    Some(cheat)
}

/// Words offered by tab completion.
pub const VERBS: &[&str] = &[
    "help", "quit", "exit", "look", "inventory", "status", "move", "go", "turn", "attack", "undo", "redo", "save",
    "load",
];

pub const CHEAT_VERBS: &[&str] = &["kill", "add", "remove", "set", "player"];

pub const DIRECTIONS: &[&str] = &["north", "east", "south", "west"];

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<String> {
        tokenize(input)
    }

    #[test]
    fn quotes_keep_phrases_together() {
        assert_eq!(
            words(r#"set "Flame Sword"  fireDamage 12"#),
            vec!["set", "Flame Sword", "firedamage", "12"]
        );
        assert_eq!(words(r#"add "  rusty key ""#), vec!["add", "rusty key"]);
        assert!(words("   \t ").is_empty());
        assert!(words(r#""""#).is_empty());
    }

    #[test]
    fn unterminated_quote_runs_to_the_end() {
        assert_eq!(words(r#"KILL "Old Ghoul"#), vec!["kill", "Old Ghoul"]);
    }

    #[test]
    fn gameplay_verbs() {
        assert_eq!(parse_command(&words("GO North")), Command::MoveTo("north".into()));
        assert_eq!(parse_command(&words("w")), Command::MoveTo("w".into()));
        assert!(parse_command(&words("inv")).is_inventory());
        assert_eq!(parse_command(&words("fight ghoul")), Command::Attack(Some("ghoul".into())));
        assert!(parse_command(&words("dance wildly")).is_unknown());
    }

    #[test]
    fn cheat_verbs() {
        assert_eq!(
            parse_cheat(&words("add ghoul 3 4")),
            Some(CheatCommand::Add {
                definition: "ghoul".into(),
                at: Some(Point::new(3, 4)),
            })
        );
        assert_eq!(parse_cheat(&words("add ghoul three 4")), None);
        assert_eq!(parse_cheat(&words("player tgm")), Some(CheatCommand::GodMode));
        assert_eq!(
            parse_cheat(&words(r#"player set "hit points" 5"#)),
            Some(CheatCommand::PlayerSet {
                field: "hit points".into(),
                value: "5".into(),
            })
        );
        assert_eq!(parse_cheat(&words("dance")), None);
    }
}
