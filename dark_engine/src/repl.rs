//! The read-eval-print loop around a [`GameProcessor`].

mod input;

use anyhow::Result;
use log::{error, info};

use crate::error::EngineError;
use crate::object::Named;
use crate::processor::{GameProcessor, Outcome};
use crate::style::GameStyle;

pub use input::{InputEvent, InputManager};

/// Whether the loop should keep going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplControl {
    Continue,
    Quit,
}

/// Run commands from the terminal until the player quits or input ends.
///
/// # Errors
/// Currently none escape: command errors are reported and the loop carries on.
pub fn run_repl(game: &mut GameProcessor, input: &mut InputManager) -> Result<()> {
    let mut turn = 0_u32;
    loop {
        let prompt = format!("\n[{}|{turn}]>> ", game.map().name()).prompt_style().to_string();
        let line = match input.read_line(&prompt) {
            Ok(InputEvent::Line(line)) => line,
            Ok(InputEvent::Eof) => "quit".to_string(),
            Ok(InputEvent::Interrupted) => {
                println!("{}", "Command canceled.".message_style());
                continue;
            },
            Err(err) => {
                error!("failed to read input: {err}");
                println!("{}", "Failed to read input. Try again.".error_style());
                continue;
            },
        };
        if line.trim().is_empty() {
            continue;
        }
        turn += 1;
        if handle_line(game, &line) == ReplControl::Quit {
            info!("player quit after {turn} commands");
            println!("{}", "Goodbye.".description_style());
            return Ok(());
        }
    }
}

/// Process one line and print what came of it.
pub fn handle_line(game: &mut GameProcessor, line: &str) -> ReplControl {
    match game.process_message(line) {
        Ok(outcome) => {
            println!("{}", render_outcome(&outcome));
            if outcome.is_quit() {
                ReplControl::Quit
            } else {
                ReplControl::Continue
            }
        },
        Err(err) => {
            error!("'{line}' failed: {err}");
            println!("{}", describe_error(&err).error_style());
            ReplControl::Continue
        },
    }
}

/// Styled text for an outcome.
pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Message(text) => text.message_style().to_string(),
        Outcome::Failure(text) => text.denied_style().to_string(),
        Outcome::Quit => String::new(),
    }
}

/// Player-facing wording for an engine error.
pub fn describe_error(err: &EngineError) -> String {
    match err {
        EngineError::NotImplemented(what) => format!("{what} isn't available yet."),
        EngineError::Validation(problems) => format!("That map has {} problem(s); see the log.", problems.len()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::GameMap;

    #[test]
    fn quit_ends_the_loop_and_errors_do_not() {
        let mut game = GameProcessor::new(GameMap::new("Empty"), false);
        assert_eq!(handle_line(&mut game, "look"), ReplControl::Continue);
        assert_eq!(handle_line(&mut game, "attack"), ReplControl::Continue);
        assert_eq!(handle_line(&mut game, "quit"), ReplControl::Quit);
    }

    #[test]
    fn combat_errors_read_as_unavailable() {
        let err = EngineError::NotImplemented("combat".into());
        assert_eq!(describe_error(&err), "combat isn't available yet.");
    }
}
