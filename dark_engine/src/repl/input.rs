//! Terminal input for the REPL.
//!
//! Uses rustyline (with history and tab completion) on a terminal and plain
//! stdin otherwise.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::command::{CHEAT_VERBS, DIRECTIONS, VERBS};

/// Outcome of reading a line.
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

type ReplEditor = rustyline::Editor<DarkHelper, DefaultHistory>;

struct DarkHelper {
    verbs: Vec<&'static str>,
}

impl DarkHelper {
    fn new(allow_cheats: bool) -> Self {
        let mut verbs = VERBS.to_vec();
        if allow_cheats {
            verbs.extend_from_slice(CHEAT_VERBS);
        }
        verbs.sort_unstable();
        verbs.dedup();
        Self { verbs }
    }
}

impl Helper for DarkHelper {}

impl Completer for DarkHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(completions(&self.verbs, line, pos))
    }
}

impl Hinter for DarkHelper {
    type Hint = String;
}

impl Highlighter for DarkHelper {}

impl Validator for DarkHelper {}

/// Complete the word under the cursor: verbs first, directions after a verb.
fn completions(verbs: &[&str], line: &str, pos: usize) -> (usize, Vec<Pair>) {
    let before = &line[..pos];
    let start = before
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8());
    let prefix = before[start..].to_lowercase();
    let first_word = before[..start].trim().is_empty();
    let pool: &[&str] = if first_word { verbs } else { DIRECTIONS };
    let pairs = pool
        .iter()
        .filter(|word| !prefix.is_empty() && word.starts_with(&prefix))
        .map(|word| Pair {
            display: (*word).to_string(),
            replacement: (*word).to_string(),
        })
        .collect();
    (start, pairs)
}

/// Reads player input from rustyline when possible, falling back to plain stdin.
pub struct InputManager {
    backend: Backend,
}

impl InputManager {
    pub fn new(allow_cheats: bool, history_file: Option<PathBuf>) -> Self {
        let backend = if io::stdin().is_terminal() {
            match RustylineInput::new(allow_cheats, history_file.or_else(history_file_path)) {
                Ok(editor) => {
                    info!("using rustyline-backed REPL input");
                    Backend::Rustyline(Box::new(editor))
                },
                Err(err) => {
                    warn!("failed to initialize rustyline ({err}), falling back to basic stdin");
                    Backend::plain()
                },
            }
        } else {
            info!("stdin is not a TTY; using basic input mode");
            Backend::plain()
        };
        Self { backend }
    }

    /// Read a line. If rustyline fails outright, switch to plain stdin and retry once.
    ///
    /// # Errors
    /// I/O failures reading stdin.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.backend.read_line(prompt) {
            Ok(event) => Ok(event),
            Err(err) if self.backend.is_rustyline() => {
                warn!("rustyline input failed: {err} -- switching to basic stdin");
                self.backend = Backend::plain();
                self.backend.read_line(prompt)
            },
            Err(err) => Err(err),
        }
    }
}

enum Backend {
    Rustyline(Box<RustylineInput>),
    Plain(StdinInput),
}

impl Backend {
    fn plain() -> Self {
        Backend::Plain(StdinInput::default())
    }

    fn is_rustyline(&self) -> bool {
        matches!(self, Backend::Rustyline(_))
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self {
            Backend::Rustyline(editor) => editor.read_line(prompt),
            Backend::Plain(stdin) => stdin.read_line(prompt),
        }
    }
}

struct RustylineInput {
    editor: ReplEditor,
    history_path: Option<PathBuf>,
}

impl RustylineInput {
    fn new(allow_cheats: bool, history_path: Option<PathBuf>) -> io::Result<Self> {
        let mut editor = ReplEditor::new().map_err(map_io_err)?;
        editor.set_helper(Some(DarkHelper::new(allow_cheats)));

        if let Some(path) = history_path.as_ref() {
            if let Some(dir) = path.parent()
                && let Err(err) = fs::create_dir_all(dir)
            {
                warn!("failed to create history directory {}: {err}", dir.display());
            }
            match editor.load_history(path) {
                Ok(()) => {},
                Err(ReadlineError::Io(ref io_err)) if io_err.kind() == io::ErrorKind::NotFound => {
                    info!("no prior history at {}, starting fresh", path.display());
                },
                Err(other) => warn!("failed to load history from {}: {other}", path.display()),
            }
        }

        Ok(Self { editor, history_path })
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        warn!("failed to append to history: {err}");
                    }
                    if let Some(path) = self.history_path.as_ref()
                        && let Err(err) = self.editor.save_history(path)
                    {
                        warn!("failed to persist history to {}: {err}", path.display());
                    }
                }
                Ok(InputEvent::Line(line))
            },
            Err(err) => convert_readline_error(err),
        }
    }
}

#[derive(Default)]
struct StdinInput {
    buffer: String,
}

impl StdinInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        print!("{prompt}");
        io::stdout().flush()?;

        self.buffer.clear();
        if io::stdin().read_line(&mut self.buffer)? == 0 {
            return Ok(InputEvent::Eof);
        }
        let line = self.buffer.trim_end_matches(['\n', '\r']).to_string();
        Ok(InputEvent::Line(line))
    }
}

fn convert_readline_error(err: ReadlineError) -> io::Result<InputEvent> {
    match err {
        ReadlineError::Interrupted => Ok(InputEvent::Interrupted),
        ReadlineError::Eof => Ok(InputEvent::Eof),
        other => Err(map_io_err(other)),
    }
}

fn map_io_err(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(io_err) => io_err,
        other => io::Error::other(other),
    }
}

fn history_file_path() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::data_local_dir)
        .map(|base| build_history_path(&base))
}

fn build_history_path(base: &Path) -> PathBuf {
    base.join("dark_engine").join("history.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offered(verbs: &[&str], line: &str) -> (usize, Vec<String>) {
        let (start, pairs) = completions(verbs, line, line.len());
        (start, pairs.into_iter().map(|p| p.replacement).collect())
    }

    #[test]
    fn converts_readline_ctrl_c_to_interrupt() {
        let result = convert_readline_error(ReadlineError::Interrupted).expect("event");
        assert!(matches!(result, InputEvent::Interrupted));
    }

    #[test]
    fn history_path_appends_components() {
        let path = build_history_path(Path::new("/tmp/dark-test"));
        assert!(path.ends_with(Path::new("dark_engine/history.txt")));
    }

    #[test]
    fn cheat_verbs_complete_only_when_allowed() {
        let plain = DarkHelper::new(false);
        let cheats = DarkHelper::new(true);
        assert!(offered(&plain.verbs, "ki").1.is_empty());
        assert_eq!(offered(&cheats.verbs, "ki").1, vec!["kill"]);
        assert_eq!(offered(&plain.verbs, "LO").1, vec!["load", "look"]);
    }

    #[test]
    fn second_word_completes_directions() {
        let helper = DarkHelper::new(false);
        assert_eq!(offered(&helper.verbs, "go we"), (3, vec!["west".to_string()]));
        assert!(offered(&helper.verbs, "go ").1.is_empty());
    }
}
