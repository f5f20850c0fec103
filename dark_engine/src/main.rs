#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Dark Engine **
//! Terminal front end: load a map (or the built-in crypt) and take commands.

use dark_engine::data_paths::data_path;
use dark_engine::repl::InputManager;
use dark_engine::style::GameStyle;
use dark_engine::{EngineConfig, GameMap, GameProcessor, Named, demo, load_config, run_repl};

use anyhow::{Context, Result};
use log::{info, warn};

use std::fs;
use std::io::Write;

fn main() -> Result<()> {
    env_logger::init();
    let config = load_config(&EngineConfig::default_path());

    let map = match &config.map_path {
        Some(path) => {
            info!("Start: loading map from '{}'", path.display());
            let mut map = GameMap::default();
            map.load(path)
                .with_context(|| format!("while loading map '{}'", path.display()))?;
            map
        },
        None => {
            info!("Start: no map configured, using the crypt");
            demo::crypt()
        },
    };
    if config.allow_cheats {
        warn!("cheat commands are enabled");
    }
    let mut game = GameProcessor::from_config(map, &config);

    // clear the screen
    print!("\x1B[2J\x1B[H");
    std::io::stdout().flush().context("flushing stdout")?;

    println!("{:^72}", game.map().name().to_uppercase().title_style());
    let description = game.map().description();
    if !description.is_empty() {
        println!("\n{}", textwrap::fill(&description, 72).description_style());
    }
    match fs::read_to_string(data_path("intro.txt")) {
        Ok(intro) => println!("\n{}", textwrap::fill(intro.trim(), 72).description_style()),
        Err(e) => info!("no intro text: {e}"),
    }

    let mut input = InputManager::new(config.allow_cheats, config.history_file.clone());
    run_repl(&mut game, &mut input)
}
