use dark_data::{CardinalDirection, Point};
use dark_engine::entity::{Oriented, Placed};
use dark_engine::processor::CANT_DO_THAT;
use dark_engine::{EngineConfig, EngineError, GameProcessor, Outcome, demo};

fn text(outcome: &Outcome) -> &str {
    match outcome {
        Outcome::Message(text) | Outcome::Failure(text) => text,
        Outcome::Quit => "",
    }
}

fn position(game: &GameProcessor) -> Option<Point> {
    game.player().map(Placed::position)
}

#[test]
fn help_mentions_cheats_only_when_enabled() {
    let mut plain = GameProcessor::new(demo::crypt(), false);
    let mut cheater = GameProcessor::new(demo::crypt(), true);
    assert!(!text(&plain.process_message("help").expect("help")).contains("Cheats"));
    assert!(text(&cheater.process_message("help").expect("help")).contains("player tgm"));
}

#[test]
fn cheats_are_ignored_when_disabled() {
    let mut game = GameProcessor::new(demo::crypt(), false);
    let outcome = game.process_message("player tgm").expect("outcome");
    assert_eq!(outcome, Outcome::Failure(CANT_DO_THAT.into()));
    assert!(!game.is_god_mode());
}

#[test]
fn locked_door_needs_the_key() {
    let mut game = GameProcessor::new(demo::crypt(), false);
    for _ in 0..3 {
        assert!(game.process_message("go east").expect("move").is_message());
    }
    let blocked = game.process_message("go east").expect("door");
    assert!(text(&blocked).contains("Crypt Door"), "{blocked:?}");
    assert_eq!(position(&game), Some(Point::new(5, 2)));
}

#[test]
fn walking_undoes_step_by_step() {
    let mut game = GameProcessor::new(demo::crypt(), false);
    game.process_message("go south").expect("move");
    game.process_message("turn west").expect("turn");
    assert_eq!(game.player().map(Oriented::facing), Some(CardinalDirection::West));

    game.process_message("undo").expect("undo turn");
    assert_eq!(game.player().map(Oriented::facing), Some(CardinalDirection::South));
    game.process_message("undo").expect("undo move");
    assert_eq!(position(&game), Some(Point::new(2, 2)));
    assert_eq!(game.player().map(Oriented::facing), Some(CardinalDirection::East));
    assert!(game.process_message("undo").expect("empty").is_failure());
}

#[test]
fn undo_limit_comes_from_config() {
    let config = EngineConfig {
        undo_limit: 1,
        ..EngineConfig::default()
    };
    let mut game = GameProcessor::from_config(demo::crypt(), &config);
    game.process_message("turn north").expect("turn");
    game.process_message("turn south").expect("turn");
    assert_eq!(game.undo_manager().num_transactions(), 1);
}

#[test]
fn fighting_is_not_ready() {
    let mut game = GameProcessor::new(demo::crypt(), false);
    let err = game.process_message("fight ghoul").expect_err("combat");
    assert!(matches!(err, EngineError::NotImplemented(_)));
}

#[test]
fn moves_cannot_be_placed_in_the_world() {
    let mut game = GameProcessor::new(demo::crypt(), true);
    let before = game.map().world_items().len();
    let err = game.process_message("add claw").expect_err("move definition");
    assert!(matches!(err, EngineError::InvalidArgument(_)));
    assert_eq!(game.map().world_items().len(), before);
}

#[test]
fn status_reports_the_player() {
    let mut game = GameProcessor::new(demo::crypt(), true);
    game.process_message("player set statuscondition \"poisoned, cursed\"").expect("set");
    let status = game.process_message("status").expect("status");
    assert_eq!(text(&status), "Wanderer: HP 100/100, level 1, Poisoned, Cursed");
}

#[test]
fn fighting_moves_cannot_be_carried() {
    let mut game = GameProcessor::new(demo::crypt(), true);
    assert!(matches!(
        game.process_message("player add claw"),
        Err(EngineError::InvalidArgument(_))
    ));
    game.process_message("player add torch").expect("torch");
    assert_eq!(text(&game.process_message("inventory").expect("inventory")), "You are carrying: Torch.");
}
