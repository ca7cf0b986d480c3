/// Integration tests for adventure save files and the interactive session.
use labbook::adventure::state::OFF_MAP_WARNING;
use labbook::adventure::{
    AdventureError, AdventureSession, Direction, GameState, World, WorldRules, DEFAULT_SAVE_LABEL,
};
use tempfile::tempdir;

fn new_game() -> GameState {
    let dir = format!("{}/data/adventure", env!("CARGO_MANIFEST_DIR"));
    let world = World::from_files(
        format!("{dir}/map.txt"),
        format!("{dir}/locations.txt"),
        format!("{dir}/items.txt"),
        &WorldRules::default(),
    )
    .unwrap();
    GameState::new_game(world, &[]).unwrap()
}

#[test]
fn test_save_restore_round_trip() {
    let dir = tempdir().unwrap();
    let mut game = new_game();
    game.move_player(Direction::North, 1);
    game.pick_up("Friend's Textbook");
    game.move_player(Direction::East, 1);

    let path = game.save(dir.path(), "midterm").unwrap();
    assert!(path.ends_with("saved_game_midterm.json"));

    let restored = GameState::restore(dir.path(), "midterm").unwrap();
    assert_eq!(restored.player.position(), game.player.position());
    assert_eq!(restored.player.inventory, game.player.inventory);
    assert_eq!(restored.player.score, game.player.score);
    assert_eq!(restored, game);
}

#[test]
fn test_restore_preserves_sequential_cursor() {
    let dir = tempdir().unwrap();
    let mut game = new_game();
    game.move_player(Direction::East, 1);
    game.save(dir.path(), DEFAULT_SAVE_LABEL).unwrap();

    let mut restored = GameState::restore(dir.path(), DEFAULT_SAVE_LABEL).unwrap();
    restored.move_player(Direction::West, 1);
    restored.move_player(Direction::East, 1);
    assert_eq!(restored.world.active_location(1, 1).unwrap().number, 102);
}

#[test]
fn test_saved_games_lists_decoded_labels() {
    let dir = tempdir().unwrap();
    let game = new_game();
    game.save(dir.path(), "before exam").unwrap();
    game.save(dir.path(), "a/b").unwrap();
    let labels = GameState::saved_games(dir.path()).unwrap();
    assert_eq!(labels, vec!["a/b".to_string(), "before exam".to_string()]);
}

#[test]
fn test_missing_and_invalid_saves() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        GameState::restore(dir.path(), "nothing"),
        Err(AdventureError::SaveNotFound(_))
    ));
    let game = new_game();
    assert!(matches!(
        game.save(dir.path(), "   "),
        Err(AdventureError::InvalidLabel(_))
    ));
    assert!(GameState::saved_games(&dir.path().join("absent")).unwrap().is_empty());
}

#[test]
fn test_session_commands_drive_state() {
    let dir = tempdir().unwrap();
    let mut session = AdventureSession::new(new_game(), dir.path());
    assert!(session.intro().contains("Dorm Room"));

    let reply = session.handle("n");
    assert!(reply.text.contains("Library"));
    assert!(reply.text.contains("Score updated: 0 -> 5"));

    let reply = session.handle("take friend's textbook");
    assert!(reply.text.contains("added to your inventory"));
    assert!(session.handle("inventory").text.contains("Friend's Textbook"));

    assert!(session.handle("save").text.contains("anonymous"));
    session.handle("e");
    assert_eq!(session.state.player.position(), (1, 0));

    let reply = session.handle("load");
    assert!(reply.text.starts_with("Loaded 'anonymous'"));
    assert_eq!(session.state.player.position(), (0, 0));

    assert!(session.handle("w").text.contains("cannot go West"));
    assert!(session.handle("quit").quit);
}

#[test]
fn test_off_map_warning_is_shown_once() {
    let dir = tempdir().unwrap();
    let mut session = AdventureSession::new(new_game(), dir.path());
    let reply = session.handle("s");
    assert_eq!(reply.text.matches(OFF_MAP_WARNING).count(), 1);
    assert!(reply.text.ends_with("Exits: North, East"));
}

#[test]
fn test_zero_step_command_does_not_move() {
    let dir = tempdir().unwrap();
    let mut session = AdventureSession::new(new_game(), dir.path());
    let reply = session.handle("go north 0");
    assert!(reply.text.starts_with("Unknown command"));
    assert_eq!(session.state.player.position(), (0, 1));
    assert_eq!(session.state.player.current_moves, 0);
}
