//! Command parsing and dispatch for interactive adventure play.
//!
//! Parsing is pure ([`parse_command`]); [`AdventureSession::handle`] applies a
//! command to the live [`GameState`] and returns the text to show the player.

use crate::adventure::state::{
    GameState, PickupOutcome, UseOutcome, DEFAULT_SAVE_LABEL, OFF_MAP_WARNING,
};
use crate::adventure::types::Direction;
use crate::logutil::escape_log;
use log::{debug, warn};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdventureCommand {
    Go(Direction, u32),   // GO NORTH 2, N, SOUTH
    Look,                 // LOOK, L
    Take(String),         // TAKE item, PICK UP item
    Use(String),          // USE item
    Inventory,            // INVENTORY, I
    Score,                // SCORE
    Save(Option<String>), // SAVE [label]
    Load(Option<String>), // LOAD [label]
    Saves,                // SAVES
    Help,                 // HELP, ?
    Quit,                 // QUIT, Q
    Unknown(String),
}

fn rest_of(tokens: &[&str], from: usize) -> Option<String> {
    let joined = tokens.get(from..).unwrap_or(&[]).join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Step count after a direction: absent or non-numeric means 1, zero is rejected.
fn step_count(token: Option<&&str>) -> Option<u32> {
    match token.map(|t| t.parse::<u32>()) {
        Some(Ok(0)) => None,
        Some(Ok(n)) => Some(n),
        _ => Some(1),
    }
}

/// Parse one line of player input.
pub fn parse_command(raw: &str) -> AdventureCommand {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return AdventureCommand::Unknown(String::new());
    };
    let verb = first.to_ascii_lowercase();

    if let Some(dir) = Direction::parse(&verb) {
        return match step_count(tokens.get(1)) {
            Some(steps) => AdventureCommand::Go(dir, steps),
            None => AdventureCommand::Unknown(raw.trim().to_string()),
        };
    }

    match verb.as_str() {
        "go" | "move" => match (
            tokens.get(1).and_then(|d| Direction::parse(d)),
            step_count(tokens.get(2)),
        ) {
            (Some(dir), Some(steps)) => AdventureCommand::Go(dir, steps),
            _ => AdventureCommand::Unknown(raw.trim().to_string()),
        },
        "look" | "l" => AdventureCommand::Look,
        "take" | "get" => match rest_of(&tokens, 1) {
            Some(item) => AdventureCommand::Take(item),
            None => AdventureCommand::Unknown(raw.trim().to_string()),
        },
        "pick" if tokens.get(1).map(|t| t.eq_ignore_ascii_case("up")) == Some(true) => {
            match rest_of(&tokens, 2) {
                Some(item) => AdventureCommand::Take(item),
                None => AdventureCommand::Unknown(raw.trim().to_string()),
            }
        }
        "use" => match rest_of(&tokens, 1) {
            Some(item) => AdventureCommand::Use(item),
            None => AdventureCommand::Unknown(raw.trim().to_string()),
        },
        "inventory" | "inv" | "i" => AdventureCommand::Inventory,
        "score" => AdventureCommand::Score,
        "save" => AdventureCommand::Save(rest_of(&tokens, 1)),
        "load" | "restore" => AdventureCommand::Load(rest_of(&tokens, 1)),
        "saves" => AdventureCommand::Saves,
        "help" | "?" => AdventureCommand::Help,
        "quit" | "exit" | "q" => AdventureCommand::Quit,
        _ => AdventureCommand::Unknown(raw.trim().to_string()),
    }
}

pub fn help_text() -> &'static str {
    "Commands:\n\
     N/S/E/W [n] or GO <dir> [n] - move\n\
     LOOK - full description\n\
     TAKE <item> / USE <item>\n\
     INVENTORY, SCORE\n\
     SAVE [label], LOAD [label], SAVES\n\
     QUIT"
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub text: String,
    pub quit: bool,
}

impl CommandReply {
    fn say(text: impl Into<String>) -> Self {
        CommandReply {
            text: text.into(),
            quit: false,
        }
    }
}

/// A live game plus the directory its saves go to.
pub struct AdventureSession {
    pub state: GameState,
    save_dir: PathBuf,
}

impl AdventureSession {
    pub fn new(state: GameState, save_dir: impl Into<PathBuf>) -> Self {
        AdventureSession {
            state,
            save_dir: save_dir.into(),
        }
    }

    /// Text shown when the session starts.
    pub fn intro(&self) -> String {
        format!("{}\n\n{}", self.state.describe(true), self.exits_line())
    }

    fn exits_line(&self) -> String {
        let exits: Vec<String> = self
            .state
            .available_directions()
            .iter()
            .map(|d| d.to_string())
            .collect();
        format!("Exits: {}", exits.join(", "))
    }

    pub fn handle(&mut self, raw: &str) -> CommandReply {
        let cmd = parse_command(raw);
        debug!("adventure command: {} -> {:?}", escape_log(raw), cmd);
        match cmd {
            AdventureCommand::Go(dir, steps) => {
                let score_before = self.state.player.score;
                let outcome = self.state.move_player(dir, steps);
                if !outcome.moved() {
                    return CommandReply::say(format!("You cannot go {dir} from here."));
                }
                let mut out = self.state.describe(false);
                let (x, y) = self.state.player.position();
                let described = self.state.world.active_location(x, y).is_some();
                if outcome.points_gained != 0 {
                    out.push_str(&format!(
                        "\nScore updated: {} -> {}",
                        score_before, self.state.player.score
                    ));
                }
                // Without a location record the description already is the warning.
                if outcome.off_map && described {
                    out.push('\n');
                    out.push_str(OFF_MAP_WARNING);
                }
                out.push('\n');
                out.push_str(&self.exits_line());
                CommandReply::say(out)
            }
            AdventureCommand::Look => {
                let mut out = self.state.describe(true);
                let here: Vec<String> = self
                    .state
                    .world
                    .pickable_items(&self.state.player)
                    .iter()
                    .filter(|i| !self.state.player.holds(&i.name))
                    .map(|i| i.name.clone())
                    .collect();
                if !here.is_empty() {
                    out.push_str(&format!("\nYou see: {}", here.join(", ")));
                }
                out.push('\n');
                out.push_str(&self.exits_line());
                CommandReply::say(out)
            }
            AdventureCommand::Take(name) => CommandReply::say(match self.state.pick_up(&name) {
                PickupOutcome::Added { name, points, score } => format!(
                    "{name} added to your inventory.\nScore changed by {points}. Current score: {score}"
                ),
                PickupOutcome::AlreadyHeld(name) => format!("You already carry {name}."),
                PickupOutcome::NotHere(name) => format!("There is no {name} you can take here."),
                PickupOutcome::NotFound(name) => format!("Item {name} not found."),
            }),
            AdventureCommand::Use(name) => CommandReply::say(match self.state.use_item(&name) {
                UseOutcome::Used { name, victory: true } => {
                    format!("You use {name}. Everything is where it belongs. You win!")
                }
                UseOutcome::Used { name, .. } => format!("You use {name}."),
                UseOutcome::NotHeld(name) => format!("You do not have {name}."),
                UseOutcome::WrongPlace(name) => format!("{name} is of no use here."),
                UseOutcome::NotFound(name) => format!("Item {name} not found."),
            }),
            AdventureCommand::Inventory => {
                let inv = &self.state.player.inventory;
                if inv.is_empty() {
                    CommandReply::say("You are carrying nothing.")
                } else {
                    let names: Vec<&str> = inv.iter().map(|i| i.name.as_str()).collect();
                    CommandReply::say(format!("You carry: {}", names.join(", ")))
                }
            }
            AdventureCommand::Score => CommandReply::say(format!(
                "Score: {}  Moves: {}",
                self.state.player.score, self.state.player.current_moves
            )),
            AdventureCommand::Save(label) => {
                let label = label.unwrap_or_else(|| DEFAULT_SAVE_LABEL.to_string());
                match self.state.save(&self.save_dir, &label) {
                    Ok(_) => CommandReply::say(format!("Game saved as '{label}'.")),
                    Err(e) => {
                        warn!("save failed: {}", e);
                        CommandReply::say(format!("Save failed: {e}"))
                    }
                }
            }
            AdventureCommand::Load(label) => {
                let label = label.unwrap_or_else(|| DEFAULT_SAVE_LABEL.to_string());
                match GameState::restore(&self.save_dir, &label) {
                    Ok(state) => {
                        self.state = state;
                        CommandReply::say(format!("Loaded '{label}'.\n{}", self.intro()))
                    }
                    Err(e) => CommandReply::say(format!("Load failed: {e}")),
                }
            }
            AdventureCommand::Saves => match GameState::saved_games(&self.save_dir) {
                Ok(labels) if labels.is_empty() => CommandReply::say("No saved games."),
                Ok(labels) => CommandReply::say(format!("Saved games: {}", labels.join(", "))),
                Err(e) => CommandReply::say(format!("Cannot list saves: {e}")),
            },
            AdventureCommand::Help => CommandReply::say(help_text()),
            AdventureCommand::Quit => CommandReply {
                text: "Goodbye.".to_string(),
                quit: true,
            },
            AdventureCommand::Unknown(raw) if raw.is_empty() => CommandReply::say(""),
            AdventureCommand::Unknown(raw) => {
                CommandReply::say(format!("Unknown command '{raw}'. Type HELP."))
            }
        }
    }
}
