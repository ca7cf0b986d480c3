//! Whole-game state: one [`World`] plus one [`Player`].
//!
//! All gameplay mutations (movement, pickup, item use, scoring) go through
//! [`GameState`]. Saves are JSON at `<save_dir>/saved_game_<label>.json`,
//! written with an exclusive lock and an atomic temp-file rename.

use crate::adventure::errors::AdventureError;
use crate::adventure::player::Player;
use crate::adventure::types::{Direction, NOWHERE};
use crate::adventure::world::World;
use crate::logutil::escape_log;
use crate::validation::{safe_filename, validate_save_label};
use fs2::FileExt;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Label used when the player does not name a save.
pub const DEFAULT_SAVE_LABEL: &str = "anonymous";

const SAVE_PREFIX: &str = "saved_game_";
const SAVE_SUFFIX: &str = ".json";

pub const OFF_MAP_WARNING: &str = "Warning. You have reached the edge of the map.\n\
You may want to undo your last move to avoid wasting time in this nowhere.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// Steps actually taken; 0 means the move was blocked.
    pub steps_taken: u32,
    pub points_gained: i32,
    /// The player ended up on an off-map (`-1`) cell.
    pub off_map: bool,
}

impl MoveOutcome {
    pub fn moved(&self) -> bool {
        self.steps_taken > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickupOutcome {
    Added { name: String, points: i32, score: i32 },
    AlreadyHeld(String),
    NotHere(String),
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseOutcome {
    Used { name: String, victory: bool },
    NotHeld(String),
    WrongPlace(String),
    NotFound(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub world: World,
    pub player: Player,
}

impl GameState {
    pub fn new(world: World, player: Player) -> Self {
        GameState { world, player }
    }

    /// Place a fresh player on the world's origin.
    pub fn new_game(world: World, food: &[String]) -> Result<Self, AdventureError> {
        let (x, y) = world.origin()?;
        let player = Player::new(x, y, &world.special_items, food);
        let mut state = GameState { world, player };
        state.discover_special_items();
        Ok(state)
    }

    /// Special items whose start is the current cell become eligible for pickup.
    fn discover_special_items(&mut self) {
        let here = self.world.cell(self.player.x, self.player.y);
        let found: Vec<String> = self
            .world
            .items
            .iter()
            .filter(|i| self.world.is_special(&i.name) && Some(i.start) == here)
            .filter(|i| !self.player.is_eligible(&i.name))
            .map(|i| i.name.clone())
            .collect();
        for name in found {
            debug!("special item '{}' discovered", name);
            self.player.grant_special(&name);
        }
    }

    /// Directions whose neighbouring cell lies inside the grid.
    pub fn available_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| self.neighbour(*d).is_some())
            .collect()
    }

    fn neighbour(&self, direction: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = direction.delta();
        let nx = self.player.x as isize + dx;
        let ny = self.player.y as isize + dy;
        if self.world.in_bounds(nx, ny) {
            Some((nx as usize, ny as usize))
        } else {
            None
        }
    }

    /// Move up to `steps` cells in `direction`, stopping early at the grid edge.
    ///
    /// A blocked first step changes nothing and returns an outcome with
    /// `steps_taken == 0`.
    pub fn move_player(&mut self, direction: Direction, steps: u32) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();
        for _ in 0..steps {
            let Some((nx, ny)) = self.neighbour(direction) else {
                break;
            };
            self.player.x = nx;
            self.player.y = ny;
            self.player.current_moves = self.player.current_moves.saturating_add(1);
            let count = self.world.register_visit(nx, ny).unwrap_or(0);
            outcome.steps_taken += 1;

            if count == 1 {
                if let Some(loc) = self.world.active_location(nx, ny) {
                    if loc.points != 0 {
                        let before = self.player.score;
                        self.player.score += loc.points;
                        outcome.points_gained += loc.points;
                        debug!("score updated: {} -> {}", before, self.player.score);
                    }
                }
            }
            outcome.off_map = self.world.cell(nx, ny) == Some(NOWHERE);
            self.discover_special_items();
        }
        outcome
    }

    /// Pick up the named item (case-insensitive) if it is eligible here.
    pub fn pick_up(&mut self, name: &str) -> PickupOutcome {
        let Some(item) = self.world.search_item(name).cloned() else {
            log::warn!("pickup of unknown item '{}'", escape_log(name));
            return PickupOutcome::NotFound(name.to_string());
        };
        if self.player.holds(&item.name) {
            return PickupOutcome::AlreadyHeld(item.name);
        }
        let eligible = self
            .world
            .pickable_items(&self.player)
            .iter()
            .any(|i| i.name == item.name);
        if !eligible {
            return PickupOutcome::NotHere(item.name);
        }
        self.player.score += item.points;
        self.player.inventory.push(item.clone());
        PickupOutcome::Added {
            name: item.name,
            points: item.points,
            score: self.player.score,
        }
    }

    /// Use a held item at its target location. Delivering the last targeted item wins the game.
    pub fn use_item(&mut self, name: &str) -> UseOutcome {
        let Some(item) = self.world.search_item(name).cloned() else {
            return UseOutcome::NotFound(name.to_string());
        };
        if !self.player.holds(&item.name) {
            return UseOutcome::NotHeld(item.name);
        }
        let usable = self
            .world
            .usable_items(&self.player)
            .iter()
            .any(|i| i.name == item.name);
        if !usable {
            return UseOutcome::WrongPlace(item.name);
        }
        self.player.take_from_inventory(&item.name);
        self.world.mark_delivered(&item.name);
        if self.world.all_delivered() {
            self.player.victory = true;
            info!("victory after {} moves, score {}", self.player.current_moves, self.player.score);
        }
        UseOutcome::Used {
            name: item.name,
            victory: self.player.victory,
        }
    }

    /// Description of the current location: long on the first visit or when
    /// `full` is requested, brief on repeat visits.
    pub fn describe(&self, full: bool) -> String {
        let (x, y) = self.player.position();
        match self.world.active_location(x, y) {
            Some(loc) if full || !self.world.visited_again(x, y) => {
                format!("{}\n{}", loc.name, loc.long_description)
            }
            Some(loc) => format!("{}\n{}", loc.name, loc.brief_description),
            None => OFF_MAP_WARNING.to_string(),
        }
    }

    /// Persist the whole state under `label`.
    pub fn save(&self, save_dir: &Path, label: &str) -> Result<PathBuf, AdventureError> {
        let path = save_path(save_dir, label)?;
        let data = serde_json::to_string_pretty(self)?;
        write_json_atomic(&path, &data)?;
        info!("game saved as '{}' ({})", escape_log(label), path.display());
        Ok(path)
    }

    /// Load a state previously written by [`GameState::save`].
    pub fn restore(save_dir: &Path, label: &str) -> Result<Self, AdventureError> {
        let path = save_path(save_dir, label)?;
        if !path.exists() {
            return Err(AdventureError::SaveNotFound(label.to_string()));
        }
        let lock_file = open_lock(&path)?;
        lock_file.lock_shared()?;
        let content = fs::read_to_string(&path);
        lock_file.unlock()?;
        let state: GameState = serde_json::from_str(&content?)?;
        info!("game '{}' restored", escape_log(label));
        Ok(state)
    }

    /// Labels of every save in `save_dir`, sorted.
    pub fn saved_games(save_dir: &Path) -> Result<Vec<String>, AdventureError> {
        if !save_dir.exists() {
            return Ok(Vec::new());
        }
        let mut labels = Vec::new();
        for entry in fs::read_dir(save_dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(encoded) = name
                .strip_prefix(SAVE_PREFIX)
                .and_then(|rest| rest.strip_suffix(SAVE_SUFFIX))
            {
                let label = percent_encoding::percent_decode_str(encoded)
                    .decode_utf8_lossy()
                    .into_owned();
                labels.push(label);
            }
        }
        labels.sort();
        Ok(labels)
    }
}

fn save_path(save_dir: &Path, label: &str) -> Result<PathBuf, AdventureError> {
    let label = validate_save_label(label)?;
    Ok(save_dir.join(format!(
        "{}{}{}",
        SAVE_PREFIX,
        safe_filename(&label),
        SAVE_SUFFIX
    )))
}

/// Sidecar file guarding `path`; hidden so it never shows up as a save.
fn open_lock(path: &Path) -> std::io::Result<File> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("save.json");
    OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(dir.join(format!(".{base}.lock")))
}

/// Fill, flush and close the temp file, then move it into place.
fn finish_tmp(mut tmp: File, content: &str, tmp_path: &Path, path: &Path) -> std::io::Result<()> {
    tmp.write_all(content.as_bytes())?;
    tmp.sync_all()?;
    drop(tmp);
    fs::rename(tmp_path, path)
}

/// Write `content` to a temp file and rename it over `path`. The target only
/// ever appears complete; the temp file is removed if any step fails.
fn write_json_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let lock_file = open_lock(path)?;
    lock_file.lock_exclusive()?;
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("save.json");
    let mut counter = 0u32;
    let (tmp_path, tmp) = loop {
        let cand = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&cand) {
            Ok(tmp) => break (cand, tmp),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
            }
            Err(e) => return Err(e),
        }
    };
    if let Err(e) = finish_tmp(tmp, content, &tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Ok(dirf) = File::open(dir) {
        let _ = dirf.sync_all();
    }
    lock_file.unlock()?;
    Ok(())
}
