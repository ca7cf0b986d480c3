//! Text-adventure game-state helper.
//!
//! A [`World`] is built once from three plain-text data files (map grid,
//! location blocks, item records) and afterwards only changes through visit
//! and delivery bookkeeping. A [`Player`] changes on every move and pickup.
//! [`GameState`] ties the two together and is saved and restored wholesale.

pub mod commands;
pub mod errors;
pub mod loader;
pub mod player;
pub mod state;
pub mod types;
pub mod world;

pub use commands::{parse_command, AdventureCommand, AdventureSession, CommandReply};
pub use errors::AdventureError;
pub use loader::{parse_items, parse_locations, parse_map};
pub use player::Player;
pub use state::{GameState, MoveOutcome, PickupOutcome, UseOutcome, DEFAULT_SAVE_LABEL};
pub use types::{Direction, Item, Location, StateSequence, NOWHERE, NO_TARGET, SEQUENTIAL_BASE};
pub use world::{World, WorldRules, DEFAULT_ORIGIN};
