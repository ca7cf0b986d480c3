//! # Labbook - a coursework lab notebook
//!
//! Labbook bundles a handful of independent exercises behind one library and one
//! CLI binary. The exercises share only the ambient plumbing: TOML
//! configuration, `log` based logging and `thiserror` error types.
//!
//! ## Features
//!
//! - **Text Adventure**: grid world loaded from plain-text data files, with
//!   sequential locations, item pickup and delivery, scoring and JSON saves.
//! - **Epidemic Model**: day-by-day SIR simulation with deaths, births and re-infection.
//! - **Numerics**: Newton's method, recursive sequences, sampling distributions.
//! - **Puzzles**: substitution cipher and a seeded group draw.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use labbook::adventure::{AdventureSession, GameState, World, WorldRules};
//!
//! fn main() -> anyhow::Result<()> {
//!     let world = World::from_files(
//!         "data/adventure/map.txt",
//!         "data/adventure/locations.txt",
//!         "data/adventure/items.txt",
//!         &WorldRules::default(),
//!     )?;
//!     let state = GameState::new_game(world, &[])?;
//!     let mut session = AdventureSession::new(state, "data/saves");
//!     println!("{}", session.intro());
//!     println!("{}", session.handle("n").text);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`adventure`] - Text-adventure world, player, game state and command loop
//! - [`labs`] - Numeric and puzzle exercises
//! - [`config`] - Configuration loading and defaults
//! - [`validation`] - Save label validation and file name encoding
//! - [`logutil`] - Helpers for logging user-supplied text

pub mod adventure;
pub mod config;
pub mod labs;
pub mod logutil;
pub mod validation;
