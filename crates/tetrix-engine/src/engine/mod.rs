//! Board engine and game loop.
//!
//! - [`GameEngine`] - grid, falling shape, next shape, score and level; the command surface
//! - [`GameState`] - phases of the game loop and their legal transitions
//! - [`GameObserver`] - callbacks the engine fires after each transition
//! - [`Command`] - the command surface as data, for queue-driven drivers
//! - [`ShapeFactory`] - seeded random shape generation
//! - [`EngineConfig`] - grid size, fall speed, level threshold and score table
//!
//! # Game Flow
//!
//! 1. [`GameEngine::begin_game`] resets the board; the observer hears `game_did_begin`
//! 2. [`GameEngine::new_shape`] spawns the next shape (or ends the game if the board is full)
//! 3. Timer ticks call [`GameEngine::let_shape_fall`]; input calls the move, rotate and drop commands
//! 4. When the shape lands the observer hears `game_shape_did_land`, removes completed lines
//!    and asks for the next shape
//! 5. Repeat until a spawn fails and the observer hears `game_did_end`
//!
//! # Example
//!
//! A driver that chains the next command from inside its callbacks:
//!
//! ```
//! use tetrix_engine::{GameEngine, GameObserver};
//!
//! #[derive(Default)]
//! struct AutoPilot {
//!     landings: usize,
//!     ended: bool,
//! }
//!
//! impl GameObserver for AutoPilot {
//!     fn game_did_begin(&mut self, engine: &mut GameEngine) {
//!         engine.new_shape(self);
//!     }
//!
//!     fn game_shape_did_land(&mut self, engine: &mut GameEngine) {
//!         self.landings += 1;
//!         engine.remove_completed_lines(self);
//!         engine.new_shape(self);
//!     }
//!
//!     fn game_did_end(&mut self, _engine: &mut GameEngine) {
//!         self.ended = true;
//!     }
//! }
//!
//! let mut engine = GameEngine::default();
//! let mut pilot = AutoPilot::default();
//! engine.begin_game(&mut pilot);
//! while !pilot.ended {
//!     engine.let_shape_fall(&mut pilot);
//! }
//! assert!(pilot.landings > 0);
//! ```

pub use self::{
    board::*, command::*, config::*, game_stats::*, line_clear::*, observer::*, shape_factory::*,
    state::*,
};

mod board;
mod command;
mod config;
mod game_stats;
mod line_clear;
mod observer;
mod shape_factory;
mod state;
