//! Game-board engine for a falling-block puzzle game.
//!
//! The crate owns the rules and nothing else: a fixed-size [`Grid`], the seven
//! tetromino [`Shape`]s, the [`GameEngine`] that moves, rotates, drops and lands
//! them, the line-clear collapse, and the [`GameState`] machine that reports
//! every transition to a [`GameObserver`]. Rendering, input and timers belong to
//! the driver.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("shape colliding with the grid or its bounds")]
pub struct ShapeCollisionError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("grid must have at least one column and one row")]
    EmptyGrid,
    #[display("grid {columns}x{rows} is too small to spawn every shape")]
    GridTooSmall { columns: usize, rows: usize },
    #[display("grid dimensions do not fit in signed coordinates")]
    GridTooLarge,
    #[display("initial level must be at least 1")]
    ZeroInitialLevel,
    #[display("lines per level must be positive")]
    ZeroLinesPerLevel,
    #[display("score table needs entries for at least zero and one line")]
    ScoreTableTooShort,
    #[display("score table must not decrease as more lines are cleared")]
    ScoreTableNotMonotonic,
    #[display("tick floor {floor_millis}ms must be positive and at most the initial {initial_millis}ms")]
    InvalidTickFloor {
        floor_millis: u64,
        initial_millis: u64,
    },
}
