use serde::{Deserialize, Serialize};

/// Phase of the game loop.
///
/// ```text
/// Idle -> AwaitingShape -> Falling -> Landed -> Falling -> ... -> GameOver
/// ```
///
/// `AwaitingShape` and `Landed` both wait for the driver to request the next
/// shape, which either starts `Falling` or ends the game. `Begin` restarts from
/// any state.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant,
)]
pub enum GameState {
    #[default]
    Idle,
    AwaitingShape,
    Falling,
    Landed,
    GameOver,
}

/// Edge of the state machine, triggered by a board engine command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `begin_game`
    Begin,
    /// `new_shape` placed the next shape on the grid.
    Spawn,
    /// `new_shape` found the spawn position occupied.
    TopOut,
    /// `let_shape_fall` could not move the shape down.
    Land,
    /// `remove_completed_lines`; the grid must not change under a falling shape.
    ClearLines,
}

impl GameState {
    /// Returns `true` while a game is under way (between begin and game over).
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::AwaitingShape | Self::Falling | Self::Landed)
    }

    /// Applies `transition`.
    ///
    /// # Panics
    ///
    /// Panics when the transition is not allowed from the current state; the
    /// driver invoked a command out of order.
    #[must_use]
    pub fn advance(self, transition: Transition) -> Self {
        match (self, transition) {
            (_, Transition::Begin) => Self::AwaitingShape,
            (Self::AwaitingShape | Self::Landed, Transition::Spawn) => Self::Falling,
            (Self::AwaitingShape | Self::Landed, Transition::TopOut) => Self::GameOver,
            (Self::Falling, Transition::Land) => Self::Landed,
            (state, Transition::ClearLines) if !state.is_falling() => state,
            (state, transition) => {
                panic!("transition {transition:?} is not allowed in state {state:?}")
            }
        }
    }
}
