use serde::{Deserialize, Serialize};

use super::board::GameEngine;

/// Receiver of board engine events.
///
/// The engine calls exactly one method per event, synchronously, after the
/// state change it reports is complete. The observer gets the engine back
/// mutably and may issue the next command from inside the callback (for
/// example requesting the next shape from [`game_shape_did_land`]); the engine
/// does no further work of its own until it is invoked again.
///
/// All methods default to doing nothing.
///
/// [`game_shape_did_land`]: GameObserver::game_shape_did_land
pub trait GameObserver {
    fn game_did_begin(&mut self, engine: &mut GameEngine) {
        let _ = engine;
    }

    fn game_did_end(&mut self, engine: &mut GameEngine) {
        let _ = engine;
    }

    fn game_did_level_up(&mut self, engine: &mut GameEngine) {
        let _ = engine;
    }

    fn game_shape_did_drop(&mut self, engine: &mut GameEngine) {
        let _ = engine;
    }

    fn game_shape_did_land(&mut self, engine: &mut GameEngine) {
        let _ = engine;
    }

    fn game_shape_did_move(&mut self, engine: &mut GameEngine) {
        let _ = engine;
    }
}

/// Ignores every event.
impl GameObserver for () {}

/// Events reported to a [`GameObserver`], one per callback.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::IsVariant,
)]
pub enum GameEvent {
    Began,
    Ended,
    LevelUp,
    ShapeDropped,
    ShapeLanded,
    ShapeMoved,
}

/// Observer that records every event in order.
///
/// # Example
///
/// ```
/// use tetrix_engine::{EventLog, GameEngine, GameEvent};
///
/// let mut engine = GameEngine::default();
/// let mut log = EventLog::default();
/// engine.begin_game(&mut log);
/// assert_eq!(log.events(), &[GameEvent::Began]);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Removes and returns all recorded events.
    pub fn take(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of times `event` was recorded.
    #[must_use]
    pub fn count(&self, event: GameEvent) -> usize {
        self.events.iter().filter(|&&e| e == event).count()
    }
}

impl GameObserver for EventLog {
    fn game_did_begin(&mut self, _engine: &mut GameEngine) {
        self.events.push(GameEvent::Began);
    }

    fn game_did_end(&mut self, _engine: &mut GameEngine) {
        self.events.push(GameEvent::Ended);
    }

    fn game_did_level_up(&mut self, _engine: &mut GameEngine) {
        self.events.push(GameEvent::LevelUp);
    }

    fn game_shape_did_drop(&mut self, _engine: &mut GameEngine) {
        self.events.push(GameEvent::ShapeDropped);
    }

    fn game_shape_did_land(&mut self, _engine: &mut GameEngine) {
        self.events.push(GameEvent::ShapeLanded);
    }

    fn game_shape_did_move(&mut self, _engine: &mut GameEngine) {
        self.events.push(GameEvent::ShapeMoved);
    }
}
