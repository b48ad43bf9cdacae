use serde::{Deserialize, Serialize};

use crate::{
    Block, Shape,
    engine::{
        board::{FallOutcome, GameEngine, SpawnOutcome},
        line_clear::LineClearResult,
        observer::GameObserver,
    },
};

/// The driver-facing command surface as data.
///
/// Drivers that prefer not to re-enter the engine from inside observer
/// callbacks can queue commands instead and feed them to
/// [`GameEngine::execute`] one at a time. This is deferred sequencing on a
/// single thread, not concurrency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Command {
    BeginGame,
    NewShape,
    RotateShape,
    MoveShapeLeft,
    MoveShapeRight,
    DropShape,
    LetShapeFall,
    RemoveCompletedLines,
    RemoveAllBlocks,
}

/// What a [`Command`] did.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum CommandOutcome {
    Began,
    Spawned { falling: Shape, next: Shape },
    GameOver,
    /// A rotation, horizontal move or one-row fall succeeded.
    Moved,
    /// A rotation or horizontal move collided and was discarded.
    Blocked,
    Dropped { rows: usize },
    Landed,
    LinesRemoved(LineClearResult),
    BlocksRemoved(Vec<Block>),
}

impl GameEngine {
    /// Runs `command`, reporting events to `observer`.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as the command's own method.
    pub fn execute<O>(&mut self, command: Command, observer: &mut O) -> CommandOutcome
    where
        O: GameObserver + ?Sized,
    {
        match command {
            Command::BeginGame => {
                self.begin_game(observer);
                CommandOutcome::Began
            }
            Command::NewShape => match self.new_shape(observer) {
                SpawnOutcome::Spawned { falling, next } => {
                    CommandOutcome::Spawned { falling, next }
                }
                SpawnOutcome::GameOver => CommandOutcome::GameOver,
            },
            Command::RotateShape => self.rotate_shape(observer).into(),
            Command::MoveShapeLeft => self.move_shape_left(observer).into(),
            Command::MoveShapeRight => self.move_shape_right(observer).into(),
            Command::DropShape => CommandOutcome::Dropped {
                rows: self.drop_shape(observer),
            },
            Command::LetShapeFall => match self.let_shape_fall(observer) {
                FallOutcome::Moved => CommandOutcome::Moved,
                FallOutcome::Landed => CommandOutcome::Landed,
            },
            Command::RemoveCompletedLines => {
                CommandOutcome::LinesRemoved(self.remove_completed_lines(observer))
            }
            Command::RemoveAllBlocks => CommandOutcome::BlocksRemoved(self.remove_all_blocks()),
        }
    }
}

impl<E> From<Result<(), E>> for CommandOutcome {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => CommandOutcome::Moved,
            Err(_) => CommandOutcome::Blocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineConfig, EventLog, GameEvent, ShapeSeed};

    fn engine() -> GameEngine {
        let seed = ShapeSeed::from([7; 16]);
        GameEngine::with_seed(EngineConfig::default(), seed).unwrap()
    }

    #[test]
    fn test_execute_matches_direct_calls() {
        let mut queued = engine();
        let mut direct = engine();
        let mut log_queued = EventLog::default();
        let mut log_direct = EventLog::default();

        assert!(
            queued
                .execute(Command::BeginGame, &mut log_queued)
                .is_began()
        );
        direct.begin_game(&mut log_direct);

        let outcome = queued.execute(Command::NewShape, &mut log_queued);
        let SpawnOutcome::Spawned { falling, next } = direct.new_shape(&mut log_direct) else {
            panic!("spawn failed on an empty grid");
        };
        assert_eq!(outcome, CommandOutcome::Spawned { falling, next });

        for command in [
            Command::MoveShapeLeft,
            Command::RotateShape,
            Command::MoveShapeRight,
            Command::LetShapeFall,
        ] {
            queued.execute(command, &mut log_queued);
        }
        let _ = direct.move_shape_left(&mut log_direct);
        let _ = direct.rotate_shape(&mut log_direct);
        let _ = direct.move_shape_right(&mut log_direct);
        let _ = direct.let_shape_fall(&mut log_direct);

        assert_eq!(queued.falling_shape(), direct.falling_shape());
        assert_eq!(log_queued, log_direct);
    }

    #[test]
    fn test_drop_then_fall_lands() {
        let mut engine = engine();
        let mut log = EventLog::default();
        engine.execute(Command::BeginGame, &mut log);
        engine.execute(Command::NewShape, &mut log);
        let CommandOutcome::Dropped { rows } = engine.execute(Command::DropShape, &mut log) else {
            panic!("expected a drop");
        };
        assert!(rows > 0);
        assert_eq!(
            engine.execute(Command::LetShapeFall, &mut log),
            CommandOutcome::Landed
        );
        assert_eq!(log.count(GameEvent::ShapeLanded), 1);

        let outcome = engine.execute(Command::RemoveCompletedLines, &mut log);
        assert_eq!(outcome, CommandOutcome::LinesRemoved(LineClearResult::default()));

        let CommandOutcome::BlocksRemoved(blocks) =
            engine.execute(Command::RemoveAllBlocks, &mut log)
        else {
            panic!("expected swept blocks");
        };
        assert_eq!(blocks.len(), 4);
        assert_eq!(engine.grid().occupied_count(), 0);
    }

    #[test]
    fn test_blocked_move_reports_blocked() {
        let mut engine = engine();
        engine.execute(Command::BeginGame, &mut ());
        engine.execute(Command::NewShape, &mut ());
        let mut outcome = CommandOutcome::Moved;
        for _ in 0..engine.config().columns {
            outcome = engine.execute(Command::MoveShapeLeft, &mut ());
        }
        assert_eq!(outcome, CommandOutcome::Blocked);
    }
}
