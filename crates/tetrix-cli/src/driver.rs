//! Headless driver: turns observer callbacks into queued commands.

use std::collections::VecDeque;

use log::{debug, info};
use rand::Rng as _;
use rand_pcg::Pcg32;
use serde::Serialize;
use tetrix_engine::{Command, GameEngine, GameObserver, ShapeSeed};

/// Queues the follow-up command for each engine event instead of calling
/// back into the engine from the callback.
#[derive(Debug, Default)]
pub struct QueueDriver {
    queue: VecDeque<Command>,
    ended: bool,
}

impl QueueDriver {
    pub fn pop(&mut self) -> Option<Command> {
        self.queue.pop_front()
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl GameObserver for QueueDriver {
    fn game_did_begin(&mut self, _engine: &mut GameEngine) {
        self.ended = false;
        self.queue.clear();
        self.queue.push_back(Command::NewShape);
    }

    fn game_did_end(&mut self, engine: &mut GameEngine) {
        info!("game ended with score {}", engine.score());
        self.ended = true;
        self.queue.clear();
    }

    fn game_did_level_up(&mut self, engine: &mut GameEngine) {
        debug!(
            "level {} reached, tick now {:?}",
            engine.level(),
            engine.tick_interval()
        );
    }

    fn game_shape_did_drop(&mut self, _engine: &mut GameEngine) {
        self.queue.push_back(Command::LetShapeFall);
    }

    fn game_shape_did_land(&mut self, _engine: &mut GameEngine) {
        self.queue.push_back(Command::RemoveCompletedLines);
        self.queue.push_back(Command::NewShape);
    }
}

/// Stand-in for a human at the keyboard, mashing keys at random.
///
/// One in three inputs is a plain tick so shapes keep falling.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    rng: Pcg32,
}

impl RandomPlayer {
    pub fn new(rng: Pcg32) -> Self {
        Self { rng }
    }

    pub fn choose(&mut self) -> Command {
        match self.rng.random_range(0..12) {
            0..=1 => Command::RotateShape,
            2..=3 => Command::MoveShapeLeft,
            4..=5 => Command::MoveShapeRight,
            6 => Command::DropShape,
            _ => Command::LetShapeFall,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub seed: ShapeSeed,
    pub game_over: bool,
    pub steps: usize,
    pub score: u64,
    pub level: u32,
    pub landed_shapes: usize,
    pub cleared_lines: usize,
    /// Clears of 1, 2, 3 and 4+ lines at once.
    pub line_clears: [usize; 4],
    /// Blocks removed by the game-over sweep.
    pub swept_blocks: usize,
    /// Final grid before the sweep, one string per row.
    pub grid: Vec<String>,
}

/// Plays one game until it ends or `max_steps` commands have run.
///
/// Queued follow-ups always run before the next player input, so a landing
/// is fully resolved before the player touches the next shape.
pub fn play_game(
    engine: &mut GameEngine,
    seed: ShapeSeed,
    player: &mut RandomPlayer,
    max_steps: usize,
) -> GameSummary {
    let mut driver = QueueDriver::default();
    engine.execute(Command::BeginGame, &mut driver);

    let mut steps = 0;
    while !driver.is_ended() && steps < max_steps {
        let command = match driver.pop() {
            Some(command) => command,
            None if engine.has_falling_shape() => player.choose(),
            None => break,
        };
        engine.execute(command, &mut driver);
        steps += 1;
    }

    let grid = engine.grid().to_string().lines().map(str::to_owned).collect();
    let stats = engine.stats();
    let mut summary = GameSummary {
        seed,
        game_over: driver.is_ended(),
        steps,
        score: stats.score(),
        level: stats.level(),
        landed_shapes: stats.landed_shapes(),
        cleared_lines: stats.total_cleared_lines(),
        line_clears: *stats.line_cleared_counter(),
        swept_blocks: 0,
        grid,
    };
    if summary.game_over {
        summary.swept_blocks = engine.remove_all_blocks().len();
    }
    summary
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use tetrix_engine::{EngineConfig, GameState};

    use super::*;

    fn engine(seed: ShapeSeed) -> GameEngine {
        GameEngine::with_seed(EngineConfig::default(), seed).unwrap()
    }

    #[test]
    fn test_land_queues_clear_then_spawn() {
        let mut driver = QueueDriver::default();
        let mut engine = engine(ShapeSeed::from([1; 16]));
        engine.execute(Command::BeginGame, &mut driver);
        assert_eq!(driver.pop(), Some(Command::NewShape));
        assert_eq!(driver.pop(), None);

        engine.execute(Command::NewShape, &mut driver);
        engine.execute(Command::DropShape, &mut driver);
        assert_eq!(driver.pop(), Some(Command::LetShapeFall));
        engine.execute(Command::LetShapeFall, &mut driver);
        assert_eq!(driver.pop(), Some(Command::RemoveCompletedLines));
        assert_eq!(driver.pop(), Some(Command::NewShape));
        assert!(!driver.is_ended());
    }

    #[test]
    fn test_game_plays_to_the_end() {
        let seed = ShapeSeed::from([9; 16]);
        let mut engine = engine(seed);
        let mut player = RandomPlayer::new(Pcg32::seed_from_u64(9));
        let summary = play_game(&mut engine, seed, &mut player, 1_000_000);

        assert!(summary.game_over);
        assert_eq!(engine.state(), GameState::GameOver);
        assert_eq!(engine.grid().occupied_count(), 0);
        let occupied: usize = summary
            .grid
            .iter()
            .map(|row| row.chars().filter(|&c| c == '#').count())
            .sum();
        assert_eq!(summary.swept_blocks, occupied);
        assert_eq!(occupied, summary.landed_shapes * 4 - summary.cleared_lines * 10);
        assert_eq!(summary.grid.len(), 20);
    }

    #[test]
    fn test_same_seed_same_game() {
        let seed = ShapeSeed::from([5; 16]);
        let a = play_game(
            &mut engine(seed),
            seed,
            &mut RandomPlayer::new(Pcg32::seed_from_u64(1)),
            2_000,
        );
        let b = play_game(
            &mut engine(seed),
            seed,
            &mut RandomPlayer::new(Pcg32::seed_from_u64(1)),
            2_000,
        );
        assert_eq!(a.score, b.score);
        assert_eq!(a.steps, b.steps);
        assert_eq!(a.grid, b.grid);
    }

    #[test]
    fn test_step_limit_stops_game() {
        let seed = ShapeSeed::from([2; 16]);
        let mut engine = engine(seed);
        let mut player = RandomPlayer::new(Pcg32::seed_from_u64(2));
        let summary = play_game(&mut engine, seed, &mut player, 3);
        assert_eq!(summary.steps, 3);
        assert!(!summary.game_over);
        assert_eq!(summary.swept_blocks, 0);
    }
}
