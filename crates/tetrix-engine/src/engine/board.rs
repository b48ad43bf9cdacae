use std::time::Duration;

use log::{debug, info, trace};

use crate::{
    Block, ConfigError, Grid, Shape, ShapeCollisionError,
    engine::{
        config::EngineConfig,
        game_stats::GameStats,
        line_clear::{LineClearResult, collapse_completed_rows},
        observer::GameObserver,
        shape_factory::{ShapeFactory, ShapeSeed},
        state::{GameState, Transition},
    },
};

/// Result of [`GameEngine::new_shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SpawnOutcome {
    /// The previous next shape is now falling and a fresh next shape was drawn.
    Spawned { falling: Shape, next: Shape },
    /// The spawn position was occupied; the game is over and nothing spawned.
    GameOver,
}

/// Result of [`GameEngine::let_shape_fall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum FallOutcome {
    /// The shape moved down one row.
    Moved,
    /// The shape could not move; its blocks are now part of the grid.
    Landed,
}

/// The board engine: grid, falling shape, next shape, score and level.
///
/// Every command runs to completion, including its observer callback, before
/// returning. Collisions, wall hits and a full board are ordinary outcomes
/// reported through return values and events; a rejected move leaves the engine
/// untouched. Calling a command that needs a falling shape when there is none,
/// or asking for a new shape while one is still falling, is a driver bug and
/// panics.
///
/// # Example
///
/// ```
/// use tetrix_engine::{EngineConfig, EventLog, FallOutcome, GameEngine, GameEvent, ShapeSeed};
///
/// let seed: ShapeSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let mut engine = GameEngine::with_seed(EngineConfig::default(), seed).unwrap();
/// let mut log = EventLog::default();
///
/// engine.begin_game(&mut log);
/// assert!(engine.new_shape(&mut log).is_spawned());
///
/// engine.drop_shape(&mut log);
/// assert_eq!(engine.let_shape_fall(&mut log), FallOutcome::Landed);
/// assert_eq!(
///     log.events(),
///     &[GameEvent::Began, GameEvent::ShapeDropped, GameEvent::ShapeLanded]
/// );
/// assert_eq!(engine.grid().occupied_count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: EngineConfig,
    grid: Grid<Block>,
    factory: ShapeFactory,
    falling_shape: Option<Shape>,
    next_shape: Option<Shape>,
    stats: GameStats,
    state: GameState,
    tick_interval: Duration,
}

impl Default for GameEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        let factory = ShapeFactory::new(config.randomizer);
        Self::from_parts(config, factory)
    }
}

impl GameEngine {
    /// Creates an idle engine with a randomly seeded shape factory.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let factory = ShapeFactory::new(config.randomizer);
        Ok(Self::from_parts(config, factory))
    }

    /// Like [`Self::new`], but shapes follow `seed` deterministically.
    pub fn with_seed(config: EngineConfig, seed: ShapeSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        let factory = ShapeFactory::with_seed(seed, config.randomizer);
        Ok(Self::from_parts(config, factory))
    }

    fn from_parts(config: EngineConfig, factory: ShapeFactory) -> Self {
        Self {
            grid: Grid::new(config.columns, config.rows),
            factory,
            falling_shape: None,
            next_shape: None,
            stats: GameStats::new(config.initial_level),
            state: GameState::Idle,
            tick_interval: config.tick.interval_for(0),
            config,
        }
    }

    /// Configuration the engine was built with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Landed blocks; the falling shape is not part of the grid.
    #[must_use]
    pub fn grid(&self) -> &Grid<Block> {
        &self.grid
    }

    /// Shape under player control, if any.
    #[must_use]
    pub fn falling_shape(&self) -> Option<&Shape> {
        self.falling_shape.as_ref()
    }

    /// Returns `true` while a shape is under player control.
    #[must_use]
    pub fn has_falling_shape(&self) -> bool {
        self.falling_shape.is_some()
    }

    /// Shape that the next [`Self::new_shape`] will spawn.
    #[must_use]
    pub fn next_shape(&self) -> Option<&Shape> {
        self.next_shape.as_ref()
    }

    /// Points earned in the current game.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    /// Current level.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.stats.level()
    }

    /// Running totals of the current game.
    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Current phase of the game loop.
    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Current fall speed; the driver should tick `let_shape_fall` this often.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Writes `block` into the grid at its own position.
    ///
    /// Intended for setting up puzzles and tests; normal play only fills the
    /// grid by landing shapes.
    pub fn place_block(&mut self, block: Block) {
        self.grid.set(block.column(), block.row(), block);
    }

    fn spawn_shape(&mut self) -> Shape {
        self.factory.create(self.config.spawn_column(), 0)
    }

    /// Returns `true` if every block of `shape` is inside the grid and on an
    /// empty cell.
    #[must_use]
    pub fn fits(&self, shape: &Shape) -> bool {
        shape
            .cells()
            .all(|(column, row)| self.grid.is_vacant(column, row))
    }

    fn expect_falling_shape(&self) -> Shape {
        match self.falling_shape {
            Some(shape) => shape,
            None => panic!("command requires a falling shape (state: {:?})", self.state),
        }
    }

    /// Resets the board and announces a new game.
    ///
    /// Score and level return to their initial values, the grid is emptied,
    /// any falling or next shape is discarded and a fresh next shape is drawn.
    /// The driver follows up with [`Self::new_shape`].
    pub fn begin_game<O>(&mut self, observer: &mut O)
    where
        O: GameObserver + ?Sized,
    {
        self.state = self.state.advance(Transition::Begin);
        self.grid.clear();
        self.falling_shape = None;
        self.next_shape = Some(self.spawn_shape());
        self.stats = GameStats::new(self.config.initial_level);
        self.tick_interval = self.config.tick.interval_for(0);
        info!(
            "game began on a {}x{} grid at level {}",
            self.config.columns,
            self.config.rows,
            self.stats.level()
        );
        observer.game_did_begin(self);
    }

    /// Promotes the next shape to the falling shape and draws a new next shape.
    ///
    /// If the spawn position is already occupied, the game ends instead: the
    /// falling slot stays empty, the would-be shape stays queued as next, and
    /// the observer receives `game_did_end`.
    ///
    /// # Panics
    ///
    /// Panics if a shape is still falling or no game has begun.
    pub fn new_shape<O>(&mut self, observer: &mut O) -> SpawnOutcome
    where
        O: GameObserver + ?Sized,
    {
        let shape = match self.next_shape.take() {
            Some(shape) => shape,
            None => self.spawn_shape(),
        };

        if !self.fits(&shape) {
            self.state = self.state.advance(Transition::TopOut);
            self.next_shape = Some(shape);
            info!(
                "game over with score {} at level {}",
                self.stats.score(),
                self.stats.level()
            );
            observer.game_did_end(self);
            return SpawnOutcome::GameOver;
        }

        self.state = self.state.advance(Transition::Spawn);
        let next = self.spawn_shape();
        self.falling_shape = Some(shape);
        self.next_shape = Some(next);
        debug!("spawned {:?}, next {:?}", shape.kind(), next.kind());
        SpawnOutcome::Spawned {
            falling: shape,
            next,
        }
    }

    /// Replaces the falling shape with `candidate` if it fits, then reports a move.
    fn try_move<O>(&mut self, candidate: Shape, observer: &mut O) -> Result<(), ShapeCollisionError>
    where
        O: GameObserver + ?Sized,
    {
        if !self.fits(&candidate) {
            trace!("rejected {:?} at {:?}", candidate.kind(), candidate.anchor());
            return Err(ShapeCollisionError);
        }
        self.falling_shape = Some(candidate);
        trace!(
            "moved {:?} to {:?} (orientation {})",
            candidate.kind(),
            candidate.anchor(),
            candidate.orientation().index()
        );
        observer.game_shape_did_move(self);
        Ok(())
    }

    /// Rotates the falling shape clockwise unless the result would collide.
    pub fn rotate_shape<O>(&mut self, observer: &mut O) -> Result<(), ShapeCollisionError>
    where
        O: GameObserver + ?Sized,
    {
        let candidate = self.expect_falling_shape().rotated();
        self.try_move(candidate, observer)
    }

    /// Moves the falling shape one column left unless it would collide.
    pub fn move_shape_left<O>(&mut self, observer: &mut O) -> Result<(), ShapeCollisionError>
    where
        O: GameObserver + ?Sized,
    {
        let candidate = self.expect_falling_shape().translated(-1, 0);
        self.try_move(candidate, observer)
    }

    /// Moves the falling shape one column right unless it would collide.
    pub fn move_shape_right<O>(&mut self, observer: &mut O) -> Result<(), ShapeCollisionError>
    where
        O: GameObserver + ?Sized,
    {
        let candidate = self.expect_falling_shape().translated(1, 0);
        self.try_move(candidate, observer)
    }

    /// Moves the falling shape down one row, or lands it.
    ///
    /// Landing writes the shape's blocks into the grid, empties the falling
    /// slot and reports `game_shape_did_land`; the observer is then expected to
    /// remove completed lines and request the next shape.
    pub fn let_shape_fall<O>(&mut self, observer: &mut O) -> FallOutcome
    where
        O: GameObserver + ?Sized,
    {
        let shape = self.expect_falling_shape();
        let candidate = shape.translated(0, 1);
        if self.fits(&candidate) {
            self.falling_shape = Some(candidate);
            observer.game_shape_did_move(self);
            return FallOutcome::Moved;
        }

        self.state = self.state.advance(Transition::Land);
        for block in shape.blocks() {
            self.grid.set(block.column(), block.row(), block);
        }
        self.falling_shape = None;
        self.stats.record_landing();
        debug!(
            "{:?} landed with lowest block on row {}",
            shape.kind(),
            shape.lowest_block_row()
        );
        observer.game_shape_did_land(self);
        FallOutcome::Landed
    }

    /// Moves the falling shape straight down to the lowest row it fits.
    ///
    /// The shape does not land here: the observer receives
    /// `game_shape_did_drop` and the next [`Self::let_shape_fall`] lands it.
    /// Returns the number of rows travelled.
    pub fn drop_shape<O>(&mut self, observer: &mut O) -> usize
    where
        O: GameObserver + ?Sized,
    {
        let mut shape = self.expect_falling_shape();
        let mut rows = 0;
        while self.fits(&shape.translated(0, 1)) {
            shape.translate(0, 1);
            rows += 1;
        }
        self.falling_shape = Some(shape);
        trace!("dropped {:?} by {rows} rows", shape.kind());
        observer.game_shape_did_drop(self);
        rows
    }

    /// Removes every completed row, scores it and lets the rows above settle.
    ///
    /// Reports `game_did_level_up` once for each level gained. An empty result
    /// leaves the engine untouched.
    ///
    /// # Panics
    ///
    /// Panics while a shape is falling.
    pub fn remove_completed_lines<O>(&mut self, observer: &mut O) -> LineClearResult
    where
        O: GameObserver + ?Sized,
    {
        self.state = self.state.advance(Transition::ClearLines);
        let result = collapse_completed_rows(&mut self.grid);
        if result.is_empty() {
            return result;
        }

        let lines = result.lines_removed();
        let points = self.config.score_table.points(lines, self.stats.level());
        self.stats.record_line_clear(lines, points);
        debug!(
            "cleared rows {:?} for {points} points (score {})",
            result.removed_rows,
            self.stats.score()
        );

        while self.stats.level() < self.earned_level() {
            self.stats.level_up();
            let gained = self.stats.level() - self.config.initial_level;
            self.tick_interval = self.config.tick.interval_for(gained);
            info!(
                "level up to {} (tick {:?})",
                self.stats.level(),
                self.tick_interval
            );
            observer.game_did_level_up(self);
        }
        result
    }

    fn earned_level(&self) -> u32 {
        let levels = self.stats.total_cleared_lines() / self.config.lines_per_level;
        self.config
            .initial_level
            .saturating_add(u32::try_from(levels).unwrap_or(u32::MAX))
    }

    /// Empties the grid and returns the blocks it held, in row-major order.
    ///
    /// Used for the game-over sweep.
    pub fn remove_all_blocks(&mut self) -> Vec<Block> {
        let blocks: Vec<Block> = self.grid.iter_occupied().map(|(_, _, &b)| b).collect();
        self.grid.clear();
        debug!("swept {} blocks", blocks.len());
        blocks
    }
}
