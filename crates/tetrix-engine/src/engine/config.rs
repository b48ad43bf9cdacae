use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, engine::shape_factory::Randomizer};

/// Tunable constants of the board engine.
///
/// Every field has a default, so a JSON file only needs to list the values it
/// overrides:
///
/// ```
/// use tetrix_engine::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "lines_per_level": 5 }"#).unwrap();
/// assert_eq!(config.lines_per_level, 5);
/// assert_eq!(config.columns, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub columns: usize,
    pub rows: usize,
    /// Level assigned by `begin_game`; at least 1, since it multiplies every award.
    pub initial_level: u32,
    /// Total cleared lines needed for each level-up.
    pub lines_per_level: usize,
    pub tick: TickConfig,
    pub score_table: ScoreTable,
    pub randomizer: Randomizer,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            rows: 20,
            initial_level: 1,
            lines_per_level: 10,
            tick: TickConfig::default(),
            score_table: ScoreTable::default(),
            randomizer: Randomizer::default(),
        }
    }
}

impl EngineConfig {
    /// Narrowest grid every shape can spawn into: the horizontal I spans four columns.
    pub const MIN_COLUMNS: usize = 4;
    /// Shortest grid every shape can spawn into: the vertical I spans four rows.
    pub const MIN_ROWS: usize = 4;

    /// Checks that the engine can run a game with this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.columns < Self::MIN_COLUMNS || self.rows < Self::MIN_ROWS {
            return Err(ConfigError::GridTooSmall {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if i32::try_from(self.columns).is_err() || i32::try_from(self.rows).is_err() {
            return Err(ConfigError::GridTooLarge);
        }
        if self.initial_level == 0 {
            return Err(ConfigError::ZeroInitialLevel);
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        self.score_table.validate()?;
        self.tick.validate()
    }

    /// Column of the anchor of a freshly spawned shape (top-center).
    #[must_use]
    pub fn spawn_column(&self) -> i32 {
        i32::try_from((self.columns - 1) / 2).unwrap_or(0)
    }
}

/// Fall speed policy.
///
/// The tick interval starts at `initial_millis`, shrinks by `decrement_millis`
/// per level gained, and never drops below `floor_millis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TickConfig {
    pub initial_millis: u64,
    pub decrement_millis: u64,
    pub floor_millis: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            initial_millis: 600,
            decrement_millis: 100,
            floor_millis: 100,
        }
    }
}

impl TickConfig {
    fn validate(self) -> Result<(), ConfigError> {
        if self.floor_millis == 0 || self.floor_millis > self.initial_millis {
            return Err(ConfigError::InvalidTickFloor {
                floor_millis: self.floor_millis,
                initial_millis: self.initial_millis,
            });
        }
        Ok(())
    }

    /// Tick interval after gaining `levels_gained` levels since the game began.
    #[must_use]
    pub fn interval_for(&self, levels_gained: u32) -> Duration {
        let reduction = self
            .decrement_millis
            .saturating_mul(u64::from(levels_gained));
        let millis = self
            .initial_millis
            .saturating_sub(reduction)
            .max(self.floor_millis);
        Duration::from_millis(millis)
    }
}

/// Points awarded per simultaneous line clear, before the level multiplier.
///
/// Index `n` holds the base points for clearing `n` lines at once; index 0 is
/// normally zero. Clears larger than the table extend it linearly using the
/// last step, which keeps the award monotonic in the line count.
///
/// # Example
///
/// ```
/// use tetrix_engine::ScoreTable;
///
/// let table = ScoreTable::default();
/// assert_eq!(table.points(1, 1), 40);
/// assert_eq!(table.points(4, 2), 2400);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ScoreTable(Vec<u64>);

impl Default for ScoreTable {
    fn default() -> Self {
        Self(vec![0, 40, 100, 300, 1200])
    }
}

impl ScoreTable {
    /// Creates a table from per-line-count points.
    ///
    /// The table needs entries for zero and one line and must not decrease.
    pub fn new(points: Vec<u64>) -> Result<Self, ConfigError> {
        let table = Self(points);
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.0.len() < 2 {
            return Err(ConfigError::ScoreTableTooShort);
        }
        if self.0.windows(2).any(|w| w[0] > w[1]) {
            return Err(ConfigError::ScoreTableNotMonotonic);
        }
        Ok(())
    }

    /// Points for clearing `lines` rows at once on `level`.
    #[must_use]
    pub fn points(&self, lines: usize, level: u32) -> u64 {
        let base = match (self.0.get(lines), self.0.as_slice()) {
            (Some(&points), _) => points,
            (None, []) => 0,
            (None, [last]) => *last,
            (None, [.., prev, last]) => {
                let step = last.saturating_sub(*prev);
                let extra = u64::try_from(lines + 1 - self.0.len()).unwrap_or(u64::MAX);
                last.saturating_add(step.saturating_mul(extra))
            }
        };
        base.saturating_mul(u64::from(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.spawn_column(), 4);
    }

    #[test]
    fn test_spawn_column_is_centered() {
        let config = EngineConfig {
            columns: 7,
            ..EngineConfig::default()
        };
        assert_eq!(config.spawn_column(), 3);
    }

    #[test]
    fn test_invalid_configs() {
        let base = EngineConfig::default();
        let cases = [
            (
                EngineConfig {
                    columns: 0,
                    ..base.clone()
                },
                ConfigError::EmptyGrid,
            ),
            (
                EngineConfig {
                    rows: 3,
                    ..base.clone()
                },
                ConfigError::GridTooSmall {
                    columns: 10,
                    rows: 3,
                },
            ),
            (
                EngineConfig {
                    initial_level: 0,
                    ..base.clone()
                },
                ConfigError::ZeroInitialLevel,
            ),
            (
                EngineConfig {
                    lines_per_level: 0,
                    ..base.clone()
                },
                ConfigError::ZeroLinesPerLevel,
            ),
            (
                EngineConfig {
                    score_table: ScoreTable(vec![0]),
                    ..base.clone()
                },
                ConfigError::ScoreTableTooShort,
            ),
            (
                EngineConfig {
                    score_table: ScoreTable(vec![0, 100, 50]),
                    ..base.clone()
                },
                ConfigError::ScoreTableNotMonotonic,
            ),
            (
                EngineConfig {
                    tick: TickConfig {
                        initial_millis: 100,
                        decrement_millis: 10,
                        floor_millis: 200,
                    },
                    ..base.clone()
                },
                ConfigError::InvalidTickFloor {
                    floor_millis: 200,
                    initial_millis: 100,
                },
            ),
        ];
        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn test_tick_interval_decreases_to_floor() {
        let tick = TickConfig::default();
        assert_eq!(tick.interval_for(0), Duration::from_millis(600));
        assert_eq!(tick.interval_for(1), Duration::from_millis(500));
        assert_eq!(tick.interval_for(5), Duration::from_millis(100));
        assert_eq!(tick.interval_for(50), Duration::from_millis(100));
        assert_eq!(tick.interval_for(u32::MAX), Duration::from_millis(100));
    }

    #[test]
    fn test_score_table_is_monotonic() {
        let table = ScoreTable::default();
        for level in 1..5 {
            for lines in 1..8 {
                assert!(table.points(lines, level) > table.points(lines - 1, level));
                assert!(table.points(lines, level + 1) > table.points(lines, level));
            }
        }
    }

    #[test]
    fn test_score_table_extrapolates() {
        let table = ScoreTable::default();
        assert_eq!(table.points(5, 1), 2100);
        assert_eq!(table.points(6, 1), 3000);
    }

    #[test]
    fn test_score_table_new_validates() {
        assert_eq!(ScoreTable::new(vec![]), Err(ConfigError::ScoreTableTooShort));
        assert_eq!(ScoreTable::new(vec![7]), Err(ConfigError::ScoreTableTooShort));
        assert_eq!(
            ScoreTable::new(vec![0, 5, 4]),
            Err(ConfigError::ScoreTableNotMonotonic)
        );
        let table = ScoreTable::new(vec![0, 10, 30]).unwrap();
        assert_eq!(table.points(3, 2), 100);
    }

    #[test]
    fn test_short_deserialized_table_does_not_panic() {
        let table: ScoreTable = serde_json::from_str("[7]").unwrap();
        assert_eq!(table.points(3, 1), 7);
        let table: ScoreTable = serde_json::from_str("[]").unwrap();
        assert_eq!(table.points(1, 1), 0);
    }

    #[test]
    fn test_zero_initial_level_is_rejected_from_json() {
        let config: EngineConfig = serde_json::from_str(r#"{ "initial_level": 0 }"#).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::ZeroInitialLevel));
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = EngineConfig {
            columns: 12,
            randomizer: Randomizer::SevenBag,
            ..EngineConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "tick": { "floor_millis": 50 }, "score_table": [0, 1, 3] }"#)
                .unwrap();
        assert_eq!(config.tick.initial_millis, 600);
        assert_eq!(config.tick.floor_millis, 50);
        assert_eq!(config.score_table, ScoreTable::new(vec![0, 1, 3]).unwrap());
        assert_eq!(config.rows, 20);
    }
}
