use serde::{Deserialize, Serialize};

/// Number of buckets in the line-clear histogram (1 to 4+ lines).
const LINE_CLEAR_BUCKETS: usize = 4;

/// Running totals for one game.
///
/// - **Score**: points earned from line clears
/// - **Level**: starts at the configured initial level and grows with cleared lines
/// - **Landed shapes**: shapes written into the grid
/// - **Line clear distribution**: how many clears removed 1, 2, 3 or 4+ rows
///
/// # Example
///
/// ```
/// use tetrix_engine::GameStats;
///
/// let mut stats = GameStats::new(1);
/// stats.record_landing();
/// stats.record_line_clear(4, 1200);
///
/// assert_eq!(stats.score(), 1200);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter(), &[0, 0, 0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameStats {
    score: u64,
    level: u32,
    landed_shapes: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; LINE_CLEAR_BUCKETS],
}

impl GameStats {
    /// Creates a tracker with all counters at zero and the given starting level.
    #[must_use]
    pub const fn new(initial_level: u32) -> Self {
        Self {
            score: 0,
            level: initial_level,
            landed_shapes: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; LINE_CLEAR_BUCKETS],
        }
    }

    /// Total points earned so far.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Current level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Number of shapes written into the grid.
    #[must_use]
    pub const fn landed_shapes(&self) -> usize {
        self.landed_shapes
    }

    /// Number of rows removed by line clears.
    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of line clears by count.
    ///
    /// - `[0]`: singles
    /// - `[1]`: doubles
    /// - `[2]`: triples
    /// - `[3]`: four lines, plus the rare larger clears
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; LINE_CLEAR_BUCKETS] {
        &self.line_cleared_counter
    }

    /// Counts one landed shape.
    pub fn record_landing(&mut self) {
        self.landed_shapes += 1;
    }

    /// Adds a line clear of `lines` rows worth `points`.
    ///
    /// Empty clears are ignored.
    pub fn record_line_clear(&mut self, lines: usize, points: u64) {
        if lines == 0 {
            return;
        }
        self.total_cleared_lines += lines;
        self.line_cleared_counter[lines.min(LINE_CLEAR_BUCKETS) - 1] += 1;
        self.score = self.score.saturating_add(points);
    }

    /// Advances to the next level.
    pub fn level_up(&mut self) {
        self.level += 1;
    }
}
