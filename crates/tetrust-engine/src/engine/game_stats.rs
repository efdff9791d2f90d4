use serde::Serialize;

/// Score values for line clears.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
const SCORE_TABLE: [u32; 5] = [0, 40, 100, 300, 1200];

/// Returns the points for clearing `lines` rows at once.
///
/// The level multiplier is fixed at 1.
#[must_use]
pub fn line_clear_score(lines: usize) -> u32 {
    SCORE_TABLE.get(lines).copied().unwrap_or(0)
}

/// Game statistics tracking score, lines cleared, and piece count.
///
/// # Scoring
///
/// Scoring is simplified compared to guideline Tetris:
/// - No level multiplier (level is reported but never scales points)
/// - No combo or back-to-back bonuses
/// - No T-spin scoring
///
/// # Example
///
/// ```
/// use tetrust_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4); // Tetris (4 lines)
///
/// assert_eq!(stats.score(), 1200);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u32,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Level derived from lines cleared (1 level per 10 lines).
    #[must_use]
    pub const fn level(&self) -> usize {
        self.total_cleared_lines / 10
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of piece locks by lines cleared (`[0]` = no clear,
    /// `[4]` = tetris).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece locks, returning the points earned.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> u32 {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines) {
            *count += 1;
        }
        let points = line_clear_score(cleared_lines);
        self.score += points;
        points
    }
}
