//! Hand-tuned placement features.
//!
//! Two fixed feature sets are computed from a [`PlacementAnalysis`]:
//!
//! - [`DellacherieFeatures`] - the six classic Dellacherie measurements
//! - [`ExtendedFeatures`] - the same six plus four features that favor
//!   multi-line clears
//!
//! Every measurement except `landing_height` is taken on the board *after*
//! the placement's rows are cleared. Transition and hole counts reuse the
//! engine's feature extractor so agents and observations agree on edge
//! conventions.
//!
//! # Example
//!
//! ```
//! use tetrust_agents::{board_feature::DellacherieFeatures, placement_analysis::PlacementAnalysis};
//! use tetrust_engine::{Board, Piece, PieceKind, PieceRotation};
//!
//! let flat_o = Piece::new(PieceKind::O, 0, 18, PieceRotation::SPAWN);
//! let analysis = PlacementAnalysis::from_board(&Board::EMPTY, flat_o);
//! let features = DellacherieFeatures::from_analysis(&analysis);
//!
//! assert_eq!(features.landing_height, 1.5);
//! assert_eq!(features.holes, 0.0);
//! ```

use serde::Serialize;
use tetrust_engine::{Board, Piece};

use crate::placement_analysis::PlacementAnalysis;

/// Minimum run of empty cells at the top of a column that counts as a
/// tetris well.
const TETRIS_WELL_DEPTH: usize = 4;

/// Filled cells a row needs to count as nearly complete.
const NEAR_FULL_CELLS: usize = 7;

/// Upper bound for the [`well_quality`] reward.
const WELL_QUALITY_CAP: usize = 10;

const SCATTERED_WELLS_PENALTY: f64 = -5.0;

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct DellacherieFeatures {
    pub landing_height: f64,
    pub eroded_cells: f64,
    pub row_transitions: f64,
    pub col_transitions: f64,
    pub holes: f64,
    pub wells: f64,
}

impl DellacherieFeatures {
    #[must_use]
    pub fn from_analysis(analysis: &PlacementAnalysis) -> Self {
        Self::with_erosion_multiplier(analysis, 1.0)
    }

    fn with_erosion_multiplier(analysis: &PlacementAnalysis, multiplier: f64) -> Self {
        let board = analysis.board();
        Self {
            landing_height: landing_height(analysis.placement()),
            eroded_cells: eroded_cells(analysis.cleared_lines(), multiplier),
            row_transitions: f64::from(tetrust_engine::row_transitions(board)),
            col_transitions: f64::from(tetrust_engine::column_transitions(board)),
            holes: f64::from(tetrust_engine::total_holes(board)),
            wells: f64::from(cumulative_wells(board)),
        }
    }
}

/// Dellacherie features plus tetris-oriented extras.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct ExtendedFeatures {
    #[serde(flatten)]
    pub base: DellacherieFeatures,
    pub tetris_ready: f64,
    pub multi_line_potential: f64,
    pub well_quality: f64,
    pub i_piece_available: f64,
}

impl ExtendedFeatures {
    #[must_use]
    pub fn from_analysis(analysis: &PlacementAnalysis) -> Self {
        let multiplier = multi_clear_multiplier(analysis.cleared_lines());
        let board = analysis.board();
        Self {
            base: DellacherieFeatures::with_erosion_multiplier(analysis, multiplier),
            tetris_ready: tetris_ready(board),
            multi_line_potential: f64::from(multi_line_potential(board)),
            well_quality: well_quality(board),
            i_piece_available: if analysis.i_piece_upcoming() { 1.0 } else { 0.0 },
        }
    }
}

/// Mean height of the landed piece's cells, measured from the floor.
#[must_use]
pub fn landing_height(piece: &Piece) -> f64 {
    let cells = piece.cells();
    let total: i32 = cells.iter().map(|&(_, y)| board_height() - y).sum();
    f64::from(total) / 4.0
}

/// Cleared rows times the four cells of a piece, scaled by `multiplier`.
///
/// This approximates the classic metric; it does not track how many of the
/// cleared cells actually belonged to the piece.
#[must_use]
pub fn eroded_cells(cleared_lines: usize, multiplier: f64) -> f64 {
    if cleared_lines == 0 {
        return 0.0;
    }
    let lines = u32::try_from(cleared_lines).unwrap_or(u32::MAX);
    f64::from(lines * 4) * multiplier
}

/// Bonus applied to eroded cells for simultaneous clears.
#[must_use]
pub fn multi_clear_multiplier(cleared_lines: usize) -> f64 {
    match cleared_lines {
        4 => 3.0,
        3 => 2.0,
        2 => 1.5,
        _ => 1.0,
    }
}

/// Sum of `d * (d + 1) / 2` over one well per column.
///
/// Scanning top-down, the first empty cell flanked by walls or filled cells
/// on both sides starts the column's well; `d` is the run of empty cells from
/// there downwards.
#[must_use]
pub fn cumulative_wells(board: &Board) -> i32 {
    let mut wells = 0;
    for x in 0..board_width() {
        for y in 0..board_height() {
            if board.is_occupied(x, y) || !walled_in(board, x, y) {
                continue;
            }
            let depth = (y..board_height())
                .take_while(|&yy| !board.is_occupied(x, yy))
                .count();
            let depth = i32::try_from(depth).unwrap_or(i32::MAX);
            wells += depth * (depth + 1) / 2;
            break;
        }
    }
    wells
}

/// Best tetris setup on the board.
///
/// For each column whose top has at least four empty rows, the readiness is
/// `depth / 4`, plus 2 for an edge column, plus 3 when the average neighbor
/// height reaches `depth + 3` (a wall counts as a full column). Returns the
/// maximum over columns, or 0.
#[must_use]
pub fn tetris_ready(board: &Board) -> f64 {
    let heights = board.column_heights();
    let neighbor_height = |x: Option<usize>| {
        x.and_then(|x| heights.get(x).copied())
            .unwrap_or(Board::HEIGHT)
    };

    let mut best = 0.0_f64;
    for x in 0..Board::WIDTH {
        let depth = top_empty_run(board, x);
        if depth < TETRIS_WELL_DEPTH {
            continue;
        }
        let depth = to_f64(depth);
        let mut readiness = depth / 4.0;
        if x == 0 || x == Board::WIDTH - 1 {
            readiness += 2.0;
        }
        let left = neighbor_height(x.checked_sub(1));
        let right = neighbor_height(Some(x + 1));
        if to_f64(left + right) / 2.0 >= depth + 3.0 {
            readiness += 3.0;
        }
        best = best.max(readiness);
    }
    best
}

/// Number of rows with at least seven filled cells.
#[must_use]
pub fn multi_line_potential(board: &Board) -> u32 {
    let near_full = board
        .rows()
        .filter(|row| row.iter().filter(|&&cell| cell != 0).count() >= NEAR_FULL_CELLS)
        .count();
    u32::try_from(near_full).unwrap_or(u32::MAX)
}

/// Rewards a single clean, deep well.
///
/// A column qualifies when its top holds at least four empty rows and no
/// filled cell sits anywhere below that run, so in practice only entirely
/// empty columns qualify. One qualifying column scores `min(depth, 10)`,
/// none scores 0, several score -5.
#[must_use]
pub fn well_quality(board: &Board) -> f64 {
    let mut clean_wells = (0..Board::WIDTH).filter_map(|x| {
        let depth = top_empty_run(board, x);
        let clean = board.column_height(x) == 0;
        (depth >= TETRIS_WELL_DEPTH && clean).then_some(depth)
    });

    match (clean_wells.next(), clean_wells.next()) {
        (None, _) => 0.0,
        (Some(depth), None) => to_f64(depth.min(WELL_QUALITY_CAP)),
        (Some(_), Some(_)) => SCATTERED_WELLS_PENALTY,
    }
}

fn walled_in(board: &Board, x: i32, y: i32) -> bool {
    let left = x == 0 || board.is_occupied(x - 1, y);
    let right = x == board_width() - 1 || board.is_occupied(x + 1, y);
    left && right
}

/// Empty cells from the top of column `x` down to the first filled cell.
fn top_empty_run(board: &Board, x: usize) -> usize {
    Board::HEIGHT - board.column_height(x)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn board_width() -> i32 {
    Board::WIDTH as i32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn board_height() -> i32 {
    Board::HEIGHT as i32
}

#[expect(clippy::cast_precision_loss)]
fn to_f64(value: usize) -> f64 {
    value as f64
}

#[cfg(test)]
mod tests {
    use tetrust_engine::{PieceKind, PieceRotation};

    use super::*;

    #[test]
    fn test_landing_height() {
        let cases = [
            ("flat O", Piece::new(PieceKind::O, 0, 18, PieceRotation::SPAWN), 1.5),
            ("flat I", Piece::new(PieceKind::I, 0, 18, PieceRotation::SPAWN), 1.0),
            (
                "vertical I",
                Piece::new(PieceKind::I, 0, 16, PieceRotation::new(1).unwrap()),
                2.5,
            ),
        ];
        for (name, piece, expected) in cases {
            assert_eq!(landing_height(&piece), expected, "{name}");
        }
    }

    #[test]
    fn test_eroded_cells() {
        assert_eq!(eroded_cells(0, 3.0), 0.0);
        assert_eq!(eroded_cells(1, 1.0), 4.0);
        assert_eq!(eroded_cells(4, multi_clear_multiplier(4)), 48.0);
        assert_eq!(eroded_cells(2, multi_clear_multiplier(2)), 12.0);
        assert_eq!(multi_clear_multiplier(1), 1.0);
    }

    #[test]
    fn test_cumulative_wells() {
        let cases = [
            ("empty board", Board::EMPTY, 0),
            (
                "edge well",
                Board::from_ascii(
                    "
                    .#########
                    .#########
                    .#########
                    ",
                ),
                6,
            ),
            (
                "two wells",
                Board::from_ascii(
                    "
                    ##.######.
                    ##.######.
                    ",
                ),
                6,
            ),
            (
                "well stops at a filled cell",
                Board::from_ascii(
                    "
                    #.########
                    #.########
                    ##########
                    ",
                ),
                3,
            ),
        ];
        for (name, board, expected) in cases {
            assert_eq!(cumulative_wells(&board), expected, "{name}");
        }
    }

    #[test]
    fn test_tetris_ready() {
        // every column is a 20-deep shaft; edges get the bonus, the wall
        // alone is not tall enough for the neighbor bonus
        assert_eq!(tetris_ready(&Board::EMPTY), 20.0 / 4.0 + 2.0);

        // column 9 is 17 deep next to a full stack and the wall
        let art = format!("{}{}", "#########.\n".repeat(17), "##########\n".repeat(3));
        let board = Board::from_ascii(&art);
        assert_eq!(tetris_ready(&board), 17.0 / 4.0 + 2.0 + 3.0);

        // three empty rows on top are too shallow
        let shallow = Board::from_ascii(&"##########\n".repeat(17));
        assert_eq!(tetris_ready(&shallow), 0.0);
    }

    #[test]
    fn test_multi_line_potential() {
        let board = Board::from_ascii(
            "
            ######....
            #######...
            #########.
            ",
        );
        assert_eq!(multi_line_potential(&board), 2);
        assert_eq!(multi_line_potential(&Board::EMPTY), 0);
    }

    #[test]
    fn test_well_quality() {
        let cases = [
            ("every column empty", Board::EMPTY, -5.0),
            ("no empty column", Board::from_ascii("##########"), 0.0),
            ("single empty column", Board::from_ascii("#########."), 10.0),
            ("two empty columns", Board::from_ascii("########.."), -5.0),
        ];
        for (name, board, expected) in cases {
            assert_eq!(well_quality(&board), expected, "{name}");
        }
    }

    #[test]
    fn test_extended_features() {
        let board = Board::from_ascii(
            "
            #########.
            #########.
            #########.
            #########.
            ",
        );
        let vertical_i = Piece::new(PieceKind::I, 7, 16, PieceRotation::new(1).unwrap());
        let analysis = PlacementAnalysis::from_board(&board, vertical_i);

        let classic = DellacherieFeatures::from_analysis(&analysis);
        let extended = ExtendedFeatures::from_analysis(&analysis);

        assert_eq!(classic.eroded_cells, 16.0);
        assert_eq!(extended.base.eroded_cells, 48.0);
        assert_eq!(extended.base.landing_height, classic.landing_height);
        assert_eq!(extended.base.holes, 0.0);
        assert_eq!(extended.multi_line_potential, 0.0);
        assert_eq!(extended.i_piece_available, 0.0);
    }

    #[test]
    fn test_extended_features_serialize_flat() {
        let json = serde_json::to_value(ExtendedFeatures::default()).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 10);
        assert!(json.get("landing_height").is_some());
        assert!(json.get("i_piece_available").is_some());
        assert!(json.get("base").is_none());
    }
}
