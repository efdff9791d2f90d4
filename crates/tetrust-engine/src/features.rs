//! Board metrics reported with every observation.
//!
//! All metrics are computed from column heights and cell occupancy of a
//! [`Board`]. The wire names (`agg_height`, `bumpiness`, `well_max`, `holes`,
//! `row_trans`, `col_trans`) are part of the observation format.
//!
//! # Edge conventions
//!
//! Transition counts treat the board border as part of the pattern:
//!
//! - rows: an empty cell next to the left or right wall counts as a transition
//! - columns: an occupied top cell counts as a transition, and so does an
//!   empty bottom cell
//!
//! The column rule is intentionally asymmetric and heuristic weights depend
//! on it, so it must not be symmetrized.

use std::{iter, ops::Sub};

use serde::{Deserialize, Serialize};

use crate::Board;

/// Fixed-schema feature vector.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(rename = "agg_height")]
    pub aggregate_height: i32,
    pub bumpiness: i32,
    #[serde(rename = "well_max")]
    pub max_well_depth: i32,
    pub holes: i32,
    #[serde(rename = "row_trans")]
    pub row_transitions: i32,
    #[serde(rename = "col_trans")]
    pub column_transitions: i32,
}

impl FeatureVector {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let heights = column_heights(board);
        Self {
            aggregate_height: heights.iter().sum(),
            bumpiness: bumpiness(&heights),
            max_well_depth: max_well_depth(&heights),
            holes: total_holes(board),
            row_transitions: row_transitions(board),
            column_transitions: column_transitions(board),
        }
    }

    /// Per-field change from `previous` to `self`.
    #[must_use]
    pub fn delta(&self, previous: &Self) -> Self {
        *self - *previous
    }
}

impl Sub for FeatureVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            aggregate_height: self.aggregate_height - rhs.aggregate_height,
            bumpiness: self.bumpiness - rhs.bumpiness,
            max_well_depth: self.max_well_depth - rhs.max_well_depth,
            holes: self.holes - rhs.holes,
            row_transitions: self.row_transitions - rhs.row_transitions,
            column_transitions: self.column_transitions - rhs.column_transitions,
        }
    }
}

fn to_i32(value: usize) -> i32 {
    // board dimensions keep every count far below i32::MAX
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[must_use]
pub fn column_heights(board: &Board) -> [i32; Board::WIDTH] {
    board.column_heights().map(to_i32)
}

/// Sum of `|h[i] - h[i + 1]|` over adjacent columns.
#[must_use]
pub fn bumpiness(heights: &[i32]) -> i32 {
    heights.windows(2).map(|w| (w[0] - w[1]).abs()).sum()
}

/// Deepest column that is strictly lower than its neighbors.
///
/// Edge columns compare against their single neighbor.
#[must_use]
pub fn max_well_depth(heights: &[i32]) -> i32 {
    if heights.len() < 2 {
        return 0;
    }
    let start = [i32::MAX, heights[0], heights[1]];
    let end = [heights[heights.len() - 2], heights[heights.len() - 1], i32::MAX];
    iter::once(&start[..])
        .chain(heights.windows(3))
        .chain(iter::once(&end[..]))
        .map(|w| {
            if w[1] < w[0] && w[1] < w[2] {
                i32::min(w[0], w[2]) - w[1]
            } else {
                0
            }
        })
        .max()
        .unwrap_or(0)
}

#[must_use]
pub fn total_holes(board: &Board) -> i32 {
    board.holes_per_column().into_iter().map(to_i32).sum()
}

#[must_use]
pub fn row_transitions(board: &Board) -> i32 {
    let mut transitions = 0;
    for row in board.rows() {
        let occupied = row.map(|cell| cell != 0);
        transitions += occupied.windows(2).filter(|w| w[0] != w[1]).count();
        transitions += usize::from(!occupied[0]);
        transitions += usize::from(!occupied[Board::WIDTH - 1]);
    }
    to_i32(transitions)
}

#[must_use]
pub fn column_transitions(board: &Board) -> i32 {
    let rows: Vec<_> = board.rows().collect();
    let mut transitions = 0;
    for x in 0..Board::WIDTH {
        let column: Vec<bool> = rows.iter().map(|row| row[x] != 0).collect();
        transitions += column.windows(2).filter(|w| w[0] != w[1]).count();
        transitions += usize::from(column[0]);
        transitions += usize::from(!column[Board::HEIGHT - 1]);
    }
    to_i32(transitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board() {
        let features = FeatureVector::from_board(&Board::EMPTY);
        assert_eq!(features.aggregate_height, 0);
        assert_eq!(features.bumpiness, 0);
        assert_eq!(features.max_well_depth, 0);
        assert_eq!(features.holes, 0);
        // every row: both edge cells empty
        assert_eq!(features.row_transitions, 2 * 20);
        // every column: bottom cell empty
        assert_eq!(features.column_transitions, 10);
    }

    #[test]
    fn test_basic_metrics_on_common_boards() {
        // Format: (name, board, agg_height, bumpiness, well_max, holes)
        let test_cases = vec![
            (
                "flat",
                Board::from_ascii(
                    "
                    ##########
                    ##########
                    ",
                ),
                20,
                0,
                0,
                0,
            ),
            (
                "staircase",
                Board::from_ascii(
                    "
                    #.........
                    ##........
                    ###.......
                    ####......
                    #####.....
                    ",
                ),
                15,
                5,
                0,
                0,
            ),
            (
                "single_hole",
                Board::from_ascii(
                    "
                    #.........
                    ..........
                    #.........
                    ",
                ),
                3,
                3,
                0,
                1,
            ),
            (
                "well",
                Board::from_ascii(
                    "
                    #.#.......
                    ###.......
                    ###.......
                    ",
                ),
                8,
                5,
                1,
                0,
            ),
        ];

        for (name, board, agg_height, bumpiness, well_max, holes) in test_cases {
            let features = FeatureVector::from_board(&board);
            assert_eq!(features.aggregate_height, agg_height, "{name}: agg_height");
            assert_eq!(features.bumpiness, bumpiness, "{name}: bumpiness");
            assert_eq!(features.max_well_depth, well_max, "{name}: well_max");
            assert_eq!(features.holes, holes, "{name}: holes");
        }
    }

    #[test]
    fn test_well_depth_at_edges() {
        assert_eq!(max_well_depth(&[0, 4, 4, 4, 4, 4, 4, 4, 4, 4]), 4);
        assert_eq!(max_well_depth(&[3, 3, 3, 3, 3, 3, 3, 3, 3, 1]), 2);
        assert_eq!(max_well_depth(&[4, 5, 1, 3, 3, 3, 3, 3, 3, 3]), 2);
        assert_eq!(max_well_depth(&[3; 10]), 0);
    }

    #[test]
    fn test_row_transitions() {
        let board = Board::from_ascii("#.#.#.#.#.");
        // 9 interior mismatches + empty right edge on the bottom row,
        // plus 2 per empty row above
        assert_eq!(row_transitions(&board), 10 + 2 * 19);

        let full = Board::from_ascii("##########");
        assert_eq!(row_transitions(&full), 2 * 19);
    }

    #[test]
    fn test_column_transitions_edge_asymmetry() {
        // top-row cell occupied: counted at the top edge and again where it meets
        // the empty cell below; the empty bottom cell adds one more
        let mut cells = vec![0; Board::CELL_COUNT];
        cells[0] = 1;
        let board = Board::from_cells(&cells).unwrap();
        assert_eq!(column_transitions(&board), 3 + 9);

        // filled bottom row: no bottom-edge transition in any column,
        // one empty/filled mismatch per column
        let floor = Board::from_ascii("##########");
        assert_eq!(column_transitions(&floor), 10);
    }

    #[test]
    fn test_delta_is_new_minus_old() {
        let before = FeatureVector::from_board(&Board::EMPTY);
        let after = FeatureVector::from_board(&Board::from_ascii("####......"));
        let delta = after.delta(&before);
        assert_eq!(delta.aggregate_height, 4);
        assert_eq!(delta.bumpiness, 1);
        // the bottom row keeps one empty edge and gains one interior mismatch
        assert_eq!(delta.row_transitions, 0);
        assert_eq!(delta.holes, 0);
    }

    #[test]
    fn test_serialization_uses_wire_names() {
        let json = serde_json::to_value(FeatureVector::default()).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            ["agg_height", "bumpiness", "col_trans", "holes", "row_trans", "well_max"]
        );
    }
}
