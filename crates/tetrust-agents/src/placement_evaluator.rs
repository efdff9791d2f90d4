//! Placement evaluation: scoring a single candidate placement.
//!
//! A placement is scored as a linear combination of hand-tuned features:
//!
//! ```text
//! score = w₁·f₁ + w₂·f₂ + ... + wₙ·fₙ
//! ```
//!
//! Both evaluators here use fixed weight tables; the features are raw
//! (unnormalized) measurements from [`board_feature`](crate::board_feature).
//!
//! # Usage
//!
//! ```
//! use tetrust_agents::{
//!     placement_analysis::PlacementAnalysis,
//!     placement_evaluator::{DellacherieEvaluator, PlacementEvaluator},
//! };
//! use tetrust_engine::{Board, Piece, PieceKind, PieceRotation};
//!
//! let evaluator = DellacherieEvaluator::default();
//! let low = PlacementAnalysis::from_board(
//!     &Board::EMPTY,
//!     Piece::new(PieceKind::I, 3, 18, PieceRotation::SPAWN),
//! );
//! let high = PlacementAnalysis::from_board(
//!     &Board::EMPTY,
//!     Piece::new(PieceKind::I, 3, 0, PieceRotation::SPAWN),
//! );
//! assert!(evaluator.evaluate_placement(&low) > evaluator.evaluate_placement(&high));
//! ```

use std::fmt;

use serde::Serialize;

use crate::{
    board_feature::{DellacherieFeatures, ExtendedFeatures},
    placement_analysis::PlacementAnalysis,
};

/// Evaluates piece placements by assigning scores (higher is better).
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DellacherieWeights {
    pub landing_height: f64,
    pub eroded_cells: f64,
    pub row_transitions: f64,
    pub col_transitions: f64,
    pub holes: f64,
    pub wells: f64,
}

impl DellacherieWeights {
    /// Pierre Dellacherie's published weights.
    pub const DEFAULT: Self = Self {
        landing_height: -4.500_158_825_082_766,
        eroded_cells: 3.418_126_810_139_269_4,
        row_transitions: -3.217_888_286_848_775_3,
        col_transitions: -9.348_695_305_445_199,
        holes: -7.899_265_427_351_652,
        wells: -3.385_597_224_726_362_6,
    };

    #[must_use]
    pub fn dot(&self, features: &DellacherieFeatures) -> f64 {
        self.landing_height * features.landing_height
            + self.eroded_cells * features.eroded_cells
            + self.row_transitions * features.row_transitions
            + self.col_transitions * features.col_transitions
            + self.holes * features.holes
            + self.wells * features.wells
    }
}

impl Default for DellacherieWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Weights for [`ExtendedFeatures`]; tuned to tolerate taller stacks in
/// exchange for multi-line clears.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtendedWeights {
    #[serde(flatten)]
    pub base: DellacherieWeights,
    pub tetris_ready: f64,
    pub multi_line_potential: f64,
    pub well_quality: f64,
    pub i_piece_available: f64,
}

impl ExtendedWeights {
    pub const DEFAULT: Self = Self {
        base: DellacherieWeights {
            landing_height: -3.5,
            eroded_cells: 5.0,
            row_transitions: -2.5,
            col_transitions: -8.0,
            holes: -10.0,
            wells: -1.0,
        },
        tetris_ready: 8.0,
        multi_line_potential: 3.0,
        well_quality: 5.0,
        i_piece_available: 2.0,
    };

    #[must_use]
    pub fn dot(&self, features: &ExtendedFeatures) -> f64 {
        self.base.dot(&features.base)
            + self.tetris_ready * features.tetris_ready
            + self.multi_line_potential * features.multi_line_potential
            + self.well_quality * features.well_quality
            + self.i_piece_available * features.i_piece_available
    }
}

impl Default for ExtendedWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Default, Clone)]
pub struct DellacherieEvaluator {
    weights: DellacherieWeights,
}

impl DellacherieEvaluator {
    #[must_use]
    pub fn new(weights: DellacherieWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &DellacherieWeights {
        &self.weights
    }
}

impl PlacementEvaluator for DellacherieEvaluator {
    #[inline]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f64 {
        self.weights.dot(&DellacherieFeatures::from_analysis(analysis))
    }
}

#[derive(Debug, Default, Clone)]
pub struct ExtendedEvaluator {
    weights: ExtendedWeights,
}

impl ExtendedEvaluator {
    #[must_use]
    pub fn new(weights: ExtendedWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &ExtendedWeights {
        &self.weights
    }
}

impl PlacementEvaluator for ExtendedEvaluator {
    #[inline]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f64 {
        self.weights.dot(&ExtendedFeatures::from_analysis(analysis))
    }
}

#[cfg(test)]
mod tests {
    use tetrust_engine::{Board, Piece, PieceKind, PieceRotation};

    use super::*;

    fn analysis_of(board: &Board, piece: Piece) -> PlacementAnalysis {
        PlacementAnalysis::from_board(board, piece)
    }

    #[test]
    fn test_dot_product() {
        let features = DellacherieFeatures {
            landing_height: 1.0,
            eroded_cells: 2.0,
            row_transitions: 0.0,
            col_transitions: 0.0,
            holes: 1.0,
            wells: 0.0,
        };
        let weights = DellacherieWeights {
            landing_height: -1.0,
            eroded_cells: 3.0,
            row_transitions: 100.0,
            col_transitions: 100.0,
            holes: -2.0,
            wells: 100.0,
        };
        assert_eq!(weights.dot(&features), -1.0 + 6.0 - 2.0);
    }

    #[test]
    fn test_evaluator_matches_features() {
        let analysis = analysis_of(
            &Board::EMPTY,
            Piece::new(PieceKind::T, 4, 18, PieceRotation::SPAWN),
        );
        let evaluator = DellacherieEvaluator::default();
        let expected =
            DellacherieWeights::DEFAULT.dot(&DellacherieFeatures::from_analysis(&analysis));
        assert_eq!(evaluator.evaluate_placement(&analysis), expected);

        let extended = ExtendedEvaluator::default();
        let expected = ExtendedWeights::DEFAULT.dot(&ExtendedFeatures::from_analysis(&analysis));
        assert_eq!(extended.evaluate_placement(&analysis), expected);
    }

    #[test]
    fn test_prefers_filling_the_gap() {
        let board = Board::from_ascii(
            "
            #########.
            #########.
            #########.
            #########.
            ",
        );
        let vertical_i = PieceRotation::new(1).unwrap();
        let into_gap = analysis_of(&board, Piece::new(PieceKind::I, 7, 16, vertical_i));
        let on_top = analysis_of(&board, Piece::new(PieceKind::I, 2, 12, vertical_i));

        for evaluator in [
            &DellacherieEvaluator::default() as &dyn PlacementEvaluator,
            &ExtendedEvaluator::default(),
        ] {
            assert!(
                evaluator.evaluate_placement(&into_gap) > evaluator.evaluate_placement(&on_top),
                "{evaluator:?}"
            );
        }
    }

    #[test]
    fn test_weight_tables() {
        assert_eq!(DellacherieWeights::default().holes, -7.899_265_427_351_652);
        assert_eq!(ExtendedWeights::default().base.holes, -10.0);
        assert_eq!(ExtendedWeights::default().tetris_ready, 8.0);
    }
}
