//! What-if simulation of a single legal move.
//!
//! [`PlacementAnalysis`] captures everything the evaluators need about one
//! candidate placement:
//!
//! 1. **Landed piece** - the piece at its resting position, before any clear
//! 2. **Line clears** - how many rows the placement completes
//! 3. **Resulting board** - a private copy with the piece locked and rows cleared
//! 4. **Look-ahead** - whether an I piece is visible in the next queue
//!
//! The observation's board is cloned; the live engine board is never touched.
//!
//! # Usage
//!
//! ```
//! use tetrust_agents::placement_analysis::PlacementAnalysis;
//! use tetrust_engine::{EngineConfig, GameEngine};
//!
//! let mut engine = GameEngine::new(EngineConfig::default());
//! let observation = engine.reset(Some(1));
//! let mv = &observation.legal_moves[0];
//!
//! let analysis = PlacementAnalysis::from_observation(&observation, mv).unwrap();
//! assert_eq!(analysis.cleared_lines(), 0);
//! assert_eq!(analysis.board().cells().iter().filter(|c| **c != 0).count(), 4);
//! ```

use tetrust_engine::{Board, LegalMove, Observation, Piece, PieceKind, PieceRotation};

#[derive(Debug, Clone)]
pub struct PlacementAnalysis {
    placement: Piece,
    cleared_lines: usize,
    board: Board,
    i_piece_upcoming: bool,
}

impl PlacementAnalysis {
    /// Locks `placement` on a copy of `before_placement` and clears full rows.
    #[must_use]
    pub fn from_board(before_placement: &Board, placement: Piece) -> Self {
        let mut board = before_placement.clone();
        board.lock_piece(&placement);
        let cleared_lines = board.clear_lines();

        Self {
            placement,
            cleared_lines,
            board,
            i_piece_upcoming: false,
        }
    }

    /// Simulates `mv` for the piece it refers to: the held type when
    /// `use_hold` is set, otherwise the active piece.
    ///
    /// Returns `None` for a hold move when nothing is held or for a rotation
    /// outside `0..=3`.
    #[must_use]
    pub fn from_observation(observation: &Observation, mv: &LegalMove) -> Option<Self> {
        let kind = if mv.use_hold {
            observation.hold_type()?
        } else {
            observation.current_piece().kind()
        };
        let rotation = PieceRotation::new(mv.rot)?;
        let placement = Piece::new(kind, mv.x, mv.landing_y, rotation);

        let mut analysis = Self::from_board(observation.board(), placement);
        analysis.i_piece_upcoming = observation.next_queue.contains(&PieceKind::I);
        Some(analysis)
    }

    /// The landed piece, before any line clear.
    #[must_use]
    pub fn placement(&self) -> &Piece {
        &self.placement
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Board after locking and clearing.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn i_piece_upcoming(&self) -> bool {
        self.i_piece_upcoming
    }
}
