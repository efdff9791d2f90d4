//! Turn evaluation: selecting the best legal move for the current turn.
//!
//! The [`TurnEvaluator`] simulates every legal move in an observation (both
//! the active piece and, when offered, the held piece), scores each with a
//! [`PlacementEvaluator`] and returns the highest-scoring one.
//!
//! The search is a greedy one-step lookahead: only the immediate placement is
//! considered, never the pieces after it.
//!
//! # Usage
//!
//! ```
//! use tetrust_agents::{
//!     placement_evaluator::DellacherieEvaluator, turn_evaluator::TurnEvaluator,
//! };
//! use tetrust_engine::{EngineConfig, GameEngine};
//!
//! let turn_evaluator = TurnEvaluator::new(Box::new(DellacherieEvaluator::default()));
//!
//! let mut engine = GameEngine::new(EngineConfig::default());
//! let observation = engine.reset(Some(7));
//! let best = turn_evaluator.select_best_move(&observation).unwrap();
//! assert!(observation.legal_moves.contains(&best));
//! ```

use tetrust_engine::{LegalMove, Observation};

use crate::{placement_analysis::PlacementAnalysis, placement_evaluator::PlacementEvaluator};

/// Scores every legal move and picks the best one.
#[derive(Debug)]
pub struct TurnEvaluator<'a> {
    placement_evaluator: Box<dyn PlacementEvaluator + 'a>,
}

impl<'a> TurnEvaluator<'a> {
    #[must_use]
    pub fn new(placement_evaluator: Box<dyn PlacementEvaluator + 'a>) -> Self {
        Self {
            placement_evaluator,
        }
    }

    /// Returns the legal move with the highest score.
    ///
    /// Ties keep the move that comes first in `observation.legal_moves`.
    /// Returns `None` when there are no legal moves.
    #[must_use]
    pub fn select_best_move(&self, observation: &Observation) -> Option<LegalMove> {
        self.select_best(observation).map(|(mv, _analysis)| mv)
    }

    /// Like [`select_best_move`](Self::select_best_move), also returning the
    /// simulated outcome of the chosen move.
    #[must_use]
    pub fn select_best(&self, observation: &Observation) -> Option<(LegalMove, PlacementAnalysis)> {
        let mut best_score = f64::NEG_INFINITY;
        let mut best_result = None;

        for mv in &observation.legal_moves {
            let Some(analysis) = PlacementAnalysis::from_observation(observation, mv) else {
                continue;
            };
            let score = self.placement_evaluator.evaluate_placement(&analysis);
            if best_result.is_none() || score > best_score {
                best_score = score;
                best_result = Some((*mv, analysis));
            }
        }

        best_result
    }
}
