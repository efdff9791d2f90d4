use tetrust_engine::{LegalMove, Observation, Placement};

use crate::{
    agent::{Agent, AgentStats, FALLBACK_PLACEMENT},
    placement_evaluator::{DellacherieEvaluator, ExtendedEvaluator, PlacementEvaluator},
    turn_evaluator::TurnEvaluator,
};

/// Greedy player that plays the best-scoring legal move each turn.
///
/// # Example
///
/// ```
/// use tetrust_agents::{Agent as _, HeuristicAgent};
/// use tetrust_engine::{EngineConfig, GameEngine};
///
/// let mut agent = HeuristicAgent::dellacherie();
/// let mut engine = GameEngine::new(EngineConfig::default());
/// let observation = engine.reset(Some(0));
///
/// let placement = agent.select_action(&observation);
/// let result = engine.step_placement(placement);
/// assert!(result.info.error.is_none());
/// ```
#[derive(Debug)]
pub struct HeuristicAgent {
    name: String,
    turn_evaluator: TurnEvaluator<'static>,
    stats: AgentStats,
}

impl HeuristicAgent {
    #[must_use]
    pub fn new<E>(name: impl Into<String>, evaluator: E) -> Self
    where
        E: PlacementEvaluator + 'static,
    {
        Self {
            name: name.into(),
            turn_evaluator: TurnEvaluator::new(Box::new(evaluator)),
            stats: AgentStats::default(),
        }
    }

    /// Classic six-feature Dellacherie player.
    #[must_use]
    pub fn dellacherie() -> Self {
        Self::new("Dellacherie", DellacherieEvaluator::default())
    }

    /// Dellacherie variant that favors building for multi-line clears.
    #[must_use]
    pub fn extended() -> Self {
        Self::new("Extended", ExtendedEvaluator::default())
    }
}

impl Agent for HeuristicAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_action(&mut self, observation: &Observation) -> Placement {
        self.turn_evaluator
            .select_best_move(observation)
            .as_ref()
            .map_or(FALLBACK_PLACEMENT, LegalMove::placement)
    }

    fn stats(&self) -> &AgentStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut AgentStats {
        &mut self.stats
    }
}

#[cfg(test)]
mod tests {
    use tetrust_engine::{Board, EngineConfig, Event, GameEngine};

    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(HeuristicAgent::dellacherie().name(), "Dellacherie");
        assert_eq!(HeuristicAgent::extended().name(), "Extended");
    }

    #[test]
    fn test_empty_legal_set_falls_back() {
        let mut observation = GameEngine::new(EngineConfig::default()).reset(Some(1));
        observation.legal_moves.clear();
        for mut agent in [HeuristicAgent::dellacherie(), HeuristicAgent::extended()] {
            assert_eq!(agent.select_action(&observation), FALLBACK_PLACEMENT);
        }
    }

    #[test]
    fn test_choice_does_not_touch_observation() {
        let observation = GameEngine::new(EngineConfig::default()).reset(Some(4));
        let before = observation.clone();
        let mut agent = HeuristicAgent::extended();
        let _ = agent.select_action(&observation);
        assert_eq!(observation, before);
        assert_eq!(observation.board(), &Board::EMPTY);
    }

    #[test]
    fn test_survives_and_clears_lines() {
        for seed in [0, 1, 2, 5, 21] {
            let mut engine = GameEngine::new(EngineConfig::default());
            let mut observation = engine.reset(Some(seed));
            let mut agent = HeuristicAgent::dellacherie();
            let mut lines = 0;

            for _ in 0..60 {
                let result = engine.step_placement(agent.select_action(&observation));
                assert!(result.info.error.is_none(), "seed {seed}");
                assert!(!result.info.has_event(Event::TopOut), "seed {seed}");
                lines += result.info.lines_cleared;
                observation = result.observation;
            }

            assert!(lines >= 10, "seed {seed}: {lines} lines");
        }
    }
}
