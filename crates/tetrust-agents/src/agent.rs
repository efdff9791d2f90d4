//! The capability every player implements.
//!
//! A driver (see [`Runner`](crate::runner::Runner)) calls the hooks in this
//! order for each episode:
//!
//! ```text
//! on_episode_start(seed)
//! loop { select_action(&observation) -> step_placement -> on_step_result(&result) }
//! on_episode_end(score, lines, pieces)
//! ```
//!
//! The default hook implementations keep lifetime totals in [`AgentStats`];
//! agents only need to expose them through [`Agent::stats_mut`].

use serde::Serialize;
use tetrust_engine::{Observation, Placement, StepResult};

pub trait Agent {
    /// Human-readable name, also used as a key when comparing agents.
    fn name(&self) -> &str;

    /// Picks a placement for the current turn.
    ///
    /// Must not touch engine state; what-if simulation works on board clones.
    fn select_action(&mut self, observation: &Observation) -> Placement;

    fn stats(&self) -> &AgentStats;

    fn stats_mut(&mut self) -> &mut AgentStats;

    fn on_episode_start(&mut self, _seed: u64) {
        self.stats_mut().episodes += 1;
    }

    fn on_step_result(&mut self, _result: &StepResult) {}

    fn on_episode_end(&mut self, score: u32, lines: usize, pieces: usize) {
        let stats = self.stats_mut();
        stats.total_score += u64::from(score);
        stats.total_lines += lines;
        stats.total_pieces += pieces;
    }

    fn reset_stats(&mut self) {
        *self.stats_mut() = AgentStats::default();
    }
}

/// Lifetime totals across every episode an agent has played.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgentStats {
    pub episodes: usize,
    pub total_score: u64,
    pub total_lines: usize,
    pub total_pieces: usize,
}

impl AgentStats {
    #[must_use]
    pub fn avg_score(&self) -> f64 {
        average(self.total_score, self.episodes)
    }

    #[must_use]
    pub fn avg_lines(&self) -> f64 {
        average(self.total_lines as u64, self.episodes)
    }

    #[must_use]
    pub fn avg_pieces(&self) -> f64 {
        average(self.total_pieces as u64, self.episodes)
    }
}

#[expect(clippy::cast_precision_loss)]
fn average(total: u64, episodes: usize) -> f64 {
    total as f64 / episodes.max(1) as f64
}

/// Placement returned when the legal-move set is empty.
///
/// The engine answers it with a top-out, which ends the episode.
pub const FALLBACK_PLACEMENT: Placement = Placement::new(0, 0, false);
