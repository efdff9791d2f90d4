use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;
use tetrust_engine::{LegalMove, Observation, Placement};

use crate::agent::{Agent, AgentStats, FALLBACK_PLACEMENT};

/// Baseline player: a uniformly random legal move each turn.
///
/// The agent owns its generator, so its choices never interfere with the
/// engine's piece stream.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    seed: u64,
    rng: Pcg32,
    stats: AgentStats,
}

impl RandomAgent {
    /// Creates an agent; without a seed one is drawn from the thread RNG.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            stats: AgentStats::default(),
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn select_action(&mut self, observation: &Observation) -> Placement {
        observation
            .legal_moves
            .choose(&mut self.rng)
            .map_or(FALLBACK_PLACEMENT, LegalMove::placement)
    }

    fn stats(&self) -> &AgentStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut AgentStats {
        &mut self.stats
    }
}
