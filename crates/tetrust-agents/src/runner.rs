//! Episode and benchmark driver.
//!
//! The [`Runner`] owns nothing but configuration: each episode builds a fresh
//! [`GameEngine`], so repeated runs with the same seed replay the same piece
//! sequence and agents can be compared head-to-head.
//!
//! # Example
//!
//! ```
//! use tetrust_agents::{Agent, HeuristicAgent, RandomAgent, Runner, RunnerConfig};
//!
//! let runner = Runner::new(RunnerConfig::default().with_max_pieces(Some(20)));
//! let mut random = RandomAgent::new(Some(0));
//! let mut dellacherie = HeuristicAgent::dellacherie();
//!
//! let results = runner
//!     .compare_agents(&mut [&mut random as &mut dyn Agent, &mut dellacherie], 2, None)
//!     .unwrap();
//! assert_eq!(results[0].0, "Random");
//! assert_eq!(results[1].1.episodes.len(), 2);
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tetrust_engine::{EngineConfig, GameEngine};
use tetrust_stats::descriptive::DescriptiveStats;
use tracing::{debug, info};

use crate::agent::Agent;

#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
pub enum BenchmarkError {
    #[display("need {needed} seeds, got {given}")]
    NotEnoughSeeds { needed: usize, given: usize },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub engine: EngineConfig,
    /// Placement limit per episode; `None` plays until top-out.
    pub max_pieces: Option<usize>,
}

impl RunnerConfig {
    #[must_use]
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    #[must_use]
    pub fn with_max_pieces(mut self, max_pieces: Option<usize>) -> Self {
        self.max_pieces = max_pieces;
        self
    }
}

/// Outcome of one episode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeStats {
    pub seed: u64,
    pub score: u32,
    pub lines_cleared: usize,
    /// Placement calls made, including a final one that topped out.
    pub pieces_placed: usize,
    pub ticks: u64,
    pub duration: Duration,
    /// Flat row-major board cells at the end of the episode.
    pub final_board: Vec<u8>,
    pub max_height: usize,
    pub total_holes: i32,
    pub top_out: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResults {
    pub agent_name: String,
    pub num_episodes: usize,
    pub episodes: Vec<EpisodeStats>,
}

impl BenchmarkResults {
    /// Aggregates the episodes; `None` when there are none.
    #[must_use]
    pub fn summary(&self) -> Option<BenchmarkSummary> {
        let stats_of =
            |f: fn(&EpisodeStats) -> f64| DescriptiveStats::new(self.episodes.iter().map(f));
        Some(BenchmarkSummary {
            agent_name: self.agent_name.clone(),
            num_episodes: self.num_episodes,
            score: stats_of(|e| f64::from(e.score))?,
            lines: stats_of(|e| to_f64(e.lines_cleared))?,
            pieces: stats_of(|e| to_f64(e.pieces_placed))?,
            duration_secs: stats_of(|e| e.duration.as_secs_f64())?,
        })
    }
}

/// Per-benchmark aggregates over score, lines, pieces and wall time.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSummary {
    pub agent_name: String,
    pub num_episodes: usize,
    pub score: DescriptiveStats,
    pub lines: DescriptiveStats,
    pub pieces: DescriptiveStats,
    pub duration_secs: DescriptiveStats,
}

impl BenchmarkSummary {
    #[must_use]
    pub fn avg_duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_secs.mean)
    }

    #[must_use]
    pub fn total_duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_secs.sum)
    }
}

#[derive(Debug, Default, Clone)]
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    #[must_use]
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Plays one game with `agent` from `seed` until top-out or until
    /// `max_pieces` placements were made.
    ///
    /// `None` falls back to [`RunnerConfig::max_pieces`].
    pub fn run_episode<A>(
        &self,
        agent: &mut A,
        seed: u64,
        max_pieces: Option<usize>,
    ) -> EpisodeStats
    where
        A: Agent + ?Sized,
    {
        let max_pieces = max_pieces.or(self.config.max_pieces);
        let mut engine = GameEngine::new(self.config.engine);
        let mut observation = engine.reset(Some(seed));
        agent.on_episode_start(seed);

        let start = Instant::now();
        let mut pieces_placed = 0;
        while !observation.is_topped_out() {
            let placement = agent.select_action(&observation);
            let result = engine.step_placement(placement);
            agent.on_step_result(&result);
            observation = result.observation;
            pieces_placed += 1;

            if max_pieces.is_some_and(|max| pieces_placed >= max) {
                break;
            }
        }
        let duration = start.elapsed();

        let board = observation.board();
        let stats = EpisodeStats {
            seed,
            score: observation.episode.score,
            lines_cleared: observation.episode.lines_total,
            pieces_placed,
            ticks: observation.tick,
            duration,
            final_board: board.cells(),
            max_height: board.column_heights().into_iter().max().unwrap_or(0),
            total_holes: observation.features.holes,
            top_out: observation.is_topped_out(),
        };
        agent.on_episode_end(stats.score, stats.lines_cleared, stats.pieces_placed);

        info!(
            agent = agent.name(),
            seed,
            pieces = stats.pieces_placed,
            lines = stats.lines_cleared,
            score = stats.score,
            ?duration,
            "episode finished"
        );
        stats
    }

    /// Runs `num_episodes` episodes, one per seed.
    ///
    /// Seeds default to `0..num_episodes`; extra seeds are ignored.
    pub fn run_benchmark<A>(
        &self,
        agent: &mut A,
        num_episodes: usize,
        seeds: Option<&[u64]>,
    ) -> Result<BenchmarkResults, BenchmarkError>
    where
        A: Agent + ?Sized,
    {
        let seeds = resolve_seeds(num_episodes, seeds)?;

        let mut episodes = Vec::with_capacity(num_episodes);
        for seed in seeds {
            episodes.push(self.run_episode(&mut *agent, seed, None));
        }
        let results = BenchmarkResults {
            agent_name: agent.name().to_owned(),
            num_episodes,
            episodes,
        };

        if let Some(summary) = results.summary() {
            info!(
                agent = %summary.agent_name,
                episodes = summary.num_episodes,
                avg_score = summary.score.mean,
                avg_lines = summary.lines.mean,
                avg_pieces = summary.pieces.mean,
                max_lines = summary.lines.max,
                total_duration = ?summary.total_duration(),
                "benchmark finished"
            );
        }
        Ok(results)
    }

    /// Benchmarks every agent on the same seeds.
    ///
    /// Results are keyed by agent name, in input order.
    pub fn compare_agents(
        &self,
        agents: &mut [&mut dyn Agent],
        num_episodes: usize,
        seeds: Option<&[u64]>,
    ) -> Result<Vec<(String, BenchmarkResults)>, BenchmarkError> {
        let seeds = resolve_seeds(num_episodes, seeds)?;

        let total = agents.len();
        let mut results = Vec::with_capacity(total);
        for (i, agent) in agents.iter_mut().enumerate() {
            debug!(agent = agent.name(), "comparing agent {}/{total}", i + 1);
            let benchmark =
                self.run_benchmark(&mut **agent, num_episodes, Some(seeds.as_slice()))?;
            results.push((agent.name().to_owned(), benchmark));
        }
        Ok(results)
    }
}

fn resolve_seeds(num_episodes: usize, seeds: Option<&[u64]>) -> Result<Vec<u64>, BenchmarkError> {
    match seeds {
        None => Ok((0..).take(num_episodes).collect()),
        Some(seeds) if seeds.len() < num_episodes => Err(BenchmarkError::NotEnoughSeeds {
            needed: num_episodes,
            given: seeds.len(),
        }),
        Some(seeds) => Ok(seeds[..num_episodes].to_vec()),
    }
}

#[expect(clippy::cast_precision_loss)]
fn to_f64(value: usize) -> f64 {
    value as f64
}
