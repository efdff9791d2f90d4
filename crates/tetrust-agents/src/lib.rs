//! Heuristic players for the tetrust engine and a runner to benchmark them.
//!
//! Agents pick one declarative [`Placement`](tetrust_engine::Placement) per
//! turn from the legal moves listed in an
//! [`Observation`](tetrust_engine::Observation). Heuristic agents use a
//! two-level evaluation:
//!
//! ```text
//! Turn Evaluation (select best legal move)
//!     ↓ uses
//! Placement Evaluation (score single placement)
//! ```
//!
//! # Modules
//!
//! - [`agent`] - the [`Agent`] capability and lifetime [`AgentStats`]
//! - [`placement_analysis`] - what-if simulation of one legal move on a board copy
//! - [`board_feature`] - Dellacherie and extended feature sets
//! - [`placement_evaluator`] - weighted feature sums
//! - [`turn_evaluator`] - best-move selection
//! - [`random_agent`], [`heuristic_agent`] - the concrete players
//! - [`runner`] - episodes, benchmarks and head-to-head comparisons
//!
//! # Example
//!
//! ```
//! use tetrust_agents::{HeuristicAgent, Runner, RunnerConfig};
//!
//! let runner = Runner::new(RunnerConfig::default().with_max_pieces(Some(30)));
//! let mut agent = HeuristicAgent::extended();
//! let stats = runner.run_episode(&mut agent, 42, None);
//!
//! assert_eq!(stats.pieces_placed, 30);
//! assert!(!stats.top_out);
//! ```

pub use self::{
    agent::{Agent, AgentStats},
    heuristic_agent::HeuristicAgent,
    random_agent::RandomAgent,
    runner::{
        BenchmarkError, BenchmarkResults, BenchmarkSummary, EpisodeStats, Runner, RunnerConfig,
    },
};

pub mod agent;
pub mod board_feature;
pub mod heuristic_agent;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod random_agent;
pub mod runner;
pub mod turn_evaluator;
