//! Game loop and everything the loop reports.
//!
//! - [`GameEngine`] - tick-driven state machine with frame and placement APIs
//! - [`SevenBagRandomizer`] - seeded piece stream with non-mutating look-ahead
//! - [`LockDelayTimer`] - grounded-time tracking before a forced lock
//! - [`search_legal_moves`] - reachability search behind [`LegalMove`]
//! - [`Observation`], [`StepResult`] - serializable snapshots returned by every call
//! - [`GameStats`] - score and line-clear bookkeeping
//!
//! # Game Flow
//!
//! 1. [`GameEngine::reset`] seeds the randomizer and spawns the first piece
//! 2. The driver sends frame actions or placements
//! 3. A locked piece clears full lines, scores, and spawns the next piece
//! 4. The game ends when a newly spawned piece collides (top-out)
//!
//! # Example
//!
//! ```
//! use tetrust_engine::{EngineConfig, Event, GameEngine, LegalMove, Placement};
//!
//! let mut engine = GameEngine::new(EngineConfig::default());
//! let mut observation = engine.reset(Some(7));
//!
//! while !observation.is_topped_out() {
//!     let placement = observation
//!         .legal_moves
//!         .first()
//!         .map_or_else(Placement::default, LegalMove::placement);
//!     let result = engine.step_placement(placement);
//!     if result.info.has_event(Event::TopOut) {
//!         assert!(result.done);
//!     }
//!     observation = result.observation;
//! }
//! assert!(engine.is_done());
//! ```

pub use self::{
    config::*, game_engine::*, game_stats::*, legal_moves::*, lock_delay::*, observation::*,
    randomizer::*, step::*,
};

mod config;
mod game_engine;
mod game_stats;
mod legal_moves;
mod lock_delay;
mod observation;
mod randomizer;
mod step;
