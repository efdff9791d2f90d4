//! Deterministic Tetris simulation engine.
//!
//! The engine is organized leaves first:
//!
//! - [`core`] - piece catalog, board and SRS rotation rules
//! - [`engine`] - 7-bag randomizer, lock delay, game loop, legal-move search
//!   and the serializable [`Observation`] snapshot
//! - [`features`] - board metrics reported in every observation
//!
//! Drivers talk to [`GameEngine`] through three calls: [`GameEngine::reset`],
//! [`GameEngine::step`] (one frame action per tick) and
//! [`GameEngine::step_placement`] (a declarative placement replayed as
//! primitive moves). Every call returns a fresh [`Observation`]; failures are
//! reported inside [`StepInfo`] and never leave the engine in a broken state.
//!
//! # Example
//!
//! ```
//! use tetrust_engine::{EngineConfig, FrameAction, GameEngine};
//!
//! let mut engine = GameEngine::new(EngineConfig::default());
//! let observation = engine.reset(Some(42));
//! assert_eq!(observation.next_queue.len(), 3);
//!
//! let result = engine.step(FrameAction::Hard);
//! assert!(result.info.events.iter().any(|e| e.is_hard_drop()));
//!
//! let mv = result.observation.legal_moves[0];
//! let result = engine.step_placement(mv.placement());
//! assert!(result.info.error.is_none());
//! ```

pub use self::{core::*, engine::*, features::*};

pub mod core;
pub mod engine;
pub mod features;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown piece type {_0:?}")]
pub struct ParsePieceKindError(#[error(not(source))] pub String);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown frame action {_0:?}")]
pub struct ParseFrameActionError(#[error(not(source))] pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("rotation must be 0-3, got {_0}")]
pub struct InvalidRotationError(#[error(not(source))] pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardFromCellsError {
    #[display("expected 200 cells, got {_0}")]
    CellCount(#[error(not(source))] usize),
    #[display("cell value must be 0-7, got {_0}")]
    CellValue(#[error(not(source))] u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum HoldError {
    #[display("hold is disabled")]
    Disabled,
    #[display("hold already used in this turn")]
    AlreadyUsed,
    #[display("piece colliding when holding piece")]
    PieceCollision,
}

/// Failure reported by [`GameEngine::step`] or [`GameEngine::step_placement`].
///
/// The engine state is unchanged on every variant except [`Self::ToppedOut`],
/// which ends the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlacementError {
    #[display("Game over")]
    GameOver,
    #[display("topped out: no legal moves")]
    ToppedOut,
    #[display("invalid action: x={x} rot={rot} use_hold={use_hold}")]
    InvalidAction { x: i32, rot: u8, use_hold: bool },
    #[display("hold failed: {_0}")]
    Hold(HoldError),
}

impl PlacementError {
    /// Stable machine-readable code for the wire format.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::GameOver => "game_over",
            Self::ToppedOut => "topped_out",
            Self::InvalidAction { .. } => "invalid_action",
            Self::Hold(_) => "hold_unavailable",
        }
    }
}
