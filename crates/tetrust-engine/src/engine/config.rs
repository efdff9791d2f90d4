use serde::{Deserialize, Serialize};

use super::lock_delay::LockDelayTimer;

/// Version tag carried by every serialized [`Observation`](crate::Observation).
pub const SCHEMA_VERSION: &str = "s1.0.0";

/// Simulation rate the tick-based timings are tuned for.
pub const TICKS_PER_SECOND: u32 = 60;

/// Ticks between automatic one-row drops.
pub const GRAVITY_TICKS: u32 = 48;

/// Rule switches for a [`GameEngine`](crate::GameEngine).
///
/// Missing fields take their default when deserialized, so a partial JSON
/// object such as `{"hold_enabled": false}` is a valid configuration.
///
/// # Example
///
/// ```
/// use tetrust_engine::EngineConfig;
///
/// let config = EngineConfig::default().with_hold_enabled(false);
/// assert!(config.srs_enabled);
/// assert!(!config.hold_enabled);
/// assert_eq!(config.lock_delay_ticks, 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Enables SRS wall kicks.
    pub srs_enabled: bool,
    /// Enables the hold slot.
    pub hold_enabled: bool,
    /// Ticks a grounded piece may rest before it locks.
    pub lock_delay_ticks: u32,
    /// Number of upcoming pieces reported in each observation.
    pub next_queue_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            srs_enabled: true,
            hold_enabled: true,
            lock_delay_ticks: LockDelayTimer::DEFAULT_DELAY_TICKS,
            next_queue_size: 3,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn with_srs_enabled(mut self, enabled: bool) -> Self {
        self.srs_enabled = enabled;
        self
    }

    #[must_use]
    pub const fn with_hold_enabled(mut self, enabled: bool) -> Self {
        self.hold_enabled = enabled;
        self
    }

    #[must_use]
    pub const fn with_lock_delay_ticks(mut self, ticks: u32) -> Self {
        self.lock_delay_ticks = ticks;
        self
    }

    #[must_use]
    pub const fn with_next_queue_size(mut self, size: usize) -> Self {
        self.next_queue_size = size;
        self
    }
}
