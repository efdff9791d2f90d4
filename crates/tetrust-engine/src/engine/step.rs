use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

use crate::{FeatureVector, Observation, ParseFrameActionError, PlacementError};

/// One primitive input, applied for exactly one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FrameAction {
    Left,
    Right,
    /// Rotate clockwise.
    Cw,
    /// Rotate counterclockwise.
    Ccw,
    /// Move one row down.
    Soft,
    /// Drop and lock immediately.
    Hard,
    Hold,
    Noop,
}

impl FrameAction {
    pub const ALL: [Self; 8] = [
        Self::Left,
        Self::Right,
        Self::Cw,
        Self::Ccw,
        Self::Soft,
        Self::Hard,
        Self::Hold,
        Self::Noop,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Cw => "CW",
            Self::Ccw => "CCW",
            Self::Soft => "SOFT",
            Self::Hard => "HARD",
            Self::Hold => "HOLD",
            Self::Noop => "NOOP",
        }
    }
}

impl fmt::Display for FrameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameAction {
    type Err = ParseFrameActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ParseFrameActionError(s.to_owned()))
    }
}

/// Notable things that happened during one call.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    Hold,
    HardDrop,
    Lock,
    Clear,
    Spawn,
    TopOut,
}

/// Side information attached to every [`StepResult`].
///
/// On the wire the error is split into a human-readable `error` message and
/// a stable `error_code`; both keys are omitted when the call succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepInfo {
    pub lines_cleared: usize,
    pub feature_delta: FeatureVector,
    pub events: Vec<Event>,
    pub error: Option<PlacementError>,
}

impl StepInfo {
    #[must_use]
    pub fn has_event(&self, event: Event) -> bool {
        self.events.contains(&event)
    }
}

impl Serialize for StepInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct StepInfoWire<'a> {
            lines_cleared: usize,
            feature_delta: &'a FeatureVector,
            events: &'a [Event],
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            error_code: Option<&'static str>,
        }

        StepInfoWire {
            lines_cleared: self.lines_cleared,
            feature_delta: &self.feature_delta,
            events: &self.events,
            error: self.error.map(|e| e.to_string()),
            error_code: self.error.map(|e| e.code()),
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_frame_action_names() {
        for action in FrameAction::ALL {
            assert_eq!(action.to_string().parse::<FrameAction>().unwrap(), action);
            let json = serde_json::to_value(action).unwrap();
            assert_eq!(json, action.as_str(), "{action}");
        }
        assert_eq!("CCW".parse::<FrameAction>().unwrap(), FrameAction::Ccw);
        assert!("left".parse::<FrameAction>().is_err());
        assert!("JUMP".parse::<FrameAction>().is_err());
    }

    #[test]
    fn test_event_names() {
        let events = [Event::HardDrop, Event::Clear, Event::Spawn, Event::TopOut];
        assert_eq!(
            serde_json::to_value(events).unwrap(),
            json!(["hard_drop", "clear", "spawn", "top_out"])
        );
        assert!(Event::Lock.is_lock());
    }

    #[test]
    fn test_info_error_fields() {
        let ok = serde_json::to_value(StepInfo::default()).unwrap();
        assert!(ok.get("error").is_none());
        assert!(ok.get("error_code").is_none());
        assert_eq!(ok["lines_cleared"], 0);

        let info = StepInfo {
            error: Some(PlacementError::GameOver),
            ..StepInfo::default()
        };
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["error"], "Game over");
        assert_eq!(json["error_code"], "game_over");
    }
}
