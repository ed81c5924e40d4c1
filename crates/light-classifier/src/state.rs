//! Traffic-light color labels

use serde::{Deserialize, Serialize};

/// Observed traffic-light color
///
/// Produced per frame, either from simulator ground truth or from the
/// classifier. `Unknown` covers missing frames, low-confidence output, and
/// an unavailable model; it flows through the debounce logic like any
/// other color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightState {
    Red,
    Yellow,
    Green,
    #[default]
    Unknown,
}

impl LightState {
    /// Whether this color requires the vehicle to stop
    pub fn requires_stop(self) -> bool {
        self == LightState::Red
    }

    /// Map a classifier class id to a color (wire order: red, yellow,
    /// green, then everything else unknown)
    pub fn from_class_id(id: usize) -> Self {
        match id {
            0 => LightState::Red,
            1 => LightState::Yellow,
            2 => LightState::Green,
            _ => LightState::Unknown,
        }
    }
}

impl std::fmt::Display for LightState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LightState::Red => "red",
            LightState::Yellow => "yellow",
            LightState::Green => "green",
            LightState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}
