//! State Debounce
//!
//! Converts noisy per-frame light-color estimates into a stable stop
//! decision. A single misclassified frame must not toggle the published
//! stop command: only a sustained run of identical estimates changes the
//! output, trading a bounded reaction latency for noise robustness.

use light_classifier::LightState;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sentinel published when no stop is required
pub const NO_STOP: i32 = -1;

/// Debounce configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Consecutive identical estimates required before a color is
    /// promoted to stable
    pub threshold: u32,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self { threshold: 3 }
    }
}

/// Debouncing state machine over per-frame color estimates
///
/// Tracks the current candidate color and its run length; once the run
/// reaches the configured threshold the candidate becomes the stable
/// color and the published value is recomputed. Every update emits a
/// value, so downstream consumers receive one output per processed frame.
#[derive(Debug, Clone)]
pub struct Debouncer {
    threshold: u32,
    /// Last color confirmed by a full run
    stable: LightState,
    /// Color currently being counted
    candidate: LightState,
    /// Consecutive frames the candidate has been observed
    run_length: u32,
    /// Last value emitted after a confirmed run
    last_published: i32,
}

impl Debouncer {
    /// Create a debouncer with the given configuration
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            threshold: config.threshold,
            stable: LightState::Unknown,
            candidate: LightState::Unknown,
            run_length: 0,
            last_published: NO_STOP,
        }
    }

    /// Feed one frame's estimate and its candidate stop waypoint
    ///
    /// Returns the value to publish this frame: the candidate waypoint
    /// once a red run is confirmed, `NO_STOP` once any other color is
    /// confirmed, and the previous published value while a run is still
    /// building. A changed estimate restarts the run at length 1, so the
    /// first observation of a new color is never itself published.
    pub fn update(&mut self, raw: LightState, stop_waypoint: i32) -> i32 {
        if raw != self.candidate {
            self.candidate = raw;
            self.run_length = 1;
            return self.last_published;
        }

        self.run_length += 1;
        if self.run_length >= self.threshold {
            if self.stable != raw {
                debug!("Light state stabilized to {}", raw);
            }
            self.stable = raw;
            self.last_published = if raw.requires_stop() {
                stop_waypoint
            } else {
                NO_STOP
            };
        }
        self.last_published
    }

    /// Last color confirmed by a full run
    pub fn stable(&self) -> LightState {
        self.stable
    }

    /// Last value emitted after a confirmed run
    pub fn last_published(&self) -> i32 {
        self.last_published
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}
