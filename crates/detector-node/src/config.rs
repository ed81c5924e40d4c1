//! Node configuration

use config::{Config, ConfigError, Environment, File};
use light_classifier::ClassifierConfig;
use serde::{Deserialize, Serialize};
use state_debounce::DebounceConfig;

/// Frame-skip factor with a real camera feed
const SITE_FRAME_SKIP: u32 = 1;
/// Frame-skip factor with the higher-rate simulated feed
const SIM_FRAME_SKIP: u32 = 3;

/// Static detector configuration, loaded once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Real vehicle ("site") vs simulated environment; controls the
    /// frame-skip factor and whether the classifier or the simulator's
    /// ground truth provides the color estimate
    pub is_site: bool,

    /// Stop-line positions, index-aligned 1:1 with the reported
    /// traffic-light list
    pub stop_lines: Vec<(f64, f64)>,

    /// Debounce settings
    pub debounce: DebounceConfig,

    /// Classifier settings
    pub classifier: ClassifierConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            is_site: false,
            stop_lines: Vec::new(),
            debounce: DebounceConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from an optional file overlaid with
    /// `TL_DETECTOR_`-prefixed environment variables
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("TL_DETECTOR").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Every Nth image frame triggers the pipeline
    pub fn frame_skip(&self) -> u32 {
        if self.is_site {
            SITE_FRAME_SKIP
        } else {
            SIM_FRAME_SKIP
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_skip_by_environment() {
        let sim = NodeConfig::default();
        assert_eq!(sim.frame_skip(), 3);

        let site = NodeConfig {
            is_site: true,
            ..Default::default()
        };
        assert_eq!(site.frame_skip(), 1);
    }

    #[test]
    fn test_defaults() {
        let cfg = NodeConfig::default();
        assert!(cfg.stop_lines.is_empty());
        assert_eq!(cfg.debounce.threshold, 3);
        assert!(cfg.classifier.model_path.is_none());
    }
}
