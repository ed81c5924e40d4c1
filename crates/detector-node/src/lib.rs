//! Traffic-Light Detector Node
//!
//! Boundary crate tying the pipeline together: receives pose, route,
//! traffic-light, and image deliveries over channel "topics", throttles
//! image processing, and publishes the waypoint index to stop at (or -1
//! for no stop) once per triggered cycle.

pub mod config;
pub mod node;

pub use config::NodeConfig;
pub use node::{DetectorNode, NodeChannels, NodeInputs};

use light_classifier::ClassifierError;
use thiserror::Error;
use tracing::{Level, subscriber};
use tracing_subscriber::FmtSubscriber;

/// Node error types
#[derive(Error, Debug)]
pub enum NodeError {
    /// Stop-line configuration does not line up with the reported light
    /// list; selection indexing would be unsafe
    #[error("Stop line count {stop_lines} does not match traffic light count {lights}")]
    LightCountMismatch { stop_lines: usize, lights: usize },

    #[error("Classifier initialization failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

/// Initialize logging
pub fn init_logging() {
    let fmt_subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    subscriber::set_global_default(fmt_subscriber).expect("Failed to set tracing subscriber");
}
