//! Light Classifier
//!
//! Camera frame type and traffic-light color classification:
//! - `CameraFrame`: decoded RGB frame from the vehicle camera
//! - `LightState`: per-frame color label (red/yellow/green/unknown)
//! - `LightClassifier`: optional ONNX model, degrades to unknown

pub mod classifier;
pub mod frame;
pub mod state;

pub use classifier::{ClassifierConfig, LightClassifier};
pub use frame::CameraFrame;
pub use state::LightState;

use thiserror::Error;

/// Classifier error types
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Invalid frame format")]
    InvalidFrame,
}
