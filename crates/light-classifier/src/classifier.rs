//! Light color classification

use crate::frame::CameraFrame;
use crate::state::LightState;
use crate::ClassifierError;
use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Path to the ONNX color-classification model
    pub model_path: Option<String>,

    /// Model input size (square, pixels)
    pub input_size: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            input_size: 224,
        }
    }
}

/// Traffic-light color classifier
///
/// Wraps an optional ONNX session. Without a model (or when inference
/// fails) classification degrades to `LightState::Unknown` rather than
/// faulting the pipeline.
pub struct LightClassifier {
    config: ClassifierConfig,
    session: Option<Session>,
}

impl LightClassifier {
    /// Create a classifier, loading the model if one is configured
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let session = if let Some(path) = &config.model_path {
            info!("Loading light classification model from {}", path);
            match Session::builder() {
                Ok(builder) => {
                    match builder.with_optimization_level(GraphOptimizationLevel::Level3) {
                        Ok(mut builder) => match builder.commit_from_file(path) {
                            Ok(s) => Some(s),
                            Err(e) => return Err(ClassifierError::ModelLoad(e.to_string())),
                        },
                        Err(e) => return Err(ClassifierError::ModelLoad(e.to_string())),
                    }
                }
                Err(e) => return Err(ClassifierError::ModelLoad(e.to_string())),
            }
        } else {
            warn!("No classification model configured; labels will be unknown");
            None
        };

        Ok(Self { config, session })
    }

    /// Classify the light color in a frame
    ///
    /// Never faults: degraded conditions produce `Unknown`.
    pub fn classify(&mut self, frame: &CameraFrame) -> LightState {
        match self.run_model(frame) {
            Ok(state) => state,
            Err(e) => {
                warn!("Classification degraded to unknown: {}", e);
                LightState::Unknown
            }
        }
    }

    fn run_model(&mut self, frame: &CameraFrame) -> Result<LightState, ClassifierError> {
        if self.session.is_none() {
            return Ok(LightState::Unknown);
        }

        if !frame.is_well_formed() {
            return Err(ClassifierError::InvalidFrame);
        }

        let input = ort::value::Tensor::from_array(self.preprocess(frame)?)
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;
        let session = match &mut self.session {
            Some(s) => s,
            None => return Ok(LightState::Unknown),
        };
        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let scores = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        // Argmax over per-class scores, wire order red/yellow/green
        let mut best: Option<(f32, usize)> = None;
        for (i, &score) in scores.iter().enumerate() {
            match best {
                Some((b, _)) if score <= b => {}
                _ => best = Some((score, i)),
            }
        }

        let state = best
            .map(|(_, i)| LightState::from_class_id(i))
            .unwrap_or(LightState::Unknown);
        debug!("Classifier predicted {}", state);
        Ok(state)
    }

    /// Resize to the model input size and normalize into a (1, 3, s, s)
    /// tensor
    fn preprocess(&self, frame: &CameraFrame) -> Result<Array4<f32>, ClassifierError> {
        let size = self.config.input_size;
        let img = image::ImageBuffer::<image::Rgb<u8>, _>::from_raw(
            frame.width,
            frame.height,
            frame.data.as_slice(),
        )
        .ok_or(ClassifierError::InvalidFrame)?;

        let resized =
            image::imageops::resize(&img, size, size, image::imageops::FilterType::Triangle);

        let mut tensor = Array4::<f32>::zeros((1, 3, size as usize, size as usize));
        for (x, y, pixel) in resized.enumerate_pixels() {
            tensor[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
            tensor[[0, 1, y as usize, x as usize]] = pixel[1] as f32 / 255.0;
            tensor[[0, 2, y as usize, x as usize]] = pixel[2] as f32 / 255.0;
        }
        Ok(tensor)
    }
}
