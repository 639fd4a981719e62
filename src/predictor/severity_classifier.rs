//! Road-surface severity classifier.
//!
//! Wraps a pre-trained classification model loaded from an ONNX file and
//! reduces its output to a [`SeverityPrediction`]. The model is loaded once
//! at construction and treated as an immutable resource for the classifier's
//! lifetime; classification itself is a pure request/response call.

use crate::core::constants::{DEFAULT_INPUT_SHAPE, SEVERITY_NUM_CLASSES};
use crate::core::{ClassifierError, ConfigError, ConfigValidator, ModelConfig, OrtInfer};
use crate::domain::SeverityPrediction;
use crate::processors::{resize_to_input, softmax, ChannelOrder, NormalizeImage};
use crate::utils::decode_image;
use image::RgbImage;
use std::path::Path;
use tracing::{debug, warn};

/// Configuration for the severity classifier.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SeverityClassifierConfig {
    /// Common model configuration.
    pub common: ModelConfig,
    /// Input shape for the model (width, height).
    pub input_shape: Option<(u32, u32)>,
    /// Channel order of the input tensor the model expects.
    pub channel_order: Option<ChannelOrder>,
    /// Whether to apply softmax to the model output.
    ///
    /// The reference model ends in a softmax layer, so this defaults to
    /// false; enable it for exports that strip the final activation.
    pub apply_softmax: Option<bool>,
}

impl SeverityClassifierConfig {
    /// Creates a new configuration with default settings.
    pub fn new() -> Self {
        Self {
            common: ModelConfig::new(),
            input_shape: Some(DEFAULT_INPUT_SHAPE),
            channel_order: Some(ChannelOrder::HWC),
            apply_softmax: Some(false),
        }
    }
}

impl ConfigValidator for SeverityClassifierConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.common.validate()?;

        if let Some((width, height)) = self.input_shape {
            self.validate_image_dimensions(width, height)?;
        }

        Ok(())
    }

    fn get_defaults() -> Self {
        Self::new()
    }
}

/// Severity classifier over road-surface images.
///
/// Constructed once per process from a model artifact; classification calls
/// share the instance read-only. The underlying session pool serializes
/// access to each ONNX session, so a shared classifier is safe across
/// threads.
#[derive(Debug)]
pub struct SeverityClassifier {
    model_name: String,
    input_shape: (u32, u32),
    apply_softmax: bool,
    normalize: NormalizeImage,
    infer: OrtInfer,
}

impl SeverityClassifier {
    /// Returns a builder for constructing a classifier.
    pub fn builder() -> SeverityClassifierBuilder {
        SeverityClassifierBuilder::new()
    }

    /// Creates a new severity classifier.
    ///
    /// Loads the model artifact and validates the output arity against the
    /// label set: when the model metadata declares a static class count it
    /// must equal the number of severity labels. A missing or incompatible
    /// model fails here; there is no prediction path without one.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the classifier.
    /// * `model_path` - Path to the ONNX model file.
    pub fn new(
        config: SeverityClassifierConfig,
        model_path: &Path,
    ) -> Result<Self, ClassifierError> {
        let input_shape = config.input_shape.unwrap_or(DEFAULT_INPUT_SHAPE);
        let channel_order = config.channel_order.unwrap_or(ChannelOrder::HWC);
        let apply_softmax = config.apply_softmax.unwrap_or(false);

        let normalize = NormalizeImage::for_mobilenet_v2(channel_order)?;
        let infer = OrtInfer::from_config(&config.common, model_path)?;

        if let Some(classes) = infer.output_num_classes() {
            if classes != SEVERITY_NUM_CLASSES {
                return Err(ClassifierError::config_error(format!(
                    "model '{}' outputs {} classes but {} severity labels are defined",
                    infer.model_name(),
                    classes,
                    SEVERITY_NUM_CLASSES
                )));
            }
        }

        if let Some(shape) = infer.primary_input_shape() {
            // Batch and channel dims are <= 3 or dynamic; anything larger is spatial.
            let spatial: Vec<i64> = shape.iter().copied().filter(|&d| d > 3).collect();
            let (width, height) = input_shape;
            if !spatial.is_empty()
                && !spatial.contains(&(width as i64))
                && !spatial.contains(&(height as i64))
            {
                warn!(
                    "model '{}' declares input shape {:?}, which does not mention the configured {}x{}",
                    infer.model_name(),
                    shape,
                    width,
                    height
                );
            }
        }

        let model_name = infer.model_name().to_string();

        Ok(Self {
            model_name,
            input_shape,
            apply_softmax,
            normalize,
            infer,
        })
    }

    /// Classifies a decoded road-surface image.
    ///
    /// Resizes to the model input shape, normalizes, runs the forward pass
    /// and reduces the output vector to a labeled prediction.
    ///
    /// # Errors
    ///
    /// Returns an error for zero-sized input, inference failure, or an
    /// output row that is not a valid probability vector. A malformed input
    /// never produces a corrupted prediction.
    pub fn classify(&self, img: &RgbImage) -> Result<SeverityPrediction, ClassifierError> {
        let (width, height) = self.input_shape;

        let resized = resize_to_input(img, width, height)?;
        let input = self.normalize.normalize_to(&resized)?;
        let output = self.infer.infer_2d(&input)?;

        let row: Vec<f32> = output.row(0).to_vec();
        let probabilities = if self.apply_softmax {
            softmax(&row)
        } else {
            row
        };

        let prediction = SeverityPrediction::from_probabilities(&probabilities)?;

        if !prediction.is_distribution() {
            warn!(
                "model '{}' output does not sum to 1 ({:?}); consider apply_softmax",
                self.model_name, prediction.probabilities
            );
        }

        debug!(
            "classified {}x{} image as '{}' ({:.3})",
            img.width(),
            img.height(),
            prediction.label,
            prediction.confidence
        );

        Ok(prediction)
    }

    /// Classifies an image from raw encoded bytes (e.g. an uploaded file).
    pub fn classify_bytes(&self, bytes: &[u8]) -> Result<SeverityPrediction, ClassifierError> {
        let img = decode_image(bytes)?;
        self.classify(&img)
    }

    /// Classifies a batch of decoded images, one forward pass per image.
    ///
    /// # Errors
    ///
    /// Fails on the first image that cannot be classified.
    pub fn classify_batch(
        &self,
        imgs: &[RgbImage],
    ) -> Result<Vec<SeverityPrediction>, ClassifierError> {
        imgs.iter().map(|img| self.classify(img)).collect()
    }

    /// Gets the name of the model being used.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Gets the input shape (width, height) images are resized to.
    pub fn input_shape(&self) -> (u32, u32) {
        self.input_shape
    }
}

/// Builder for the severity classifier.
pub struct SeverityClassifierBuilder {
    common: ModelConfig,
    input_shape: Option<(u32, u32)>,
    channel_order: Option<ChannelOrder>,
    apply_softmax: Option<bool>,
}

impl SeverityClassifierBuilder {
    /// Creates a new builder with default configuration options.
    pub fn new() -> Self {
        Self {
            common: ModelConfig::new(),
            input_shape: None,
            channel_order: None,
            apply_softmax: None,
        }
    }

    /// Sets the path to the ONNX model file.
    pub fn model_path(mut self, model_path: impl Into<std::path::PathBuf>) -> Self {
        self.common = self.common.model_path(model_path);
        self
    }

    /// Sets the model name used in logs and errors.
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.common = self.common.model_name(model_name);
        self
    }

    /// Sets the session pool size for concurrent predictions (minimum 1).
    pub fn session_pool_size(mut self, size: usize) -> Self {
        self.common = self.common.session_pool_size(size);
        self
    }

    /// Sets the input shape (width, height) the model expects.
    pub fn input_shape(mut self, input_shape: (u32, u32)) -> Self {
        self.input_shape = Some(input_shape);
        self
    }

    /// Sets the channel order of the input tensor.
    pub fn channel_order(mut self, order: ChannelOrder) -> Self {
        self.channel_order = Some(order);
        self
    }

    /// Sets whether to apply softmax to the model output.
    pub fn apply_softmax(mut self, apply: bool) -> Self {
        self.apply_softmax = Some(apply);
        self
    }

    /// Builds the severity classifier.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path to the ONNX model file.
    pub fn build(mut self, model_path: &Path) -> Result<SeverityClassifier, ClassifierError> {
        if self.common.model_path.is_none() {
            self.common = self.common.model_path(model_path.to_path_buf());
        }

        let config = SeverityClassifierConfig {
            common: self.common,
            input_shape: self.input_shape,
            channel_order: self.channel_order,
            apply_softmax: self.apply_softmax,
        };

        config.validate()?;

        SeverityClassifier::new(config, model_path)
    }
}

impl Default for SeverityClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_rejects_missing_model() {
        let result = SeverityClassifier::builder()
            .model_name("severity_final")
            .build(Path::new("/no/such/severity_final.onnx"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_rejects_zero_input_shape() {
        let mut config = SeverityClassifierConfig::new();
        config.input_shape = Some((0, 224));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = SeverityClassifierConfig::new();
        let json = serde_json::to_string(&config).unwrap();
        let back: SeverityClassifierConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.input_shape, Some(DEFAULT_INPUT_SHAPE));
        assert_eq!(back.apply_softmax, Some(false));
    }
}
