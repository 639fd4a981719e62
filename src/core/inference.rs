//! ONNX Runtime inference engine with a pooled session.
//!
//! The model artifact is loaded once at construction and held read-only for
//! the lifetime of the engine. `ort` sessions take `&mut self` to run, so the
//! engine keeps a small pool of `Mutex<Session>` picked round-robin; a shared
//! engine is therefore safe to call from concurrent requests.

use crate::core::config::ModelConfig;
use crate::core::errors::{ClassifierError, SimpleError};
use crate::core::{Tensor2D, Tensor4D};
use ndarray::ArrayView2;
use ort::logging::LogLevel;
use ort::session::Session;
use ort::value::{TensorRef, ValueType};
use std::path::Path;
use std::sync::Mutex;

pub struct OrtInfer {
    sessions: Vec<Mutex<Session>>,
    next_idx: std::sync::atomic::AtomicUsize,
    input_name: String,
    output_name: String,
    model_path: std::path::PathBuf,
    model_name: String,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("sessions", &self.sessions.len())
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtInfer {
    /// Creates a new OrtInfer from the common model configuration.
    ///
    /// Builds `session_pool_size` sessions from the model file and discovers
    /// the input and output tensor names from the first session's metadata.
    /// A missing or incompatible model artifact fails here, before any
    /// prediction is attempted.
    pub fn from_config(
        config: &ModelConfig,
        model_path: impl AsRef<Path>,
    ) -> Result<Self, ClassifierError> {
        let path = model_path.as_ref();
        let pool_size = config.session_pool_size.unwrap_or(1).max(1);

        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let session = Session::builder()?
                .with_log_level(LogLevel::Error)?
                .commit_from_file(path)
                .map_err(|e| {
                    ClassifierError::model_load_error(path, "failed to create ONNX session", e)
                })?;
            sessions.push(session);
        }

        let (input_name, output_name) = {
            let session = &sessions[0];
            let input = session.inputs.first().ok_or_else(|| {
                ClassifierError::invalid_input("model declares no input tensors")
            })?;
            let output = session.outputs.first().ok_or_else(|| {
                ClassifierError::invalid_input("model declares no output tensors")
            })?;
            (input.name.clone(), output.name.clone())
        };

        let model_name = config
            .model_name
            .clone()
            .or_else(|| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or_else(|| "unknown_model".to_string());

        Ok(OrtInfer {
            sessions: sessions.into_iter().map(Mutex::new).collect(),
            next_idx: std::sync::atomic::AtomicUsize::new(0),
            input_name,
            output_name,
            model_path: path.to_path_buf(),
            model_name,
        })
    }

    /// Returns the model path associated with this inference engine.
    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }

    /// Returns the model name associated with this inference engine.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the discovered input tensor name.
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Attempts to retrieve the primary input tensor shape from the first session.
    ///
    /// Dynamic dimensions (e.g. -1) are returned as-is.
    pub fn primary_input_shape(&self) -> Option<Vec<i64>> {
        let session_guard = self.sessions.first()?.lock().ok()?;
        let input = session_guard.inputs.first()?;
        match &input.input_type {
            ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
            _ => None,
        }
    }

    /// Attempts to retrieve the static class count from the output metadata.
    ///
    /// Returns the last dimension of the primary output tensor when it is
    /// statically known, None when the model declares it dynamic.
    pub fn output_num_classes(&self) -> Option<usize> {
        let session_guard = self.sessions.first()?.lock().ok()?;
        let output = session_guard.outputs.first()?;
        match &output.output_type {
            ValueType::Tensor { shape, .. } => {
                let last = *shape.iter().last()?;
                (last > 0).then_some(last as usize)
            }
            _ => None,
        }
    }

    /// Runs a forward pass and extracts the output as a `[batch, classes]` tensor.
    pub fn infer_2d(&self, x: &Tensor4D) -> Result<Tensor2D, ClassifierError> {
        let batch_size = x.shape()[0];
        let input_shape = x.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            ClassifierError::tensor_operation(
                &format!(
                    "failed to convert input tensor with shape {:?} for model '{}'",
                    input_shape, self.model_name
                ),
                e,
            )
        })?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self
            .next_idx
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            % self.sessions.len();
        let mut session_guard = self.sessions[idx].lock().map_err(|_| {
            ClassifierError::inference_error(SimpleError::new(format!(
                "failed to acquire session lock for session {}/{}",
                idx,
                self.sessions.len()
            )))
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            ClassifierError::inference_error(SimpleError::new(format!(
                "forward pass failed for model '{}' with input '{}' -> output '{}': {}",
                self.model_name, self.input_name, self.output_name, e
            )))
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ClassifierError::inference_error(SimpleError::new(format!(
                    "failed to extract output tensor '{}' as f32: {}",
                    self.output_name, e
                )))
            })?;

        if output_shape.len() != 2 {
            return Err(ClassifierError::tensor_operation(
                &format!(
                    "model '{}': expected 2D output tensor, got {}D with shape {:?}",
                    self.model_name,
                    output_shape.len(),
                    output_shape
                ),
                SimpleError::new("invalid output tensor dimensions"),
            ));
        }

        let num_classes = output_shape[1] as usize;
        let expected_len = batch_size * num_classes;
        if output_data.len() != expected_len {
            return Err(ClassifierError::tensor_operation(
                &format!(
                    "model '{}': output data size mismatch, expected {} elements, got {}",
                    self.model_name,
                    expected_len,
                    output_data.len()
                ),
                SimpleError::new("output tensor data size mismatch"),
            ));
        }

        let array_view = ArrayView2::from_shape((batch_size, num_classes), output_data)
            .map_err(ClassifierError::Tensor)?;
        Ok(array_view.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_rejects_missing_model() {
        let config = ModelConfig::new().session_pool_size(2);
        let result = OrtInfer::from_config(&config, "dummy_path.onnx");
        assert!(result.is_err());
    }
}
