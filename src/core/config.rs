//! Configuration types and validation for the classifier.
//!
//! This module provides the shared model configuration, the configuration
//! error type, and a validation trait with helpers for the parameter checks
//! that every configuration in the crate needs.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a model path does not exist.
    #[error("model path does not exist: {path}")]
    ModelPathNotFound {
        /// The path that was checked.
        path: PathBuf,
    },

    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// A message describing the problem.
        message: String,
    },

    /// Error indicating that validation failed.
    #[error("validation failed: {message}")]
    ValidationFailed {
        /// A message describing the failed check.
        message: String,
    },
}

/// A trait for validating configuration parameters.
///
/// Implementors provide `validate` and `get_defaults`; the helper methods
/// cover the common parameter checks.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a usize parameter is greater than zero.
    fn validate_positive_usize(&self, value: usize, name: &str) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::ValidationFailed {
                message: format!("{} must be greater than 0", name),
            });
        }
        Ok(())
    }

    /// Validates image dimensions (both sides non-zero).
    fn validate_image_dimensions(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::ValidationFailed {
                message: format!("image dimensions must be non-zero, got {}x{}", width, height),
            });
        }
        Ok(())
    }

    /// Validates that a model path exists on disk.
    fn validate_model_path(&self, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ModelPathNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Validates a timeout given in seconds.
    fn validate_timeout_secs(&self, secs: u64) -> Result<(), ConfigError> {
        if secs == 0 {
            return Err(ConfigError::ValidationFailed {
                message: "timeout must be greater than 0 seconds".to_string(),
            });
        }
        Ok(())
    }
}

/// Common model configuration shared by the classifier builder.
///
/// Serializable so a full classifier configuration can be loaded from a
/// JSON file (see the demo binary's `--config` flag).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ModelConfig {
    /// The path to the ONNX model file (optional until build time).
    pub model_path: Option<PathBuf>,
    /// The name of the model (optional).
    pub model_name: Option<String>,
    /// Size of the session pool to allow concurrent predictions (>= 1).
    /// If None, defaults to 1 (single session).
    #[serde(default)]
    pub session_pool_size: Option<usize>,
}

impl ModelConfig {
    /// Creates a new ModelConfig with default values.
    pub fn new() -> Self {
        Self {
            model_path: None,
            model_name: None,
            session_pool_size: Some(1),
        }
    }

    /// Sets the model path.
    pub fn model_path(mut self, model_path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(model_path.into());
        self
    }

    /// Sets the model name.
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    /// Sets the session pool size.
    pub fn session_pool_size(mut self, size: usize) -> Self {
        self.session_pool_size = Some(size);
        self
    }
}

impl ConfigValidator for ModelConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(size) = self.session_pool_size {
            self.validate_positive_usize(size, "session_pool_size")?;
        }

        if let Some(path) = &self.model_path {
            self.validate_model_path(path)?;
        }

        Ok(())
    }

    fn get_defaults() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = ModelConfig::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let config = ModelConfig::new().session_pool_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_model_path_rejected() {
        let config = ModelConfig::new().model_path("/definitely/not/a/model.onnx");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ModelPathNotFound { .. })
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = ModelConfig::new();
        assert!(config.validate_image_dimensions(0, 224).is_err());
        assert!(config.validate_image_dimensions(224, 0).is_err());
        assert!(config.validate_image_dimensions(224, 224).is_ok());
    }
}
