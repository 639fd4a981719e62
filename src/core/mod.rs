//! The core module of the classification pipeline.
//!
//! This module contains the fundamental components of the pipeline:
//! - Configuration management and validation
//! - Constants used throughout the pipeline
//! - Error handling
//! - The ONNX Runtime inference engine
//!
//! It also provides re-exports of commonly used types for convenience.

pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;

pub use config::{ConfigError, ConfigValidator, ModelConfig};
pub use constants::*;
pub use errors::{ClassifierError, ClassifierResult, ProcessingStage};
pub use inference::OrtInfer;

/// A 2D tensor of f32 values, shape `[batch, classes]`.
pub type Tensor2D = ndarray::Array2<f32>;
/// A 4D tensor of f32 values, shape `[batch, ...]` in CHW or HWC order.
pub type Tensor4D = ndarray::Array4<f32>;
