//! Image processing for the classification pipeline.
//!
//! This module provides the preprocessing and postprocessing steps around
//! the model's forward pass:
//!
//! * `normalization` - Per-channel affine normalization into input tensors
//! * `resize` - Direct fixed-shape resizing to the model input resolution
//! * `postprocess` - Softmax and class ranking over output vectors
//! * `types` - Type definitions used across the processors module

pub mod normalization;
pub mod postprocess;
pub mod resize;
pub mod types;

pub use normalization::NormalizeImage;
pub use postprocess::{rank_classes, softmax};
pub use resize::resize_to_input;
pub use types::ChannelOrder;
