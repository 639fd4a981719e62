//! # Pothole Severity
//!
//! A Rust library that classifies road-surface images into pothole severity
//! levels (normal, moderate, severe) using a pre-trained ONNX model.
//!
//! ## Features
//!
//! - Image acquisition from local paths and HTTP(S) URLs with bounded fetch
//!   timeouts
//! - MobileNetV2-contract preprocessing (direct 224x224 resize, [-1, 1]
//!   channel normalization)
//! - ONNX Runtime integration with a pooled session for concurrent use
//! - Ranked predictions with per-class probabilities
//!
//! ## Modules
//!
//! * [`core`] - Errors, configuration, and the inference engine
//! * [`domain`] - Severity labels and prediction results
//! * [`loader`] - Path/URL image acquisition
//! * [`predictor`] - The severity classifier
//! * [`processors`] - Resize, normalization, and output post-processing
//! * [`utils`] - Image helpers and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pothole_severity::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = SeverityClassifier::builder()
//!     .model_name("severity_final")
//!     .build(Path::new("models/severity_final.onnx"))?;
//!
//! let loader = ImageLoader::new()?;
//! if let Some(img) = loader.try_load("https://example.com/road.jpg") {
//!     let prediction = classifier.classify(&img)?;
//!     println!(
//!         "{} ({:.1}%)",
//!         prediction.label,
//!         prediction.confidence * 100.0
//!     );
//!     for (label, p) in prediction.scores() {
//!         println!("  {:8} : {:.2}%", label, p * 100.0);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod loader;
pub mod predictor;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use pothole_severity::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{ClassifierError, ClassifierResult};
    pub use crate::domain::{SeverityLabel, SeverityPrediction};
    pub use crate::loader::{ImageLoader, ImageSource};
    pub use crate::predictor::{
        SeverityClassifier, SeverityClassifierBuilder, SeverityClassifierConfig,
    };
    pub use crate::utils::{init_tracing, load_image};
}
