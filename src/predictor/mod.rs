//! Predictors wrapping loaded models.

pub mod severity_classifier;

pub use severity_classifier::{
    SeverityClassifier, SeverityClassifierBuilder, SeverityClassifierConfig,
};
