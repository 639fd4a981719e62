//! Constants used throughout the classification pipeline.

use std::time::Duration;

/// The number of severity classes the model predicts.
///
/// This is the training-time contract between the model's output vector and
/// [`crate::domain::SeverityLabel::ALL`]; the two must stay in lockstep.
pub const SEVERITY_NUM_CLASSES: usize = 3;

/// The default input shape (width, height) the model expects.
pub const DEFAULT_INPUT_SHAPE: (u32, u32) = (224, 224);

/// The default timeout for fetching an image over HTTP(S).
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// The default threshold for parallel batch loading.
///
/// Batches larger than this are loaded with rayon.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4;

/// Tolerance used when checking that a probability vector sums to one.
pub const PROBABILITY_SUM_TOLERANCE: f32 = 1e-3;
