//! Severity Classification Demo
//!
//! Classifies road-surface images as NORMAL, MODERATE, or SEVERE using a
//! pre-trained ONNX model. Inputs can be local file paths or http(s) URLs;
//! URL inputs are fetched with a bounded timeout.

use clap::Parser;
use pothole_severity::core::ConfigValidator;
use pothole_severity::prelude::*;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

/// Command-line arguments for the severity classification demo
#[derive(Parser)]
#[command(name = "classify")]
#[command(about = "Pothole severity classification - classifies road images as normal, moderate, or severe")]
struct Args {
    /// Path to the ONNX model file
    #[arg(short, long)]
    model_path: String,

    /// Optional JSON file with a full classifier configuration
    #[arg(long)]
    config: Option<String>,

    /// Timeout in seconds for fetching URL inputs
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Image inputs: file paths or http(s) URLs
    #[arg(required = true)]
    inputs: Vec<String>,
}

/// Prints the prediction for a single input: label, confidence and the
/// per-class probability breakdown.
fn display_prediction(input: &str, prediction: &SeverityPrediction) {
    info!("{}", input);
    info!(
        "   Prediction: {} (confidence: {:.2}%)",
        prediction.label.as_str().to_uppercase(),
        prediction.confidence * 100.0
    );
    info!("   {}", prediction.label.advisory());
    for (label, p) in prediction.scores() {
        info!("   - {:8} : {:.2}%", label.as_str().to_uppercase(), p * 100.0);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();

    // The model artifact is required; refusing to start without it beats
    // failing on the first request.
    let model_path = Path::new(&args.model_path);
    if !model_path.exists() {
        error!("Model file not found: {}", args.model_path);
        return Err("Model file not found".into());
    }

    let classifier = match &args.config {
        Some(config_path) => {
            let contents = std::fs::read_to_string(config_path)?;
            let config: SeverityClassifierConfig = serde_json::from_str(&contents)?;
            config.validate()?;
            SeverityClassifier::new(config, model_path)?
        }
        None => SeverityClassifier::builder().build(model_path)?,
    };
    info!("Loaded model '{}'", classifier.model_name());

    let loader = ImageLoader::with_timeout(Duration::from_secs(args.timeout_secs))?;

    let mut failures = 0usize;
    for input in &args.inputs {
        // Load failures are recoverable: report and move on to the next input.
        let Some(img) = loader.try_load(input) else {
            error!("Could not load image from '{}'. Check the path or link.", input);
            failures += 1;
            continue;
        };

        match classifier.classify(&img) {
            Ok(prediction) => display_prediction(input, &prediction),
            Err(e) => {
                error!("Classification failed for '{}': {}", input, e);
                failures += 1;
            }
        }
    }

    if failures == args.inputs.len() {
        return Err("No inputs could be classified".into());
    }

    Ok(())
}
