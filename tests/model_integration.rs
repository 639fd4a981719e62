//! Integration tests for the full classification pipeline.
//!
//! The end-to-end tests need a real severity model and are marked
//! `#[ignore]` by default. Point `SEVERITY_MODEL_PATH` at an ONNX model and
//! run:
//!
//! ```sh
//! SEVERITY_MODEL_PATH=models/severity_final.onnx cargo test -- --ignored
//! ```

use image::{Rgb, RgbImage};
use pothole_severity::prelude::*;
use pothole_severity::processors::{resize_to_input, ChannelOrder, NormalizeImage};
use std::path::PathBuf;

fn model_path() -> Option<PathBuf> {
    std::env::var_os("SEVERITY_MODEL_PATH").map(PathBuf::from)
}

fn white_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
}

#[test]
fn preprocessing_matches_training_contract() {
    // An all-white image must survive the full preprocessing path and land
    // on an all-ones tensor under the MobileNetV2 mapping.
    let img = white_image(640, 480);
    let resized = resize_to_input(&img, 224, 224).unwrap();
    assert_eq!(resized.dimensions(), (224, 224));

    let norm = NormalizeImage::for_mobilenet_v2(ChannelOrder::HWC).unwrap();
    let tensor = norm.normalize_to(&resized).unwrap();
    assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
    for &v in tensor.iter() {
        assert!((v - 1.0).abs() < 1e-5);
    }
}

#[test]
fn loader_and_source_dispatch() {
    assert!(ImageSource::parse("https://example.com/a.jpg").is_url());
    assert!(!ImageSource::parse("relative/road.png").is_url());

    let loader = ImageLoader::new().unwrap();
    assert!(loader.try_load("/no/such/file.jpg").is_none());
}

// Requires SEVERITY_MODEL_PATH and the ONNX Runtime.
#[test]
#[ignore]
fn classify_white_image_end_to_end() {
    let path = model_path().expect("set SEVERITY_MODEL_PATH to run this test");
    let classifier = SeverityClassifier::builder()
        .model_name("severity_final")
        .build(&path)
        .expect("failed to load model");

    let prediction = classifier.classify(&white_image(224, 224)).unwrap();

    assert!(matches!(
        prediction.label,
        SeverityLabel::Normal | SeverityLabel::Moderate | SeverityLabel::Severe
    ));
    assert!((0.0..=1.0).contains(&prediction.confidence));
    assert_eq!(prediction.probabilities.len(), 3);
    let sum: f32 = prediction.probabilities.iter().sum();
    assert!((sum - 1.0).abs() < 1e-3);
}

// Requires SEVERITY_MODEL_PATH and the ONNX Runtime.
#[test]
#[ignore]
fn classify_is_deterministic() {
    let path = model_path().expect("set SEVERITY_MODEL_PATH to run this test");
    let classifier = SeverityClassifier::builder().build(&path).unwrap();

    let mut img = RgbImage::new(320, 240);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
    }

    let first = classifier.classify(&img).unwrap();
    let second = classifier.classify(&img).unwrap();
    assert_eq!(first, second);
}

// Requires SEVERITY_MODEL_PATH and the ONNX Runtime.
#[test]
#[ignore]
fn classify_arbitrary_resolutions() {
    let path = model_path().expect("set SEVERITY_MODEL_PATH to run this test");
    let classifier = SeverityClassifier::builder().build(&path).unwrap();

    for (w, h) in [(32, 32), (1920, 1080), (100, 700)] {
        let prediction = classifier
            .classify(&RgbImage::from_pixel(w, h, Rgb([90, 90, 90])))
            .unwrap();
        let sum: f32 = prediction.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-3, "bad sum for {}x{}: {}", w, h, sum);
    }
}
