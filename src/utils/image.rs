//! Utility functions for image loading and conversion.

use crate::core::errors::ClassifierError;
use image::{DynamicImage, RgbImage};

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// Handles any image format supported by the image crate.
///
/// # Errors
///
/// Returns `ClassifierError::ImageLoad` if the file cannot be opened or
/// decoded.
pub fn load_image(path: &std::path::Path) -> Result<RgbImage, ClassifierError> {
    let img = image::open(path).map_err(ClassifierError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}

/// Decodes an image from raw bytes and converts it to RgbImage.
///
/// This is the entry point for uploaded file contents and fetched HTTP
/// bodies; the format is guessed from the bytes.
///
/// # Errors
///
/// Returns `ClassifierError::ImageLoad` if the bytes are not a decodable
/// image.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, ClassifierError> {
    let img = image::load_from_memory(bytes).map_err(ClassifierError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_image_missing_path() {
        let result = load_image(std::path::Path::new("/no/such/road.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_image_rejects_non_image_bytes() {
        // A text file renamed .jpg must fail to decode, not crash.
        let mut file = NamedTempFile::with_suffix(".jpg").unwrap();
        writeln!(file, "this is not an image").unwrap();

        let result = load_image(file.path());
        assert!(matches!(result, Err(ClassifierError::ImageLoad(_))));
    }

    #[test]
    fn test_decode_image_roundtrip() {
        let img = RgbImage::from_pixel(5, 5, image::Rgb([200, 100, 50]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img.clone())
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_decode_image_rejects_garbage() {
        assert!(decode_image(b"definitely not an image").is_err());
    }
}
