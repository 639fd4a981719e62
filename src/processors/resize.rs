//! Fixed-shape resizing for model input.

use crate::core::errors::ClassifierError;
use image::RgbImage;

/// Resizes an image to the model input shape.
///
/// The resize is direct: the aspect ratio is not preserved and no
/// letterboxing or cropping is applied, matching the preprocessing the model
/// was trained with. Lanczos3 is used as the resampling filter.
///
/// # Arguments
///
/// * `img` - The source image.
/// * `width` - Target width in pixels.
/// * `height` - Target height in pixels.
///
/// # Errors
///
/// Returns `ClassifierError::InvalidInput` if the source or target
/// dimensions are zero.
pub fn resize_to_input(
    img: &RgbImage,
    width: u32,
    height: u32,
) -> Result<RgbImage, ClassifierError> {
    let (src_width, src_height) = img.dimensions();
    if src_width == 0 || src_height == 0 {
        return Err(ClassifierError::invalid_input(format!(
            "cannot resize a zero-sized image ({}x{})",
            src_width, src_height
        )));
    }
    if width == 0 || height == 0 {
        return Err(ClassifierError::invalid_input(format!(
            "target dimensions must be non-zero, got {}x{}",
            width, height
        )));
    }

    if (src_width, src_height) == (width, height) {
        return Ok(img.clone());
    }

    Ok(image::imageops::resize(
        img,
        width,
        height,
        image::imageops::FilterType::Lanczos3,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_resize_to_model_input() {
        let img = RgbImage::from_pixel(640, 480, Rgb([120, 120, 120]));
        let resized = resize_to_input(&img, 224, 224).unwrap();
        assert_eq!(resized.dimensions(), (224, 224));
    }

    #[test]
    fn test_resize_ignores_aspect_ratio() {
        let img = RgbImage::from_pixel(1000, 10, Rgb([5, 5, 5]));
        let resized = resize_to_input(&img, 224, 224).unwrap();
        assert_eq!(resized.dimensions(), (224, 224));
    }

    #[test]
    fn test_resize_noop_when_already_sized() {
        let img = RgbImage::from_pixel(224, 224, Rgb([7, 8, 9]));
        let resized = resize_to_input(&img, 224, 224).unwrap();
        assert_eq!(resized, img);
    }

    #[test]
    fn test_resize_rejects_zero_target() {
        let img = RgbImage::from_pixel(32, 32, Rgb([0, 0, 0]));
        assert!(resize_to_input(&img, 0, 224).is_err());
        assert!(resize_to_input(&img, 224, 0).is_err());
    }
}
