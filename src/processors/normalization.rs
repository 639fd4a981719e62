//! Image normalization for model input.
//!
//! Normalization is expressed as a per-channel affine transform
//! `value * alpha + beta` with `alpha = scale / std` and `beta = -mean / std`.
//! The parameters must match the preprocessing the model was trained with
//! exactly; a mismatch produces silently wrong predictions rather than an
//! error, which makes this the most correctness-critical step in the
//! pipeline.

use crate::core::errors::ClassifierError;
use crate::core::Tensor4D;
use crate::processors::types::ChannelOrder;
use image::RgbImage;

/// Normalizes images into model input tensors.
///
/// Holds the precomputed per-channel affine parameters and the tensor
/// channel ordering to produce.
#[derive(Debug, Clone)]
pub struct NormalizeImage {
    /// Scaling factors for each channel (alpha = scale / std).
    pub alpha: Vec<f32>,
    /// Offset values for each channel (beta = -mean / std).
    pub beta: Vec<f32>,
    /// Channel ordering of the produced tensor.
    pub order: ChannelOrder,
}

impl NormalizeImage {
    /// Creates a new NormalizeImage with the specified parameters.
    ///
    /// # Arguments
    ///
    /// * `scale` - Scaling factor applied to raw channel bytes.
    /// * `mean` - Mean values for each channel.
    /// * `std` - Standard deviation values for each channel.
    /// * `order` - Channel ordering of the produced tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if scale is not positive, if mean or std do not have
    /// exactly 3 elements, or if any standard deviation is not positive.
    pub fn new(
        scale: f32,
        mean: Vec<f32>,
        std: Vec<f32>,
        order: ChannelOrder,
    ) -> Result<Self, ClassifierError> {
        if scale <= 0.0 {
            return Err(ClassifierError::config_error(
                "normalization scale must be greater than 0",
            ));
        }

        if mean.len() != 3 || std.len() != 3 {
            return Err(ClassifierError::config_error(
                "mean and std must have exactly 3 elements for RGB",
            ));
        }

        for (i, &s) in std.iter().enumerate() {
            if s <= 0.0 {
                return Err(ClassifierError::config_error(format!(
                    "standard deviation at index {} must be greater than 0, got {}",
                    i, s
                )));
            }
        }

        let alpha: Vec<f32> = std.iter().map(|s| scale / s).collect();
        let beta: Vec<f32> = mean.iter().zip(&std).map(|(m, s)| -m / s).collect();

        Ok(Self { alpha, beta, order })
    }

    /// Creates a NormalizeImage matching the MobileNetV2 published preprocessing.
    ///
    /// MobileNetV2 maps channel bytes into [-1, 1]: `x * 2/255 - 1`. In the
    /// affine parametrization that is scale `2/255` with unit mean and std.
    /// The severity model was trained against this exact transform.
    ///
    /// # Arguments
    ///
    /// * `order` - Channel ordering of the produced tensor.
    pub fn for_mobilenet_v2(order: ChannelOrder) -> Result<Self, ClassifierError> {
        Self::new(2.0 / 255.0, vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0], order)
    }

    /// Normalizes a single image into a batch-of-one 4D tensor.
    ///
    /// The produced shape is `[1, C, H, W]` for CHW order or `[1, H, W, C]`
    /// for HWC order.
    ///
    /// # Errors
    ///
    /// Returns an error if the image has zero-sized dimensions or the
    /// resulting buffer cannot be shaped into a tensor.
    pub fn normalize_to(&self, img: &RgbImage) -> Result<Tensor4D, ClassifierError> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(ClassifierError::invalid_input(format!(
                "cannot normalize a zero-sized image ({}x{})",
                width, height
            )));
        }

        let channels = 3u32;

        match self.order {
            ChannelOrder::CHW => {
                let mut result = vec![0.0f32; (channels * height * width) as usize];

                for c in 0..channels {
                    for y in 0..height {
                        for x in 0..width {
                            let pixel = img.get_pixel(x, y);
                            let channel_value = pixel[c as usize] as f32;
                            let dst_idx = (c * height * width + y * width + x) as usize;

                            result[dst_idx] =
                                channel_value * self.alpha[c as usize] + self.beta[c as usize];
                        }
                    }
                }

                ndarray::Array4::from_shape_vec(
                    (1, channels as usize, height as usize, width as usize),
                    result,
                )
                .map_err(|e| {
                    ClassifierError::normalization(
                        &format!(
                            "failed to create CHW tensor for {}x{} image",
                            width, height
                        ),
                        e,
                    )
                })
            }
            ChannelOrder::HWC => {
                let mut result = vec![0.0f32; (height * width * channels) as usize];

                for y in 0..height {
                    for x in 0..width {
                        let pixel = img.get_pixel(x, y);
                        for c in 0..channels {
                            let channel_value = pixel[c as usize] as f32;
                            let dst_idx = (y * width * channels + x * channels + c) as usize;

                            result[dst_idx] =
                                channel_value * self.alpha[c as usize] + self.beta[c as usize];
                        }
                    }
                }

                ndarray::Array4::from_shape_vec(
                    (1, height as usize, width as usize, channels as usize),
                    result,
                )
                .map_err(|e| {
                    ClassifierError::normalization(
                        &format!(
                            "failed to create HWC tensor for {}x{} image",
                            width, height
                        ),
                        e,
                    )
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid_image(width: u32, height: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([value, value, value]))
    }

    #[test]
    fn test_mobilenet_v2_maps_black_to_minus_one() {
        let norm = NormalizeImage::for_mobilenet_v2(ChannelOrder::HWC).unwrap();
        let tensor = norm.normalize_to(&solid_image(4, 4, 0)).unwrap();
        for &v in tensor.iter() {
            assert!((v - (-1.0)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_mobilenet_v2_maps_white_to_one() {
        let norm = NormalizeImage::for_mobilenet_v2(ChannelOrder::HWC).unwrap();
        let tensor = norm.normalize_to(&solid_image(4, 4, 255)).unwrap();
        for &v in tensor.iter() {
            assert!((v - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_mobilenet_v2_midpoint_near_zero() {
        let norm = NormalizeImage::for_mobilenet_v2(ChannelOrder::HWC).unwrap();
        // 128 is the closest byte to 127.5
        let tensor = norm.normalize_to(&solid_image(2, 2, 128)).unwrap();
        for &v in tensor.iter() {
            assert!(v.abs() < 0.01);
        }
    }

    #[test]
    fn test_hwc_tensor_shape() {
        let norm = NormalizeImage::for_mobilenet_v2(ChannelOrder::HWC).unwrap();
        let tensor = norm.normalize_to(&solid_image(8, 6, 10)).unwrap();
        assert_eq!(tensor.shape(), &[1, 6, 8, 3]);
    }

    #[test]
    fn test_chw_tensor_shape() {
        let norm = NormalizeImage::for_mobilenet_v2(ChannelOrder::CHW).unwrap();
        let tensor = norm.normalize_to(&solid_image(8, 6, 10)).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 6, 8]);
    }

    #[test]
    fn test_chw_and_hwc_hold_same_values() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([10, 20, 30]));
        img.put_pixel(1, 0, Rgb([40, 50, 60]));

        let chw = NormalizeImage::for_mobilenet_v2(ChannelOrder::CHW)
            .unwrap()
            .normalize_to(&img)
            .unwrap();
        let hwc = NormalizeImage::for_mobilenet_v2(ChannelOrder::HWC)
            .unwrap()
            .normalize_to(&img)
            .unwrap();

        for c in 0..3 {
            for x in 0..2 {
                assert_eq!(chw[[0, c, 0, x]], hwc[[0, 0, x, c]]);
            }
        }
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(NormalizeImage::new(0.0, vec![1.0; 3], vec![1.0; 3], ChannelOrder::HWC).is_err());
        assert!(NormalizeImage::new(1.0, vec![1.0; 2], vec![1.0; 3], ChannelOrder::HWC).is_err());
        assert!(
            NormalizeImage::new(1.0, vec![1.0; 3], vec![1.0, 0.0, 1.0], ChannelOrder::HWC)
                .is_err()
        );
    }
}
