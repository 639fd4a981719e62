//! Type definitions used across the processors module.

/// Specifies the order of channels in an image tensor.
///
/// Keras-exported models consume NHWC; models converted with a channel
/// transpose consume NCHW.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ChannelOrder {
    /// Channels-first layout: `[C, H, W]`.
    CHW,
    /// Channels-last layout: `[H, W, C]`.
    HWC,
}
