//! Sort-key extraction and quantization.
//!
//! A channel maps a color (plus its palette position) to a scalar key.
//! Quantization buckets keys by a grain derived from the channel's
//! natural range, so near-equal keys compare as ties and a stable sort
//! keeps their original order.

use rand::Rng;

use crate::color::Color;

/// Floor for nonzero grains; also the "no quantization" sentinel is 0.
const MIN_GRAIN: f64 = 1e-9;

/// A scalar property derived from a color (plus its position) used as a
/// sort key. The Lab/LCHab selectors exist only when the `lab` feature
/// is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ChannelSelector {
    Red,
    Green,
    Blue,
    /// YIQ luma.
    Luma,
    /// HSV hue in degrees.
    Hue,
    /// HSV saturation.
    SatHsv,
    /// HSV value.
    Value,
    /// HSL saturation.
    SatHsl,
    /// HSL lightness.
    Lightness,
    /// Current palette position; sorting ascending by this restores the
    /// original order.
    Index,
    /// A fresh uniform integer in [0, 2^31) on every evaluation.
    Random,
    #[cfg(feature = "lab")]
    LabL,
    #[cfg(feature = "lab")]
    LabA,
    #[cfg(feature = "lab")]
    LabB,
    /// LCHab chroma.
    #[cfg(feature = "lab")]
    LchC,
    /// LCHab hue in degrees.
    #[cfg(feature = "lab")]
    LchH,
}

/// Natural range of a channel, sized so that `scale / q` splits the
/// channel into roughly `q` buckets. `capacity` is the palette size,
/// which only the Index channel spans.
pub fn scale(channel: ChannelSelector, capacity: usize) -> f64 {
    use ChannelSelector::*;
    match channel {
        Red | Green | Blue | Luma => 256.0,
        Hue => 360.0,
        SatHsv | Value | SatHsl | Lightness => 1.0,
        Index => capacity as f64,
        Random => (1u64 << 31) as f64,
        #[cfg(feature = "lab")]
        LabL => 100.0,
        #[cfg(feature = "lab")]
        LabA | LabB => 256.0,
        #[cfg(feature = "lab")]
        LchC => 128.0,
        #[cfg(feature = "lab")]
        LchH => 360.0,
    }
}

/// Bucket width for quantized comparison. `quantize <= 1` disables
/// quantization entirely (grain 0 means exact keys).
pub fn grain(channel: ChannelSelector, quantize: f64, capacity: usize) -> f64 {
    if quantize <= 1.0 {
        0.0
    } else {
        (scale(channel, capacity) / quantize).max(MIN_GRAIN)
    }
}

/// Snap a raw key to the bottom of its quantization bucket.
pub fn bucket(key: f64, grain: f64) -> f64 {
    if grain <= 0.0 {
        key
    } else {
        key - key.rem_euclid(grain)
    }
}

/// Extract the raw sort key for one palette entry.
pub fn sort_key(channel: ChannelSelector, color: Color, position: usize) -> f64 {
    use ChannelSelector::*;
    match channel {
        Red => color.r as f64,
        Green => color.g as f64,
        Blue => color.b as f64,
        Luma => color.luma(),
        Hue => color.to_hsv().hue.into_positive_degrees() as f64,
        SatHsv => color.to_hsv().saturation as f64,
        Value => color.to_hsv().value as f64,
        SatHsl => color.to_hsl().saturation as f64,
        Lightness => color.to_hsl().lightness as f64,
        Index => position as f64,
        Random => rand::thread_rng().gen_range(0..(1i64 << 31)) as f64,
        #[cfg(feature = "lab")]
        LabL => color.to_lab().l as f64,
        #[cfg(feature = "lab")]
        LabA => color.to_lab().a as f64,
        #[cfg(feature = "lab")]
        LabB => color.to_lab().b as f64,
        #[cfg(feature = "lab")]
        LchC => color.to_lch().chroma as f64,
        #[cfg(feature = "lab")]
        LchH => color.to_lch().hue.into_positive_degrees() as f64,
    }
}
