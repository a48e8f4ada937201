use anyhow::{bail, Result};
use palette::{Hsl, Hsv, IntoColor, Srgb};

#[cfg(feature = "lab")]
use palette::{Lab, Lch};

/// Core color type used throughout the sorter.
/// Wraps sRGB u8 components plus alpha and provides conversions to the
/// derived color models used as sort channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Fully opaque color from RGB components.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string like `#ff8800` or `#FF8800`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            bail!(
                "invalid hex color: expected 6 hex digits, got {}",
                hex.len()
            );
        }
        let r = u8::from_str_radix(&hex[0..2], 16)?;
        let g = u8::from_str_radix(&hex[2..4], 16)?;
        let b = u8::from_str_radix(&hex[4..6], 16)?;
        Ok(Self::rgb(r, g, b))
    }

    /// Serialize the RGB components to lowercase hex `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Compare RGB components only; alpha plays no role in sorting or
    /// endpoint matching.
    pub fn rgb_eq(self, other: Color) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    fn to_srgb_f32(self) -> Srgb<f32> {
        Srgb::new(self.r, self.g, self.b).into_format()
    }

    /// Convert to HSV (hue in degrees, saturation/value in [0, 1]).
    pub fn to_hsv(self) -> Hsv {
        self.to_srgb_f32().into_color()
    }

    /// Convert to HSL (hue in degrees, saturation/lightness in [0, 1]).
    pub fn to_hsl(self) -> Hsl {
        self.to_srgb_f32().into_color()
    }

    /// Convert to CIELAB.
    #[cfg(feature = "lab")]
    pub fn to_lab(self) -> Lab {
        self.to_srgb_f32().into_color()
    }

    /// Convert to LCHab (cylindrical CIELAB).
    #[cfg(feature = "lab")]
    pub fn to_lch(self) -> Lch {
        self.to_srgb_f32().into_color()
    }

    /// YIQ luma on the 0..255 scale: `0.299 R + 0.587 G + 0.114 B`.
    pub fn luma(self) -> f64 {
        0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64
    }

    /// WCAG 2.0 relative luminance.
    ///
    /// Linearizes each sRGB channel, then computes the weighted sum.
    pub fn relative_luminance(self) -> f32 {
        fn linearize(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let r = linearize(self.r);
        let g = linearize(self.g);
        let b = linearize(self.b);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
