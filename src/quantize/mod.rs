//! # Tri-tone Quantization
//!
//! Reduces a full-color [`RgbRaster`] to a [`TriRaster`] holding only the
//! three usable palette entries: white, black and accent.
//!
//! ## Color Decision
//!
//! Every strategy shares one decision rule:
//!
//! ```text
//! r > 160 && g < 120 && b < 120     → accent
//! else luminance(r, g, b) < 128     → black
//! else                              → white
//! ```
//!
//! with Rec. 709 luminance `0.2126 r + 0.7152 g + 0.0722 b`. Exact palette
//! colors always map to themselves.
//!
//! ## Strategies
//!
//! | level | strategy | notes |
//! |-------|----------|-------|
//! | 0 | [`NearestColor`] | independent per pixel |
//! | 1 | [`Ordered`] | Bayer 4x4 threshold perturbation |
//! | 2 | [`ErrorDiffusion`] raster | Floyd-Steinberg, left-to-right |
//! | 3 | [`ErrorDiffusion`] serpentine | Floyd-Steinberg, alternating rows |
//!
//! All strategies are deterministic: the same raster and level always give
//! the same output.

mod diffusion;
mod nearest;
mod ordered;

pub use diffusion::{ErrorDiffusion, ScanOrder};
pub use nearest::NearestColor;
pub use ordered::{BAYER4, Ordered};

use crate::error::ValidationError;
use crate::raster::{PaletteIndex, RgbRaster, TriRaster};

/// Luminance below which a non-accent color becomes black.
pub const LUMA_THRESHOLD: f32 = 128.0;

/// Accent detection bounds.
pub const ACCENT_MIN_RED: f32 = 160.0;
pub const ACCENT_MAX_GREEN: f32 = 120.0;
pub const ACCENT_MAX_BLUE: f32 = 120.0;

/// Common contract of every quantization strategy.
pub trait Quantize {
    /// Map each pixel of `raster` to a usable palette index.
    ///
    /// The output has the same dimensions as the input and never contains
    /// [`PaletteIndex::Reserved`].
    fn quantize(&self, raster: &RgbRaster) -> TriRaster;
}

/// Strategy selected once per render from the integer dither level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DitherStrategy {
    NearestColor,
    Ordered,
    ErrorDiffusion(ScanOrder),
}

impl DitherStrategy {
    /// Resolve a dither level (0..=3).
    pub fn from_level(level: i64) -> Result<Self, ValidationError> {
        match level {
            0 => Ok(DitherStrategy::NearestColor),
            1 => Ok(DitherStrategy::Ordered),
            2 => Ok(DitherStrategy::ErrorDiffusion(ScanOrder::Raster)),
            3 => Ok(DitherStrategy::ErrorDiffusion(ScanOrder::Serpentine)),
            other => Err(ValidationError::DitherLevel(other)),
        }
    }

    pub fn level(self) -> u8 {
        match self {
            DitherStrategy::NearestColor => 0,
            DitherStrategy::Ordered => 1,
            DitherStrategy::ErrorDiffusion(ScanOrder::Raster) => 2,
            DitherStrategy::ErrorDiffusion(ScanOrder::Serpentine) => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DitherStrategy::NearestColor => "nearest-color",
            DitherStrategy::Ordered => "ordered-bayer4",
            DitherStrategy::ErrorDiffusion(ScanOrder::Raster) => "floyd-steinberg",
            DitherStrategy::ErrorDiffusion(ScanOrder::Serpentine) => "floyd-steinberg-serpentine",
        }
    }
}

impl Quantize for DitherStrategy {
    fn quantize(&self, raster: &RgbRaster) -> TriRaster {
        tracing::debug!(
            strategy = self.name(),
            width = raster.width(),
            height = raster.height(),
            "quantizing raster"
        );
        match *self {
            DitherStrategy::NearestColor => NearestColor.quantize(raster),
            DitherStrategy::Ordered => Ordered.quantize(raster),
            DitherStrategy::ErrorDiffusion(scan) => ErrorDiffusion { scan }.quantize(raster),
        }
    }
}

/// Convenience wrapper: validate `level` and quantize.
pub fn quantize(raster: &RgbRaster, level: i64) -> Result<TriRaster, ValidationError> {
    Ok(DitherStrategy::from_level(level)?.quantize(raster))
}

#[inline]
pub(crate) fn is_accent(r: f32, g: f32, b: f32) -> bool {
    r > ACCENT_MIN_RED && g < ACCENT_MAX_GREEN && b < ACCENT_MAX_BLUE
}

#[inline]
pub(crate) fn luma(r: f32, g: f32, b: f32) -> f32 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Shared decision rule; `bias` shifts luminance before thresholding.
#[inline]
pub(crate) fn classify_biased(r: f32, g: f32, b: f32, bias: f32) -> PaletteIndex {
    if is_accent(r, g, b) {
        PaletteIndex::Accent
    } else if luma(r, g, b) + bias < LUMA_THRESHOLD {
        PaletteIndex::Black
    } else {
        PaletteIndex::White
    }
}

/// Decision rule for an sRGB pixel.
#[inline]
pub fn classify(r: u8, g: u8, b: u8) -> PaletteIndex {
    classify_biased(r as f32, g as f32, b as f32, 0.0)
}
