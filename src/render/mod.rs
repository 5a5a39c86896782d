//! # Rendering Pipeline
//!
//! Runs a card through every stage:
//!
//! ```text
//! CardModel ─► LayoutEngine ─► DrawPlan ─► Compositor ─► RgbRaster
//!                                                          │
//!                        ┌─────────────────────────────────┤
//!                        ▼                                 ▼
//!                  encode_png (preview)        Quantize ─► TriRaster ─► encode_tri
//! ```
//!
//! Validation happens before any pixel work: a rejected card or dither
//! level produces no output at all. Each render is a pure function of its
//! inputs plus the read-only [`FontCache`], so independent renders may run
//! on separate threads.
//!
//! ## Usage Example
//!
//! ```
//! use cartela::card::CardModel;
//! use cartela::render;
//!
//! let card = CardModel {
//!     title: "T-Rex Skull".into(),
//!     bullets: vec!["Cretaceous".into(), "North America".into()],
//!     ..Default::default()
//! };
//!
//! let tri = render::render_tri(&card, 2).unwrap();
//! assert_eq!(&tri[..4], b"TRI1");
//! assert_eq!(tri.len(), 80408);
//! ```

mod composite;

pub use composite::Compositor;

use crate::card::CardModel;
use crate::encode::{encode_png, encode_tri};
use crate::error::{Result, ValidationError};
use crate::font::FontCache;
use crate::layout::LayoutEngine;
use crate::photo::PhotoTone;
use crate::quantize::{DitherStrategy, Quantize};
use crate::raster::{Raster, RgbRaster, TriRaster};

/// Per-render settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Quantization strategy resolved from the dither level.
    pub strategy: DitherStrategy,
    /// Preview shows the quantized tri-tone result instead of full color.
    pub device_accurate: bool,
    pub photo_tone: PhotoTone,
}

impl RenderConfig {
    /// Config for a dither level in 0..=3.
    pub fn new(dither_level: i64) -> std::result::Result<Self, ValidationError> {
        Ok(Self {
            strategy: DitherStrategy::from_level(dither_level)?,
            device_accurate: false,
            photo_tone: PhotoTone::default(),
        })
    }

    pub fn with_device_accurate(mut self, device_accurate: bool) -> Self {
        self.device_accurate = device_accurate;
        self
    }

    pub fn with_photo_tone(mut self, photo_tone: PhotoTone) -> Self {
        self.photo_tone = photo_tone;
        self
    }

    pub fn dither_level(&self) -> u8 {
        self.strategy.level()
    }
}

/// Output format requested from [`CardRenderer::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Tri,
}

/// Encoded outputs of one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutput {
    pub png: Option<Vec<u8>>,
    pub tri: Option<Vec<u8>>,
}

/// Card renderer bound to a font cache.
#[derive(Clone, Copy)]
pub struct CardRenderer<'a> {
    fonts: &'a FontCache,
}

impl<'a> CardRenderer<'a> {
    pub fn new(fonts: &'a FontCache) -> Self {
        Self { fonts }
    }

    /// Renderer over the process-wide font cache.
    pub fn shared() -> Result<CardRenderer<'static>> {
        Ok(CardRenderer::new(FontCache::shared()?))
    }

    /// Validate, lay out and composite `card` into a full-color raster.
    pub fn composite(&self, card: &CardModel, config: &RenderConfig) -> Result<RgbRaster> {
        card.validate()?;
        let plan = LayoutEngine::new(self.fonts).layout(card);
        Ok(Compositor::new(self.fonts, config.photo_tone).composite(&plan))
    }

    /// Composite and quantize `card` into a tri-tone raster.
    pub fn quantized(&self, card: &CardModel, config: &RenderConfig) -> Result<TriRaster> {
        let raster = self.composite(card, config)?;
        Ok(config.strategy.quantize(&raster))
    }

    /// PNG preview: full color, or the quantized result when
    /// `device_accurate` is set.
    pub fn render_preview(&self, card: &CardModel, config: &RenderConfig) -> Result<Vec<u8>> {
        let raster = self.composite(card, config)?;
        self.preview_png(&raster, config)
    }

    /// Device binary.
    pub fn render_tri(&self, card: &CardModel, config: &RenderConfig) -> Result<Vec<u8>> {
        let tri = self.quantized(card, config)?;
        encode_tri(&tri)
    }

    /// Render several formats from a single composite.
    pub fn render(
        &self,
        card: &CardModel,
        config: &RenderConfig,
        formats: &[OutputFormat],
    ) -> Result<RenderOutput> {
        let raster = self.composite(card, config)?;
        let mut output = RenderOutput::default();

        if formats.contains(&OutputFormat::Png) {
            output.png = Some(self.preview_png(&raster, config)?);
        }
        if formats.contains(&OutputFormat::Tri) {
            let tri = config.strategy.quantize(&raster);
            output.tri = Some(encode_tri(&tri)?);
        }

        tracing::debug!(
            dither = config.dither_level(),
            png_bytes = output.png.as_ref().map(Vec::len),
            tri_bytes = output.tri.as_ref().map(Vec::len),
            "card rendered"
        );
        Ok(output)
    }

    fn preview_png(&self, raster: &RgbRaster, config: &RenderConfig) -> Result<Vec<u8>> {
        if config.device_accurate {
            let tri = config.strategy.quantize(raster);
            encode_png(&Raster::Tri(&tri))
        } else {
            encode_png(&Raster::Rgb(raster))
        }
    }
}

/// Full-color PNG preview using the shared font cache.
pub fn render_preview(card: &CardModel, dither_level: i64) -> Result<Vec<u8>> {
    let config = RenderConfig::new(dither_level)?;
    card.validate()?;
    CardRenderer::shared()?.render_preview(card, &config)
}

/// TRI device binary using the shared font cache.
pub fn render_tri(card: &CardModel, dither_level: i64) -> Result<Vec<u8>> {
    let config = RenderConfig::new(dither_level)?;
    card.validate()?;
    CardRenderer::shared()?.render_tri(card, &config)
}
