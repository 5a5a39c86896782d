//! TrueType faces rendered with ab_glyph.
//!
//! Glyph outlines are rasterized on demand with anti-aliased coverage; the
//! compositor blends that coverage and the quantizer decides the final ink.

use ab_glyph::{Font, FontArc, ScaleFont};

use super::FontFace;
use crate::error::{CartelaError, Result};

/// A TrueType font at one pixel height.
pub struct TtfFace {
    font: FontArc,
    pixel_height: f32,
}

impl TtfFace {
    /// Parse font file bytes.
    pub fn family(bytes: Vec<u8>) -> Result<FontArc> {
        FontArc::try_from_vec(bytes)
            .map_err(|e| CartelaError::Resource(format!("Failed to parse TrueType font: {}", e)))
    }

    pub fn new(font: FontArc, pixel_height: f32) -> Self {
        Self { font, pixel_height }
    }
}

impl FontFace for TtfFace {
    fn advance(&self, ch: char) -> u32 {
        let scaled = self.font.as_scaled(self.pixel_height);
        scaled.h_advance(self.font.glyph_id(ch)).round().max(0.0) as u32
    }

    fn line_height(&self) -> u32 {
        let scaled = self.font.as_scaled(self.pixel_height);
        (scaled.ascent() - scaled.descent()).ceil().max(1.0) as u32
    }

    fn draw_glyph(&self, ch: char, x: i32, y: i32, plot: &mut dyn FnMut(i32, i32, f32)) {
        let ascent = self.font.as_scaled(self.pixel_height).ascent();
        let glyph = self.font.glyph_id(ch).with_scale_and_position(
            self.pixel_height,
            ab_glyph::point(x as f32, y as f32 + ascent),
        );

        if let Some(outlined) = self.font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                plot(
                    px as i32 + bounds.min.x as i32,
                    py as i32 + bounds.min.y as i32,
                    coverage.min(1.0),
                );
            });
        }
    }
}
