//! Bitmap faces backed by the bundled Spleen PSF2 fonts.
//!
//! Glyphs are rasterized once at construction and scaled to the target cell
//! with nearest neighbor. Bold is synthetic: the glyph is stamped a second
//! time one pixel to the right.

use std::collections::HashMap;

use spleen_font::{FONT_6X12, FONT_12X24, PSF2Font};

use super::FontFace;
use crate::error::{CartelaError, Result};

/// Characters pre-rasterized into every face.
const EXTRA_CHARS: &str = "–—‘’“”•…€";

/// Which bundled Spleen font a face is cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpleenSource {
    /// 6x12
    Small,
    /// 12x24
    Large,
}

impl SpleenSource {
    fn font_data(self) -> &'static [u8] {
        match self {
            SpleenSource::Small => FONT_6X12,
            SpleenSource::Large => FONT_12X24,
        }
    }

    fn cell(self) -> (usize, usize) {
        match self {
            SpleenSource::Small => (6, 12),
            SpleenSource::Large => (12, 24),
        }
    }
}

/// Spleen glyphs scaled to a fixed cell.
pub struct SpleenFace {
    cell_width: usize,
    cell_height: usize,
    bold: bool,
    glyphs: HashMap<char, Vec<bool>>,
    tofu: Vec<bool>,
}

impl SpleenFace {
    pub fn new(
        source: SpleenSource,
        cell_width: u32,
        cell_height: u32,
        bold: bool,
    ) -> Result<Self> {
        let mut font = PSF2Font::new(source.font_data()).map_err(|_| {
            CartelaError::Resource("bundled Spleen font failed to parse".to_string())
        })?;
        let (src_w, src_h) = source.cell();
        let (cell_width, cell_height) = (cell_width as usize, cell_height as usize);

        let mut glyphs = HashMap::new();
        for ch in charset() {
            let utf8 = ch.to_string();
            let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) else {
                continue;
            };

            let mut src_bitmap = vec![false; src_w * src_h];
            for (row_y, row) in glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if row_y < src_h && col_x < src_w {
                        src_bitmap[row_y * src_w + col_x] = on;
                    }
                }
            }
            glyphs.insert(
                ch,
                scale_bitmap(&src_bitmap, src_w, src_h, cell_width, cell_height),
            );
        }

        if glyphs.is_empty() {
            return Err(CartelaError::Resource(
                "bundled Spleen font has no glyphs".to_string(),
            ));
        }

        tracing::debug!(
            glyphs = glyphs.len(),
            cell_width,
            cell_height,
            bold,
            "rasterized Spleen face"
        );

        Ok(Self {
            cell_width,
            cell_height,
            bold,
            glyphs,
            tofu: tofu_box(cell_width, cell_height),
        })
    }
}

impl FontFace for SpleenFace {
    fn advance(&self, _ch: char) -> u32 {
        (self.cell_width + usize::from(self.bold)) as u32
    }

    fn line_height(&self) -> u32 {
        self.cell_height as u32
    }

    fn draw_glyph(&self, ch: char, x: i32, y: i32, plot: &mut dyn FnMut(i32, i32, f32)) {
        let bitmap = self.glyphs.get(&ch).unwrap_or(&self.tofu);
        for row in 0..self.cell_height {
            for col in 0..self.cell_width {
                if !bitmap[row * self.cell_width + col] {
                    continue;
                }
                let (px, py) = (x + col as i32, y + row as i32);
                plot(px, py, 1.0);
                if self.bold {
                    plot(px + 1, py, 1.0);
                }
            }
        }
    }
}

fn charset() -> impl Iterator<Item = char> {
    (' '..='~')
        .chain('\u{a0}'..='\u{ff}')
        .chain(EXTRA_CHARS.chars())
}

/// Scale a bitmap using nearest neighbor.
fn scale_bitmap(src: &[bool], src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) -> Vec<bool> {
    let mut dst = vec![false; dst_w * dst_h];
    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = dx * src_w / dst_w;
            let sy = dy * src_h / dst_h;
            dst[dy * dst_w + dx] = src.get(sy * src_w + sx).copied().unwrap_or(false);
        }
    }
    dst
}

/// Outline box drawn for characters the font lacks.
fn tofu_box(width: usize, height: usize) -> Vec<bool> {
    let mut glyph = vec![false; width * height];
    if width == 0 || height == 0 {
        return glyph;
    }
    for x in 0..width {
        glyph[x] = true;
        glyph[(height - 1) * width + x] = true;
    }
    for y in 0..height {
        glyph[y * width] = true;
        glyph[y * width + width - 1] = true;
    }
    glyph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(face: &SpleenFace, ch: char) -> Vec<(i32, i32)> {
        let mut pixels = Vec::new();
        face.draw_glyph(ch, 0, 0, &mut |x, y, _| pixels.push((x, y)));
        pixels
    }

    #[test]
    fn test_scale_bitmap_doubles() {
        let src = [true, false, false, true];
        let dst = scale_bitmap(&src, 2, 2, 4, 4);
        assert_eq!(&dst[0..4], &[true, true, false, false]);
        assert_eq!(&dst[12..16], &[false, false, true, true]);
    }

    #[test]
    fn test_space_draws_nothing() {
        let face = SpleenFace::new(SpleenSource::Small, 6, 12, false).unwrap();
        assert!(lit(&face, ' ').is_empty());
        assert!(!lit(&face, 'A').is_empty());
    }

    #[test]
    fn test_bold_stamps_one_pixel_right() {
        let regular = SpleenFace::new(SpleenSource::Small, 6, 12, false).unwrap();
        let bold = SpleenFace::new(SpleenSource::Small, 6, 12, true).unwrap();
        let max_regular = lit(&regular, 'M').iter().map(|p| p.0).max().unwrap();
        let max_bold = lit(&bold, 'M').iter().map(|p| p.0).max().unwrap();
        assert_eq!(max_bold, max_regular + 1);
    }

    #[test]
    fn test_missing_glyph_draws_tofu() {
        let face = SpleenFace::new(SpleenSource::Small, 6, 12, false).unwrap();
        // CJK is outside the pre-rasterized set
        let pixels = lit(&face, '字');
        assert!(pixels.contains(&(0, 0)));
        assert!(pixels.contains(&(5, 11)));
        assert_eq!(face.advance('字'), 6);
    }

    #[test]
    fn test_glyphs_stay_inside_cell() {
        let face = SpleenFace::new(SpleenSource::Large, 24, 48, false).unwrap();
        for (x, y) in lit(&face, 'W') {
            assert!((0..24).contains(&x));
            assert!((0..48).contains(&y));
        }
    }
}
