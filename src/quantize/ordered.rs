//! Ordered dithering with a 4x4 Bayer matrix (level 1).
//!
//! A periodic threshold map shifts each pixel's luminance before the shared
//! decision rule runs:
//!
//! ```text
//!     0   1   2   3   (x mod 4)
//!   ┌───┬───┬───┬───┐
//! 0 │ 0 │ 8 │ 2 │10 │
//! 1 │12 │ 4 │14 │ 6 │
//! 2 │ 3 │11 │ 1 │ 9 │
//! 3 │15 │ 7 │13 │ 5 │
//!   └───┴───┴───┴───┘
//! (y mod 4)
//! ```
//!
//! The bias is `((m + 0.5) / 16 - 0.5) * 255`, so it stays within about
//! ±120 and pure white or black never flips. The accent decision is left
//! unbiased so accent strokes stay solid.

use rayon::prelude::*;

use super::{Quantize, classify_biased};
use crate::raster::{PaletteIndex, RgbRaster, TriRaster};

/// Bayer 4x4 threshold matrix, values 0-15.
pub const BAYER4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Luminance bias for a pixel position.
#[inline]
pub fn bias(x: usize, y: usize) -> f32 {
    let m = BAYER4[y & 3][x & 3] as f32;
    ((m + 0.5) / 16.0 - 0.5) * 255.0
}

/// Ordered Bayer dithering. Per-pixel and parallel by rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ordered;

impl Quantize for Ordered {
    fn quantize(&self, raster: &RgbRaster) -> TriRaster {
        let width = raster.width() as usize;
        let height = raster.height();
        let mut pixels = vec![PaletteIndex::White; width * height as usize];

        if width > 0 {
            pixels
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, out) in row.iter_mut().enumerate() {
                        let [r, g, b] = raster.get(x as u32, y as u32).0;
                        *out = classify_biased(r as f32, g as f32, b as f32, bias(x, y));
                    }
                });
        }

        TriRaster::from_indices(raster.width(), height, pixels)
            .unwrap_or_else(|| TriRaster::new(raster.width(), height))
    }
}
