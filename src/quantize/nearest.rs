//! Nearest-color quantization (level 0).

use rayon::prelude::*;

use super::{Quantize, classify};
use crate::raster::{PaletteIndex, RgbRaster, TriRaster};

/// Maps every pixel independently through the shared decision rule.
///
/// No error diffusion: flat regions stay flat and exact palette colors are
/// a fixed point, so quantizing an already tri-tone raster is idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestColor;

impl Quantize for NearestColor {
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
                        *out = classify(r, g, b);
                    }
                });
        }

        TriRaster::from_indices(raster.width(), height, pixels)
            .unwrap_or_else(|| TriRaster::new(raster.width(), height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_maps_each_pixel_independently() {
        let raster = RgbRaster::from_fn(3, 1, |x, _| match x {
            0 => Rgb([240, 240, 240]),
            1 => Rgb([30, 30, 30]),
            _ => Rgb([230, 50, 40]),
        });
        let tri = NearestColor.quantize(&raster);
        assert_eq!(
            tri.pixels(),
            &[PaletteIndex::White, PaletteIndex::Black, PaletteIndex::Accent]
        );
    }

    #[test]
    fn test_idempotent_on_expanded_output() {
        let raster = RgbRaster::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 60]));
        let once = NearestColor.quantize(&raster);
        let twice = NearestColor.quantize(&once.to_rgb());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_flat_gray_stays_flat() {
        let raster = RgbRaster::filled(8, 8, Rgb([100, 100, 100]));
        let tri = NearestColor.quantize(&raster);
        assert_eq!(tri.histogram(), [0, 64, 0, 0]);
    }
}
