use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::check_canvas;
use crate::error::{CartelaError, Result};
use crate::raster::Raster;

/// Encode a raster as an RGB PNG.
///
/// Tri rasters are expanded to their palette display colors first. Output is
/// byte-identical for identical pixels.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>> {
    check_canvas(raster.width(), raster.height())?;

    let expanded;
    let rgb = match *raster {
        Raster::Rgb(rgb) => rgb,
        Raster::Tri(tri) => {
            expanded = tri.to_rgb();
            &expanded
        }
    };

    let mut png_bytes = Vec::new();
    PngEncoder::new(&mut png_bytes)
        .write_image(
            rgb.as_bytes(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e: image::ImageError| CartelaError::Encode(e.to_string()))?;

    tracing::debug!(bytes = png_bytes.len(), "encoded PNG preview");
    Ok(png_bytes)
}
