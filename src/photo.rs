//! Decoded photo pixels handed to the renderer.
//!
//! The renderer never resolves paths or URLs itself: callers decode the
//! photo referenced by `imagePath` and attach it to the card. [`Photo`] is
//! a cheap-to-clone handle around the decoded RGBA pixels.

use image::{DynamicImage, Rgba, RgbaImage};
use std::fmt;
use std::sync::Arc;

use crate::error::{CartelaError, Result};

/// Channel value above which a pixel counts as background white.
const WHITE_KNOCKOUT: u8 = 235;

/// How photo pixels are toned before compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhotoTone {
    /// Knock out near-white background and convert to grayscale.
    #[default]
    Museum,
    /// Keep the photo as supplied.
    Color,
}

/// Decoded photo pixels.
#[derive(Clone)]
pub struct Photo {
    pixels: Arc<RgbaImage>,
}

impl Photo {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            pixels: Arc::new(image.into_rgba8()),
        }
    }

    /// Decode an encoded image (PNG, JPEG, ...; HEIC with the `heif` feature).
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if is_heic(bytes) {
            return decode_heic(bytes).map(Self::new);
        }

        image::load_from_memory(bytes)
            .map(Self::new)
            .map_err(|e| CartelaError::Image(format!("Failed to decode image: {}", e)))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Pixels with the given tone applied.
    pub fn toned(&self, tone: PhotoTone) -> RgbaImage {
        match tone {
            PhotoTone::Color => (*self.pixels).clone(),
            PhotoTone::Museum => {
                let mut out = (*self.pixels).clone();
                for px in out.pixels_mut() {
                    let Rgba([r, g, b, a]) = *px;
                    if r > WHITE_KNOCKOUT && g > WHITE_KNOCKOUT && b > WHITE_KNOCKOUT {
                        *px = Rgba([255, 255, 255, 0]);
                    } else {
                        let luma = luminance(r, g, b).round().clamp(0.0, 255.0) as u8;
                        *px = Rgba([luma, luma, luma, a]);
                    }
                }
                out
            }
        }
    }
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Photo({}x{})", self.width(), self.height())
    }
}

/// Rec. 709 luminance of an sRGB triple, 0.0..=255.0.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32
}

fn is_heic(data: &[u8]) -> bool {
    if data.len() < 12 || &data[4..8] != b"ftyp" {
        return false;
    }

    matches!(
        &data[8..12],
        b"heic"
            | b"heix"
            | b"hevc"
            | b"hevx"
            | b"heim"
            | b"heis"
            | b"hevm"
            | b"hevs"
            | b"mif1"
            | b"msf1"
    )
}

#[cfg(feature = "heif")]
fn decode_heic(data: &[u8]) -> Result<DynamicImage> {
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let lib_heif = LibHeif::new();
    let ctx = HeifContext::read_from_bytes(data)
        .map_err(|e| CartelaError::Image(format!("Failed to read HEIC: {}", e)))?;
    let handle = ctx
        .primary_image_handle()
        .map_err(|e| CartelaError::Image(format!("Failed to get primary image: {}", e)))?;
    let decoded = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(|e| CartelaError::Image(format!("Failed to decode HEIC image: {}", e)))?;

    let planes = decoded.planes();
    let interleaved = planes
        .interleaved
        .ok_or_else(|| CartelaError::Image("No interleaved RGB data in HEIC".to_string()))?;

    let (width, height) = (decoded.width(), decoded.height());
    let mut rgb = image::RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let offset = y as usize * interleaved.stride + x as usize * 3;
            if let Some(px) = interleaved.data.get(offset..offset + 3) {
                rgb.put_pixel(x, y, image::Rgb([px[0], px[1], px[2]]));
            }
        }
    }

    Ok(DynamicImage::ImageRgb8(rgb))
}

#[cfg(not(feature = "heif"))]
fn decode_heic(_data: &[u8]) -> Result<DynamicImage> {
    Err(CartelaError::Image(
        "HEIC photos need the `heif` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo_from(pixels: &[[u8; 4]], width: u32) -> Photo {
        let height = pixels.len() as u32 / width;
        let mut img = RgbaImage::new(width, height);
        for (i, px) in pixels.iter().enumerate() {
            img.put_pixel(i as u32 % width, i as u32 / width, Rgba(*px));
        }
        Photo::new(DynamicImage::ImageRgba8(img))
    }

    #[test]
    fn test_museum_tone_knocks_out_white() {
        let photo = photo_from(&[[250, 240, 238, 255], [200, 40, 40, 255]], 2);
        let toned = photo.toned(PhotoTone::Museum);
        assert_eq!(toned.get_pixel(0, 0).0[3], 0);
        let Rgba([r, g, b, a]) = *toned.get_pixel(1, 0);
        assert_eq!((r, a), (g, 255));
        assert_eq!(g, b);
    }

    #[test]
    fn test_color_tone_is_untouched() {
        let photo = photo_from(&[[200, 40, 40, 255]], 1);
        assert_eq!(photo.toned(PhotoTone::Color).get_pixel(0, 0).0, [200, 40, 40, 255]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = Photo::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, CartelaError::Image(_)));
    }

    #[test]
    fn test_luminance_of_gray_is_identity() {
        assert!((luminance(100, 100, 100) - 100.0).abs() < 1e-3);
    }
}
