//! # Rasters and the Tri-tone Palette
//!
//! Two pixel buffers flow through the pipeline:
//!
//! - [`RgbRaster`]: full-color composite, 3 bytes per pixel
//! - [`TriRaster`]: one palette index per pixel (white, black, accent)
//!
//! Both always hold exactly `width * height` pixels.

use image::{Rgb, RgbImage};

use crate::canvas;

/// Fixed device palette.
///
/// | index | color |
/// |-------|-------|
/// | 0 | white |
/// | 1 | black |
/// | 2 | accent (red) |
/// | 3 | reserved, never produced |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PaletteIndex {
    White = 0,
    Black = 1,
    Accent = 2,
    Reserved = 3,
}

impl PaletteIndex {
    /// The three indices the quantizer may emit.
    pub const USABLE: [PaletteIndex; 3] =
        [PaletteIndex::White, PaletteIndex::Black, PaletteIndex::Accent];

    pub fn from_bits(bits: u8) -> PaletteIndex {
        match bits & 0b11 {
            0 => PaletteIndex::White,
            1 => PaletteIndex::Black,
            2 => PaletteIndex::Accent,
            _ => PaletteIndex::Reserved,
        }
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Display color used when a tri raster is expanded back to RGB.
    pub fn rgb(self) -> Rgb<u8> {
        match self {
            PaletteIndex::White => WHITE,
            PaletteIndex::Black => BLACK,
            PaletteIndex::Accent => ACCENT,
            // Rendered like white; the device treats it as unused.
            PaletteIndex::Reserved => WHITE,
        }
    }
}

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const ACCENT: Rgb<u8> = Rgb([220, 0, 0]);

/// Full-color raster.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbRaster {
    image: RgbImage,
}

impl RgbRaster {
    /// Raster of the given size filled with one color.
    pub fn filled(width: u32, height: u32, color: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, color),
        }
    }

    /// White raster at the canvas size.
    pub fn blank_canvas() -> Self {
        Self::filled(canvas::WIDTH, canvas::HEIGHT, WHITE)
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    /// Build a raster from a per-pixel function.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: FnMut(u32, u32) -> Rgb<u8>,
    {
        Self {
            image: RgbImage::from_fn(width, height, f),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn get(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn put(&mut self, x: u32, y: u32, color: Rgb<u8>) {
        self.image.put_pixel(x, y, color);
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Raw RGB bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

/// Palette-indexed raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriRaster {
    width: u32,
    height: u32,
    pixels: Vec<PaletteIndex>,
}

impl TriRaster {
    /// All-white raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![PaletteIndex::White; width as usize * height as usize],
        }
    }

    /// Wrap row-major indices. Returns `None` if the length does not match.
    pub fn from_indices(width: u32, height: u32, pixels: Vec<PaletteIndex>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> PaletteIndex {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, index: PaletteIndex) {
        self.pixels[y as usize * self.width as usize + x as usize] = index;
    }

    pub fn pixels(&self) -> &[PaletteIndex] {
        &self.pixels
    }

    pub fn row(&self, y: u32) -> &[PaletteIndex] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    /// Pixel count per palette index.
    pub fn histogram(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for px in &self.pixels {
            counts[px.bits() as usize] += 1;
        }
        counts
    }

    /// Expand to RGB using the palette display colors.
    pub fn to_rgb(&self) -> RgbRaster {
        RgbRaster::from_fn(self.width, self.height, |x, y| self.get(x, y).rgb())
    }
}

/// Either raster variant, as accepted by the PNG encoder.
#[derive(Debug, Clone, Copy)]
pub enum Raster<'a> {
    Rgb(&'a RgbRaster),
    Tri(&'a TriRaster),
}

impl Raster<'_> {
    pub fn width(&self) -> u32 {
        match self {
            Raster::Rgb(r) => r.width(),
            Raster::Tri(r) => r.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Raster::Rgb(r) => r.height(),
            Raster::Tri(r) => r.height(),
        }
    }
}

impl<'a> From<&'a RgbRaster> for Raster<'a> {
    fn from(r: &'a RgbRaster) -> Self {
        Raster::Rgb(r)
    }
}

impl<'a> From<&'a TriRaster> for Raster<'a> {
    fn from(r: &'a TriRaster) -> Self {
        Raster::Tri(r)
    }
}
