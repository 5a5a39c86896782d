//! # Output Encoders
//!
//! - [`encode_png`]: lossless preview image from either raster variant
//! - [`encode_tri`] / [`decode_tri`]: the e-paper device binary
//!
//! Both encoders only accept canvas-sized rasters. Anything else is a
//! defect upstream and fails with [`CartelaError::Dimension`].

mod png;
mod tri;

pub use png::encode_png;
pub use tri::{HEADER_LEN, MAGIC, decode_tri, encode_tri, encoded_len, row_bytes};

use crate::canvas;
use crate::error::{CartelaError, Result};

/// Fail unless `(width, height)` is the canvas size.
pub(crate) fn check_canvas(width: u32, height: u32) -> Result<()> {
    if width == canvas::WIDTH && height == canvas::HEIGHT {
        Ok(())
    } else {
        Err(CartelaError::Dimension {
            expected_width: canvas::WIDTH,
            expected_height: canvas::HEIGHT,
            actual_width: width,
            actual_height: height,
        })
    }
}
