//! TRI device binary.
//!
//! ```text
//! offset  size  field
//! 0       4     "TRI1"
//! 4       2     width,  big-endian u16 (480)
//! 6       2     height, big-endian u16 (670)
//! 8       N     pixels, 2 bits each
//! ```
//!
//! Pixels are packed four per byte, the most significant bit pair holding
//! the leftmost pixel. Each row takes `ceil(width / 4)` bytes and rows follow
//! each other top to bottom, so a canvas encodes to `8 + 670 * 120 = 80408`
//! bytes.

use super::check_canvas;
use crate::error::{CartelaError, Result};
use crate::raster::{PaletteIndex, TriRaster};

pub const MAGIC: &[u8; 4] = b"TRI1";
pub const HEADER_LEN: usize = 8;

const PIXELS_PER_BYTE: usize = 4;

/// Bytes per packed row.
#[inline]
pub fn row_bytes(width: u32) -> usize {
    (width as usize).div_ceil(PIXELS_PER_BYTE)
}

/// Total encoded length for a raster of the given size.
pub fn encoded_len(width: u32, height: u32) -> usize {
    HEADER_LEN + row_bytes(width) * height as usize
}

/// Encode a canvas-sized tri raster.
pub fn encode_tri(raster: &TriRaster) -> Result<Vec<u8>> {
    let (width, height) = (raster.width(), raster.height());
    check_canvas(width, height)?;

    let mut out = Vec::with_capacity(encoded_len(width, height));
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&(width as u16).to_be_bytes());
    out.extend_from_slice(&(height as u16).to_be_bytes());

    for y in 0..height {
        for group in raster.row(y).chunks(PIXELS_PER_BYTE) {
            let mut byte = 0u8;
            for (i, &index) in group.iter().enumerate() {
                byte |= device_bits(index) << (6 - 2 * i);
            }
            out.push(byte);
        }
    }

    tracing::debug!(bytes = out.len(), "encoded TRI binary");
    Ok(out)
}

/// Decode a TRI binary back into a tri raster.
///
/// Checks the magic, the canvas dimensions and the payload length, and
/// rejects the reserved palette index.
pub fn decode_tri(bytes: &[u8]) -> Result<TriRaster> {
    if bytes.len() < HEADER_LEN {
        return Err(CartelaError::Decode(format!(
            "TRI header needs {} bytes, got {}",
            HEADER_LEN,
            bytes.len()
        )));
    }
    if &bytes[0..4] != MAGIC {
        return Err(CartelaError::Decode("missing TRI1 magic".to_string()));
    }

    let width = u16::from_be_bytes([bytes[4], bytes[5]]) as u32;
    let height = u16::from_be_bytes([bytes[6], bytes[7]]) as u32;
    check_canvas(width, height)?;

    let stride = row_bytes(width);
    let payload = &bytes[HEADER_LEN..];
    if payload.len() != stride * height as usize {
        return Err(CartelaError::Decode(format!(
            "expected {} payload bytes, got {}",
            stride * height as usize,
            payload.len()
        )));
    }

    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for (y, row) in payload.chunks(stride).enumerate() {
        for x in 0..width as usize {
            let shift = 6 - 2 * (x % PIXELS_PER_BYTE);
            let index = PaletteIndex::from_bits(row[x / PIXELS_PER_BYTE] >> shift);
            if index == PaletteIndex::Reserved {
                return Err(CartelaError::Decode(format!(
                    "reserved palette index at ({}, {})",
                    x, y
                )));
            }
            pixels.push(index);
        }
    }

    TriRaster::from_indices(width, height, pixels)
        .ok_or_else(|| CartelaError::Decode("pixel count does not match header".to_string()))
}

/// Two-bit device code; the reserved index is never sent to the panel.
#[inline]
fn device_bits(index: PaletteIndex) -> u8 {
    match index {
        PaletteIndex::Reserved => PaletteIndex::White.bits(),
        other => other.bits(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{HEIGHT, WIDTH};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lengths() {
        assert_eq!(row_bytes(480), 120);
        assert_eq!(row_bytes(5), 2);
        assert_eq!(encoded_len(WIDTH, HEIGHT), 80408);
    }

    #[test]
    fn test_header() {
        let bytes = encode_tri(&TriRaster::new(WIDTH, HEIGHT)).unwrap();
        assert_eq!(&bytes[..8], &[b'T', b'R', b'I', b'1', 0x01, 0xE0, 0x02, 0x9E]);
        assert_eq!(bytes.len(), 80408);
        assert!(bytes[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_msb_pair_is_leftmost_pixel() {
        let mut raster = TriRaster::new(WIDTH, HEIGHT);
        raster.set(0, 0, PaletteIndex::Black);
        raster.set(1, 0, PaletteIndex::Accent);
        raster.set(3, 0, PaletteIndex::Black);
        raster.set(4, 1, PaletteIndex::Accent);
        let bytes = encode_tri(&raster).unwrap();

        // 01 10 00 01
        assert_eq!(bytes[HEADER_LEN], 0b0110_0001);
        // Row 1 starts 120 bytes later; pixel 4 is the MSB pair of its second byte
        assert_eq!(bytes[HEADER_LEN + 120 + 1], 0b1000_0000);
    }

    #[test]
    fn test_reserved_is_sent_as_white() {
        let mut raster = TriRaster::new(WIDTH, HEIGHT);
        raster.set(0, 0, PaletteIndex::Reserved);
        let bytes = encode_tri(&raster).unwrap();
        assert_eq!(bytes[HEADER_LEN], 0);
    }

    #[test]
    fn test_decode_inverts_encode() {
        let mut raster = TriRaster::new(WIDTH, HEIGHT);
        for x in 0..WIDTH {
            raster.set(x, x % HEIGHT, PaletteIndex::USABLE[(x % 3) as usize]);
        }
        let decoded = decode_tri(&encode_tri(&raster).unwrap()).unwrap();
        assert_eq!(decoded, raster);
    }

    #[test]
    fn test_encode_rejects_wrong_size() {
        let err = encode_tri(&TriRaster::new(4, 4)).unwrap_err();
        assert!(matches!(err, CartelaError::Dimension { .. }));
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        let good = encode_tri(&TriRaster::new(WIDTH, HEIGHT)).unwrap();

        assert!(matches!(decode_tri(&good[..5]), Err(CartelaError::Decode(_))));

        let mut bad_magic = good.clone();
        bad_magic[3] = b'2';
        assert!(matches!(decode_tri(&bad_magic), Err(CartelaError::Decode(_))));

        let mut bad_size = good.clone();
        bad_size[5] = 0xE1;
        assert!(matches!(decode_tri(&bad_size), Err(CartelaError::Dimension { .. })));

        assert!(matches!(
            decode_tri(&good[..good.len() - 1]),
            Err(CartelaError::Decode(_))
        ));

        let mut reserved = good;
        reserved[HEADER_LEN] = 0b1100_0000;
        assert!(matches!(decode_tri(&reserved), Err(CartelaError::Decode(_))));
    }
}
