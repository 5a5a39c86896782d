//! Floyd-Steinberg error diffusion (levels 2 and 3).
//!
//! Quantization error is carried in RGB and pushed to unprocessed
//! neighbours:
//!
//! ```text
//! left-to-right:        right-to-left:
//!        X   7/16        7/16   X
//! 3/16 5/16 1/16         1/16 5/16 3/16
//! ```
//!
//! [`ScanOrder::Raster`] walks every row left-to-right.
//! [`ScanOrder::Serpentine`] walks even rows left-to-right and odd rows
//! right-to-left with the kernel mirrored, which breaks up the diagonal
//! streaks a fixed direction leaves behind.
//!
//! Along the edges some taps fall outside the raster. Their weight is
//! shared out over the taps that remain, so every pixel except the very
//! last passes on all of its error. On gray input the ink total is then
//! fixed by the input alone, and both scan orders give the same number of
//! black and white pixels.

use super::{Quantize, classify_biased};
use crate::raster::{RgbRaster, TriRaster};

const RIGHT: f32 = 7.0 / 16.0;
const BELOW_BEHIND: f32 = 3.0 / 16.0;
const BELOW: f32 = 5.0 / 16.0;
const BELOW_AHEAD: f32 = 1.0 / 16.0;

/// Row traversal order for error diffusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOrder {
    /// Every row left-to-right.
    #[default]
    Raster,
    /// Alternate direction per row, starting left-to-right on row 0.
    Serpentine,
}

impl ScanOrder {
    #[inline]
    fn reversed(self, y: u32) -> bool {
        self == ScanOrder::Serpentine && y % 2 == 1
    }
}

/// Floyd-Steinberg error diffusion with a selectable scan order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorDiffusion {
    pub scan: ScanOrder,
}

impl ErrorDiffusion {
    pub fn raster() -> Self {
        Self {
            scan: ScanOrder::Raster,
        }
    }

    pub fn serpentine() -> Self {
        Self {
            scan: ScanOrder::Serpentine,
        }
    }
}

#[inline]
fn spread(target: &mut [f32; 3], error: [f32; 3], weight: f32) {
    for (t, e) in target.iter_mut().zip(error) {
        *t += e * weight;
    }
}

impl Quantize for ErrorDiffusion {
    fn quantize(&self, raster: &RgbRaster) -> TriRaster {
        let width = raster.width();
        let height = raster.height();
        let w = width as usize;
        let mut out = TriRaster::new(width, height);

        // Error rows: current row and the one below it
        let mut current = vec![[0.0f32; 3]; w];
        let mut below = vec![[0.0f32; 3]; w];

        for y in 0..height {
            let reversed = self.scan.reversed(y);
            let has_below = y + 1 < height;

            for step in 0..w {
                let x = if reversed { w - 1 - step } else { step };
                let (ahead, behind) = if reversed {
                    (x.checked_sub(1), (x + 1 < w).then_some(x + 1))
                } else {
                    ((x + 1 < w).then_some(x + 1), x.checked_sub(1))
                };

                let [r, g, b] = raster.get(x as u32, y).0;
                let acc = current[x];
                let want = [r as f32 + acc[0], g as f32 + acc[1], b as f32 + acc[2]];

                let index = classify_biased(want[0], want[1], want[2], 0.0);
                out.set(x as u32, y, index);

                let [pr, pg, pb] = index.rgb().0;
                let error = [want[0] - pr as f32, want[1] - pg as f32, want[2] - pb as f32];

                // (same row?, target column, weight)
                let below_row = |col: Option<usize>| col.filter(|_| has_below);
                let taps = [
                    (true, ahead, RIGHT),
                    (false, below_row(behind), BELOW_BEHIND),
                    (false, below_row(Some(x)), BELOW),
                    (false, below_row(ahead), BELOW_AHEAD),
                ];
                let total: f32 = taps
                    .iter()
                    .filter(|(_, col, _)| col.is_some())
                    .map(|(_, _, weight)| weight)
                    .sum();

                for (same_row, col, weight) in taps {
                    let Some(col) = col else { continue };
                    let target = if same_row {
                        &mut current[col]
                    } else {
                        &mut below[col]
                    };
                    spread(target, error, weight / total);
                }
            }

            std::mem::swap(&mut current, &mut below);
            below.fill([0.0; 3]);
        }

        out
    }
}
