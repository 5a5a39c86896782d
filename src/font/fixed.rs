use super::FontFace;

/// Face where every character is a solid box with the same advance.
///
/// Widths are trivially predictable, which makes layout tests exact.
#[derive(Debug, Clone, Copy)]
pub struct FixedFace {
    advance: u32,
    line_height: u32,
}

impl FixedFace {
    pub fn new(advance: u32, line_height: u32) -> Self {
        Self {
            advance,
            line_height,
        }
    }
}

impl FontFace for FixedFace {
    fn advance(&self, _ch: char) -> u32 {
        self.advance
    }

    fn line_height(&self) -> u32 {
        self.line_height
    }

    fn draw_glyph(&self, ch: char, x: i32, y: i32, plot: &mut dyn FnMut(i32, i32, f32)) {
        if ch.is_whitespace() {
            return;
        }
        // One column of spacing so adjacent boxes stay distinguishable
        for row in 0..self.line_height as i32 {
            for col in 0..self.advance.saturating_sub(1) as i32 {
                plot(x + col, y + row, 1.0);
            }
        }
    }
}
