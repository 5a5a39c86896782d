//! The intermediate draw plan between layout and compositing.

use image::Rgb;

use crate::canvas::Rect;
use crate::font::FontRole;
use crate::photo::Photo;

/// A line of text at a fixed position.
///
/// `(x, y)` is the top-left of the line box. Glyphs past `x + max_width`
/// are clipped by the compositor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: u32,
    pub y: u32,
    pub font: FontRole,
    pub text: String,
    pub max_width: u32,
    pub color: Rgb<u8>,
}

/// A photo scaled to `scaled_width` x `scaled_height`, of which the window
/// starting at `(crop_x, crop_y)` lands in `dest`.
#[derive(Debug, Clone)]
pub struct ImageBlit {
    pub dest: Rect,
    pub photo: Photo,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub crop_x: u32,
    pub crop_y: u32,
}

#[derive(Debug, Clone)]
pub enum DrawOp {
    FillRect { rect: Rect, color: Rgb<u8> },
    StrokeRect { rect: Rect, width: u32, color: Rgb<u8> },
    Image(ImageBlit),
    Text(TextRun),
}

impl DrawOp {
    /// Paint order: shapes, then the photo, then text.
    fn layer(&self) -> u8 {
        match self {
            DrawOp::FillRect { .. } | DrawOp::StrokeRect { .. } => 0,
            DrawOp::Image(_) => 1,
            DrawOp::Text(_) => 2,
        }
    }
}

/// Ordered draw operations for one card, background to foreground.
#[derive(Debug, Clone, Default)]
pub struct DrawPlan {
    ops: Vec<DrawOp>,
}

impl DrawPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub fn fill(&mut self, rect: Rect, color: Rgb<u8>) {
        self.push(DrawOp::FillRect { rect, color });
    }

    pub fn stroke(&mut self, rect: Rect, width: u32, color: Rgb<u8>) {
        self.push(DrawOp::StrokeRect { rect, width, color });
    }

    /// Add a text run; empty text is skipped.
    pub fn text(&mut self, run: TextRun) {
        if !run.text.is_empty() {
            self.push(DrawOp::Text(run));
        }
    }

    /// Sort into paint order, keeping insertion order within a layer.
    pub fn finish(mut self) -> Self {
        self.ops.sort_by_key(DrawOp::layer);
        self
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageBlit> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Image(blit) => Some(blit),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{ACCENT, BLACK};

    fn run(text: &str) -> TextRun {
        TextRun {
            x: 0,
            y: 0,
            font: FontRole::Body,
            text: text.to_string(),
            max_width: 100,
            color: BLACK,
        }
    }

    #[test]
    fn test_empty_text_is_skipped() {
        let mut plan = DrawPlan::new();
        plan.text(run(""));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_finish_orders_shapes_before_text() {
        let mut plan = DrawPlan::new();
        plan.text(run("first"));
        plan.fill(Rect::new(0, 0, 4, 4), ACCENT);
        plan.text(run("second"));
        let plan = plan.finish();

        assert!(matches!(plan.ops()[0], DrawOp::FillRect { .. }));
        let texts: Vec<_> = plan.text_runs().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
    }
}
