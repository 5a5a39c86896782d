//! # Canvas Geometry
//!
//! The label canvas is fixed for every stage of the pipeline:
//!
//! ```text
//! (0,0) ─────────────────────────► X (480 px)
//!   │  ┌──28──┬──── 424 content ────┬──28──┐
//!   │  │      │                      │      │
//!   ▼  │      │                      │      │
//!   Y (670 px)
//! ```

/// Canvas width in device pixels.
pub const WIDTH: u32 = 480;

/// Canvas height in device pixels.
pub const HEIGHT: u32 = 670;

/// Left and right margin.
pub const MARGIN: u32 = 28;

/// Width available to content between the margins.
pub const CONTENT_WIDTH: u32 = WIDTH - 2 * MARGIN;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the rectangle lies entirely on the canvas.
    pub fn within_canvas(&self) -> bool {
        self.right() <= WIDTH && self.bottom() <= HEIGHT
    }

    /// Clip to the canvas bounds.
    pub fn clip_to_canvas(&self) -> Rect {
        let x = self.x.min(WIDTH);
        let y = self.y.min(HEIGHT);
        Rect {
            x,
            y,
            width: self.right().min(WIDTH) - x,
            height: self.bottom().min(HEIGHT) - y,
        }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}
