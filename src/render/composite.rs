//! Executes a [`DrawPlan`] onto a white RGB canvas.

use image::imageops::{self, FilterType};
use image::Rgb;

use crate::canvas::{HEIGHT, Rect, WIDTH};
use crate::font::FontCache;
use crate::layout::{DrawOp, DrawPlan, ImageBlit, TextRun};
use crate::photo::PhotoTone;
use crate::raster::RgbRaster;

/// Paints draw plans with a given font cache and photo tone.
pub struct Compositor<'a> {
    fonts: &'a FontCache,
    tone: PhotoTone,
}

impl<'a> Compositor<'a> {
    pub fn new(fonts: &'a FontCache, tone: PhotoTone) -> Self {
        Self { fonts, tone }
    }

    /// Paint every operation of `plan` in order.
    pub fn composite(&self, plan: &DrawPlan) -> RgbRaster {
        let mut raster = RgbRaster::blank_canvas();
        for op in plan.ops() {
            match op {
                DrawOp::FillRect { rect, color } => fill_rect(&mut raster, *rect, *color),
                DrawOp::StrokeRect { rect, width, color } => {
                    stroke_rect(&mut raster, *rect, *width, *color)
                }
                DrawOp::Image(blit) => self.blit(&mut raster, blit),
                DrawOp::Text(run) => self.text(&mut raster, run),
            }
        }
        raster
    }

    fn blit(&self, raster: &mut RgbRaster, blit: &ImageBlit) {
        let toned = blit.photo.toned(self.tone);
        // Enlarging keeps hard pixel edges; shrinking averages
        let filter = if blit.scaled_width >= toned.width() {
            FilterType::Nearest
        } else {
            FilterType::Triangle
        };
        let scaled = imageops::resize(&toned, blit.scaled_width, blit.scaled_height, filter);

        let dest = blit.dest.clip_to_canvas();
        for dy in 0..dest.height {
            for dx in 0..dest.width {
                let (sx, sy) = (blit.crop_x + dx, blit.crop_y + dy);
                if sx >= scaled.width() || sy >= scaled.height() {
                    continue;
                }
                let [r, g, b, a] = scaled.get_pixel(sx, sy).0;
                // Photos sit on the white card, independent of earlier ops
                let alpha = a as f32 / 255.0;
                let over_white = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
                raster.put(
                    dest.x + dx,
                    dest.y + dy,
                    Rgb([over_white(r), over_white(g), over_white(b)]),
                );
            }
        }
    }

    fn text(&self, raster: &mut RgbRaster, run: &TextRun) {
        let face = self.fonts.face(run.font);
        let clip_right = (run.x + run.max_width).min(WIDTH) as i32;
        let Rgb(ink) = run.color;

        let mut plot = |x: i32, y: i32, coverage: f32| {
            if x < run.x as i32 || x >= clip_right || y < 0 || y >= HEIGHT as i32 {
                return;
            }
            let (x, y) = (x as u32, y as u32);
            let Rgb(under) = raster.get(x, y);
            let coverage = coverage.clamp(0.0, 1.0);
            let mix = |i: usize| {
                (ink[i] as f32 * coverage + under[i] as f32 * (1.0 - coverage)).round() as u8
            };
            raster.put(x, y, Rgb([mix(0), mix(1), mix(2)]));
        };

        let mut cursor = run.x as i32;
        for ch in run.text.chars() {
            if cursor >= clip_right {
                break;
            }
            face.draw_glyph(ch, cursor, run.y as i32, &mut plot);
            cursor += face.advance(ch) as i32;
        }
    }
}

fn fill_rect(raster: &mut RgbRaster, rect: Rect, color: Rgb<u8>) {
    let rect = rect.clip_to_canvas();
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            raster.put(x, y, color);
        }
    }
}

fn stroke_rect(raster: &mut RgbRaster, rect: Rect, width: u32, color: Rgb<u8>) {
    let w = width.min(rect.width / 2).min(rect.height / 2).max(1);
    fill_rect(raster, Rect::new(rect.x, rect.y, rect.width, w), color);
    fill_rect(raster, Rect::new(rect.x, rect.bottom() - w, rect.width, w), color);
    fill_rect(raster, Rect::new(rect.x, rect.y, w, rect.height), color);
    fill_rect(raster, Rect::new(rect.right() - w, rect.y, w, rect.height), color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontRole;
    use crate::photo::Photo;
    use crate::raster::{ACCENT, BLACK, WHITE};
    use image::{DynamicImage, Rgba, RgbaImage};

    fn run(text: &str, x: u32, max_width: u32) -> TextRun {
        TextRun {
            x,
            y: 100,
            font: FontRole::Small,
            text: text.to_string(),
            max_width,
            color: BLACK,
        }
    }

    #[test]
    fn test_empty_plan_is_white() {
        let fonts = FontCache::fixed_metrics();
        let raster = Compositor::new(&fonts, PhotoTone::Museum).composite(&DrawPlan::new());
        assert_eq!((raster.width(), raster.height()), (WIDTH, HEIGHT));
        assert!(raster.as_bytes().iter().all(|&b| b == 255));
    }

    #[test]
    fn test_fill_and_stroke() {
        let fonts = FontCache::fixed_metrics();
        let mut plan = DrawPlan::new();
        plan.fill(Rect::new(10, 10, 4, 4), ACCENT);
        plan.stroke(Rect::new(100, 100, 20, 20), 2, BLACK);
        let raster = Compositor::new(&fonts, PhotoTone::Museum).composite(&plan.finish());

        assert_eq!(raster.get(13, 13), ACCENT);
        assert_eq!(raster.get(14, 14), WHITE);
        assert_eq!(raster.get(101, 110), BLACK);
        assert_eq!(raster.get(110, 110), WHITE);
        assert_eq!(raster.get(119, 119), BLACK);
    }

    #[test]
    fn test_text_is_clipped_to_max_width() {
        let fonts = FontCache::fixed_metrics();
        let mut plan = DrawPlan::new();
        // Small face: 6 px advance, 5 px box
        plan.text(run("abcdef", 50, 12));
        let raster = Compositor::new(&fonts, PhotoTone::Museum).composite(&plan);

        assert_eq!(raster.get(50, 100), BLACK);
        assert_eq!(raster.get(60, 105), BLACK);
        assert_eq!(raster.get(62, 105), WHITE);
        assert_eq!(raster.get(70, 105), WHITE);
    }

    #[test]
    fn test_photo_blit_nearest_upscale() {
        let fonts = FontCache::fixed_metrics();
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        let photo = Photo::new(DynamicImage::ImageRgba8(img));

        let mut plan = DrawPlan::new();
        plan.push(DrawOp::Image(ImageBlit {
            dest: Rect::new(0, 0, 4, 4),
            photo,
            scaled_width: 4,
            scaled_height: 4,
            crop_x: 0,
            crop_y: 0,
        }));
        let raster = Compositor::new(&fonts, PhotoTone::Color).composite(&plan);

        assert_eq!(raster.get(0, 0), BLACK);
        assert_eq!(raster.get(1, 1), BLACK);
        assert_eq!(raster.get(2, 0), WHITE);
        assert_eq!(raster.get(3, 1), WHITE);
        assert_eq!(raster.get(3, 3), BLACK);
    }

    #[test]
    fn test_transparent_photo_pixels_leave_white() {
        let fonts = FontCache::fixed_metrics();
        let photo = Photo::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            3,
            3,
            Rgba([0, 0, 0, 0]),
        )));
        let mut plan = DrawPlan::new();
        plan.push(DrawOp::Image(ImageBlit {
            dest: Rect::new(5, 5, 3, 3),
            photo,
            scaled_width: 3,
            scaled_height: 3,
            crop_x: 0,
            crop_y: 0,
        }));
        let raster = Compositor::new(&fonts, PhotoTone::Color).composite(&plan);
        assert_eq!(raster.get(6, 6), WHITE);
    }

    #[test]
    fn test_museum_tone_grays_photo() {
        let fonts = FontCache::fixed_metrics();
        let photo = Photo::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            2,
            2,
            Rgba([200, 20, 20, 255]),
        )));
        let mut plan = DrawPlan::new();
        plan.push(DrawOp::Image(ImageBlit {
            dest: Rect::new(0, 0, 2, 2),
            photo,
            scaled_width: 2,
            scaled_height: 2,
            crop_x: 0,
            crop_y: 0,
        }));
        let Rgb([r, g, b]) = Compositor::new(&fonts, PhotoTone::Museum)
            .composite(&plan)
            .get(0, 0);
        assert_eq!((r, g), (g, b));
    }
}
