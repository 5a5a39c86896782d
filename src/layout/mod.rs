//! # Card Layout
//!
//! Turns a [`CardModel`] into a [`DrawPlan`]. Layout never fails: text that
//! does not fit is wrapped and then cut with an ellipsis.
//!
//! ## Regions
//!
//! Regions are stacked top to bottom at fixed offsets. Without a photo the
//! photo region and its gap collapse and everything below moves up.
//!
//! ```text
//!  y    region
//!  12   header     badge, CAB <n>, piece number box
//!  60   title      2 lines, upper-cased
//!  160  subline    year (left), subtitle (right)
//!  192  rule       accent, 3 px
//!  204  photo      180 px + 12 px gap            (optional)
//!  396  bullets    4 rows x 24 px
//!  498  tech       caption + rule, 4 rows x 16 px
//!  590  notes      to 656
//! ```

mod plan;
mod wrap;

pub use plan::{DrawOp, DrawPlan, ImageBlit, TextRun};
pub use wrap::{ELLIPSIS, ellipsize, wrap};

use crate::canvas::{CONTENT_WIDTH, MARGIN, Rect};
use crate::card::{BULLET_SLOTS, CardModel, TECH_SLOTS};
use crate::font::{FontCache, FontFace, FontRole};
use crate::photo::Photo;
use crate::raster::{ACCENT, BLACK, WHITE};

const HEADER_TOP: u32 = 12;
const HEADER_HEIGHT: u32 = 40;
const PIECE_BOX_WIDTH: u32 = 64;
const PIECE_BOX_STROKE: u32 = 2;
const BADGE_HEIGHT: u32 = 20;
const BADGE_PADDING: u32 = 8;
const HEADER_GAP: u32 = 10;

const TITLE_TOP: u32 = 60;
const TITLE_LINES: usize = 2;
const TITLE_LINE_HEIGHT: u32 = 48;

const SUBLINE_TOP: u32 = 160;
const SUBLINE_HEIGHT: u32 = 24;
const SUBTITLE_OFFSET: u32 = 6;
const SUBLINE_GAP: u32 = 16;

const RULE_TOP: u32 = 192;
const RULE_HEIGHT: u32 = 3;

const PHOTO_TOP: u32 = 204;
const PHOTO_HEIGHT: u32 = 180;
const PHOTO_GAP: u32 = 12;

const BULLET_ROW_HEIGHT: u32 = 24;
const BULLET_MARKER: u32 = 6;
const BULLET_TEXT_INDENT: u32 = 18;

const SECTION_GAP: u32 = 6;
const TECH_CAPTION: &str = "TECHNICAL DATA";
const TECH_CAPTION_HEIGHT: u32 = 22;
const TECH_RULE_OFFSET: u32 = 15;
const TECH_ROW_HEIGHT: u32 = 16;
const TECH_LABEL_WIDTH: u32 = 105;
const TECH_LABEL_GAP: u32 = 6;

const NOTES_BOTTOM: u32 = 656;
const NOTES_LINE_HEIGHT: u32 = 14;

/// Vertical allocation of the canvas for one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub header: Rect,
    pub title: Rect,
    pub subline: Rect,
    pub rule: Rect,
    pub photo: Option<Rect>,
    pub bullets: Rect,
    pub tech: Rect,
    pub notes: Rect,
}

impl Regions {
    pub fn new(has_photo: bool) -> Self {
        let column = |y, height| Rect::new(MARGIN, y, CONTENT_WIDTH, height);

        let photo = has_photo.then(|| column(PHOTO_TOP, PHOTO_HEIGHT));
        let bullets_top = match photo {
            Some(region) => region.bottom() + PHOTO_GAP,
            None => PHOTO_TOP,
        };
        let bullets = column(bullets_top, BULLET_SLOTS as u32 * BULLET_ROW_HEIGHT);
        let tech = column(
            bullets.bottom() + SECTION_GAP,
            TECH_CAPTION_HEIGHT + TECH_SLOTS as u32 * TECH_ROW_HEIGHT,
        );
        let notes_top = tech.bottom() + SECTION_GAP;

        Self {
            header: column(HEADER_TOP, HEADER_HEIGHT),
            title: column(TITLE_TOP, TITLE_LINES as u32 * TITLE_LINE_HEIGHT),
            subline: column(SUBLINE_TOP, SUBLINE_HEIGHT),
            rule: column(RULE_TOP, RULE_HEIGHT),
            photo,
            bullets,
            tech,
            notes: column(notes_top, NOTES_BOTTOM - notes_top),
        }
    }
}

/// Positions every element of a card.
///
/// Holds the font cache so measurement during layout matches what the
/// compositor later draws.
pub struct LayoutEngine<'a> {
    fonts: &'a FontCache,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(fonts: &'a FontCache) -> Self {
        Self { fonts }
    }

    fn face(&self, role: FontRole) -> &'a dyn FontFace {
        self.fonts.face(role)
    }

    /// Build the draw plan for `card`.
    pub fn layout(&self, card: &CardModel) -> DrawPlan {
        let regions = Regions::new(card.photo.is_some());
        let mut plan = DrawPlan::new();

        self.header(card, regions.header, &mut plan);
        self.title(card, regions.title, &mut plan);
        self.subline(card, regions.subline, &mut plan);
        plan.fill(regions.rule, ACCENT);

        if let (Some(region), Some(photo)) = (regions.photo, &card.photo) {
            if let Some(blit) = place_photo(photo, region, card.effective_image_scale()) {
                plan.push(DrawOp::Image(blit));
            }
        }

        self.bullets(card, regions.bullets, &mut plan);
        self.tech(card, regions.tech, &mut plan);
        self.notes(card, regions.notes, &mut plan);

        let plan = plan.finish();
        tracing::debug!(
            ops = plan.len(),
            photo = regions.photo.is_some(),
            "card laid out"
        );
        plan
    }

    fn header(&self, card: &CardModel, region: Rect, plan: &mut DrawPlan) {
        let caption = self.face(FontRole::Caption);

        // The box and its gap only take space when there is a number to show
        let mut text_limit = region.right();
        let piece_number = card.piece_number.trim();
        if !piece_number.is_empty() {
            let piece_box = Rect::new(
                region.right() - PIECE_BOX_WIDTH,
                region.y,
                PIECE_BOX_WIDTH,
                region.height,
            );
            plan.stroke(piece_box, PIECE_BOX_STROKE, ACCENT);

            let heading = self.face(FontRole::Heading);
            let inner = PIECE_BOX_WIDTH - 2 * (PIECE_BOX_STROKE + 2);
            let text = ellipsize(heading, piece_number, inner);
            let width = heading.measure(&text);
            plan.text(TextRun {
                x: piece_box.x + (PIECE_BOX_WIDTH - width) / 2,
                y: centered(piece_box, heading.line_height()),
                font: FontRole::Heading,
                text,
                max_width: inner,
                color: BLACK,
            });
            text_limit = piece_box.x - HEADER_GAP;
        }

        let mut cursor = region.x;

        if let Some(badge) = card.piece_type.badge() {
            let width = caption.measure(badge) + 2 * BADGE_PADDING;
            let rect = Rect::new(
                cursor,
                region.y + (region.height - BADGE_HEIGHT) / 2,
                width,
                BADGE_HEIGHT,
            );
            plan.fill(rect, ACCENT);
            plan.text(TextRun {
                x: rect.x + BADGE_PADDING,
                y: centered(rect, caption.line_height()),
                font: FontRole::Caption,
                text: badge.to_string(),
                max_width: width - 2 * BADGE_PADDING,
                color: WHITE,
            });
            cursor = rect.right() + HEADER_GAP;
        }

        let cabinet = card.cabinet_number.trim();
        if !cabinet.is_empty() && cursor < text_limit {
            let max_width = text_limit - cursor;
            plan.text(TextRun {
                x: cursor,
                y: centered(region, caption.line_height()),
                font: FontRole::Caption,
                text: ellipsize(caption, &format!("CAB {}", cabinet), max_width),
                max_width,
                color: BLACK,
            });
        }
    }

    fn title(&self, card: &CardModel, region: Rect, plan: &mut DrawPlan) {
        let face = self.face(FontRole::Title);
        let title = card.title.trim().to_uppercase();
        for (i, line) in wrap(face, &title, region.width, TITLE_LINES)
            .into_iter()
            .enumerate()
        {
            plan.text(TextRun {
                x: region.x,
                y: region.y + i as u32 * TITLE_LINE_HEIGHT,
                font: FontRole::Title,
                text: line,
                max_width: region.width,
                color: BLACK,
            });
        }
    }

    fn subline(&self, card: &CardModel, region: Rect, plan: &mut DrawPlan) {
        let heading = self.face(FontRole::Heading);
        let body = self.face(FontRole::Body);

        let year = ellipsize(heading, card.year.trim(), region.width);
        let year_width = heading.measure(&year);
        let subtitle_width = if year.is_empty() {
            region.width
        } else {
            region.width.saturating_sub(year_width + SUBLINE_GAP)
        };

        plan.text(TextRun {
            x: region.x,
            y: region.y,
            font: FontRole::Heading,
            text: year,
            max_width: region.width,
            color: BLACK,
        });

        let subtitle = ellipsize(body, card.subtitle.trim(), subtitle_width);
        let width = body.measure(&subtitle);
        plan.text(TextRun {
            x: region.right() - width,
            y: region.y + SUBTITLE_OFFSET,
            font: FontRole::Body,
            text: subtitle,
            max_width: width,
            color: BLACK,
        });
    }

    fn bullets(&self, card: &CardModel, region: Rect, plan: &mut DrawPlan) {
        let face = self.face(FontRole::Body);
        let text_x = region.x + BULLET_TEXT_INDENT;
        let text_width = region.width - BULLET_TEXT_INDENT;

        for (i, bullet) in card.bullet_slots().into_iter().enumerate() {
            if bullet.is_empty() {
                continue;
            }
            let row = Rect::new(
                region.x,
                region.y + i as u32 * BULLET_ROW_HEIGHT,
                region.width,
                BULLET_ROW_HEIGHT,
            );
            plan.fill(
                Rect::new(row.x, centered(row, BULLET_MARKER), BULLET_MARKER, BULLET_MARKER),
                BLACK,
            );
            plan.text(TextRun {
                x: text_x,
                y: centered(row, face.line_height()),
                font: FontRole::Body,
                text: ellipsize(face, bullet, text_width),
                max_width: text_width,
                color: BLACK,
            });
        }
    }

    fn tech(&self, card: &CardModel, region: Rect, plan: &mut DrawPlan) {
        let rows: Vec<_> = card.filled_tech().collect();
        if rows.is_empty() {
            return;
        }

        let small = self.face(FontRole::Small);

        plan.text(TextRun {
            x: region.x,
            y: region.y,
            font: FontRole::Caption,
            text: TECH_CAPTION.to_string(),
            max_width: region.width,
            color: BLACK,
        });
        plan.fill(
            Rect::new(region.x, region.y + TECH_RULE_OFFSET, region.width, 1),
            ACCENT,
        );

        let label_width = TECH_LABEL_WIDTH - TECH_LABEL_GAP;
        let value_x = region.x + TECH_LABEL_WIDTH;
        let value_width = region.width - TECH_LABEL_WIDTH;

        for (i, row) in rows.into_iter().enumerate() {
            let line = Rect::new(
                region.x,
                region.y + TECH_CAPTION_HEIGHT + i as u32 * TECH_ROW_HEIGHT,
                region.width,
                TECH_ROW_HEIGHT,
            );
            let y = centered(line, small.line_height());

            let label = row.label.trim();
            if !label.is_empty() {
                plan.text(TextRun {
                    x: line.x,
                    y,
                    font: FontRole::Small,
                    text: ellipsize(small, &format!("{}:", label), label_width),
                    max_width: label_width,
                    color: BLACK,
                });
            }
            plan.text(TextRun {
                x: value_x,
                y,
                font: FontRole::Small,
                text: ellipsize(small, row.value.trim(), value_width),
                max_width: value_width,
                color: BLACK,
            });
        }
    }

    fn notes(&self, card: &CardModel, region: Rect, plan: &mut DrawPlan) {
        let face = self.face(FontRole::Small);
        let max_lines = (region.height / NOTES_LINE_HEIGHT) as usize;
        for (i, line) in wrap(face, card.notes.trim(), region.width, max_lines)
            .into_iter()
            .enumerate()
        {
            plan.text(TextRun {
                x: region.x,
                y: region.y + i as u32 * NOTES_LINE_HEIGHT,
                font: FontRole::Small,
                text: line,
                max_width: region.width,
                color: BLACK,
            });
        }
    }
}

/// Top offset that centers a box of `height` inside `outer`.
fn centered(outer: Rect, height: u32) -> u32 {
    outer.y + outer.height.saturating_sub(height) / 2
}

/// Scale the photo to fit `region`, apply the user scale, then center it.
///
/// Oversized results are center-cropped; undersized ones leave white
/// padding around the photo.
pub fn place_photo(photo: &Photo, region: Rect, scale: f32) -> Option<ImageBlit> {
    let (iw, ih) = (photo.width(), photo.height());
    if iw == 0 || ih == 0 || region.is_empty() {
        return None;
    }

    let fit = (region.width as f32 / iw as f32).min(region.height as f32 / ih as f32);
    let factor = fit * scale;
    let scaled_width = ((iw as f32 * factor).round() as u32).max(1);
    let scaled_height = ((ih as f32 * factor).round() as u32).max(1);

    let (dest_x, dest_width, crop_x) = center_axis(region.x, region.width, scaled_width);
    let (dest_y, dest_height, crop_y) = center_axis(region.y, region.height, scaled_height);

    Some(ImageBlit {
        dest: Rect::new(dest_x, dest_y, dest_width, dest_height),
        photo: photo.clone(),
        scaled_width,
        scaled_height,
        crop_x,
        crop_y,
    })
}

/// Returns (destination start, visible length, crop offset) along one axis.
fn center_axis(start: u32, available: u32, scaled: u32) -> (u32, u32, u32) {
    if scaled >= available {
        (start, available, (scaled - available) / 2)
    } else {
        (start + (available - scaled) / 2, scaled, 0)
    }
}
