//! # Font Faces and the Font Cache
//!
//! Layout measures text and the compositor rasterizes it through the same
//! [`FontFace`] trait, so both always agree on advances.
//!
//! ## Faces
//!
//! | Face | Source | Use |
//! |------|--------|-----|
//! | [`SpleenFace`] | bundled Spleen bitmap fonts | default, crisp on e-paper |
//! | [`TtfFace`] | caller-supplied TrueType bytes (ab_glyph) | custom typography |
//! | [`FixedFace`] | solid boxes with fixed metrics | deterministic tests |
//!
//! ## Roles
//!
//! Each [`FontRole`] maps to one face:
//!
//! | Role | Spleen cell | Weight | Used for |
//! |------|-------------|--------|----------|
//! | Title | 24×48 | bold | title lines |
//! | Heading | 12×24 | bold | year, piece number |
//! | Body | 9×18 | regular | subtitle, bullets |
//! | Caption | 6×12 | bold | badge, cabinet, table caption |
//! | Small | 6×12 | regular | tech rows, notes |
//!
//! ## Lifecycle
//!
//! [`FontCache::shared`] populates a process-wide cache on first use under a
//! mutex and hands out `&'static` references afterwards. Nothing mutates a
//! cache once built, so renders on different threads share it freely. The
//! cache is passed into layout and compositing explicitly; tests build their
//! own with [`FontCache::fixed_metrics`].

mod fixed;
mod spleen;
mod ttf;

pub use fixed::FixedFace;
pub use spleen::{SpleenFace, SpleenSource};
pub use ttf::TtfFace;

use std::sync::{Mutex, OnceLock};

use crate::error::{CartelaError, Result};

/// A font face at a fixed pixel size.
pub trait FontFace: Send + Sync {
    /// Horizontal advance of `ch` in pixels.
    fn advance(&self, ch: char) -> u32;

    /// Height of one line of text in pixels.
    fn line_height(&self) -> u32;

    /// Rasterize `ch` with the top-left of its line box at `(x, y)`.
    ///
    /// `plot` receives canvas coordinates and a coverage value in `0.0..=1.0`.
    fn draw_glyph(&self, ch: char, x: i32, y: i32, plot: &mut dyn FnMut(i32, i32, f32));

    /// Width of `text` in pixels.
    fn measure(&self, text: &str) -> u32 {
        text.chars().map(|ch| self.advance(ch)).sum()
    }
}

/// What a piece of text is used for on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    Title,
    Heading,
    Body,
    Caption,
    Small,
}

impl FontRole {
    pub const ALL: [FontRole; 5] = [
        FontRole::Title,
        FontRole::Heading,
        FontRole::Body,
        FontRole::Caption,
        FontRole::Small,
    ];
}

/// One face per [`FontRole`], resolved once and read-only afterwards.
pub struct FontCache {
    title: Box<dyn FontFace>,
    heading: Box<dyn FontFace>,
    body: Box<dyn FontFace>,
    caption: Box<dyn FontFace>,
    small: Box<dyn FontFace>,
}

static SHARED: OnceLock<FontCache> = OnceLock::new();
static POPULATE: Mutex<()> = Mutex::new(());

impl FontCache {
    /// Face for a role.
    pub fn face(&self, role: FontRole) -> &dyn FontFace {
        match role {
            FontRole::Title => self.title.as_ref(),
            FontRole::Heading => self.heading.as_ref(),
            FontRole::Body => self.body.as_ref(),
            FontRole::Caption => self.caption.as_ref(),
            FontRole::Small => self.small.as_ref(),
        }
    }

    /// Bundled Spleen bitmap faces.
    pub fn spleen() -> Result<Self> {
        Ok(Self {
            title: Box::new(SpleenFace::new(SpleenSource::Large, 24, 48, true)?),
            heading: Box::new(SpleenFace::new(SpleenSource::Large, 12, 24, true)?),
            body: Box::new(SpleenFace::new(SpleenSource::Small, 9, 18, false)?),
            caption: Box::new(SpleenFace::new(SpleenSource::Small, 6, 12, true)?),
            small: Box::new(SpleenFace::new(SpleenSource::Small, 6, 12, false)?),
        })
    }

    /// TrueType faces from caller-supplied font files.
    pub fn from_ttf(regular: Vec<u8>, bold: Vec<u8>) -> Result<Self> {
        let regular = TtfFace::family(regular)?;
        let bold = TtfFace::family(bold)?;
        Ok(Self {
            title: Box::new(TtfFace::new(bold.clone(), 40.0)),
            heading: Box::new(TtfFace::new(bold.clone(), 20.0)),
            body: Box::new(TtfFace::new(regular.clone(), 15.0)),
            caption: Box::new(TtfFace::new(bold, 10.0)),
            small: Box::new(TtfFace::new(regular, 10.0)),
        })
    }

    /// Fixed-metrics box faces for deterministic layout tests.
    pub fn fixed_metrics() -> Self {
        Self {
            title: Box::new(FixedFace::new(20, 48)),
            heading: Box::new(FixedFace::new(12, 24)),
            body: Box::new(FixedFace::new(9, 18)),
            caption: Box::new(FixedFace::new(7, 12)),
            small: Box::new(FixedFace::new(6, 12)),
        }
    }

    /// The process-wide cache, populated with the Spleen faces on first use.
    pub fn shared() -> Result<&'static FontCache> {
        if let Some(cache) = SHARED.get() {
            return Ok(cache);
        }

        let _guard = POPULATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(cache) = SHARED.get() {
            return Ok(cache);
        }

        let cache = FontCache::spleen()?;
        tracing::info!("font cache populated with bundled Spleen faces");
        Ok(SHARED.get_or_init(|| cache))
    }

    /// Populate the process-wide cache with custom faces.
    ///
    /// Must run before the first render; fails once the cache exists.
    pub fn install(cache: FontCache) -> Result<&'static FontCache> {
        let _guard = POPULATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        SHARED
            .set(cache)
            .map_err(|_| CartelaError::Resource("font cache is already populated".to_string()))?;
        tracing::info!("font cache populated with custom faces");
        SHARED
            .get()
            .ok_or_else(|| CartelaError::Resource("font cache vanished after install".to_string()))
    }
}
