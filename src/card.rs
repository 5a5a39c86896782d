//! # Card Model
//!
//! A card ("cartela") is one exhibit label record. Cards arrive from the
//! storage layer as JSON; field names are camelCase, with the older
//! snake_case names accepted as aliases. Unknown fields are ignored and
//! missing fields take their defaults.
//!
//! ```
//! use cartela::card::{CardModel, PieceType};
//!
//! let card: CardModel = serde_json::from_str(
//!     r#"{"title": "T-Rex Skull", "pieceType": "exhibit", "bullets": ["Cretaceous"]}"#,
//! ).unwrap();
//! assert_eq!(card.piece_type, PieceType::Exhibit);
//! assert_eq!(card.image_scale, 1.0);
//! assert!(card.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::photo::Photo;

/// Number of bullet rows the layout reserves.
pub const BULLET_SLOTS: usize = 4;

/// Number of tech table rows the layout reserves.
pub const TECH_SLOTS: usize = 4;

/// Bounds applied to `image_scale` after validation.
pub const MIN_IMAGE_SCALE: f32 = 0.1;
pub const MAX_IMAGE_SCALE: f32 = 3.0;

/// Kind of piece on display. Controls the header badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Exhibit,
    Artifact,
    Document,
    /// Fallback for any value outside the known set.
    #[default]
    #[serde(other)]
    Other,
}

impl PieceType {
    /// Badge caption, or `None` when no badge is drawn.
    pub fn badge(self) -> Option<&'static str> {
        match self {
            PieceType::Exhibit => Some("EXHIBIT"),
            PieceType::Artifact => Some("ARTIFACT"),
            PieceType::Document => Some("DOCUMENT"),
            PieceType::Other => None,
        }
    }
}

/// One row of the technical data table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TechRow {
    pub label: String,
    pub value: String,
}

impl TechRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.label.trim().is_empty() && self.value.trim().is_empty()
    }
}

fn default_image_scale() -> f32 {
    1.0
}

/// Exhibit label record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardModel {
    #[serde(alias = "piece_number")]
    pub piece_number: String,
    #[serde(alias = "cabinet_number")]
    pub cabinet_number: String,
    #[serde(alias = "piece_type")]
    pub piece_type: PieceType,
    pub title: String,
    pub subtitle: String,
    pub year: String,
    pub bullets: Vec<String>,
    pub tech: Vec<TechRow>,
    pub notes: String,
    /// Reference to the photo; resolved by the caller into [`CardModel::photo`].
    #[serde(alias = "image_path")]
    pub image_path: Option<String>,
    #[serde(alias = "image_scale", default = "default_image_scale")]
    pub image_scale: f32,
    /// Decoded photo pixels, attached by whoever resolved `image_path`.
    #[serde(skip)]
    pub photo: Option<Photo>,
}

impl Default for CardModel {
    fn default() -> Self {
        Self {
            piece_number: String::new(),
            cabinet_number: String::new(),
            piece_type: PieceType::Other,
            title: String::new(),
            subtitle: String::new(),
            year: String::new(),
            bullets: Vec::new(),
            tech: Vec::new(),
            notes: String::new(),
            image_path: None,
            image_scale: default_image_scale(),
            photo: None,
        }
    }
}

impl CardModel {
    /// Attach decoded photo pixels.
    pub fn with_photo(mut self, photo: Photo) -> Self {
        self.photo = Some(photo);
        self
    }

    /// Reject cards the layout cannot represent.
    ///
    /// Runs before any rendering work; a card that passes renders without error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bullets.len() > BULLET_SLOTS {
            return Err(ValidationError::TooManyBullets(self.bullets.len()));
        }
        if self.tech.len() > TECH_SLOTS {
            return Err(ValidationError::TooManyTechRows(self.tech.len()));
        }
        if self.image_scale.is_nan() || self.image_scale <= 0.0 {
            return Err(ValidationError::ImageScale(self.image_scale));
        }
        Ok(())
    }

    /// Image scale clamped to the supported range.
    pub fn effective_image_scale(&self) -> f32 {
        if self.image_scale.is_nan() {
            return 1.0;
        }
        self.image_scale.clamp(MIN_IMAGE_SCALE, MAX_IMAGE_SCALE)
    }

    /// Bullet text for each of the reserved rows; missing rows are empty.
    pub fn bullet_slots(&self) -> [&str; BULLET_SLOTS] {
        let mut slots = [""; BULLET_SLOTS];
        for (slot, bullet) in slots.iter_mut().zip(&self.bullets) {
            *slot = bullet.trim();
        }
        slots
    }

    /// Tech rows that carry any text, in order.
    pub fn filled_tech(&self) -> impl Iterator<Item = &TechRow> {
        self.tech.iter().take(TECH_SLOTS).filter(|row| !row.is_blank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let card: CardModel = serde_json::from_str("{}").unwrap();
        assert_eq!(card.piece_type, PieceType::Other);
        assert_eq!(card.image_scale, 1.0);
        assert!(card.bullets.is_empty());
        assert!(card.image_path.is_none());
    }

    #[test]
    fn test_snake_case_aliases() {
        let card: CardModel = serde_json::from_str(
            r#"{
                "piece_number": "12",
                "cabinet_number": "V3",
                "piece_type": "artifact",
                "image_scale": 2.0
            }"#,
        )
        .unwrap();
        assert_eq!(card.piece_number, "12");
        assert_eq!(card.cabinet_number, "V3");
        assert_eq!(card.piece_type, PieceType::Artifact);
        assert_eq!(card.image_scale, 2.0);
    }

    #[test]
    fn test_unknown_piece_type_falls_back_to_other() {
        let card: CardModel = serde_json::from_str(r#"{"pieceType": "console"}"#).unwrap();
        assert_eq!(card.piece_type, PieceType::Other);
        assert_eq!(card.piece_type.badge(), None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let card: CardModel =
            serde_json::from_str(r#"{"title": "Abacus", "renderPath": "/tmp/x.png"}"#).unwrap();
        assert_eq!(card.title, "Abacus");
    }

    #[test]
    fn test_validate_bullet_limit() {
        let mut card = CardModel {
            bullets: vec!["a".into(); 4],
            ..Default::default()
        };
        assert!(card.validate().is_ok());
        card.bullets.push("e".into());
        assert_eq!(card.validate(), Err(ValidationError::TooManyBullets(5)));
    }

    #[test]
    fn test_validate_tech_limit() {
        let card = CardModel {
            tech: vec![TechRow::new("CPU", "Z80"); 5],
            ..Default::default()
        };
        assert_eq!(card.validate(), Err(ValidationError::TooManyTechRows(5)));
    }

    #[test]
    fn test_validate_image_scale() {
        for bad in [0.0, -1.0, f32::NAN] {
            let card = CardModel {
                image_scale: bad,
                ..Default::default()
            };
            assert!(matches!(card.validate(), Err(ValidationError::ImageScale(_))));
        }
    }

    #[test]
    fn test_effective_image_scale_is_clamped() {
        let mut card = CardModel {
            image_scale: 0.01,
            ..Default::default()
        };
        assert_eq!(card.effective_image_scale(), MIN_IMAGE_SCALE);
        card.image_scale = 12.0;
        assert_eq!(card.effective_image_scale(), MAX_IMAGE_SCALE);
    }

    #[test]
    fn test_bullet_slots_pad_to_four() {
        let card = CardModel {
            bullets: vec!["Cretaceous".into(), " North America ".into()],
            ..Default::default()
        };
        assert_eq!(card.bullet_slots(), ["Cretaceous", "North America", "", ""]);
    }
}
