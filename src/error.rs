//! # Error Types
//!
//! This module defines error types used throughout the cartela library.
//!
//! Validation failures are caught before any pixel work starts. Resource
//! failures only happen while the font cache is populated. Dimension
//! failures mean a raster reached an encoder at the wrong size, which is a
//! defect in layout or compositing rather than bad input.

use thiserror::Error;

/// Rejections raised while checking a card and its render configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Dither level outside 0..=3
    #[error("dither level {0} is not one of 0, 1, 2, 3")]
    DitherLevel(i64),

    #[error("{0} bullets supplied, at most 4 are allowed")]
    TooManyBullets(usize),

    #[error("{0} tech rows supplied, at most 4 are allowed")]
    TooManyTechRows(usize),

    /// Image scale must be a positive finite number
    #[error("image scale {0} must be positive")]
    ImageScale(f32),
}

/// Main error type for cartela operations
#[derive(Debug, Error)]
pub enum CartelaError {
    /// Card or render configuration rejected before rendering
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Font face missing or unreadable while populating the font cache
    #[error("Resource error: {0}")]
    Resource(String),

    /// Raster handed to an encoder does not match the canvas
    #[error(
        "Dimension error: expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}"
    )]
    Dimension {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// PNG encoding failure
    #[error("Encode error: {0}")]
    Encode(String),

    /// Malformed TRI input
    #[error("Decode error: {0}")]
    Decode(String),

    /// Photo decoding failure
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CartelaError {
    /// True for errors caused by caller input rather than by the renderer.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CartelaError::Validation(_) | CartelaError::Decode(_) | CartelaError::Image(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CartelaError>;
