//! # Cartela - Exhibit Label Renderer
//!
//! Cartela renders exhibit labels ("cartelas") for museum displays into two
//! outputs:
//!
//! - **PNG previews** for the browser, full color or device-accurate
//! - **TRI binaries** for a 480×670 tri-tone (white, black, red) e-paper panel
//!
//! ## Quick Start
//!
//! ```
//! use cartela::card::{CardModel, PieceType};
//! use cartela::render;
//!
//! let card = CardModel {
//!     piece_type: PieceType::Exhibit,
//!     title: "T-Rex Skull".into(),
//!     bullets: vec!["Cretaceous".into(), "North America".into()],
//!     ..Default::default()
//! };
//!
//! let png = render::render_preview(&card, 0)?;
//! let tri = render::render_tri(&card, 2)?;
//!
//! assert!(png.starts_with(b"\x89PNG"));
//! assert_eq!(&tri[..4], b"TRI1");
//! # Ok::<(), cartela::CartelaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`card`] | Card model, wire format and validation |
//! | [`layout`] | Region allocation, wrapping, draw plans |
//! | [`font`] | Font faces and the shared font cache |
//! | [`render`] | Compositing and the end-to-end pipeline |
//! | [`quantize`] | Tri-tone quantization and dithering |
//! | [`encode`] | PNG and TRI encoders |
//! | [`server`] | HTTP render endpoints |
//! | [`error`] | Error types |

pub mod canvas;
pub mod card;
pub mod encode;
pub mod error;
pub mod font;
pub mod layout;
pub mod photo;
pub mod quantize;
pub mod raster;
pub mod render;
pub mod server;

// Re-exports for convenience
pub use card::{CardModel, PieceType, TechRow};
pub use error::{CartelaError, Result, ValidationError};
pub use render::{CardRenderer, RenderConfig};
