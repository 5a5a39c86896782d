//! Server state and configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CartelaError, Result};
use crate::font::FontCache;
use crate::render::CardRenderer;

/// Timeout for fetching remote photos.
pub const PHOTO_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest photo accepted from disk or over HTTP.
pub const MAX_PHOTO_BYTES: usize = 50 * 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Directory local `imagePath` values must resolve into. `None` allows
    /// only http(s) photos.
    pub photo_root: Option<PathBuf>,
    pub max_photo_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            photo_root: None,
            max_photo_bytes: MAX_PHOTO_BYTES,
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub fonts: &'static FontCache,
    /// Client used to resolve http(s) photo references.
    pub http: reqwest::Client,
}

impl AppState {
    /// State over the process-wide font cache.
    pub fn new(config: ServerConfig) -> Result<Self> {
        Self::with_fonts(config, FontCache::shared()?)
    }

    pub fn with_fonts(config: ServerConfig, fonts: &'static FontCache) -> Result<Self> {
        Ok(Self {
            config,
            fonts,
            http: photo_client()?,
        })
    }

    pub fn renderer(&self) -> CardRenderer<'static> {
        CardRenderer::new(self.fonts)
    }
}

/// HTTP client for photo downloads, shared by the server and the CLI.
pub fn photo_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(PHOTO_FETCH_TIMEOUT)
        .build()
        .map_err(|e| CartelaError::Resource(format!("Failed to build HTTP client: {}", e)))
}
