//! Resolving `imagePath` to photo bytes.
//!
//! Local paths must resolve inside the configured photo root after symlinks
//! are followed. Without a root only http(s) URLs are accepted. Both local
//! files and remote bodies are capped at `max_photo_bytes`; remote bodies are
//! read chunk by chunk so an oversized or unannounced length stops early.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::CartelaError;

use super::state::{AppState, MAX_PHOTO_BYTES, photo_client};

/// Why a photo reference could not be turned into bytes.
///
/// Only logged. Clients see a single generic message.
#[derive(Debug, Error)]
pub enum PhotoSourceError {
    #[error("local photos are disabled (no photo root configured)")]
    NoRoot,

    #[error("{0} resolves outside the photo root")]
    OutsideRoot(PathBuf),

    #[error("photo exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Read the bytes behind a trimmed, non-empty `imagePath`.
pub async fn load(state: &AppState, reference: &str) -> Result<Vec<u8>, PhotoSourceError> {
    let limit = state.config.max_photo_bytes;
    if is_remote(reference) {
        return download(&state.http, reference, limit).await;
    }

    let root = state
        .config
        .photo_root
        .as_deref()
        .ok_or(PhotoSourceError::NoRoot)?;
    let path = resolve_under(root, reference).await?;
    read_capped(&path, limit).await
}

/// Canonicalize `reference` against `root` and refuse anything that lands
/// outside it. Absolute references are allowed when they point inside.
pub async fn resolve_under(
    root: &Path,
    reference: &str,
) -> Result<PathBuf, PhotoSourceError> {
    let root = tokio::fs::canonicalize(root).await?;
    let candidate = tokio::fs::canonicalize(root.join(reference)).await?;
    if candidate.starts_with(&root) {
        Ok(candidate)
    } else {
        Err(PhotoSourceError::OutsideRoot(candidate))
    }
}

async fn read_capped(path: &Path, limit: usize) -> Result<Vec<u8>, PhotoSourceError> {
    let len = tokio::fs::metadata(path).await?.len();
    if len > limit as u64 {
        return Err(PhotoSourceError::TooLarge { limit });
    }
    Ok(tokio::fs::read(path).await?)
}

/// Download an http(s) photo outside the server, with the same timeout and
/// size cap.
pub async fn fetch_remote(url: &str) -> crate::Result<Vec<u8>> {
    download(&photo_client()?, url, MAX_PHOTO_BYTES)
        .await
        .map_err(|e| CartelaError::Image(format!("Failed to fetch photo {}: {}", url, e)))
}

async fn download(
    client: &reqwest::Client,
    url: &str,
    limit: usize,
) -> Result<Vec<u8>, PhotoSourceError> {
    let mut response = client.get(url).send().await?.error_for_status()?;
    if response
        .content_length()
        .is_some_and(|len| len > limit as u64)
    {
        return Err(PhotoSourceError::TooLarge { limit });
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if bytes.len() + chunk.len() > limit {
            return Err(PhotoSourceError::TooLarge { limit });
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
