//! # HTTP Render Server
//!
//! A thin HTTP surface over the render pipeline.
//!
//! ## Usage
//!
//! ```bash
//! cartela serve --listen 0.0.0.0:8080 --photo-root /srv/cartela/photos
//! ```
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | POST | `/api/preview` | `image/png` |
//! | POST | `/api/render.tri` | `application/octet-stream` attachment |
//! | GET | `/api/health` | `{"status": "ok"}` |
//!
//! Validation failures and unreadable photos answer 400; anything else
//! that goes wrong while rendering answers 500. Photo failures carry one
//! generic message; the cause is only logged.

mod handlers;
mod photo;
mod state;

pub use handlers::render::{DitherParam, RenderRequest};
pub use photo::{PhotoSourceError, fetch_remote, is_remote};
pub use state::{AppState, MAX_PHOTO_BYTES, ServerConfig};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::Result;

/// Build the application router. Shared by [`serve`] and the tests.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::render::health))
        .route("/api/preview", post(handlers::render::preview))
        .route("/api/render.tri", post(handlers::render::render_tri))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use cartela::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), cartela::error::CartelaError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     photo_root: Some("/srv/cartela/photos".into()),
///     ..Default::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = Arc::new(AppState::new(config.clone())?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(
        listen = %config.listen_addr,
        photo_root = ?config.photo_root,
        "cartela render server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
