//! Card render handlers: PNG preview and TRI download.
//!
//! Both endpoints accept either `{ "data": card, "dither": n,
//! "device_accurate": bool }` or a bare card object. `dither` defaults to
//! 0; `true`/`false` are accepted as 2/0.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::card::CardModel;
use crate::error::CartelaError;
use crate::photo::Photo;
use crate::render::RenderConfig;

use super::super::photo;
use super::super::state::AppState;

type HandlerError = (StatusCode, String);

/// Dither level as sent by clients.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum DitherParam {
    Flag(bool),
    Level(i64),
}

impl DitherParam {
    pub fn level(self) -> i64 {
        match self {
            DitherParam::Flag(true) => 2,
            DitherParam::Flag(false) => 0,
            DitherParam::Level(level) => level,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RenderOptions {
    #[serde(default)]
    dither: Option<DitherParam>,
    #[serde(default, alias = "deviceAccurate")]
    device_accurate: bool,
}

/// Parsed render request body.
#[derive(Debug)]
pub struct RenderRequest {
    pub card: CardModel,
    pub dither: i64,
    pub device_accurate: bool,
}

impl RenderRequest {
    pub fn from_json(body: Value) -> Result<Self, String> {
        let options: RenderOptions = match &body {
            Value::Object(_) => serde_json::from_value(body.clone())
                .map_err(|e| format!("Invalid render options: {}", e))?,
            _ => return Err("Request body must be a JSON object".to_string()),
        };

        let card_value = match body {
            Value::Object(mut map) => match map.remove("data") {
                Some(data) => data,
                None => Value::Object(map),
            },
            other => other,
        };
        let card: CardModel =
            serde_json::from_value(card_value).map_err(|e| format!("Invalid card: {}", e))?;

        Ok(Self {
            card,
            dither: options.dither.map_or(0, DitherParam::level),
            device_accurate: options.device_accurate,
        })
    }
}

/// Handle POST /api/preview - render a card as PNG.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, HandlerError> {
    let (request, config) = accept(body)?;
    let config = config.with_device_accurate(request.device_accurate);
    let photo_bytes = fetch_photo(&state, &request.card).await?;
    let renderer = state.renderer();

    let png_bytes = run_blocking(move || {
        let card = attach_photo(request.card, photo_bytes)?;
        renderer.render_preview(&card, &config)
    })
    .await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png_bytes))
}

/// Handle POST /api/render.tri - render a card as a TRI download.
pub async fn render_tri(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, HandlerError> {
    let (request, config) = accept(body)?;
    let photo_bytes = fetch_photo(&state, &request.card).await?;
    let filename = download_name(&request.card);
    let renderer = state.renderer();

    let tri_bytes = run_blocking(move || {
        let card = attach_photo(request.card, photo_bytes)?;
        renderer.render_tri(&card, &config)
    })
    .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.tri\"", filename),
            ),
        ],
        tri_bytes,
    ))
}

/// Handle GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Parse and validate before any I/O or pixel work.
fn accept(body: Value) -> Result<(RenderRequest, RenderConfig), HandlerError> {
    let request =
        RenderRequest::from_json(body).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    let config = RenderConfig::new(request.dither)
        .map_err(|e| error_response(CartelaError::Validation(e)))?;
    request
        .card
        .validate()
        .map_err(|e| error_response(CartelaError::Validation(e)))?;
    Ok((request, config))
}

/// Client-facing message for any photo that could not be loaded.
const PHOTO_UNREADABLE: &str = "photo could not be read";

/// Read the bytes behind `imagePath`: a file under the photo root or an
/// http(s) URL.
async fn fetch_photo(
    state: &AppState,
    card: &CardModel,
) -> Result<Option<Vec<u8>>, HandlerError> {
    let Some(reference) = card
        .image_path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    else {
        return Ok(None);
    };

    match photo::load(state, reference).await {
        Ok(bytes) => {
            tracing::debug!(reference, bytes = bytes.len(), "photo resolved");
            Ok(Some(bytes))
        }
        Err(e) => {
            tracing::warn!(reference, error = %e, "photo rejected");
            Err((StatusCode::BAD_REQUEST, PHOTO_UNREADABLE.to_string()))
        }
    }
}

fn attach_photo(card: CardModel, bytes: Option<Vec<u8>>) -> crate::Result<CardModel> {
    match bytes {
        Some(bytes) => Ok(card.with_photo(Photo::decode(&bytes)?)),
        None => Ok(card),
    }
}

/// Run CPU-bound rendering off the async workers.
async fn run_blocking<T, F>(job: F) -> Result<T, HandlerError>
where
    T: Send + 'static,
    F: FnOnce() -> crate::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Task error: {}", e),
            )
        })?
        .map_err(error_response)
}

fn error_response(e: CartelaError) -> HandlerError {
    if e.is_client_error() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else {
        tracing::error!(error = %e, "render failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Render failed: {}", e),
        )
    }
}

/// File stem for the download: the piece number when usable, else a UUID.
fn download_name(card: &CardModel) -> String {
    let stem: String = card
        .piece_number
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if stem.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("cartela-{}", stem)
    }
}
