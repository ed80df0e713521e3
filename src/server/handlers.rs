//! HTTP request handlers for the Quadview API.
//!
//! # Endpoints
//!
//! - `GET /api/image-sets` - List discovered set keys
//! - `GET /api/image-urls/{key}` - Static URLs for a set's original images
//! - `GET /api/image-preview/{key}/{quadrant}` - Low-resolution JPEG preview
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::PreviewError;
use crate::preview::PreviewService;
use crate::set::Quadrant;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the preview service.
///
/// This is passed to all handlers via Axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    /// The preview service for resolving sets and generating previews
    pub service: Arc<PreviewService>,

    /// Cache control max-age in seconds for preview responses
    pub cache_max_age: u32,

    /// Advisory quadrant display dimensions surfaced to clients
    pub quadrant_hint: (u32, u32),
}

impl AppState {
    /// Create application state with the given preview service.
    pub fn new(service: PreviewService) -> Self {
        Self {
            service: Arc::new(service),
            cache_max_age: 3600, // 1 hour default
            quadrant_hint: (1200, 700),
        }
    }

    /// Set the cache max-age for preview responses.
    pub fn with_cache_max_age(mut self, cache_max_age: u32) -> Self {
        self.cache_max_age = cache_max_age;
        self
    }

    /// Set the advisory quadrant display dimensions.
    pub fn with_quadrant_hint(mut self, width: u32, height: u32) -> Self {
        self.quadrant_hint = (width, height);
        self
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "decode_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Response from the set list endpoint.
#[derive(Debug, Serialize)]
pub struct SetsResponse {
    /// Sorted list of discovered set keys
    pub sets: Vec<String>,

    /// Advisory quadrant display width in pixels
    pub quadrant_width: u32,

    /// Advisory quadrant display height in pixels
    pub quadrant_height: u32,
}

/// Static URLs for the four full-resolution originals of one set.
#[derive(Debug, Serialize)]
pub struct QuadrantUrlsResponse {
    pub tl: String,
    pub tr: String,
    pub bl: String,
    pub br: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert PreviewError to an HTTP response.
///
/// Decode failures are reported to the caller as not-found but logged
/// distinctly at WARN so corrupt files are visible to operators; encode
/// failures are internal errors and logged at ERROR.
impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            PreviewError::SetNotFound { key } => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Image set not found: {}", key),
            ),

            PreviewError::InvalidQuadrant { quadrant } => (
                StatusCode::NOT_FOUND,
                "invalid_quadrant",
                format!("Invalid quadrant: {} (expected tl, tr, bl or br)", quadrant),
            ),

            PreviewError::FileNotFound { path } => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("File not found: {}", path.display()),
            ),

            PreviewError::Decode { path, message } => (
                StatusCode::NOT_FOUND,
                "decode_error",
                format!("Could not load image {}: {}", path.display(), message),
            ),

            PreviewError::Encode { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "encode_error",
                format!("Failed to generate preview: {}", message),
            ),

            PreviewError::Io { path, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                format!("I/O error reading {}: {}", path.display(), message),
            ),
        };

        // Log based on severity
        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else if matches!(self, PreviewError::Decode { .. }) {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Decode failure: {}",
                message
            );
        } else {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Resource not found: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle set list requests.
///
/// # Endpoint
///
/// `GET /api/image-sets`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "sets": ["0001", "0002"],
///   "quadrant_width": 1200,
///   "quadrant_height": 700
/// }
/// ```
pub async fn sets_handler(State(state): State<AppState>) -> Json<SetsResponse> {
    let (quadrant_width, quadrant_height) = state.quadrant_hint;
    Json(SetsResponse {
        sets: state.service.list_available_sets().to_vec(),
        quadrant_width,
        quadrant_height,
    })
}

/// Handle requests for a set's full-resolution image URLs.
///
/// # Endpoint
///
/// `GET /api/image-urls/{key}`
///
/// The three source directories are mounted at `/static-ref`, `/static-img1`
/// and `/static-img2`; the returned URLs point at those mounts.
///
/// # Errors
///
/// - `404 Not Found`: key not in the registry
pub async fn quadrant_urls_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<QuadrantUrlsResponse>, PreviewError> {
    let paths = state.service.quadrant_paths(&key)?;

    let basename = |quadrant: Quadrant| -> String {
        paths
            .get(quadrant)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    Ok(Json(QuadrantUrlsResponse {
        tl: format!("/static-ref/{}", basename(Quadrant::TopLeft)),
        tr: format!("/static-ref/{}", basename(Quadrant::TopRight)),
        bl: format!("/static-img1/{}", basename(Quadrant::BottomLeft)),
        br: format!("/static-img2/{}", basename(Quadrant::BottomRight)),
    }))
}

/// Handle preview requests.
///
/// # Endpoint
///
/// `GET /api/image-preview/{key}/{quadrant}`
///
/// # Path Parameters
///
/// - `key`: 4-digit set key
/// - `quadrant`: one of `tl`, `tr`, `bl`, `br`
///
/// # Response
///
/// - `200 OK`: JPEG preview with `Content-Type: image/jpeg`
/// - `404 Not Found`: unknown key, invalid quadrant, missing or
///   undecodable file
/// - `500 Internal Server Error`: preview encoding failure
///
/// # Headers
///
/// - `Content-Type: image/jpeg`
/// - `Cache-Control: public, max-age={cache_max_age}`
/// - `X-Image-Cache-Hit: true|false`
/// - `X-Normalize-Fallback: true|false`
pub async fn preview_handler(
    State(state): State<AppState>,
    Path((key, quadrant)): Path<(String, String)>,
) -> Result<Response, PreviewError> {
    let quadrant = Quadrant::from_code(&quadrant).ok_or_else(|| PreviewError::InvalidQuadrant {
        quadrant: quadrant.clone(),
    })?;

    let response = state.service.get_preview(&key, quadrant).await?;

    let http_response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/jpeg")
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.cache_max_age),
        )
        .header("X-Image-Cache-Hit", response.cache_hit.to_string())
        .header(
            "X-Normalize-Fallback",
            response.normalize_fallback.to_string(),
        )
        .body(axum::body::Body::from(response.data))
        .map_err(|e| PreviewError::Encode {
            message: e.to_string(),
        })?;

    Ok(http_response)
}
